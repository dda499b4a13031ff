use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use resumerank_api::RestApi;
use resumerank_core::{PipelineConfig, Table};
use resumerank_privacy::Anonymizer;
use resumerank_session::{RankRequest, RankingSession};
use resumerank_similarity::{Embedder, HashingEmbedder, HttpEmbedder};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Rank resumes against a job description
#[derive(Parser, Debug)]
#[command(name = "resumerank")]
#[command(about = "Rank resumes against a job description", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Path to a JSON pipeline config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Embedding backend
    #[arg(long, value_enum, default_value_t = EmbedderKind::Hashing, global = true)]
    embedder: EmbedderKind,

    /// Base URL of the embedding server (for `--embedder http`)
    #[arg(long, global = true)]
    embedding_url: Option<String>,

    /// Embedding dimension, overrides the config file
    #[arg(long, global = true)]
    embedding_dim: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EmbedderKind {
    Hashing,
    Http,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// HTTP API port
        #[arg(long, default_value_t = 8000)]
        http_port: u16,

        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },
    /// Rank a resume CSV against a job description file
    Rank {
        /// Resume CSV, one resume per row
        #[arg(long)]
        resumes: PathBuf,

        /// Job description text file
        #[arg(long)]
        job_description: PathBuf,

        /// Where to write the ranked CSV
        #[arg(long)]
        output: Option<PathBuf>,

        /// Column holding the resume text (default: last column)
        #[arg(long)]
        text_column: Option<String>,

        /// Redact PII before ranking
        #[arg(long)]
        anonymize: bool,

        /// Only rank the first N rows
        #[arg(long)]
        rows: Option<usize>,

        /// Number of results to print
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Redact PII from every cell of a CSV
    Anonymize {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,

        /// Only keep the first N rows
        #[arg(long)]
        rows: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = log_filter(&args.log_level, std::env::var("RUST_LOG").ok().as_deref());
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_path(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => PipelineConfig::default(),
    };
    if let Some(dim) = args.embedding_dim {
        config.embedding_dim = dim;
    }
    config.validate()?;

    match args.command {
        Command::Serve { http_port, ref bind } => {
            let embedder = build_embedder(&args, &config)?;
            serve(config, embedder, bind, http_port)
        }
        Command::Rank {
            ref resumes,
            ref job_description,
            ref output,
            ref text_column,
            anonymize,
            rows,
            top,
        } => {
            let embedder = build_embedder(&args, &config)?;
            let session = RankingSession::new(config, embedder)?;

            let mut table = Table::from_path(resumes)
                .with_context(|| format!("Failed to read resumes {:?}", resumes))?;
            if let Some(rows) = rows {
                table.truncate(rows);
            }
            let job_text = std::fs::read_to_string(job_description)
                .with_context(|| format!("Failed to read job description {:?}", job_description))?;

            let mut request = RankRequest::table(job_text.trim(), table).anonymize(anonymize);
            request.text_column = text_column.clone();
            let result = session.compute(request)?;

            if let Some(output) = output {
                result.table.write_path(output)?;
                info!("Ranking complete. Saved to: {:?}", output);
            }

            for scored in result.documents.iter().take(top) {
                let preview: String = scored.text().chars().take(80).collect();
                println!(
                    "{:>5}  {:.4}  {}",
                    scored.index(),
                    scored.score,
                    preview.replace('\n', " ")
                );
            }
            Ok(())
        }
        Command::Anonymize { ref input, ref output, rows } => {
            let mut table = Table::from_path(input)
                .with_context(|| format!("Failed to read {:?}", input))?;
            if let Some(rows) = rows {
                table.truncate(rows);
            }
            if table.is_empty() {
                anyhow::bail!("Input table {:?} has no rows", input);
            }

            let text_column = table.column_count() - 1;
            let report = Anonymizer::from_config(&config).anonymize(&mut table, text_column)?;
            table.write_path(output)?;
            info!(
                "Anonymized resumes saved to: {:?} ({} cells changed)",
                output, report.cells_changed
            );
            Ok(())
        }
    }
}

/// `RUST_LOG` directives when set and valid, otherwise `--log-level`
fn log_filter(log_level: &str, env_directives: Option<&str>) -> EnvFilter {
    if let Some(filter) = env_directives.and_then(|d| EnvFilter::try_new(d).ok()) {
        return filter;
    }

    let log_level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    EnvFilter::default().add_directive(log_level.into())
}

fn build_embedder(args: &Args, config: &PipelineConfig) -> anyhow::Result<Arc<dyn Embedder>> {
    match args.embedder {
        EmbedderKind::Hashing => Ok(Arc::new(HashingEmbedder::new(config.embedding_dim))),
        EmbedderKind::Http => {
            let url = args
                .embedding_url
                .as_deref()
                .context("--embedding-url is required with --embedder http")?;
            Ok(Arc::new(HttpEmbedder::new(url, config.embedding_dim)?))
        }
    }
}

fn serve(
    config: PipelineConfig,
    embedder: Arc<dyn Embedder>,
    host: &str,
    http_port: u16,
) -> anyhow::Result<()> {
    info!("Starting resumerank v{}", env!("CARGO_PKG_VERSION"));
    info!("Embedder: {} ({} dimensions)", embedder.name(), embedder.dim());

    let session = Arc::new(RankingSession::new(config, embedder)?);
    info!("HTTP API: http://{}:{}/", host, http_port);

    let sys = actix_web::rt::System::new();
    sys.block_on(RestApi::start(session, host, http_port))?;

    info!("Shutting down...");
    Ok(())
}
