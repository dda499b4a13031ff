use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use futures_util::StreamExt;
use resumerank_core::{Error, Table};
use resumerank_session::{
    RankOutcome, RankRequest, RankedEntry, RankingSession, ResultHandle, StoredResult,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Largest accepted CSV upload
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Largest accepted JSON body
const MAX_JSON_BYTES: usize = 8 * 1024 * 1024;

#[derive(Deserialize)]
struct RankResumesRequest {
    job_description: String,
    resumes: Vec<String>,
    #[serde(default = "default_anonymize")]
    anonymize: bool,
    #[serde(default)]
    text_column: Option<String>,
}

fn default_anonymize() -> bool {
    true
}

#[derive(Serialize)]
struct RankResumesResponse {
    ranked_resumes: Vec<RankedEntry>,
    handle: ResultHandle,
}

impl From<RankOutcome> for RankResumesResponse {
    fn from(outcome: RankOutcome) -> Self {
        Self {
            ranked_resumes: outcome.ranked,
            handle: outcome.handle,
        }
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        session: Arc<RankingSession>,
        host: &str,
        port: u16,
    ) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(session.clone()))
                .configure(configure)
        })
        .bind((host, port))?
        .run()
        .await
    }
}

/// Register all routes; the session must be provided as `web::Data<Arc<RankingSession>>`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(MAX_JSON_BYTES))
        .route("/", web::get().to(health))
        .route("/api/resumes/rank", web::post().to(rank_resumes))
        .route("/api/resumes/rank/upload", web::post().to(rank_upload))
        .route("/api/resumes/download", web::get().to(download_latest))
        .route("/api/resumes/download/{handle}", web::get().to(download_result));
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "message": "Resume ranking API is running"
    })))
}

fn error_response(e: &Error) -> HttpResponse {
    let body = serde_json::json!({
        "error": e.to_string(),
        "kind": e.kind(),
    });
    match e {
        Error::NoPriorResult | Error::ResultNotFound(_) => HttpResponse::NotFound().json(body),
        Error::Embedding(_) | Error::EmbeddingCountMismatch { .. } => {
            HttpResponse::BadGateway().json(body)
        }
        e if e.is_input_error() => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

async fn run_ranking(
    session: web::Data<Arc<RankingSession>>,
    request: RankRequest,
) -> ActixResult<HttpResponse> {
    let session = session.get_ref().clone();
    match web::block(move || session.rank(request)).await {
        Ok(Ok(outcome)) => Ok(HttpResponse::Ok().json(RankResumesResponse::from(outcome))),
        Ok(Err(e)) => {
            if !e.is_input_error() {
                error!("Ranking failed: {}", e);
            }
            Ok(error_response(&e))
        }
        Err(e) => {
            error!("Ranking task failed: {}", e);
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Ranking task failed"
            })))
        }
    }
}

async fn rank_resumes(
    session: web::Data<Arc<RankingSession>>,
    req: web::Json<RankResumesRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();
    let mut request = RankRequest::texts(req.job_description, req.resumes).anonymize(req.anonymize);
    request.text_column = req.text_column;
    run_ranking(session, request).await
}

async fn rank_upload(
    session: web::Data<Arc<RankingSession>>,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let mut file: Option<Vec<u8>> = None;
    let mut job_description = String::new();
    let mut anonymize = true;
    let mut text_column: Option<String> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Ok(HttpResponse::PayloadTooLarge().json(serde_json::json!({
                    "error": format!("Upload exceeds {} bytes", MAX_UPLOAD_BYTES)
                })));
            }
            data.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "file" => file = Some(data),
            "job_description" => job_description = String::from_utf8_lossy(&data).into_owned(),
            "anonymize" => anonymize = parse_flag(&String::from_utf8_lossy(&data)),
            "text_column" => {
                let column = String::from_utf8_lossy(&data).trim().to_string();
                text_column = (!column.is_empty()).then_some(column);
            }
            _ => {}
        }
    }

    let Some(file) = file else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Missing 'file' part"
        })));
    };

    let table = match Table::read_csv(file.as_slice()) {
        Ok(table) => table,
        Err(e) => return Ok(error_response(&e)),
    };
    info!("Received upload with {} rows", table.len());

    let mut request = RankRequest::table(job_description, table).anonymize(anonymize);
    request.text_column = text_column;
    run_ranking(session, request).await
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}

fn csv_response(stored: &StoredResult) -> HttpResponse {
    match stored.to_csv() {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"ranked_resumes.csv\"",
            ))
            .insert_header(("X-Result-Handle", stored.handle.to_string()))
            .body(csv),
        Err(e) => error_response(&e),
    }
}

async fn download_latest(
    session: web::Data<Arc<RankingSession>>,
) -> ActixResult<HttpResponse> {
    match session.latest() {
        Ok(stored) => Ok(csv_response(&stored)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn download_result(
    session: web::Data<Arc<RankingSession>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let handle = match path.into_inner().parse::<ResultHandle>() {
        Ok(handle) => handle,
        Err(e) => return Ok(error_response(&e)),
    };

    match session.retrieve(&handle) {
        Ok(stored) => Ok(csv_response(&stored)),
        Err(e) => Ok(error_response(&e)),
    }
}
