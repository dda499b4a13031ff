//! Ranking session
//!
//! One ranking call: resolve the text column, optionally anonymize, score
//! every row against the job description, sort, and keep the full table
//! for download.

use crate::store::{ResultHandle, ResultStore, StoredResult};
use resumerank_core::{Document, Error, Field, PipelineConfig, Result, ScoredDocument, Table};
use resumerank_privacy::{fields_from_table, AnonymizeReport, Anonymizer};
use resumerank_similarity::{Embedder, SimilarityRanker};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Candidate resumes of a ranking call
#[derive(Debug, Clone)]
pub enum Candidates {
    /// Plain list of resume texts
    Texts(Vec<String>),
    /// Tabular input, one resume per row
    Table(Table),
}

/// Input of one ranking call
#[derive(Debug, Clone)]
pub struct RankRequest {
    pub job_description: String,
    pub candidates: Candidates,
    pub anonymize: bool,
    /// Column holding the resume text; defaults to the last column
    pub text_column: Option<String>,
}

impl RankRequest {
    pub fn texts(job_description: impl Into<String>, resumes: Vec<String>) -> Self {
        Self {
            job_description: job_description.into(),
            candidates: Candidates::Texts(resumes),
            anonymize: true,
            text_column: None,
        }
    }

    pub fn table(job_description: impl Into<String>, table: Table) -> Self {
        Self {
            job_description: job_description.into(),
            candidates: Candidates::Table(table),
            anonymize: true,
            text_column: None,
        }
    }

    pub fn anonymize(mut self, anonymize: bool) -> Self {
        self.anonymize = anonymize;
        self
    }

    pub fn text_column(mut self, column: impl Into<String>) -> Self {
        self.text_column = Some(column.into());
        self
    }
}

/// Ranked documents plus the augmented table in ranked order
#[derive(Debug, Clone)]
pub struct RankedResult {
    pub documents: Vec<ScoredDocument>,
    pub table: Table,
    pub text_column: String,
    pub anonymization: Option<AnonymizeReport>,
}

/// Trimmed per-resume view returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub index: usize,
    pub similarity: f32,
    pub resume_text: String,
}

impl From<&ScoredDocument> for RankedEntry {
    fn from(scored: &ScoredDocument) -> Self {
        Self {
            index: scored.index(),
            similarity: scored.score,
            resume_text: scored.text().to_string(),
        }
    }
}

/// Outcome of [`RankingSession::rank`]
#[derive(Debug, Clone, Serialize)]
pub struct RankOutcome {
    /// Handle for downloading the full table
    pub handle: ResultHandle,
    pub ranked: Vec<RankedEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymization: Option<AnonymizeReport>,
}

/// Ranking pipeline plus retained results
pub struct RankingSession {
    config: PipelineConfig,
    ranker: SimilarityRanker,
    anonymizer: Anonymizer,
    store: ResultStore,
}

impl RankingSession {
    pub fn new(config: PipelineConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        config.validate()?;
        if embedder.dim() != config.embedding_dim {
            return Err(Error::InvalidDimension {
                expected: config.embedding_dim,
                actual: embedder.dim(),
            });
        }

        Ok(Self {
            ranker: SimilarityRanker::new(embedder),
            anonymizer: Anonymizer::from_config(&config),
            store: ResultStore::new(config.max_retained_results),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn anonymizer(&self) -> &Anonymizer {
        &self.anonymizer
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Rank and retain the full table
    pub fn rank(&self, request: RankRequest) -> Result<RankOutcome> {
        let result = self.compute(request)?;
        let stored = self.store.insert(result.table);

        info!(
            "Ranked {} resumes on column '{}' (result {})",
            result.documents.len(),
            result.text_column,
            stored.handle
        );

        Ok(RankOutcome {
            handle: stored.handle,
            ranked: result.documents.iter().map(RankedEntry::from).collect(),
            anonymization: result.anonymization,
        })
    }

    /// Rank without retaining anything
    pub fn compute(&self, request: RankRequest) -> Result<RankedResult> {
        let started = Instant::now();
        let reference = request.job_description.trim();
        if reference.is_empty() {
            return Err(Error::MissingReference);
        }

        let mut table = match request.candidates {
            Candidates::Texts(texts) => Table::from_texts(&self.config.text_list_column, texts),
            Candidates::Table(table) => table,
        };
        if table.is_empty() {
            return Err(Error::InputEmpty);
        }

        let text_idx = resolve_text_column(&table, request.text_column.as_deref())?;
        let text_column = table.columns()[text_idx].clone();

        let anonymization = if request.anonymize {
            Some(self.anonymizer.anonymize(&mut table, text_idx)?)
        } else {
            None
        };

        let has_field_columns = Field::ALL
            .iter()
            .any(|f| table.column_index(f.as_str()).is_some());
        let fields = has_field_columns.then(|| fields_from_table(&table, text_idx));

        let documents: Vec<Document> = (0..table.len())
            .map(|row| {
                let document = Document::new(row, table.cell(row, text_idx));
                match &fields {
                    Some(fields) => document.with_fields(fields[row].clone()),
                    None => document,
                }
            })
            .collect();

        let documents = self.ranker.rank(reference, documents)?;

        let mut scores = vec![String::new(); table.len()];
        for scored in &documents {
            scores[scored.index()] = scored.score.to_string();
        }
        table.set_column(&self.config.similarity_column, scores)?;
        let order: Vec<usize> = documents.iter().map(ScoredDocument::index).collect();
        table.reorder_rows(&order)?;

        debug!(
            "Ranking of {} rows took {:?}",
            documents.len(),
            started.elapsed()
        );

        Ok(RankedResult {
            documents,
            table,
            text_column,
            anonymization,
        })
    }

    /// Full table of a specific ranking call
    pub fn retrieve(&self, handle: &ResultHandle) -> Result<Arc<StoredResult>> {
        self.store.get(handle)
    }

    /// Full table of the most recent ranking call, from any caller
    pub fn latest(&self) -> Result<Arc<StoredResult>> {
        self.store.latest()
    }
}

/// Explicit column if given, otherwise the last column
fn resolve_text_column(table: &Table, explicit: Option<&str>) -> Result<usize> {
    match explicit.map(str::trim).filter(|c| !c.is_empty()) {
        Some(name) => table
            .column_index(name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string())),
        None => table
            .column_count()
            .checked_sub(1)
            .ok_or_else(|| Error::Table("table has no columns".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resumerank_core::{Vector, DEFAULT_EMBEDDING_DIM};
    use resumerank_similarity::HashingEmbedder;

    /// Returns one vector fewer than requested
    struct ShortEmbedder;

    impl Embedder for ShortEmbedder {
        fn dim(&self) -> usize {
            DEFAULT_EMBEDDING_DIM
        }

        fn embed(&self, texts: &[String]) -> Result<Vec<Vector>> {
            Ok(texts
                .iter()
                .skip(1)
                .map(|_| Vector::new(vec![0.0; DEFAULT_EMBEDDING_DIM]))
                .collect())
        }
    }

    struct UnreachableEmbedder;

    impl Embedder for UnreachableEmbedder {
        fn dim(&self) -> usize {
            DEFAULT_EMBEDDING_DIM
        }

        fn embed(&self, _texts: &[String]) -> Result<Vec<Vector>> {
            Err(Error::Embedding("connection refused".into()))
        }
    }

    fn session() -> RankingSession {
        let config = PipelineConfig::default();
        let embedder = Arc::new(HashingEmbedder::new(config.embedding_dim));
        RankingSession::new(config, embedder).unwrap()
    }

    fn resumes_table() -> Table {
        Table::from_rows(
            vec!["id".into(), "email".into(), "phone".into(), "resume".into()],
            vec![
                vec!["1".into(), "a@b.com".into(), "555".into(), "Watercolor painting enthusiast".into()],
                vec!["2".into(), "c@d.com".into(), "".into(), "Experienced Python backend developer".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rank_texts() {
        let session = session();
        let request = RankRequest::texts(
            "Looking for a Python backend engineer",
            vec![
                "Watercolor painting enthusiast".into(),
                "Name: Jane\nExperienced Python backend developer".into(),
            ],
        );
        let outcome = session.rank(request).unwrap();

        assert_eq!(outcome.ranked.len(), 2);
        assert_eq!(outcome.ranked[0].index, 1);
        assert_eq!(outcome.ranked[0].resume_text, "Name: <NAME>\nExperienced Python backend developer");
        assert!(outcome.ranked[0].similarity > outcome.ranked[1].similarity);

        let report = outcome.anonymization.unwrap();
        assert_eq!(report.derived_columns, vec!["name"]);
    }

    #[test]
    fn test_rank_without_anonymization_keeps_text() {
        let session = session();
        let request = RankRequest::texts("Rust", vec!["Name: Jane".into()]).anonymize(false);
        let outcome = session.rank(request).unwrap();
        assert_eq!(outcome.ranked[0].resume_text, "Name: Jane");
        assert!(outcome.anonymization.is_none());
    }

    #[test]
    fn test_full_table_is_sorted_and_augmented() {
        let session = session();
        let request = RankRequest::table("Looking for a Python backend engineer", resumes_table());
        let outcome = session.rank(request).unwrap();

        let stored = session.retrieve(&outcome.handle).unwrap();
        let table = &stored.table;
        assert_eq!(table.columns(), &["id", "email", "phone", "resume", "similarity"]);
        assert_eq!(table.cell(0, 0), "2");
        assert_eq!(table.cell(0, 1), "<EMAIL>");
        assert_eq!(table.cell(1, 2), "<PHONE>");
        assert_eq!(table.cell(0, 2), "");

        let top: f32 = table.cell(0, 4).parse().unwrap();
        assert_eq!(top, outcome.ranked[0].similarity);
    }

    #[test]
    fn test_explicit_text_column() {
        let session = session();
        let table = Table::from_rows(
            vec!["resume".into(), "id".into()],
            vec![vec!["Python backend developer".into(), "7".into()]],
        )
        .unwrap();
        let request = RankRequest::table("Python", table).text_column("resume");
        let result = session.compute(request).unwrap();
        assert_eq!(result.text_column, "resume");
        assert_eq!(result.documents[0].text(), "Python backend developer");

        let bad = RankRequest::table("Python", resumes_table()).text_column("missing");
        assert!(matches!(session.compute(bad), Err(Error::UnknownColumn(_))));
    }

    #[test]
    fn test_structured_documents_carry_fields() {
        let session = session();
        let result = session
            .compute(RankRequest::table("Python", resumes_table()))
            .unwrap();
        let fields = result.documents[0].document.fields.as_ref().unwrap();
        assert_eq!(fields.email, "<EMAIL>");
    }

    #[test]
    fn test_missing_reference() {
        let session = session();
        let request = RankRequest::texts("   \n", vec!["resume".into()]);
        assert!(matches!(session.rank(request), Err(Error::MissingReference)));
        assert!(matches!(session.latest(), Err(Error::NoPriorResult)));
    }

    #[test]
    fn test_empty_input() {
        let session = session();
        let request = RankRequest::texts("Rust", Vec::new());
        assert!(matches!(session.rank(request), Err(Error::InputEmpty)));

        let header_only = Table::new(vec!["resume".into()]);
        let request = RankRequest::table("Rust", header_only);
        assert!(matches!(session.rank(request), Err(Error::InputEmpty)));
    }

    #[test]
    fn test_latest_and_handles() {
        let session = session();
        assert!(matches!(session.latest(), Err(Error::NoPriorResult)));

        let first = session.rank(RankRequest::texts("Rust", vec!["a".into()])).unwrap();
        let second = session.rank(RankRequest::texts("Rust", vec!["b".into()])).unwrap();

        assert_eq!(session.latest().unwrap().handle, second.handle);
        assert_eq!(session.retrieve(&first.handle).unwrap().table.cell(0, 0), "a");
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let config = PipelineConfig::default();
        let embedder = Arc::new(HashingEmbedder::new(8));
        assert!(matches!(
            RankingSession::new(config, embedder),
            Err(Error::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_short_embedding_batch_fails_whole_call() {
        let session = RankingSession::new(PipelineConfig::default(), Arc::new(ShortEmbedder)).unwrap();
        let request = RankRequest::texts("Rust", vec!["a".into(), "b".into()]);

        assert!(matches!(
            session.rank(request),
            Err(Error::EmbeddingCountMismatch { expected: 3, actual: 2 })
        ));
        assert!(session.store().is_empty());
        assert!(matches!(session.latest(), Err(Error::NoPriorResult)));
    }

    #[test]
    fn test_embedding_failure_keeps_cause() {
        let session =
            RankingSession::new(PipelineConfig::default(), Arc::new(UnreachableEmbedder)).unwrap();
        let err = session
            .rank(RankRequest::texts("Rust", vec!["a".into()]))
            .unwrap_err();

        assert_eq!(err.kind(), "embedding_failure");
        assert!(err.to_string().contains("connection refused"));
        assert!(session.store().is_empty());
    }
}
