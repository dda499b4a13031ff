//! # resumerank
//!
//! Ranks resumes against a job description by semantic similarity, with
//! optional PII redaction before ranking and before results are returned.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! resumerank serve --http-port 8000
//! ```
//!
//! ### As a Batch Tool
//!
//! ```bash
//! resumerank rank --resumes resumes.csv --job-description job.txt --output ranked.csv --anonymize
//! resumerank anonymize --input resumes.csv --output anonymized.csv --rows 20
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use resumerank::prelude::*;
//! use std::sync::Arc;
//!
//! let config = PipelineConfig::default();
//! let embedder = Arc::new(HashingEmbedder::new(config.embedding_dim));
//! let session = RankingSession::new(config, embedder).unwrap();
//!
//! let outcome = session
//!     .rank(RankRequest::texts(
//!         "Looking for a Python backend engineer",
//!         vec![
//!             "Watercolor painting enthusiast".to_string(),
//!             "Name: Jane Doe\nExperienced Python backend developer".to_string(),
//!         ],
//!     ))
//!     .unwrap();
//!
//! assert_eq!(outcome.ranked[0].index, 1);
//! let full_table = session.retrieve(&outcome.handle).unwrap();
//! assert_eq!(full_table.table.len(), 2);
//! ```
//!
//! ## Crate Structure
//!
//! - `resumerank-core` - Tables, documents, vectors, config and errors
//! - `resumerank-privacy` - Redaction, field extraction, column classification
//! - `resumerank-similarity` - Embedders and the similarity ranker
//! - `resumerank-session` - The ranking pipeline and retained results
//! - `resumerank-api` - REST API

// Re-export core types
pub use resumerank_core::{
    Document, Error, Field, FieldMap, PipelineConfig, Result, ScoredDocument, Table, Vector,
};

pub use resumerank_privacy::{
    AnonymizeReport, Anonymizer, ColumnClassifier, FieldExtractor, PiiFieldKind, Redactor,
    TableStructure,
};

pub use resumerank_similarity::{Embedder, HashingEmbedder, HttpEmbedder, SimilarityRanker};

pub use resumerank_session::{
    Candidates, RankOutcome, RankRequest, RankedEntry, RankedResult, RankingSession,
    ResultHandle, StoredResult,
};

// Re-export API
pub use resumerank_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Anonymizer, Embedder, Error, HashingEmbedder, PipelineConfig, RankRequest,
        RankingSession, Redactor, Result, Table,
    };
}
