//! # resumerank Core
//!
//! Core types shared by the resumerank crates:
//!
//! - [`Table`] - string table read from and written to CSV
//! - [`Document`] / [`ScoredDocument`] - candidates of a ranking pass
//! - [`FieldMap`] - structured fields recovered from free text
//! - [`Vector`] - dense embedding vector
//! - [`PipelineConfig`] - tunables loaded from JSON
//! - [`Error`] - the error type returned by every crate in the workspace

pub mod config;
pub mod document;
pub mod error;
pub mod table;
pub mod vector;

pub use config::{PipelineConfig, DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_RETAINED_RESULTS};
pub use document::{Document, Field, FieldMap, ScoredDocument};
pub use error::{Error, Result};
pub use table::Table;
pub use vector::Vector;
