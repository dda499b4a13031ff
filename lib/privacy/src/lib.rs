//! # resumerank Privacy
//!
//! Best-effort PII handling for resumes, before ranking and before results
//! leave the process.
//!
//! - [`Redactor`] - ordered detect-and-replace rules over free text
//! - [`FieldExtractor`] - recovers labeled fields from unstructured text
//! - [`ColumnClassifier`] - classifies table columns by name
//! - [`Anonymizer`] - applies all of the above to a [`Table`](resumerank_core::Table)
//!
//! ## Example
//!
//! ```rust
//! use resumerank_privacy::redact;
//!
//! let safe = redact("Name: Jane Doe\nContact: jane@example.com");
//! assert_eq!(safe, "Name: <NAME>\nContact: <EMAIL>");
//! ```

pub mod anonymize;
pub mod classifier;
pub mod extractor;
pub mod redactor;

pub use anonymize::{fields_from_table, AnonymizeReport, Anonymizer};
pub use classifier::{field_kind, ColumnClassifier, ColumnRole, TableStructure};
pub use extractor::{FieldExtractor, Line, Section};
pub use redactor::{redact, PiiFieldKind, Redactor};
