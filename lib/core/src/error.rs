use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input table has no rows")]
    InputEmpty,

    #[error("Job description is missing or empty")]
    MissingReference,

    #[error("No ranked result is available yet")]
    NoPriorResult,

    #[error("Ranked result not found: {0}")]
    ResultNotFound(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Embedding count mismatch: expected {expected}, got {actual}")]
    EmbeddingCountMismatch { expected: usize, actual: usize },

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Table error: {0}")]
    Table(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Stable, machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InputEmpty => "input_empty",
            Error::MissingReference => "missing_reference",
            Error::NoPriorResult => "no_prior_result",
            Error::ResultNotFound(_) => "result_not_found",
            Error::UnknownColumn(_) => "unknown_column",
            Error::Embedding(_) | Error::EmbeddingCountMismatch { .. } => "embedding_failure",
            Error::InvalidDimension { .. } => "invalid_dimension",
            Error::Table(_) | Error::Csv(_) => "invalid_table",
            Error::Io(_) => "io",
            Error::InvalidConfig(_) => "invalid_config",
        }
    }

    /// Whether the error was caused by the caller's input rather than by a collaborator
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::InputEmpty
                | Error::MissingReference
                | Error::UnknownColumn(_)
                | Error::Table(_)
                | Error::Csv(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_errors_share_kind() {
        assert_eq!(Error::Embedding("boom".into()).kind(), "embedding_failure");
        let mismatch = Error::EmbeddingCountMismatch { expected: 3, actual: 2 };
        assert_eq!(mismatch.kind(), "embedding_failure");
        assert_eq!(mismatch.to_string(), "Embedding count mismatch: expected 3, got 2");
    }

    #[test]
    fn test_input_errors() {
        assert!(Error::InputEmpty.is_input_error());
        assert!(Error::MissingReference.is_input_error());
        assert!(!Error::NoPriorResult.is_input_error());
        assert_ne!(Error::InputEmpty.kind(), Error::NoPriorResult.kind());
    }
}
