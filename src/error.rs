use thiserror::Error;

/// Main error type for the quality checker.
/// Aggregates errors from the standard library, dependencies and internal modules.
#[derive(Error, Debug)]
pub enum RustyQualityError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    // Third-party library errors
    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    // Table module errors
    #[error("{0}")]
    TableError(#[from] crate::table::TableError),

    // Loader module errors
    #[error("{0}")]
    LoadError(#[from] crate::loader::LoadError),

    // Validator errors
    #[error("{0}")]
    ValidationError(#[from] crate::validate::ValidationError),

    // Map module errors
    #[error("{0}")]
    MapError(#[from] crate::map::MapError),
}

pub trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, RustyQualityError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| RustyQualityError::WithContextError(format!("{}: {}", message, e)))
    }
}
