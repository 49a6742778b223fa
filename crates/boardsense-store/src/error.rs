use thiserror::Error;

/// Errors raised by a vector store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A vector's length differs from the namespace's dimension
    #[error("Dimension mismatch in namespace '{namespace}': expected {expected}, got {actual}")]
    DimensionMismatch {
        namespace: String,
        expected: usize,
        actual: usize,
    },

    /// Vectors must have at least one component
    #[error("Empty vector")]
    EmptyVector,
}

impl StoreError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::DimensionMismatch { .. } => "ERR_STORE_DIMENSION_MISMATCH",
            StoreError::EmptyVector => "ERR_STORE_EMPTY_VECTOR",
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
