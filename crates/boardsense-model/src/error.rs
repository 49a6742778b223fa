use thiserror::Error;

/// Errors raised while turning raw input into a board snapshot.
///
/// Structurally odd boards never produce one of these; only input that cannot
/// be read as a snapshot object at all does.
#[derive(Error, Debug)]
pub enum BoardError {
    /// The top-level value is not an object
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Errors that occur during JSON parsing
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Errors that occur during YAML parsing
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Reading the snapshot source failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl BoardError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BoardError::InvalidSnapshot(_) => "ERR_BOARD_INVALID_SNAPSHOT",
            BoardError::JsonError(_) => "ERR_BOARD_JSON_PARSE",
            BoardError::YamlError(_) => "ERR_BOARD_YAML_PARSE",
            BoardError::IoError(_) => "ERR_BOARD_IO",
        }
    }
}
