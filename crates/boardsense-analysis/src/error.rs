use std::path::PathBuf;
use thiserror::Error;

use boardsense_model::BoardError;

/// Errors raised around an analysis run. Structural findings about a board
/// are never errors; they are reported as diagnostics.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The snapshot could not be decoded
    #[error(transparent)]
    Board(#[from] BoardError),

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML or JSON
    #[error("Config parsing error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// A severity name that is not part of the taxonomy
    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),
}

impl AnalysisError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AnalysisError::Board(err) => err.error_code(),
            AnalysisError::InvalidConfig(_) => "ERR_ANALYSIS_INVALID_CONFIG",
            AnalysisError::ConfigFile { .. } => "ERR_ANALYSIS_CONFIG_FILE",
            AnalysisError::ConfigParse(_) => "ERR_ANALYSIS_CONFIG_PARSE",
            AnalysisError::UnknownSeverity(_) => "ERR_ANALYSIS_UNKNOWN_SEVERITY",
        }
    }
}

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
