//! Error types for the fallible edges of the engine.
//!
//! Navigation and aggregation never fail: they degrade to a safe default. Errors only
//! surface while loading configuration or a dataset, and while validating bucket labels
//! against the configured hour convention.

/// Result type for engine operations that can fail.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error type for configuration, dataset loading and input parsing.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration file could not be read, parsed or validated.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Dataset could not be loaded.
    #[error("Dataset load error: {message} (path={path})")]
    DatasetLoad { message: String, path: String },

    /// Scripted or host input could not be understood.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl EngineError {
    pub fn configuration(message: impl Into<String>) -> Self {
        EngineError::Configuration(message.into())
    }

    pub fn dataset_load(message: impl Into<String>, path: impl AsRef<std::path::Path>) -> Self {
        EngineError::DatasetLoad {
            message: message.into(),
            path: path.as_ref().display().to_string(),
        }
    }
}

/// Reasons a time-bucket label is rejected by the strict parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    #[error("empty time label")]
    Empty,

    #[error("invalid hour in time label '{0}'")]
    InvalidHour(String),

    #[error("invalid minute in time label '{0}'")]
    InvalidMinute(String),

    #[error("unknown AM/PM marker '{marker}' in time label '{label}'")]
    UnknownMarker { label: String, marker: String },

    /// A 24-hour value carrying a marker under the 12-hour convention ("18:30 PM").
    #[error("hour {hour} cannot carry an AM/PM marker in time label '{label}'")]
    MarkerConflict { label: String, hour: u32 },
}
