use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(String),
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Failures of the file-system front end. The parsing core itself never fails.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("NoFilesFound")]
    NoFilesFound { guidance: String },
    #[error("Failed to read manuscript {path}: {message}")]
    Read { path: String, message: String },
    #[error("NotUtf8: {path}")]
    NotUtf8 { path: String },
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("WriteFailed: {0}")]
    WriteFailed(String),
}
