use thiserror::Error;

pub type RosterResult<T> = Result<T, RosterError>;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("unsupported roster format '{0}': expected .xlsx or .xls")]
    UnsupportedFormat(String),

    #[error("failed to open roster file: {0}")]
    FileAccess(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("credential error: {0}")]
    Credential(String),

    #[error("validation error: {0}")]
    Validation(String),
}
