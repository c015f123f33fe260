use thiserror::Error;

/// Failure taxonomy of the application. Input coercion is not represented
/// here: malformed numeric input is silently defaulted to zero at the form
/// boundary and never raises.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("PDF export failed: {0}")]
    Export(String),

    #[error("{0}")]
    Attachment(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
