/// Domain-level error type shared across the core modules.
///
/// HTTP status mapping lives in the `api` crate; core code only
/// distinguishes the failure classes.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A request carried invalid or missing data.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Staging an uploaded file failed.
    #[error("Storage error: {0}")]
    Storage(#[source] std::io::Error),

    /// The worker process could not be spawned.
    #[error("Failed to launch worker: {0}")]
    Launch(String),

    /// Internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
