use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    /// A conditional write lost against a newer version of `key`.
    #[error("precondition failed for key: {key}")]
    PreconditionFailed { key: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("S3 {operation} failed for {target}: {message}")]
    S3 {
        operation: &'static str,
        target: String,
        message: String,
    },
}

impl StorageError {
    pub(crate) fn s3(operation: &'static str, target: &str, message: impl ToString) -> Self {
        Self::S3 {
            operation,
            target: target.to_string(),
            message: message.to_string(),
        }
    }
}
