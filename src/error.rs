use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("FileIngest: target not found ({selector})")]
    TargetNotFound { selector: String },

    #[error("FileIngest: eventTarget not found ({selector})")]
    EventTargetNotFound { selector: String },

    #[error("FileIngest: invalid options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}
