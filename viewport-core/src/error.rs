use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("invalid JSON frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("command `{0}` carries no payload")]
    MissingPayload(&'static str),
}
