use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandkeysError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("capture failed: {0}")]
    Capture(String),

    #[error("dispatch failed: {0}")]
    Dispatch(String),

    #[error("unknown gesture '{0}'")]
    UnknownGesture(String),

    #[error("unknown accessibility command '{0}'")]
    UnknownCommand(String),

    #[error("unknown action type '{0}': expected 'Open App' or 'Accessibility Option'")]
    UnknownActionType(String),

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HandkeysError>;
