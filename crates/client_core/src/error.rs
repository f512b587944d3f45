use thiserror::Error;

/// The request never produced a usable service answer.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        Self::new(value.to_string())
    }
}

impl From<url::ParseError> for TransportError {
    fn from(value: url::ParseError) -> Self {
        Self::new(format!("invalid endpoint url: {value}"))
    }
}

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("service rejected request: {0}")]
    Application(String),
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
}
