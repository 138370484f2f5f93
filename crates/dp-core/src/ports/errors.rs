use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActivationPortError {
    #[error("activator rejected request ({code}): {message}")]
    Rejected { code: String, message: String },

    #[error("activator unavailable: {0}")]
    Unavailable(String),
}

impl ActivationPortError {
    pub fn code(&self) -> &str {
        match self {
            Self::Rejected { code, .. } => code,
            Self::Unavailable(_) => "ACTIVATOR_UNAVAILABLE",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Unavailable(reason) => reason.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum HomeBackendError {
    #[error("home not found: {0}")]
    NotFound(String),

    #[error("home backend request failed: {0}")]
    Request(String),
}
