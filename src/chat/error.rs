use std::time::Duration;

pub const CONFIG_MISSING_TEXT: &str = "The chat service is not configured yet. Please try again later.";
pub const NETWORK_TEXT: &str = "Could not connect to the chat service. Please try again.";
pub const TIMEOUT_TEXT: &str =
    "The chat service is taking too long to answer. Please try again in a moment.";
pub const SERVICE_ERROR_PREFIX: &str = "Sorry, the service ran into a problem: ";
pub const NO_ANSWER_TEXT: &str = "No answer was received from the server.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SendError {
    #[error("input is empty")]
    EmptyInput,

    #[error("a message is already being sent")]
    Busy,

    #[error("no chat endpoint configured")]
    ConfigMissing,

    #[error("network failure: {0}")]
    Network(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("endpoint returned {status}")]
    Http { status: u16, detail: Option<String> },

    #[error("endpoint response had no reply")]
    MalformedResponse,
}

impl SendError {
    /// Text for the assistant bubble that reports this failure.
    pub fn user_message(&self) -> String {
        match self {
            SendError::EmptyInput | SendError::Busy => String::new(),
            SendError::ConfigMissing => CONFIG_MISSING_TEXT.to_string(),
            SendError::Network(_) => NETWORK_TEXT.to_string(),
            SendError::Timeout(_) => TIMEOUT_TEXT.to_string(),
            SendError::Http {
                detail: Some(detail),
                ..
            } => format!("{SERVICE_ERROR_PREFIX}{detail}"),
            SendError::Http { status, detail: None } => {
                format!("{SERVICE_ERROR_PREFIX}HTTP {status}")
            }
            SendError::MalformedResponse => NO_ANSWER_TEXT.to_string(),
        }
    }

    /// Rejections that never leave a trace in the conversation.
    pub fn is_silent(&self) -> bool {
        matches!(self, SendError::EmptyInput | SendError::Busy)
    }
}
