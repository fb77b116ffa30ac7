//! Errors raised while querying the meteor backend.

/// Why a fetch cycle failed.
///
/// None of these end the session: the pipeline turns each into a notice.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("server returned HTTP {status}")]
    Server { status: u16, message: Option<String> },

    /// The body of a 2xx response was not a meteor array.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The query was rejected before any request was sent.
    #[error("invalid query: {0}")]
    Validation(String),
}

impl FetchError {
    /// Text shown to the user in the error notice.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(_) => "Failed to load meteor data".to_string(),
            FetchError::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            FetchError::Server { status, .. } => format!("Server returned HTTP {status}"),
            FetchError::Decode(_) => "Received malformed meteor data".to_string(),
            FetchError::Validation(message) => message.clone(),
        }
    }
}
