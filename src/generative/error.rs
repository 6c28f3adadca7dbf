use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerativeError {
    /// Transport, auth or provider failure.
    #[error("completion request failed: {reason}")]
    Request { reason: String },

    /// The provider answered with no text.
    #[error("completion returned no text")]
    EmptyResponse,
}

impl From<genai::Error> for GenerativeError {
    fn from(err: genai::Error) -> Self {
        GenerativeError::Request {
            reason: err.to_string(),
        }
    }
}
