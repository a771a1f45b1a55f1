pub mod ollama;
pub mod schema;
pub mod types;

pub use ollama::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Ollama is not running at {0}")]
    OllamaConnection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    OllamaError { status: u16, body: String },

    #[error("No compatible model available (wanted {0})")]
    NoModelAvailable(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

impl LlmError {
    /// Transport-level failures worth re-invoking a stage for.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::OllamaConnection(_) | Self::HttpClient(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_failures_are_transient() {
        assert!(LlmError::OllamaConnection("http://localhost:11434".into()).is_transient());
        assert!(LlmError::HttpClient("timed out".into()).is_transient());
        assert!(!LlmError::ResponseParsing("bad json".into()).is_transient());
        assert!(!LlmError::OllamaError {
            status: 404,
            body: "model not found".into()
        }
        .is_transient());
    }
}
