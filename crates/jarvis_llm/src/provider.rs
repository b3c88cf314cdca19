use async_trait::async_trait;
use thiserror::Error;

use crate::models::ChatMessage;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat completion timed out")]
    Timeout,

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, LLMError>;

#[async_trait]
pub trait ChatCompletionProvider: Send + Sync {
    /// Run a single non-streaming completion and return the reply text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}
