pub mod models;
pub mod openai;
pub mod provider;

pub use models::{jarvis_messages, ChatMessage, Role, JARVIS_SYSTEM_PROMPT};
pub use openai::OpenAIChatClient;
pub use provider::{ChatCompletionProvider, LLMError, Result};
