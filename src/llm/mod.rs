//! LLM module - chat-completion integrations
//!
//! Provides the provider abstraction and an OpenAI-compatible client.

pub mod openai;
pub mod traits;

pub use openai::OpenAiClient;
pub use traits::{CompletionProvider, GenerateOptions, LLMResponse, TokenUsage};
