//! Duologue - two LLM personas in conversation
//!
//! A "developer" and a "repository" take turns answering each other through
//! an OpenAI-compatible chat-completions API. Each has its own prompt
//! template and its own memory of the exchange.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Completion provider abstraction with an OpenAI-compatible client
//! - **Agent**: Prompt templates, per-agent history and the dialogue loop
//! - **CLI**: Command-line arguments
//!
//! # Usage
//!
//! ```rust,no_run
//! use duologue::{Config, DialogueOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> duologue::Result<()> {
//!     let config = Config::load(None)?;
//!     let mut dialogue = DialogueOrchestrator::from_config(&config)?;
//!     dialogue.run(2, &config.dialogue.seed_message).await?;
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod llm;

// Re-export commonly used items
pub use agent::{Agent, DialogueOrchestrator, Transcript};
pub use cli::Args;
pub use core::{Config, DuologueError, Result};
