//! Agent module - participants and dialogue orchestration
//!
//! Contains the two-agent loop, per-agent history and prompt templating.

pub mod conversation;
pub mod orchestrator;
pub mod participant;
pub mod persona;
pub mod template;

pub use conversation::Conversation;
pub use orchestrator::{DialogueOrchestrator, Transcript, TranscriptLine};
pub use participant::Agent;
pub use template::{Placeholder, PromptTemplate};
