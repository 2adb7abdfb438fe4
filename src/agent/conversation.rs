//! Conversation history management
//!
//! Each agent owns one `Conversation`. History is append-only unless a cap
//! is configured, in which case the oldest exchange is evicted as a pair.

use std::collections::VecDeque;

use crate::core::{Message, Role};

/// Manages one agent's conversation history
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    /// Message history
    messages: VecDeque<Message>,
    /// Maximum history length, `None` for unbounded
    max_length: Option<usize>,
}

impl Conversation {
    /// Create an unbounded conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation that keeps at most `max_length` messages
    pub fn with_limit(max_length: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            max_length: Some(max_length.max(2)),
        }
    }

    /// Record one completed exchange
    pub fn record_exchange(&mut self, input: impl Into<String>, reply: impl Into<String>) {
        self.messages.push_back(Message::user(input));
        self.messages.push_back(Message::assistant(reply));
        self.evict();
    }

    /// Drop the oldest exchanges while over the limit
    fn evict(&mut self) {
        let Some(max) = self.max_length else {
            return;
        };

        let mut dropped = 0;
        while self.messages.len() > max {
            self.messages.pop_front();
            // Keep history starting on a human turn
            if matches!(self.messages.front(), Some(m) if m.role == Role::Assistant) {
                self.messages.pop_front();
            }
            dropped += 1;
        }

        if dropped > 0 {
            tracing::debug!(dropped, kept = self.messages.len(), "Evicted old history");
        }
    }

    /// Messages in order, oldest first
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Get the last assistant message
    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }

    /// Configured limit
    pub fn limit(&self) -> Option<usize> {
        self.max_length
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Get message count
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_basic() {
        let mut conv = Conversation::new();
        conv.record_exchange("Hello", "Hi there!");

        assert_eq!(conv.len(), 2);
        assert_eq!(conv.last_assistant_message().unwrap().content, "Hi there!");
        let roles: Vec<Role> = conv.messages().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
    }

    #[test]
    fn test_unbounded_keeps_everything() {
        let mut conv = Conversation::new();
        for i in 0..50 {
            conv.record_exchange(format!("q{i}"), format!("a{i}"));
        }
        assert_eq!(conv.len(), 100);
        assert_eq!(conv.messages().next().unwrap().content, "q0");
    }

    #[test]
    fn test_limit_evicts_whole_pairs() {
        let mut conv = Conversation::with_limit(4);
        conv.record_exchange("1", "2");
        conv.record_exchange("3", "4");
        conv.record_exchange("5", "6");

        assert_eq!(conv.len(), 4);
        let contents: Vec<&str> = conv.messages().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["3", "4", "5", "6"]);
    }

    #[test]
    fn test_odd_limit_still_starts_with_user() {
        let mut conv = Conversation::with_limit(3);
        conv.record_exchange("1", "2");
        conv.record_exchange("3", "4");

        assert_eq!(conv.len(), 2);
        assert_eq!(conv.messages().next().unwrap().role, Role::User);
    }

    #[test]
    fn test_clear() {
        let mut conv = Conversation::new();
        conv.record_exchange("a", "b");
        conv.clear();
        assert!(conv.is_empty());
    }
}
