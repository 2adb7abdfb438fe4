//! Prompt templates
//!
//! A template is static text with `{history}` and `{input}` placeholders.
//! `{{` and `}}` produce literal braces. Rendering is a pure function of
//! the template, the history and the input.

use crate::core::{DuologueError, Message, Result};

/// A named slot in a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Flattened conversation so far
    History,
    /// The message being answered
    Input,
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "history" => Some(Self::History),
            "input" => Some(Self::Input),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot(Placeholder),
}

/// Parsed prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse template text, rejecting unknown placeholders and stray braces
    pub fn parse(text: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(DuologueError::config(format!(
                            "Unclosed '{{' at byte {} in prompt template",
                            pos
                        )));
                    }
                    let slot = Placeholder::from_name(name.trim()).ok_or_else(|| {
                        DuologueError::config(format!(
                            "Unknown placeholder '{{{}}}' in prompt template",
                            name
                        ))
                    })?;
                    if !literal.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(slot));
                }
                '}' => {
                    return Err(DuologueError::config(format!(
                        "Unmatched '}}' at byte {} in prompt template",
                        pos
                    )));
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Text(literal));
        }

        Ok(Self { segments })
    }

    /// Placeholders in order of appearance
    pub fn placeholders(&self) -> Vec<Placeholder> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Slot(p) => Some(*p),
                Segment::Text(_) => None,
            })
            .collect()
    }

    /// Substitute history and input into the template
    pub fn render<'a, I>(&self, history: I, input: &str) -> String
    where
        I: IntoIterator<Item = &'a Message>,
    {
        let history = format_history(history);
        let mut out = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Slot(Placeholder::History) => out.push_str(&history),
                Segment::Slot(Placeholder::Input) => out.push_str(input),
            }
        }
        out
    }
}

/// Flatten history into `Human: …` / `AI: …` lines
pub fn format_history<'a, I>(history: I) -> String
where
    I: IntoIterator<Item = &'a Message>,
{
    history
        .into_iter()
        .map(|m| format!("{}: {}", m.role.transcript_prefix(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}
