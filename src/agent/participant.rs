//! A single conversational participant
//!
//! An agent pairs a prompt template with its own history and a shared
//! completion provider.

use std::sync::Arc;

use crate::agent::conversation::Conversation;
use crate::agent::template::PromptTemplate;
use crate::core::config::{CompletionConfig, PersonaConfig};
use crate::core::{Message, Result};
use crate::llm::{CompletionProvider, GenerateOptions};

/// One side of the dialogue
pub struct Agent {
    name: String,
    template: PromptTemplate,
    conversation: Conversation,
    provider: Arc<dyn CompletionProvider>,
    options: GenerateOptions,
}

impl Agent {
    /// Create an agent with deterministic defaults (temperature 0, 200 tokens)
    pub fn new(
        name: impl Into<String>,
        template: PromptTemplate,
        provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            name: name.into(),
            template,
            conversation: Conversation::new(),
            provider,
            options: GenerateOptions {
                temperature: Some(0.0),
                max_tokens: Some(200),
            },
        }
    }

    /// Build an agent from persona and sampling configuration
    pub fn from_persona(
        persona: &PersonaConfig,
        completion: &CompletionConfig,
        max_history: Option<usize>,
        provider: Arc<dyn CompletionProvider>,
    ) -> Result<Self> {
        let template = PromptTemplate::parse(&persona.template)?;
        let conversation = match max_history {
            Some(limit) => Conversation::with_limit(limit),
            None => Conversation::new(),
        };

        Ok(Self::new(&persona.name, template, provider)
            .with_conversation(conversation)
            .with_options(GenerateOptions {
                temperature: Some(completion.temperature),
                max_tokens: Some(completion.max_tokens),
            }))
    }

    /// Replace the sampling options
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the (empty) history container
    pub fn with_conversation(mut self, conversation: Conversation) -> Self {
        self.conversation = conversation;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn history(&self) -> &Conversation {
        &self.conversation
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Role-structured prompt for answering `input`:
    /// rendered template, then prior history, then the input itself.
    pub fn build_prompt(&self, input: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.conversation.len() + 2);
        messages.push(Message::system(
            self.template.render(self.conversation.messages(), input),
        ));
        messages.extend(self.conversation.messages().cloned());
        messages.push(Message::user(input));
        messages
    }

    /// Generate this agent's reply to `input`.
    ///
    /// History is only extended once the provider has answered.
    pub async fn complete(&mut self, input: &str) -> Result<String> {
        let messages = self.build_prompt(input);
        tracing::debug!(
            agent = %self.name,
            prompt = %messages[0].content,
            history = self.conversation.len(),
            "Requesting completion"
        );

        let response = self
            .provider
            .chat(&messages, Some(self.options.clone()))
            .await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                agent = %self.name,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion received"
            );
        }

        self.conversation
            .record_exchange(input, response.content.clone());
        Ok(response.content)
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("history", &self.conversation.len())
            .field("provider", &self.provider.name())
            .finish()
    }
}
