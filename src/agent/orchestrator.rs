//! Dialogue orchestrator
//!
//! Alternates two agents for a fixed number of rounds. In every round the
//! responder answers the last message, then the initiator answers the
//! responder. Each turn is written to the output as `<name> : <message>`.

use std::fmt;
use std::io::{self, Stdout, Write};
use std::sync::Arc;

use crate::agent::participant::Agent;
use crate::core::{Config, Result};
use crate::llm::{CompletionProvider, OpenAiClient};

/// One printed turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub speaker: String,
    pub message: String,
}

impl fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.speaker, self.message)
    }
}

/// Turns produced by a run, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    lines: Vec<TranscriptLine>,
}

impl Transcript {
    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Message of the final turn
    pub fn last_message(&self) -> Option<&str> {
        self.lines.last().map(|l| l.message.as_str())
    }
}

/// Drives the two-agent conversation
pub struct DialogueOrchestrator<W: Write = Stdout> {
    /// Agent A: owns the seed message
    initiator: Agent,
    /// Agent B: answers first in each round
    responder: Agent,
    out: W,
    announce_seed: bool,
}

impl DialogueOrchestrator<Stdout> {
    /// Pair two agents, writing the transcript to stdout
    pub fn new(initiator: Agent, responder: Agent) -> Self {
        Self {
            initiator,
            responder,
            out: io::stdout(),
            announce_seed: false,
        }
    }

    /// Build both agents against the configured chat-completions endpoint.
    ///
    /// Fails before any request is made if the configuration is invalid or
    /// the API key is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let provider: Arc<dyn CompletionProvider> = Arc::new(OpenAiClient::from_config(config)?);
        Self::with_provider(config, provider)
    }

    /// Build both agents from configuration around an existing provider
    pub fn with_provider(config: &Config, provider: Arc<dyn CompletionProvider>) -> Result<Self> {
        config.validate()?;

        let initiator = Agent::from_persona(
            &config.agents.initiator,
            &config.completion,
            config.dialogue.max_history,
            Arc::clone(&provider),
        )?;
        let responder = Agent::from_persona(
            &config.agents.responder,
            &config.completion,
            config.dialogue.max_history,
            provider,
        )?;

        Ok(Self::new(initiator, responder).announce_seed(config.dialogue.announce_seed))
    }
}

impl<W: Write> DialogueOrchestrator<W> {
    /// Redirect transcript output
    pub fn with_output<O: Write>(self, out: O) -> DialogueOrchestrator<O> {
        DialogueOrchestrator {
            initiator: self.initiator,
            responder: self.responder,
            out,
            announce_seed: self.announce_seed,
        }
    }

    /// Whether to print the seed message before the first round
    pub fn announce_seed(mut self, announce: bool) -> Self {
        self.announce_seed = announce;
        self
    }

    pub fn initiator(&self) -> &Agent {
        &self.initiator
    }

    pub fn responder(&self) -> &Agent {
        &self.responder
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Run `rounds` rounds starting from `seed_message`.
    ///
    /// The first service error stops the run; turns completed before it
    /// stay printed and recorded in the agents' histories.
    pub async fn run(&mut self, rounds: usize, seed_message: &str) -> Result<Transcript> {
        let mut transcript = Transcript::default();

        if self.announce_seed {
            let opening = TranscriptLine {
                speaker: self.initiator.name().to_string(),
                message: seed_message.to_string(),
            };
            self.emit(&opening)?;
        }

        let mut last = seed_message.to_string();
        for round in 0..rounds {
            tracing::info!(round = round + 1, of = rounds, "Starting round");

            last = self.responder.complete(&last).await?;
            let line = TranscriptLine {
                speaker: self.responder.name().to_string(),
                message: last.clone(),
            };
            self.emit(&line)?;
            transcript.lines.push(line);

            last = self.initiator.complete(&last).await?;
            let line = TranscriptLine {
                speaker: self.initiator.name().to_string(),
                message: last.clone(),
            };
            self.emit(&line)?;
            transcript.lines.push(line);
        }

        tracing::info!(turns = transcript.len(), "Dialogue finished");
        Ok(transcript)
    }

    fn emit(&mut self, line: &TranscriptLine) -> Result<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }
}
