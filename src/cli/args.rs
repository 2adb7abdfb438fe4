//! Command-line arguments
//!
//! Every flag is optional and overrides the loaded configuration.

use clap::Parser;
use secrecy::SecretString;
use std::path::PathBuf;

use crate::core::Config;

/// Duologue - two LLM personas in conversation
#[derive(Parser, Debug, Default)]
#[command(name = "duologue")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file
    #[arg(long, short = 'c', env = "DUOLOGUE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of rounds to run
    #[arg(long, short = 'r')]
    pub rounds: Option<usize>,

    /// Opening message from the initiating agent
    #[arg(long, short = 's')]
    pub seed: Option<String>,

    /// Model name
    #[arg(long, short = 'm')]
    pub model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    pub endpoint: Option<String>,

    /// API key (prefer OPENAI_API_KEY)
    #[arg(long, hide = true)]
    pub api_key: Option<String>,

    /// Keep at most this many messages per agent
    #[arg(long)]
    pub max_history: Option<usize>,

    /// Print the seed message before the first round
    #[arg(long)]
    pub announce_seed: bool,

    /// Enable debug logging
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,

    /// Write the effective configuration to the default location and exit
    #[arg(long)]
    pub write_config: bool,
}

impl Args {
    /// Apply CLI overrides on top of file and environment values
    pub fn apply(&self, config: &mut Config) {
        if let Some(rounds) = self.rounds {
            config.dialogue.rounds = rounds;
        }
        if let Some(ref seed) = self.seed {
            config.dialogue.seed_message = seed.clone();
        }
        if let Some(ref model) = self.model {
            config.completion.model = model.clone();
        }
        if let Some(ref endpoint) = self.endpoint {
            config.completion.endpoint = endpoint.clone();
        }
        if let Some(ref key) = self.api_key {
            config.completion.api_key = Some(SecretString::from(key.clone()));
        }
        if self.max_history.is_some() {
            config.dialogue.max_history = self.max_history;
        }
        if self.announce_seed {
            config.dialogue.announce_seed = true;
        }
    }

    /// Default `tracing` filter when RUST_LOG is unset
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "duologue=debug"
        } else {
            "duologue=warn"
        }
    }
}
