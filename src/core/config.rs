//! Configuration management for Duologue
//!
//! Supports environment variables, config files, and runtime overrides.
//! Secrets only ever come from the environment or the command line.
//!
//! Config file location: ~/.config/duologue/config.toml

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::agent::persona;
use crate::agent::template::PromptTemplate;
use crate::core::error::{DuologueError, Result};

/// Environment variable holding the completion-service credential
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the vector-store token
pub const VECTOR_STORE_TOKEN_VAR: &str = "ACTIVELOOP_TOKEN";

/// Main configuration for Duologue
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion service configuration
    #[serde(default)]
    pub completion: CompletionConfig,
    /// Vector store configuration (collected, never consumed)
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
    /// Dialogue loop configuration
    #[serde(default)]
    pub dialogue: DialogueConfig,
    /// The two participants
    #[serde(default)]
    pub agents: AgentsConfig,
}

/// Chat-completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL of an OpenAI-compatible API
    /// Default: https://api.openai.com/v1
    pub endpoint: String,
    /// Model name sent with every request
    /// Default: gpt-3.5-turbo
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens per turn
    pub max_tokens: u32,
    /// API credential (env or CLI only)
    #[serde(skip)]
    pub api_key: Option<SecretString>,
}

/// Vector store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Access token (env only)
    #[serde(skip)]
    pub token: Option<SecretString>,
}

/// Dialogue loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Number of rounds (responder reply + initiator reply)
    /// Default: 2
    pub rounds: usize,
    /// Opening message attributed to the initiator
    pub seed_message: String,
    /// Print the seed message before the first round
    /// Default: false
    pub announce_seed: bool,
    /// Cap on each agent's history; oldest pairs are evicted
    pub max_history: Option<usize>,
}

/// The two participants of the dialogue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    /// Agent A: owns the seed message and answers second in each round
    pub initiator: PersonaConfig,
    /// Agent B: answers first in each round
    pub responder: PersonaConfig,
}

/// Name and prompt template of one participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    pub name: String,
    pub template: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            timeout_secs: 120,
            temperature: 0.0,
            max_tokens: 200,
            api_key: None,
        }
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            rounds: 2,
            seed_message: persona::SEED_MESSAGE.to_string(),
            announce_seed: false,
            max_history: None,
        }
    }
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            initiator: PersonaConfig {
                name: persona::DEVELOPER_NAME.to_string(),
                template: persona::DEVELOPER_TEMPLATE.to_string(),
            },
            responder: PersonaConfig {
                name: persona::REPOSITORY_NAME.to_string(),
                template: persona::REPOSITORY_TEMPLATE.to_string(),
            },
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("duologue")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => {
                let default_path = Self::config_file();
                if default_path.exists() {
                    Self::load_from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a TOML file only
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DuologueError::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| DuologueError::config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| DuologueError::config(format!("Failed to parse config: {}", e)))
    }

    /// Overlay values from the environment using `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_blank(API_KEY_VAR) {
            self.completion.api_key = Some(SecretString::from(key));
        }
        if let Some(token) = non_blank(VECTOR_STORE_TOKEN_VAR) {
            self.vector_store.token = Some(SecretString::from(token));
        }
        if let Some(endpoint) = non_blank("DUOLOGUE_ENDPOINT") {
            self.completion.endpoint = endpoint;
        }
        if let Some(model) = non_blank("DUOLOGUE_MODEL") {
            self.completion.model = model;
        }
        if let Some(raw) = non_blank("DUOLOGUE_ROUNDS") {
            match raw.trim().parse() {
                Ok(rounds) => self.dialogue.rounds = rounds,
                Err(e) => tracing::warn!(
                    value = %raw,
                    error = %e,
                    default = self.dialogue.rounds,
                    "Ignoring invalid DUOLOGUE_ROUNDS"
                ),
            }
        }
    }

    /// Return the API credential or fail before any turn runs
    pub fn require_api_key(&self) -> Result<&SecretString> {
        self.completion
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or_else(|| DuologueError::missing_credential(API_KEY_VAR))
    }

    /// Parsed completion endpoint
    pub fn endpoint_url(&self) -> Result<Url> {
        Url::parse(&self.completion.endpoint).map_err(|e| {
            DuologueError::config(format!(
                "Invalid endpoint '{}': {}",
                self.completion.endpoint, e
            ))
        })
    }

    /// Check everything that can be checked without the network
    pub fn validate(&self) -> Result<()> {
        self.require_api_key()?;
        self.endpoint_url()?;
        PromptTemplate::parse(&self.agents.initiator.template)?;
        PromptTemplate::parse(&self.agents.responder.template)?;

        if let Some(cap) = self.dialogue.max_history {
            if cap < 2 {
                return Err(DuologueError::config(
                    "dialogue.max_history must be at least 2",
                ));
            }
        }
        if self.agents.initiator.name == self.agents.responder.name {
            return Err(DuologueError::config(
                "initiator and responder must have different names",
            ));
        }
        Ok(())
    }

    /// Save configuration to the default location and return the path
    pub fn save(&self) -> Result<PathBuf> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).map_err(|e| {
                DuologueError::config(format!("Failed to create config dir: {}", e))
            })?;
        }

        let content = self.to_toml()?;
        fs::write(&config_path, content)
            .map_err(|e| DuologueError::config(format!("Failed to write config: {}", e)))?;

        Ok(config_path)
    }

    /// Render as TOML (secrets are never included)
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| DuologueError::config(format!("Failed to serialize config: {}", e)))
    }
}
