//! Configuration file parsing for the engine.
//!
//! Loads provider selection, per-provider settings and extractor tuning
//! from TOML, then applies environment overrides on top.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use taskwise_extractor::ExtractorConfig;
use thiserror::Error;

/// Engine configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("Failed to serialize config TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// An environment variable holds a value the engine does not accept
    #[error("Invalid value for {name}: {value}")]
    InvalidEnv {
        /// Variable name
        name: &'static str,
        /// Rejected value
        value: String,
    },

    /// Semantic validation failed
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Environment variable selecting the provider mode
pub const PROVIDER_MODE_ENV: &str = "AI_PROVIDER";
/// Environment variable holding the OpenAI key
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable holding the Google AI key
pub const GOOGLE_KEY_ENV: &str = "GOOGLE_AI_API_KEY";
/// Environment variable with the Ollama endpoint
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";
/// Environment variable with the Ollama model
pub const OLLAMA_MODEL_ENV: &str = "OLLAMA_MODEL";

/// Provider identities understood in `provider_order`
pub const KNOWN_PROVIDERS: [&str; 3] = ["openai", "google", "ollama"];

const REDACTED: &str = "********";

/// Which providers take part in orchestration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderMode {
    /// Every enabled provider, in `provider_order`
    #[default]
    Auto,
    /// OpenAI only
    OpenAi,
    /// Google Gemini only
    Google,
    /// Local Ollama only
    Ollama,
    /// No remote providers; always use the extractor
    None,
}

impl ProviderMode {
    /// Mode name as written in config and `AI_PROVIDER`
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderMode::Auto => "auto",
            ProviderMode::OpenAi => "openai",
            ProviderMode::Google => "google",
            ProviderMode::Ollama => "ollama",
            ProviderMode::None => "none",
        }
    }

    /// Parse a mode name, case-insensitively; "gemini" is accepted for Google
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(ProviderMode::Auto),
            "openai" => Some(ProviderMode::OpenAi),
            "google" | "gemini" => Some(ProviderMode::Google),
            "ollama" => Some(ProviderMode::Ollama),
            "none" | "off" => Some(ProviderMode::None),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `[engine]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Provider selection mode
    #[serde(default)]
    pub provider_mode: ProviderMode,

    /// Attempt order used in `auto` mode
    #[serde(default = "default_provider_order")]
    pub provider_order: Vec<String>,

    /// Upper bound on a single provider attempt, in seconds
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,

    /// Maximum number of subtasks kept from a provider breakdown
    #[serde(default = "default_max_subtasks")]
    pub max_subtasks: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            provider_mode: ProviderMode::default(),
            provider_order: default_provider_order(),
            attempt_timeout_secs: default_attempt_timeout_secs(),
            max_subtasks: default_max_subtasks(),
        }
    }
}

/// Settings for a hosted provider that authenticates with an API key
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedProviderSettings {
    /// Participate in `auto` mode
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// API key; usually supplied through the environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Endpoint override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for HostedProviderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            model: None,
            base_url: None,
        }
    }
}

// Keys never reach logs through Debug.
impl fmt::Debug for HostedProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostedProviderSettings")
            .field("enabled", &self.enabled)
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Settings for a local Ollama server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OllamaSettings {
    /// Participate in `auto` mode
    #[serde(default)]
    pub enabled: bool,

    /// Server endpoint
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model name
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// `[providers.*]` sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// `[providers.openai]`
    #[serde(default)]
    pub openai: HostedProviderSettings,

    /// `[providers.gemini]`
    #[serde(default)]
    pub gemini: HostedProviderSettings,

    /// `[providers.ollama]`
    #[serde(default)]
    pub ollama: OllamaSettings,
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Orchestration settings
    #[serde(default)]
    pub engine: EngineSettings,

    /// Provider settings
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Deterministic extractor settings
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

fn default_provider_order() -> Vec<String> {
    KNOWN_PROVIDERS.iter().map(|s| s.to_string()).collect()
}

fn default_attempt_timeout_secs() -> u64 {
    30
}

fn default_max_subtasks() -> usize {
    7
}

fn default_true() -> bool {
    true
}

fn default_ollama_host() -> String {
    taskwise_llm::ollama::DEFAULT_ENDPOINT.to_string()
}

fn default_ollama_model() -> String {
    taskwise_llm::ollama::DEFAULT_MODEL.to_string()
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides using `lookup` to read variables
    ///
    /// Blank values are ignored. Setting `OLLAMA_HOST` or `OLLAMA_MODEL`
    /// enables the Ollama provider.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(value) = get(PROVIDER_MODE_ENV) {
            self.engine.provider_mode =
                ProviderMode::parse(&value).ok_or(ConfigError::InvalidEnv {
                    name: PROVIDER_MODE_ENV,
                    value,
                })?;
        }
        if let Some(key) = get(OPENAI_KEY_ENV) {
            self.providers.openai.api_key = Some(key);
        }
        if let Some(key) = get(GOOGLE_KEY_ENV) {
            self.providers.gemini.api_key = Some(key);
        }
        if let Some(host) = get(OLLAMA_HOST_ENV) {
            self.providers.ollama.host = host;
            self.providers.ollama.enabled = true;
        }
        if let Some(model) = get(OLLAMA_MODEL_ENV) {
            self.providers.ollama.model = model;
            self.providers.ollama.enabled = true;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.attempt_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "attempt_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if !(3..=7).contains(&self.engine.max_subtasks) {
            return Err(ConfigError::Invalid(
                "max_subtasks must be between 3 and 7".to_string(),
            ));
        }
        if let Some(unknown) = self
            .engine
            .provider_order
            .iter()
            .find(|name| canonical_provider(name).is_none())
        {
            return Err(ConfigError::Invalid(format!(
                "Unknown provider in provider_order: {}",
                unknown
            )));
        }
        self.extractor.validate().map_err(ConfigError::Invalid)
    }

    /// Copy with every API key replaced by a placeholder
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        for settings in [&mut config.providers.openai, &mut config.providers.gemini] {
            if settings.api_key.is_some() {
                settings.api_key = Some(REDACTED.to_string());
            }
        }
        config
    }

    /// Provider identities to build, in attempt order
    pub fn active_providers(&self) -> Vec<&'static str> {
        match self.engine.provider_mode {
            ProviderMode::None => Vec::new(),
            ProviderMode::OpenAi => vec!["openai"],
            ProviderMode::Google => vec!["google"],
            ProviderMode::Ollama => vec!["ollama"],
            ProviderMode::Auto => {
                let mut active: Vec<&'static str> = Vec::new();
                for name in &self.engine.provider_order {
                    let Some(identity) = canonical_provider(name) else {
                        continue;
                    };
                    if self.is_enabled(identity) && !active.contains(&identity) {
                        active.push(identity);
                    }
                }
                active
            }
        }
    }

    fn is_enabled(&self, identity: &str) -> bool {
        match identity {
            "openai" => self.providers.openai.enabled,
            "google" => self.providers.gemini.enabled,
            "ollama" => self.providers.ollama.enabled,
            _ => false,
        }
    }
}

/// Map a configured provider name to its identity
pub fn canonical_provider(name: &str) -> Option<&'static str> {
    match name.trim().to_ascii_lowercase().as_str() {
        "openai" => Some("openai"),
        "google" | "gemini" => Some("google"),
        "ollama" => Some("ollama"),
        _ => None,
    }
}
