//! Taskwise Engine
//!
//! Turns free-form task descriptions into structured tasks by asking remote
//! language-model providers in order and falling back to the deterministic
//! extractor when none of them answers.
//!
//! # Architecture
//!
//! ```text
//! EngineConfig (TOML + env) ──> EngineContext ──> Orchestrator
//!                                                  ├── provider 1 ─┐
//!                                                  ├── provider 2 ─┤ first success wins
//!                                                  └── Extractor  <┘ when all fail
//! TaskAssistant = Orchestrator + TaskStore + TaskIndex
//! ```
//!
//! # Examples
//!
//! ```
//! use taskwise_engine::{EngineConfig, EngineContext, ProviderMode};
//! use taskwise_domain::Priority;
//!
//! # tokio_test::block_on(async {
//! let mut config = EngineConfig::default();
//! config.engine.provider_mode = ProviderMode::None;
//!
//! let context = EngineContext::from_config(config).unwrap();
//! let resolved = context.orchestrator().parse("urgent: renew passport").await;
//! assert!(resolved.is_fallback());
//! assert_eq!(resolved.value.priority, Priority::High);
//! # });
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod service;

pub use config::{
    canonical_provider, ConfigError, EngineConfig, EngineSettings, HostedProviderSettings,
    OllamaSettings, ProviderMode, ProvidersConfig,
};
pub use context::EngineContext;
pub use error::{EngineError, Result};
pub use orchestrator::{Failure, Orchestrator, Resolved, Source};
pub use service::{TaskAssistant, MAX_INPUT_CHARS, MAX_SEARCH_RESULTS};
