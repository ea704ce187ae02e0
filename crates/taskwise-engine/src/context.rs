//! One-time construction of providers and the extractor
//!
//! Everything expensive or fallible happens here, once: reading the lexicon
//! overlay, deciding which providers exist and whether each has the
//! credentials it needs. The resulting context hands out cheap
//! [`Orchestrator`] clones sharing the same providers and lexicon.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::orchestrator::Orchestrator;
use std::sync::Arc;
use std::time::Duration;
use taskwise_extractor::Extractor;
use taskwise_llm::{
    ChatProvider, GeminiBackend, OllamaBackend, OpenAiBackend, ProviderDescriptor, TaskProvider,
};
use tracing::info;

/// Validated configuration plus the providers and extractor built from it
pub struct EngineContext {
    config: EngineConfig,
    extractor: Extractor,
    providers: Vec<Arc<dyn TaskProvider>>,
}

impl EngineContext {
    /// Validate `config` and build every selected provider
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let extractor = Extractor::from_config(config.extractor.clone())?;

        let timeout = Duration::from_secs(config.engine.attempt_timeout_secs);
        let providers: Vec<Arc<dyn TaskProvider>> = config
            .active_providers()
            .into_iter()
            .filter_map(|identity| build_provider(identity, &config, timeout))
            .collect();

        info!(
            "Engine configured: mode={}, providers={}",
            config.engine.provider_mode,
            providers.len()
        );

        Ok(Self {
            config,
            extractor,
            providers,
        })
    }

    /// Build a context around externally constructed providers
    pub fn with_providers(config: EngineConfig, providers: Vec<Arc<dyn TaskProvider>>) -> Result<Self> {
        config.validate()?;
        let extractor = Extractor::from_config(config.extractor.clone())?;
        Ok(Self {
            config,
            extractor,
            providers,
        })
    }

    /// An orchestrator over the available providers
    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(self.providers.clone(), self.extractor.clone())
            .with_attempt_timeout(Duration::from_secs(self.config.engine.attempt_timeout_secs))
            .with_max_subtasks(self.config.engine.max_subtasks)
    }

    /// Every configured provider, available or not, in attempt order
    pub fn descriptors(&self) -> impl Iterator<Item = &ProviderDescriptor> + '_ {
        self.providers.iter().map(|p| p.descriptor())
    }

    /// The effective configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The shared extractor
    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }
}

fn build_provider(
    identity: &str,
    config: &EngineConfig,
    timeout: Duration,
) -> Option<Arc<dyn TaskProvider>> {
    let providers = &config.providers;
    match identity {
        "openai" => {
            let settings = &providers.openai;
            let mut backend = OpenAiBackend::new(settings.api_key.clone()).with_timeout(timeout);
            if let Some(model) = &settings.model {
                backend = backend.with_model(model.clone());
            }
            if let Some(url) = &settings.base_url {
                backend = backend.with_base_url(url.clone());
            }
            Some(Arc::new(ChatProvider::new(backend)))
        }
        "google" => {
            let settings = &providers.gemini;
            let mut backend = GeminiBackend::new(settings.api_key.clone()).with_timeout(timeout);
            if let Some(model) = &settings.model {
                backend = backend.with_model(model.clone());
            }
            if let Some(url) = &settings.base_url {
                backend = backend.with_base_url(url.clone());
            }
            Some(Arc::new(ChatProvider::new(backend)))
        }
        "ollama" => {
            let settings = &providers.ollama;
            let backend = OllamaBackend::new(settings.host.clone(), settings.model.clone())
                .with_timeout(timeout);
            Some(Arc::new(ChatProvider::new(backend)))
        }
        _ => None,
    }
}
