//! Ollama backend
//!
//! Talks to a local Ollama instance through its generate API, so tasks can
//! be understood without sending text to a hosted service.
//!
//! # Examples
//!
//! ```no_run
//! use taskwise_llm::{ChatProvider, OllamaBackend};
//!
//! let provider = ChatProvider::new(OllamaBackend::new("http://localhost:11434", "llama3"));
//! ```

use crate::backend::{ChatBackend, ChatRequest};
use crate::error::{ProviderError, Result};
use crate::transport::{http_client, send_json, DEFAULT_TIMEOUT_SECS};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default model
pub const DEFAULT_MODEL: &str = "llama3";

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Ollama API backend for local LLM inference
pub struct OllamaBackend {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "qwen2")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client: http_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }

    /// Create a backend on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the HTTP request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client(timeout);
        self
    }
}

#[async_trait]
impl ChatBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    /// A local endpoint needs no credentials; only blank settings disable it
    fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty() && !self.model.trim().is_empty()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/api/generate", self.endpoint.trim_end_matches('/'));

        let body = OllamaGenerateRequest {
            model: &self.model,
            system: &request.system,
            prompt: &request.user,
            stream: false,
            format: request.json_mode.then_some("json"),
            options: OllamaOptions {
                temperature: request.temperature,
            },
        };

        let response: OllamaGenerateResponse =
            send_json(self.client.post(&url).json(&body), &self.model).await?;

        if response.response.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(response.response)
    }
}
