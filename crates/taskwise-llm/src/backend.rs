//! Chat-completion backend trait

use crate::error::Result;
use async_trait::async_trait;

/// One system + user exchange sent to a chat model
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Instructions for the model
    pub system: String,

    /// The user turn
    pub user: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Ask the backend to constrain output to a JSON value
    pub json_mode: bool,
}

/// A chat-completion endpoint
///
/// Backends only move text; prompting and response interpretation live in
/// [`ChatProvider`](crate::ChatProvider).
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Provider identity (e.g. "openai")
    fn name(&self) -> &str;

    /// Model identifier
    fn model(&self) -> &str;

    /// Whether credentials and settings allow calls at all
    fn is_configured(&self) -> bool;

    /// Send a request and return the model's text
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}
