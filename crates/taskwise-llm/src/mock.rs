//! Mock chat backend for deterministic testing

use crate::backend::{ChatBackend, ChatRequest};
use crate::error::{ProviderError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Error,
    RateLimited,
}

/// Mock chat backend that returns pre-configured responses
///
/// Responses are scripted by substring of the user prompt; the first
/// matching pattern wins, otherwise the default response is returned. No
/// network calls are made.
///
/// # Examples
///
/// ```
/// use taskwise_llm::{ChatProvider, MockBackend, TaskProvider};
///
/// # tokio_test::block_on(async {
/// let mut backend = MockBackend::default();
/// backend.add_response("Break down this task", r#"["Draft", "Review", "Send"]"#);
///
/// let provider = ChatProvider::new(backend.clone());
/// let steps = provider.breakdown("write the newsletter").await.unwrap();
/// assert_eq!(steps, ["Draft", "Review", "Send"]);
/// assert_eq!(backend.call_count(), 1);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockBackend {
    name: String,
    configured: bool,
    delay: Option<Duration>,
    default_response: String,
    responses: Arc<Mutex<Vec<(String, Scripted)>>>,
    call_count: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Create a backend with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            name: "mock".to_string(),
            configured: true,
            delay: None,
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A backend that reports itself as not configured
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::default()
        }
    }

    /// Set the provider identity
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sleep before answering, for timeout tests
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Reply with `response` when the user prompt contains `pattern`
    pub fn add_response(&mut self, pattern: impl Into<String>, response: impl Into<String>) {
        self.script(pattern.into(), Scripted::Reply(response.into()));
    }

    /// Fail with a communication error when the user prompt contains `pattern`
    pub fn add_error(&mut self, pattern: impl Into<String>) {
        self.script(pattern.into(), Scripted::Error);
    }

    /// Fail with a rate-limit error when the user prompt contains `pattern`
    pub fn add_rate_limit(&mut self, pattern: impl Into<String>) {
        self.script(pattern.into(), Scripted::RateLimited);
    }

    /// Number of completed or failed calls
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }

    fn script(&mut self, pattern: String, reply: Scripted) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((pattern, reply));
    }

    fn lookup(&self, prompt: &str) -> Option<Scripted> {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(pattern, _)| prompt.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.lookup(&request.user) {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Error) => Err(ProviderError::Communication("Mock error".to_string())),
            Some(Scripted::RateLimited) => Err(ProviderError::RateLimited),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user: &str) -> ChatRequest {
        ChatRequest {
            system: String::new(),
            user: user.to_string(),
            temperature: 0.0,
            json_mode: false,
        }
    }

    #[tokio::test]
    async fn test_mock_backend_default() {
        let backend = MockBackend::new("Test response");
        let result = backend.complete(&request("any prompt")).await.unwrap();
        assert_eq!(result, "Test response");
    }

    #[tokio::test]
    async fn test_mock_backend_scripted_responses() {
        let mut backend = MockBackend::default();
        backend.add_response("hello", "world");
        backend.add_response("foo", "bar");

        assert_eq!(backend.complete(&request("say hello")).await.unwrap(), "world");
        assert_eq!(backend.complete(&request("foo!")).await.unwrap(), "bar");
        assert_eq!(
            backend.complete(&request("unknown")).await.unwrap(),
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_backend_failures() {
        let mut backend = MockBackend::default();
        backend.add_error("bad prompt");
        backend.add_rate_limit("busy");

        assert!(matches!(
            backend.complete(&request("a bad prompt")).await,
            Err(ProviderError::Communication(_))
        ));
        assert!(matches!(
            backend.complete(&request("too busy")).await,
            Err(ProviderError::RateLimited)
        ));
    }

    #[tokio::test]
    async fn test_mock_backend_call_count_shared_by_clones() {
        let backend = MockBackend::new("test");
        let clone = backend.clone();

        backend.complete(&request("one")).await.unwrap();
        clone.complete(&request("two")).await.unwrap();
        assert_eq!(backend.call_count(), 2);
        assert_eq!(clone.call_count(), 2);

        backend.reset_call_count();
        assert_eq!(clone.call_count(), 0);
    }

    #[test]
    fn test_unconfigured() {
        assert!(!MockBackend::unconfigured().is_configured());
        assert!(MockBackend::default().is_configured());
    }
}
