//! Prompted implementation of the task operations over any chat backend

use crate::backend::{ChatBackend, ChatRequest};
use crate::error::{ProviderError, Result};
use crate::prompt::PromptBuilder;
use crate::provider::{ProviderDescriptor, TaskProvider};
use crate::response::{parse_priority, parse_steps, parse_tags, parse_task};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use taskwise_domain::{ParsedTask, PriorityRecommendation};
use tracing::debug;

/// A [`TaskProvider`] that prompts a chat model and reads its answers leniently
pub struct ChatProvider<B: ChatBackend> {
    backend: B,
    descriptor: ProviderDescriptor,
}

impl<B: ChatBackend> ChatProvider<B> {
    /// Wrap a backend; availability is fixed from the backend's configuration now
    pub fn new(backend: B) -> Self {
        let descriptor = ProviderDescriptor::new(backend.name())
            .with_model(backend.model())
            .with_available(backend.is_configured());
        Self {
            backend,
            descriptor,
        }
    }

    /// The wrapped backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn ask(&self, request: ChatRequest) -> Result<String> {
        if !self.descriptor.available {
            return Err(ProviderError::Unavailable(self.descriptor.identity.clone()));
        }
        debug!(
            "{}: sending {} + {} prompt chars",
            self.descriptor.identity,
            request.system.len(),
            request.user.len()
        );
        let response = self.backend.complete(&request).await?;
        debug!(
            "{}: received {} response chars",
            self.descriptor.identity,
            response.len()
        );
        if response.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(response)
    }
}

#[async_trait]
impl<B: ChatBackend> TaskProvider for ChatProvider<B> {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    async fn parse(&self, text: &str, now: NaiveDateTime) -> Result<ParsedTask> {
        let response = self.ask(PromptBuilder::parse(text, now)).await?;
        parse_task(&response)
    }

    async fn suggest_tags(&self, title: &str, description: Option<&str>) -> Result<Vec<String>> {
        let response = self
            .ask(PromptBuilder::suggest_tags(title, description))
            .await?;
        parse_tags(&response)
    }

    async fn breakdown(&self, description: &str) -> Result<Vec<String>> {
        let response = self.ask(PromptBuilder::breakdown(description)).await?;
        parse_steps(&response)
    }

    async fn recommend_priority(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<PriorityRecommendation> {
        let response = self
            .ask(PromptBuilder::recommend_priority(title, description))
            .await?;
        parse_priority(&response)
    }
}
