//! Provider capability trait and descriptors

use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::fmt;
use taskwise_domain::{ParsedTask, PriorityRecommendation};

/// The four task-understanding operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Free text to task attributes
    Parse,
    /// Category tags for a task
    SuggestTags,
    /// Ordered subtasks for a task
    Breakdown,
    /// Priority with reasoning
    RecommendPriority,
}

impl Operation {
    /// All operations, in declaration order
    pub const ALL: [Operation; 4] = [
        Operation::Parse,
        Operation::SuggestTags,
        Operation::Breakdown,
        Operation::RecommendPriority,
    ];

    /// Operation name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Parse => "parse",
            Operation::SuggestTags => "suggest_tags",
            Operation::Breakdown => "breakdown",
            Operation::RecommendPriority => "recommend_priority",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which operations a provider implements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Supports [`Operation::Parse`]
    pub parse: bool,
    /// Supports [`Operation::SuggestTags`]
    pub suggest_tags: bool,
    /// Supports [`Operation::Breakdown`]
    pub breakdown: bool,
    /// Supports [`Operation::RecommendPriority`]
    pub recommend_priority: bool,
}

impl Capabilities {
    /// Every operation supported
    pub const fn all() -> Self {
        Self {
            parse: true,
            suggest_tags: true,
            breakdown: true,
            recommend_priority: true,
        }
    }

    /// Whether `operation` is supported
    pub fn supports(&self, operation: Operation) -> bool {
        match operation {
            Operation::Parse => self.parse,
            Operation::SuggestTags => self.suggest_tags,
            Operation::Breakdown => self.breakdown,
            Operation::RecommendPriority => self.recommend_priority,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

/// Identity, capabilities and availability of a provider
///
/// Availability is decided once when the provider is built (for example,
/// a missing API key makes a provider unavailable) and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Provider identity (e.g. "openai")
    pub identity: String,

    /// Model identifier, when the provider has one
    pub model: Option<String>,

    /// Supported operations
    pub capabilities: Capabilities,

    /// Whether the provider may participate in calls
    pub available: bool,
}

impl ProviderDescriptor {
    /// Descriptor for an available provider supporting every operation
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            model: None,
            capabilities: Capabilities::all(),
            available: true,
        }
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set availability
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Set capabilities
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

/// A remote backend able to perform the task-understanding operations
///
/// Implementations make exactly one attempt per call: no retries, no
/// backoff. Any failure is reported as a [`ProviderError`](crate::ProviderError)
/// and the caller decides what to do next.
#[async_trait]
pub trait TaskProvider: Send + Sync {
    /// Identity, capabilities and availability
    fn descriptor(&self) -> &ProviderDescriptor;

    /// Parse free text into task attributes; `now` anchors relative dates
    async fn parse(&self, text: &str, now: NaiveDateTime) -> Result<ParsedTask>;

    /// Suggest category tags
    async fn suggest_tags(&self, title: &str, description: Option<&str>) -> Result<Vec<String>>;

    /// Break a task into 3 to 7 ordered steps
    async fn breakdown(&self, description: &str) -> Result<Vec<String>>;

    /// Recommend a priority with reasoning
    async fn recommend_priority(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<PriorityRecommendation>;
}
