//! Sequential provider fallback
//!
//! The orchestrator tries each available provider in order and returns the
//! first success. When every provider fails, or none is configured, the
//! deterministic extractor answers instead, so every operation here is
//! total.
//!
//! Two rules sit on top of whichever source answered:
//!
//! - explicit priority keywords in the input override the returned
//!   priority (for `parse` and `recommend_priority`)
//! - provider breakdowns are capped at the configured subtask count

use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use taskwise_domain::{ParsedTask, Priority, PriorityRecommendation};
use taskwise_extractor::Extractor;
use taskwise_llm::{Operation, ProviderDescriptor, ProviderError, TaskProvider};
use tracing::{debug, info, warn};

/// Default upper bound on one provider attempt
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default cap on provider breakdown length
pub const DEFAULT_MAX_SUBTASKS: usize = 7;

type Attempt<'a, T> = Pin<Box<dyn Future<Output = taskwise_llm::Result<T>> + Send + 'a>>;

/// Where a result came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A remote provider, by identity
    Provider(String),
    /// The rule-based extractor
    Fallback,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Provider(identity) => f.write_str(identity),
            Source::Fallback => f.write_str("rule-based"),
        }
    }
}

/// A provider attempt that did not produce a result
#[derive(Debug)]
pub struct Failure {
    /// Provider identity
    pub provider: String,
    /// What went wrong
    pub error: ProviderError,
}

/// Result of an orchestrated operation
#[derive(Debug)]
pub struct Resolved<T> {
    /// The answer
    pub value: T,
    /// Who produced it
    pub source: Source,
    /// Providers that were tried and failed first, in attempt order
    pub failures: Vec<Failure>,
}

impl<T> Resolved<T> {
    /// Whether the extractor produced the answer
    pub fn is_fallback(&self) -> bool {
        self.source == Source::Fallback
    }

    /// Discard provenance
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Ordered provider fallback with a deterministic last resort
#[derive(Clone)]
pub struct Orchestrator {
    providers: Vec<Arc<dyn TaskProvider>>,
    extractor: Extractor,
    attempt_timeout: Duration,
    max_subtasks: usize,
}

impl Orchestrator {
    /// Build from providers in attempt order
    ///
    /// Providers whose descriptor is marked unavailable are dropped here and
    /// never attempted.
    pub fn new(providers: Vec<Arc<dyn TaskProvider>>, extractor: Extractor) -> Self {
        let providers: Vec<_> = providers
            .into_iter()
            .filter(|provider| {
                let descriptor = provider.descriptor();
                if !descriptor.available {
                    warn!("Provider '{}' is unavailable; skipping it", descriptor.identity);
                }
                descriptor.available
            })
            .collect();

        info!(
            "Orchestrator ready with {} provider(s): [{}]",
            providers.len(),
            providers
                .iter()
                .map(|p| p.descriptor().identity.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Self {
            providers,
            extractor,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            max_subtasks: DEFAULT_MAX_SUBTASKS,
        }
    }

    /// Orchestrator with no providers; every call uses the extractor
    pub fn rule_based(extractor: Extractor) -> Self {
        Self::new(Vec::new(), extractor)
    }

    /// Set the per-attempt timeout
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Set the breakdown length cap
    pub fn with_max_subtasks(mut self, max_subtasks: usize) -> Self {
        self.max_subtasks = max_subtasks;
        self
    }

    /// Descriptors of the providers that will be attempted, in order
    pub fn providers(&self) -> impl Iterator<Item = &ProviderDescriptor> + '_ {
        self.providers.iter().map(|p| p.descriptor())
    }

    /// The fallback extractor
    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Parse free text, resolving relative dates against the local clock
    pub async fn parse(&self, text: &str) -> Resolved<ParsedTask> {
        self.parse_at(text, Local::now().naive_local()).await
    }

    /// Parse free text with an explicit reference instant
    pub async fn parse_at(&self, text: &str, now: NaiveDateTime) -> Resolved<ParsedTask> {
        let (answer, failures) = self
            .first_success(Operation::Parse, |p| p.parse(text, now))
            .await;

        let (mut task, source) = match answer {
            Some((identity, task)) => (task, Source::Provider(identity)),
            None => {
                self.announce_fallback(Operation::Parse, &failures);
                (self.extractor.parse_at(text, now), Source::Fallback)
            }
        };

        task.priority = self.keyword_priority(text, task.priority);

        Resolved {
            value: task,
            source,
            failures,
        }
    }

    /// Suggest category tags
    pub async fn suggest_tags(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Resolved<Vec<String>> {
        let (answer, failures) = self
            .first_success(Operation::SuggestTags, |p| p.suggest_tags(title, description))
            .await;

        match answer {
            Some((identity, tags)) => Resolved {
                value: tags,
                source: Source::Provider(identity),
                failures,
            },
            None => {
                self.announce_fallback(Operation::SuggestTags, &failures);
                Resolved {
                    value: self.extractor.suggest_tags(title, description),
                    source: Source::Fallback,
                    failures,
                }
            }
        }
    }

    /// Break a task into ordered subtasks
    pub async fn breakdown(&self, description: &str) -> Resolved<Vec<String>> {
        let (answer, failures) = self
            .first_success(Operation::Breakdown, |p| p.breakdown(description))
            .await;

        match answer {
            Some((identity, mut steps)) => {
                steps.truncate(self.max_subtasks);
                Resolved {
                    value: steps,
                    source: Source::Provider(identity),
                    failures,
                }
            }
            None => {
                self.announce_fallback(Operation::Breakdown, &failures);
                Resolved {
                    value: self.extractor.breakdown(description),
                    source: Source::Fallback,
                    failures,
                }
            }
        }
    }

    /// Recommend a priority with reasoning
    pub async fn recommend_priority(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Resolved<PriorityRecommendation> {
        let (answer, failures) = self
            .first_success(Operation::RecommendPriority, |p| {
                p.recommend_priority(title, description)
            })
            .await;

        let (recommendation, source) = match answer {
            Some((identity, recommendation)) => (recommendation, Source::Provider(identity)),
            None => {
                self.announce_fallback(Operation::RecommendPriority, &failures);
                return Resolved {
                    value: self.extractor.recommend_priority(title, description),
                    source: Source::Fallback,
                    failures,
                };
            }
        };

        let text = format!("{} {}", title, description.unwrap_or(""));
        let value = match self.extractor.scan_priority(&text) {
            Some(scanned) if scanned != recommendation.priority => {
                debug!(
                    "Keyword priority {} overrides {} from provider",
                    scanned, recommendation.priority
                );
                self.extractor.recommend_priority(title, description)
            }
            _ => recommendation,
        };

        Resolved {
            value,
            source,
            failures,
        }
    }

    /// Try providers in order until one succeeds
    async fn first_success<'a, T, F>(
        &'a self,
        operation: Operation,
        call: F,
    ) -> (Option<(String, T)>, Vec<Failure>)
    where
        F: Fn(&'a dyn TaskProvider) -> Attempt<'a, T>,
    {
        let mut failures = Vec::new();

        for provider in &self.providers {
            let identity = &provider.descriptor().identity;
            if !provider.descriptor().capabilities.supports(operation) {
                debug!("Provider '{}' does not support {}", identity, operation);
                continue;
            }

            let error = match tokio::time::timeout(self.attempt_timeout, call(provider.as_ref())).await
            {
                Ok(Ok(value)) => {
                    debug!("Provider '{}' answered {}", identity, operation);
                    return (Some((identity.clone(), value)), failures);
                }
                Ok(Err(error)) => error,
                Err(_) => ProviderError::Timeout(self.attempt_timeout),
            };

            if error.is_quota() {
                warn!("Provider '{}' quota exhausted during {}: {}", identity, operation, error);
            } else {
                warn!("Provider '{}' failed {}: {}", identity, operation, error);
            }
            failures.push(Failure {
                provider: identity.clone(),
                error,
            });
        }

        (None, failures)
    }

    fn announce_fallback(&self, operation: Operation, failures: &[Failure]) {
        if self.providers.is_empty() {
            debug!("No providers configured; using rule-based {}", operation);
        } else {
            info!(
                "All providers failed {} ({} attempt(s)); using rule-based fallback",
                operation,
                failures.len()
            );
        }
    }

    fn keyword_priority(&self, text: &str, returned: Priority) -> Priority {
        match self.extractor.scan_priority(text) {
            Some(scanned) if scanned != returned => {
                debug!("Keyword priority {} overrides {}", scanned, returned);
                scanned
            }
            _ => returned,
        }
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("providers", &self.providers().collect::<Vec<_>>())
            .field("attempt_timeout", &self.attempt_timeout)
            .field("max_subtasks", &self.max_subtasks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskwise_llm::{ChatProvider, MockBackend};

    fn mock(name: &str, response: &str) -> Arc<dyn TaskProvider> {
        Arc::new(ChatProvider::new(MockBackend::new(response).with_name(name)))
    }

    #[test]
    fn test_unavailable_providers_are_excluded() {
        let orchestrator = Orchestrator::new(
            vec![
                Arc::new(ChatProvider::new(MockBackend::unconfigured().with_name("openai"))),
                mock("ollama", "[]"),
            ],
            Extractor::default(),
        );
        let identities: Vec<_> = orchestrator.providers().map(|d| d.identity.clone()).collect();
        assert_eq!(identities, ["ollama"]);
    }

    #[test]
    fn test_source_display() {
        assert_eq!(Source::Provider("openai".to_string()).to_string(), "openai");
        assert_eq!(Source::Fallback.to_string(), "rule-based");
    }

    #[tokio::test]
    async fn test_keyword_priority_overrides_provider_parse() {
        let orchestrator = Orchestrator::new(
            vec![mock("openai", r#"{"title": "Fix login", "priority": "low"}"#)],
            Extractor::default(),
        );
        let resolved = orchestrator.parse("urgent: fix login").await;
        assert_eq!(resolved.source, Source::Provider("openai".to_string()));
        assert_eq!(resolved.value.title, "Fix login");
        assert_eq!(resolved.value.priority, Priority::High);
    }

    #[tokio::test]
    async fn test_provider_priority_kept_without_keywords() {
        let orchestrator = Orchestrator::new(
            vec![mock("openai", r#"{"title": "Fix login", "priority": "高"}"#)],
            Extractor::default(),
        );
        let resolved = orchestrator.parse("fix login").await;
        assert_eq!(resolved.value.priority, Priority::High);
    }

    #[tokio::test]
    async fn test_breakdown_is_capped() {
        let steps = r#"["a", "b", "c", "d", "e", "f", "g"]"#;
        let orchestrator =
            Orchestrator::new(vec![mock("openai", steps)], Extractor::default()).with_max_subtasks(4);
        let resolved = orchestrator.breakdown("plan the offsite").await;
        assert_eq!(resolved.value, ["a", "b", "c", "d"]);
    }
}
