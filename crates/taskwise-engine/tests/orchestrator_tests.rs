//! Fallback behaviour of the orchestrator across scripted providers

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;
use std::time::Duration;
use taskwise_domain::{ParsedTask, Priority, PriorityRecommendation};
use taskwise_engine::{Orchestrator, Source};
use taskwise_extractor::Extractor;
use taskwise_llm::{
    Capabilities, ChatProvider, MockBackend, ProviderDescriptor, ProviderError, TaskProvider,
};

fn reference_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 12)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn provider(backend: &MockBackend) -> Arc<dyn TaskProvider> {
    Arc::new(ChatProvider::new(backend.clone()))
}

fn failing(name: &str) -> MockBackend {
    let mut backend = MockBackend::default().with_name(name);
    backend.add_error("");
    backend
}

/// Provider that only supports tag suggestions
struct TagsOnly {
    descriptor: ProviderDescriptor,
}

impl TagsOnly {
    fn new() -> Self {
        Self {
            descriptor: ProviderDescriptor::new("tags-only").with_capabilities(Capabilities {
                parse: false,
                suggest_tags: true,
                breakdown: false,
                recommend_priority: false,
            }),
        }
    }
}

#[async_trait]
impl TaskProvider for TagsOnly {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    async fn parse(&self, _text: &str, _now: NaiveDateTime) -> taskwise_llm::Result<ParsedTask> {
        panic!("parse must not be called on a provider without the capability");
    }

    async fn suggest_tags(
        &self,
        _title: &str,
        _description: Option<&str>,
    ) -> taskwise_llm::Result<Vec<String>> {
        Ok(vec!["Errand".to_string()])
    }

    async fn breakdown(&self, _description: &str) -> taskwise_llm::Result<Vec<String>> {
        panic!("breakdown must not be called on a provider without the capability");
    }

    async fn recommend_priority(
        &self,
        _title: &str,
        _description: Option<&str>,
    ) -> taskwise_llm::Result<PriorityRecommendation> {
        panic!("recommend_priority must not be called on a provider without the capability");
    }
}

#[tokio::test]
async fn test_empty_provider_list_uses_extractor() {
    let orchestrator = Orchestrator::rule_based(Extractor::default());
    let resolved = orchestrator
        .parse_at("明天下午3点提醒我开会，很重要", reference_now())
        .await;

    assert_eq!(resolved.source, Source::Fallback);
    assert!(resolved.failures.is_empty());

    let task = resolved.value;
    assert_eq!(task.title, "开会");
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.tags, ["Meeting"]);
    assert_eq!(
        task.due_at,
        NaiveDate::from_ymd_opt(2025, 3, 13).unwrap().and_hms_opt(15, 0, 0)
    );
}

#[tokio::test]
async fn test_rule_based_answers_every_operation() {
    let orchestrator = Orchestrator::rule_based(Extractor::default());

    let parsed = orchestrator
        .parse_at("tomorrow at 9am review the report", reference_now())
        .await;
    assert_eq!(parsed.source, Source::Fallback);
    assert!(parsed.failures.is_empty());
    assert_eq!(parsed.value.title, "review the report");

    let tags = orchestrator.suggest_tags("anything at all", None).await;
    assert_eq!(tags.source, Source::Fallback);
    assert!(tags.failures.is_empty());
    assert_eq!(tags.value, ["Other"]);

    let steps = orchestrator.breakdown("整理房间").await;
    assert_eq!(steps.source, Source::Fallback);
    assert!(steps.failures.is_empty());
    assert_eq!(steps.value, ["准备整理房间", "执行整理房间", "完成整理房间"]);

    let rec = orchestrator.recommend_priority("pay rent", Some("whenever")).await;
    assert_eq!(rec.source, Source::Fallback);
    assert!(rec.failures.is_empty());
    assert_eq!(rec.value.priority, Priority::Low);
}

#[tokio::test]
async fn test_first_success_wins() {
    let first = MockBackend::new(r#"["Work", "Meeting"]"#).with_name("openai");
    let second = MockBackend::new(r#"["Personal"]"#).with_name("google");

    let orchestrator = Orchestrator::new(
        vec![provider(&first), provider(&second)],
        Extractor::default(),
    );
    let resolved = orchestrator.suggest_tags("weekly sync", None).await;

    assert_eq!(resolved.value, ["Work", "Meeting"]);
    assert_eq!(resolved.source, Source::Provider("openai".to_string()));
    assert_eq!(first.call_count(), 1);
    assert_eq!(second.call_count(), 0);
}

#[tokio::test]
async fn test_failures_fall_through_in_order() {
    let first = failing("openai");
    let mut second = MockBackend::default().with_name("google");
    second.add_rate_limit("");
    let third = MockBackend::new(r#"["Plan", "Build", "Ship"]"#).with_name("ollama");

    let orchestrator = Orchestrator::new(
        vec![provider(&first), provider(&second), provider(&third)],
        Extractor::default(),
    );
    let resolved = orchestrator.breakdown("launch the website").await;

    assert_eq!(resolved.value, ["Plan", "Build", "Ship"]);
    assert_eq!(resolved.source, Source::Provider("ollama".to_string()));

    let failed: Vec<_> = resolved.failures.iter().map(|f| f.provider.as_str()).collect();
    assert_eq!(failed, ["openai", "google"]);
    assert!(matches!(resolved.failures[0].error, ProviderError::Communication(_)));
    assert!(resolved.failures[1].error.is_quota());
    assert_eq!(first.call_count(), 1);
    assert_eq!(second.call_count(), 1);
}

#[tokio::test]
async fn test_all_failures_reach_extractor() {
    let first = failing("openai");
    let second = failing("google");

    let orchestrator = Orchestrator::new(
        vec![provider(&first), provider(&second)],
        Extractor::default(),
    );

    let steps = orchestrator.breakdown("整理房间").await;
    assert!(steps.is_fallback());
    assert_eq!(steps.value, ["准备整理房间", "执行整理房间", "完成整理房间"]);
    assert_eq!(steps.failures.len(), 2);

    let rec = orchestrator.recommend_priority("pay rent", Some("whenever")).await;
    assert!(rec.is_fallback());
    assert_eq!(rec.value.priority, Priority::Low);
    assert_eq!(rec.value.reasoning, "Based on keywords: contains low priority words");

    let tags = orchestrator.suggest_tags("anything at all", None).await;
    assert!(tags.is_fallback());
    assert_eq!(tags.value, ["Other"]);
}

#[tokio::test]
async fn test_malformed_response_falls_back() {
    let backend = MockBackend::new("Sorry, I cannot help with that.").with_name("openai");
    let orchestrator = Orchestrator::new(vec![provider(&backend)], Extractor::default());

    let resolved = orchestrator
        .parse_at("tomorrow at 9am review the report", reference_now())
        .await;

    assert!(resolved.is_fallback());
    assert!(matches!(
        resolved.failures[0].error,
        ProviderError::InvalidResponse(_)
    ));
    assert_eq!(resolved.value.title, "review the report");
    assert_eq!(resolved.value.tags, ["Review"]);
}

#[tokio::test]
async fn test_unavailable_provider_is_never_called() {
    let missing_key = MockBackend::unconfigured().with_name("openai");
    let local =
        MockBackend::new(r#"{"priority": "medium", "reasoning": "routine"}"#).with_name("ollama");

    let orchestrator = Orchestrator::new(
        vec![provider(&missing_key), provider(&local)],
        Extractor::default(),
    );
    let resolved = orchestrator.recommend_priority("clean the garage", None).await;

    assert_eq!(resolved.source, Source::Provider("ollama".to_string()));
    assert!(resolved.failures.is_empty());
    assert_eq!(missing_key.call_count(), 0);
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let slow = MockBackend::new(r#"["Late"]"#)
        .with_name("openai")
        .with_delay(Duration::from_secs(5));
    let fast = MockBackend::new(r#"["Work"]"#).with_name("google");

    let orchestrator = Orchestrator::new(
        vec![provider(&slow), provider(&fast)],
        Extractor::default(),
    )
    .with_attempt_timeout(Duration::from_millis(50));

    let resolved = orchestrator.suggest_tags("send invoice", None).await;
    assert_eq!(resolved.value, ["Work"]);
    assert!(matches!(resolved.failures[0].error, ProviderError::Timeout(_)));
}

#[tokio::test]
async fn test_priority_keywords_override_provider() {
    let backend = MockBackend::new(
        r#"{"title": "Renew passport", "priority": "low", "due_date": "2025-03-20"}"#,
    )
    .with_name("openai");
    let orchestrator = Orchestrator::new(vec![provider(&backend)], Extractor::default());

    let resolved = orchestrator
        .parse_at("urgent: renew passport by the 20th", reference_now())
        .await;
    assert_eq!(resolved.source, Source::Provider("openai".to_string()));
    assert_eq!(resolved.value.priority, Priority::High);
    assert_eq!(
        resolved.value.due_at,
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap().and_hms_opt(23, 59, 0)
    );

    let rec = orchestrator.recommend_priority("紧急：整理照片", None).await;
    assert_eq!(rec.source, Source::Provider("openai".to_string()));
    assert_eq!(rec.value.priority, Priority::High);
    assert_eq!(rec.value.reasoning, "Based on keywords: contains urgent/important words");
}

#[tokio::test]
async fn test_provider_priority_is_normalized() {
    let backend = MockBackend::new(r#"{"title": "整理发票", "priority": "HIGH"}"#).with_name("google");
    let orchestrator = Orchestrator::new(vec![provider(&backend)], Extractor::default());

    let resolved = orchestrator.parse_at("整理发票", reference_now()).await;
    assert_eq!(resolved.value.priority, Priority::High);

    let backend = MockBackend::new(r#"{"title": "整理发票", "priority": "someday"}"#).with_name("google");
    let orchestrator = Orchestrator::new(vec![provider(&backend)], Extractor::default());

    let resolved = orchestrator.parse_at("整理发票", reference_now()).await;
    assert_eq!(resolved.value.priority, Priority::Medium);
}

#[tokio::test]
async fn test_unsupported_operation_is_skipped() {
    let orchestrator = Orchestrator::new(vec![Arc::new(TagsOnly::new())], Extractor::default());

    let tags = orchestrator.suggest_tags("pick up parcel", None).await;
    assert_eq!(tags.value, ["Errand"]);

    let parsed = orchestrator.parse_at("pick up parcel", reference_now()).await;
    assert!(parsed.is_fallback());
    assert!(parsed.failures.is_empty());
}
