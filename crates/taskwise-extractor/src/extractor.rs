//! Core Extractor implementation

use crate::breakdown::fallback_steps;
use crate::config::ExtractorConfig;
use crate::datetime::resolve_due;
use crate::error::ExtractorError;
use crate::lexicon::Lexicon;
use crate::priority::{recommend_priority, scan_priority};
use crate::tags::infer_tags;
use crate::title::TitleCleaner;
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use taskwise_domain::{ParsedTask, Priority, PriorityRecommendation};
use tracing::debug;

/// Deterministic, rule-based task extractor
///
/// Every operation is total: any input string, including an empty one,
/// produces a result. The extractor is cheap to clone and safe to share
/// between threads; the lexicon is read-only after construction.
#[derive(Debug, Clone)]
pub struct Extractor {
    lexicon: Arc<Lexicon>,
    titles: TitleCleaner,
    config: ExtractorConfig,
}

impl Extractor {
    /// Create an extractor over a shared lexicon
    pub fn new(lexicon: Arc<Lexicon>, config: ExtractorConfig) -> Self {
        let titles = TitleCleaner::new(&lexicon);
        Self {
            lexicon,
            titles,
            config,
        }
    }

    /// Create an extractor from config, loading the lexicon extension file if one is set
    pub fn from_config(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let lexicon = match &config.lexicon_path {
            Some(path) => {
                debug!("Loading lexicon extension from {}", path.display());
                Lexicon::with_extension_file(path)?
            }
            None => Lexicon::builtin(),
        };
        Ok(Self::new(Arc::new(lexicon), config))
    }

    /// The shared lexicon
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Parse free text into task attributes, resolving dates against the local clock
    pub fn parse(&self, text: &str) -> ParsedTask {
        self.parse_at(text, Local::now().naive_local())
    }

    /// Parse free text into task attributes, resolving dates against `now`
    ///
    /// Tags and priority are inferred from the raw text, not the cleaned
    /// title, so cues removed by cleanup still count.
    pub fn parse_at(&self, text: &str, now: NaiveDateTime) -> ParsedTask {
        let title = self.titles.clean(text);
        let priority = scan_priority(&self.lexicon, text).unwrap_or(Priority::Medium);
        let due_at = resolve_due(
            text,
            now,
            self.config.end_of_day(),
            self.config.bare_hour_is_afternoon,
        );
        let tags = infer_tags(&self.lexicon, text, None, self.config.max_tags);

        debug!(
            "Rule-based parse: title='{}' priority={} due={:?} tags={:?}",
            title, priority, due_at, tags
        );

        ParsedTask {
            title,
            description: None,
            priority,
            due_at,
            tags,
        }
    }

    /// Clean free text into a title
    pub fn clean_title(&self, text: &str) -> String {
        self.titles.clean(text)
    }

    /// Scan text for an explicit high or low priority cue
    pub fn scan_priority(&self, text: &str) -> Option<Priority> {
        scan_priority(&self.lexicon, text)
    }

    /// Suggest category tags for a task
    pub fn suggest_tags(&self, title: &str, description: Option<&str>) -> Vec<String> {
        infer_tags(&self.lexicon, title, description, self.config.max_tags)
    }

    /// Split a task description into generic steps
    pub fn breakdown(&self, description: &str) -> Vec<String> {
        fallback_steps(description)
    }

    /// Recommend a priority with reasoning
    pub fn recommend_priority(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> PriorityRecommendation {
        recommend_priority(&self.lexicon, title, description)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::builtin()), ExtractorConfig::default())
    }
}
