//! Bilingual keyword tables
//!
//! The tables are plain data: every rule in the extractor reads them, none
//! of them encode logic. Matching is case-insensitive substring search, so
//! all triggers are stored lowercase.
//!
//! A deployment can append triggers without recompiling by loading a TOML
//! extension file:
//!
//! ```toml
//! [priority]
//! high = ["火急"]
//!
//! [categories]
//! shopping = ["淘宝", "amazon"]
//! meeting = ["standup"]
//! ```

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const HIGH_PRIORITY: &[&str] = &[
    "紧急", "重要", "很重要", "尽快", "立即", "必须", "优先级高", "高优先级",
    "urgent", "important", "critical", "asap", "as soon as possible", "high priority",
    "priority high",
];

const LOW_PRIORITY: &[&str] = &[
    "不急", "有空", "随意", "休闲", "优先级低", "低优先级",
    "low priority", "priority low", "whenever", "optional", "leisure",
];

const WORK: &[&str] = &[
    "工作", "项目", "报告", "会议", "开会", "任务", "代码", "审查", "开发", "设计",
    "work", "project", "report", "meeting", "task", "code", "review", "develop",
    "development", "design", "implement", "implementation", "bug", "fix", "feature",
    "deploy", "deployment", "test", "testing", "document", "documentation", "plan",
    "planning", "analysis",
];

const MEETING: &[&str] = &["meeting", "会议", "开会", "conference", "call"];
const CODE: &[&str] = &["code", "代码", "programming", "program", "coding"];
const REVIEW: &[&str] = &["review", "审查", "check", "检查"];
const PROJECT: &[&str] = &["project", "项目"];
const REPORT: &[&str] = &["report", "报告"];

const STUDY: &[&str] = &[
    "学习", "课程", "作业", "考试", "培训", "教程",
    "learn", "study", "course", "homework", "exam", "test", "training", "tutorial",
];

const SHOPPING: &[&str] = &[
    "购物", "买", "超市", "商店", "采购",
    "shopping", "buy", "purchase", "shop", "grocery", "store",
];

const HEALTH: &[&str] = &[
    "健康", "运动", "锻炼", "医院", "医生", "健身",
    "health", "exercise", "workout", "hospital", "doctor", "fitness", "gym",
];

const PERSONAL: &[&str] = &[
    "个人", "生活", "家庭", "朋友", "社交",
    "personal", "life", "family", "friend", "social", "home",
];

const FINANCE: &[&str] = &[
    "财务", "账单", "支付", "银行", "投资",
    "finance", "bill", "payment", "bank", "investment", "money",
];

const TRAVEL: &[&str] = &[
    "旅行", "旅游", "出差", "航班", "酒店",
    "travel", "trip", "flight", "hotel", "vacation", "journey",
];

/// Cues that do not name a category but still read as a job chore
const WORK_ADJACENT: &[&str] = &[
    "conference", "call", "programming", "check", "检查", "email", "邮件", "client",
    "客户", "deadline", "截止", "office", "办公", "colleague", "同事", "boss", "老板",
];

/// One labelled group of trigger words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable key used by extension files (e.g. "shopping")
    pub key: String,

    /// Label emitted as a tag (e.g. "Shopping")
    pub label: String,

    /// Lowercase trigger strings
    pub triggers: Vec<String>,
}

impl Category {
    fn builtin(key: &str, label: &str, triggers: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Whether any trigger occurs in `content` (already lowercased)
    pub fn matches(&self, content: &str) -> bool {
        self.triggers.iter().any(|t| content.contains(t.as_str()))
    }
}

/// Priority trigger words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityTriggers {
    /// Words that make a task high priority
    pub high: Vec<String>,

    /// Words that make a task low priority
    pub low: Vec<String>,
}

/// The full keyword lexicon
///
/// Built once at startup and then shared read-only (usually behind an
/// `Arc`) by every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    /// Priority triggers
    pub priority: PriorityTriggers,

    /// Top-level tag categories in evaluation order; the first one is "work"
    pub categories: Vec<Category>,

    /// Work refinements, most specific first
    pub work_refinements: Vec<Category>,

    /// Generic cues that make the no-category fallback "Work" instead of "Other"
    pub work_adjacent: Vec<String>,

    /// Label emitted when nothing matched at all
    pub other_label: String,
}

/// Extra triggers layered on top of the built-in lexicon
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LexiconExtension {
    /// Extra priority triggers
    #[serde(default)]
    pub priority: PriorityExtension,

    /// Extra triggers by category or refinement key
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,

    /// Extra work-adjacent cues
    #[serde(default)]
    pub work_adjacent: Vec<String>,
}

/// Extra priority triggers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriorityExtension {
    /// Extra high-priority triggers
    #[serde(default)]
    pub high: Vec<String>,

    /// Extra low-priority triggers
    #[serde(default)]
    pub low: Vec<String>,
}

impl Lexicon {
    /// The built-in bilingual (English/Chinese) lexicon
    pub fn builtin() -> Self {
        Self {
            priority: PriorityTriggers {
                high: HIGH_PRIORITY.iter().map(|t| t.to_string()).collect(),
                low: LOW_PRIORITY.iter().map(|t| t.to_string()).collect(),
            },
            categories: vec![
                Category::builtin("work", "Work", WORK),
                Category::builtin("study", "Study", STUDY),
                Category::builtin("shopping", "Shopping", SHOPPING),
                Category::builtin("health", "Health", HEALTH),
                Category::builtin("personal", "Personal", PERSONAL),
                Category::builtin("finance", "Finance", FINANCE),
                Category::builtin("travel", "Travel", TRAVEL),
            ],
            work_refinements: vec![
                Category::builtin("meeting", "Meeting", MEETING),
                Category::builtin("code", "Code", CODE),
                Category::builtin("review", "Review", REVIEW),
                Category::builtin("project", "Project", PROJECT),
                Category::builtin("report", "Report", REPORT),
            ],
            work_adjacent: WORK_ADJACENT.iter().map(|t| t.to_string()).collect(),
            other_label: "Other".to_string(),
        }
    }

    /// Load the built-in lexicon extended with the triggers in a TOML file
    pub fn with_extension_file(path: impl AsRef<Path>) -> Result<Self, ExtractorError> {
        let contents = std::fs::read_to_string(path)?;
        let extension: LexiconExtension = toml::from_str(&contents)?;
        let mut lexicon = Self::builtin();
        lexicon.extend(extension)?;
        Ok(lexicon)
    }

    /// Append extension triggers; unknown category keys are rejected
    pub fn extend(&mut self, extension: LexiconExtension) -> Result<(), ExtractorError> {
        self.priority.high.extend(lowercased(extension.priority.high));
        self.priority.low.extend(lowercased(extension.priority.low));
        self.work_adjacent.extend(lowercased(extension.work_adjacent));

        for (key, triggers) in extension.categories {
            let category = self
                .categories
                .iter_mut()
                .chain(self.work_refinements.iter_mut())
                .find(|c| c.key == key)
                .ok_or_else(|| ExtractorError::UnknownCategory(key.clone()))?;
            category.triggers.extend(lowercased(triggers));
        }
        Ok(())
    }

    /// The "work" category, which owns the refinement sub-match
    pub fn work(&self) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == "work")
    }

    /// Every label the work category can produce (refinements plus generic)
    pub fn work_labels(&self) -> Vec<&str> {
        self.work_refinements
            .iter()
            .map(|c| c.label.as_str())
            .chain(self.work().map(|c| c.label.as_str()))
            .collect()
    }

    /// Serialize the lexicon for review
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize lexicon: {}", e))
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

fn lowercased(words: Vec<String>) -> impl Iterator<Item = String> {
    words
        .into_iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_triggers_are_lowercase() {
        let lexicon = Lexicon::builtin();
        let all = lexicon
            .categories
            .iter()
            .chain(lexicon.work_refinements.iter())
            .flat_map(|c| c.triggers.iter())
            .chain(lexicon.priority.high.iter())
            .chain(lexicon.priority.low.iter());
        for trigger in all {
            assert_eq!(trigger, &trigger.to_lowercase());
        }
    }

    #[test]
    fn test_category_order_is_fixed() {
        let keys: Vec<_> = Lexicon::builtin()
            .categories
            .iter()
            .map(|c| c.key.clone())
            .collect();
        assert_eq!(
            keys,
            ["work", "study", "shopping", "health", "personal", "finance", "travel"]
        );
    }

    #[test]
    fn test_work_labels() {
        let lexicon = Lexicon::builtin();
        assert_eq!(
            lexicon.work_labels(),
            ["Meeting", "Code", "Review", "Project", "Report", "Work"]
        );
    }

    #[test]
    fn test_extend_known_category() {
        let mut lexicon = Lexicon::builtin();
        let mut categories = BTreeMap::new();
        categories.insert("shopping".to_string(), vec!["Amazon".to_string()]);
        categories.insert("meeting".to_string(), vec!["standup".to_string()]);
        lexicon
            .extend(LexiconExtension {
                categories,
                ..LexiconExtension::default()
            })
            .unwrap();

        let shopping = lexicon.categories.iter().find(|c| c.key == "shopping").unwrap();
        assert!(shopping.matches("order on amazon"));
        assert!(lexicon.work_refinements[0].matches("daily standup"));
    }

    #[test]
    fn test_extend_unknown_category_fails() {
        let mut lexicon = Lexicon::builtin();
        let mut categories = BTreeMap::new();
        categories.insert("gardening".to_string(), vec!["rake".to_string()]);
        let result = lexicon.extend(LexiconExtension {
            categories,
            ..LexiconExtension::default()
        });
        assert!(matches!(result, Err(ExtractorError::UnknownCategory(k)) if k == "gardening"));
    }

    #[test]
    fn test_extension_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
work_adjacent = ["Sprint"]

[priority]
high = ["火急"]

[categories]
travel = ["高铁"]
"#
        )
        .unwrap();

        let lexicon = Lexicon::with_extension_file(file.path()).unwrap();
        assert!(lexicon.priority.high.contains(&"火急".to_string()));
        assert!(lexicon.work_adjacent.contains(&"sprint".to_string()));
        let travel = lexicon.categories.iter().find(|c| c.key == "travel").unwrap();
        assert!(travel.matches("坐高铁回家"));
    }

    #[test]
    fn test_to_toml() {
        let toml_str = Lexicon::builtin().to_toml().unwrap();
        assert!(toml_str.contains("other_label"));
        let parsed: Lexicon = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, Lexicon::builtin());
    }
}
