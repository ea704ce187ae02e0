//! Title cleanup
//!
//! Strips filler phrases, date and time expressions, priority markers and
//! punctuation from the raw text so what remains names the task itself.
//! Priority markers are the lexicon's own triggers, so an extended lexicon
//! cleans its extra words too.
//!
//! Cleanup is applied until the text stops changing, which makes it
//! idempotent: cleaning an already-clean title returns it unchanged. Every
//! pattern only removes text, so the loop always ends.

use crate::datetime::{CN_PERIODS, EN_WEEKDAYS};
use crate::lexicon::Lexicon;
use regex::Regex;
use std::sync::LazyLock;

/// Patterns removed without leaving a gap (Chinese runs have no spaces)
static CJK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // filler
        Regex::new(r"请?提醒我|记得|别忘了|不要忘记").unwrap(),
        // dates
        Regex::new(r"(?:本周|这周|本星期|这星期|下周|下星期|下个星期)[一二三四五六日天]").unwrap(),
        Regex::new(r"大后天|后天|明天|今天|今早|今晚|明早|明晚|下周|下星期|下个星期").unwrap(),
        // clock times
        Regex::new(&format!(
            r"(?:{})?\s*\d{{1,2}}\s*点(?:\s*半|\s*\d{{1,2}}\s*分)?钟?",
            CN_PERIODS
        ))
        .unwrap(),
        Regex::new(r"上午|早上|早晨|凌晨|中午|下午|傍晚|晚上").unwrap(),
    ]
});

/// Patterns replaced by a space so surrounding words stay separated
static LATIN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // filler
        Regex::new(
            r"(?i)(?-u:\b)(?:please\s+)?(?:remind\s+me\s+to|remember\s+to|don'?t\s+forget\s+to|make\s+sure\s+to|remind\s+me)(?-u:\b)",
        )
        .unwrap(),
        // dates, with the preposition that introduced them
        Regex::new(&format!(
            r"(?i)(?:(?-u:\b)(?:on|by|before|until|due)\s+)?(?-u:\b)(?:(?:the\s+)?day\s+after\s+tomorrow|tomorrow|today|tonight|next\s+week|(?:next|this)\s+(?:{}))(?-u:\b)",
            EN_WEEKDAYS
        ))
        .unwrap(),
        // clock times, with the preposition that introduced them
        Regex::new(r"(?i)(?-u:\b)(?:at|by|around|before)\s+\d{1,2}(?::\d{2})?(?:\s*[ap]\.?m(?-u:\b)\.?)?").unwrap(),
        Regex::new(r"(?i)(?-u:\b)\d{1,2}:\d{2}(?:\s*[ap]\.?m(?-u:\b)\.?)?").unwrap(),
        Regex::new(r"(?i)(?-u:\b)\d{1,2}\s*[ap]\.?m(?-u:\b)\.?").unwrap(),
    ]
});

static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[，,。.!！;；:：、]").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Run of prepositions left hanging at the end once a date or time was removed
static DANGLING_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:(?:^|\s+)(?:at|by|before|until|due|and)(?:\s+(?:the|a|an))?)+$").unwrap()
});

/// Title cleaner compiled against one lexicon
#[derive(Debug, Clone)]
pub struct TitleCleaner {
    /// Non-ASCII priority triggers, removed without a gap
    cjk_markers: Option<Regex>,
    /// ASCII priority triggers with their lead-in ("it's very ...")
    latin_markers: Option<Regex>,
}

impl TitleCleaner {
    /// Compile the priority markers of `lexicon`
    pub fn new(lexicon: &Lexicon) -> Self {
        let mut triggers: Vec<&str> = lexicon
            .priority
            .high
            .iter()
            .chain(&lexicon.priority.low)
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        // Longest first, so "很重要" is removed whole rather than leaving "很"
        triggers.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        triggers.dedup();

        let (latin, cjk): (Vec<&str>, Vec<&str>) = triggers.into_iter().partition(|t| t.is_ascii());

        let cjk_markers = (!cjk.is_empty()).then(|| {
            let alternatives: Vec<String> = cjk.iter().map(|t| regex::escape(t)).collect();
            compile(&format!("(?i)(?:非常|很)?(?:{})再?", alternatives.join("|")))
        });
        let latin_markers = (!latin.is_empty()).then(|| {
            let alternatives: Vec<String> = latin.iter().map(|t| latin_alternative(t)).collect();
            compile(&format!(
                r"(?i)(?:(?-u:\b)(?:it'?s|that'?s|this\s+is)\s+)?(?:(?-u:\b)(?:very|really|super)\s+)?(?:{})",
                alternatives.join("|")
            ))
        });

        Self {
            cjk_markers: cjk_markers.flatten(),
            latin_markers: latin_markers.flatten(),
        }
    }

    /// Clean `text` into a task title
    ///
    /// Falls back to the original text when nothing would remain.
    pub fn clean(&self, text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let next = self.clean_once(&current);
            if next == current {
                break;
            }
            current = next;
        }

        if current.is_empty() {
            text.to_string()
        } else {
            current
        }
    }

    fn clean_once(&self, text: &str) -> String {
        let mut out = text.to_string();
        for pattern in CJK_PATTERNS.iter().chain(&self.cjk_markers) {
            out = pattern.replace_all(&out, "").into_owned();
        }
        for pattern in LATIN_PATTERNS
            .iter()
            .chain(&self.latin_markers)
            .chain(std::iter::once(&*PUNCTUATION))
        {
            out = pattern.replace_all(&out, " ").into_owned();
        }
        let out = WHITESPACE.replace_all(&out, " ");
        let out = DANGLING_TAIL.replace(out.trim(), "");
        out.trim().to_string()
    }
}

/// Clean `text` into a task title, stripping the priority markers of `lexicon`
pub fn clean_title(lexicon: &Lexicon, text: &str) -> String {
    TitleCleaner::new(lexicon).clean(text)
}

/// One escaped ASCII trigger, bounded where it starts or ends with a word character
fn latin_alternative(trigger: &str) -> String {
    let body = trigger
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    let lead = if trigger.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        r"(?-u:\b)"
    } else {
        ""
    };
    let tail = if trigger.ends_with(|c: char| c.is_ascii_alphanumeric()) {
        r"(?-u:\b)"
    } else {
        ""
    };
    format!("{}{}{}", lead, body, tail)
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!("Priority markers not compiled for title cleanup: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexiconExtension;

    fn clean(text: &str) -> String {
        clean_title(&Lexicon::builtin(), text)
    }

    #[test]
    fn test_chinese_sentence() {
        assert_eq!(clean("明天下午3点提醒我开会，很重要"), "开会");
        assert_eq!(clean("完成项目报告"), "完成项目报告");
        assert_eq!(clean("下周一交房租，不急"), "交房租");
        assert_eq!(clean("明早8点开会"), "开会");
        assert_eq!(clean("今天下午3:30开会"), "开会");
    }

    #[test]
    fn test_english_sentence() {
        assert_eq!(clean("tomorrow at 9am review the report"), "review the report");
        assert_eq!(
            clean("Remind me to call mom on Friday, it's urgent"),
            "call mom on Friday"
        );
        assert_eq!(clean("submit taxes by next monday"), "submit taxes");
        assert_eq!(clean("Buy groceries at 14:30"), "Buy groceries");
    }

    #[test]
    fn test_every_lexicon_priority_marker_is_removed() {
        assert_eq!(clean("重要：整理照片"), "整理照片");
        assert_eq!(clean("必须交报告"), "交报告");
        assert_eq!(clean("有空再整理照片"), "整理照片");
        assert_eq!(clean("optional: clean the garage"), "clean the garage");
        assert_eq!(clean("sort the photos whenever"), "sort the photos");
        assert_eq!(clean("file taxes as soon as possible"), "file taxes");
        assert_eq!(clean("this is very important: renew passport"), "renew passport");
    }

    #[test]
    fn test_markers_need_word_boundaries() {
        assert_eq!(clean("read about asapiens"), "read about asapiens");
        assert_eq!(clean("write the Critical Path doc"), "write the Path doc");
    }

    #[test]
    fn test_extension_triggers_are_removed() {
        let mut extension = LexiconExtension::default();
        extension.priority.high.push("火急".to_string());
        extension.priority.low.push("someday".to_string());
        let mut lexicon = Lexicon::builtin();
        lexicon.extend(extension).unwrap();

        assert_eq!(clean_title(&lexicon, "火急 提交报告"), "提交报告");
        assert_eq!(clean_title(&lexicon, "someday learn piano"), "learn piano");
    }

    #[test]
    fn test_dangling_preposition_removed() {
        assert_eq!(clean("finish slides by"), "finish slides");
        assert_eq!(clean("pay rent before tomorrow"), "pay rent");
        assert_eq!(clean("ship it due by the"), "ship it");
    }

    #[test]
    fn test_long_preposition_tail_is_stable() {
        let text = format!("finish slides{}", " at".repeat(20));
        let once = clean(&text);
        assert_eq!(once, "finish slides");
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn test_empty_result_falls_back_to_input() {
        assert_eq!(clean("明天"), "明天");
        assert_eq!(clean("tomorrow at 3pm"), "tomorrow at 3pm");
        assert_eq!(clean("紧急"), "紧急");
    }

    #[test]
    fn test_idempotent_on_examples() {
        for input in [
            "明天下午3点提醒我开会，很重要",
            "tomorrow at 9am review the report",
            "call the plumber tonight, very important!",
            "今天",
        ] {
            let once = clean(input);
            assert_eq!(clean(&once), once, "input: {input}");
        }
    }
}
