//! Generic three-step breakdown used when no provider can plan subtasks

/// Whether `text` contains CJK ideographs
pub fn is_cjk(text: &str) -> bool {
    text.chars().any(|c| matches!(c, '\u{4e00}'..='\u{9fff}' | '\u{3400}'..='\u{4dbf}'))
}

/// Prepare / do / finish steps, phrased in the language of the input
pub fn fallback_steps(description: &str) -> Vec<String> {
    let subject = description.trim();
    if is_cjk(subject) {
        vec![
            format!("准备{}", subject),
            format!("执行{}", subject),
            format!("完成{}", subject),
        ]
    } else {
        vec![
            format!("Prepare for: {}", subject),
            format!("Work on: {}", subject),
            format!("Finish and review: {}", subject),
        ]
    }
}
