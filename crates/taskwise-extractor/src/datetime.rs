//! Relative date and clock-time resolution
//!
//! Dates are always resolved against a caller-supplied "now" so results are
//! reproducible. A date without a clock time lands at the configured end of
//! day; a clock time without a date yields nothing.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// English weekday names and abbreviations, longest spelling first
pub(crate) const EN_WEEKDAYS: &str =
    "monday|tuesday|wednesday|thursday|friday|saturday|sunday|tues|thurs|thur|mon|tue|wed|thu|fri|sat|sun";

static DAY_AFTER_TOMORROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?-u:\b)day\s+after\s+tomorrow(?-u:\b)|后天").unwrap());
static THREE_DAYS_OUT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"大后天").unwrap());
static TOMORROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(?-u:\b)tomorrow(?-u:\b)|明天|明早|明晚").unwrap());
static TODAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?-u:\b)today(?-u:\b)|(?-u:\b)tonight(?-u:\b)|今天|今早|今晚").unwrap());

static EN_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?-u:\b)(next|this)\s+({})(?-u:\b)", EN_WEEKDAYS)).unwrap()
});
static EN_NEXT_WEEK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(?-u:\b)next\s+week(?-u:\b)").unwrap());
static CN_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(本周|这周|本星期|这星期|下周|下星期|下个星期)([一二三四五六日天])").unwrap()
});
static CN_NEXT_WEEK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"下周|下星期|下个星期").unwrap());

/// Chinese day periods; longer spellings come first so `早上` wins over `早`
pub(crate) const CN_PERIODS: &str = "上午|早上|早晨|凌晨|中午|下午|傍晚|晚上|明早|今早|明晚|今晚|早|晚";

static HH_MM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)({})?\s*(?-u:\b)(\d{{1,2}}):(\d{{2}})(?:\s*([ap])\.?m(?-u:\b)\.?)?",
        CN_PERIODS
    ))
    .unwrap()
});
static H_AM_PM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?-u:\b)(\d{1,2})\s*([ap])\.?m(?-u:\b)\.?").unwrap());
static CN_CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"({})?\s*(\d{{1,2}})\s*点(?:\s*(半)|\s*(\d{{1,2}})\s*分)?",
        CN_PERIODS
    ))
    .unwrap()
});

/// Resolve the due date/time described in `text`
///
/// Returns `None` when no date cue is present, even if a clock time is.
pub fn resolve_due(
    text: &str,
    now: NaiveDateTime,
    end_of_day: NaiveTime,
    bare_hour_is_afternoon: bool,
) -> Option<NaiveDateTime> {
    let date = relative_date(text, now.date())?;
    let time = clock_time(text, bare_hour_is_afternoon).unwrap_or(end_of_day);
    Some(date.and_time(time))
}

/// Resolve a relative date expression against `today`
pub fn relative_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let offset = day_offset(text, today)?;
    today.checked_add_signed(Duration::days(offset))
}

fn day_offset(text: &str, today: NaiveDate) -> Option<i64> {
    if THREE_DAYS_OUT.is_match(text) {
        return Some(3);
    }
    if DAY_AFTER_TOMORROW.is_match(text) {
        return Some(2);
    }
    if TOMORROW.is_match(text) {
        return Some(1);
    }
    if TODAY.is_match(text) {
        return Some(0);
    }

    let current = i64::from(today.weekday().num_days_from_monday());

    if let Some(caps) = EN_WEEKDAY.captures(text) {
        let target = en_weekday_index(&caps[2])?;
        let ahead = (target - current + 7) % 7;
        return Some(if caps[1].eq_ignore_ascii_case("next") && ahead == 0 {
            7
        } else {
            ahead
        });
    }
    if EN_NEXT_WEEK.is_match(text) {
        return Some(7);
    }

    if let Some(caps) = CN_WEEKDAY.captures(text) {
        let target = cn_weekday_index(&caps[2])?;
        let ahead = target - current;
        return Some(match &caps[1] {
            "下周" | "下星期" | "下个星期" => ahead + 7,
            _ if ahead < 0 => ahead + 7,
            _ => ahead,
        });
    }
    if CN_NEXT_WEEK.is_match(text) {
        return Some(7);
    }

    None
}

/// Monday = 0
fn en_weekday_index(name: &str) -> Option<i64> {
    let name = name.to_lowercase();
    let index = match name.get(..3)? {
        "mon" => 0,
        "tue" => 1,
        "wed" => 2,
        "thu" => 3,
        "fri" => 4,
        "sat" => 5,
        "sun" => 6,
        _ => return None,
    };
    Some(index)
}

/// Monday = 0; both 日 and 天 mean Sunday
fn cn_weekday_index(name: &str) -> Option<i64> {
    let index = match name {
        "一" => 0,
        "二" => 1,
        "三" => 2,
        "四" => 3,
        "五" => 4,
        "六" => 5,
        "日" | "天" => 6,
        _ => return None,
    };
    Some(index)
}

/// Extract a clock time from `text`
///
/// Forms are tried in order: `[时段]HH:MM` (optionally with am/pm),
/// `H am/pm`, then the Chinese `[时段]H点[半|M分]` form. An out-of-range hour
/// or minute yields `None` for that form.
pub fn clock_time(text: &str, bare_hour_is_afternoon: bool) -> Option<NaiveTime> {
    if let Some(caps) = HH_MM.captures(text) {
        return hh_mm(&caps);
    }
    if let Some(caps) = H_AM_PM.captures(text) {
        let hour: u32 = caps[1].parse().ok()?;
        return with_meridiem(hour, 0, caps.get(2).map(|m| m.as_str()));
    }
    if let Some(caps) = CN_CLOCK.captures(text) {
        return chinese_clock(&caps, bare_hour_is_afternoon);
    }
    None
}

fn hh_mm(caps: &Captures<'_>) -> Option<NaiveTime> {
    let hour: u32 = caps[2].parse().ok()?;
    let minute: u32 = caps[3].parse().ok()?;
    match (caps.get(4), caps.get(1)) {
        (Some(meridiem), _) => with_meridiem(hour, minute, Some(meridiem.as_str())),
        (None, Some(period)) => {
            NaiveTime::from_hms_opt(with_period(hour, Some(period.as_str()), false), minute, 0)
        }
        (None, None) => NaiveTime::from_hms_opt(hour, minute, 0),
    }
}

fn with_meridiem(hour: u32, minute: u32, meridiem: Option<&str>) -> Option<NaiveTime> {
    let hour = match meridiem.map(|m| m.to_ascii_lowercase()) {
        Some(m) if m == "p" && hour < 12 => hour + 12,
        Some(m) if m == "a" && hour == 12 => 0,
        _ => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn chinese_clock(caps: &Captures<'_>, bare_hour_is_afternoon: bool) -> Option<NaiveTime> {
    let hour: u32 = caps[2].parse().ok()?;
    let minute: u32 = if caps.get(3).is_some() {
        30
    } else if let Some(m) = caps.get(4) {
        m.as_str().parse().ok()?
    } else {
        0
    };

    let hour = with_period(hour, caps.get(1).map(|p| p.as_str()), bare_hour_is_afternoon);
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Shift a 12-hour clock reading by its Chinese day period
fn with_period(hour: u32, period: Option<&str>, bare_hour_is_afternoon: bool) -> u32 {
    match period {
        Some("凌晨") if hour == 12 => 0,
        Some("上午" | "早上" | "早晨" | "凌晨" | "明早" | "今早" | "早") => hour,
        Some("中午") if hour >= 11 => hour,
        Some(_) if hour < 12 => hour + 12,
        Some(_) => hour,
        None if bare_hour_is_afternoon && hour < 12 => hour + 12,
        None => hour,
    }
}
