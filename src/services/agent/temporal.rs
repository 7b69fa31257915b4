use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::Regex;

/// Result of running the extractor over one utterance. Extraction is
/// total: any input produces a value, worst case all-`None`.
#[derive(Debug, Default)]
pub struct Extraction {
    /// ISO `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Zero-padded 24h `HH:MM`.
    pub time: Option<String>,
    pub warnings: Vec<String>,
}

// Scanned in order; a later period word overwrites an earlier one.
const TIME_PERIODS: [(&str, u32, u32); 4] = [
    ("morning", 9, 0),
    ("afternoon", 14, 0),
    ("evening", 18, 0),
    ("night", 20, 0),
];

const MONTH_ALTERNATION: &str =
    "january|february|march|april|may|june|july|august|september|october|november|december";

/// Pull an optional date and an optional time out of free text.
///
/// Dates go through an ordered keyword table first (`today`,
/// `tomorrow`, weekday names, `next week`, `next month`), then an
/// explicit-pattern fallback seeded with `now`. Times resolve period
/// words first and let explicit clock patterns overwrite them, so
/// "tomorrow morning at 6:00" comes out as 06:00.
pub fn extract(utterance: &str, now: NaiveDateTime) -> Extraction {
    let text = utterance.to_lowercase();
    let today = now.date();

    let mut date = None;
    for (keyword, resolved) in date_keyword_table(today) {
        if text.contains(keyword) {
            date = Some(resolved);
            break;
        }
    }
    if date.is_none() {
        if let Some(parsed) = fallback_date(&text, today) {
            // Guard against the fallback resolving to today on text that
            // never actually named a date.
            if parsed != today || text.contains("today") || text.contains("now") {
                date = Some(parsed);
            }
        }
    }

    let mut candidate = None;
    for (period, hour, minute) in TIME_PERIODS {
        if text.contains(period) {
            candidate = Some((hour, minute));
        }
    }
    if let Some(explicit) = explicit_time(&text) {
        candidate = Some(explicit);
    }

    let mut warnings = Vec::new();
    let time = candidate.and_then(|(hour, minute)| {
        let formatted = format!("{hour:02}:{minute:02}");
        if parse_hhmm(&formatted).is_some() {
            Some(formatted)
        } else {
            warnings.push(format!(
                "I couldn't make sense of the time '{formatted}', so I ignored it."
            ));
            None
        }
    });

    Extraction {
        date: date.map(|d| d.format("%Y-%m-%d").to_string()),
        time,
        warnings,
    }
}

/// Strict `HH:MM` check: exactly five characters, zero-padded, in range.
pub fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    if s.len() != 5 || s.as_bytes()[2] != b':' {
        return None;
    }
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

// Iteration order matters: first match wins, and "next monday" must hit
// the weekday entry the same way "monday" does.
fn date_keyword_table(today: NaiveDate) -> Vec<(&'static str, NaiveDate)> {
    vec![
        ("today", today),
        ("tomorrow", today + Duration::days(1)),
        ("monday", upcoming_weekday(today, Weekday::Mon)),
        ("tuesday", upcoming_weekday(today, Weekday::Tue)),
        ("wednesday", upcoming_weekday(today, Weekday::Wed)),
        ("thursday", upcoming_weekday(today, Weekday::Thu)),
        ("friday", upcoming_weekday(today, Weekday::Fri)),
        ("saturday", upcoming_weekday(today, Weekday::Sat)),
        ("sunday", upcoming_weekday(today, Weekday::Sun)),
        ("next week", today + Duration::days(7)),
        (
            "next month",
            today.checked_add_months(Months::new(1)).unwrap_or(today),
        ),
    ]
}

/// Next occurrence of `target`, where today counts: "friday" said on a
/// Friday resolves to today, not to next week.
fn upcoming_weekday(today: NaiveDate, target: Weekday) -> NaiveDate {
    let ahead = (target.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    today + Duration::days(ahead)
}

fn fallback_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let iso = Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap();
    if let Some(cap) = iso.captures(text) {
        if let (Ok(y), Ok(m), Ok(d)) = (cap[1].parse(), cap[2].parse(), cap[3].parse()) {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                return Some(date);
            }
        }
    }

    let slash = Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{4}))?\b").unwrap();
    if let Some(cap) = slash.captures(text) {
        let year = cap
            .get(3)
            .and_then(|y| y.as_str().parse().ok())
            .unwrap_or_else(|| today.year());
        if let (Ok(m), Ok(d)) = (cap[1].parse(), cap[2].parse()) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, m, d) {
                return Some(date);
            }
        }
    }

    let month_day = Regex::new(&format!(
        r"\b({MONTH_ALTERNATION})\s+(\d{{1,2}})(?:st|nd|rd|th)?\b"
    ))
    .unwrap();
    if let Some(cap) = month_day.captures(text) {
        if let (Some(m), Ok(d)) = (month_number(&cap[1]), cap[2].parse()) {
            if let Some(date) = NaiveDate::from_ymd_opt(today.year(), m, d) {
                return Some(date);
            }
        }
    }

    let day_month = Regex::new(&format!(
        r"\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({MONTH_ALTERNATION})\b"
    ))
    .unwrap();
    if let Some(cap) = day_month.captures(text) {
        if let (Ok(d), Some(m)) = (cap[1].parse(), month_number(&cap[2])) {
            if let Some(date) = NaiveDate::from_ymd_opt(today.year(), m, d) {
                return Some(date);
            }
        }
    }

    None
}

fn month_number(name: &str) -> Option<u32> {
    match name {
        "january" => Some(1),
        "february" => Some(2),
        "march" => Some(3),
        "april" => Some(4),
        "may" => Some(5),
        "june" => Some(6),
        "july" => Some(7),
        "august" => Some(8),
        "september" => Some(9),
        "october" => Some(10),
        "november" => Some(11),
        "december" => Some(12),
        _ => None,
    }
}

// Patterns tried in order; an out-of-range candidate rejects the pattern
// and falls through to the next one.
fn explicit_time(text: &str) -> Option<(u32, u32)> {
    // 3pm, 11:30am, "6 pm". The optional minutes also cover the bare
    // "H am|pm" form.
    let am_pm = Regex::new(r"\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").unwrap();
    if let Some(cap) = am_pm.captures(text) {
        let hour = cap[1].parse().ok();
        let minute = cap.get(2).map_or(Some(0), |m| m.as_str().parse().ok());
        if let (Some(h), Some(m)) = (hour, minute) {
            if let Some(t) = normalize_time(h, m, Some(&cap[3])) {
                return Some(t);
            }
        }
    }

    // 15:00
    let clock = Regex::new(r"\b(\d{1,2}):(\d{2})\b").unwrap();
    if let Some(cap) = clock.captures(text) {
        if let (Ok(h), Ok(m)) = (cap[1].parse(), cap[2].parse()) {
            if let Some(t) = normalize_time(h, m, None) {
                return Some(t);
            }
        }
    }

    // Bare hour on the 24h clock. The boundary classes keep digit runs
    // inside date tokens like 2025-07-01 or 3/4 from counting as hours.
    let bare = Regex::new(r"(?:^|[^\d:/\-])(\d{1,2})(?:[^\d:/\-]|$)").unwrap();
    if let Some(cap) = bare.captures(text) {
        if let Ok(h) = cap[1].parse() {
            if let Some(t) = normalize_time(h, 0, None) {
                return Some(t);
            }
        }
    }

    None
}

fn normalize_time(hour: u32, minute: u32, meridiem: Option<&str>) -> Option<(u32, u32)> {
    let hour = match meridiem {
        Some("pm") if hour != 12 => hour + 12,
        Some("am") if hour == 12 => 0,
        _ => hour,
    };
    (hour <= 23 && minute <= 59).then_some((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-07-04 is a Friday.
    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 4)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_today_and_tomorrow() {
        assert_eq!(extract("today please", now()).date.as_deref(), Some("2025-07-04"));
        assert_eq!(
            extract("how about tomorrow", now()).date.as_deref(),
            Some("2025-07-05")
        );
    }

    #[test]
    fn test_weekday_same_day() {
        // Saying the current weekday means today, not next week.
        assert_eq!(extract("friday works", now()).date.as_deref(), Some("2025-07-04"));
    }

    #[test]
    fn test_weekday_next_occurrence() {
        assert_eq!(extract("on monday", now()).date.as_deref(), Some("2025-07-07"));
        assert_eq!(extract("next tuesday", now()).date.as_deref(), Some("2025-07-08"));
    }

    #[test]
    fn test_next_week_and_next_month() {
        assert_eq!(extract("next week", now()).date.as_deref(), Some("2025-07-11"));
        assert_eq!(extract("next month", now()).date.as_deref(), Some("2025-08-04"));
    }

    #[test]
    fn test_explicit_iso_date_with_time() {
        let result = extract("book me on 2025-07-01 15:00", now());
        assert_eq!(result.date.as_deref(), Some("2025-07-01"));
        assert_eq!(result.time.as_deref(), Some("15:00"));
    }

    #[test]
    fn test_month_name_dates() {
        assert_eq!(extract("july 15th", now()).date.as_deref(), Some("2025-07-15"));
        assert_eq!(
            extract("the 3rd of december", now()).date.as_deref(),
            Some("2025-12-03")
        );
        assert_eq!(extract("on 12/31", now()).date.as_deref(), Some("2025-12-31"));
    }

    #[test]
    fn test_no_date_on_plain_text() {
        let result = extract("hello there", now());
        assert!(result.date.is_none());
        assert!(result.time.is_none());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_period_words() {
        assert_eq!(extract("tomorrow afternoon", now()).time.as_deref(), Some("14:00"));
        assert_eq!(extract("in the morning", now()).time.as_deref(), Some("09:00"));
        // Later table entry wins when two period words appear.
        assert_eq!(
            extract("evening or night, whatever", now()).time.as_deref(),
            Some("20:00")
        );
    }

    #[test]
    fn test_explicit_overrides_period() {
        assert_eq!(
            extract("tomorrow morning at 6:00", now()).time.as_deref(),
            Some("06:00")
        );
    }

    #[test]
    fn test_am_pm_normalization() {
        assert_eq!(extract("6 pm", now()).time.as_deref(), Some("18:00"));
        assert_eq!(extract("12 am", now()).time.as_deref(), Some("00:00"));
        assert_eq!(extract("12 pm", now()).time.as_deref(), Some("12:00"));
        assert_eq!(extract("11:30am", now()).time.as_deref(), Some("11:30"));
    }

    #[test]
    fn test_bare_hour() {
        assert_eq!(extract("at 14", now()).time.as_deref(), Some("14:00"));
        assert!(extract("at 99", now()).time.is_none());
    }

    #[test]
    fn test_date_digits_do_not_become_times() {
        let result = extract("any free time on 2025-07-02", now());
        assert_eq!(result.date.as_deref(), Some("2025-07-02"));
        assert!(result.time.is_none());
    }

    #[test]
    fn test_out_of_range_pm_falls_back_to_bare_hour() {
        // "13 pm" is nonsense as 12h clock; the bare 24h reading survives.
        assert_eq!(extract("13 pm", now()).time.as_deref(), Some("13:00"));
    }

    #[test]
    fn test_total_over_garbage() {
        for input in ["", "!!!", "9999999999", ":::", "am pm am pm"] {
            let result = extract(input, now());
            if let Some(date) = &result.date {
                assert!(parse_iso_date(date).is_some(), "bad date from {input:?}");
            }
            if let Some(time) = &result.time {
                assert!(parse_hhmm(time).is_some(), "bad time from {input:?}");
            }
        }
    }

    #[test]
    fn test_parse_hhmm_strictness() {
        assert!(parse_hhmm("09:00").is_some());
        assert!(parse_hhmm("23:59").is_some());
        assert!(parse_hhmm("9:00").is_none());
        assert!(parse_hhmm("24:00").is_none());
        assert!(parse_hhmm("12:60").is_none());
        assert!(parse_hhmm("noon").is_none());
    }
}
