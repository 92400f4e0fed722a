//! Display helpers shared by every view. All of them are total: missing or
//! unusable input produces a fixed fallback string instead of an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const DEFAULT_DATE_PATTERN: &str = "MMM dd, yyyy";
pub const NOT_AVAILABLE: &str = "N/A";
pub const INVALID_DATE: &str = "Invalid Date";

/// Format an ISO-8601 date (`2024-05-01`, `2024-05-01T10:00:00Z`, ...) with a
/// date-fns style pattern such as `"MMM dd, yyyy"` or `"yyyy"`.
pub fn format_date(date: Option<&str>, pattern: &str) -> String {
    let input = match date.map(str::trim).filter(|s| !s.is_empty()) {
        Some(input) => input,
        None => return NOT_AVAILABLE.to_string(),
    };

    let (parsed, strftime) = match (parse_iso(input), translate_pattern(pattern)) {
        (Some(parsed), Some(strftime)) => (parsed, strftime),
        _ => return INVALID_DATE.to_string(),
    };
    parsed.format(&strftime).to_string()
}

fn parse_iso(input: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(dt);
        }
    }
    parse_calendar_date(input).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `yyyy-MM-dd`, `yyyy-MM` or `yyyy`; missing parts default to the first
fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let mut parts = input.split('-');
    let year = parse_digits(parts.next()?, 4)?;
    let month = parts.next().map(|m| parse_digits(m, 2)).unwrap_or(Some(1))?;
    let day = parts.next().map(|d| parse_digits(d, 2)).unwrap_or(Some(1))?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

fn parse_digits(part: &str, width: usize) -> Option<u32> {
    if part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Translate date-fns tokens to a chrono format string. `None` on unknown tokens.
fn translate_pattern(pattern: &str) -> Option<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // Quoted literal; '' is an escaped quote
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    break;
                }
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        let token = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', 4) => "%B",
            ('d', 1) => "%-d",
            ('d', 2) => "%d",
            ('E', 1..=3) => "%a",
            ('E', 4) => "%A",
            ('H', 1) => "%-H",
            ('H', 2) => "%H",
            ('h', 1) => "%-I",
            ('h', 2) => "%I",
            ('m', 1) => "%-M",
            ('m', 2) => "%M",
            ('s', 1) => "%-S",
            ('s', 2) => "%S",
            ('a', 1..=3) => "%p",
            _ => return None,
        };
        out.push_str(token);
        i += run;
    }

    Some(out)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

/// `125` -> `"2h 5m"`; zero or missing runtime is `"N/A"`
pub fn format_runtime(minutes: Option<u32>) -> String {
    match minutes {
        Some(minutes) if minutes > 0 => format!("{}h {}m", minutes / 60, minutes % 60),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// `1_234_567` -> `"1.2M"`, `4_500` -> `"4.5K"`, smaller numbers unchanged
pub fn format_number(num: Option<f64>) -> String {
    match num {
        None => NOT_AVAILABLE.to_string(),
        Some(n) if n >= 1_000_000.0 => format!("{:.1}M", n / 1_000_000.0),
        Some(n) if n >= 1_000.0 => format!("{:.1}K", n / 1_000.0),
        Some(n) => n.to_string(),
    }
}

/// TMDB votes are 0-10; shown as a rounded percentage (`8.3` -> `"83%"`)
pub fn format_vote_average(vote: Option<f64>) -> String {
    match vote {
        // Half-up rounding, same as the web client did
        Some(vote) => format!("{}%", (vote * 10.0 + 0.5).floor() as i64),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn truncate_string(s: Option<&str>, max_chars: usize) -> String {
    let s = match s {
        Some(s) if !s.is_empty() => s,
        _ => return String::new(),
    };
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

/// URL-friendly slug: `"The Dark Knight!"` -> `"the-dark-knight"`
pub fn create_slug(s: &str) -> String {
    let kept: String = s
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == ' ')
        .collect();

    let mut slug = String::with_capacity(kept.len());
    let mut in_spaces = false;
    for c in kept.chars() {
        if c == ' ' {
            if !in_spaces {
                slug.push('-');
            }
            in_spaces = true;
        } else {
            slug.push(c);
            in_spaces = false;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_default_pattern() {
        assert_eq!(format_date(Some("1999-10-15"), DEFAULT_DATE_PATTERN), "Oct 15, 1999");
        assert_eq!(format_date(Some("2024-03-05T18:30:00Z"), DEFAULT_DATE_PATTERN), "Mar 05, 2024");
        assert_eq!(format_date(Some("2024-03-05T18:30:00.123"), DEFAULT_DATE_PATTERN), "Mar 05, 2024");
    }

    #[test]
    fn test_format_date_other_patterns() {
        assert_eq!(format_date(Some("2011-04-17"), "yyyy"), "2011");
        assert_eq!(format_date(Some("2011-04-17"), "EEEE, MMMM d"), "Sunday, April 17");
        assert_eq!(format_date(Some("2011-04-07"), "d/M/yy"), "7/4/11");
        assert_eq!(format_date(Some("2024-03-05T18:30:00Z"), "HH:mm"), "18:30");
        assert_eq!(format_date(Some("2024-03-05T18:30:00Z"), "h:mm a"), "6:30 PM");
        assert_eq!(format_date(Some("2024-03-05"), "'Aired' yyyy"), "Aired 2024");
        assert_eq!(format_date(Some("2024-03-05"), "yyyy '100%'"), "2024 100%");
    }

    #[test]
    fn test_format_date_fallbacks() {
        assert_eq!(format_date(None, DEFAULT_DATE_PATTERN), "N/A");
        assert_eq!(format_date(Some(""), DEFAULT_DATE_PATTERN), "N/A");
        assert_eq!(format_date(Some("not-a-date"), DEFAULT_DATE_PATTERN), "Invalid Date");
        assert_eq!(format_date(Some("2024-13-40"), DEFAULT_DATE_PATTERN), "Invalid Date");
        assert_eq!(format_date(Some("2024-03-05"), "qqq"), "Invalid Date");
    }

    #[test]
    fn test_format_date_partial_dates() {
        assert_eq!(format_date(Some("2024"), "yyyy"), "2024");
        assert_eq!(format_date(Some("2024"), DEFAULT_DATE_PATTERN), "Jan 01, 2024");
        assert_eq!(format_date(Some("2024-03"), DEFAULT_DATE_PATTERN), "Mar 01, 2024");
        assert_eq!(format_date(Some("2024-13"), DEFAULT_DATE_PATTERN), INVALID_DATE);
        assert_eq!(format_date(Some("2024-02-30"), DEFAULT_DATE_PATTERN), INVALID_DATE);
        assert_eq!(format_date(Some("24"), "yyyy"), INVALID_DATE);
        assert_eq!(format_date(Some("2024-3"), "yyyy"), INVALID_DATE);
    }

    #[test]
    fn test_format_runtime() {
        assert_eq!(format_runtime(Some(0)), "N/A");
        assert_eq!(format_runtime(None), "N/A");
        assert_eq!(format_runtime(Some(125)), "2h 5m");
        assert_eq!(format_runtime(Some(45)), "0h 45m");
        assert_eq!(format_runtime(Some(120)), "2h 0m");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(None), "N/A");
        assert_eq!(format_number(Some(1_234_567.0)), "1.2M");
        assert_eq!(format_number(Some(1_000_000.0)), "1.0M");
        assert_eq!(format_number(Some(4_500.0)), "4.5K");
        assert_eq!(format_number(Some(999.0)), "999");
        assert_eq!(format_number(Some(0.0)), "0");
    }

    #[test]
    fn test_format_vote_average() {
        assert_eq!(format_vote_average(Some(8.3)), "83%");
        assert_eq!(format_vote_average(Some(7.46)), "75%");
        assert_eq!(format_vote_average(Some(0.0)), "0%");
        assert_eq!(format_vote_average(Some(10.0)), "100%");
        assert_eq!(format_vote_average(None), "N/A");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string(Some("short"), 10), "short");
        assert_eq!(truncate_string(Some("exactly10!"), 10), "exactly10!");
        assert_eq!(truncate_string(Some("a longer overview"), 8), "a longer...");
        assert_eq!(truncate_string(Some("Amélie Poulain"), 6), "Amélie...");
        assert_eq!(truncate_string(None, 5), "");
        assert_eq!(truncate_string(Some(""), 5), "");
    }

    #[test]
    fn test_create_slug() {
        assert_eq!(create_slug("The Dark Knight!"), "the-dark-knight");
        assert_eq!(create_slug("Spider-Man:  No Way Home"), "spiderman-no-way-home");
        assert_eq!(create_slug("WALL·E"), "walle");
    }
}
