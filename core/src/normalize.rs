//! Text normalization helpers shared by the scraping and PDF importers.

use std::sync::OnceLock;

use regex::Regex;

use crate::record::{DEFAULT_COOK_TIME, DEFAULT_SERVINGS};

fn hours_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*(?:hours?|hrs?|h)\b").unwrap())
}

fn minutes_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*(?:minutes?|mins?|m)\b").unwrap())
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)").unwrap())
}

fn range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*-\s*(\d+)").unwrap())
}

/// Collapse runs of whitespace and trim.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a free-form duration into minutes.
///
/// "30 minutes" -> 30, "1 hour" -> 60, "1 hour 30 minutes" -> 90,
/// "45 mins" -> 45. A bare number is taken as minutes; anything
/// unparsable falls back to the catalog default.
pub fn parse_minutes(text: &str) -> u32 {
    let text = text.to_lowercase();
    let mut total = 0;

    if let Some(caps) = hours_re().captures(&text) {
        total += caps[1].parse::<u32>().unwrap_or(0) * 60;
    }
    if let Some(caps) = minutes_re().captures(&text) {
        total += caps[1].parse::<u32>().unwrap_or(0);
    }
    if total == 0 {
        if let Some(caps) = number_re().captures(&text) {
            total = caps[1].parse::<u32>().unwrap_or(0);
        }
    }

    if total > 0 {
        total
    } else {
        DEFAULT_COOK_TIME
    }
}

/// Parse a serving count out of free text.
///
/// "Serves 4" -> 4, "4-6 servings" -> 5 (range average),
/// "Makes 6 portions" -> 6.
pub fn parse_servings(text: &str) -> u32 {
    let text = text.to_lowercase();

    if let Some(caps) = range_re().captures(&text) {
        let low = caps[1].parse::<u32>().unwrap_or(0);
        let high = caps[2].parse::<u32>().unwrap_or(0);
        let avg = (low + high) / 2;
        if avg > 0 {
            return avg;
        }
    }

    if let Some(caps) = number_re().captures(&text) {
        let n = caps[1].parse::<u32>().unwrap_or(0);
        if n > 0 {
            return n;
        }
    }

    DEFAULT_SERVINGS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  two   words \n here "), "two words here");
    }

    #[test]
    fn test_parse_minutes_plain() {
        assert_eq!(parse_minutes("30 minutes"), 30);
        assert_eq!(parse_minutes("45 mins"), 45);
    }

    #[test]
    fn test_parse_minutes_hours() {
        assert_eq!(parse_minutes("1 hour"), 60);
        assert_eq!(parse_minutes("1 hour 30 minutes"), 90);
        assert_eq!(parse_minutes("2 hrs 15 min"), 135);
    }

    #[test]
    fn test_parse_minutes_bare_number() {
        assert_eq!(parse_minutes("Prep: 20"), 20);
    }

    #[test]
    fn test_parse_minutes_fallback() {
        assert_eq!(parse_minutes("a while"), DEFAULT_COOK_TIME);
    }

    #[test]
    fn test_parse_servings() {
        assert_eq!(parse_servings("Serves 4"), 4);
        assert_eq!(parse_servings("4-6 servings"), 5);
        assert_eq!(parse_servings("Makes 6 portions"), 6);
        assert_eq!(parse_servings("family sized"), DEFAULT_SERVINGS);
    }
}
