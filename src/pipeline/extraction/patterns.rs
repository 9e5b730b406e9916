use std::sync::LazyLock;

use regex::Regex;

use super::types::PatternGroups;

/// Four-digit year with an optional two-digit season suffix ("2019-20").
static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(1[0-9]{3}|20[0-9]{2})(?:-(\d{2}))?\b").expect("valid regex"));

static BARE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("valid regex"));

static FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,4})\s?/\s?(\d{1,5})\b").expect("valid regex"));

static CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s?\d{1,3}(?:,\d{3})*(?:\.\d{2})?\b").expect("valid regex"));

static PERCENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{1,3}(?:\.\d+)?%").expect("valid regex"));

static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[A-Z]{1,3}-?\d{1,4}\b").expect("valid regex"));

const STAT_UNITS: &str =
    "AVG|HR|RBI|ERA|OPS|SB|PPG|RPG|APG|SPG|BPG|TDS?|YDS|REC|INT|SACKS|GOALS|ASSISTS|PTS|PIM|GAA";

static STAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?:\b\d+(?:\.\d+)?|\.\d+)\s*(?:{STAT_UNITS})\b")).expect("valid regex")
});

/// A stat unit right after a number ("1052 YDS").
static STAT_UNIT_AHEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)^\s*(?:{STAT_UNITS})\b")).expect("valid regex"));

static SET_DESCRIPTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:BASE SET|INSERT|PARALLEL|VARIATION|SSP|SP)\b").expect("valid regex"));

static GRADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(PSA|BGS|SGC|CGC)\s*(?:GEM\s*MINT|GEM\s*MT|NM-MT|MINT|NM)?\s*(\d{1,2}(?:\.5)?)\b")
        .expect("valid regex")
});

static CERT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCERT\w*\s*(?:#|NO\.?)?\s*:?\s*(\d{7,})\b").expect("valid regex"));

static CARD_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#?\w+-?\d+$").expect("valid regex"));

static CARD_NUMBER_PLAIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+[A-Z]?$").expect("valid regex"));

static CARD_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:CARD\s*(?:NO\.?|#)?|NO\.)\s*").expect("valid regex"));

/// Extract every named pattern group from `text`.
pub fn extract_patterns(text: &str) -> PatternGroups {
    let upper = text.to_uppercase();
    PatternGroups {
        years: YEAR
            .find_iter(text)
            .filter(|m| !touches_number_punctuation(text, m.start(), m.end()))
            .filter(|m| !is_stat_value(text, m.end()))
            .map(|m| m.as_str().to_string())
            .collect(),
        fractions: fraction_captures(text)
            .map(|c| format!("{}/{}", &c[1], &c[2]))
            .collect(),
        currency: all_matches(&CURRENCY, text),
        percentages: all_matches(&PERCENT, text),
        codes: all_matches(&CODE, &upper)
            .into_iter()
            .filter(|code| code.chars().any(|c| c.is_ascii_alphabetic()))
            .collect(),
        stats: all_matches(&STAT, text),
        set_descriptors: all_matches(&SET_DESCRIPTOR, &upper),
    }
}

fn all_matches(re: &Regex, text: &str) -> Vec<String> {
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// True when the match sits inside a fraction, a card number or a price.
fn touches_number_punctuation(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    matches!(before, Some('/' | '#' | '$' | '.'))
        || matches!(after, Some('/' | '%'))
        || (after == Some('.') && text[end + 1..].starts_with(|c: char| c.is_ascii_digit()))
}

/// Number followed by a stat unit, so not a year.
fn is_stat_value(text: &str, end: usize) -> bool {
    STAT_UNIT_AHEAD.is_match(&text[end..])
}

/// "N/M" fractions, skipping the parts of a date such as "8/7/1991".
fn fraction_captures(text: &str) -> impl Iterator<Item = regex::Captures<'_>> {
    FRACTION.captures_iter(text).filter(move |c| {
        let whole = c.get(0).map_or(0..0, |m| m.range());
        !is_date_part(text, whole.start, whole.end)
    })
}

/// True when the match is chained to another number by '/' on either side.
fn is_date_part(text: &str, start: usize, end: usize) -> bool {
    let after = text[end..].trim_start();
    let chained_after = after
        .strip_prefix('/')
        .is_some_and(|rest| rest.trim_start().starts_with(|c: char| c.is_ascii_digit()));

    let before = text[..start].trim_end();
    let chained_before = before
        .strip_suffix('/')
        .is_some_and(|rest| rest.trim_end().ends_with(|c: char| c.is_ascii_digit()));

    chained_after || chained_before
}

/// First bare 19xx/20xx token in `text`.
pub fn bare_year(text: &str) -> Option<i32> {
    BARE_YEAR
        .find_iter(text)
        .find(|m| !touches_number_punctuation(text, m.start(), m.end()) && !is_stat_value(text, m.end()))
        .and_then(|m| m.as_str().parse().ok())
}

/// Card number carried by a whole region ("#RA-15", "Card No. 87", "30").
/// Leading "Card"/"No."/"#" prefixes are stripped. Bare years are rejected.
pub fn card_number_in(region: &str) -> Option<String> {
    let trimmed = region.trim();
    let unprefixed = CARD_PREFIX.replace(trimmed, "");
    let candidate = unprefixed.trim();
    let plain = candidate.trim_start_matches('#').trim_start();
    if !(CARD_NUMBER.is_match(candidate) || CARD_NUMBER_PLAIN.is_match(plain)) {
        return None;
    }
    let number = strip_card_prefix(candidate);
    if number.is_empty() || is_bare_year(&number) {
        return None;
    }
    Some(number)
}

/// Drop a leading "Card"/"No."/"#" prefix from a card number.
pub fn strip_card_prefix(raw: &str) -> String {
    let unprefixed = CARD_PREFIX.replace(raw.trim(), "");
    unprefixed.trim().trim_start_matches('#').trim().to_string()
}

fn is_bare_year(text: &str) -> bool {
    text.len() == 4 && BARE_YEAR.is_match(text)
}

/// True when `line` is shaped like a card number on its own.
pub fn is_card_number_line(line: &str) -> bool {
    card_number_in(line).is_some()
}

pub fn has_fraction(text: &str) -> bool {
    fraction_captures(text).next().is_some()
}

/// Grading company and numeric grade, e.g. ("PSA", "10").
pub fn grading_in(text: &str) -> Option<(String, String)> {
    GRADING.captures_iter(text).find_map(|c| {
        let grade: f32 = c[2].parse().ok()?;
        (1.0..=10.0)
            .contains(&grade)
            .then(|| (c[1].to_uppercase(), c[2].to_string()))
    })
}

pub fn has_grading_label(text: &str) -> bool {
    grading_in(text).is_some()
}

/// Certificate number (7+ digits) following "Cert".
pub fn cert_in(text: &str) -> Option<String> {
    CERT.captures(text).map(|c| c[1].to_string())
}
