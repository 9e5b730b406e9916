use std::sync::LazyLock;

use regex::Regex;

use crate::models::{CardFeatures, ExtractedCardData};
use crate::pipeline::extraction::patterns::has_grading_label;
use crate::pipeline::extraction::PatternGroups;
use crate::reference::PlayerInfo;

static ROOKIE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i:\bROOKIE\b|\b1ST\s+BOWMAN\b)|\bRC\b").expect("valid regex"));

static AUTOGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:AUTO|AUTOGRAPH(?:ED)?|SIGNED|SIGNATURE)\b").expect("valid regex"));

static RELIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:RELIC|PATCH|JERSEY|MEMORABILIA|GAME[\s-]*USED|GAME[\s-]*WORN|WORN|SWATCH)\b")
        .expect("valid regex")
});

static INSERT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bINSERTS?\b").expect("valid regex"));

// SP/SSP only in capitals; "sp" inside prose is noise.
static SHORT_PRINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bS?SP\b|(?i:\bSHORT\s+PRINT\b)").expect("valid regex"));

static VARIATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:VARIATION|VAR)\b").expect("valid regex"));

static ONE_OF_ONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b1\s*/\s*1\b|(?i:\bONE\s+OF\s+ONE\b)").expect("valid regex"));

/// Independent flag checks over the full text and the resolved fields.
pub fn detect_features(
    full_text: &str,
    patterns: &PatternGroups,
    data: &ExtractedCardData,
    player: Option<&PlayerInfo>,
) -> CardFeatures {
    let rookie_year = matches!(
        (player.and_then(|p| p.rookie_year), data.year),
        (Some(rookie), Some(year)) if rookie == year
    );

    CardFeatures {
        is_rookie: ROOKIE.is_match(full_text) || rookie_year,
        is_autograph: AUTOGRAPH.is_match(full_text),
        is_relic: RELIC.is_match(full_text),
        is_numbered: !patterns.fractions.is_empty(),
        is_graded: has_grading_label(full_text),
        is_parallel: data.parallel.is_some(),
        is_insert: INSERT.is_match(full_text),
        is_short_print: has_short_print(full_text),
        is_variation: VARIATION.is_match(full_text),
        is_one_of_one: ONE_OF_ONE.is_match(full_text),
    }
}

/// "SP Authentic" is an Upper Deck product line, not a short print.
fn has_short_print(text: &str) -> bool {
    SHORT_PRINT.find_iter(text).any(|m| {
        let rest = text[m.end()..].trim_start();
        let authentic = rest.get(..9).is_some_and(|w| w.eq_ignore_ascii_case("AUTHENTIC"));
        !(m.as_str() == "SP" && authentic)
    })
}
