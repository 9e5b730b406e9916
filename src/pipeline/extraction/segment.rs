//! Layout recovery for OCR text that arrives without coordinates.
//!
//! Each non-empty line becomes one region placed where that kind of text
//! usually sits on a card: brand and grading labels on top, player and team in
//! the middle, card number, serial and finish lines at the bottom.

use super::confidence::region_confidence;
use super::correction::correct_lookalikes;
use super::patterns::{has_fraction, has_grading_label, is_card_number_line};
use super::sanitize::sanitize_card_text;
use super::types::TextRegion;
use crate::models::{FontSize, RegionPosition};
use crate::reference::normalize::fold_key;
use crate::reference::ReferenceIndex;

/// Turn raw OCR text into positioned regions.
pub fn segment_lines(raw: &str, reference: &ReferenceIndex) -> Vec<TextRegion> {
    let clean = sanitize_card_text(raw);
    let lines: Vec<(String, usize)> = clean
        .lines()
        .map(|line| correct_lookalikes(line, reference))
        .collect();

    let player_line = find_player_line(&lines, reference);
    let total = lines.len();

    lines
        .iter()
        .enumerate()
        .map(|(idx, (text, corrections))| {
            let confidence = region_confidence(text, *corrections);
            let region = TextRegion::new(text.clone(), confidence, RegionPosition::Middle);
            if Some(idx) == player_line {
                return region.styled(FontSize::Large, true);
            }
            classify(region, idx, total, reference)
        })
        .collect()
}

fn classify(region: TextRegion, idx: usize, total: usize, reference: &ReferenceIndex) -> TextRegion {
    let text = region.text.as_str();
    let keywords = reference.keywords();

    let (position, size, bold) = if keywords.has_brand_keyword(text) {
        (RegionPosition::Top, FontSize::Large, true)
    } else if has_grading_label(text) {
        (RegionPosition::Top, FontSize::Small, false)
    } else if is_card_number_line(text) || has_fraction(text) {
        (RegionPosition::Bottom, FontSize::Small, false)
    } else if is_alphabetic_line(text) && reference.find_team(text, None).is_some() {
        (RegionPosition::Middle, FontSize::Medium, false)
    } else if keywords.parallel_in(text).is_some() {
        (RegionPosition::Bottom, FontSize::Small, false)
    } else if is_alphabetic_line(text) && word_count(text) <= 4 && !is_card_vocabulary(text, reference) {
        (RegionPosition::Middle, FontSize::Medium, false)
    } else {
        (position_by_ordinal(idx, total), FontSize::Small, false)
    };

    TextRegion {
        position,
        ..region
    }
    .styled(size, bold)
}

/// Index of the line that most likely carries the player name: the first
/// all-caps line of 2 to 5 words, else the first alphabetic line of 2 or 3
/// words. Brand, team and card-vocabulary lines never qualify.
fn find_player_line(lines: &[(String, usize)], reference: &ReferenceIndex) -> Option<usize> {
    let eligible = |text: &str| {
        is_alphabetic_line(text)
            && !reference.keywords().has_brand_keyword(text)
            && reference.find_team(text, None).is_none()
            && !is_card_vocabulary(text, reference)
    };

    lines
        .iter()
        .position(|(text, _)| {
            (2..=5).contains(&word_count(text)) && is_all_caps(text) && eligible(text)
        })
        .or_else(|| {
            lines
                .iter()
                .position(|(text, _)| (2..=3).contains(&word_count(text)) && eligible(text))
        })
}

fn position_by_ordinal(idx: usize, total: usize) -> RegionPosition {
    match idx * 3 / total.max(1) {
        0 => RegionPosition::Top,
        1 => RegionPosition::Middle,
        _ => RegionPosition::Bottom,
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Letters plus the punctuation names carry ("ACUÑA JR.", "O'NEAL", "SMITH-NJIGBA").
fn is_alphabetic_line(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
        && text
            .chars()
            .all(|c| c.is_alphabetic() || c == ' ' || matches!(c, '.' | '\'' | '-' | '&'))
}

fn is_all_caps(text: &str) -> bool {
    !text.chars().any(char::is_lowercase)
}

/// Every word is a parallel keyword or a generic card term ("GOLD REFRACTOR",
/// "Rookie Card").
fn is_card_vocabulary(text: &str, reference: &ReferenceIndex) -> bool {
    let keywords = reference.keywords();
    fold_key(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .all(|word| {
            keywords.parallel_keywords.iter().any(|k| k == word)
                || keywords.card_terms.iter().any(|k| k == word)
        })
}
