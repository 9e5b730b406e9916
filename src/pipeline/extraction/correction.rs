//! Post-OCR look-alike correction.
//!
//! Two passes over each alphanumeric word. Single characters swapped between
//! letter and digit (O/0, I/1, l/1, S/5, B/8) are fixed only when both
//! neighbours belong to the other class, inside a run of at least three
//! characters: "T0PPS" becomes "TOPPS", "2O23" becomes "2023", "RA-15" is left
//! alone. Multi-character confusions (rn/m, II/ll) are only applied when they
//! turn an unknown word into a word from the reference vocabulary.

use crate::reference::ReferenceIndex;

/// Shortest alphanumeric run eligible for single-character fixes.
const MIN_RUN_LEN: usize = 3;

/// Apply look-alike corrections to one line of text.
/// Returns the corrected line and how many corrections were made.
pub fn correct_lookalikes(text: &str, reference: &ReferenceIndex) -> (String, usize) {
    let mut result = String::with_capacity(text.len());
    let mut word_buf = String::new();
    let mut corrections = 0;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            word_buf.push(ch);
        } else {
            if !word_buf.is_empty() {
                let (word, fixes) = try_correct_word(&word_buf, reference);
                result.push_str(&word);
                corrections += fixes;
                word_buf.clear();
            }
            result.push(ch);
        }
    }

    // Handle last word
    if !word_buf.is_empty() {
        let (word, fixes) = try_correct_word(&word_buf, reference);
        result.push_str(&word);
        corrections += fixes;
    }

    (result, corrections)
}

fn try_correct_word(word: &str, reference: &ReferenceIndex) -> (String, usize) {
    let (fixed, char_fixes) = fix_characters(word, reference);
    match fix_digraphs(&fixed, reference) {
        Some(corrected) => (corrected, char_fixes + 1),
        None => (fixed, char_fixes),
    }
}

fn fix_characters(word: &str, reference: &ReferenceIndex) -> (String, usize) {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() < MIN_RUN_LEN {
        return (word.to_string(), 0);
    }

    let confusions = &reference.keywords().character_confusions;
    let mut out = chars.clone();
    let mut fixes = 0;

    for i in 1..chars.len() - 1 {
        let (prev, c, next) = (out[i - 1], chars[i], chars[i + 1]);

        if c.is_ascii_digit() && prev.is_alphabetic() && next.is_alphabetic() {
            // Several letters can share one digit (I and l for 1); pick the
            // one whose case matches the surrounding letters.
            let lower_context = prev.is_lowercase() && next.is_lowercase();
            let candidates: Vec<char> = confusions
                .iter()
                .filter(|pair| pair.digit == c)
                .map(|pair| pair.letter)
                .collect();
            let letter = candidates
                .iter()
                .copied()
                .find(|l| l.is_lowercase() == lower_context)
                .or_else(|| candidates.first().copied());
            if let Some(letter) = letter {
                out[i] = match_case(letter, lower_context);
                fixes += 1;
            }
        } else if c.is_alphabetic() && prev.is_ascii_digit() && next.is_ascii_digit() {
            let digit = confusions
                .iter()
                .find(|pair| pair.letter == c || pair.letter == c.to_ascii_uppercase())
                .map(|pair| pair.digit);
            if let Some(digit) = digit {
                out[i] = digit;
                fixes += 1;
            }
        }
    }

    (out.into_iter().collect(), fixes)
}

fn match_case(letter: char, lower: bool) -> char {
    if lower {
        letter.to_ascii_lowercase()
    } else {
        letter.to_ascii_uppercase()
    }
}

/// Swap one digraph confusion when that makes an unknown word known.
fn fix_digraphs(word: &str, reference: &ReferenceIndex) -> Option<String> {
    if word.chars().count() < MIN_RUN_LEN || reference.is_known_word(word) {
        return None;
    }

    let upper = word.to_uppercase();
    for confusion in &reference.keywords().digraph_confusions {
        let seen = confusion.seen.to_uppercase();
        let meant = confusion.meant.to_uppercase();

        let all = upper.replace(&seen, &meant);
        if all != upper && reference.is_known_word(&all) {
            return Some(preserve_case(word, &all));
        }

        for (idx, _) in upper.match_indices(&seen) {
            let mut candidate = String::with_capacity(upper.len());
            candidate.push_str(&upper[..idx]);
            candidate.push_str(&meant);
            candidate.push_str(&upper[idx + seen.len()..]);
            if reference.is_known_word(&candidate) {
                return Some(preserve_case(word, &candidate));
            }
        }
    }
    None
}

/// Preserve the original word's capitalization pattern when applying correction.
fn preserve_case(original: &str, correction: &str) -> String {
    if original.chars().all(|c| c.is_uppercase() || !c.is_alphabetic()) {
        return correction.to_uppercase();
    }

    let lower = correction.to_lowercase();
    let first_upper = original.chars().next().is_some_and(|c| c.is_uppercase());
    if first_upper {
        let mut chars = lower.chars();
        match chars.next() {
            Some(c) => {
                let mut s = c.to_uppercase().to_string();
                s.extend(chars);
                s
            }
            None => lower,
        }
    } else {
        lower
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correct(text: &str) -> (String, usize) {
        let index = ReferenceIndex::bundled().unwrap();
        correct_lookalikes(text, &index)
    }

    #[test]
    fn digit_inside_word_becomes_letter() {
        assert_eq!(correct("T0PPS CHR0ME"), ("TOPPS CHROME".to_string(), 2));
        assert_eq!(correct("B0WMAN").0, "BOWMAN");
    }

    #[test]
    fn letter_inside_number_becomes_digit() {
        assert_eq!(correct("2O23 Topps").0, "2023 Topps");
        assert_eq!(correct("1O5 cards").0, "105 cards");
        assert_eq!(correct("1S0").0, "150");
    }

    #[test]
    fn one_picks_letter_by_context_case() {
        assert_eq!(correct("W1LLIAMS").0, "WILLIAMS");
        assert_eq!(correct("Wi1liams").0, "Williams");
    }

    #[test]
    fn card_codes_are_left_alone() {
        assert_eq!(correct("#RA-15"), ("#RA-15".to_string(), 0));
        assert_eq!(correct("T87"), ("T87".to_string(), 0));
        assert_eq!(correct("2023"), ("2023".to_string(), 0));
    }

    #[test]
    fn digraph_fix_needs_vocabulary_hit() {
        assert_eq!(correct("PATRICK MAHORNES"), ("PATRICK MAHOMES".to_string(), 1));
        assert_eq!(correct("Mahornes").0, "Mahomes");
        // Unknown either way: left untouched.
        assert_eq!(correct("CORNWALL"), ("CORNWALL".to_string(), 0));
    }

    #[test]
    fn known_words_are_never_rewritten() {
        assert_eq!(correct("MAHOMES"), ("MAHOMES".to_string(), 0));
        assert_eq!(correct("RONALD ACUÑA JR."), ("RONALD ACUÑA JR.".to_string(), 0));
    }

    #[test]
    fn preserve_case_follows_original() {
        assert_eq!(preserve_case("MAHORNES", "MAHOMES"), "MAHOMES");
        assert_eq!(preserve_case("Mahornes", "MAHOMES"), "Mahomes");
        assert_eq!(preserve_case("mahornes", "MAHOMES"), "mahomes");
    }
}
