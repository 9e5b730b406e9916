//! Key normalization shared by every reference lookup.
//!
//! Keys are uppercased, accent-folded and whitespace-collapsed so that
//! "Ronald Acuña Jr." and "RONALD ACUNA JR." land on the same entry.

/// Name suffix tokens ignored for last-name and fuzzy matching.
const SUFFIXES: &[&str] = &["JR", "JR.", "SR", "SR.", "II", "III", "IV"];

/// Uppercase, fold accents and collapse whitespace.
pub fn fold_key(text: &str) -> String {
    let folded: String = text.chars().map(fold_char).collect::<String>().to_uppercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn fold_char(c: char) -> char {
    match c {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Ç' | 'Č' | 'Ć' => 'C',
        'ç' | 'č' | 'ć' => 'c',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ñ' => 'N',
        'ñ' => 'n',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => 'O',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ý' => 'Y',
        'ý' | 'ÿ' => 'y',
        'Š' => 'S',
        'š' => 's',
        'Ž' => 'Z',
        'ž' => 'z',
        'Đ' => 'D',
        'đ' => 'd',
        other => other,
    }
}

pub fn is_suffix(token: &str) -> bool {
    SUFFIXES.contains(&token)
}

/// Drop a trailing JR/SR/II/III/IV token from a folded key.
pub fn strip_suffix(key: &str) -> String {
    let mut tokens: Vec<&str> = key.split_whitespace().collect();
    if tokens.len() > 1 && tokens.last().is_some_and(|t| is_suffix(t)) {
        tokens.pop();
    }
    tokens.join(" ")
}

/// Last token of a folded key that is not a name suffix.
pub fn last_name_token(key: &str) -> Option<&str> {
    key.split_whitespace().rev().find(|t| !is_suffix(t))
}

/// Whole-word phrase containment on already-folded text.
///
/// "LEAF" does not match inside "MAPLE LEAFS"; "GOLD" does not match "GOLDEN".
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let mut start = 0;
    while let Some(found) = haystack[start..].find(phrase) {
        let begin = start + found;
        let end = begin + phrase.len();
        let before_ok = haystack[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = begin + haystack[begin..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Title-case a raw OCR string as a best-effort display name.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut out: String = first.to_uppercase().collect();
                    out.push_str(&chars.as_str().to_lowercase());
                    out
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_key_uppercases_and_removes_accents() {
        assert_eq!(fold_key("Ronald  Acuña Jr."), "RONALD ACUNA JR.");
        assert_eq!(fold_key("Luka Dončić"), "LUKA DONCIC");
        assert_eq!(fold_key("  Kylian Mbappé "), "KYLIAN MBAPPE");
    }

    #[test]
    fn strip_suffix_only_drops_trailing_suffix() {
        assert_eq!(strip_suffix("MIKE TROUT JR"), "MIKE TROUT");
        assert_eq!(strip_suffix("KEN GRIFFEY JR."), "KEN GRIFFEY");
        assert_eq!(strip_suffix("JR"), "JR");
        assert_eq!(strip_suffix("HENRY III FORD"), "HENRY III FORD");
    }

    #[test]
    fn last_name_skips_suffix() {
        assert_eq!(last_name_token("FERNANDO TATIS JR."), Some("TATIS"));
        assert_eq!(last_name_token("MIKE TROUT"), Some("TROUT"));
    }

    #[test]
    fn contains_phrase_respects_word_boundaries() {
        assert!(contains_phrase("2023 TOPPS CHROME", "TOPPS"));
        assert!(!contains_phrase("TORONTO MAPLE LEAFS", "LEAF"));
        assert!(!contains_phrase("GOLDEN STATE WARRIORS", "GOLD"));
        assert!(contains_phrase("GOLD REFRACTOR", "GOLD"));
        assert!(contains_phrase("SCORE", "SCORE"));
        assert!(!contains_phrase("ANYTHING", ""));
    }

    #[test]
    fn contains_phrase_finds_later_occurrence() {
        assert!(contains_phrase("GOLDEN GOLD", "GOLD"));
    }

    #[test]
    fn title_case_normalizes_shouting() {
        assert_eq!(title_case("JOHN  SMITH"), "John Smith");
        assert_eq!(title_case("atlanta braves"), "Atlanta Braves");
    }
}
