use crate::models::Sport;
use crate::reference::KeywordTables;

/// Sport when neither the player nor the team settled it.
///
/// Tries the brand-to-sport table on the brand, then on the full text, then
/// counts domain terms (league names, stat abbreviations). `Other` when
/// nothing matches.
pub fn fallback_category(brand: Option<&str>, full_text: &str, keywords: &KeywordTables) -> Sport {
    brand
        .and_then(|b| keywords.sport_for_brand(b))
        .or_else(|| keywords.sport_for_brand(full_text))
        .or_else(|| keywords.sport_from_terms(full_text))
        .unwrap_or(Sport::Other)
}
