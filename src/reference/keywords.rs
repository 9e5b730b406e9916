use super::normalize::{contains_phrase, fold_key};
use super::types::{BrandKeyword, BrandSport, CharacterConfusion, DigraphConfusion, SportTerms};
use crate::models::Sport;

/// Keyword and correction tables, loaded once from keywords.json.
///
/// Table order matters: the first matching brand keyword wins, so more
/// specific phrases ("TOPPS CHROME") are listed before generic ones ("TOPPS").
#[derive(Debug, Clone)]
pub struct KeywordTables {
    pub brand_keywords: Vec<BrandKeyword>,
    pub brand_sports: Vec<BrandSport>,
    pub sport_keywords: Vec<SportTerms>,
    pub parallel_keywords: Vec<String>,
    pub card_terms: Vec<String>,
    pub character_confusions: Vec<CharacterConfusion>,
    pub digraph_confusions: Vec<DigraphConfusion>,
}

impl KeywordTables {
    /// First brand keyword found in `text`.
    pub fn match_brand(&self, text: &str) -> Option<&BrandKeyword> {
        let key = fold_key(text);
        self.brand_keywords
            .iter()
            .find(|entry| contains_phrase(&key, &entry.keyword))
    }

    pub fn has_brand_keyword(&self, text: &str) -> bool {
        self.match_brand(text).is_some()
    }

    /// Sport implied by a sport-exclusive brand or product line.
    pub fn sport_for_brand(&self, text: &str) -> Option<Sport> {
        let key = fold_key(text);
        self.brand_sports
            .iter()
            .find(|entry| contains_phrase(&key, &entry.keyword))
            .map(|entry| entry.sport)
    }

    /// Sport with the most domain-term hits; ties go to the earlier table entry.
    pub fn sport_from_terms(&self, text: &str) -> Option<Sport> {
        let key = fold_key(text);
        let mut best: Option<(Sport, usize)> = None;
        for entry in &self.sport_keywords {
            let hits = entry
                .terms
                .iter()
                .filter(|term| contains_phrase(&key, term))
                .count();
            if hits > 0 && best.map_or(true, |(_, top)| hits > top) {
                best = Some((entry.sport, hits));
            }
        }
        best.map(|(sport, _)| sport)
    }

    /// Highest-priority parallel keyword present in `text`.
    pub fn parallel_in(&self, text: &str) -> Option<&str> {
        let key = fold_key(text);
        self.parallel_keywords
            .iter()
            .find(|kw| contains_phrase(&key, kw))
            .map(String::as_str)
    }
}
