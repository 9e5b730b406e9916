use serde::{Deserialize, Serialize};

use crate::models::Sport;

/// Dataset schema version accepted by this build.
pub const DATASET_VERSION: u32 = 1;

/// Reference record for one athlete (loaded from players.json).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub name: String,
    pub sport: Sport,
    /// First entry is the primary team.
    pub teams: Vec<String>,
    /// Active ranges such as "2011-present" or "1989-2010".
    pub years: Vec<String>,
    #[serde(default)]
    pub nicknames: Vec<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub rookie_year: Option<i32>,
}

impl PlayerInfo {
    pub fn primary_team(&self) -> Option<&str> {
        self.teams.first().map(String::as_str)
    }

    /// Parsed active-year ranges; "present" resolves to `current_year`.
    pub fn active_ranges(&self, current_year: i32) -> Vec<(i32, i32)> {
        self.years
            .iter()
            .filter_map(|range| {
                let (start, end) = range.split_once('-')?;
                let start: i32 = start.trim().parse().ok()?;
                let end = match end.trim() {
                    "present" => current_year,
                    other => other.parse().ok()?,
                };
                Some((start, end))
            })
            .collect()
    }
}

/// Reference record for one franchise (loaded from teams.json).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInfo {
    pub name: String,
    pub sport: Sport,
    pub city: String,
    #[serde(default)]
    pub abbreviations: Vec<String>,
}

/// One licensing window for a sport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportLicense {
    pub sport: Sport,
    pub start_year: i32,
    /// Inclusive; `None` means still active.
    #[serde(default)]
    pub end_year: Option<i32>,
    pub exclusive: bool,
    pub major_set_names: Vec<String>,
}

impl SportLicense {
    pub fn covers(&self, sport: Sport, year: i32) -> bool {
        self.sport == sport
            && year >= self.start_year
            && self.end_year.map_or(true, |end| year <= end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturerInfo {
    pub name: String,
    pub founded_year: i32,
    #[serde(default)]
    pub defunct_year: Option<i32>,
    pub sports_licenses: Vec<SportLicense>,
}

impl ManufacturerInfo {
    /// The license record covering `sport` at `year`, if any.
    pub fn license_for(&self, sport: Sport, year: i32) -> Option<&SportLicense> {
        self.sports_licenses.iter().find(|l| l.covers(sport, year))
    }
}

/// Era-appropriate default manufacturers for a sport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EraRule {
    pub sport: Sport,
    pub start_year: i32,
    #[serde(default)]
    pub end_year: Option<i32>,
    pub primary: String,
    #[serde(default)]
    pub secondary: Option<String>,
}

impl EraRule {
    pub fn covers(&self, sport: Sport, year: i32) -> bool {
        self.sport == sport
            && year >= self.start_year
            && self.end_year.map_or(true, |end| year <= end)
    }
}

/// Rookie-oriented manufacturer preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RookieSetRule {
    pub sport: Sport,
    pub from_year: i32,
    pub manufacturer: String,
}

// ── File envelopes ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct PlayersFile {
    pub version: u32,
    pub players: Vec<PlayerInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TeamsFile {
    pub version: u32,
    pub teams: Vec<TeamInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ManufacturersFile {
    pub version: u32,
    pub manufacturers: Vec<ManufacturerInfo>,
    #[serde(default)]
    pub eras: Vec<EraRule>,
    #[serde(default)]
    pub rookie_sets: Vec<RookieSetRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrandKeyword {
    pub keyword: String,
    pub brand: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrandSport {
    pub keyword: String,
    pub sport: Sport,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SportTerms {
    pub sport: Sport,
    pub terms: Vec<String>,
}

/// A letter/digit pair that OCR engines swap for each other.
#[derive(Debug, Clone, Deserialize)]
pub struct CharacterConfusion {
    pub letter: char,
    pub digit: char,
}

/// A character sequence commonly misread as another (e.g. "RN" for "M").
#[derive(Debug, Clone, Deserialize)]
pub struct DigraphConfusion {
    pub seen: String,
    pub meant: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct KeywordsFile {
    pub version: u32,
    pub brand_keywords: Vec<BrandKeyword>,
    pub brand_sports: Vec<BrandSport>,
    pub sport_keywords: Vec<SportTerms>,
    pub parallel_keywords: Vec<String>,
    #[serde(default)]
    pub card_terms: Vec<String>,
    #[serde(default)]
    pub character_confusions: Vec<CharacterConfusion>,
    #[serde(default)]
    pub digraph_confusions: Vec<DigraphConfusion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn license(start: i32, end: Option<i32>) -> SportLicense {
        SportLicense {
            sport: Sport::Basketball,
            start_year: start,
            end_year: end,
            exclusive: false,
            major_set_names: vec![],
        }
    }

    #[test]
    fn license_bounds_are_inclusive() {
        let l = license(1991, Some(2009));
        assert!(l.covers(Sport::Basketball, 1991));
        assert!(l.covers(Sport::Basketball, 2009));
        assert!(!l.covers(Sport::Basketball, 2010));
        assert!(!l.covers(Sport::Basketball, 1990));
    }

    #[test]
    fn open_ended_license_covers_future_years() {
        let l = license(2009, None);
        assert!(l.covers(Sport::Basketball, 2040));
        assert!(!l.covers(Sport::Football, 2015));
    }

    #[test]
    fn active_ranges_resolve_present() {
        let player = PlayerInfo {
            name: "Test Player".into(),
            sport: Sport::Baseball,
            teams: vec!["Braves".into()],
            years: vec!["2018-present".into(), "bogus".into()],
            nicknames: vec![],
            position: None,
            rookie_year: Some(2018),
        };
        assert_eq!(player.active_ranges(2026), vec![(2018, 2026)]);
        assert_eq!(player.primary_team(), Some("Braves"));
    }
}
