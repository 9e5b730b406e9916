pub mod keywords;
pub mod licensing;
pub mod normalize;
pub mod players;
pub mod types;

pub use keywords::KeywordTables;
pub use licensing::LicenseRegistry;
pub use players::{PlayerIndex, TeamIndex};
pub use types::*;

use std::collections::HashSet;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::Sport;
use normalize::fold_key;

const PLAYERS_FILE: &str = "players.json";
const TEAMS_FILE: &str = "teams.json";
const MANUFACTURERS_FILE: &str = "manufacturers.json";
const KEYWORDS_FILE: &str = "keywords.json";

const BUNDLED_PLAYERS: &str = include_str!("../../resources/reference/players.json");
const BUNDLED_TEAMS: &str = include_str!("../../resources/reference/teams.json");
const BUNDLED_MANUFACTURERS: &str = include_str!("../../resources/reference/manufacturers.json");
const BUNDLED_KEYWORDS: &str = include_str!("../../resources/reference/keywords.json");

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Failed to read reference data {0}: {1}")]
    ReferenceDataLoad(String, String),

    #[error("Failed to parse reference data {0}: {1}")]
    ReferenceDataParse(String, String),

    #[error("Unsupported dataset version in {file}: found {found}, expected {expected}")]
    UnsupportedVersion {
        file: String,
        found: u32,
        expected: u32,
    },
}

/// Static reference data: players, teams, manufacturer licensing and the
/// keyword tables the pipeline matches against.
///
/// Built once, then only read. Share it behind an `Arc` across concurrent
/// detections; nothing here takes `&mut self`.
#[derive(Debug, Clone)]
pub struct ReferenceIndex {
    players: PlayerIndex,
    teams: TeamIndex,
    licensing: LicenseRegistry,
    keywords: KeywordTables,
    vocabulary: HashSet<String>,
}

impl ReferenceIndex {
    /// Load the four JSON datasets from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ReferenceError> {
        let read = |file: &str| {
            let path = dir.join(file);
            std::fs::read_to_string(&path).map_err(|e| {
                ReferenceError::ReferenceDataLoad(path.display().to_string(), e.to_string())
            })
        };

        let index = Self::from_json(
            &read(PLAYERS_FILE)?,
            &read(TEAMS_FILE)?,
            &read(MANUFACTURERS_FILE)?,
            &read(KEYWORDS_FILE)?,
        )?;

        tracing::info!(
            dir = %dir.display(),
            players = index.players.len(),
            teams = index.teams.len(),
            manufacturers = index.licensing.manufacturers().len(),
            "Reference data loaded"
        );
        Ok(index)
    }

    /// Datasets from `dir` when that directory exists, else the bundled
    /// snapshot. A present but unreadable directory is an error.
    pub fn load_or_bundled(dir: &Path) -> Result<Self, ReferenceError> {
        if dir.is_dir() {
            Self::load(dir)
        } else {
            tracing::debug!(dir = %dir.display(), "No user reference data, using bundled snapshot");
            Self::bundled()
        }
    }

    /// The snapshot compiled into the binary.
    pub fn bundled() -> Result<Self, ReferenceError> {
        Self::from_json(
            BUNDLED_PLAYERS,
            BUNDLED_TEAMS,
            BUNDLED_MANUFACTURERS,
            BUNDLED_KEYWORDS,
        )
    }

    /// Build an index from raw dataset contents.
    pub fn from_json(
        players_json: &str,
        teams_json: &str,
        manufacturers_json: &str,
        keywords_json: &str,
    ) -> Result<Self, ReferenceError> {
        let players: PlayersFile = parse(PLAYERS_FILE, players_json)?;
        check_version(PLAYERS_FILE, players.version)?;
        let teams: TeamsFile = parse(TEAMS_FILE, teams_json)?;
        check_version(TEAMS_FILE, teams.version)?;
        let manufacturers: ManufacturersFile = parse(MANUFACTURERS_FILE, manufacturers_json)?;
        check_version(MANUFACTURERS_FILE, manufacturers.version)?;
        let keywords: KeywordsFile = parse(KEYWORDS_FILE, keywords_json)?;
        check_version(KEYWORDS_FILE, keywords.version)?;

        let keywords = KeywordTables {
            brand_keywords: keywords.brand_keywords,
            brand_sports: keywords.brand_sports,
            sport_keywords: keywords.sport_keywords,
            parallel_keywords: keywords.parallel_keywords,
            card_terms: keywords.card_terms,
            character_confusions: keywords.character_confusions,
            digraph_confusions: keywords.digraph_confusions,
        };

        let vocabulary = build_vocabulary(
            &players.players,
            &teams.teams,
            &manufacturers.manufacturers,
            &keywords,
        );

        Ok(Self {
            players: PlayerIndex::new(players.players),
            teams: TeamIndex::new(teams.teams),
            licensing: LicenseRegistry::new(
                manufacturers.manufacturers,
                manufacturers.eras,
                manufacturers.rookie_sets,
            ),
            keywords,
            vocabulary,
        })
    }

    pub fn players(&self) -> &PlayerIndex {
        &self.players
    }

    pub fn teams(&self) -> &TeamIndex {
        &self.teams
    }

    pub fn licensing(&self) -> &LicenseRegistry {
        &self.licensing
    }

    pub fn keywords(&self) -> &KeywordTables {
        &self.keywords
    }

    pub fn find_player(&self, query: &str) -> Option<&PlayerInfo> {
        self.players.lookup(query)
    }

    pub fn find_team(&self, query: &str, sport: Option<Sport>) -> Option<&TeamInfo> {
        self.teams.lookup(query, sport)
    }

    pub fn validate_manufacturer(&self, name: &str, sport: Sport, year: i32) -> bool {
        self.licensing.validate_manufacturer(name, sport, year)
    }

    /// True when `word` (any case, accents folded) is a known reference token.
    pub fn is_known_word(&self, word: &str) -> bool {
        self.vocabulary.contains(&fold_key(word))
    }
}

fn parse<T: DeserializeOwned>(file: &str, json: &str) -> Result<T, ReferenceError> {
    serde_json::from_str(json)
        .map_err(|e| ReferenceError::ReferenceDataParse(file.to_string(), e.to_string()))
}

fn check_version(file: &str, found: u32) -> Result<(), ReferenceError> {
    if found != DATASET_VERSION {
        return Err(ReferenceError::UnsupportedVersion {
            file: file.to_string(),
            found,
            expected: DATASET_VERSION,
        });
    }
    Ok(())
}

/// Word list used by post-OCR correction: every token of every reference name
/// plus card vocabulary.
fn build_vocabulary(
    players: &[PlayerInfo],
    teams: &[TeamInfo],
    manufacturers: &[ManufacturerInfo],
    keywords: &KeywordTables,
) -> HashSet<String> {
    let mut phrases: Vec<&str> = Vec::new();
    for player in players {
        phrases.push(&player.name);
        phrases.extend(player.nicknames.iter().map(String::as_str));
    }
    for team in teams {
        phrases.push(&team.name);
        phrases.push(&team.city);
    }
    for manufacturer in manufacturers {
        phrases.push(&manufacturer.name);
        for license in &manufacturer.sports_licenses {
            phrases.extend(license.major_set_names.iter().map(String::as_str));
        }
    }
    phrases.extend(keywords.brand_keywords.iter().map(|k| k.keyword.as_str()));
    phrases.extend(keywords.parallel_keywords.iter().map(String::as_str));
    phrases.extend(keywords.card_terms.iter().map(String::as_str));
    for terms in &keywords.sport_keywords {
        phrases.extend(terms.terms.iter().map(String::as_str));
    }

    phrases
        .into_iter()
        .flat_map(|phrase| {
            fold_key(phrase)
                .split(|c: char| !c.is_alphanumeric())
                .filter(|t| t.len() >= 2)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_snapshot_loads() {
        let index = ReferenceIndex::bundled().unwrap();
        assert!(index.players().len() >= 30);
        assert!(index.teams().len() >= 40);
        assert!(index.licensing().manufacturers().len() >= 8);
        assert!(!index.keywords().brand_keywords.is_empty());
    }

    #[test]
    fn load_reads_dataset_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PLAYERS_FILE), BUNDLED_PLAYERS).unwrap();
        std::fs::write(dir.path().join(TEAMS_FILE), BUNDLED_TEAMS).unwrap();
        std::fs::write(dir.path().join(MANUFACTURERS_FILE), BUNDLED_MANUFACTURERS).unwrap();
        std::fs::write(dir.path().join(KEYWORDS_FILE), BUNDLED_KEYWORDS).unwrap();

        let index = ReferenceIndex::load(dir.path()).unwrap();
        assert_eq!(index.find_player("Mike Trout").unwrap().sport, Sport::Baseball);
    }

    #[test]
    fn user_directory_overrides_bundled_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let players = r#"{ "version": 1, "players": [
            { "name": "Test Prospect", "sport": "Baseball", "teams": ["Braves"], "years": ["2025-present"], "rookieYear": 2025 }
        ] }"#;
        std::fs::write(dir.path().join(PLAYERS_FILE), players).unwrap();
        std::fs::write(dir.path().join(TEAMS_FILE), BUNDLED_TEAMS).unwrap();
        std::fs::write(dir.path().join(MANUFACTURERS_FILE), BUNDLED_MANUFACTURERS).unwrap();
        std::fs::write(dir.path().join(KEYWORDS_FILE), BUNDLED_KEYWORDS).unwrap();

        let index = ReferenceIndex::load_or_bundled(dir.path()).unwrap();
        assert_eq!(index.players().len(), 1);
        assert!(index.find_player("Test Prospect").is_some());
        assert!(index.find_player("Mike Trout").is_none());
    }

    #[test]
    fn absent_user_directory_uses_bundled_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let index = ReferenceIndex::load_or_bundled(&dir.path().join("reference")).unwrap();
        assert!(index.find_player("Mike Trout").is_some());

        // An existing but empty directory is a configuration mistake.
        assert!(ReferenceIndex::load_or_bundled(dir.path()).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReferenceIndex::load(dir.path()).unwrap_err();
        assert!(matches!(err, ReferenceError::ReferenceDataLoad(path, _) if path.ends_with(PLAYERS_FILE)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = ReferenceIndex::from_json("{", BUNDLED_TEAMS, BUNDLED_MANUFACTURERS, BUNDLED_KEYWORDS)
            .unwrap_err();
        assert!(matches!(err, ReferenceError::ReferenceDataParse(file, _) if file == PLAYERS_FILE));
    }

    #[test]
    fn future_dataset_version_is_rejected() {
        let teams = r#"{ "version": 2, "teams": [] }"#;
        let err = ReferenceIndex::from_json(BUNDLED_PLAYERS, teams, BUNDLED_MANUFACTURERS, BUNDLED_KEYWORDS)
            .unwrap_err();
        assert!(matches!(
            err,
            ReferenceError::UnsupportedVersion { found: 2, expected: 1, .. }
        ));
    }

    #[test]
    fn vocabulary_covers_names_and_card_terms() {
        let index = ReferenceIndex::bundled().unwrap();
        assert!(index.is_known_word("Mahomes"));
        assert!(index.is_known_word("TOPPS"));
        assert!(index.is_known_word("refractor"));
        assert!(index.is_known_word("Braves"));
        assert!(!index.is_known_word("Mahornes"));
    }

    #[test]
    fn scenario_lookups_from_bundled_data() {
        let index = ReferenceIndex::bundled().unwrap();
        let trout = index.find_player("Mike Trout").unwrap();
        assert_eq!(index.find_player("TROUT").unwrap(), trout);
        assert_eq!(index.find_player("Mike Trout Jr").unwrap(), trout);
        assert_eq!(index.find_team("Atlanta Braves", None).unwrap().name, "Braves");
        assert!(index.validate_manufacturer("Panini", Sport::Basketball, 2015));
        assert!(!index.validate_manufacturer("Upper Deck", Sport::Basketball, 2015));
    }
}
