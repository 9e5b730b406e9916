use std::collections::HashMap;

use super::normalize::{contains_phrase, fold_key, last_name_token, strip_suffix};
use super::types::{PlayerInfo, TeamInfo};
use crate::models::Sport;

/// Fuzzy containment only counts when the shorter side has at least this many chars.
const MIN_FUZZY_LEN: usize = 4;

/// Read-only player lookup keyed by full name, last name and nickname.
#[derive(Debug, Clone)]
pub struct PlayerIndex {
    players: Vec<PlayerInfo>,
    by_name: HashMap<String, usize>,
    by_nickname: HashMap<String, usize>,
    by_last_name: HashMap<String, Vec<usize>>,
    /// Suffix-stripped full-name keys in dataset order, for the fuzzy pass.
    fuzzy_keys: Vec<(String, usize)>,
}

impl PlayerIndex {
    pub fn new(players: Vec<PlayerInfo>) -> Self {
        let mut by_name = HashMap::new();
        let mut by_nickname = HashMap::new();
        let mut by_last_name: HashMap<String, Vec<usize>> = HashMap::new();
        let mut fuzzy_keys = Vec::with_capacity(players.len());

        for (idx, player) in players.iter().enumerate() {
            let key = fold_key(&player.name);
            if let Some(last) = last_name_token(&key) {
                by_last_name.entry(last.to_string()).or_default().push(idx);
            }
            for nickname in &player.nicknames {
                by_nickname.entry(fold_key(nickname)).or_insert(idx);
            }
            fuzzy_keys.push((strip_suffix(&key), idx));
            by_name.entry(key).or_insert(idx);
        }

        Self {
            players,
            by_name,
            by_nickname,
            by_last_name,
            fuzzy_keys,
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn all(&self) -> &[PlayerInfo] {
        &self.players
    }

    /// Resolve a recognized name to a player.
    ///
    /// Order: exact key (full name, nickname, unambiguous last name), then the
    /// last non-suffix word of a multi-word query, then suffix-stripped
    /// containment against full names.
    pub fn lookup(&self, query: &str) -> Option<&PlayerInfo> {
        let key = fold_key(query);
        if key.is_empty() {
            return None;
        }

        if let Some(idx) = self.exact(&key) {
            return Some(&self.players[idx]);
        }

        if key.contains(' ') {
            if let Some(idx) = last_name_token(&key).and_then(|last| self.unique_last_name(last)) {
                return Some(&self.players[idx]);
            }
        }

        self.fuzzy(&key).map(|idx| &self.players[idx])
    }

    fn exact(&self, key: &str) -> Option<usize> {
        self.by_name
            .get(key)
            .or_else(|| self.by_nickname.get(key))
            .copied()
            .or_else(|| self.unique_last_name(key))
    }

    fn unique_last_name(&self, last: &str) -> Option<usize> {
        match self.by_last_name.get(last) {
            Some(hits) if hits.len() == 1 => Some(hits[0]),
            _ => None,
        }
    }

    /// Containment match; more than one candidate counts as no match.
    fn fuzzy(&self, key: &str) -> Option<usize> {
        let query = strip_suffix(key);
        let mut hits = self.fuzzy_keys.iter().filter_map(|(candidate, idx)| {
            let shorter = query.len().min(candidate.len());
            if shorter < MIN_FUZZY_LEN {
                return None;
            }
            (query.contains(candidate.as_str()) || candidate.contains(query.as_str()))
                .then_some(*idx)
        });
        let first = hits.next()?;
        hits.all(|idx| idx == first).then_some(first)
    }
}

/// Read-only team lookup keyed by name, "city name" and abbreviations.
#[derive(Debug, Clone)]
pub struct TeamIndex {
    teams: Vec<TeamInfo>,
    by_key: HashMap<String, Vec<usize>>,
}

impl TeamIndex {
    pub fn new(teams: Vec<TeamInfo>) -> Self {
        let mut by_key: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, team) in teams.iter().enumerate() {
            let mut keys = vec![
                fold_key(&team.name),
                fold_key(&format!("{} {}", team.city, team.name)),
            ];
            keys.extend(team.abbreviations.iter().map(|a| fold_key(a)));
            keys.dedup();
            for key in keys {
                by_key.entry(key).or_default().push(idx);
            }
        }
        Self { teams, by_key }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn all(&self) -> &[TeamInfo] {
        &self.teams
    }

    /// Resolve a recognized team string. `sport` breaks ties between
    /// franchises sharing a name (Giants, Rangers, Kings).
    pub fn lookup(&self, query: &str, sport: Option<Sport>) -> Option<&TeamInfo> {
        let key = fold_key(query);
        if key.is_empty() {
            return None;
        }

        if let Some(hits) = self.by_key.get(&key) {
            return Some(&self.teams[self.prefer_sport(hits, sport)]);
        }

        // Phrase containment: "ATLANTA BRAVES BASEBALL CLUB" still finds the Braves.
        let mut best: Option<(usize, usize, bool)> = None; // (idx, matched_len, sport_match)
        for (idx, team) in self.teams.iter().enumerate() {
            let full = fold_key(&format!("{} {}", team.city, team.name));
            let name = fold_key(&team.name);
            let matched_len = if contains_phrase(&key, &full) {
                full.len()
            } else if name.len() >= MIN_FUZZY_LEN && contains_phrase(&key, &name) {
                name.len()
            } else {
                continue;
            };
            let sport_match = sport.is_some_and(|s| s == team.sport);
            let better = match best {
                None => true,
                Some((_, len, matched_sport)) => {
                    (sport_match && !matched_sport) || (sport_match == matched_sport && matched_len > len)
                }
            };
            if better {
                best = Some((idx, matched_len, sport_match));
            }
        }
        best.map(|(idx, _, _)| &self.teams[idx])
    }

    fn prefer_sport(&self, hits: &[usize], sport: Option<Sport>) -> usize {
        sport
            .and_then(|s| hits.iter().copied().find(|&i| self.teams[i].sport == s))
            .unwrap_or(hits[0])
    }
}
