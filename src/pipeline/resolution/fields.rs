//! Field-level resolution from positioned regions and pattern groups.

use crate::models::{parse_serial, FontSize, RegionPosition, Sport};
use crate::pipeline::extraction::confidence::thresholds;
use crate::pipeline::extraction::patterns::{bare_year, card_number_in, strip_card_prefix};
use crate::pipeline::extraction::{CardText, PatternGroups, TextRegion};
use crate::reference::normalize::{contains_phrase, fold_key, title_case};
use crate::reference::{KeywordTables, PlayerIndex, PlayerInfo, TeamIndex, TeamInfo};

#[derive(Debug, Clone, PartialEq)]
pub struct BrandHit {
    pub region: usize,
    pub brand: String,
    pub set_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerHit<'a> {
    pub region: usize,
    pub name: String,
    pub info: Option<&'a PlayerInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamHit<'a> {
    pub region: usize,
    pub name: String,
    pub info: Option<&'a TeamInfo>,
}

/// First reliable top region naming a manufacturer.
pub fn resolve_brand(regions: &[TextRegion], keywords: &KeywordTables) -> Option<BrandHit> {
    regions.iter().enumerate().find_map(|(idx, region)| {
        if region.position != RegionPosition::Top || region.confidence <= thresholds::HIGH_REGION {
            return None;
        }
        keywords.match_brand(&region.text).map(|kw| BrandHit {
            region: idx,
            brand: kw.brand.clone(),
            set_name: region.text.trim().to_string(),
        })
    })
}

/// Most prominent middle region (large, bold), resolved against the player index.
pub fn resolve_player<'a>(regions: &[TextRegion], players: &'a PlayerIndex) -> Option<PlayerHit<'a>> {
    let (idx, region) = regions
        .iter()
        .enumerate()
        .filter(|(_, r)| {
            r.position == RegionPosition::Middle
                && r.font_size == Some(FontSize::Large)
                && r.is_bold == Some(true)
                && !r.text.trim().is_empty()
        })
        // max_by keeps the last of equal elements; reversing keeps the first.
        .rev()
        .max_by(|(_, a), (_, b)| a.confidence.total_cmp(&b.confidence))?;

    let info = players.lookup(&region.text);
    let name = match info {
        Some(player) => player.name.clone(),
        None => title_case(region.text.trim()),
    };
    Some(PlayerHit {
        region: idx,
        name,
        info,
    })
}

/// Medium, non-bold middle regions other than the player, resolved against the
/// team index. The first hit wins; with no hit the first candidate is title-cased.
pub fn resolve_team<'a>(
    regions: &[TextRegion],
    teams: &'a TeamIndex,
    player: Option<&PlayerHit<'_>>,
    sport: Option<Sport>,
) -> Option<TeamHit<'a>> {
    let player_keys: Vec<String> = player
        .map(|p| vec![fold_key(&p.name), fold_key(&regions[p.region].text)])
        .unwrap_or_default();

    let candidates: Vec<(usize, &TextRegion)> = regions
        .iter()
        .enumerate()
        .filter(|(idx, r)| {
            r.position == RegionPosition::Middle
                && r.font_size == Some(FontSize::Medium)
                && r.is_bold != Some(true)
                && player.map_or(true, |p| p.region != *idx)
                && !player_keys.contains(&fold_key(&r.text))
                && !r.text.trim().is_empty()
        })
        .collect();

    for (idx, region) in &candidates {
        if let Some(team) = teams.lookup(&region.text, sport) {
            return Some(TeamHit {
                region: *idx,
                name: team.name.clone(),
                info: Some(team),
            });
        }
    }

    candidates.first().map(|(idx, region)| TeamHit {
        region: *idx,
        name: title_case(region.text.trim()),
        info: None,
    })
}

/// Bottom region shaped like a card number, else the first alphanumeric code.
pub fn resolve_card_number(card: &CardText) -> Option<String> {
    let sides = std::iter::once(&card.front).chain(card.back.iter());
    sides
        .flat_map(|side| side.regions.iter())
        .filter(|r| r.position == RegionPosition::Bottom)
        .find_map(|r| card_number_in(&r.text))
        .or_else(|| card.patterns.codes.first().map(|code| strip_card_prefix(code)))
        .filter(|number| !number.is_empty())
}

/// First year pattern, else a bare 19xx/20xx token anywhere in the text.
pub fn resolve_year(card: &CardText) -> Option<i32> {
    card.patterns
        .first_year()
        .or_else(|| bare_year(&card.full_text))
}

/// First "N/M" fraction as (serial, print run).
pub fn resolve_serial(patterns: &PatternGroups) -> Option<(String, u32)> {
    patterns
        .fractions
        .iter()
        .find_map(|fraction| parse_serial(fraction).map(|(_, run)| (fraction.clone(), run)))
}

/// Raw text of the front region carrying the highest-priority parallel keyword.
/// Regions already used for brand, player or team are skipped.
pub fn resolve_parallel(regions: &[TextRegion], keywords: &KeywordTables, consumed: &[usize]) -> Option<String> {
    let open: Vec<(usize, String)> = regions
        .iter()
        .enumerate()
        .filter(|(idx, _)| !consumed.contains(idx))
        .map(|(idx, r)| (idx, fold_key(&r.text)))
        .collect();

    keywords.parallel_keywords.iter().find_map(|kw| {
        open.iter()
            .find(|(_, key)| contains_phrase(key, kw))
            .map(|(idx, _)| regions[*idx].text.trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::patterns::extract_patterns;
    use crate::pipeline::extraction::ExtractedText;
    use crate::reference::ReferenceIndex;

    fn top(text: &str, confidence: f32) -> TextRegion {
        TextRegion::new(text, confidence, RegionPosition::Top).styled(FontSize::Large, true)
    }

    fn name(text: &str, confidence: f32) -> TextRegion {
        TextRegion::new(text, confidence, RegionPosition::Middle).styled(FontSize::Large, true)
    }

    fn team(text: &str) -> TextRegion {
        TextRegion::new(text, 0.95, RegionPosition::Middle).styled(FontSize::Medium, false)
    }

    fn bottom(text: &str) -> TextRegion {
        TextRegion::new(text, 0.95, RegionPosition::Bottom).styled(FontSize::Small, false)
    }

    fn card(regions: Vec<TextRegion>) -> CardText {
        let front = ExtractedText::from_regions(regions);
        let full_text = front.full_text.clone();
        CardText {
            front,
            back: None,
            patterns: extract_patterns(&full_text),
            full_text,
        }
    }

    #[test]
    fn brand_needs_reliable_top_region() {
        let index = ReferenceIndex::bundled().unwrap();
        let regions = vec![top("2023 Topps Chrome", 0.85), top("2023 Bowman", 0.97)];
        let hit = resolve_brand(&regions, index.keywords()).unwrap();
        assert_eq!(hit.brand, "Bowman");
        assert_eq!(hit.set_name, "2023 Bowman");
        assert_eq!(hit.region, 1);
    }

    #[test]
    fn brand_ignores_non_top_regions() {
        let index = ReferenceIndex::bundled().unwrap();
        let regions = vec![bottom("Topps")];
        assert!(resolve_brand(&regions, index.keywords()).is_none());
    }

    #[test]
    fn player_is_most_confident_prominent_region() {
        let index = ReferenceIndex::bundled().unwrap();
        let regions = vec![name("JUAN SOTO", 0.80), name("MIKE TROUT", 0.93), team("Angels")];
        let hit = resolve_player(&regions, index.players()).unwrap();
        assert_eq!(hit.name, "Mike Trout");
        assert_eq!(hit.info.unwrap().sport, Sport::Baseball);
    }

    #[test]
    fn unknown_player_is_title_cased() {
        let index = ReferenceIndex::bundled().unwrap();
        let hit = resolve_player(&[name("JOHN  SMITH", 0.9)], index.players()).unwrap();
        assert_eq!(hit.name, "John Smith");
        assert!(hit.info.is_none());
    }

    #[test]
    fn team_uses_sport_hint_and_skips_player() {
        let index = ReferenceIndex::bundled().unwrap();
        let regions = vec![name("ELI MANNING", 0.95), team("ELI MANNING"), team("New York Giants")];
        let player = resolve_player(&regions, index.players());
        let hit = resolve_team(&regions, index.teams(), player.as_ref(), Some(Sport::Football)).unwrap();
        assert_eq!(hit.name, "Giants");
        assert_eq!(hit.info.unwrap().sport, Sport::Football);
    }

    #[test]
    fn unknown_team_is_title_cased() {
        let index = ReferenceIndex::bundled().unwrap();
        let hit = resolve_team(&[team("SPRINGFIELD ISOTOPES")], index.teams(), None, None).unwrap();
        assert_eq!(hit.name, "Springfield Isotopes");
        assert!(hit.info.is_none());
    }

    #[test]
    fn card_number_prefers_bottom_region() {
        let c = card(vec![top("2023 Topps", 0.95), bottom("Card No. 87"), team("T99")]);
        assert_eq!(resolve_card_number(&c), Some("87".into()));
    }

    #[test]
    fn card_number_falls_back_to_code_pattern() {
        let c = card(vec![top("2023 Topps US175 Update", 0.95)]);
        assert_eq!(resolve_card_number(&c), Some("US175".into()));
        assert_eq!(resolve_card_number(&card(vec![team("Braves")])), None);
    }

    #[test]
    fn year_prefers_pattern_then_bare_token() {
        let c = card(vec![top("2019-20 Panini Prizm", 0.95)]);
        assert_eq!(resolve_year(&c), Some(2019));
        assert_eq!(resolve_year(&card(vec![team("Braves")])), None);
    }

    #[test]
    fn serial_records_print_run() {
        let patterns = extract_patterns("Serial Numbered 150/250");
        assert_eq!(resolve_serial(&patterns), Some(("150/250".into(), 250)));
        assert_eq!(resolve_serial(&PatternGroups::default()), None);
    }

    #[test]
    fn parallel_skips_consumed_regions_and_ranks_keywords() {
        let index = ReferenceIndex::bundled().unwrap();
        let regions = vec![
            top("2023 Topps Chrome", 0.95),
            team("Boston Red Sox"),
            bottom("Gold Refractor"),
        ];
        assert_eq!(
            resolve_parallel(&regions, index.keywords(), &[0, 1]),
            Some("Gold Refractor".into())
        );
        assert_eq!(resolve_parallel(&regions[..2], index.keywords(), &[0, 1]), None);
        // Without exclusions the brand line's CHROME still loses to REFRACTOR.
        assert_eq!(
            resolve_parallel(&regions, index.keywords(), &[]),
            Some("Gold Refractor".into())
        );
    }
}
