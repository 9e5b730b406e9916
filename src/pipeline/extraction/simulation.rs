//! Synthetic text source used when no OCR collaborator is configured or the
//! configured one fails.
//!
//! Cards are drawn from the reference data with a seeded `StdRng`, so the same
//! payload and seed always yield the same regions. The manufacturer is always
//! one licensed for the drawn sport and year.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::types::{ExtractedText, SideImage, TextRegion, TextSource};
use super::ExtractionError;
use crate::models::{CardSide, FontSize, RegionPosition, Sport};
use crate::reference::normalize::is_suffix;
use crate::reference::{ManufacturerInfo, PlayerInfo, ReferenceIndex};

const PRINT_RUNS: &[u32] = &[5, 10, 25, 50, 99, 150, 199, 250, 299, 499];

const PARALLEL_CHANCE: f64 = 0.30;
const SERIAL_CHANCE: f64 = 0.25;
const AUTOGRAPH_CHANCE: f64 = 0.15;

/// FNV-1a hash of a payload, used as the per-card simulation key.
pub fn payload_hash(payload: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in payload {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

/// The card both sides of one simulation describe.
struct SyntheticCard<'a> {
    player: &'a PlayerInfo,
    year: i32,
    manufacturer: Option<&'a ManufacturerInfo>,
    code: String,
}

pub struct SimulatedTextSource {
    reference: Arc<ReferenceIndex>,
    seed: u64,
    current_year: i32,
}

impl SimulatedTextSource {
    pub fn new(reference: Arc<ReferenceIndex>, seed: u64, current_year: i32) -> Self {
        Self {
            reference,
            seed,
            current_year,
        }
    }

    /// Regions for one side of the card keyed by `image.card_key`.
    pub fn simulate(&self, image: &SideImage<'_>) -> ExtractedText {
        if image.payload.is_empty() {
            return ExtractedText::empty();
        }

        let mut rng = StdRng::seed_from_u64(self.seed ^ image.card_key);
        let Some(card) = self.draw_card(&mut rng) else {
            return ExtractedText::empty();
        };

        let regions = match image.side {
            CardSide::Front => self.front_regions(&card, &mut rng),
            CardSide::Back => self.back_regions(&card, &mut rng),
        };

        tracing::debug!(
            side = image.side.as_str(),
            player = %card.player.name,
            year = card.year,
            regions = regions.len(),
            "Simulated card text"
        );
        ExtractedText::from_regions(regions)
    }

    fn draw_card<'a>(&'a self, rng: &mut StdRng) -> Option<SyntheticCard<'a>> {
        let player = self.reference.players().all().choose(rng)?;
        let year = self.draw_year(player, rng);

        let licensing = self.reference.licensing();
        let manufacturer = if player.rookie_year == Some(year) {
            licensing
                .rookie_manufacturer(player.sport, year)
                .or_else(|| licensing.dominant_manufacturer(player.sport, year))
        } else {
            licensing.dominant_manufacturer(player.sport, year)
        };

        let code = format!("{}-{}", initials(&player.name), rng.gen_range(1..=99));

        Some(SyntheticCard {
            player,
            year,
            manufacturer,
            code,
        })
    }

    fn draw_year(&self, player: &PlayerInfo, rng: &mut StdRng) -> i32 {
        let ranges = player.active_ranges(self.current_year);
        match ranges.choose(rng) {
            Some(&(start, end)) if start <= end => rng.gen_range(start..=end),
            _ => player.rookie_year.unwrap_or(self.current_year),
        }
    }

    fn front_regions(&self, card: &SyntheticCard<'_>, rng: &mut StdRng) -> Vec<TextRegion> {
        let mut regions = Vec::new();
        let sport = card.player.sport;

        if let Some(manufacturer) = card.manufacturer {
            let set = self
                .reference
                .licensing()
                .corrected_set(manufacturer, sport, card.year);
            regions.push(
                region(format!("{} {}", card.year, set), rng, RegionPosition::Top).styled(FontSize::Large, true),
            );
        }

        regions.push(
            region(card.player.name.to_uppercase(), rng, RegionPosition::Middle).styled(FontSize::Large, true),
        );

        if let Some(team) = self.team_line(card) {
            regions.push(region(team, rng, RegionPosition::Middle).styled(FontSize::Medium, false));
        }

        regions.push(region(format!("#{}", card.code), rng, RegionPosition::Bottom).styled(FontSize::Small, false));

        if card.player.rookie_year == Some(card.year) {
            regions.push(region("ROOKIE CARD", rng, RegionPosition::Bottom).styled(FontSize::Small, false));
        }

        if rng.gen_bool(PARALLEL_CHANCE) {
            if let Some(parallel) = self.reference.keywords().parallel_keywords.choose(rng) {
                let text = parallel.clone();
                regions.push(region(text, rng, RegionPosition::Bottom).styled(FontSize::Small, false));
            }
        }

        if rng.gen_bool(SERIAL_CHANCE) {
            let run = PRINT_RUNS.choose(rng).copied().unwrap_or(99);
            let number = rng.gen_range(1..=run);
            regions.push(
                region(format!("Serial Numbered {number}/{run}"), rng, RegionPosition::Bottom)
                    .styled(FontSize::Small, false),
            );
        }

        if rng.gen_bool(AUTOGRAPH_CHANCE) {
            regions.push(region("CERTIFIED AUTOGRAPH", rng, RegionPosition::Bottom).styled(FontSize::Small, false));
        }

        regions
    }

    fn back_regions(&self, card: &SyntheticCard<'_>, rng: &mut StdRng) -> Vec<TextRegion> {
        let player = card.player;
        let header = match &player.position {
            Some(position) => format!("{} | {}", player.name.to_uppercase(), position),
            None => player.name.to_uppercase(),
        };

        let mut regions = vec![
            region(header, rng, RegionPosition::Top).styled(FontSize::Medium, true),
        ];

        let stats = stat_line(player.sport, rng);
        regions.push(
            region(format!("{} season: {}", card.year, stats), rng, RegionPosition::Middle)
                .styled(FontSize::Small, false),
        );

        if let Some(team) = self.team_line(card) {
            regions.push(
                region(format!("Plays for the {team}"), rng, RegionPosition::Middle).styled(FontSize::Small, false),
            );
        }

        regions.push(region(format!("#{}", card.code), rng, RegionPosition::Bottom).styled(FontSize::Small, false));
        regions
    }

    /// "City Name" for the player's primary team when the team is known.
    fn team_line(&self, card: &SyntheticCard<'_>) -> Option<String> {
        let team = card.player.primary_team()?;
        Some(match self.reference.find_team(team, Some(card.player.sport)) {
            Some(info) => format!("{} {}", info.city, info.name),
            None => team.to_string(),
        })
    }
}

impl TextSource for SimulatedTextSource {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn extract(&self, image: &SideImage<'_>) -> Result<ExtractedText, ExtractionError> {
        Ok(self.simulate(image))
    }
}

fn region(text: impl Into<String>, rng: &mut StdRng, position: RegionPosition) -> TextRegion {
    TextRegion::new(text, rng.gen_range(0.72..0.99), position)
}

/// First letters of the first two non-suffix name tokens ("Ronald Acuña Jr." -> "RA").
fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter(|token| !is_suffix(&token.to_uppercase()))
        .filter_map(|token| token.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

fn stat_line(sport: Sport, rng: &mut StdRng) -> String {
    match sport {
        Sport::Baseball => format!(
            ".{} AVG {} HR {} RBI",
            rng.gen_range(220..=340),
            rng.gen_range(5..=55),
            rng.gen_range(30..=130)
        ),
        Sport::Basketball => format!(
            "{:.1} PPG {:.1} RPG {:.1} APG",
            rng.gen_range(8.0..32.0),
            rng.gen_range(2.0..13.0),
            rng.gen_range(1.0..10.0)
        ),
        Sport::Football => format!(
            "{} YDS {} TD",
            rng.gen_range(400..=5200),
            rng.gen_range(2..=50)
        ),
        Sport::Hockey => format!(
            "{} GOALS {} ASSISTS {} PIM",
            rng.gen_range(5..=65),
            rng.gen_range(5..=90),
            rng.gen_range(0..=80)
        ),
        Sport::Soccer => format!(
            "{} GOALS {} ASSISTS in the UEFA Champions League",
            rng.gen_range(1..=40),
            rng.gen_range(0..=25)
        ),
        Sport::Other => String::new(),
    }
}
