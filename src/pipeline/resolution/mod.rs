pub mod category;
pub mod cross_validation;
pub mod fields;
pub mod grading;

pub use cross_validation::{LicenseCorrection, SubstituteReason};
pub use grading::condition_label;

use crate::models::ExtractedCardData;
use crate::pipeline::extraction::CardText;
use crate::reference::{PlayerInfo, ReferenceIndex};

/// Descriptive fields plus the reference record of the resolved player,
/// which the feature detector needs for the rookie-year check.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub data: ExtractedCardData,
    pub player: Option<&'a PlayerInfo>,
    pub license_correction: Option<LicenseCorrection>,
}

/// Maps extracted card text onto structured fields using the reference index.
pub struct FieldResolver<'a> {
    reference: &'a ReferenceIndex,
    current_year: i32,
}

impl<'a> FieldResolver<'a> {
    pub fn new(reference: &'a ReferenceIndex, current_year: i32) -> Self {
        Self {
            reference,
            current_year,
        }
    }

    /// Resolve every descriptive field. Features, confidence and extraction
    /// errors are left at their defaults.
    pub fn resolve(&self, card: &CardText) -> Resolution<'a> {
        let reference = self.reference;
        let front = &card.front.regions;
        let mut data = ExtractedCardData {
            raw_text: card.full_text.clone(),
            ..Default::default()
        };

        // 1. Brand/set
        let brand = fields::resolve_brand(front, reference.keywords());
        if let Some(hit) = &brand {
            data.brand = Some(hit.brand.clone());
            data.set_name = Some(hit.set_name.clone());
        }

        // 2. Player
        let player = fields::resolve_player(front, reference.players());
        if let Some(hit) = &player {
            data.player = Some(hit.name.clone());
            data.category = hit.info.map(|p| p.sport);
        }

        // 3. Team
        let team = fields::resolve_team(front, reference.teams(), player.as_ref(), data.category);
        if let Some(hit) = &team {
            data.team = Some(hit.name.clone());
            if data.category.is_none() {
                data.category = hit.info.map(|t| t.sport);
            }
        }

        // 4-6. Card number, year, serial
        data.card_number = fields::resolve_card_number(card);
        data.year = fields::resolve_year(card);
        if let Some((serial, print_run)) = fields::resolve_serial(&card.patterns) {
            data.serial_number = Some(serial);
            data.print_run = Some(print_run);
        }

        // 7. Parallel
        let consumed: Vec<usize> = [
            brand.as_ref().map(|b| b.region),
            player.as_ref().map(|p| p.region),
            team.as_ref().map(|t| t.region),
        ]
        .into_iter()
        .flatten()
        .collect();
        data.parallel = fields::resolve_parallel(front, reference.keywords(), &consumed);

        // 8. Category fallback. Nothing read means nothing detected.
        if data.category.is_none() && !card.full_text.trim().is_empty() {
            data.category = Some(category::fallback_category(
                data.brand.as_deref(),
                &card.full_text,
                reference.keywords(),
            ));
        }

        // 9. Licensing
        let player_info = player.as_ref().and_then(|p| p.info);
        let license_correction =
            cross_validation::cross_validate(&mut data, player_info, reference, self.current_year);

        // 10. Grading
        if let Some(info) = grading::resolve_grading(card.all_regions(), &card.full_text) {
            data.grading_company = Some(info.company);
            data.grade = Some(info.grade);
            data.condition = info.condition;
            data.cert_number = info.cert_number;
        }

        tracing::debug!(
            player = data.player.as_deref().unwrap_or("-"),
            brand = data.brand.as_deref().unwrap_or("-"),
            year = data.year,
            category = data.category.map(|s| s.as_str()),
            corrected = license_correction.is_some(),
            "Fields resolved"
        );

        Resolution {
            data,
            player: player_info,
            license_correction,
        }
    }
}
