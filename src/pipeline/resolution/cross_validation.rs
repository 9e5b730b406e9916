//! Manufacturer/era cross-validation.
//!
//! A brand must belong to a manufacturer licensed for the card's sport in the
//! card's year. Impossible combinations (a 2015 Topps NBA card) are replaced
//! with the headline set of a manufacturer that did hold the license.

use crate::models::{ExtractedCardData, Sport};
use crate::pipeline::validation::MIN_YEAR;
use crate::reference::{ManufacturerInfo, PlayerInfo, ReferenceIndex};

/// Why a particular manufacturer was chosen as the substitute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstituteReason {
    /// The player's rookie year; rookie-oriented sets take precedence.
    RookieSet,
    /// The only manufacturer holding an exclusive license that year.
    ExclusiveLicense,
    /// Era table default.
    EraDominant,
}

impl SubstituteReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RookieSet => "rookie_set",
            Self::ExclusiveLicense => "exclusive_license",
            Self::EraDominant => "era_dominant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseCorrection {
    pub original: String,
    pub corrected: String,
    pub manufacturer: String,
    pub reason: SubstituteReason,
}

/// Check brand/category/year against licensing and rewrite `brand` when the
/// combination is impossible. Returns the correction applied, if any.
pub fn cross_validate(
    data: &mut ExtractedCardData,
    player: Option<&PlayerInfo>,
    reference: &ReferenceIndex,
    current_year: i32,
) -> Option<LicenseCorrection> {
    let (brand, sport, year) = match (&data.brand, data.category, data.year) {
        (Some(brand), Some(sport), Some(year)) if sport != Sport::Other => (brand.clone(), sport, year),
        _ => return None,
    };
    if !(MIN_YEAR..=current_year + 1).contains(&year) {
        return None;
    }

    let licensing = reference.licensing();
    if licensing.valid_manufacturers(sport, year).is_empty() {
        return None;
    }
    if licensing.brand_is_licensed(&brand, sport, year) {
        return None;
    }

    let (manufacturer, reason) = pick_substitute(reference, player, sport, year)?;
    let set = licensing.corrected_set(manufacturer, sport, year);
    let corrected = format!("{year} {set}");

    tracing::info!(
        original = %brand,
        corrected = %corrected,
        sport = sport.as_str(),
        year,
        reason = reason.as_str(),
        "Brand not licensed for sport/year, substituting"
    );

    data.brand = Some(corrected.clone());
    Some(LicenseCorrection {
        original: brand,
        corrected,
        manufacturer: manufacturer.name.clone(),
        reason,
    })
}

/// Rookie-oriented manufacturer when the player debuted that year, then the
/// exclusive license holder, then the era-dominant manufacturer.
///
/// Rookie sets are themselves licensed for the year, so they stay valid
/// alongside an exclusive holder (Bowman under Topps' MLB exclusive).
fn pick_substitute<'r>(
    reference: &'r ReferenceIndex,
    player: Option<&PlayerInfo>,
    sport: Sport,
    year: i32,
) -> Option<(&'r ManufacturerInfo, SubstituteReason)> {
    let licensing = reference.licensing();
    let is_rookie_year = player.is_some_and(|p| p.rookie_year == Some(year));

    if is_rookie_year {
        if let Some(m) = licensing.rookie_manufacturer(sport, year) {
            return Some((m, SubstituteReason::RookieSet));
        }
    }
    if let Some(m) = licensing.exclusive_manufacturer(sport, year) {
        tracing::debug!(manufacturer = %m.name, sport = sport.as_str(), year, "Exclusive license holder");
        return Some((m, SubstituteReason::ExclusiveLicense));
    }
    licensing
        .dominant_manufacturer(sport, year)
        .map(|m| (m, SubstituteReason::EraDominant))
}
