// Structural consistency checks on a resolved card. Findings are reported
// alongside the result, never raised.

use crate::models::{parse_serial, ExtractedCardData};

/// Earliest plausible card year.
pub const MIN_YEAR: i32 = 1900;

/// Human-readable inconsistencies in `data`. Empty means none were found,
/// not that the values are correct.
pub fn validate(data: &ExtractedCardData, current_year: i32) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(year) = data.year {
        let max_year = current_year + 1;
        if !(MIN_YEAR..=max_year).contains(&year) {
            errors.push(format!(
                "Year {year} is outside the valid range {MIN_YEAR}-{max_year}"
            ));
        }
    }

    if let Some((numerator, denominator)) = data.serial_number.as_deref().and_then(parse_serial) {
        if numerator > denominator {
            errors.push(format!(
                "Serial number {numerator}/{denominator} exceeds its print run of {denominator}"
            ));
        }
    }

    if !errors.is_empty() {
        tracing::warn!(
            error_count = errors.len(),
            year = data.year,
            serial = data.serial_number.as_deref().unwrap_or("-"),
            "Card data failed consistency checks"
        );
    }

    errors
}
