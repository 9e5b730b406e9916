use crate::models::{CardFeatures, ConfidenceLevel, DetectionConfidence, ExtractedCardData};
use crate::pipeline::extraction::confidence::thresholds;
use crate::pipeline::extraction::TextRegion;

type FieldCheck = fn(&ExtractedCardData) -> bool;

/// Points per resolved field. Fields worth `IMPORTANT_FIELD` or more are
/// reported when missing.
const FIELD_POINTS: [(&str, u32, FieldCheck); 9] = [
    ("player", 20, |d| filled(&d.player)),
    ("year", 15, |d| d.year.is_some()),
    ("brand", 15, |d| filled(&d.brand)),
    ("cardNumber", 10, |d| filled(&d.card_number)),
    ("team", 8, |d| filled(&d.team)),
    ("category", 5, |d| d.category.is_some()),
    ("setName", 5, |d| filled(&d.set_name)),
    ("parallel", 3, |d| filled(&d.parallel)),
    ("serialNumber", 4, |d| filled(&d.serial_number)),
];

const IMPORTANT_FIELD: u32 = 10;

const FEATURE_POINTS: u32 = 3;

const REGION_BONUS: u32 = 2;
const MAX_REGION_BONUS: u32 = 10;

/// More missing important fields than this adds a warning.
const MAX_MISSING_IMPORTANT: usize = 2;

/// Score the completeness and read quality of a detection.
pub fn score_confidence<'r>(
    data: &ExtractedCardData,
    features: &CardFeatures,
    regions: impl IntoIterator<Item = &'r TextRegion>,
) -> DetectionConfidence {
    let mut score = 0u32;
    let mut detected_fields = 0u32;
    let mut missing_fields = Vec::new();

    for (field, points, present) in FIELD_POINTS {
        if present(data) {
            score += points;
            detected_fields += 1;
        } else if points >= IMPORTANT_FIELD {
            missing_fields.push(field.to_string());
        }
    }

    score += FEATURE_POINTS * features.count();

    let mut reliable = 0u32;
    let mut shaky = 0usize;
    for region in regions {
        if region.confidence > thresholds::HIGH_REGION {
            reliable += 1;
        } else if region.confidence < thresholds::LOW_REGION {
            shaky += 1;
        }
    }
    score += (REGION_BONUS * reliable).min(MAX_REGION_BONUS);

    let score = score.min(100) as u8;

    let mut warnings = Vec::new();
    if shaky > 0 {
        warnings.push(format!("{shaky} text region(s) read with low OCR confidence"));
    }
    if missing_fields.len() > MAX_MISSING_IMPORTANT {
        warnings.push(format!(
            "Several important fields are missing: {}",
            missing_fields.join(", ")
        ));
    }

    DetectionConfidence {
        score,
        level: ConfidenceLevel::from_score(score),
        detected_fields,
        missing_fields,
        warnings,
    }
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
