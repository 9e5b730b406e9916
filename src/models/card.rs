use serde::{Deserialize, Serialize};

use super::enums::{ConfidenceLevel, Sport};

/// Structured card metadata produced by one detection call.
///
/// Built stage by stage: the resolver fills the descriptive fields, the
/// feature detector and scorer fill `features`/`confidence`, and the validator
/// appends `extraction_errors`. Every field the pipeline could not resolve
/// stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedCardData {
    pub player: Option<String>,
    pub year: Option<i32>,
    pub brand: Option<String>,
    pub set_name: Option<String>,
    pub card_number: Option<String>,
    pub team: Option<String>,
    pub category: Option<Sport>,
    pub parallel: Option<String>,
    pub serial_number: Option<String>,
    pub print_run: Option<u32>,
    pub condition: Option<String>,
    pub grading_company: Option<String>,
    pub grade: Option<String>,
    pub cert_number: Option<String>,
    pub features: CardFeatures,
    pub confidence: DetectionConfidence,
    pub raw_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extraction_errors: Vec<String>,
}

/// Special attributes detected on a card. Flags are independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFeatures {
    pub is_rookie: bool,
    pub is_autograph: bool,
    pub is_relic: bool,
    pub is_numbered: bool,
    pub is_graded: bool,
    pub is_parallel: bool,
    pub is_insert: bool,
    pub is_short_print: bool,
    pub is_variation: bool,
    #[serde(rename = "is1of1")]
    pub is_one_of_one: bool,
}

impl CardFeatures {
    /// Number of flags set.
    pub fn count(&self) -> u32 {
        [
            self.is_rookie,
            self.is_autograph,
            self.is_relic,
            self.is_numbered,
            self.is_graded,
            self.is_parallel,
            self.is_insert,
            self.is_short_print,
            self.is_variation,
            self.is_one_of_one,
        ]
        .iter()
        .filter(|flag| **flag)
        .count() as u32
    }
}

/// Completeness/quality assessment attached to a detection result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionConfidence {
    pub score: u8,
    pub level: ConfidenceLevel,
    pub detected_fields: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Default for DetectionConfidence {
    fn default() -> Self {
        Self {
            score: 0,
            level: ConfidenceLevel::Low,
            detected_fields: 0,
            missing_fields: vec![],
            warnings: vec![],
        }
    }
}

/// Parse an "N/M" serial into (numerator, denominator).
pub fn parse_serial(serial: &str) -> Option<(u32, u32)> {
    let (num, den) = serial.split_once('/')?;
    let num = num.trim().parse().ok()?;
    let den = den.trim().parse().ok()?;
    Some((num, den))
}
