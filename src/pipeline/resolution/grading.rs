use crate::pipeline::extraction::confidence::thresholds;
use crate::pipeline::extraction::patterns::{cert_in, grading_in};
use crate::pipeline::extraction::TextRegion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingInfo {
    pub company: String,
    pub grade: String,
    pub condition: Option<String>,
    pub cert_number: Option<String>,
}

/// Grading label from a highly reliable region, plus the cert number from the
/// full text.
pub fn resolve_grading<'r>(
    regions: impl IntoIterator<Item = &'r TextRegion>,
    full_text: &str,
) -> Option<GradingInfo> {
    let (company, grade) = regions
        .into_iter()
        .filter(|r| r.confidence > thresholds::GRADING_REGION)
        .find_map(|r| grading_in(&r.text))?;

    Some(GradingInfo {
        condition: condition_label(&grade).map(str::to_string),
        cert_number: cert_in(full_text),
        company,
        grade,
    })
}

/// Standard condition label for a numeric grade. Half grades use the label
/// of the whole grade below.
pub fn condition_label(grade: &str) -> Option<&'static str> {
    let value: f32 = grade.trim().parse().ok()?;
    let label = match value.floor() as i32 {
        10 => "Gem Mint",
        9 => "Mint",
        8 => "NM-MT",
        7 => "NM",
        6 => "EX-MT",
        5 => "EX",
        4 => "VG-EX",
        3 => "VG",
        2 => "Good",
        1 => "Poor",
        _ => return None,
    };
    Some(label)
}
