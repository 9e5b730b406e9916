/// Confidence thresholds used across the pipeline
pub mod thresholds {
    /// Below this a region is reported as a quality warning.
    pub const LOW_REGION: f32 = 0.70;

    /// Above this a region counts as reliably read (brand scan, score bonus).
    pub const HIGH_REGION: f32 = 0.90;

    /// Grading labels are only trusted above this.
    pub const GRADING_REGION: f32 = 0.95;

    /// Starting confidence for a segmented OCR line.
    pub const SEGMENT_BASE: f32 = 0.98;
}

/// Per-correction penalty applied to a segmented line.
const CORRECTION_PENALTY: f32 = 0.04;

/// Penalty for lines of one or two characters.
const SHORT_LINE_PENALTY: f32 = 0.15;

/// Heuristic confidence for a line of OCR text.
///
/// Starts from `SEGMENT_BASE` and drops with the share of characters that
/// rarely appear on cards, with each look-alike correction applied to the
/// line, and for very short lines.
pub fn region_confidence(text: &str, corrections: usize) -> f32 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }

    let unexpected = text.chars().filter(|c| !is_expected_char(*c)).count();
    let mut confidence = thresholds::SEGMENT_BASE;
    confidence -= 0.5 * unexpected as f32 / total as f32;
    confidence -= CORRECTION_PENALTY * corrections as f32;
    if total <= 2 {
        confidence -= SHORT_LINE_PENALTY;
    }
    confidence.clamp(0.0, 1.0)
}

fn is_expected_char(c: char) -> bool {
    c.is_alphanumeric()
        || c == ' '
        || matches!(c, '.' | ',' | '-' | '#' | '/' | '&' | '\'' | ':' | '$' | '%' | '(' | ')')
}
