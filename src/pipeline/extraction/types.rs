use serde::{Deserialize, Serialize};

use super::ExtractionError;
use crate::models::{CardSide, FontSize, RegionPosition};

/// Language tag reported for every extraction pass.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Inserted between the front and back text when both sides are present.
pub const BACK_SEPARATOR: &str = "\n--- BACK ---\n";

/// One positioned piece of text recognized on a card face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRegion {
    pub text: String,
    pub confidence: f32,
    pub position: RegionPosition,
    pub font_size: Option<FontSize>,
    pub is_bold: Option<bool>,
}

impl TextRegion {
    pub fn new(text: impl Into<String>, confidence: f32, position: RegionPosition) -> Self {
        Self {
            text: text.into(),
            confidence: confidence.clamp(0.0, 1.0),
            position,
            font_size: None,
            is_bold: None,
        }
    }

    pub fn styled(mut self, font_size: FontSize, is_bold: bool) -> Self {
        self.font_size = Some(font_size);
        self.is_bold = Some(is_bold);
        self
    }
}

/// Text recovered from one side of a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedText {
    pub regions: Vec<TextRegion>,
    pub full_text: String,
    pub language: String,
    pub orientation: u16,
}

impl ExtractedText {
    /// Nothing recoverable. Not an error: it scores as zero detected fields.
    pub fn empty() -> Self {
        Self {
            regions: vec![],
            full_text: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            orientation: 0,
        }
    }

    /// Build from regions; `full_text` follows reading order (top, left,
    /// middle, right, bottom), keeping input order inside each position.
    pub fn from_regions(regions: Vec<TextRegion>) -> Self {
        let mut ordered: Vec<&TextRegion> = regions.iter().collect();
        ordered.sort_by_key(|r| r.position.reading_rank());
        let full_text = ordered
            .iter()
            .map(|r| r.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            regions,
            full_text,
            language: DEFAULT_LANGUAGE.to_string(),
            orientation: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && self.full_text.is_empty()
    }
}

/// Named pattern groups pulled from the combined card text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternGroups {
    /// "2023" or "2019-20"
    pub years: Vec<String>,
    /// "150/250"
    pub fractions: Vec<String>,
    pub currency: Vec<String>,
    pub percentages: Vec<String>,
    /// Short alphanumeric codes such as "RA-15" or "T87".
    pub codes: Vec<String>,
    /// Number + unit, e.g. "35 HR" or "28.1 PPG".
    pub stats: Vec<String>,
    pub set_descriptors: Vec<String>,
}

impl PatternGroups {
    /// Four-digit year of the first year match; any "-20" suffix is ignored.
    pub fn first_year(&self) -> Option<i32> {
        self.years.first().and_then(|y| y.get(..4)).and_then(|y| y.parse().ok())
    }
}

/// Everything the resolver needs from one card: both sides plus the
/// combined text and its pattern groups.
#[derive(Debug, Clone, PartialEq)]
pub struct CardText {
    pub front: ExtractedText,
    pub back: Option<ExtractedText>,
    pub full_text: String,
    pub patterns: PatternGroups,
}

impl CardText {
    /// Front regions followed by back regions.
    pub fn all_regions(&self) -> impl Iterator<Item = &TextRegion> {
        self.front
            .regions
            .iter()
            .chain(self.back.iter().flat_map(|b| b.regions.iter()))
    }
}

/// One side's payload handed to a text source.
#[derive(Debug, Clone, Copy)]
pub struct SideImage<'a> {
    pub payload: &'a [u8],
    pub side: CardSide,
    /// Hash of the front payload; lets the simulation keep both sides on one card.
    pub card_key: u64,
}

/// External OCR collaborator: image bytes in, plain text out.
pub trait OcrBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract_text(&self, image: &[u8]) -> Result<String, ExtractionError>;
}

/// Strategy that turns one side's payload into positioned regions.
pub trait TextSource {
    fn name(&self) -> &'static str;

    fn extract(&self, image: &SideImage<'_>) -> Result<ExtractedText, ExtractionError>;
}
