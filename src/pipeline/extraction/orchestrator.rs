use super::patterns::extract_patterns;
use super::simulation::{payload_hash, SimulatedTextSource};
use super::types::{CardText, ExtractedText, SideImage, TextSource, BACK_SEPARATOR};
use crate::models::CardSide;

/// Produces the text of both card sides from the configured source,
/// falling back to simulation when that source fails or times out.
pub struct CardTextExtractor {
    source: Box<dyn TextSource + Send + Sync>,
    fallback: SimulatedTextSource,
}

impl CardTextExtractor {
    pub fn new(source: Box<dyn TextSource + Send + Sync>, fallback: SimulatedTextSource) -> Self {
        Self { source, fallback }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Extract front (required) and back (optional) and combine them.
    pub fn extract_card(&self, front: &[u8], back: Option<&[u8]>) -> CardText {
        let card_key = payload_hash(front);

        let front_text = self.extract_side(&SideImage {
            payload: front,
            side: CardSide::Front,
            card_key,
        });
        let back_text = back.map(|payload| {
            self.extract_side(&SideImage {
                payload,
                side: CardSide::Back,
                card_key,
            })
        });

        let full_text = combine_sides(&front_text, back_text.as_ref());
        let patterns = extract_patterns(&full_text);

        tracing::info!(
            source = self.source.name(),
            front_regions = front_text.regions.len(),
            back_regions = back_text.as_ref().map_or(0, |b| b.regions.len()),
            years = patterns.years.len(),
            fractions = patterns.fractions.len(),
            "Text extraction complete"
        );

        CardText {
            front: front_text,
            back: back_text,
            full_text,
            patterns,
        }
    }

    /// Never fails: source errors fall back to simulation, and an empty
    /// payload yields empty text.
    pub fn extract_side(&self, image: &SideImage<'_>) -> ExtractedText {
        if image.payload.is_empty() {
            tracing::debug!(side = image.side.as_str(), "Empty payload, no text");
            return ExtractedText::empty();
        }

        match self.source.extract(image) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    source = self.source.name(),
                    side = image.side.as_str(),
                    error = %e,
                    "Text source failed, falling back to simulation"
                );
                self.fallback.simulate(image)
            }
        }
    }
}

/// Front text, then the back-of-card separator and back text when present.
pub fn combine_sides(front: &ExtractedText, back: Option<&ExtractedText>) -> String {
    match back {
        Some(back) if !back.full_text.is_empty() => {
            format!("{}{}{}", front.full_text, BACK_SEPARATOR, back.full_text)
        }
        _ => front.full_text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::pipeline::extraction::ocr::{MockOcrEngine, OcrTextSource};
    use crate::pipeline::extraction::types::{OcrBackend, PatternGroups};
    use crate::pipeline::extraction::ExtractionError;
    use crate::reference::ReferenceIndex;

    struct BrokenOcr;

    impl OcrBackend for BrokenOcr {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn extract_text(&self, _image: &[u8]) -> Result<String, ExtractionError> {
            Err(ExtractionError::OcrBackend("connection refused".into()))
        }
    }

    fn extractor(backend: Arc<dyn OcrBackend>) -> CardTextExtractor {
        let reference = Arc::new(ReferenceIndex::bundled().unwrap());
        CardTextExtractor::new(
            Box::new(OcrTextSource::new(backend, Arc::clone(&reference), Duration::from_secs(2))),
            SimulatedTextSource::new(reference, 1, 2026),
        )
    }

    #[test]
    fn front_and_back_are_joined_with_separator() {
        let ex = extractor(Arc::new(MockOcrEngine::new("2020 Topps\nMIKE TROUT")));
        let card = ex.extract_card(b"front", Some(b"back".as_slice()));
        assert_eq!(
            card.full_text,
            format!("2020 Topps\nMIKE TROUT{BACK_SEPARATOR}2020 Topps\nMIKE TROUT")
        );
        assert_eq!(card.patterns.first_year(), Some(2020));
        assert!(card.back.is_some());
    }

    #[test]
    fn front_only_has_no_separator() {
        let ex = extractor(Arc::new(MockOcrEngine::new("2020 Topps\nMIKE TROUT")));
        let card = ex.extract_card(b"front", None);
        assert!(!card.full_text.contains("BACK"));
        assert!(card.back.is_none());
    }

    #[test]
    fn failing_backend_falls_back_to_simulation() {
        let ex = extractor(Arc::new(BrokenOcr));
        let card = ex.extract_card(b"front", None);
        assert!(!card.front.regions.is_empty());

        let reference = Arc::new(ReferenceIndex::bundled().unwrap());
        let expected = SimulatedTextSource::new(reference, 1, 2026).simulate(&SideImage {
            payload: b"front",
            side: CardSide::Front,
            card_key: payload_hash(b"front"),
        });
        assert_eq!(card.front, expected);
    }

    #[test]
    fn empty_front_yields_empty_text() {
        let ex = extractor(Arc::new(BrokenOcr));
        let card = ex.extract_card(b"", None);
        assert!(card.front.is_empty());
        assert!(card.full_text.is_empty());
        assert_eq!(card.patterns, PatternGroups::default());
    }
}
