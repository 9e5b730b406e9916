use std::sync::Arc;
use std::time::Duration;

use chrono::Datelike;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{reference_data_dir, ConfigError, DetectorConfig, OcrBackendKind};
use crate::models::ExtractedCardData;
use crate::pipeline::extraction::{
    CardTextExtractor, ExtractionError, HttpOcrClient, OcrBackend, OcrTextSource, PlainTextOcr,
    SimulatedTextSource, TextSource,
};
use crate::pipeline::resolution::FieldResolver;
use crate::pipeline::scoring::{detect_features, score_confidence};
use crate::pipeline::validation::validate;
use crate::reference::{ReferenceError, ReferenceIndex};

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Reference data error: {0}")]
    Reference(#[from] ReferenceError),

    #[error("OCR setup error: {0}")]
    Extraction(#[from] ExtractionError),
}

/// End-to-end card detection: text extraction, field resolution, feature
/// detection, confidence scoring and validation.
///
/// Holds only read-only state, so one detector can serve concurrent callers.
pub struct CardDetector {
    reference: Arc<ReferenceIndex>,
    extractor: CardTextExtractor,
}

impl CardDetector {
    pub fn new(reference: Arc<ReferenceIndex>, extractor: CardTextExtractor) -> Self {
        Self {
            reference,
            extractor,
        }
    }

    /// Load reference data and pick the text source named by `config`.
    pub fn from_config(config: &DetectorConfig) -> Result<Self, DetectorError> {
        let reference = Arc::new(match &config.reference_dir {
            Some(dir) => ReferenceIndex::load(dir)?,
            None => ReferenceIndex::load_or_bundled(&reference_data_dir())?,
        });

        let source: Box<dyn TextSource + Send + Sync> = match &config.ocr_backend {
            OcrBackendKind::Simulated => Box::new(simulation(&reference, config)),
            OcrBackendKind::External { endpoint } => {
                let client = HttpOcrClient::new(endpoint, config.ocr_timeout_secs)?;
                tracing::info!(endpoint = client.endpoint(), "Using external OCR service");
                ocr_source(&reference, Arc::new(client), config)
            }
            OcrBackendKind::PlainText => ocr_source(&reference, Arc::new(PlainTextOcr), config),
        };

        let extractor = CardTextExtractor::new(source, simulation(&reference, config));
        Ok(Self::new(reference, extractor))
    }

    /// Detector reading text through `backend`, with simulation as fallback.
    pub fn with_backend(
        reference: Arc<ReferenceIndex>,
        backend: Arc<dyn OcrBackend>,
        config: &DetectorConfig,
    ) -> Self {
        let source = ocr_source(&reference, backend, config);
        let extractor = CardTextExtractor::new(source, simulation(&reference, config));
        Self::new(reference, extractor)
    }

    pub fn reference(&self) -> &ReferenceIndex {
        &self.reference
    }

    pub fn source_name(&self) -> &'static str {
        self.extractor.source_name()
    }

    /// Detect card metadata from a front image and an optional back image.
    /// Never fails: problems surface as warnings and extraction errors.
    pub fn detect(&self, front: &[u8], back: Option<&[u8]>) -> ExtractedCardData {
        self.detect_in_year(front, back, chrono::Utc::now().year())
    }

    /// Same as [`detect`](Self::detect) with an explicit current year.
    pub fn detect_in_year(&self, front: &[u8], back: Option<&[u8]>, current_year: i32) -> ExtractedCardData {
        let _span = tracing::info_span!("card_detection", detection_id = %Uuid::new_v4()).entered();

        let card = self.extractor.extract_card(front, back);

        let resolution = FieldResolver::new(&self.reference, current_year).resolve(&card);
        let mut data = resolution.data;

        data.features = detect_features(&card.full_text, &card.patterns, &data, resolution.player);
        data.confidence = score_confidence(&data, &data.features, card.all_regions());
        data.extraction_errors = validate(&data, current_year);

        tracing::info!(
            score = data.confidence.score,
            level = data.confidence.level.as_str(),
            detected_fields = data.confidence.detected_fields,
            warnings = data.confidence.warnings.len(),
            errors = data.extraction_errors.len(),
            "Card detection complete"
        );

        data
    }
}

fn simulation(reference: &Arc<ReferenceIndex>, config: &DetectorConfig) -> SimulatedTextSource {
    SimulatedTextSource::new(
        Arc::clone(reference),
        config.simulation_seed,
        chrono::Utc::now().year(),
    )
}

fn ocr_source(
    reference: &Arc<ReferenceIndex>,
    backend: Arc<dyn OcrBackend>,
    config: &DetectorConfig,
) -> Box<dyn TextSource + Send + Sync> {
    Box::new(OcrTextSource::new(
        backend,
        Arc::clone(reference),
        Duration::from_secs(config.ocr_timeout_secs),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConfidenceLevel, Sport};
    use crate::pipeline::extraction::{MockOcrEngine, PlainTextOcr};

    const YEAR: i32 = 2026;

    const ACUNA_REFRACTOR: &str = "2023 Topps Chrome\nRONALD ACUÑA JR.\nAtlanta Braves\n#RA-15\nREFRACTOR\nSerial Numbered 150/250";

    fn detector_for(text: &str) -> CardDetector {
        let reference = Arc::new(ReferenceIndex::bundled().unwrap());
        CardDetector::with_backend(
            reference,
            Arc::new(MockOcrEngine::new(text)),
            &DetectorConfig::default(),
        )
    }

    fn detect_text(text: &str) -> ExtractedCardData {
        detector_for(text).detect_in_year(b"front.jpg", None, YEAR)
    }

    #[test]
    fn refractor_card_resolves_every_field() {
        let data = detect_text(ACUNA_REFRACTOR);

        assert_eq!(data.year, Some(2023));
        assert!(data.brand.as_deref().unwrap().contains("Topps Chrome"));
        assert_eq!(data.set_name.as_deref(), Some("2023 Topps Chrome"));
        assert_eq!(data.player.as_deref(), Some("Ronald Acuña Jr."));
        assert_eq!(data.team.as_deref(), Some("Braves"));
        assert_eq!(data.category, Some(Sport::Baseball));
        assert_eq!(data.card_number.as_deref(), Some("RA-15"));
        assert_eq!(data.parallel.as_deref(), Some("REFRACTOR"));
        assert_eq!(data.serial_number.as_deref(), Some("150/250"));
        assert_eq!(data.print_run, Some(250));
        assert!(data.features.is_numbered);
        assert!(data.features.is_parallel);
        assert_eq!(data.confidence.level, ConfidenceLevel::High);
        assert!(data.confidence.missing_fields.is_empty());
        assert!(data.extraction_errors.is_empty());
        assert!(data.raw_text.contains("RONALD ACUÑA JR."));
    }

    #[test]
    fn serial_above_print_run_is_reported() {
        let text = ACUNA_REFRACTOR.replace("150/250", "300/250");
        let data = detect_text(&text);

        assert_eq!(data.serial_number.as_deref(), Some("300/250"));
        assert_eq!(data.extraction_errors.len(), 1);
        assert!(data.extraction_errors[0].contains("300"));
        assert!(data.extraction_errors[0].contains("250"));
    }

    #[test]
    fn impossible_year_is_reported_and_rest_resolves() {
        let text = ACUNA_REFRACTOR.replace("2023 Topps Chrome", "1776 Topps Chrome");
        let data = detect_text(&text);

        assert_eq!(data.year, Some(1776));
        assert_eq!(data.extraction_errors.len(), 1);
        assert!(data.extraction_errors[0].contains("1776"));
        assert_eq!(data.brand.as_deref(), Some("Topps Chrome"));
        assert_eq!(data.player.as_deref(), Some("Ronald Acuña Jr."));
        assert_eq!(data.team.as_deref(), Some("Braves"));
        assert_eq!(data.print_run, Some(250));
    }

    #[test]
    fn unlicensed_brand_is_corrected() {
        let data = detect_text("2015 Topps\nSTEPHEN CURRY\nGolden State Warriors\n#30");

        assert_eq!(data.category, Some(Sport::Basketball));
        assert_eq!(data.year, Some(2015));
        let brand = data.brand.as_deref().unwrap();
        assert!(brand.contains("Panini"), "brand was {brand}");
        assert_eq!(brand, "2015 Panini Prizm");
        assert_eq!(data.card_number.as_deref(), Some("30"));
        assert!(data.extraction_errors.is_empty());
    }

    #[test]
    fn graded_autograph_on_the_back() {
        let detector = detector_for(
            "2018 Bowman Chrome\nJUAN SOTO\nWashington Nationals\nCERTIFIED AUTOGRAPH\nPSA GEM MINT 10\nCert #48213376",
        );
        let data = detector.detect_in_year(b"front", Some(b"back".as_slice()), YEAR);

        assert_eq!(data.player.as_deref(), Some("Juan Soto"));
        assert!(data.features.is_autograph);
        assert!(data.features.is_graded);
        assert!(data.features.is_rookie);
        assert_eq!(data.grading_company.as_deref(), Some("PSA"));
        assert_eq!(data.grade.as_deref(), Some("10"));
        assert_eq!(data.condition.as_deref(), Some("Gem Mint"));
        assert_eq!(data.cert_number.as_deref(), Some("48213376"));
    }

    #[test]
    fn birth_date_on_the_back_is_not_a_serial() {
        let reference = Arc::new(ReferenceIndex::bundled().unwrap());
        let detector = CardDetector::with_backend(reference, Arc::new(PlainTextOcr), &DetectorConfig::default());

        let front = "2020 Topps\nMIKE TROUT\nLos Angeles Angels\n#1";
        let back = "Born 8/7/1991\nMillville, NJ\n.291 AVG 40 HR";
        let data = detector.detect_in_year(front.as_bytes(), Some(back.as_bytes()), YEAR);
        assert_eq!(data.year, Some(2020));
        assert!(data.serial_number.is_none());
        assert!(!data.features.is_numbered);
        assert!(data.extraction_errors.is_empty());

        let back = "Born: 12/18/1997";
        let data = detector.detect_in_year(ACUNA_REFRACTOR.as_bytes(), Some(back.as_bytes()), YEAR);
        assert_eq!(data.serial_number.as_deref(), Some("150/250"));
        assert_eq!(data.print_run, Some(250));
        assert!(data.extraction_errors.is_empty());
    }

    #[test]
    fn stat_total_is_not_taken_as_year() {
        let data = detect_text("JERRY RICE\nSan Francisco 49ers\n1052 YDS");
        assert_eq!(data.year, None);
        assert!(data.extraction_errors.is_empty());
    }

    #[test]
    fn unreadable_card_is_low_confidence_not_an_error() {
        let data = detect_text("   \n\n");

        assert!(data.player.is_none());
        assert!(data.raw_text.is_empty());
        assert!(data.category.is_none());
        assert_eq!(data.confidence.detected_fields, 0);
        assert_eq!(data.confidence.score, 0);
        assert_eq!(data.confidence.level, ConfidenceLevel::Low);
        assert!(data.extraction_errors.is_empty());
        assert!(!data.confidence.warnings.is_empty());
    }

    #[test]
    fn empty_front_payload_yields_empty_result() {
        let data = detector_for(ACUNA_REFRACTOR).detect_in_year(b"", None, YEAR);
        assert!(data.raw_text.is_empty());
        assert_eq!(data.confidence.level, ConfidenceLevel::Low);
    }

    #[test]
    fn simulated_detection_is_reproducible() {
        let detector = CardDetector::from_config(&DetectorConfig::default()).unwrap();
        assert_eq!(detector.source_name(), "simulated");

        let first = detector.detect_in_year(b"IMG_0001.jpg", Some(b"IMG_0002.jpg".as_slice()), YEAR);
        let second = detector.detect_in_year(b"IMG_0001.jpg", Some(b"IMG_0002.jpg".as_slice()), YEAR);
        assert_eq!(first, second);
        assert!(first.player.is_some());
        assert!(first.extraction_errors.is_empty());
    }

    #[test]
    fn missing_reference_dir_fails_construction() {
        let config = DetectorConfig {
            reference_dir: Some("/nonexistent/cardlens".into()),
            ..Default::default()
        };
        assert!(matches!(
            CardDetector::from_config(&config),
            Err(DetectorError::Reference(_))
        ));
    }
}
