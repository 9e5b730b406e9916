use std::sync::{mpsc, Arc};
use std::time::Duration;

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::segment::segment_lines;
use super::types::{ExtractedText, OcrBackend, SideImage, TextSource};
use super::ExtractionError;
use crate::reference::ReferenceIndex;

#[derive(Serialize)]
struct OcrRequest {
    image: String,
}

#[derive(Deserialize)]
struct OcrResponse {
    text: String,
}

/// HTTP OCR service client.
///
/// POSTs `{ "image": <base64> }` and expects `{ "text": <string> }` back.
pub struct HttpOcrClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpOcrClient {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, ExtractionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl OcrBackend for HttpOcrClient {
    fn name(&self) -> &'static str {
        "http"
    }

    fn extract_text(&self, image: &[u8]) -> Result<String, ExtractionError> {
        if image.is_empty() {
            return Err(ExtractionError::EmptyImage);
        }

        let request = OcrRequest {
            image: base64::engine::general_purpose::STANDARD.encode(image),
        };
        let response = self.client.post(&self.endpoint).json(&request).send()?;

        if !response.status().is_success() {
            return Err(ExtractionError::OcrBackend(format!(
                "{} returned {}",
                self.endpoint,
                response.status()
            )));
        }

        let body: OcrResponse = response.json()?;
        Ok(body.text)
    }
}

/// Treats the payload itself as recognized text (transcripts, tests).
pub struct PlainTextOcr;

impl OcrBackend for PlainTextOcr {
    fn name(&self) -> &'static str {
        "plain-text"
    }

    fn extract_text(&self, image: &[u8]) -> Result<String, ExtractionError> {
        String::from_utf8(image.to_vec()).map_err(|e| ExtractionError::EncodingError(e.to_string()))
    }
}

/// Mock OCR engine for unit testing without a real service.
pub struct MockOcrEngine {
    pub text: String,
}

impl MockOcrEngine {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl OcrBackend for MockOcrEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn extract_text(&self, _image: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.text.clone())
    }
}

/// Text source backed by an OCR collaborator plus line segmentation.
///
/// The backend call runs on a worker thread; if no answer arrives within
/// `timeout` the call is abandoned and `OcrTimeout` is returned.
pub struct OcrTextSource {
    backend: Arc<dyn OcrBackend>,
    reference: Arc<ReferenceIndex>,
    timeout: Duration,
}

impl OcrTextSource {
    pub fn new(backend: Arc<dyn OcrBackend>, reference: Arc<ReferenceIndex>, timeout: Duration) -> Self {
        Self {
            backend,
            reference,
            timeout,
        }
    }

    fn recognize(&self, payload: &[u8]) -> Result<String, ExtractionError> {
        let (tx, rx) = mpsc::channel();
        let backend = Arc::clone(&self.backend);
        let payload = payload.to_vec();

        std::thread::Builder::new()
            .name(format!("ocr-{}", self.backend.name()))
            .spawn(move || {
                // Receiver may be gone after a timeout; nothing to do then.
                let _ = tx.send(backend.extract_text(&payload));
            })
            .map_err(|e| ExtractionError::OcrBackend(format!("cannot start OCR worker: {e}")))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(ExtractionError::OcrTimeout(self.timeout.as_secs())),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(ExtractionError::OcrBackend(
                "OCR worker exited without a result".into(),
            )),
        }
    }
}

impl TextSource for OcrTextSource {
    fn name(&self) -> &'static str {
        self.backend.name()
    }

    fn extract(&self, image: &SideImage<'_>) -> Result<ExtractedText, ExtractionError> {
        if image.payload.is_empty() {
            return Err(ExtractionError::EmptyImage);
        }

        let raw = self.recognize(image.payload)?;
        let regions = segment_lines(&raw, &self.reference);

        tracing::debug!(
            backend = self.backend.name(),
            side = image.side.as_str(),
            chars = raw.len(),
            regions = regions.len(),
            "OCR text segmented"
        );

        if regions.is_empty() {
            return Ok(ExtractedText::empty());
        }
        Ok(ExtractedText::from_regions(regions))
    }
}
