pub mod types;
pub mod confidence;
pub mod sanitize;
pub mod correction;
pub mod patterns;
pub mod segment;
pub mod ocr;
pub mod simulation;
pub mod orchestrator;

pub use types::*;
pub use confidence::*;
pub use sanitize::*;
pub use ocr::*;
pub use simulation::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("OCR backend failed: {0}")]
    OcrBackend(String),

    #[error("OCR backend did not answer within {0}s")]
    OcrTimeout(u64),

    #[error("Text encoding error: {0}")]
    EncodingError(String),

    #[error("Image payload is empty")]
    EmptyImage,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
