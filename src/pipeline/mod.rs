pub mod extraction;
pub mod resolution;
pub mod scoring;
pub mod validation;
pub mod detector;

pub use detector::{CardDetector, DetectorError};
