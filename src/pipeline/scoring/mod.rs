pub mod confidence;
pub mod features;

pub use confidence::score_confidence;
pub use features::detect_features;
