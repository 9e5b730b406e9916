pub mod config;
pub mod models;
pub mod reference;
pub mod pipeline;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use config::{DetectorConfig, OcrBackendKind};
use pipeline::CardDetector;

const USAGE: &str = "usage: cardlens <front-image> [back-image]";

/// Command-line entry point: detect one card and print it as JSON.
pub fn run() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let (front, back) = match args.as_slice() {
        [front] => (front, None),
        [front, back] => (front, Some(back)),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    match detect_files(front, back.map(PathBuf::as_path)) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("cardlens: {e}");
            ExitCode::FAILURE
        }
    }
}

fn detect_files(front: &Path, back: Option<&Path>) -> Result<String, Box<dyn std::error::Error>> {
    let mut config = DetectorConfig::from_env()?;
    if is_transcript(front) {
        config.ocr_backend = OcrBackendKind::PlainText;
    }

    let detector = CardDetector::from_config(&config)?;
    tracing::debug!(source = detector.source_name(), "Detector ready");

    let front_bytes = std::fs::read(front).map_err(|e| format!("{}: {e}", front.display()))?;
    let back_bytes = back
        .map(|path| std::fs::read(path).map_err(|e| format!("{}: {e}", path.display())))
        .transpose()?;

    let data = detector.detect(&front_bytes, back_bytes.as_deref());
    Ok(serde_json::to_string_pretty(&data)?)
}

fn is_transcript(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}
