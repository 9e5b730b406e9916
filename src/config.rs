use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Cardlens";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default wait for an external OCR call before falling back to simulation.
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 10;

/// Default seed for the simulated text source. Fixed so runs are reproducible.
pub const DEFAULT_SIMULATION_SEED: u64 = 0x00C4_2D1E;

pub const ENV_OCR_BACKEND: &str = "CARDLENS_OCR_BACKEND";
pub const ENV_OCR_ENDPOINT: &str = "CARDLENS_OCR_ENDPOINT";
pub const ENV_OCR_TIMEOUT_SECS: &str = "CARDLENS_OCR_TIMEOUT_SECS";
pub const ENV_SIM_SEED: &str = "CARDLENS_SIM_SEED";
pub const ENV_REFERENCE_DIR: &str = "CARDLENS_REFERENCE_DIR";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown OCR backend '{0}' (expected simulated, external or text)")]
    UnknownBackend(String),

    #[error("{0} is required when the external OCR backend is selected")]
    MissingEndpoint(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Where raw card text comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OcrBackendKind {
    /// Synthetic regions drawn from the reference data.
    Simulated,
    /// HTTP OCR service; payloads are POSTed base64-encoded.
    External { endpoint: String },
    /// Payloads are already UTF-8 transcripts.
    PlainText,
}

/// Detector settings, resolved once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectorConfig {
    pub ocr_backend: OcrBackendKind,
    pub ocr_timeout_secs: u64,
    pub simulation_seed: u64,
    /// Directory holding the four reference datasets; `None` uses the bundled snapshot.
    pub reference_dir: Option<PathBuf>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            ocr_backend: OcrBackendKind::Simulated,
            ocr_timeout_secs: DEFAULT_OCR_TIMEOUT_SECS,
            simulation_seed: DEFAULT_SIMULATION_SEED,
            reference_dir: None,
        }
    }
}

impl DetectorConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let ocr_backend = match get(ENV_OCR_BACKEND).as_deref() {
            None | Some("simulated") | Some("simulation") => OcrBackendKind::Simulated,
            Some("text") | Some("plain") => OcrBackendKind::PlainText,
            Some("external") | Some("http") => OcrBackendKind::External {
                endpoint: get(ENV_OCR_ENDPOINT).ok_or(ConfigError::MissingEndpoint(ENV_OCR_ENDPOINT))?,
            },
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        let ocr_timeout_secs = match get(ENV_OCR_TIMEOUT_SECS) {
            Some(raw) => parse_number(ENV_OCR_TIMEOUT_SECS, &raw)?,
            None => DEFAULT_OCR_TIMEOUT_SECS,
        };

        let simulation_seed = match get(ENV_SIM_SEED) {
            Some(raw) => parse_number(ENV_SIM_SEED, &raw)?,
            None => DEFAULT_SIMULATION_SEED,
        };

        Ok(Self {
            ocr_backend,
            ocr_timeout_secs,
            simulation_seed,
            reference_dir: get(ENV_REFERENCE_DIR).map(PathBuf::from),
        })
    }
}

fn parse_number(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: raw.to_string(),
    })
}

/// Get the application data directory (~/.cardlens/).
/// Falls back to the working directory when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cardlens")
}

/// Default location for user-supplied reference datasets.
pub fn reference_data_dir() -> PathBuf {
    app_data_dir().join("reference")
}

/// Log filter used when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "cardlens=info,cardlens_lib=info,reqwest=warn"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = DetectorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DetectorConfig::default());
        assert_eq!(config.ocr_timeout_secs, 10);
    }

    #[test]
    fn external_backend_requires_endpoint() {
        let err = DetectorConfig::from_lookup(lookup(&[(ENV_OCR_BACKEND, "external")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingEndpoint(ENV_OCR_ENDPOINT));

        let config = DetectorConfig::from_lookup(lookup(&[
            (ENV_OCR_BACKEND, "external"),
            (ENV_OCR_ENDPOINT, "http://localhost:8080/ocr"),
            (ENV_OCR_TIMEOUT_SECS, "3"),
        ]))
        .unwrap();
        assert_eq!(
            config.ocr_backend,
            OcrBackendKind::External {
                endpoint: "http://localhost:8080/ocr".into()
            }
        );
        assert_eq!(config.ocr_timeout_secs, 3);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = DetectorConfig::from_lookup(lookup(&[(ENV_OCR_BACKEND, "tesseract")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownBackend("tesseract".into()));
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let err = DetectorConfig::from_lookup(lookup(&[(ENV_SIM_SEED, "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { name: ENV_SIM_SEED, .. }));
    }

    #[test]
    fn text_backend_and_reference_dir() {
        let config = DetectorConfig::from_lookup(lookup(&[
            (ENV_OCR_BACKEND, "text"),
            (ENV_REFERENCE_DIR, "/data/ref"),
            (ENV_SIM_SEED, "42"),
        ]))
        .unwrap();
        assert_eq!(config.ocr_backend, OcrBackendKind::PlainText);
        assert_eq!(config.reference_dir, Some(PathBuf::from("/data/ref")));
        assert_eq!(config.simulation_seed, 42);
    }

    #[test]
    fn reference_dir_under_app_data() {
        assert!(reference_data_dir().starts_with(app_data_dir()));
        assert!(app_data_dir().ends_with(".cardlens"));
    }

    #[test]
    fn app_name_is_cardlens() {
        assert_eq!(APP_NAME, "Cardlens");
    }
}
