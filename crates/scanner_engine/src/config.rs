use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use scanner_logging::{scanner_info, scanner_warn};
use serde::{Deserialize, Serialize};

use crate::pacing::Pacing;
use crate::transport::{TransportSettings, DEFAULT_ENDPOINT};

pub const CONFIG_FILENAME: &str = "scanner.ron";
const SHARED_PACING_REASON: &str = "upstream rate shared by every request of this process";

/// Settings shared by the server and the interactive client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub endpoint: String,
    pub country: String,
    pub language: String,
    pub page_size: u32,
    pub pacing_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub listen_addr: String,
    pub static_dir: PathBuf,
    pub export_dir: PathBuf,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            country: scanner_core::DEFAULT_COUNTRY.to_string(),
            language: scanner_core::DEFAULT_LANGUAGE.to_string(),
            page_size: crate::scanner::DEFAULT_PAGE_SIZE,
            pacing_ms: 200,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            listen_addr: "0.0.0.0:3000".to_string(),
            static_dir: PathBuf::from("public"),
            export_dir: PathBuf::from("."),
        }
    }
}

impl ScannerConfig {
    pub fn transport_settings(&self) -> TransportSettings {
        TransportSettings {
            endpoint: self.endpoint.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..TransportSettings::default()
        }
    }

    pub fn pacing_interval(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    pub fn per_scan_pacing(&self) -> Pacing {
        Pacing::per_scan(self.pacing_interval())
    }

    pub fn shared_pacing(&self) -> Pacing {
        Pacing::shared(self.pacing_interval()).with_reason(SHARED_PACING_REASON)
    }
}

/// Reads the RON config at `path`; any problem falls back to defaults.
pub fn load_config(path: &Path) -> ScannerConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return ScannerConfig::default();
        }
        Err(err) => {
            scanner_warn!("Failed to read config from {:?}: {}", path, err);
            return ScannerConfig::default();
        }
    };

    match ron::from_str::<ScannerConfig>(&content) {
        Ok(config) => {
            scanner_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            scanner_warn!("Failed to parse config from {:?}: {}", path, err);
            ScannerConfig::default()
        }
    }
}
