//! TOML configuration file: a plain `serde`-derived struct, deserialized
//! with the `toml` crate, with `Default` filling in every field so a
//! missing file — or a file that only overrides a couple of fields — still
//! produces a usable configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::zplan::ZCalibration;

/// How long the link sender waits for an ACK/RESEND before retransmitting
/// unprompted.
const DEFAULT_RESEND_TIMEOUT_SECS: u64 = 5;

/// The nominal arc-length sampling increment, in inches.
const DEFAULT_SAMPLE_INCREMENT_IN: f64 = 0.1;

const DEFAULT_SERIAL_BAUD: u32 = 115_200;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub calibration: ZCalibration,
    /// Serial device path, e.g. `/dev/ttyUSB0`. Required at `rmc-send` time;
    /// absent here it must come from `--device`.
    pub device: Option<String>,
    pub baud: u32,
    pub resend_timeout_secs: u64,
    pub sample_increment_in: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            calibration: ZCalibration::default(),
            device: None,
            baud: DEFAULT_SERIAL_BAUD,
            resend_timeout_secs: DEFAULT_RESEND_TIMEOUT_SECS,
            sample_increment_in: DEFAULT_SAMPLE_INCREMENT_IN,
        }
    }
}

impl Config {
    pub fn resend_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.resend_timeout_secs)
    }

    /// Loads a config from a TOML file. Missing fields fall back to
    /// [`Config::default`]'s values via `#[serde(default)]`.
    pub fn load(path: impl AsRef<Path>) -> crate::error::Result<Config> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| crate::error::RmcError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_baud_and_timeout() {
        let cfg = Config::default();
        assert_eq!(cfg.baud, 115_200);
        assert_eq!(cfg.resend_timeout_secs, 5);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let toml_text = "baud = 9600\n";
        let cfg: Config = toml::from_str(toml_text).unwrap();
        assert_eq!(cfg.baud, 9600);
        assert_eq!(cfg.sample_increment_in, DEFAULT_SAMPLE_INCREMENT_IN);
        assert_eq!(cfg.calibration, ZCalibration::default());
    }
}
