//! Configuration sections and their compiled defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// What to fit against when the command line does not say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Target instrument name.
    /// Default: violin
    #[serde(default = "DefaultsConfig::default_instrument")]
    pub instrument: String,

    /// Range table: "standard" or "extended".
    /// Default: standard
    #[serde(default = "DefaultsConfig::default_table")]
    pub table: String,

    /// Pick the offset by octave fitting instead of using `pitch_offset`.
    /// Default: false
    #[serde(default)]
    pub auto_octave_shift: bool,

    /// Fixed offset in semitones used when auto shifting is off.
    /// Default: 0
    #[serde(default)]
    pub pitch_offset: i32,
}

impl DefaultsConfig {
    fn default_instrument() -> String {
        "violin".to_string()
    }

    fn default_table() -> String {
        "standard".to_string()
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            instrument: Self::default_instrument(),
            table: Self::default_table(),
            auto_octave_shift: false,
            pitch_offset: 0,
        }
    }
}

/// Where rendered files go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory. Default: none (current directory).
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log filter directive, e.g. "info" or "octave_fit=debug".
    /// Default: info
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}

/// Replacement bounds for one instrument, applied over the selected table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeOverride {
    pub min: u8,
    pub max: u8,
}

/// Instrument name → override. Names are validated by the consumer.
pub type RangeOverrides = BTreeMap<String, RangeOverride>;
