//! Configuration loading for octfit.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/octfit/config.toml` (system)
//! 2. `~/.config/octfit/config.toml` (user)
//! 3. `./octfit.toml` (local override, replaced by `--config <path>` when given)
//! 4. Environment variables (`OCTFIT_*`, `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [defaults]
//! instrument = "cello"
//! table = "extended"
//! auto_octave_shift = true
//!
//! [output]
//! dir = "~/renders"
//!
//! [telemetry]
//! log_level = "octave_fit=debug"
//!
//! [ranges.violin]
//! min = 55
//! max = 96
//! ```

pub mod loader;
pub mod sections;

pub use loader::{discover_config_files_with_override, ConfigSources};
pub use sections::{DefaultsConfig, OutputConfig, RangeOverride, RangeOverrides, TelemetryConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Complete octfit configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    #[serde(default)]
    pub ranges: RangeOverrides,
}

impl FitConfig {
    /// Load configuration from all sources and report which files and
    /// variables contributed. `config_path` takes the place of `./octfit.toml`.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = FitConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            let file = loader::load_from_file(&path)?;
            loader::merge_file(&mut config, file);
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources)?;

        Ok((config, sources))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# octfit configuration\n\n");

        output.push_str("[defaults]\n");
        output.push_str(&format!("instrument = \"{}\"\n", self.defaults.instrument));
        output.push_str(&format!("table = \"{}\"\n", self.defaults.table));
        output.push_str(&format!(
            "auto_octave_shift = {}\n",
            self.defaults.auto_octave_shift
        ));
        output.push_str(&format!("pitch_offset = {}\n", self.defaults.pitch_offset));

        output.push_str("\n[output]\n");
        if let Some(dir) = &self.output.dir {
            output.push_str(&format!("dir = \"{}\"\n", dir.display()));
        }

        output.push_str("\n[telemetry]\n");
        output.push_str(&format!("log_level = \"{}\"\n", self.telemetry.log_level));

        for (name, range) in &self.ranges {
            output.push_str(&format!("\n[ranges.{}]\n", name));
            output.push_str(&format!("min = {}\n", range.min));
            output.push_str(&format!("max = {}\n", range.max));
        }

        output
    }
}
