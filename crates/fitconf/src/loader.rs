//! Config file discovery, loading, and environment variable overlay.

use crate::{ConfigError, FitConfig, RangeOverrides};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// One config file as written. Absent keys leave earlier values alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: DefaultsFile,
    #[serde(default)]
    pub output: OutputFile,
    #[serde(default)]
    pub telemetry: TelemetryFile,
    #[serde(default)]
    pub ranges: RangeOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultsFile {
    pub instrument: Option<String>,
    pub table: Option<String>,
    pub auto_octave_shift: Option<bool>,
    pub pitch_offset: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputFile {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetryFile {
    pub log_level: Option<String>,
}

/// Discover config files, optionally with a CLI override path.
///
/// A `cli_path` replaces `./octfit.toml` and is loaded even if missing, so a
/// bad path surfaces as a read error.
/// Returns paths in load order (system, user, local/cli).
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/octfit/config.toml");
    if system.exists() {
        files.push(system);
    }

    // User config (XDG_CONFIG_HOME or ~/.config)
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("octfit/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    // CLI override takes precedence over local
    if let Some(path) = cli_path {
        files.push(path.to_path_buf());
        return files;
    }

    let local = PathBuf::from("octfit.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Load one config file.
pub fn load_from_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_toml(&contents, path)
}

fn parse_toml(contents: &str, path: &Path) -> Result<ConfigFile, ConfigError> {
    toml::from_str(contents).map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Overlay the keys present in `file` onto `config`.
pub fn merge_file(config: &mut FitConfig, file: ConfigFile) {
    let defaults = file.defaults;
    if let Some(v) = defaults.instrument {
        config.defaults.instrument = v;
    }
    if let Some(v) = defaults.table {
        config.defaults.table = v;
    }
    if let Some(v) = defaults.auto_octave_shift {
        config.defaults.auto_octave_shift = v;
    }
    if let Some(v) = defaults.pitch_offset {
        config.defaults.pitch_offset = v;
    }

    if let Some(v) = file.output.dir {
        config.output.dir = Some(expand_path(&v));
    }

    if let Some(v) = file.telemetry.log_level {
        config.telemetry.log_level = v;
    }

    // Per-instrument: a later file replaces only the instruments it names
    config.ranges.extend(file.ranges);
}

/// Apply `OCTFIT_*` and `RUST_LOG` overrides from the process environment.
pub fn apply_env_overrides(
    config: &mut FitConfig,
    sources: &mut ConfigSources,
) -> Result<(), ConfigError> {
    apply_env_overrides_from(config, sources, env::vars())
}

/// Apply overrides from an explicit set of variables.
pub fn apply_env_overrides_from(
    config: &mut FitConfig,
    sources: &mut ConfigSources,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<(), ConfigError> {
    let mut rust_log = None;

    for (key, value) in vars {
        match key.as_str() {
            "OCTFIT_INSTRUMENT" => config.defaults.instrument = value,
            "OCTFIT_TABLE" => config.defaults.table = value,
            "OCTFIT_AUTO_OCTAVE_SHIFT" => {
                config.defaults.auto_octave_shift = parse_bool(&key, &value)?;
            }
            "OCTFIT_PITCH_OFFSET" => {
                config.defaults.pitch_offset =
                    value.trim().parse().map_err(|_| ConfigError::Invalid {
                        key: key.clone(),
                        message: format!("'{}' is not an integer", value),
                    })?;
            }
            "OCTFIT_OUTPUT_DIR" => config.output.dir = Some(expand_path(&value)),
            "OCTFIT_LOG_LEVEL" => config.telemetry.log_level = value,
            // Applied last so it wins over OCTFIT_LOG_LEVEL regardless of order
            "RUST_LOG" => {
                rust_log = Some(value);
                continue;
            }
            _ => continue,
        }
        sources.env_overrides.push(key);
    }

    if let Some(v) = rust_log {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }

    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            key: key.to_string(),
            message: format!("'{}' is not a boolean", other),
        }),
    }
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            home.join(stripped)
        } else {
            PathBuf::from(path)
        }
    } else if let Some(stripped) = path.strip_prefix('$') {
        // Handle $VAR/rest/of/path
        if let Some(slash_pos) = stripped.find('/') {
            let var_name = &stripped[..slash_pos];
            if let Ok(var_value) = env::var(var_name) {
                PathBuf::from(var_value).join(&stripped[slash_pos + 1..])
            } else {
                PathBuf::from(path)
            }
        } else {
            env::var(stripped)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(path))
        }
    } else {
        PathBuf::from(path)
    }
}
