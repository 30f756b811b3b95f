//! Configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. A config file is
//! sparse: stock defaults are the base layer and the file overrides only the
//! keys it names. Command-line flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [encode]
//! quality = 70              # AVIF quality for the standard profile (1-100)
//! reduced_quality = 55      # AVIF quality for the reduced profile (1-100)
//! profile = "standard"      # "standard" or "reduced"
//!
//! [markup]
//! base_path = "/images/"    # Virtual path prefixed to every filename
//! breakpoint = 768          # Viewport width (px) where the sizes rule switches
//! small_viewport_size = "50vw"  # Layout size below the breakpoint
//! loading = "lazy"          # Value of the loading attribute
//!
//! [output]
//! dir = "dist"              # Where packaged variant archives are written
//! ```
//!
//! ## Partial Configuration
//!
//! ```toml
//! # Only switch to the reduced-quality profile
//! [encode]
//! profile = "reduced"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{EncoderProfile, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Encoder quality policy.
    pub encode: EncodeConfig,
    /// Markup synthesis settings.
    pub markup: MarkupConfig,
    /// Packaging destination.
    pub output: OutputConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("encode.quality", self.encode.quality),
            ("encode.reduced_quality", self.encode.reduced_quality),
        ] {
            if !(1..=100).contains(&value) {
                return Err(ConfigError::Validation(format!("{key} must be 1-100")));
            }
        }
        if self.markup.breakpoint == 0 {
            return Err(ConfigError::Validation(
                "markup.breakpoint must be positive".into(),
            ));
        }
        if self.markup.small_viewport_size.trim().is_empty() {
            return Err(ConfigError::Validation(
                "markup.small_viewport_size must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Encoder quality policy, fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeConfig {
    /// Quality used by the standard profile.
    pub quality: u32,
    /// Quality used by the reduced profile, for encoders whose output is
    /// heavier at equal settings.
    pub reduced_quality: u32,
    /// Which of the two to use.
    pub profile: EncoderProfile,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            quality: 70,
            reduced_quality: 55,
            profile: EncoderProfile::Standard,
        }
    }
}

impl EncodeConfig {
    /// The quality a session should encode with.
    pub fn effective_quality(&self) -> Quality {
        self.profile.quality(self.quality, self.reduced_quality)
    }
}

/// Markup synthesis settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkupConfig {
    /// Virtual path every variant filename is joined onto.
    pub base_path: String,
    /// Viewport width in px below which `small_viewport_size` applies.
    pub breakpoint: u32,
    /// Layout size below the breakpoint (CSS length, e.g. `"50vw"`).
    pub small_viewport_size: String,
    /// Value of the `loading` attribute.
    pub loading: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            base_path: "/images/".to_string(),
            breakpoint: 768,
            small_viewport_size: "50vw".to_string(),
            loading: "lazy".to_string(),
        }
    }
}

/// Packaging destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory that receives `<basename>-responsive.zip` archives.
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "dist".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(Config::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file, merged on top of stock defaults.
///
/// A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# simple-srcset configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[encode]
# AVIF quality (1 = worst, 100 = best) for the standard profile.
quality = 70

# AVIF quality for the reduced profile. Use it when the encoder in play
# produces visibly heavier files than expected at the standard setting.
reduced_quality = 55

# "standard" or "reduced". Chosen once per run, never per image.
profile = "standard"

# ---------------------------------------------------------------------------
# Markup
# ---------------------------------------------------------------------------
[markup]
# Virtual path joined with every filename in src/srcset.
base_path = "/images/"

# Viewport width (px) where the sizes rule switches from the fractional
# size below to the rendered width.
breakpoint = 768

# Layout size on viewports narrower than the breakpoint.
small_viewport_size = "50vw"

# Value of the loading attribute.
loading = "lazy"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Each run writes <dir>/<basename>-responsive.zip.
dir = "dist"
"##
}
