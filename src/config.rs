//! Renderer configuration.
//!
//! Handles loading, validating, and merging `thumbwright.toml`. Stock defaults
//! are the base layer; a user file only needs the keys it wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! base_url = ""             # Stripped from input paths, prepended to result URLs
//!
//! [cache]
//! dir_name = "thumbs"       # Cache folder created next to each source image
//!
//! [encoding]
//! jpeg_quality = 80         # JPEG quality when a request passes quality = 0
//! png_compression = 8       # PNG level (0-9) when a request passes quality = 0
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::EncodingDefaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File looked up in the root directory by [`load_config`].
pub const CONFIG_FILENAME: &str = "thumbwright.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Renderer configuration loaded from `thumbwright.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbConfig {
    /// Public URL settings.
    pub site: SiteConfig,
    /// Cache layout.
    pub cache: CacheConfig,
    /// Encoder fallbacks for requests without a quality.
    pub encoding: EncodingConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl ThumbConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.encoding.jpeg_quality == 0 || self.encoding.jpeg_quality > 100 {
            return Err(ConfigError::Validation(
                "encoding.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.encoding.png_compression > 9 {
            return Err(ConfigError::Validation(
                "encoding.png_compression must be 0-9".into(),
            ));
        }
        let dir = &self.cache.dir_name;
        if dir.is_empty() || dir == "." || dir == ".." || dir.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "cache.dir_name must be a single directory name".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Prefix of public URLs. Empty means results are plain paths.
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Name of the cache folder created next to each source image.
    pub dir_name: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir_name: crate::cache::DEFAULT_DIR_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodingConfig {
    /// JPEG quality used when a request passes `quality = 0`.
    pub jpeg_quality: u8,
    /// PNG compression level used when a request passes `quality = 0`.
    pub png_compression: u8,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        let defaults = EncodingDefaults::default();
        Self {
            jpeg_quality: defaults.jpeg_quality,
            png_compression: defaults.png_compression,
        }
    }
}

impl EncodingConfig {
    pub fn defaults(&self) -> EncodingDefaults {
        EncodingDefaults {
            jpeg_quality: self.jpeg_quality,
            png_compression: self.png_compression,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ThumbConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
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

/// Load `thumbwright.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ThumbConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ThumbConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `thumbwright.toml` in `root`, falling back to defaults.
pub fn load_config(root: &Path) -> Result<ThumbConfig, ConfigError> {
    resolve_config(load_raw_config(root)?)
}

/// Returns a fully-commented stock `thumbwright.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Thumbwright Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Public URLs
# ---------------------------------------------------------------------------
[site]
# Prefix stripped from input paths and prepended to generated thumbnail paths.
# Leave empty to work with plain filesystem paths.
base_url = ""

# ---------------------------------------------------------------------------
# Cache layout
# ---------------------------------------------------------------------------
[cache]
# Folder created next to each source image to hold its thumbnails.
dir_name = "thumbs"

# ---------------------------------------------------------------------------
# Encoding fallbacks (used when a request passes quality = 0)
# ---------------------------------------------------------------------------
[encoding]
# JPEG quality, 1-100.
jpeg_quality = 80

# PNG zlib compression level, 0-9.
png_compression = 8

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers for batch requests.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
