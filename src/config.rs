//! Gallery configuration module.
//!
//! Handles loading, validating, and merging `gallery.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged on top of it, so a
//! site only needs to list the values it wants to change.
//!
//! ## Config File Location
//!
//! `gallery.toml` lives in the site root, next to the `projects/` and `data/`
//! directories:
//!
//! ```text
//! site/
//! ├── gallery.toml
//! ├── projects/
//! │   ├── kitchen/
//! │   │   ├── island.jpg
//! │   │   └── pantry.webp
//! │   └── premium-living/
//! │       └── lounge.png
//! └── data/                    # written by `room-gallery build`
//!     ├── kitchen.json
//!     └── premium-living.json
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! [paths]
//! projects = "projects"       # Category folders scanned by the manifest builder
//! data = "data"               # Where `{category}.json` manifests are written
//!
//! [loading]
//! head_batch = 10             # Images preloaded before the first render
//! failure_policy = "lenient"  # "lenient" renders broken images, "strict" drops them
//!
//! [premium]
//! prevalidate = true          # Probe every premium image before batching
//! failure_policy = "strict"
//!
//! [layout]
//! default_columns = 3         # Used when `--columns` is absent or unparseable
//! column_width = 300.0        # Logical px; element height = width * aspect
//!
//! [reveal]
//! root_margin = 300.0         # Reveal images this many px before they scroll in
//! threshold = 0.01            # Minimum visible fraction to count as intersecting
//!
//! [processing]
//! max_processes = 4           # Max manifest-builder workers (omit for auto)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::pipeline::{FailurePolicy, PipelineOptions};
use crate::reveal::RevealOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the site root.
pub const CONFIG_FILENAME: &str = "gallery.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `gallery.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Input and output directories of the manifest builder.
    pub paths: PathsConfig,
    /// Progressive loading for regular category pages.
    pub loading: LoadingConfig,
    /// Progressive loading for the aggregate premium page.
    pub premium: PremiumConfig,
    /// Masonry column settings.
    pub layout: LayoutConfig,
    /// Viewport reveal settings.
    pub reveal: RevealConfig,
    /// Parallel manifest building.
    pub processing: ProcessingConfig,
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loading.head_batch == 0 {
            return Err(ConfigError::Validation(
                "loading.head_batch must be at least 1".into(),
            ));
        }
        if self.premium.head_batch == 0 {
            return Err(ConfigError::Validation(
                "premium.head_batch must be at least 1".into(),
            ));
        }
        if self.layout.default_columns == 0 {
            return Err(ConfigError::Validation(
                "layout.default_columns must be at least 1".into(),
            ));
        }
        if self.layout.column_width.is_nan() || self.layout.column_width <= 0.0 {
            return Err(ConfigError::Validation(
                "layout.column_width must be positive".into(),
            ));
        }
        if self.reveal.root_margin.is_nan() || self.reveal.root_margin < 0.0 {
            return Err(ConfigError::Validation(
                "reveal.root_margin must not be negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(ConfigError::Validation(
                "reveal.threshold must be between 0 and 1".into(),
            ));
        }
        if self.paths.projects.is_empty() || self.paths.data.is_empty() {
            return Err(ConfigError::Validation(
                "paths.projects and paths.data must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Pipeline options for a category, picking the premium section for
    /// premium categories.
    pub fn pipeline_options(&self, premium: bool) -> PipelineOptions {
        if premium {
            PipelineOptions {
                head_batch: self.premium.head_batch,
                policy: self.premium.failure_policy,
                prevalidate: self.premium.prevalidate,
            }
        } else {
            PipelineOptions {
                head_batch: self.loading.head_batch,
                policy: self.loading.failure_policy,
                prevalidate: false,
            }
        }
    }

    pub fn reveal_options(&self) -> RevealOptions {
        RevealOptions {
            root_margin: self.reveal.root_margin,
            threshold: self.reveal.threshold,
        }
    }
}

/// Directories, relative to the site root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// One subdirectory per category, holding the images.
    pub projects: String,
    /// Output directory for `{category}.json`.
    pub data: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            projects: "projects".to_string(),
            data: "data".to_string(),
        }
    }
}

/// Head-batch preloading for regular pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadingConfig {
    /// Number of images preloaded (and awaited) before the first render.
    pub head_batch: usize,
    /// What happens to a head image whose preload fails.
    pub failure_policy: FailurePolicy,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            head_batch: 10,
            failure_policy: FailurePolicy::Lenient,
        }
    }
}

/// Loading for the premium page: every image is verified before batching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PremiumConfig {
    pub head_batch: usize,
    /// Probe every entry up front and drop the ones that fail.
    pub prevalidate: bool,
    pub failure_policy: FailurePolicy,
}

impl Default for PremiumConfig {
    fn default() -> Self {
        Self {
            head_batch: 6,
            prevalidate: true,
            failure_policy: FailurePolicy::Strict,
        }
    }
}

/// Masonry column settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Column count when the host's `--columns` property is missing or junk.
    pub default_columns: usize,
    /// Rendered column width in logical pixels.
    pub column_width: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_columns: crate::layout::DEFAULT_COLUMNS,
            column_width: 300.0,
        }
    }
}

/// Viewport reveal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Vertical margin added above and below the viewport.
    pub root_margin: f64,
    /// Minimum intersection ratio.
    pub threshold: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        let options = RevealOptions::default();
        Self {
            root_margin: options.root_margin,
            threshold: options.threshold,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of categories scanned in parallel.
    /// When absent, defaults to the number of CPU cores.
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
    toml::Value::try_from(GalleryConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
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

/// Load `gallery.toml` from a directory as a raw TOML value.
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

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `gallery.toml` in the given site root, falling back to
/// stock defaults when the file is absent.
pub fn load_config(root: &Path) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `gallery.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Room Gallery Configuration
# ==========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Directories (relative to the site root)
# ---------------------------------------------------------------------------
[paths]
# One subdirectory per category, e.g. projects/kitchen/island.jpg
projects = "projects"
# Manifests are written here as {category}.json
data = "data"

# ---------------------------------------------------------------------------
# Progressive loading for category pages
# ---------------------------------------------------------------------------
[loading]
# Images preloaded and awaited before anything is shown.
head_batch = 10
# "lenient": a head image that fails to preload is rendered anyway.
# "strict":  it is skipped, and failed lazy images are removed.
failure_policy = "lenient"

# ---------------------------------------------------------------------------
# Progressive loading for the premium page
# ---------------------------------------------------------------------------
[premium]
head_batch = 6
# Probe every image before batching and drop the ones that fail.
prevalidate = true
failure_policy = "strict"

# ---------------------------------------------------------------------------
# Masonry layout
# ---------------------------------------------------------------------------
[layout]
# Column count used when the container's --columns property is missing.
default_columns = 3
# Column width in logical pixels.
column_width = 300.0

# ---------------------------------------------------------------------------
# Lazy reveal
# ---------------------------------------------------------------------------
[reveal]
# Start loading an image when it is this many pixels from the viewport.
root_margin = 300.0
# Fraction of the image that must be inside the extended viewport.
threshold = 0.01

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel manifest-builder workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
