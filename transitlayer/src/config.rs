//! Layer configuration.
//!
//! Configuration comes in two forms. [`LayerConfig`] is the typed surface a
//! host builds in code, with defaults and `with_*` builders. [`ConfigFile`]
//! is the INI-backed file the CLI loads from the user's config directory
//! and translates into a `LayerConfig`; that translation is where untyped
//! values get validated, so a negative display limit or unordered zoom
//! thresholds are rejected before a layer ever sees them.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use tracing::debug;

use crate::error::LayerError;
use crate::zoom::ZoomThresholds;

/// Default maximum number of vehicles to render.
pub const DEFAULT_DISPLAY_LIMIT: usize = 5;

/// Default overlay display name.
pub const DEFAULT_LAYER_NAME: &str = "Vehicles";

/// Typed configuration for a vehicle layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerConfig {
    /// Maximum number of vehicles to render, applied as a prefix of the
    /// snapshot in feed order.
    pub limit: usize,

    /// Zoom levels at which marker detail steps up.
    pub thresholds: ZoomThresholds,

    /// Display name announced to the host's overlay registry.
    pub name: String,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_DISPLAY_LIMIT,
            thresholds: ZoomThresholds::default(),
            name: DEFAULT_LAYER_NAME.to_string(),
        }
    }
}

impl LayerConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the zoom thresholds.
    pub fn with_thresholds(mut self, thresholds: ZoomThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set the overlay display name.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Validate the configuration.
    ///
    /// # Returns
    ///
    /// The configuration unchanged, or an error if the display limit is
    /// zero or the zoom thresholds are out of order.
    pub fn validated(self) -> Result<Self, LayerError> {
        if self.limit == 0 {
            return Err(LayerError::InvalidDisplayLimit(0));
        }
        let ZoomThresholds { far, mid, close } = self.thresholds;
        ZoomThresholds::new(far, mid, close)?;
        Ok(self)
    }
}

/// `[layer]` section of the configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSection {
    /// Raw display limit; validated on conversion to [`LayerConfig`].
    pub limit: i64,
    /// Overlay display name.
    pub name: String,
}

impl Default for LayerSection {
    fn default() -> Self {
        Self {
            limit: DEFAULT_DISPLAY_LIMIT as i64,
            name: DEFAULT_LAYER_NAME.to_string(),
        }
    }
}

/// `[zoom]` section of the configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomSection {
    /// Zoom level at which markers first appear.
    pub far: u8,
    /// Zoom level at which markers gain directional detail.
    pub mid: u8,
    /// Zoom level at which markers show full detail.
    pub close: u8,
}

impl Default for ZoomSection {
    fn default() -> Self {
        let thresholds = ZoomThresholds::default();
        Self {
            far: thresholds.far,
            mid: thresholds.mid,
            close: thresholds.close,
        }
    }
}

/// Raw values loaded from the user's configuration file.
///
/// Loading reads the file as-is; semantic validation happens in
/// [`ConfigFile::to_layer_config`] so a broken file can still be inspected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    /// `[layer]` section.
    pub layer: LayerSection,
    /// `[zoom]` section.
    pub zoom: ZoomSection,
}

impl ConfigFile {
    /// Load from the default configuration path.
    ///
    /// A missing file yields the defaults; only an unreadable or
    /// unparseable file is an error.
    pub fn load() -> Result<Self, LayerError> {
        match config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, LayerError> {
        let ini = Ini::load_from_file(path)
            .map_err(|e| LayerError::Config(format!("{}: {}", path.display(), e)))?;

        let file = Self {
            layer: LayerSection {
                limit: parse_key(&ini, "layer", "limit", LayerSection::default().limit)?,
                name: ini
                    .get_from(Some("layer"), "name")
                    .unwrap_or(DEFAULT_LAYER_NAME)
                    .to_string(),
            },
            zoom: ZoomSection {
                far: parse_key(&ini, "zoom", "far", ZoomSection::default().far)?,
                mid: parse_key(&ini, "zoom", "mid", ZoomSection::default().mid)?,
                close: parse_key(&ini, "zoom", "close", ZoomSection::default().close)?,
            },
        };

        debug!(path = %path.display(), "Loaded configuration file");
        Ok(file)
    }

    /// Convert the raw file values into a validated [`LayerConfig`].
    ///
    /// # Returns
    ///
    /// An error when the limit is not a positive integer or the zoom
    /// thresholds are out of order.
    pub fn to_layer_config(&self) -> Result<LayerConfig, LayerError> {
        if self.layer.limit <= 0 {
            return Err(LayerError::InvalidDisplayLimit(self.layer.limit));
        }
        let thresholds = ZoomThresholds::new(self.zoom.far, self.zoom.mid, self.zoom.close)?;

        Ok(LayerConfig {
            limit: self.layer.limit as usize,
            thresholds,
            name: self.layer.name.clone(),
        })
    }
}

/// Parse one key from a section, falling back to a default when absent.
fn parse_key<T: FromStr>(ini: &Ini, section: &str, key: &str, default: T) -> Result<T, LayerError> {
    match ini.get_from(Some(section), key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            LayerError::Config(format!("[{}] {}: invalid value '{}'", section, key, raw))
        }),
        None => Ok(default),
    }
}

/// Path of the user's configuration file, if a config directory exists.
///
/// Resolves to `<config dir>/transitlayer/transitlayer.ini`, for example
/// `~/.config/transitlayer/transitlayer.ini` on Linux.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("transitlayer").join("transitlayer.ini"))
}
