//! Editor configuration.
//!
//! Every tunable constant of the interaction core lives here so hosts can
//! override it from a JSON file. Missing fields fall back to defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Zoom limits and step sizes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoomConfig {
    /// Minimum zoom level.
    pub min: f64,
    /// Maximum zoom level.
    pub max: f64,
    /// Increment used by the zoom in/out buttons.
    pub step: f64,
    /// Multiplicative factor applied per wheel notch.
    pub wheel_factor: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 3.0,
            step: 0.1,
            wheel_factor: 1.1,
        }
    }
}

/// Grid duplication limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Spacing between stamped copies, in canvas units.
    pub padding: f64,
    /// Hard ceiling on grid rows.
    pub max_rows: u32,
    /// Hard ceiling on grid columns.
    pub max_cols: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            padding: 10.0,
            max_rows: 10,
            max_cols: 10,
        }
    }
}

/// Frame creation and layout defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameConfig {
    /// Margin added around the selection when grouping it into a frame.
    pub group_padding: f64,
    /// Inner padding of newly created frames.
    pub padding: f64,
    /// Gap between children of newly created frames.
    pub gap: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            group_padding: 20.0,
            padding: 16.0,
            gap: 12.0,
        }
    }
}

/// Toolbar timing, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolbarConfig {
    /// Grace period before a hover-only toolbar disappears.
    pub grace_ms: u64,
    /// Cooldown during which hovers skip the entry delay.
    pub cooldown_ms: u64,
    /// Delay before a hover shows the toolbar while the system is not armed.
    pub hover_entry_ms: u64,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            grace_ms: 600,
            cooldown_ms: 1000,
            hover_entry_ms: 400,
        }
    }
}

impl ToolbarConfig {
    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn hover_entry(&self) -> Duration {
        Duration::from_millis(self.hover_entry_ms)
    }
}

/// Top-level configuration for an [`Editor`](crate::editor::Editor).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub zoom: ZoomConfig,
    pub grid: GridConfig,
    pub frame: FrameConfig,
    pub toolbar: ToolbarConfig,
    /// Smallest width/height a resize may produce.
    pub min_object_size: f64,
    /// Handle hit radius in screen pixels.
    pub handle_hit_tolerance: f64,
    /// Distance in screen pixels between the selection box and the grid-duplicate handle.
    pub grid_handle_offset: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom: ZoomConfig::default(),
            grid: GridConfig::default(),
            frame: FrameConfig::default(),
            toolbar: ToolbarConfig::default(),
            min_object_size: 20.0,
            handle_hit_tolerance: 12.0,
            grid_handle_offset: 24.0,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check that every limit is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ZoomConfig { min, max, .. } = self.zoom;
        if !(min > 0.0 && min < max && max.is_finite()) {
            return Err(ConfigError::ZoomRange { min, max });
        }
        if self.zoom.step <= 0.0 {
            return Err(invalid("zoom.step", "must be positive"));
        }
        if self.zoom.wheel_factor <= 1.0 {
            return Err(invalid("zoom.wheelFactor", "must be greater than 1"));
        }
        if self.grid.max_rows == 0 || self.grid.max_cols == 0 {
            return Err(invalid("grid", "row and column ceilings must be at least 1"));
        }
        if self.grid.padding < 0.0 {
            return Err(invalid("grid.padding", "must not be negative"));
        }
        if self.frame.padding < 0.0 || self.frame.gap < 0.0 || self.frame.group_padding < 0.0 {
            return Err(invalid("frame", "padding and gap must not be negative"));
        }
        if self.min_object_size <= 0.0 {
            return Err(invalid("minObjectSize", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
