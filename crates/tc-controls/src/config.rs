//! Controls configuration
//!
//! Stored as RON. Every section is optional in the file and falls back to
//! its defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{Mode, Space};

/// Handle colors and view-dependent thresholds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppearanceConfig {
    /// X-axis color (RGB)
    pub x_axis_color: [f32; 3],
    /// Y-axis color (RGB)
    pub y_axis_color: [f32; 3],
    /// Z-axis color (RGB)
    pub z_axis_color: [f32; 3],
    /// XY plane handle color
    pub xy_plane_color: [f32; 3],
    /// YZ plane handle color
    pub yz_plane_color: [f32; 3],
    /// XZ plane handle color
    pub xz_plane_color: [f32; 3],
    /// Free rotation ring color
    pub free_ring_color: [f32; 3],
    /// Color handles fade toward when highlighted or disabled
    pub highlight_color: [f32; 3],
    /// Opacity of plane and free handles
    pub translucent_opacity: f32,
    /// Opacity of drag helpers
    pub helper_opacity: f32,
    /// Opacity of pick volumes when drawn for debugging
    pub picker_opacity: f32,
    /// Axis handles hide when |axis · eye| exceeds this
    pub axis_hide_threshold: f32,
    /// Plane handles hide when |normal · eye| falls below this
    pub plane_hide_threshold: f32,
    /// Axis handles flip when axis · eye falls below this
    pub axis_flip_threshold: f32,
    /// Guide lines hide when |axis · eye| exceeds this
    pub guide_hide_threshold: f32,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            x_axis_color: [1.0, 0.0, 0.0],
            y_axis_color: [0.0, 1.0, 0.0],
            z_axis_color: [0.0, 0.0, 1.0],
            xy_plane_color: [1.0, 1.0, 0.0],
            yz_plane_color: [0.0, 1.0, 1.0],
            xz_plane_color: [1.0, 0.0, 1.0],
            free_ring_color: [0.47, 0.47, 0.47],
            highlight_color: [1.0, 1.0, 1.0],
            translucent_opacity: 0.25,
            helper_opacity: 0.33,
            picker_opacity: 0.15,
            axis_hide_threshold: 0.99,
            plane_hide_threshold: 0.2,
            axis_flip_threshold: 0.0,
            guide_hide_threshold: 0.9,
        }
    }
}

/// Initial settings for a [`crate::TransformControls`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    pub mode: Mode,
    pub space: Space,
    pub enabled: bool,
    /// Gizmo size multiplier
    pub size: f32,
    pub show_x: bool,
    pub show_y: bool,
    pub show_z: bool,
    /// Translation increment in world units
    pub translation_snap: Option<f32>,
    /// Rotation increment in radians
    pub rotation_snap: Option<f32>,
    /// Scale factor increment
    pub scale_snap: Option<f32>,
    pub appearance: AppearanceConfig,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Translate,
            space: Space::World,
            enabled: true,
            size: 1.0,
            show_x: true,
            show_y: true,
            show_z: true,
            translation_snap: None,
            rotation_snap: None,
            scale_snap: None,
            appearance: AppearanceConfig::default(),
        }
    }
}

impl ControlsConfig {
    /// Parse and validate a RON document
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        let config: ControlsConfig =
            ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::from_ron_str(&content)?;
        tracing::info!("Loaded controls config from {}", path.display());
        Ok(config)
    }

    /// Save configuration as pretty RON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = self.to_ron()?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Reject values the controls cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "size must be positive, got {}",
                self.size
            )));
        }
        for (name, snap) in [
            ("translation_snap", self.translation_snap),
            ("rotation_snap", self.rotation_snap),
            ("scale_snap", self.scale_snap),
        ] {
            if let Some(value) = snap {
                if !(value.is_finite() && value > 0.0) {
                    return Err(ConfigError::Invalid(format!(
                        "{name} must be positive, got {value}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
