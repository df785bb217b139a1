//! Play-field geometry and spawn layout
//!
//! Gameplay rules live in `crate::consts`; this is the part that depends on
//! the screen the game is shown on.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Viewport presets matching the two layouts the renderer ships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Viewport {
    #[default]
    Desktop,
    Mobile,
}

impl Viewport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Viewport::Desktop => "Desktop",
            Viewport::Mobile => "Mobile",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "desktop" => Some(Viewport::Desktop),
            "mobile" => Some(Viewport::Mobile),
            _ => None,
        }
    }

    /// Mascot sprite size in field units
    pub fn mascot_size(&self) -> f32 {
        match self {
            Viewport::Desktop => 80.0,
            Viewport::Mobile => 56.0,
        }
    }

    /// Height of the band new collectibles spawn in
    pub fn spawn_band_height(&self) -> f32 {
        match self {
            Viewport::Desktop => 250.0,
            Viewport::Mobile => 150.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(String),
    #[error("play field must be positive, got {width}x{height}")]
    EmptyField { width: f32, height: f32 },
    #[error("mascot size {size} does not fit a {width}x{height} field")]
    MascotTooLarge { size: f32, width: f32, height: f32 },
    #[error("spawn band height must be positive")]
    EmptySpawnBand,
    #[error("target collectible count must be at least 1")]
    NoCollectibles,
}

/// Play-field configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub viewport: Viewport,

    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    /// Mascot size; the mascot is clamped half of this inside the field
    pub mascot_size: f32,
    pub mascot_start: Vec2,

    // === Spawning ===
    pub spawn_band_top: f32,
    pub spawn_band_height: f32,
    /// New collectibles appear within this distance past the right edge
    pub spawn_offscreen_span: f32,
    /// Bags keep this distance from every edge
    pub bag_margin: f32,
    pub target_collectibles: usize,
    /// Maximum tokens kept from the trending feed
    pub catalog_limit: usize,

    // === Floods ===
    /// x is the start for horizontal floods, y for vertical ones
    pub flood_origin: Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_viewport(Viewport::Desktop)
    }
}

impl GameConfig {
    /// Config for a viewport preset
    pub fn from_viewport(viewport: Viewport) -> Self {
        Self {
            viewport,
            field_width: 1024.0,
            field_height: 384.0,
            mascot_size: viewport.mascot_size(),
            mascot_start: Vec2::new(100.0, 200.0),
            spawn_band_top: 50.0,
            spawn_band_height: viewport.spawn_band_height(),
            spawn_offscreen_span: 100.0,
            bag_margin: 60.0,
            target_collectibles: 8,
            catalog_limit: 4,
            flood_origin: Vec2::new(850.0, 450.0),
        }
    }

    /// Resize the field (renderer measured its container)
    pub fn with_field(mut self, width: f32, height: f32) -> Self {
        self.field_width = width;
        self.field_height = height;
        self
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(ConfigError::EmptyField {
                width: self.field_width,
                height: self.field_height,
            });
        }
        if self.mascot_size <= 0.0
            || self.mascot_size > self.field_width
            || self.mascot_size > self.field_height
        {
            return Err(ConfigError::MascotTooLarge {
                size: self.mascot_size,
                width: self.field_width,
                height: self.field_height,
            });
        }
        if self.spawn_band_height <= 0.0 {
            return Err(ConfigError::EmptySpawnBand);
        }
        if self.target_collectibles == 0 {
            return Err(ConfigError::NoCollectibles);
        }
        Ok(())
    }

    /// Mascot position bounds (min, max), accounting for half its size
    pub fn mascot_bounds(&self) -> (Vec2, Vec2) {
        let half = self.mascot_size / 2.0;
        (
            Vec2::splat(half),
            Vec2::new(self.field_width - half, self.field_height - half),
        )
    }

    /// Load from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: Option<&std::path::Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default config");
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
