//! Game settings and tuning
//!
//! Every gameplay constant the simulation reads lives here, so a level can be
//! retuned from a JSON document without touching code.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_GRID_DIM;

/// How the initial grid is populated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutKind {
    /// Pillars on even tiles, bricks on a fixed `(x + y) % 3` pattern
    #[default]
    Classic,
    /// Pillars on even tiles, bricks scattered with a seeded RNG
    Scattered { seed: u64, density: f32 },
}

impl LayoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Classic => "Classic",
            LayoutKind::Scattered { .. } => "Scattered",
        }
    }
}

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl SettingsError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SettingsError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Gameplay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Grid ===
    /// Edge length of one tile in world units
    pub tile_size: f32,
    /// Grid width in tiles
    pub grid_width: i32,
    /// Grid height in tiles
    pub grid_height: i32,
    /// Brick/pillar layout generator
    pub layout: LayoutKind,

    // === Player ===
    /// Edge length of the player's collision square
    pub player_size: f32,
    /// Movement speed in world units per second
    pub player_speed: f32,
    /// Bombs the player may have outstanding at once
    pub max_bombs: usize,

    // === Bombs ===
    /// Fuse length before an armed bomb detonates
    pub bomb_fuse_ms: u32,
    /// How long a detonation stays lethal
    pub explosion_duration_ms: u32,
    /// Blast reach in tiles along each axis
    pub explosion_range: u32,

    // === Cornering ===
    /// Half-extent reduction for the diagonal cornering probe
    pub corner_margin: f32,
    /// Reduction used instead when flanked by two or more walls
    pub flanked_corner_margin: f32,
    /// Probe samples (of 5) that must be passable to accept a corner cut
    pub corner_pass_threshold: usize,
    /// Deepest a corner cut may leave the footprint inside a blocked tile
    pub max_corner_overlap: f32,
    /// Distance from a tile center within which an idle player snaps onto it
    pub snap_tolerance: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tile_size: 64.0,
            grid_width: 20,
            grid_height: 15,
            layout: LayoutKind::Classic,

            player_size: 56.0,
            // 5 units per frame at 60 FPS
            player_speed: 300.0,
            max_bombs: 1,

            bomb_fuse_ms: 3000,
            explosion_duration_ms: 500,
            explosion_range: 2,

            corner_margin: 8.0,
            flanked_corner_margin: 12.0,
            corner_pass_threshold: 2,
            max_corner_overlap: 16.0,
            snap_tolerance: 3.0,
        }
    }
}

impl Settings {
    /// Collision half-extent of the player footprint
    #[inline]
    pub fn half_extent(&self) -> f32 {
        self.player_size / 2.0
    }

    /// Fuse length in seconds
    #[inline]
    pub fn fuse_secs(&self) -> f32 {
        self.bomb_fuse_ms as f32 / 1000.0
    }

    /// Detonation length in seconds
    #[inline]
    pub fn explosion_secs(&self) -> f32 {
        self.explosion_duration_ms as f32 / 1000.0
    }

    /// Parse and validate a JSON settings document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to a pretty-printed JSON document
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject settings the simulation cannot honor
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.tile_size > 0.0) {
            return Err(SettingsError::invalid("tile_size", "must be positive"));
        }
        let dims = 5..=MAX_GRID_DIM;
        if !dims.contains(&self.grid_width) || !dims.contains(&self.grid_height) {
            return Err(SettingsError::invalid(
                "grid_width/grid_height",
                format!(
                    "each side must be in 5..={MAX_GRID_DIM}, got {}x{}",
                    self.grid_width, self.grid_height
                ),
            ));
        }
        if !(self.player_size > 0.0) || self.player_size >= self.tile_size {
            return Err(SettingsError::invalid(
                "player_size",
                format!("must be in (0, {})", self.tile_size),
            ));
        }
        if !(self.player_speed >= 0.0) {
            return Err(SettingsError::invalid("player_speed", "must not be negative"));
        }
        if self.max_bombs == 0 {
            return Err(SettingsError::invalid("max_bombs", "must be at least 1"));
        }
        let longest_side = self.grid_width.max(self.grid_height) as u32;
        if self.explosion_range > longest_side {
            return Err(SettingsError::invalid(
                "explosion_range",
                format!("must not exceed the longest grid side ({longest_side})"),
            ));
        }
        let h = self.half_extent();
        for (field, margin) in [
            ("corner_margin", self.corner_margin),
            ("flanked_corner_margin", self.flanked_corner_margin),
        ] {
            if !(margin >= 0.0) || margin >= h {
                return Err(SettingsError::invalid(
                    field,
                    format!("must be in [0, {h}) for a half-extent of {h}"),
                ));
            }
        }
        if !(1..=5).contains(&self.corner_pass_threshold) {
            return Err(SettingsError::invalid(
                "corner_pass_threshold",
                "must be between 1 and 5",
            ));
        }
        if !(0.0..=h).contains(&self.max_corner_overlap) {
            return Err(SettingsError::invalid(
                "max_corner_overlap",
                format!("must be in [0, {h}]"),
            ));
        }
        if !(self.snap_tolerance >= 0.0) {
            return Err(SettingsError::invalid("snap_tolerance", "must not be negative"));
        }
        if let LayoutKind::Scattered { density, .. } = self.layout {
            if !(0.0..=1.0).contains(&density) {
                return Err(SettingsError::invalid("layout.density", "must be in [0, 1]"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.half_extent(), 28.0);
        assert_eq!(settings.fuse_secs(), 3.0);
        assert_eq!(settings.explosion_secs(), 0.5);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "max_bombs": 3, "explosion_range": 4 }"#).unwrap();
        assert_eq!(settings.max_bombs, 3);
        assert_eq!(settings.explosion_range, 4);
        assert_eq!(settings.tile_size, 64.0);
        assert_eq!(settings.layout, LayoutKind::Classic);
    }

    #[test]
    fn test_scattered_layout_json() {
        let settings = Settings::from_json(
            r#"{ "layout": { "kind": "scattered", "seed": 7, "density": 0.3 } }"#,
        )
        .unwrap();
        assert_eq!(
            settings.layout,
            LayoutKind::Scattered {
                seed: 7,
                density: 0.3
            }
        );
        assert_eq!(settings.layout.as_str(), "Scattered");
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            max_bombs: 2,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_rejects_oversized_player() {
        let settings = Settings {
            player_size: 64.0,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "player_size", .. }));
    }

    #[test]
    fn test_rejects_margin_beyond_half_extent() {
        let settings = Settings {
            flanked_corner_margin: 28.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_threshold_and_density() {
        let settings = Settings {
            corner_pass_threshold: 6,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            layout: LayoutKind::Scattered {
                seed: 1,
                density: 1.5,
            },
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_grid() {
        let settings = Settings {
            grid_width: 50_000,
            grid_height: 50_000,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "grid_width/grid_height", .. }));

        let settings = Settings {
            grid_width: MAX_GRID_DIM,
            grid_height: 5,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_explosion() {
        for range in [21, u32::MAX] {
            let settings = Settings {
                explosion_range: range,
                ..Default::default()
            };
            let err = settings.validate().unwrap_err();
            assert!(matches!(err, SettingsError::Invalid { field: "explosion_range", .. }));
        }
        let settings = Settings {
            explosion_range: 20,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rejects_corner_overlap_beyond_half_extent() {
        let settings = Settings {
            max_corner_overlap: 28.5,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Settings::load("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
