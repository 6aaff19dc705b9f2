//! Startup tunables
//!
//! Loaded once from JSON (missing fields fall back to the defaults) and
//! checked before a level is built.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// How a closed loop decides what it encloses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContainmentMode {
    /// Even-odd point-in-polygon over the trail points
    #[default]
    Polygon,
    /// Ask the presenter which drawable is topmost at each sprite
    HitTest,
}

impl ContainmentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainmentMode::Polygon => "polygon",
            ContainmentMode::HitTest => "hit_test",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "polygon" | "even_odd" | "even-odd" => Some(ContainmentMode::Polygon),
            "hit_test" | "hit-test" | "hittest" => Some(ContainmentMode::HitTest),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Game tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Trail ===
    /// Point lifetime (ms)
    pub trail_ttl: f64,
    /// Freeze window after a loop closes (ms)
    pub freeze_duration: f64,
    /// Squared distance under which a new point replaces the last one
    pub distance_threshold: f32,

    // === Spark ===
    pub spark_radius: f32,

    // === Enemies ===
    pub enemy_count: usize,
    pub enemy_radius: f32,
    pub enemy_speed: f32,
    /// Spin range (degrees per second)
    pub enemy_spin_min: f32,
    pub enemy_spin_max: f32,
    /// Harmless particles spawned alongside each enemy
    pub particles_per_enemy: usize,

    // === Capture ===
    pub containment: ContainmentMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            trail_ttl: TRAIL_TTL,
            freeze_duration: FREEZE_DURATION,
            distance_threshold: DISTANCE_THRESHOLD,

            spark_radius: SPARK_RADIUS,

            enemy_count: ENEMY_COUNT,
            enemy_radius: ENEMY_RADIUS,
            enemy_speed: ENEMY_SPEED,
            enemy_spin_min: ENEMY_SPIN_MIN,
            enemy_spin_max: ENEMY_SPIN_MAX,
            particles_per_enemy: 0,

            containment: ContainmentMode::Polygon,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.check()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and check settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation can't run with
    pub fn check(&self) -> Result<(), SettingsError> {
        let floats = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("distance_threshold", self.distance_threshold),
            ("spark_radius", self.spark_radius),
            ("enemy_radius", self.enemy_radius),
            ("enemy_speed", self.enemy_speed),
            ("enemy_spin_min", self.enemy_spin_min),
            ("enemy_spin_max", self.enemy_spin_max),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SettingsError::Invalid(format!("{name} is not finite ({value})")));
        }
        if !self.trail_ttl.is_finite() || self.trail_ttl <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "trail_ttl must be > 0 (got {})",
                self.trail_ttl
            )));
        }
        if !self.freeze_duration.is_finite() || self.freeze_duration < 0.0 {
            return Err(SettingsError::Invalid(format!(
                "freeze_duration must be >= 0 (got {})",
                self.freeze_duration
            )));
        }
        let min_extent = 2.0 * self.enemy_radius.max(PARTICLE_RADIUS);
        if self.arena_width <= min_extent || self.arena_height <= min_extent {
            return Err(SettingsError::Invalid(format!(
                "arena {}x{} too small for sprites of radius {}",
                self.arena_width, self.arena_height, self.enemy_radius
            )));
        }
        if self.spark_radius <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "spark_radius must be > 0 (got {})",
                self.spark_radius
            )));
        }
        if self.enemy_spin_min > self.enemy_spin_max {
            return Err(SettingsError::Invalid(format!(
                "enemy spin range is empty ({}..{})",
                self.enemy_spin_min, self.enemy_spin_max
            )));
        }
        Ok(())
    }

    /// Soft problems worth a warning; the game still runs
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.distance_threshold <= 0.0 {
            w.push("distance_threshold <= 0; near-duplicate trail points may close loops on their own".into());
        }
        if self.enemy_radius <= 1.0 {
            w.push(format!(
                "enemy_radius {} <= 1; enemies will be treated as harmless particles",
                self.enemy_radius
            ));
        }
        if self.freeze_duration > self.trail_ttl {
            w.push(format!(
                "freeze_duration {} exceeds trail_ttl {}; closed loops outlive fresh trails",
                self.freeze_duration, self.trail_ttl
            ));
        }
        if self.enemy_count == 0 {
            w.push("enemy_count is 0; nothing to capture".into());
        }
        if self.enemy_speed < 0.0 {
            w.push(format!("enemy_speed {} negative; enemies move backwards", self.enemy_speed));
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.check().is_ok());
        assert!(settings.validate().is_empty());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "enemy_count": 3, "containment": "hit_test" }"#)
            .expect("valid settings");
        assert_eq!(settings.enemy_count, 3);
        assert_eq!(settings.containment, ContainmentMode::HitTest);
        assert_eq!(settings.trail_ttl, TRAIL_TTL);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            enemy_count: 9,
            spark_radius: 10.0,
            ..Default::default()
        };
        let json = settings.to_json().expect("serializes");
        assert_eq!(Settings::from_json(&json).expect("parses"), settings);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_unusable_values() {
        let tiny = Settings {
            arena_width: 6.0,
            ..Default::default()
        };
        assert!(matches!(tiny.check(), Err(SettingsError::Invalid(_))));

        let no_ttl = Settings {
            trail_ttl: 0.0,
            ..Default::default()
        };
        assert!(no_ttl.check().is_err());

        let nan = Settings {
            enemy_speed: f32::NAN,
            ..Default::default()
        };
        assert!(nan.check().is_err());
    }

    #[test]
    fn test_validate_warns() {
        let settings = Settings {
            enemy_radius: 1.0,
            enemy_count: 0,
            ..Default::default()
        };
        assert_eq!(settings.validate().len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(err, Err(SettingsError::Io { .. })));
    }

    #[test]
    fn test_containment_mode_from_str() {
        assert_eq!(ContainmentMode::from_str("Polygon"), Some(ContainmentMode::Polygon));
        assert_eq!(ContainmentMode::from_str("hit-test"), Some(ContainmentMode::HitTest));
        assert_eq!(ContainmentMode::from_str("nope"), None);
        assert_eq!(
            ContainmentMode::from_str(ContainmentMode::HitTest.as_str()),
            Some(ContainmentMode::HitTest)
        );
    }
}
