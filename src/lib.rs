//! Zilch - draw loops with the spark, capture what they enclose
//!
//! Core modules:
//! - `sim`: Trail, sprites, capture and the per-frame tick (no rendering)
//! - `present`: Narrow interface to whatever draws the game
//! - `platform`: Raw pointer events to normalized drag commands
//! - `game`: Glue that drives the sim and pushes draw calls to a presenter
//! - `settings`: Startup tunables

pub mod game;
pub mod platform;
pub mod present;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{ContainmentMode, Settings, SettingsError};

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Squared distance under which a new trail point replaces the last one
    pub const DISTANCE_THRESHOLD: f32 = 1.0;
    /// Spark kill radius and grab tolerance (compared squared)
    pub const SPARK_RADIUS: f32 = 6.0;
    /// Trail point lifetime (ms)
    pub const TRAIL_TTL: f64 = 900.0;
    /// How long a closed trail stays frozen before clearing (ms)
    pub const FREEZE_DURATION: f64 = 250.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Enemy defaults
    pub const ENEMY_COUNT: usize = 6;
    pub const ENEMY_RADIUS: f32 = 4.0;
    pub const ENEMY_SPEED: f32 = 60.0;
    /// Spin range (degrees per second)
    pub const ENEMY_SPIN_MIN: f32 = 60.0;
    pub const ENEMY_SPIN_MAX: f32 = 200.0;

    /// Decoration particles trailing an enemy
    pub const PARTICLE_RADIUS: f32 = 1.0;
    pub const PARTICLE_SPEED: f32 = 50.0;

    /// Spark tilt jitter applied on every move (degrees)
    pub const SPARK_TILT: i32 = 15;
}

/// Clamp without panicking: inverted bounds resolve to `lo`, NaN to `hi`
#[inline]
pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    x.min(hi).max(lo)
}

/// Normalize a heading in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(deg: f32) -> f32 {
    let d = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if d >= 360.0 { 0.0 } else { d }
}
