//! Sprites (enemies and their decoration particles) and the player's spark

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{distance_squared, distance_to_segment_squared};
use super::trail::Trail;
use crate::{clamp, normalize_degrees};

/// Fill colors enemies are drawn with
pub const PALETTE: [&str; 12] = [
    "silver", "white", "maroon", "red", "purple", "fuchsia", "green", "lime", "navy", "blue",
    "teal", "aqua",
];

/// Primitive a sprite is drawn as
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Regular polygon; `phase` is a fraction of a turn
    Polygon { sides: u32, radius: f32, phase: f32 },
    Star { points: u32, inner: f32, outer: f32, phase: f32 },
}

/// Outcome of testing a sprite against the spark and the trail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    /// Sprite is inside the spark's kill radius
    pub kills_spark: bool,
    /// Sprite touches a trail segment
    pub cuts_trail: bool,
}

/// A roaming sprite
///
/// Heading is in degrees, always normalized to [0, 360); the radian value is
/// kept in sync on every write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    pub id: u32,
    pub shape: Shape,
    /// Index into [`PALETTE`]
    pub color: u8,
    pub pos: Vec2,
    /// Rotation (degrees)
    pub rotation: f32,
    pub scale: f32,
    heading: f32,
    heading_rad: f32,
    pub accel: f32,
    pub vel: f32,
    pub vel_min: f32,
    pub vel_max: f32,
    /// Heading velocity (degrees per second)
    pub heading_vel: f32,
    /// Rotation velocity (degrees per second)
    pub rotation_vel: f32,
    /// Collision and capture tolerance
    pub radius: f32,
}

impl Sprite {
    pub fn new(id: u32, shape: Shape, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            shape,
            color: 0,
            pos,
            rotation: 0.0,
            scale: 1.0,
            heading: 0.0,
            heading_rad: 0.0,
            accel: 0.0,
            vel: 0.0,
            vel_min: f32::MIN,
            vel_max: f32::MAX,
            heading_vel: 0.0,
            rotation_vel: 0.0,
            radius,
        }
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn heading_radians(&self) -> f32 {
        self.heading_rad
    }

    pub fn set_heading(&mut self, degrees: f32) {
        self.heading = normalize_degrees(degrees);
        self.heading_rad = self.heading.to_radians();
    }

    /// Full enemies can kill the spark and cut the trail; particles can't
    #[inline]
    pub fn is_hazard(&self) -> bool {
        self.radius > 1.0
    }

    /// Integrate one step and bounce off the arena walls
    ///
    /// Only one axis reflects per step: a corner hit flips the horizontal
    /// component and leaves the vertical one for the next frame.
    pub fn advance(&mut self, dt: f32, width: f32, height: f32) {
        self.vel = clamp(self.vel + self.accel * dt, self.vel_min, self.vel_max);
        self.set_heading(self.heading + self.heading_vel * dt);
        self.rotation += self.rotation_vel * dt;
        self.pos.x += self.vel * self.heading_rad.cos() * dt;
        self.pos.y += self.vel * self.heading_rad.sin() * dt;

        let r = self.radius;
        if self.pos.x < r || self.pos.x > width - r {
            self.set_heading(180.0 - self.heading);
        } else if self.pos.y < r || self.pos.y > height - r {
            self.set_heading(-self.heading);
        }
        self.pos.x = clamp(self.pos.x, r, width - r);
        self.pos.y = clamp(self.pos.y, r, height - r);
    }

    /// Check this sprite against the spark and every trail segment
    pub fn contacts(&self, spark: &Spark, trail: &Trail) -> Contacts {
        if !self.is_hazard() {
            return Contacts::default();
        }
        let kills_spark = spark.is_alive() && spark.within_reach(self.pos);
        let reach = self.radius * self.radius;
        let cuts_trail = trail
            .segments()
            .any(|(v, w)| distance_to_segment_squared(self.pos, v, w) < reach);
        Contacts {
            kills_spark,
            cuts_trail,
        }
    }
}

/// The player-controlled spark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spark {
    pub pos: Vec2,
    /// Kill radius and grab tolerance
    pub radius: f32,
    /// Cosmetic tilt (degrees), re-rolled on every move
    pub tilt: f32,
    alive: bool,
}

impl Spark {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius,
            tilt: 0.0,
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Mark the spark dead. There is no way back; the round is over.
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Strictly inside the spark's radius
    #[inline]
    pub fn within_reach(&self, p: Vec2) -> bool {
        distance_squared(p, self.pos) < self.radius * self.radius
    }

    /// Whether a drag starting at `p` picks the spark up
    pub fn can_grab(&self, p: Vec2) -> bool {
        self.alive && distance_squared(p, self.pos) <= self.radius * self.radius
    }

    pub fn move_to(&mut self, pos: Vec2, tilt: f32) {
        self.pos = pos;
        self.tilt = tilt;
    }
}
