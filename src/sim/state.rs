//! Level state: arena, trail, spark and the sprite collection

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::capture::{EnclosureTest, remove_captured, resolve_captures};
use super::sprite::{PALETTE, Shape, Spark, Sprite};
use super::trail::{Closure, Trail};
use crate::clamp;
use crate::consts::{PARTICLE_RADIUS, PARTICLE_SPEED, SPARK_TILT};
use crate::settings::{Settings, SettingsError};

/// Something that happened during input handling or a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// The trail crossed itself
    TrailClosed { point: Vec2, start: usize },
    /// A sprite was enclosed by a loop and removed
    Captured { id: u32 },
    /// An enemy touched the trail and erased it
    TrailCut { by: u32 },
    /// An enemy touched the spark; the round is over
    SparkKilled { by: u32 },
    /// A frozen loop finished its freeze window
    TrailReleased,
}

/// A single round
#[derive(Debug, Clone, Serialize)]
pub struct Level {
    pub width: f32,
    pub height: f32,
    pub trail: Trail,
    pub spark: Spark,
    /// Sprites in update order
    pub sprites: Vec<Sprite>,
    /// Host time of the last tick (ms)
    pub t0: f64,
    /// Ticks run so far
    pub frames: u64,
    pub seed: u64,
    #[serde(skip)]
    rng: Pcg32,
    next_id: u32,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl Level {
    /// An empty level: spark centered, no sprites
    pub fn empty(settings: &Settings, seed: u64, now: f64) -> Self {
        let center = Vec2::new(settings.arena_width / 2.0, settings.arena_height / 2.0);
        Self {
            width: settings.arena_width,
            height: settings.arena_height,
            trail: Trail::from_settings(settings),
            spark: Spark::new(center, settings.spark_radius),
            sprites: Vec::new(),
            t0: now,
            frames: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            events: Vec::new(),
        }
    }

    /// A level populated with the configured enemy roster
    ///
    /// Fails with [`SettingsError::Invalid`] before anything is spawned when
    /// the settings can't be played.
    pub fn new(settings: &Settings, seed: u64, now: f64) -> Result<Self, SettingsError> {
        settings.check()?;
        let mut level = Self::empty(settings, seed, now);
        for _ in 0..settings.enemy_count {
            level.spawn_enemy(settings);
        }
        log::info!(
            "Level ready: {}x{}, {} sprites, seed {}",
            level.width,
            level.height,
            level.sprites.len(),
            seed
        );
        Ok(level)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a sprite built by the caller; its id is assigned here
    pub fn add_sprite(&mut self, mut sprite: Sprite) -> u32 {
        sprite.id = self.next_entity_id();
        let id = sprite.id;
        self.sprites.push(sprite);
        id
    }

    /// Spawn one enemy with a random look, position, heading and spin, plus
    /// its decoration particles. Settings must already pass `check`.
    fn spawn_enemy(&mut self, settings: &Settings) -> u32 {
        let shape = self.random_shape();
        let pos = Vec2::new(
            self.rng.random_range(0.0..=self.width),
            self.rng.random_range(0.0..=self.height),
        );
        let mut enemy = Sprite::new(0, shape, pos, settings.enemy_radius);
        enemy.color = self.rng.random_range(0..PALETTE.len()) as u8;
        enemy.set_heading(self.rng.random_range(0..360) as f32);
        enemy.vel = settings.enemy_speed;
        enemy.rotation_vel = self
            .rng
            .random_range(settings.enemy_spin_min..=settings.enemy_spin_max);
        let color = enemy.color;
        let id = self.add_sprite(enemy);

        for _ in 0..settings.particles_per_enemy {
            let mut particle = Sprite::new(
                0,
                Shape::Circle {
                    radius: PARTICLE_RADIUS,
                },
                pos,
                PARTICLE_RADIUS,
            );
            particle.color = color;
            particle.set_heading(self.rng.random_range(0..360) as f32);
            particle.vel = PARTICLE_SPEED;
            self.add_sprite(particle);
        }
        id
    }

    fn random_shape(&mut self) -> Shape {
        let phase = self.rng.random::<f32>();
        match self.rng.random_range(0..6) {
            0 => Shape::Circle { radius: 4.0 },
            1 => Shape::Star {
                points: 5,
                inner: 2.0,
                outer: 5.0,
                phase,
            },
            n => Shape::Polygon {
                sides: n + 1,
                radius: 4.0,
                phase,
            },
        }
    }

    /// Clamp a point into the arena
    pub fn clamp_to_arena(&self, p: Vec2) -> Vec2 {
        Vec2::new(clamp(p.x, 0.0, self.width), clamp(p.y, 0.0, self.height))
    }

    /// Move the spark, re-rolling its cosmetic tilt
    pub fn move_spark(&mut self, pos: Vec2) {
        let tilt = self.rng.random_range(-SPARK_TILT..=SPARK_TILT) as f32;
        self.spark.move_to(pos, tilt);
    }

    /// Grow the trail with the spark's new position, recording a closure
    pub fn extend_trail(&mut self, pos: Vec2, now: f64) -> Option<Closure> {
        let closure = self.trail.append(pos, now)?;
        log::debug!(
            "Trail closed at ({:.1}, {:.1}), loop of {} points",
            closure.point.x,
            closure.point.y,
            self.trail.len()
        );
        self.push_event(GameEvent::TrailClosed {
            point: closure.point,
            start: closure.start,
        });
        Some(closure)
    }

    /// Remove every sprite enclosed by the current (closed) trail
    ///
    /// Does nothing unless the trail is frozen on a loop.
    pub fn capture_enclosed<T: EnclosureTest + ?Sized>(&mut self, test: &mut T) -> Vec<Sprite> {
        if !self.trail.is_frozen() {
            return Vec::new();
        }
        let ring = self.trail.positions();
        let ids = resolve_captures(&ring, &self.sprites, test);
        let captured = remove_captured(&mut self.sprites, &ids);
        for sprite in &captured {
            log::debug!("Captured sprite {}", sprite.id);
            self.push_event(GameEvent::Captured { id: sprite.id });
        }
        captured
    }

    pub fn sprite(&self, id: u32) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.id == id)
    }

    /// Enemies (not particles) still roaming
    pub fn hazards_left(&self) -> usize {
        self.sprites.iter().filter(|s| s.is_hazard()).count()
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events recorded since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::capture::EvenOdd;

    #[test]
    fn test_new_level_spawns_roster() {
        let settings = Settings {
            enemy_count: 4,
            particles_per_enemy: 2,
            ..Default::default()
        };
        let level = Level::new(&settings, 7, 0.0).expect("valid settings");
        assert_eq!(level.sprites.len(), 12);
        assert_eq!(level.hazards_left(), 4);
        assert!(level.spark.is_alive());
        assert_eq!(level.spark.pos, Vec2::new(400.0, 300.0));
        for s in &level.sprites {
            assert!(s.pos.x >= 0.0 && s.pos.x <= level.width);
            assert!(s.pos.y >= 0.0 && s.pos.y <= level.height);
            assert!((s.color as usize) < PALETTE.len());
        }
    }

    #[test]
    fn test_same_seed_same_roster() {
        let settings = Settings::default();
        let a = Level::new(&settings, 42, 0.0).expect("valid settings");
        let b = Level::new(&settings, 42, 0.0).expect("valid settings");
        let pos = |l: &Level| l.sprites.iter().map(|s| (s.pos, s.heading())).collect::<Vec<_>>();
        assert_eq!(pos(&a), pos(&b));
    }

    #[test]
    fn test_ids_are_unique() {
        let settings = Settings {
            particles_per_enemy: 3,
            ..Default::default()
        };
        let level = Level::new(&settings, 1, 0.0).expect("valid settings");
        let mut ids: Vec<_> = level.sprites.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), level.sprites.len());
    }

    #[test]
    fn test_new_rejects_unplayable_settings() {
        let inverted_spin = Settings {
            enemy_spin_min: 200.0,
            enemy_spin_max: 60.0,
            ..Default::default()
        };
        assert!(matches!(
            Level::new(&inverted_spin, 1, 0.0),
            Err(SettingsError::Invalid(_))
        ));

        let negative_arena = Settings {
            arena_width: -10.0,
            ..Default::default()
        };
        assert!(matches!(
            Level::new(&negative_arena, 1, 0.0),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn test_capture_requires_closed_loop() {
        let settings = Settings {
            enemy_count: 0,
            ..Default::default()
        };
        let mut level = Level::empty(&settings, 1, 0.0);
        level.add_sprite(Sprite::new(0, Shape::Circle { radius: 4.0 }, Vec2::new(5.0, 5.0), 4.0));
        for p in [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)] {
            level.extend_trail(p, 0.0);
        }
        assert!(level.capture_enclosed(&mut EvenOdd).is_empty());
        assert_eq!(level.sprites.len(), 1);

        level.extend_trail(Vec2::new(0.0, 10.0), 1.0);
        assert!(level.extend_trail(Vec2::new(0.0, 0.0), 2.0).is_some());
        let captured = level.capture_enclosed(&mut EvenOdd);
        assert_eq!(captured.len(), 1);
        assert!(level.sprites.is_empty());
        assert_eq!(
            level.take_events(),
            vec![
                GameEvent::TrailClosed {
                    point: Vec2::new(0.0, 0.0),
                    start: 1
                },
                GameEvent::Captured { id: 1 },
            ]
        );
    }

    #[test]
    fn test_clamp_to_arena() {
        let level = Level::empty(&Settings::default(), 1, 0.0);
        assert_eq!(level.clamp_to_arena(Vec2::new(-5.0, 700.0)), Vec2::new(0.0, 600.0));
    }

    #[test]
    fn test_move_spark_tilt_in_range() {
        let mut level = Level::empty(&Settings::default(), 3, 0.0);
        for _ in 0..20 {
            level.move_spark(Vec2::new(10.0, 10.0));
            assert!(level.spark.tilt.abs() <= SPARK_TILT as f32);
        }
        assert_eq!(level.spark.pos, Vec2::new(10.0, 10.0));
    }
}
