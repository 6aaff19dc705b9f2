//! The spark's trail: a time-decaying polyline that closes into loops
//!
//! Only the newest segment is ever tested against history. Older segments are
//! known not to cross each other because the trail freezes the moment a
//! crossing appears.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{distance_squared, intersect};
use crate::settings::Settings;

/// A captured trail point, stamped with the host time it was added (ms)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub added_at: f64,
}

/// A detected self-intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Closure {
    /// Exact crossing point, now the last point of the trail
    pub point: Vec2,
    /// Index of the older segment that the newest segment crossed
    pub segment: usize,
    /// Index (in the untrimmed trail) of the loop's first vertex
    pub start: usize,
}

/// What a call to [`Trail::age`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailAge {
    /// Frozen and still inside the freeze window
    Held,
    /// Freeze window elapsed; points cleared and trail unfrozen
    Released,
    /// Not frozen; this many stale points were dropped
    Trimmed(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail {
    points: Vec<TrailPoint>,
    frozen_at: Option<f64>,
    ttl: f64,
    freeze: f64,
    threshold: f32,
}

impl Trail {
    pub fn new(ttl: f64, freeze: f64, threshold: f32) -> Self {
        Self {
            points: Vec::new(),
            frozen_at: None,
            ttl,
            freeze,
            threshold,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.trail_ttl,
            settings.freeze_duration,
            settings.distance_threshold,
        )
    }

    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }

    /// Point positions, oldest first
    pub fn positions(&self) -> Vec<Vec2> {
        self.points.iter().map(|p| p.pos).collect()
    }

    /// Consecutive segments, oldest first
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points.windows(2).map(|w| (w[0].pos, w[1].pos))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_at.is_some()
    }

    pub fn frozen_at(&self) -> Option<f64> {
        self.frozen_at
    }

    /// Drop all points. A pending freeze is left alone and expires through
    /// [`Trail::age`] as usual.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Add a point and check whether it closed a loop
    ///
    /// A point within the distance threshold of the last one replaces it, so
    /// near-zero segments never register as crossings with themselves.
    pub fn append(&mut self, pos: Vec2, now: f64) -> Option<Closure> {
        if self.is_frozen() {
            return None;
        }
        if let Some(last) = self.points.last() {
            if distance_squared(pos, last.pos) < self.threshold {
                self.points.pop();
            }
        }
        self.points.push(TrailPoint { pos, added_at: now });
        self.detect_closure(now)
    }

    /// Test the newest segment against every older, non-adjacent one
    ///
    /// On the first crossing (oldest segment first) the trail freezes, drops
    /// everything before the loop and ends exactly on the crossing point.
    pub fn detect_closure(&mut self, now: f64) -> Option<Closure> {
        let n = self.points.len();
        if n < 4 {
            return None;
        }
        let newest = (self.points[n - 1].pos, self.points[n - 2].pos);
        let (segment, point) = (0..n - 3).find_map(|i| {
            intersect(newest.0, newest.1, self.points[i].pos, self.points[i + 1].pos)
                .map(|p| (i, p))
        })?;

        let start = segment + 1;
        self.frozen_at = Some(now);
        self.points.drain(..start);
        if let Some(last) = self.points.last_mut() {
            last.pos = point;
        }
        Some(Closure {
            point,
            segment,
            start,
        })
    }

    /// Per-frame aging: hold while frozen, release after the freeze window,
    /// otherwise drop points older than the TTL
    pub fn age(&mut self, now: f64) -> TrailAge {
        if let Some(frozen_at) = self.frozen_at {
            if now - frozen_at > self.freeze {
                self.points.clear();
                self.frozen_at = None;
                return TrailAge::Released;
            }
            return TrailAge::Held;
        }
        let before = self.points.len();
        let ttl = self.ttl;
        self.points.retain(|p| now - p.added_at < ttl);
        TrailAge::Trimmed(before - self.points.len())
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
