//! Which sprites does a closed loop enclose?

use glam::Vec2;

use super::geometry::point_in_polygon;
use super::sprite::Sprite;

/// Decides whether a point lies inside a closed trail loop
pub trait EnclosureTest {
    /// `ring` is the trimmed trail, implicitly closed from last to first
    fn encloses(&mut self, ring: &[Vec2], point: Vec2) -> bool;
}

/// Even-odd point-in-polygon over the trail's own points
#[derive(Debug, Clone, Copy, Default)]
pub struct EvenOdd;

impl EnclosureTest for EvenOdd {
    fn encloses(&mut self, ring: &[Vec2], point: Vec2) -> bool {
        point_in_polygon(point, ring)
    }
}

/// Ids of the sprites whose anchor point is enclosed by `ring`, in
/// collection order
pub fn resolve_captures<T: EnclosureTest + ?Sized>(
    ring: &[Vec2],
    sprites: &[Sprite],
    test: &mut T,
) -> Vec<u32> {
    if ring.len() < 3 {
        return Vec::new();
    }
    sprites
        .iter()
        .filter(|s| test.encloses(ring, s.pos))
        .map(|s| s.id)
        .collect()
}

/// Remove the given ids from the collection, returning the removed sprites
///
/// Removal happens after the scan so indices never shift under an iterator.
pub fn remove_captured(sprites: &mut Vec<Sprite>, ids: &[u32]) -> Vec<Sprite> {
    if ids.is_empty() {
        return Vec::new();
    }
    let (captured, kept): (Vec<_>, Vec<_>) =
        sprites.drain(..).partition(|s| ids.contains(&s.id));
    *sprites = kept;
    captured
}
