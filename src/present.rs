//! Presentation interface
//!
//! The engine keeps every position itself and only pushes draw calls through
//! [`Presenter`]. Nothing here feeds back into the simulation except
//! `hit_test`, which is consulted only in `ContainmentMode::HitTest`.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::sim::{Shape, point_in_polygon};

/// Opaque handle to something the presenter drew
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DrawableId(pub u32);

/// What to create
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawableKind {
    Sprite(Shape),
    /// The trail polyline (filled while a loop is frozen)
    Trail,
    Spark { radius: f32 },
}

/// Translate, then rotate (degrees), then scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate: Vec2,
    pub rotate: f32,
    pub scale: f32,
}

pub trait Presenter {
    fn create(&mut self, kind: DrawableKind, color: &str) -> DrawableId;

    fn set_transform(&mut self, id: DrawableId, transform: Transform);

    fn set_polyline(&mut self, id: DrawableId, points: &[Vec2]);

    fn set_fill(&mut self, id: DrawableId, visible: bool);

    fn detach(&mut self, id: DrawableId);

    /// Topmost drawable at `at`, if the presenter can tell
    fn hit_test(&self, _at: Vec2) -> Option<DrawableId> {
        None
    }

    /// Per-frame cosmetic refresh (spark spokes and the like)
    fn refresh_decorations(&mut self) {}
}

/// Presenter that draws nothing and traces every call
///
/// Filled polylines are remembered so hit tests can be answered headless.
#[derive(Debug, Default)]
pub struct LogPresenter {
    next_id: u32,
    live: usize,
    polylines: BTreeMap<DrawableId, (Vec<Vec2>, bool)>,
}

impl LogPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drawables created and not yet detached
    pub fn live(&self) -> usize {
        self.live
    }
}

impl Presenter for LogPresenter {
    fn create(&mut self, kind: DrawableKind, color: &str) -> DrawableId {
        self.next_id += 1;
        self.live += 1;
        log::trace!("create #{} {:?} ({})", self.next_id, kind, color);
        DrawableId(self.next_id)
    }

    fn set_transform(&mut self, id: DrawableId, t: Transform) {
        log::trace!(
            "#{} translate({:.1}, {:.1}) rotate({:.1}) scale({})",
            id.0,
            t.translate.x,
            t.translate.y,
            t.rotate,
            t.scale
        );
    }

    fn set_polyline(&mut self, id: DrawableId, points: &[Vec2]) {
        log::trace!("#{} polyline of {} points", id.0, points.len());
        let entry = self.polylines.entry(id).or_default();
        entry.0.clear();
        entry.0.extend_from_slice(points);
    }

    fn set_fill(&mut self, id: DrawableId, visible: bool) {
        log::trace!("#{} fill {}", id.0, if visible { "on" } else { "off" });
        self.polylines.entry(id).or_default().1 = visible;
    }

    fn detach(&mut self, id: DrawableId) {
        self.live = self.live.saturating_sub(1);
        self.polylines.remove(&id);
        log::trace!("detach #{}", id.0);
    }

    /// Latest filled polyline covering `at`
    fn hit_test(&self, at: Vec2) -> Option<DrawableId> {
        self.polylines
            .iter()
            .rev()
            .find(|(_, (points, filled))| *filled && point_in_polygon(at, points))
            .map(|(id, _)| *id)
    }
}
