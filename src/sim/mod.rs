//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Host clock in, no timers or threads
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No rendering or platform dependencies

pub mod capture;
pub mod geometry;
pub mod input;
pub mod sprite;
pub mod state;
pub mod tick;
pub mod trail;

pub use capture::{EnclosureTest, EvenOdd, remove_captured, resolve_captures};
pub use geometry::{cross, distance_squared, distance_to_segment_squared, intersect, point_in_polygon};
pub use input::{DragCommand, DragState, InputController, InputEffect, InputState};
pub use sprite::{Contacts, PALETTE, Shape, Spark, Sprite};
pub use state::{GameEvent, Level};
pub use tick::{LoopControl, tick};
pub use trail::{Closure, Trail, TrailAge, TrailPoint};
