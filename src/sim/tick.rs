//! Per-frame simulation step
//!
//! Called once per display refresh with the host's monotonic time (ms).

use super::state::{GameEvent, Level};
use super::trail::TrailAge;

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Advance the level to `now`
///
/// Ages the trail, then moves every sprite in collection order and checks it
/// against the spark and the trail. Once the spark is dead this does nothing
/// and keeps returning [`LoopControl::Stop`].
pub fn tick(level: &mut Level, now: f64) -> LoopControl {
    if !level.spark.is_alive() {
        return LoopControl::Stop;
    }

    if level.trail.age(now) == TrailAge::Released {
        level.push_event(GameEvent::TrailReleased);
    }

    let dt = ((now - level.t0) / 1000.0).max(0.0) as f32;
    level.t0 = now;
    level.frames += 1;

    let (width, height) = (level.width, level.height);
    let mut events = Vec::new();
    for sprite in &mut level.sprites {
        sprite.advance(dt, width, height);
        let contacts = sprite.contacts(&level.spark, &level.trail);
        if contacts.kills_spark {
            level.spark.kill();
            events.push(GameEvent::SparkKilled { by: sprite.id });
        }
        if contacts.cuts_trail {
            level.trail.clear();
            events.push(GameEvent::TrailCut { by: sprite.id });
        }
    }
    for event in events {
        match event {
            GameEvent::SparkKilled { by } => log::info!("Spark destroyed by sprite {by}"),
            GameEvent::TrailCut { by } => log::debug!("Trail cut by sprite {by}"),
            _ => {}
        }
        level.push_event(event);
    }

    if level.spark.is_alive() {
        LoopControl::Continue
    } else {
        LoopControl::Stop
    }
}
