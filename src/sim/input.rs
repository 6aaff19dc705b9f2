//! Drag state machine: normalized pointer commands move the spark and grow
//! the trail

use glam::Vec2;

use super::state::Level;
use super::trail::Closure;

/// Device-independent pointer command, already in arena coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragCommand {
    Start(Vec2),
    Move(Vec2),
    End,
}

/// Offset between the pointer and the spark at grab time, so the spark
/// doesn't jump to the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub grab_offset: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    #[default]
    Idle,
    Dragging(DragState),
}

/// What handling a command did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEffect {
    /// Nothing changed (dead spark, missed grab, stray move/end)
    Ignored,
    /// The spark was picked up; trail cleared
    Grabbed,
    /// The spark moved; `closure` is set when the move closed a loop
    Moved { to: Vec2, closure: Option<Closure> },
    /// The spark was let go; trail cleared
    Released,
}

#[derive(Debug, Clone, Default)]
pub struct InputController {
    state: InputState,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InputState::Dragging(_))
    }

    /// Move/end events are only worth delivering while dragging
    pub fn wants_motion(&self) -> bool {
        self.is_dragging()
    }

    pub fn handle(&mut self, cmd: DragCommand, level: &mut Level, now: f64) -> InputEffect {
        if !level.spark.is_alive() {
            return InputEffect::Ignored;
        }
        match (self.state, cmd) {
            (InputState::Idle, DragCommand::Start(pos)) => {
                if !level.spark.can_grab(pos) {
                    return InputEffect::Ignored;
                }
                self.state = InputState::Dragging(DragState {
                    grab_offset: pos - level.spark.pos,
                });
                level.trail.clear();
                InputEffect::Grabbed
            }
            (InputState::Dragging(drag), DragCommand::Move(pos)) => {
                let to = level.clamp_to_arena(pos - drag.grab_offset);
                level.move_spark(to);
                let closure = level.extend_trail(to, now);
                InputEffect::Moved { to, closure }
            }
            (InputState::Dragging(_), DragCommand::End) => {
                self.state = InputState::Idle;
                level.trail.clear();
                InputEffect::Released
            }
            // A second start while dragging, or motion while idle
            _ => InputEffect::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn level() -> Level {
        let settings = Settings {
            enemy_count: 0,
            ..Default::default()
        };
        Level::empty(&settings, 1, 0.0)
    }

    #[test]
    fn test_grab_records_offset_and_clears_trail() {
        let mut level = level();
        level.trail.append(Vec2::new(1.0, 1.0), 0.0);
        let mut input = InputController::new();

        let effect = input.handle(DragCommand::Start(Vec2::new(403.0, 298.0)), &mut level, 0.0);
        assert_eq!(effect, InputEffect::Grabbed);
        assert_eq!(
            input.state(),
            InputState::Dragging(DragState {
                grab_offset: Vec2::new(3.0, -2.0)
            })
        );
        assert!(level.trail.is_empty());
        assert!(input.wants_motion());
    }

    #[test]
    fn test_missed_grab_stays_idle() {
        let mut level = level();
        let mut input = InputController::new();
        let effect = input.handle(DragCommand::Start(Vec2::new(10.0, 10.0)), &mut level, 0.0);
        assert_eq!(effect, InputEffect::Ignored);
        assert!(!input.is_dragging());
        assert!(!input.wants_motion());
    }

    #[test]
    fn test_move_applies_offset_and_grows_trail() {
        let mut level = level();
        let mut input = InputController::new();
        input.handle(DragCommand::Start(Vec2::new(403.0, 298.0)), &mut level, 0.0);

        let effect = input.handle(DragCommand::Move(Vec2::new(503.0, 298.0)), &mut level, 16.0);
        assert_eq!(
            effect,
            InputEffect::Moved {
                to: Vec2::new(500.0, 300.0),
                closure: None
            }
        );
        assert_eq!(level.spark.pos, Vec2::new(500.0, 300.0));
        assert_eq!(level.trail.positions(), vec![Vec2::new(500.0, 300.0)]);
    }

    #[test]
    fn test_move_clamped_to_arena() {
        let mut level = level();
        let mut input = InputController::new();
        input.handle(DragCommand::Start(Vec2::new(400.0, 300.0)), &mut level, 0.0);
        input.handle(DragCommand::Move(Vec2::new(-50.0, 900.0)), &mut level, 16.0);
        assert_eq!(level.spark.pos, Vec2::new(0.0, 600.0));
    }

    #[test]
    fn test_idle_ignores_motion() {
        let mut level = level();
        let mut input = InputController::new();
        assert_eq!(
            input.handle(DragCommand::Move(Vec2::new(10.0, 10.0)), &mut level, 0.0),
            InputEffect::Ignored
        );
        assert_eq!(input.handle(DragCommand::End, &mut level, 0.0), InputEffect::Ignored);
        assert_eq!(level.spark.pos, Vec2::new(400.0, 300.0));
        assert!(level.trail.is_empty());
    }

    #[test]
    fn test_release_clears_trail() {
        let mut level = level();
        let mut input = InputController::new();
        input.handle(DragCommand::Start(Vec2::new(400.0, 300.0)), &mut level, 0.0);
        input.handle(DragCommand::Move(Vec2::new(420.0, 300.0)), &mut level, 16.0);
        input.handle(DragCommand::Move(Vec2::new(440.0, 300.0)), &mut level, 32.0);
        assert_eq!(level.trail.len(), 2);

        assert_eq!(input.handle(DragCommand::End, &mut level, 48.0), InputEffect::Released);
        assert!(level.trail.is_empty());
        assert_eq!(input.state(), InputState::Idle);
    }

    #[test]
    fn test_dead_spark_ignores_everything() {
        let mut level = level();
        let mut input = InputController::new();
        input.handle(DragCommand::Start(Vec2::new(400.0, 300.0)), &mut level, 0.0);
        level.spark.kill();
        assert_eq!(
            input.handle(DragCommand::Move(Vec2::new(500.0, 300.0)), &mut level, 16.0),
            InputEffect::Ignored
        );
        assert_eq!(input.handle(DragCommand::End, &mut level, 32.0), InputEffect::Ignored);
        assert_eq!(level.spark.pos, Vec2::new(400.0, 300.0));
    }
}
