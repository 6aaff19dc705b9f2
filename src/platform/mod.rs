//! Platform abstraction layer
//!
//! Turns raw mouse/touch/pen events (already mapped into arena coordinates)
//! into [`DragCommand`]s so the input state machine never sees device kinds.

use glam::Vec2;

use crate::sim::DragCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerDevice {
    Mouse,
    Touch,
    Pen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// A raw pointer event as the host delivers it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub device: PointerDevice,
    pub phase: PointerPhase,
    pub pos: Vec2,
}

impl PointerEvent {
    pub fn new(device: PointerDevice, phase: PointerPhase, pos: Vec2) -> Self {
        Self { device, phase, pos }
    }
}

/// Tracks which device started the current drag
///
/// Motion and release events are dropped unless the caller is listening
/// (i.e. a drag is in progress) and they come from the device that started it.
#[derive(Debug, Clone, Default)]
pub struct PointerAdapter {
    active: Option<PointerDevice>,
}

impl PointerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event: PointerEvent, listening: bool) -> Option<DragCommand> {
        match event.phase {
            PointerPhase::Down => {
                if listening {
                    // Second pointer while one is already dragging
                    return None;
                }
                self.active = Some(event.device);
                Some(DragCommand::Start(event.pos))
            }
            PointerPhase::Move => {
                (listening && self.active == Some(event.device)).then_some(DragCommand::Move(event.pos))
            }
            PointerPhase::Up | PointerPhase::Cancel => {
                if !listening || self.active != Some(event.device) {
                    return None;
                }
                self.active = None;
                Some(DragCommand::End)
            }
        }
    }
}
