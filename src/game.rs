//! Game driver: feeds host frames and pointer events into the simulation and
//! mirrors the result onto a [`Presenter`]

use std::collections::HashMap;

use glam::Vec2;

use crate::platform::{PointerAdapter, PointerEvent};
use crate::present::{DrawableId, DrawableKind, Presenter, Transform};
use crate::settings::{ContainmentMode, Settings, SettingsError};
use crate::sim::{
    DragCommand, EnclosureTest, EvenOdd, GameEvent, InputController, InputEffect, Level,
    LoopControl, PALETTE, tick,
};

/// Enclosure by asking the presenter what is drawn on top at each sprite
struct HitTest<'a, P: Presenter> {
    presenter: &'a P,
    trail: DrawableId,
}

impl<P: Presenter> EnclosureTest for HitTest<'_, P> {
    fn encloses(&mut self, _ring: &[Vec2], point: Vec2) -> bool {
        self.presenter.hit_test(point) == Some(self.trail)
    }
}

/// One play session
#[derive(Debug)]
pub struct Game<P: Presenter> {
    level: Level,
    input: InputController,
    pointer: PointerAdapter,
    presenter: P,
    containment: ContainmentMode,
    trail_drawable: DrawableId,
    spark_drawable: DrawableId,
    sprite_drawables: HashMap<u32, DrawableId>,
    trail_filled: bool,
    events: Vec<GameEvent>,
}

impl<P: Presenter> Game<P> {
    /// Build a level from settings and draw it; nothing is drawn when the
    /// settings are rejected
    pub fn new(
        settings: &Settings,
        seed: u64,
        now: f64,
        presenter: P,
    ) -> Result<Self, SettingsError> {
        let level = Level::new(settings, seed, now)?;
        for warning in settings.validate() {
            log::warn!("settings: {warning}");
        }
        Ok(Self::with_level(level, settings.containment, presenter))
    }

    /// Draw an already built level
    pub fn with_level(level: Level, containment: ContainmentMode, mut presenter: P) -> Self {
        let trail_drawable = presenter.create(DrawableKind::Trail, "none");
        let spark_drawable = presenter.create(
            DrawableKind::Spark {
                radius: level.spark.radius,
            },
            "yellow",
        );
        let sprite_drawables = level
            .sprites
            .iter()
            .map(|s| {
                let color = PALETTE[s.color as usize % PALETTE.len()];
                (s.id, presenter.create(DrawableKind::Sprite(s.shape), color))
            })
            .collect();

        let mut game = Self {
            level,
            input: InputController::new(),
            pointer: PointerAdapter::new(),
            presenter,
            containment,
            trail_drawable,
            spark_drawable,
            sprite_drawables,
            trail_filled: false,
            events: Vec::new(),
        };
        game.sync_spark();
        game.sync_sprites();
        game.sync_trail();
        game
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn input(&self) -> &InputController {
        &self.input
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn is_over(&self) -> bool {
        !self.level.spark.is_alive()
    }

    /// Events since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// One display refresh. The host stops scheduling on [`LoopControl::Stop`].
    pub fn frame(&mut self, now: f64) -> LoopControl {
        if self.is_over() {
            return LoopControl::Stop;
        }
        self.presenter.refresh_decorations();
        let control = tick(&mut self.level, now);
        self.sync_sprites();
        self.sync_trail();
        self.collect_events();
        if control == LoopControl::Stop {
            log::info!(
                "Round over after {} frames, {} enemies left",
                self.level.frames,
                self.level.hazards_left()
            );
        }
        control
    }

    /// Feed a normalized drag command
    pub fn handle_input(&mut self, cmd: DragCommand, now: f64) -> InputEffect {
        let effect = self.input.handle(cmd, &mut self.level, now);
        match effect {
            InputEffect::Ignored => {}
            InputEffect::Grabbed | InputEffect::Released => self.sync_trail(),
            InputEffect::Moved { closure, .. } => {
                self.sync_spark();
                self.sync_trail();
                if closure.is_some() {
                    self.capture();
                }
            }
        }
        self.collect_events();
        effect
    }

    /// Feed a raw pointer event; `None` when the adapter dropped it
    pub fn handle_pointer(&mut self, event: PointerEvent, now: f64) -> Option<InputEffect> {
        let cmd = self.pointer.translate(event, self.input.wants_motion())?;
        Some(self.handle_input(cmd, now))
    }

    fn capture(&mut self) {
        let captured = match self.containment {
            ContainmentMode::Polygon => self.level.capture_enclosed(&mut EvenOdd),
            ContainmentMode::HitTest => {
                let mut test = HitTest {
                    presenter: &self.presenter,
                    trail: self.trail_drawable,
                };
                self.level.capture_enclosed(&mut test)
            }
        };
        for sprite in captured {
            if let Some(drawable) = self.sprite_drawables.remove(&sprite.id) {
                self.presenter.detach(drawable);
            }
        }
    }

    fn sync_spark(&mut self) {
        let spark = &self.level.spark;
        self.presenter.set_transform(
            self.spark_drawable,
            Transform {
                translate: spark.pos,
                rotate: spark.tilt,
                scale: 1.0,
            },
        );
    }

    fn sync_sprites(&mut self) {
        for sprite in &self.level.sprites {
            if let Some(&drawable) = self.sprite_drawables.get(&sprite.id) {
                self.presenter.set_transform(
                    drawable,
                    Transform {
                        translate: sprite.pos,
                        rotate: sprite.rotation,
                        scale: sprite.scale,
                    },
                );
            }
        }
    }

    fn sync_trail(&mut self) {
        let points = self.level.trail.positions();
        self.presenter.set_polyline(self.trail_drawable, &points);
        let frozen = self.level.trail.is_frozen();
        if frozen != self.trail_filled {
            self.presenter.set_fill(self.trail_drawable, frozen);
            self.trail_filled = frozen;
        }
    }

    fn collect_events(&mut self) {
        self.events.extend(self.level.take_events());
    }
}
