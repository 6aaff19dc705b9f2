//! Zilch entry point
//!
//! Native builds run a headless, scripted round: the spark is dragged around
//! in closing squares while enemies roam, and the outcome is logged.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use glam::Vec2;

    use zilch::present::LogPresenter;
    use zilch::sim::{DragCommand, GameEvent, InputEffect, LoopControl};
    use zilch::{ContainmentMode, Game, Settings};

    /// Simulated display refresh (ms)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Side of each dragged square
    const LOOP_SIDE: f32 = 160.0;
    /// Spark travel per frame while dragging
    const DRAG_STEP: f32 = 16.0;
    /// Idle frames between loops
    const PAUSE_FRAMES: u32 = 20;

    #[derive(Debug, Parser)]
    #[command(name = "zilch", about = "Headless zilch round with a scripted player")]
    struct Args {
        /// Settings file (JSON); defaults are used when omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// Level seed
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Override the number of enemies
        #[arg(long)]
        enemies: Option<usize>,
        /// Stop after this many frames
        #[arg(long, default_value_t = 3600)]
        frames: u64,
        /// Containment test: polygon or hit_test (answered from the filled
        /// trail the headless presenter keeps)
        #[arg(long)]
        containment: Option<String>,
        /// Print the final level as JSON
        #[arg(long)]
        dump: bool,
    }

    /// Corner offsets of a square whose last leg crosses its first one,
    /// turned a quarter for every loop
    fn lasso(turn: u32) -> Vec<Vec2> {
        let s = LOOP_SIDE;
        let corners = [
            Vec2::new(s, 0.0),
            Vec2::new(s, s),
            Vec2::new(s / 4.0, s),
            Vec2::new(s / 4.0, -s / 4.0),
        ];
        let rot = Vec2::from_angle(turn as f32 * std::f32::consts::FRAC_PI_2);
        corners.iter().map(|c| rot.rotate(*c)).collect()
    }

    /// Evenly spaced drag targets along the lasso starting at `from`
    fn drag_path(from: Vec2, turn: u32) -> Vec<Vec2> {
        let mut path = Vec::new();
        let mut prev = from;
        for corner in lasso(turn) {
            let target = from + corner;
            let steps = ((target - prev).length() / DRAG_STEP).ceil().max(1.0) as u32;
            for i in 1..=steps {
                path.push(prev.lerp(target, i as f32 / steps as f32));
            }
            prev = target;
        }
        path
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();
        log::info!("Zilch (native) starting...");

        let mut settings = match &args.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => Settings::default(),
        };
        if let Some(n) = args.enemies {
            settings.enemy_count = n;
        }
        if let Some(mode) = &args.containment {
            let Some(mode) = ContainmentMode::from_str(mode) else {
                bail!("unknown containment mode {mode:?} (expected polygon or hit_test)");
            };
            settings.containment = mode;
        }

        let mut game = Game::new(&settings, args.seed, 0.0, LogPresenter::new())?;
        let mut now = 0.0;
        let mut turn = 0;
        let mut path: Vec<Vec2> = Vec::new();
        let mut pause = 0;
        let mut captured = 0;

        for _ in 0..args.frames {
            now += FRAME_MS;
            if game.frame(now) == LoopControl::Stop {
                break;
            }

            // Scripted player: grab, drag one lasso, let go, rest, repeat
            if pause > 0 {
                pause -= 1;
            } else if path.is_empty() {
                let spark = game.level().spark.pos;
                if game.handle_input(DragCommand::Start(spark), now) == InputEffect::Grabbed {
                    // Head back toward the middle so loops stay in the arena
                    let center = Vec2::new(settings.arena_width, settings.arena_height) / 2.0;
                    turn = if (spark - center).length() > LOOP_SIDE { turn + 2 } else { turn + 1 };
                    path = drag_path(spark, turn);
                    path.reverse();
                }
            } else if let Some(target) = path.pop() {
                game.handle_input(DragCommand::Move(target), now);
                if path.is_empty() {
                    game.handle_input(DragCommand::End, now);
                    pause = PAUSE_FRAMES;
                }
            }

            for event in game.drain_events() {
                if let GameEvent::Captured { id } = event {
                    captured += 1;
                    log::info!("Captured sprite {id} at t={now:.0}ms");
                }
            }
            if game.level().hazards_left() == 0 {
                log::info!("Arena cleared");
                break;
            }
        }

        let level = game.level();
        log::info!(
            "Finished: {} frames, {} captured, {} enemies left, spark {}, {} drawables live",
            level.frames,
            captured,
            level.hazards_left(),
            if level.spark.is_alive() { "alive" } else { "destroyed" },
            game.presenter().live()
        );
        if args.dump {
            println!("{}", serde_json::to_string_pretty(level)?);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosted builds drive `zilch::Game` from the page's animation frames
}
