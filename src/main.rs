//! Grid Breakout entry point
//!
//! Runs a headless attract-mode session: the paddle follows the ball, cues go
//! to a logging audio sink and the last frame is printed as text.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{Duration, Instant};

    use glam::Vec2;

    use grid_breakout::Settings;
    use grid_breakout::audio::{AudioManager, LogSink};
    use grid_breakout::renderer::{TextRenderer, Viewport, draw_frame};
    use grid_breakout::sim::{GamePhase, GameSession, LevelError, TickInput, tick};

    /// Optional preferences file in the working directory
    const SETTINGS_PATH: &str = "settings.json";
    /// Simulated length of the demo
    const DEMO_SECONDS: u64 = 60;

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        input: TickInput,
        audio: AudioManager,
        sink: LogSink,
        renderer: TextRenderer,
        screen: Vec2,
        viewport: Viewport,
        fitted_level: usize,
        last_phase: GamePhase,
    }

    impl Game {
        fn new(settings: &Settings) -> Result<Self, LevelError> {
            let session = GameSession::from_entropy()?;
            let screen = Vec2::new(settings.screen_width, settings.screen_height);
            let mut game = Self {
                last_phase: session.phase,
                fitted_level: session.level_index,
                viewport: Viewport::fit(screen, session.level.rows(), session.level.columns()),
                screen,
                session,
                input: TickInput {
                    autopilot: true,
                    ..Default::default()
                },
                audio: AudioManager::from_settings(settings),
                sink: LogSink::default(),
                renderer: TextRenderer::new(),
            };
            game.refit_viewport();
            Ok(game)
        }

        /// Grid metrics depend on the level's size
        fn refit_viewport(&mut self) {
            let level = &self.session.level;
            self.viewport = Viewport::fit(self.screen, level.rows(), level.columns());
            self.fitted_level = self.session.level_index;
            log::info!(
                "Viewport for level {}: cell {:.1}px, origin {:?}, text scale {:.2}",
                self.fitted_level + 1,
                self.viewport.cell_size,
                self.viewport.offset,
                self.viewport.text_scale
            );
        }

        /// One rendered frame: exactly one simulation tick
        fn frame(&mut self) {
            tick(&mut self.session, &self.input);

            // Clear one-shot inputs after processing
            self.input.confirm = false;
            self.input.pause = false;

            let cues = self.session.drain_cues();
            self.audio.play_cues(&cues, &mut self.sink);

            if self.session.level_index != self.fitted_level {
                self.refit_viewport();
            }

            let phase = self.session.phase;
            if phase != self.last_phase {
                log::info!("{:?} -> {:?}", self.last_phase, phase);
                self.last_phase = phase;
            }

            // Attract mode never waits on a screen
            if matches!(
                phase,
                GamePhase::Menu | GamePhase::GameOver | GamePhase::Victory
            ) {
                self.input.confirm = true;
            }
        }

        fn render(&mut self) -> String {
            draw_frame(&self.session, &mut self.renderer);
            self.renderer.finish()
        }
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();
        log::info!("Grid Breakout (headless) starting...");

        let settings = Settings::load_from(SETTINGS_PATH);
        let mut game = match Game::new(&settings) {
            Ok(game) => game,
            Err(err) => {
                log::error!("Failed to load levels: {err}");
                std::process::exit(1);
            }
        };
        game.audio.start_music(&mut game.sink);

        // Cap the loop at the target frame rate
        let frame_time = Duration::from_secs_f32(settings.frame_time());
        let frames = DEMO_SECONDS * u64::from(settings.target_fps);
        for _ in 0..frames {
            let started = Instant::now();
            game.frame();
            if let Some(rest) = frame_time.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }

        println!("{}", game.render());
        log::info!(
            "Ran {} frames ({}s at {} fps), {} sounds played, {} powerups caught",
            frames,
            DEMO_SECONDS,
            settings.target_fps,
            game.sink.played.len(),
            game.session.powerups_collected
        );
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No web frontend; the library is the product on this target
}
