//! Bounce demo application
//!
//! Runs a scripted session through the title, play and pause scenes and
//! prints the frames as text. Pass a settings file (TOML or RON) as the first
//! argument, or set `SCENE_ENGINE_SETTINGS`, to override the bundled one.

mod objects;
mod scenes;
mod terminal;

use std::rc::Rc;

use scene_engine::config::ConfigFormat;
use scene_engine::core::SETTINGS_ENV_VAR;
use scene_engine::foundation::time::FrameTime;
use scene_engine::prelude::*;

use crate::terminal::AsciiRenderer;

const BUNDLED_SETTINGS: &str = include_str!("../settings.toml");

/// Print one frame in this many
const PRINT_EVERY: u64 = 30;

/// Application hooks for the demo
struct BounceApp {
    balls: u32,
    elapsed: f64,
}

impl BounceApp {
    fn new(balls: u32) -> Self {
        Self { balls, elapsed: 0.0 }
    }
}

impl Application for BounceApp {
    fn initialize(&mut self, scenes: &mut SceneManager) -> Result<(), AppError> {
        log::info!("Registering scenes...");
        scenes::register_all(scenes, self.balls)?;
        log::info!("Scenes: {:?}", scenes.list_scenes());
        Ok(())
    }

    fn on_event(&mut self, event: &Event, _ctx: &mut LoopContext<'_>) {
        if event.is_quit() {
            log::info!("Quit received after {:.2}s", self.elapsed);
        }
    }

    fn post_update(&mut self, time: &FrameTime, _ctx: &mut LoopContext<'_>) {
        self.elapsed = time.total;
    }

    fn post_draw(&mut self, frame: &mut Frame) {
        let bottom = frame.height() as f32 - 16.0;
        frame.push_at(
            i32::MAX,
            DrawCommand::Text {
                position: Vec2::new(8.0, bottom),
                text: format!("T {:.1}", self.elapsed),
                color: Color::GREEN,
                size: 12.0,
            },
        );
    }

    fn cleanup(&mut self) {
        log::info!("Bounce demo cleaned up");
    }
}

/// Keys a player might press during a short session
fn demo_script() -> ScriptedInput {
    ScriptedInput::new()
        .idle(30)
        .then([Event::key_pressed(KeyCode::Enter)])
        .idle(20)
        .then([Event::key_pressed(KeyCode::Right)])
        .idle(20)
        .then([Event::key_released(KeyCode::Right), Event::key_pressed(KeyCode::Left)])
        .idle(20)
        .then([Event::key_released(KeyCode::Left), Event::key_pressed(KeyCode::P)])
        .idle(30)
        .then([Event::key_pressed(KeyCode::P)])
        .idle(20)
        .then([Event::key_pressed(KeyCode::Escape)])
        .idle(10)
        .then([Event::key_pressed(KeyCode::Q)])
}

fn load_settings() -> Result<EngineSettings, ConfigError> {
    let settings = match std::env::args().nth(1) {
        Some(path) => EngineSettings::load_from_file(path)?,
        None if std::env::var_os(SETTINGS_ENV_VAR).is_some() => EngineSettings::from_env_or_default()?,
        None => EngineSettings::from_str_as(BUNDLED_SETTINGS, ConfigFormat::Toml)?,
    };
    settings.validate()?;
    Ok(settings)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("info");
    let settings = load_settings()?;
    logging::init_from_settings(&settings);
    log::info!("Starting {}", settings.window.title);

    let renderer = AsciiRenderer::new(
        std::io::stdout(),
        settings.window.width,
        settings.window.height,
        PRINT_EVERY,
    );
    let mut game = GameLoop::with_system_clock(settings, demo_script(), renderer)?;
    let declared = game.register_declared_scenes(Rc::new(objects::object_registry()?))?;
    log::info!("{} scene(s) declared in settings", declared);

    let mut app = BounceApp::new(2);
    match game.run(&mut app) {
        Ok(summary) => {
            log::info!(
                "Bounce demo finished: {} frames, {:.1} fps",
                summary.frames,
                summary.average_fps
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Bounce demo failed: {}", e);
            Err(e.into())
        }
    }
}
