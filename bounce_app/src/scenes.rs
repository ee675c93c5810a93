//! Bounce demo scenes

use scene_engine::foundation::math::Rect;
use scene_engine::object::{ObjectCollection, RegistryError};
use scene_engine::prelude::*;
use scene_engine::render::DrawCommand;
use scene_engine::scene::ObjectStream;

use crate::objects::{Ball, Paddle, Prompt, Score, ARENA};

/// Attract mode: a few balls behind the start prompt
#[derive(Debug, Default)]
pub struct TitleScene;

impl SceneBehavior for TitleScene {
    fn generate_objects(&mut self) -> ObjectStream<'_> {
        Box::new(
            (1..=3)
                .map(|n| Spawn::anonymous(Ball::launch(n)))
                .chain(std::iter::once(Spawn::named("prompt", Prompt::title()))),
        )
    }

    fn draw_background(&mut self, frame: &mut Frame) {
        frame.push(DrawCommand::Clear(Color::BLACK));
    }
}

/// The game itself
#[derive(Debug)]
pub struct PlayScene {
    balls: u32,
    serves: u32,
    played: f32,
}

impl PlayScene {
    /// Play with `balls` balls in the air
    pub fn new(balls: u32) -> Self {
        Self {
            balls,
            serves: 0,
            played: 0.0,
        }
    }
}

impl SceneBehavior for PlayScene {
    fn generate_objects(&mut self) -> ObjectStream<'_> {
        let first = self.serves * self.balls;
        self.serves += 1;
        let balls = (0..self.balls).map(move |i| Spawn::named(format!("ball-{i}"), Ball::launch(first + i)));
        Box::new(
            [
                Spawn::named("paddle", Paddle::new()),
                Spawn::named("score", Score::default()),
                Spawn::named("hint", Prompt::play_hint()),
            ]
            .into_iter()
            .chain(balls),
        )
    }

    fn on_enter(&mut self, objects: &mut ObjectCollection, first_time: bool) {
        if first_time {
            log::info!("First serve with {} balls", self.balls);
        } else {
            log::info!("Serve {} ({} objects)", self.serves, objects.len());
        }
    }

    fn update(&mut self, elapsed: f32) {
        self.played += elapsed;
    }

    fn on_pause(&mut self) {
        log::debug!("Play paused after {:.1}s", self.played);
    }

    fn on_resume(&mut self) {
        log::debug!("Play resumed");
    }

    fn draw_background(&mut self, frame: &mut Frame) {
        frame.push(DrawCommand::Clear(Color::BLACK));
        frame.push(DrawCommand::Rect {
            rect: ARENA,
            color: Color::BLUE,
            filled: false,
        });
    }
}

/// Overlay pushed over the game
#[derive(Debug, Default)]
pub struct PauseScene;

impl SceneBehavior for PauseScene {
    fn generate_objects(&mut self) -> ObjectStream<'_> {
        Box::new(std::iter::once(Spawn::named("prompt", Prompt::paused())))
    }

    fn draw_background(&mut self, frame: &mut Frame) {
        frame.fill_rect(
            Rect::new(128.0, 160.0, 384.0, 64.0),
            Color::BLACK.with_alpha(192),
        );
    }
}

/// Register the built-in scenes, leaving any name already taken alone
pub fn register_all(scenes: &mut SceneManager, balls: u32) -> Result<(), RegistryError> {
    if !scenes.registry().contains("title") {
        scenes.register("title", || TitleScene)?;
    }
    scenes.register("play", move || PlayScene::new(balls))?;
    scenes.register("pause", || PauseScene)?;
    Ok(())
}
