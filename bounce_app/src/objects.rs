//! Bounce demo objects

use serde::{Deserialize, Serialize};

use scene_engine::foundation::math::{Rect, Vec2};
use scene_engine::object::{GameObject, ObjectRegistry, RegistryError};
use scene_engine::prelude::*;

/// Playing field in frame pixels
pub const ARENA: Rect = Rect {
    origin: Vec2::new(0.0, 0.0),
    size: Vec2::new(640.0, 384.0),
};

/// Posted by a ball that crossed the bottom edge
pub const BALL_MISSED: u32 = 1;

/// Height of the line the paddle moves on
const PADDLE_Y: f32 = 352.0;

/// A ball bouncing inside the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    position: Vec2,
    velocity: Vec2,
    radius: f32,
    color: Color,
}

impl Ball {
    /// Ball at `position` moving with `velocity` pixels per second
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            radius: 8.0,
            color: Color::YELLOW,
        }
    }

    /// The `n`th ball of a serve: same speed, fanned-out headings
    pub fn launch(n: u32) -> Self {
        let angle = 0.6 + 0.35 * (n % 5) as f32;
        let speed = 240.0;
        Self::new(
            Vec2::new(ARENA.center().x, 48.0),
            Vec2::new(angle.cos() * speed, angle.sin() * speed),
        )
    }

    /// Current position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

impl Logical for Ball {
    fn update(&mut self, elapsed: f32, ctx: &mut ObjectContext<'_>) -> ObjectResult {
        // Sub-step so a long frame cannot tunnel through a wall
        let steps = (elapsed / 0.02).ceil().clamp(1.0, 50.0) as u32;
        let dt = elapsed / steps as f32;
        for _ in 0..steps {
            self.position += self.velocity * dt;

            if self.position.x - self.radius < ARENA.origin.x {
                self.position.x = ARENA.origin.x + self.radius;
                self.velocity.x = self.velocity.x.abs();
            } else if self.position.x + self.radius > ARENA.right() {
                self.position.x = ARENA.right() - self.radius;
                self.velocity.x = -self.velocity.x.abs();
            }

            if self.position.y - self.radius < ARENA.origin.y {
                self.position.y = ARENA.origin.y + self.radius;
                self.velocity.y = self.velocity.y.abs();
            } else if self.position.y + self.radius > ARENA.bottom() {
                self.position.y = ARENA.bottom() - self.radius;
                self.velocity.y = -self.velocity.y.abs();
                ctx.post_event(0.0, Event::custom(BALL_MISSED));
            }
        }
        Ok(())
    }
}

impl Drawable for Ball {
    fn render(&mut self, frame: &mut Frame, _ctx: &mut ObjectContext<'_>) -> ObjectResult {
        frame.circle(self.position, self.radius, self.color);
        Ok(())
    }

    fn z_index(&self) -> i32 {
        2
    }
}

impl GameObject for Ball {
    fn as_drawable(&mut self) -> Option<&mut dyn Drawable> {
        Some(self)
    }

    fn as_logical(&mut self) -> Option<&mut dyn Logical> {
        Some(self)
    }

    fn save_state(&self) -> Result<Option<ObjectState>, SnapshotError> {
        ObjectState::encode(self).map(Some)
    }

    fn load_state(&mut self, state: &ObjectState) -> Result<(), SnapshotError> {
        *self = state.decode()?;
        Ok(())
    }
}

/// Player paddle steered with the arrow keys
#[derive(Debug, Clone)]
pub struct Paddle {
    x: f32,
    width: f32,
    speed: f32,
}

impl Paddle {
    /// Centered paddle
    pub fn new() -> Self {
        Self {
            x: ARENA.center().x,
            width: 96.0,
            speed: 360.0,
        }
    }

    /// Horizontal centre
    pub fn x(&self) -> f32 {
        self.x
    }
}

impl Default for Paddle {
    fn default() -> Self {
        Self::new()
    }
}

impl Logical for Paddle {
    fn update(&mut self, elapsed: f32, ctx: &mut ObjectContext<'_>) -> ObjectResult {
        let direction = ctx.input().axis(KeyCode::Left, KeyCode::Right);
        let half = self.width * 0.5;
        self.x = (self.x + direction * self.speed * elapsed).clamp(ARENA.origin.x + half, ARENA.right() - half);
        Ok(())
    }
}

impl Drawable for Paddle {
    fn render(&mut self, frame: &mut Frame, _ctx: &mut ObjectContext<'_>) -> ObjectResult {
        frame.fill_rect(
            Rect::centered(Vec2::new(self.x, PADDLE_Y), Vec2::new(self.width, 12.0)),
            Color::WHITE,
        );
        Ok(())
    }

    fn z_index(&self) -> i32 {
        1
    }
}

scene_engine::game_object!(Paddle: Logical, Drawable);

/// Miss counter fed by ball events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    missed: u32,
}

impl Score {
    /// Balls that reached the bottom edge
    pub fn missed(&self) -> u32 {
        self.missed
    }
}

impl Eventful for Score {
    fn handle(&mut self, event: &Event, _ctx: &mut ObjectContext<'_>) -> ObjectResult {
        if event.event_type == EventType::Custom(BALL_MISSED) {
            self.missed += 1;
        }
        Ok(())
    }

    fn accepts(&self, event: &Event) -> bool {
        matches!(event.event_type, EventType::Custom(_))
    }
}

impl Drawable for Score {
    fn render(&mut self, frame: &mut Frame, _ctx: &mut ObjectContext<'_>) -> ObjectResult {
        frame.text(Vec2::new(16.0, 8.0), format!("MISSED {}", self.missed), Color::WHITE, 16.0);
        Ok(())
    }

    fn z_index(&self) -> i32 {
        10
    }
}

impl GameObject for Score {
    fn as_drawable(&mut self) -> Option<&mut dyn Drawable> {
        Some(self)
    }

    fn as_eventful(&mut self) -> Option<&mut dyn Eventful> {
        Some(self)
    }

    fn save_state(&self) -> Result<Option<ObjectState>, SnapshotError> {
        ObjectState::encode(self).map(Some)
    }

    fn load_state(&mut self, state: &ObjectState) -> Result<(), SnapshotError> {
        *self = state.decode()?;
        Ok(())
    }
}

/// What a prompt does when its key is pressed
#[derive(Debug, Clone, PartialEq)]
pub enum PromptAction {
    /// Replace the current scene
    SwitchTo(&'static str),
    /// Push a scene on top
    Push(&'static str),
    /// Pop the current scene
    Pop,
    /// Stop the loop
    Quit,
}

/// Blinking line of text bound to keys
#[derive(Debug, Clone)]
pub struct Prompt {
    text: String,
    position: Vec2,
    bindings: Vec<(KeyCode, PromptAction)>,
    blinks: bool,
    blink: f32,
    shown: bool,
}

impl Prompt {
    /// Prompt at `position`
    pub fn new(text: impl Into<String>, position: Vec2) -> Self {
        Self {
            text: text.into(),
            position,
            bindings: Vec::new(),
            blinks: true,
            blink: 0.0,
            shown: true,
        }
    }

    /// Run `action` when `key` is pressed
    pub fn on_key(mut self, key: KeyCode, action: PromptAction) -> Self {
        self.bindings.push((key, action));
        self
    }

    /// Never blink
    pub fn steady(mut self) -> Self {
        self.blinks = false;
        self
    }

    /// Title screen prompt
    pub fn title() -> Self {
        Self::new("PRESS ENTER", Vec2::new(256.0, 200.0))
            .on_key(KeyCode::Enter, PromptAction::SwitchTo("play"))
            .on_key(KeyCode::Q, PromptAction::Quit)
    }

    /// In-game key hint
    pub fn play_hint() -> Self {
        Self::new("P PAUSE  ESC MENU", Vec2::new(456.0, 8.0))
            .steady()
            .on_key(KeyCode::P, PromptAction::Push("pause"))
            .on_key(KeyCode::Escape, PromptAction::SwitchTo("title"))
    }

    /// Pause overlay prompt
    pub fn paused() -> Self {
        Self::new("PAUSED - P TO RESUME, Q TO QUIT", Vec2::new(160.0, 184.0))
            .on_key(KeyCode::P, PromptAction::Pop)
            .on_key(KeyCode::Q, PromptAction::SwitchTo("title"))
    }
}

impl Logical for Prompt {
    fn update(&mut self, elapsed: f32, _ctx: &mut ObjectContext<'_>) -> ObjectResult {
        if !self.blinks {
            return Ok(());
        }
        self.blink += elapsed;
        if self.blink >= 0.5 {
            self.blink %= 0.5;
            self.shown = !self.shown;
        }
        Ok(())
    }
}

impl Eventful for Prompt {
    fn handle(&mut self, event: &Event, ctx: &mut ObjectContext<'_>) -> ObjectResult {
        let Some(key) = event.key() else {
            return Ok(());
        };
        let Some((_, action)) = self.bindings.iter().find(|(bound, _)| *bound == key) else {
            return Ok(());
        };
        log::debug!("{} -> {:?}", ctx.id(), action);
        match action {
            PromptAction::SwitchTo(scene) => ctx.switch_to(*scene),
            PromptAction::Push(scene) => ctx.push(*scene),
            PromptAction::Pop => ctx.pop(),
            PromptAction::Quit => ctx.quit(),
        }
        Ok(())
    }

    fn accepts(&self, event: &Event) -> bool {
        event.event_type == EventType::KeyPressed
    }
}

impl Drawable for Prompt {
    fn render(&mut self, frame: &mut Frame, _ctx: &mut ObjectContext<'_>) -> ObjectResult {
        frame.text(self.position, self.text.clone(), Color::WHITE, 16.0);
        Ok(())
    }

    fn visible(&self) -> bool {
        self.shown
    }

    fn z_index(&self) -> i32 {
        20
    }
}

scene_engine::game_object!(Prompt: Logical, Eventful, Drawable);

/// Object kinds available to scenes declared in settings
pub fn object_registry() -> Result<ObjectRegistry, RegistryError> {
    let mut registry = ObjectRegistry::new();
    let served = std::cell::Cell::new(0);
    registry.register("ball", move || {
        served.set(served.get() + 1);
        Ball::launch(served.get())
    })?;
    registry.register("paddle", Paddle::new)?;
    registry.register("score", Score::default)?;
    registry.register("title_prompt", Prompt::title)?;
    Ok(registry)
}
