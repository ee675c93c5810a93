//! Application trait and lifecycle hooks

use thiserror::Error;

use crate::events::Event;
use crate::foundation::time::FrameTime;
use crate::object::{LoopContext, RegistryError};
use crate::render::Frame;
use crate::scene::{SceneError, SceneManager};

/// Application lifecycle trait
///
/// Every hook has a default, so an application only overrides what it needs.
/// Scenes and objects do the real work; these hooks wrap each frame.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once before the first frame. Register scenes here; if nothing
    /// is entered by the time this returns, the loop enters the configured
    /// initial scene.
    fn initialize(&mut self, scenes: &mut SceneManager) -> Result<(), AppError> {
        let _ = scenes;
        Ok(())
    }

    /// Called for every event before the active scene sees it
    fn on_event(&mut self, event: &Event, ctx: &mut LoopContext<'_>) {
        let _ = (event, ctx);
    }

    /// Called before the update pass
    fn pre_update(&mut self, time: &FrameTime, ctx: &mut LoopContext<'_>) {
        let _ = (time, ctx);
    }

    /// Called after the update pass
    fn post_update(&mut self, time: &FrameTime, ctx: &mut LoopContext<'_>) {
        let _ = (time, ctx);
    }

    /// Called before any scene draws
    fn pre_draw(&mut self, frame: &mut Frame) {
        let _ = frame;
    }

    /// Called after every scene has drawn, before present
    fn post_draw(&mut self, frame: &mut Frame) {
        let _ = frame;
    }

    /// Cleanup the application
    ///
    /// Called once after the loop stops, whether it stopped normally or on an
    /// error. Scenes have already been exited.
    fn cleanup(&mut self) {}
}

/// Application without hooks
impl Application for () {}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Scene setup failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Scene or object registration failed
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}
