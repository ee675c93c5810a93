//! # Scene Engine
//!
//! A frame-synchronous runtime for 2D interactive programs: a stack of
//! scenes, each owning a collection of objects, driven by a single-threaded
//! game loop.
//!
//! ## Features
//!
//! - **Capabilities**: objects opt into drawing, updating and event handling
//! - **Scene stack**: switch, push and pop with enter/pause/resume/exit hooks
//! - **Deferred changes**: spawns, despawns and transitions queued from
//!   callbacks land at the frame boundary
//! - **Snapshots**: per-object state captured from a live scene, saved to
//!   RON and restored onto the same scene on request
//! - **Headless**: scripted input, recording renderer and a manual clock
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scene_engine::prelude::*;
//!
//! struct Blinker { on: bool }
//!
//! impl Logical for Blinker {
//!     fn update(&mut self, _elapsed: f32, _ctx: &mut ObjectContext<'_>) -> ObjectResult {
//!         self.on = !self.on;
//!         Ok(())
//!     }
//! }
//!
//! game_object!(Blinker: Logical);
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = EngineSettings::from_env_or_default()?;
//!     logging::init_from_settings(&settings);
//!
//!     let mut game = GameLoop::with_system_clock(settings, NoInput, RecordingRenderer::new())?;
//!     game.scenes_mut().register("main", || || vec![Spawn::named("blinker", Blinker { on: false })])?;
//!     game.run_frames(&mut (), 600)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod core;
pub mod events;
pub mod foundation;
pub mod input;
pub mod object;
pub mod render;
pub mod scene;

mod application;
mod engine;

#[cfg(test)]
mod tests;

pub use application::{AppError, Application};
pub use engine::{EngineError, FrameReport, GameLoop, LoopSummary, StopHandle};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::EngineSettings,
        events::{Event, EventArg, EventType},
        foundation::{
            logging,
            math::{Rect, Vec2},
            time::{Clock, FrameTime, ManualClock, SystemClock},
        },
        game_object,
        input::{InputSource, InputState, KeyCode, MouseButton, NoInput, ScriptedInput},
        object::{
            Capability, Drawable, Eventful, GameObject, Logical, LoopContext, ObjectContext,
            ObjectError, ObjectId, ObjectRegistry, ObjectResult, Spawn,
        },
        render::{Color, DrawCommand, Frame, RecordingRenderer, Renderer},
        scene::{
            ObjectState, PausedRenderPolicy, Scene, SceneBehavior, SceneError, SceneManager,
            SceneSnapshot, SnapshotError,
        },
        AppError, Application, EngineError, GameLoop,
    };
}
