//! Core engine settings
//!
//! Loaded once at startup; see [`config::EngineSettings`].

pub mod config;

pub use config::{
    DispatchSettings, EngineSettings, SceneSettings, TimingSettings, WindowSettings,
    SETTINGS_ENV_VAR,
};
