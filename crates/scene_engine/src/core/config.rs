//! # Engine Settings
//!
//! Everything the runtime reads once at startup: window parameters, frame
//! timing, the initial scene and dispatch policy. Settings are plain serde
//! types, so a partial TOML or RON file fills the rest from defaults.
//!
//! ```toml
//! log_level = "info"
//!
//! [window]
//! title = "Bounce"
//! width = 640
//! height = 360
//!
//! [timing]
//! target_fps = 60
//! fixed_timestep = 0.01
//!
//! [scenes]
//! initial_scene = "title"
//! paused_render = "render"
//! ```

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};
use crate::object::FailurePolicy;
use crate::scene::{PausedRenderPolicy, SceneDecl};

/// Environment variable naming the settings file to load
pub const SETTINGS_ENV_VAR: &str = "SCENE_ENGINE_SETTINGS";

/// Window parameters handed to the renderer collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Window title
    pub title: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Whether the window may be resized
    pub resizable: bool,
    /// Start in fullscreen
    pub fullscreen: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Scene Engine".to_string(),
            width: 640,
            height: 480,
            resizable: true,
            fullscreen: false,
        }
    }
}

/// Frame timing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Frame-rate cap; `None` runs uncapped
    pub target_fps: Option<u32>,
    /// Run logic in fixed steps of this many seconds instead of once per frame
    pub fixed_timestep: Option<f32>,
    /// Upper bound on fixed steps per frame before backlog is dropped
    pub max_steps_per_frame: u32,
    /// Clamp measured frame deltas to this many seconds
    pub max_frame_delta: Option<f32>,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            target_fps: Some(60),
            fixed_timestep: None,
            max_steps_per_frame: 5,
            max_frame_delta: Some(0.25),
        }
    }
}

/// Scene selection and stacking behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Registered name of the scene entered at startup
    pub initial_scene: String,
    /// Whether paused scenes beneath the top keep drawing
    pub paused_render: PausedRenderPolicy,
    /// Data-driven scenes built from registered object kinds
    pub declared: Vec<SceneDecl>,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            initial_scene: "main".to_string(),
            paused_render: PausedRenderPolicy::default(),
            declared: Vec::new(),
        }
    }
}

/// How capability dispatch reacts to object failures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Keep going and report, or abort the frame
    pub failure_policy: FailurePolicy,
}

/// # Engine Settings
///
/// Root settings document. Read once when the loop is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// Enable debug behaviour (verbose logging, per-frame reports)
    pub debug: bool,
    /// Window parameters
    pub window: WindowSettings,
    /// Frame timing
    pub timing: TimingSettings,
    /// Scene selection
    pub scenes: SceneSettings,
    /// Dispatch failure handling
    pub dispatch: DispatchSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            debug: false,
            window: WindowSettings::default(),
            timing: TimingSettings::default(),
            scenes: SceneSettings::default(),
            dispatch: DispatchSettings::default(),
        }
    }
}

impl Config for EngineSettings {}

impl EngineSettings {
    /// Load from the file named by [`SETTINGS_ENV_VAR`], or defaults when unset
    pub fn from_env_or_default() -> Result<Self, ConfigError> {
        match std::env::var_os(SETTINGS_ENV_VAR) {
            Some(path) => {
                log::info!("Loading settings from {}", path.to_string_lossy());
                let settings = Self::load_from_file(path)?;
                settings.validate()?;
                Ok(settings)
            }
            None => Ok(Self::default()),
        }
    }

    /// Set the window title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    /// Set the window size
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    /// Set the frame-rate cap
    pub fn with_target_fps(mut self, fps: Option<u32>) -> Self {
        self.timing.target_fps = fps;
        self
    }

    /// Switch logic to fixed steps
    pub fn with_fixed_timestep(mut self, step: Option<f32>) -> Self {
        self.timing.fixed_timestep = step;
        self
    }

    /// Set the scene entered at startup
    pub fn with_initial_scene(mut self, name: impl Into<String>) -> Self {
        self.scenes.initial_scene = name.into();
        self
    }

    /// Set the paused-scene render policy
    pub fn with_paused_render(mut self, policy: PausedRenderPolicy) -> Self {
        self.scenes.paused_render = policy;
        self
    }

    /// Set the dispatch failure policy
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.dispatch.failure_policy = policy;
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".to_string()));
        }
        if self.timing.target_fps == Some(0) {
            return Err(ConfigError::Invalid("target_fps must be at least 1".to_string()));
        }
        if let Some(step) = self.timing.fixed_timestep {
            if !(step > 0.0 && step.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "fixed_timestep must be positive, got {step}"
                )));
            }
        }
        if let Some(max) = self.timing.max_frame_delta {
            if !(max > 0.0 && max.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "max_frame_delta must be positive, got {max}"
                )));
            }
        }
        if self.timing.max_steps_per_frame == 0 {
            return Err(ConfigError::Invalid(
                "max_steps_per_frame must be at least 1".to_string(),
            ));
        }
        if self.scenes.initial_scene.trim().is_empty() {
            return Err(ConfigError::Invalid("initial_scene cannot be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = EngineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.timing.target_fps, Some(60));
        assert_eq!(settings.scenes.paused_render, PausedRenderPolicy::Render);
        assert_eq!(settings.dispatch.failure_policy, FailurePolicy::Continue);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let text = r#"
            debug = true

            [window]
            title = "Partial"

            [scenes]
            initial_scene = "title"
            paused_render = "skip"
        "#;
        let settings = EngineSettings::from_str_as(text, ConfigFormat::Toml).unwrap();

        assert!(settings.debug);
        assert_eq!(settings.window.title, "Partial");
        assert_eq!(settings.window.width, 640);
        assert_eq!(settings.scenes.initial_scene, "title");
        assert_eq!(settings.scenes.paused_render, PausedRenderPolicy::Skip);
        assert_eq!(settings.timing, TimingSettings::default());
    }

    #[test]
    fn test_declared_scenes_parse() {
        let text = r#"
            [[scenes.declared]]
            name = "arena"
            objects = [{ kind = "ball", id = "ball-1" }, { kind = "ball" }]
        "#;
        let settings = EngineSettings::from_str_as(text, ConfigFormat::Toml).unwrap();

        let decl = &settings.scenes.declared[0];
        assert_eq!(decl.name, "arena");
        assert_eq!(decl.objects.len(), 2);
        assert_eq!(decl.objects[0].id.as_deref(), Some("ball-1"));
        assert!(decl.objects[1].id.is_none());
    }

    #[test]
    fn test_builder_methods() {
        let settings = EngineSettings::default()
            .with_title("Built")
            .with_window_size(320, 200)
            .with_target_fps(None)
            .with_fixed_timestep(Some(0.02))
            .with_initial_scene("menu")
            .with_failure_policy(FailurePolicy::FailFast);

        assert_eq!(settings.window.width, 320);
        assert_eq!(settings.timing.target_fps, None);
        assert_eq!(settings.timing.fixed_timestep, Some(0.02));
        assert_eq!(settings.scenes.initial_scene, "menu");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let zero_size = EngineSettings::default().with_window_size(0, 10);
        assert!(matches!(zero_size.validate(), Err(ConfigError::Invalid(_))));

        let bad_step = EngineSettings::default().with_fixed_timestep(Some(0.0));
        assert!(bad_step.validate().is_err());

        let no_scene = EngineSettings::default().with_initial_scene("  ");
        assert!(no_scene.validate().is_err());

        let zero_fps = EngineSettings::default().with_target_fps(Some(0));
        assert!(zero_fps.validate().is_err());
    }

    #[test]
    fn test_round_trip_through_ron_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        let settings = EngineSettings::default().with_title("Saved").with_debug(true);

        settings.save_to_file(&path).unwrap();
        assert_eq!(EngineSettings::load_from_file(&path).unwrap(), settings);
    }
}
