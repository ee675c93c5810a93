//! Logging utilities
//!
//! The engine logs through the `log` facade; applications install a backend
//! once with [`init`], usually before settings are loaded, and re-level it
//! with [`init_from_settings`] afterwards. `RUST_LOG` always wins over the
//! configured level.

pub use log::{debug, error, info, trace, warn};

use log::LevelFilter;

use crate::core::config::EngineSettings;

/// Initialize the logging system with a default level
///
/// Safe to call more than once; later calls only change the level.
pub fn init(default_level: &str) {
    // The backend lets everything through; the global max level does the filtering
    let env = env_logger::Env::default().default_filter_or("trace");
    let result = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
    set_level(default_level);
    if result.is_ok() {
        log::debug!("Logger initialized (default level: {})", default_level);
    }
}

/// Change the level of an initialized logger; ignored while `RUST_LOG` is set
pub fn set_level(level: &str) {
    if std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some() {
        return;
    }
    match level.parse::<LevelFilter>() {
        Ok(filter) => log::set_max_level(filter),
        Err(_) => log::warn!("Unknown log level `{}`, keeping {}", level, log::max_level()),
    }
}

/// Initialize logging from engine settings, or re-level it if already up
pub fn init_from_settings(settings: &EngineSettings) {
    let level = if settings.debug && settings.log_level == "info" {
        "debug"
    } else {
        settings.log_level.as_str()
    };
    init(level);
}
