//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - 2D math types
//! - Time management (clocks, frame timing, fixed steps)
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
