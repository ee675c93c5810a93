//! Input collaborator interface and input state tracking
//!
//! The loop polls an [`InputSource`] once per frame and forwards the events
//! verbatim. [`InputState`] folds the same stream into "what is held right
//! now" so objects can query it from their context.

pub mod scripted;

use std::collections::HashSet;

use crate::events::{Event, EventType};
use crate::foundation::math::Vec2;

pub use scripted::ScriptedInput;

/// Input source errors
#[derive(thiserror::Error, Debug)]
pub enum InputError {
    /// The device or window went away
    #[error("Input source disconnected: {0}")]
    Disconnected(String),

    /// Backend failure
    #[error("Input backend error: {0}")]
    Backend(String),
}

/// Producer of per-frame input events
pub trait InputSource {
    /// Return every event that arrived since the last poll, in arrival order
    fn poll_events(&mut self) -> Result<Vec<Event>, InputError>;
}

impl<T: InputSource + ?Sized> InputSource for Box<T> {
    fn poll_events(&mut self) -> Result<Vec<Event>, InputError> {
        (**self).poll_events()
    }
}

/// Input source that never produces events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll_events(&mut self) -> Result<Vec<Event>, InputError> {
        Ok(Vec::new())
    }
}

/// Held keys, buttons and pointer position
#[derive(Debug, Clone)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    pointer: Option<Vec2>,
    focused: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    /// Create an empty input state
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            buttons_down: HashSet::new(),
            pointer: None,
            focused: true,
        }
    }

    /// Fold one event into the state
    pub fn apply(&mut self, event: &Event) {
        match event.event_type {
            EventType::KeyPressed => {
                if let Some(key) = event.key() {
                    self.keys_down.insert(key);
                }
            }
            EventType::KeyReleased => {
                if let Some(key) = event.key() {
                    self.keys_down.remove(&key);
                }
            }
            EventType::MouseButtonPressed => {
                if let Some(button) = event.mouse_button_arg() {
                    self.buttons_down.insert(button);
                }
            }
            EventType::MouseButtonReleased => {
                if let Some(button) = event.mouse_button_arg() {
                    self.buttons_down.remove(&button);
                }
            }
            EventType::WindowFocused => self.focused = true,
            EventType::WindowUnfocused => {
                self.focused = false;
                self.keys_down.clear();
                self.buttons_down.clear();
            }
            _ => {}
        }
        if let Some((x, y)) = event.position() {
            self.pointer = Some(Vec2::new(x, y));
        }
    }

    /// Whether `key` is held
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Whether `button` is held
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Last known pointer position
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Whether the window has focus
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// -1, 0 or 1 depending on which of two opposing keys is held
    pub fn axis(&self, negative: KeyCode, positive: KeyCode) -> f32 {
        match (self.is_key_down(negative), self.is_key_down(positive)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// W key
    W,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Tab key
    Tab,
    /// Backspace key
    Backspace,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}
