//! Input and application events
//!
//! Events carry a type tag plus key-value arguments, so producers and
//! consumers never depend on argument order. The [`EventQueue`] collects
//! everything to deliver this frame: immediate events in arrival order
//! followed by deferred events that have come due.

use std::collections::HashMap;

use crate::input::{KeyCode, MouseButton};

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// The user or the platform asked the program to close
    Quit,
    /// Keyboard key went down
    KeyPressed,
    /// Keyboard key went up
    KeyReleased,
    /// Mouse cursor moved
    MouseMoved,
    /// Mouse button was pressed
    MouseButtonPressed,
    /// Mouse button was released
    MouseButtonReleased,
    /// Mouse wheel scrolled
    MouseWheel,
    /// Window was resized
    WindowResized,
    /// Window gained focus
    WindowFocused,
    /// Window lost focus
    WindowUnfocused,
    /// Text was entered
    TextInput,
    /// Application-defined event code
    Custom(u32),
}

/// Variant for type-safe event arguments
#[derive(Debug, Clone, PartialEq)]
pub enum EventArg {
    /// Keyboard key
    Key(KeyCode),
    /// Mouse button
    MouseButton(MouseButton),
    /// Position coordinates
    Position(f32, f32),
    /// Scroll offsets
    Scroll(f32, f32),
    /// Width and height
    Size(u32, u32),
    /// Text payload
    Text(String),
    /// Integer payload
    Int(i64),
    /// Floating point payload
    Float(f64),
    /// Boolean payload
    Flag(bool),
}

/// Event with type ID and key-value arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Type of event
    pub event_type: EventType,
    /// Timestamp when event was created (seconds)
    pub timestamp: f64,
    args: HashMap<&'static str, EventArg>,
}

impl Event {
    /// Create a new event with the given type and timestamp
    pub fn new(event_type: EventType, timestamp: f64) -> Self {
        Self {
            event_type,
            timestamp,
            args: HashMap::new(),
        }
    }

    /// Quit request
    pub fn quit() -> Self {
        Self::new(EventType::Quit, 0.0)
    }

    /// Key press
    pub fn key_pressed(key: KeyCode) -> Self {
        Self::new(EventType::KeyPressed, 0.0).with_arg("key", EventArg::Key(key))
    }

    /// Key release
    pub fn key_released(key: KeyCode) -> Self {
        Self::new(EventType::KeyReleased, 0.0).with_arg("key", EventArg::Key(key))
    }

    /// Cursor movement to `(x, y)`
    pub fn mouse_moved(x: f32, y: f32) -> Self {
        Self::new(EventType::MouseMoved, 0.0).with_arg("position", EventArg::Position(x, y))
    }

    /// Mouse button press or release at `(x, y)`
    pub fn mouse_button(button: MouseButton, pressed: bool, x: f32, y: f32) -> Self {
        let event_type = if pressed {
            EventType::MouseButtonPressed
        } else {
            EventType::MouseButtonReleased
        };
        Self::new(event_type, 0.0)
            .with_arg("button", EventArg::MouseButton(button))
            .with_arg("position", EventArg::Position(x, y))
    }

    /// Window resized to `width` x `height`
    pub fn resized(width: u32, height: u32) -> Self {
        Self::new(EventType::WindowResized, 0.0).with_arg("size", EventArg::Size(width, height))
    }

    /// Application-defined event
    pub fn custom(code: u32) -> Self {
        Self::new(EventType::Custom(code), 0.0)
    }

    /// Set the timestamp (builder pattern)
    pub fn at(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Add an argument to the event (builder pattern)
    pub fn with_arg(mut self, key: &'static str, value: EventArg) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&EventArg> {
        self.args.get(key)
    }

    /// Whether this event asks the loop to stop
    pub fn is_quit(&self) -> bool {
        self.event_type == EventType::Quit
    }

    /// Get key argument if present
    pub fn key(&self) -> Option<KeyCode> {
        match self.get_arg("key") {
            Some(EventArg::Key(key)) => Some(*key),
            _ => None,
        }
    }

    /// Get mouse button argument if present
    pub fn mouse_button_arg(&self) -> Option<MouseButton> {
        match self.get_arg("button") {
            Some(EventArg::MouseButton(button)) => Some(*button),
            _ => None,
        }
    }

    /// Get position argument if present
    pub fn position(&self) -> Option<(f32, f32)> {
        match self.get_arg("position") {
            Some(EventArg::Position(x, y)) => Some((*x, *y)),
            _ => None,
        }
    }

    /// Get size argument if present
    pub fn size(&self) -> Option<(u32, u32)> {
        match self.get_arg("size") {
            Some(EventArg::Size(w, h)) => Some((*w, *h)),
            _ => None,
        }
    }

    /// Get text argument if present
    pub fn text(&self) -> Option<&str> {
        match self.get_arg("text") {
            Some(EventArg::Text(text)) => Some(text),
            _ => None,
        }
    }
}

/// Ordered queue of events awaiting dispatch
#[derive(Debug, Default)]
pub struct EventQueue {
    immediate: Vec<Event>,
    deferred: Vec<(f64, Event)>,
    current_time: f64,
}

impl EventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Update current time (seconds since start)
    pub fn update_time(&mut self, time: f64) {
        self.current_time = time;
    }

    /// Queue an event for this frame
    pub fn send(&mut self, event: Event) {
        self.immediate.push(event);
    }

    /// Put undelivered events back ahead of everything queued for the
    /// next drain, keeping their order
    pub fn requeue_front(&mut self, events: impl IntoIterator<Item = Event>) {
        let mut front: Vec<Event> = events.into_iter().collect();
        front.append(&mut self.immediate);
        self.immediate = front;
    }

    /// Queue an event for delivery once `delivery_time` is reached
    pub fn post(&mut self, delivery_time: f64, event: Event) {
        self.deferred.push((delivery_time, event));
    }

    /// Take everything due: immediate events first, then due deferred
    /// events ordered by delivery time.
    pub fn drain(&mut self) -> Vec<Event> {
        let mut due = std::mem::take(&mut self.immediate);

        let now = self.current_time;
        let (mut ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.deferred)
            .into_iter()
            .partition(|(time, _)| *time <= now);
        self.deferred = waiting;
        ready.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.extend(ready.into_iter().map(|(_, event)| event));
        due
    }

    /// Number of immediate events waiting
    pub fn len(&self) -> usize {
        self.immediate.len()
    }

    /// Whether nothing is waiting for this frame
    pub fn is_empty(&self) -> bool {
        self.immediate.is_empty()
    }

    /// Number of deferred events not yet due
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Clear all queued events
    pub fn clear(&mut self) {
        self.immediate.clear();
        self.deferred.clear();
    }
}
