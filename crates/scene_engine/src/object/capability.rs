//! Capability traits
//!
//! An object opts into behaviour by implementing any non-empty subset of
//! [`Drawable`], [`Logical`] and [`Eventful`] and exposing them through the
//! accessors on [`GameObject`](super::GameObject). Membership is probed once
//! when the object enters a collection and cached as [`Capabilities`].
//!
//! Each trait can opt into profiling: while `*_profile` returns true the
//! callback is timed and the measurement handed to `on_*_profile`, even
//! when the callback failed.

use std::fmt;
use std::time::Duration;

use super::{GameObject, ObjectContext, ObjectResult};
use crate::events::Event;
use crate::render::Frame;

/// Something that draws into the frame target every frame
pub trait Drawable {
    /// Append draw commands for this frame
    fn render(&mut self, frame: &mut Frame, ctx: &mut ObjectContext<'_>) -> ObjectResult;

    /// Draw layer; lower values draw first. Re-read once per frame.
    fn z_index(&self) -> i32 {
        0
    }

    /// Skip `render` while this returns false
    fn visible(&self) -> bool {
        true
    }

    /// Time every `render` call
    fn draw_profile(&self) -> bool {
        false
    }

    /// Receives the time spent in `render` when profiled
    fn on_draw_profile(&mut self, elapsed: Duration) {
        let _ = elapsed;
    }
}

/// Something that advances its state with time
pub trait Logical {
    /// Advance by `elapsed` seconds (never negative)
    fn update(&mut self, elapsed: f32, ctx: &mut ObjectContext<'_>) -> ObjectResult;

    /// Update order; lower values update first. Re-read once per frame.
    fn update_priority(&self) -> i32 {
        0
    }

    /// Skip `update` while this returns false
    fn update_enabled(&self) -> bool {
        true
    }

    /// Time every `update` call
    fn update_profile(&self) -> bool {
        false
    }

    /// Receives the time spent in `update` when profiled
    fn on_update_profile(&mut self, elapsed: Duration) {
        let _ = elapsed;
    }
}

/// Something that reacts to input and application events
pub trait Eventful {
    /// React to one event
    fn handle(&mut self, event: &Event, ctx: &mut ObjectContext<'_>) -> ObjectResult;

    /// Skip `handle` entirely while this returns false
    fn event_enabled(&self) -> bool {
        true
    }

    /// Event filter; events rejected here are never handed to `handle`
    fn accepts(&self, event: &Event) -> bool {
        let _ = event;
        true
    }

    /// Time every `handle` call
    fn event_profile(&self) -> bool {
        false
    }

    /// Receives the time spent in `handle` when profiled
    fn on_event_profile(&mut self, elapsed: Duration) {
        let _ = elapsed;
    }
}

/// Run `call`, timing it when `enabled` and adding the time to `total`
pub(crate) fn profiled<T>(enabled: bool, total: &mut Duration, call: impl FnOnce() -> T) -> (T, Option<Duration>) {
    if !enabled {
        return (call(), None);
    }
    let started = std::time::Instant::now();
    let out = call();
    let took = started.elapsed();
    *total += took;
    (out, Some(took))
}

bitflags::bitflags! {
    /// Cached capability set of an object
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Implements [`Drawable`]
        const DRAWABLE = 1;
        /// Implements [`Logical`]
        const LOGICAL = 1 << 1;
        /// Implements [`Eventful`]
        const EVENTFUL = 1 << 2;
    }
}

impl Capabilities {
    /// Ask an object which capabilities it exposes
    pub fn probe(object: &mut dyn GameObject) -> Self {
        let mut caps = Self::empty();
        caps.set(Self::DRAWABLE, object.as_drawable().is_some());
        caps.set(Self::LOGICAL, object.as_logical().is_some());
        caps.set(Self::EVENTFUL, object.as_eventful().is_some());
        caps
    }

    /// Whether `capability` is in the set
    pub fn has(self, capability: Capability) -> bool {
        self.contains(capability.flag())
    }
}

/// A single capability, used to select a dispatch pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Render pass
    Drawable,
    /// Update pass
    Logical,
    /// Event pass
    Eventful,
}

impl Capability {
    /// All capabilities in pass order
    pub const ALL: [Capability; 3] = [Capability::Eventful, Capability::Logical, Capability::Drawable];

    /// Corresponding flag
    pub fn flag(self) -> Capabilities {
        match self {
            Capability::Drawable => Capabilities::DRAWABLE,
            Capability::Logical => Capabilities::LOGICAL,
            Capability::Eventful => Capabilities::EVENTFUL,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Drawable => "drawable",
            Capability::Logical => "logical",
            Capability::Eventful => "eventful",
        };
        f.write_str(name)
    }
}
