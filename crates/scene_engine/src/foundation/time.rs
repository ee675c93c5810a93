//! Time management utilities
//!
//! The loop never reads the OS clock directly; it asks a [`Clock`] for a
//! monotonic timestamp so tests can drive time by hand with [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source used by the game loop
pub trait Clock {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;

    /// Block for `duration`. Used for frame pacing only.
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    /// Create a clock whose origin is now
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for deterministic runs
///
/// Clones share the same timeline, so a test can keep a handle while the
/// loop owns another. Sleeping advances time instead of blocking.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Move time forward by fractional seconds
    pub fn advance_secs(&self, secs: f32) {
        self.advance(Duration::from_secs_f32(secs.max(0.0)));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
    }
}

/// Timing information for a single frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the previous frame, after clamping
    pub delta: f32,
    /// Seconds since the previous frame as measured
    pub raw_delta: f32,
    /// Seconds accumulated over all frames (clamped deltas)
    pub total: f64,
    /// Zero-based index of this frame
    pub frame_index: u64,
}

/// Per-frame timer fed from a [`Clock`]
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_tick: Option<Duration>,
    max_delta: Option<f32>,
    total: f64,
    frame_count: u64,
    last: FrameTime,
}

impl FrameClock {
    /// Create a frame clock without a delta clamp
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp every measured delta to at most `max_delta` seconds
    pub fn with_max_delta(mut self, max_delta: Option<f32>) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Set the reference point the next delta is measured from
    pub fn reset(&mut self, now: Duration) {
        self.last_tick = Some(now);
    }

    /// Advance one frame. The first tick without a prior [`reset`](Self::reset)
    /// yields a zero delta.
    pub fn tick(&mut self, now: Duration) -> FrameTime {
        let raw_delta = self
            .last_tick
            .map_or(0.0, |last| now.saturating_sub(last).as_secs_f32());
        let delta = match self.max_delta {
            Some(max) if raw_delta > max => max,
            _ => raw_delta,
        };
        self.last_tick = Some(now);
        self.total += f64::from(delta);

        self.last = FrameTime {
            delta,
            raw_delta,
            total: self.total,
            frame_index: self.frame_count,
        };
        self.frame_count += 1;
        self.last
    }

    /// Timing of the most recent tick
    pub fn last(&self) -> FrameTime {
        self.last
    }

    /// Number of ticks so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since the first tick
    pub fn average_fps(&self) -> f32 {
        if self.total > 0.0 {
            (self.frame_count as f64 / self.total) as f32
        } else {
            0.0
        }
    }

    /// Get the current FPS (based on last frame time)
    pub fn current_fps(&self) -> f32 {
        if self.last.delta > 0.0 {
            1.0 / self.last.delta
        } else {
            0.0
        }
    }
}

/// Fixed-step accumulator
///
/// Converts variable frame deltas into a whole number of equal logic steps.
/// When more than `max_steps` steps are owed in one frame the backlog is
/// dropped so a long stall cannot spiral.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    max_steps: u32,
    accumulator: f32,
    dropped: f32,
}

impl FixedStep {
    /// Create an accumulator with the given step length in seconds
    pub fn new(step: f32, max_steps: u32) -> Self {
        Self {
            step,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
            dropped: 0.0,
        }
    }

    /// Step length in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed a frame delta and return how many steps to run this frame
    pub fn advance(&mut self, delta: f32) -> u32 {
        self.accumulator += delta.max(0.0);
        let owed = (self.accumulator / self.step).floor() as u32;
        if owed > self.max_steps {
            let dropped = self.accumulator - self.max_steps as f32 * self.step;
            log::warn!(
                "Fixed step fell behind by {:.3}s, dropping {} steps",
                dropped,
                owed - self.max_steps
            );
            self.dropped += dropped;
            self.accumulator = 0.0;
            return self.max_steps;
        }
        self.accumulator -= owed as f32 * self.step;
        owed
    }

    /// Time carried over to the next frame
    pub fn remainder(&self) -> f32 {
        self.accumulator
    }

    /// Total time discarded by the catch-up guard
    pub fn dropped(&self) -> f32 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_tick_has_zero_delta() {
        let mut clock = FrameClock::new();
        let time = clock.tick(Duration::from_millis(500));
        assert_eq!(time.delta, 0.0);
        assert_eq!(time.frame_index, 0);
    }

    #[test]
    fn test_tick_measures_since_previous() {
        let mut clock = FrameClock::new();
        clock.reset(Duration::ZERO);
        let first = clock.tick(Duration::from_millis(16));
        let second = clock.tick(Duration::from_millis(48));

        assert_relative_eq!(first.delta, 0.016, epsilon = 1e-6);
        assert_relative_eq!(second.delta, 0.032, epsilon = 1e-6);
        assert_relative_eq!(second.total, 0.048, epsilon = 1e-6);
        assert_eq!(second.frame_index, 1);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_max_delta_clamps_stalls() {
        let mut clock = FrameClock::new().with_max_delta(Some(0.25));
        clock.reset(Duration::ZERO);
        let time = clock.tick(Duration::from_secs(10));

        assert_relative_eq!(time.delta, 0.25);
        assert_relative_eq!(time.raw_delta, 10.0);
    }

    #[test]
    fn test_manual_clock_shares_timeline() {
        let clock = ManualClock::new();
        let mut owned = clock.clone();
        clock.advance(Duration::from_millis(10));
        owned.sleep(Duration::from_millis(5));

        assert_eq!(clock.now(), Duration::from_millis(15));
        assert_eq!(owned.now(), Duration::from_millis(15));
    }

    #[test]
    fn test_fixed_step_carries_remainder() {
        let mut fixed = FixedStep::new(0.01, 8);
        assert_eq!(fixed.advance(0.025), 2);
        assert_relative_eq!(fixed.remainder(), 0.005, epsilon = 1e-5);
        assert_eq!(fixed.advance(0.006), 1);
    }

    #[test]
    fn test_fixed_step_drops_backlog() {
        let mut fixed = FixedStep::new(0.01, 4);
        assert_eq!(fixed.advance(1.0), 4);
        assert_eq!(fixed.remainder(), 0.0);
        assert!(fixed.dropped() > 0.9);
    }

    #[test]
    fn test_fixed_step_zero_delta() {
        let mut fixed = FixedStep::new(0.01, 4);
        assert_eq!(fixed.advance(0.0), 0);
    }
}
