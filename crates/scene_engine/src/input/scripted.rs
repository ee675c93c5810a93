//! Deterministic input source for headless runs and tests

use std::collections::VecDeque;

use super::{InputError, InputSource};
use crate::events::Event;

#[derive(Debug)]
enum Step {
    Events(Vec<Event>),
    Fail(String),
}

/// Replays a fixed script, one step per poll
///
/// Each poll consumes one step. Once the script runs out the source either
/// goes quiet or, with [`quit_when_done`](Self::quit_when_done), reports a
/// quit event.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    steps: VecDeque<Step>,
    quit_when_done: bool,
    polls: u64,
}

impl ScriptedInput {
    /// Create an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `events` on the next unscripted poll
    pub fn then(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.steps.push_back(Step::Events(events.into_iter().collect()));
        self
    }

    /// Deliver nothing for `polls` polls
    pub fn idle(mut self, polls: usize) -> Self {
        for _ in 0..polls {
            self.steps.push_back(Step::Events(Vec::new()));
        }
        self
    }

    /// Fail the next unscripted poll
    pub fn then_fail(mut self, reason: impl Into<String>) -> Self {
        self.steps.push_back(Step::Fail(reason.into()));
        self
    }

    /// Report a quit event once the script is exhausted
    pub fn quit_when_done(mut self) -> Self {
        self.quit_when_done = true;
        self
    }

    /// Number of polls served so far
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Steps not yet replayed
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll_events(&mut self) -> Result<Vec<Event>, InputError> {
        self.polls += 1;
        match self.steps.pop_front() {
            Some(Step::Events(events)) => Ok(events),
            Some(Step::Fail(reason)) => Err(InputError::Disconnected(reason)),
            None if self.quit_when_done => Ok(vec![Event::quit()]),
            None => Ok(Vec::new()),
        }
    }
}
