//! The game loop
//!
//! One frame is, in order:
//!
//! 1. tick the frame clock
//! 2. poll input and drain the event queue
//! 3. event pass over the active scene
//! 4. update pass (once, or once per fixed step)
//! 5. render pass over the stack, then present
//! 6. frame boundary: apply object changes, posted events and scene
//!    transitions, then sleep to the target frame rate
//!
//! A transition requested during a pass cuts the frame short: the outgoing
//! scene receives no further callbacks and nothing is presented. Events the
//! event pass did not reach go back to the front of the queue and are
//! delivered to the incoming scene on the next frame.

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::application::{AppError, Application};
use crate::config::ConfigError;
use crate::core::config::EngineSettings;
use crate::events::{EventQueue, EventType};
use crate::foundation::time::{Clock, FixedStep, FrameClock, FrameTime, SystemClock};
use crate::input::{InputError, InputSource, InputState};
use crate::object::{
    Capability, CapabilityDispatchError, CollectionError, CommandBuffer, FailurePolicy, FrameEnv,
    LoopContext, ObjectRegistry, PassReport,
};
use crate::render::{Frame, RenderError, Renderer};
use crate::scene::{SceneError, SceneManager};

/// Loop-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Scene transition failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// An object callback failed under the fail-fast policy
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] CapabilityDispatchError),

    /// A deferred object change was refused under the fail-fast policy
    #[error("Collection error: {0}")]
    Collection(#[from] CollectionError),

    /// The input source failed
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// The renderer failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Settings were rejected
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Application hook failed
    #[error("Application error: {0}")]
    Application(#[from] AppError),
}

/// Cloneable handle that stops the loop after the current frame
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Request a stop
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether a stop was requested
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// What happened during one frame
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Frame timing
    pub time: FrameTime,
    /// Events delivered to the scene stack
    pub events: usize,
    /// Events handed back to the queue after a transition cut the event pass
    pub carried: usize,
    /// Update steps run
    pub steps: u32,
    /// `handle` calls
    pub handle_calls: usize,
    /// `update` calls
    pub update_calls: usize,
    /// `render` calls
    pub render_calls: usize,
    /// Time in profiled `handle` calls
    pub handle_time: Duration,
    /// Time in profiled `update` calls
    pub update_time: Duration,
    /// Time in profiled `render` calls
    pub render_time: Duration,
    /// Failed callbacks
    pub errors: usize,
    /// First failed callback of the frame
    pub first_error: Option<CapabilityDispatchError>,
    /// Deferred inserts refused at the frame boundary
    pub rejected: Vec<CollectionError>,
    /// Scene transitions applied at the frame boundary
    pub transitions: usize,
    /// Whether a frame was presented
    pub presented: bool,
    /// Whether the loop stops after this frame
    pub stopping: bool,
}

impl FrameReport {
    fn new(time: FrameTime) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    fn record(&mut self, pass: PassReport) {
        match pass.capability {
            Capability::Eventful => {
                self.handle_calls += pass.calls;
                self.handle_time += pass.profiled;
            }
            Capability::Logical => {
                self.update_calls += pass.calls;
                self.update_time += pass.profiled;
            }
            Capability::Drawable => {
                self.render_calls += pass.calls;
                self.render_time += pass.profiled;
            }
        }
        self.errors += pass.errors;
        if self.first_error.is_none() {
            self.first_error = pass.first_error;
        }
    }
}

/// Totals for a whole run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopSummary {
    /// Frames run
    pub frames: u64,
    /// Simulated seconds (clamped deltas)
    pub total_time: f64,
    /// Failed callbacks across all frames
    pub dispatch_errors: usize,
    /// Average frame rate
    pub average_fps: f32,
}

/// Drives scenes with input from `I`, output to `R` and time from `C`
pub struct GameLoop<I, R, C = SystemClock> {
    settings: EngineSettings,
    scenes: SceneManager,
    input: I,
    renderer: R,
    clock: C,
    frame_clock: FrameClock,
    fixed_step: Option<FixedStep>,
    events: EventQueue,
    input_state: InputState,
    frame: Frame,
    /// Front events of the queue the application has already seen
    carried: usize,
    stop: StopHandle,
    started: bool,
    running: bool,
}

impl<I: InputSource, R: Renderer> GameLoop<I, R, SystemClock> {
    /// Create a loop on the wall clock
    pub fn with_system_clock(settings: EngineSettings, input: I, renderer: R) -> Result<Self, EngineError> {
        Self::new(settings, input, renderer, SystemClock::new())
    }
}

impl<I: InputSource, R: Renderer, C: Clock> GameLoop<I, R, C> {
    /// Create a loop; settings are validated here and never re-read
    pub fn new(settings: EngineSettings, input: I, renderer: R, clock: C) -> Result<Self, EngineError> {
        settings.validate()?;
        let timing = &settings.timing;
        let fixed_step = timing
            .fixed_timestep
            .map(|step| FixedStep::new(step, timing.max_steps_per_frame));
        let frame_clock = FrameClock::new().with_max_delta(timing.max_frame_delta);
        let frame = Frame::new(settings.window.width, settings.window.height);
        let scenes = SceneManager::new().with_paused_render(settings.scenes.paused_render);

        Ok(Self {
            settings,
            scenes,
            input,
            renderer,
            clock,
            frame_clock,
            fixed_step,
            events: EventQueue::new(),
            input_state: InputState::new(),
            frame,
            carried: 0,
            stop: StopHandle::default(),
            started: false,
            running: false,
        })
    }

    /// Replace the scene manager (its paused policy is taken from settings)
    pub fn with_scenes(mut self, mut scenes: SceneManager) -> Self {
        scenes.set_paused_render(self.settings.scenes.paused_render);
        self.scenes = scenes;
        self
    }

    /// Register every scene declared in settings
    pub fn register_declared_scenes(&mut self, objects: Rc<ObjectRegistry>) -> Result<usize, EngineError> {
        for decl in &self.settings.scenes.declared {
            self.scenes
                .registry_mut()
                .register_declared(decl.clone(), Rc::clone(&objects))?;
        }
        Ok(self.settings.scenes.declared.len())
    }

    /// Settings the loop was built with
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Scene stack
    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    /// Scene stack, mutably. Changes made here take effect immediately.
    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    /// Renderer collaborator
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Input collaborator
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Clock collaborator
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current input state
    pub fn input_state(&self) -> &InputState {
        &self.input_state
    }

    /// Handle for stopping the loop from elsewhere
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Whether the loop will run another frame
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.frame_clock.frame_count()
    }

    /// Initialize the application and enter the initial scene
    pub fn start<A: Application + ?Sized>(&mut self, app: &mut A) -> Result<(), EngineError> {
        app.initialize(&mut self.scenes)?;
        if self.scenes.is_empty() {
            let initial = self.settings.scenes.initial_scene.clone();
            self.scenes.switch_to_named(&initial)?;
        }
        self.frame_clock.reset(self.clock.now());
        self.stop.reset();
        self.started = true;
        self.running = true;
        log::info!(
            "Loop started in `{}`",
            self.scenes.active().map_or("<none>", |scene| scene.name())
        );
        Ok(())
    }

    /// Run one frame, starting the loop first if needed
    pub fn frame<A: Application + ?Sized>(&mut self, app: &mut A) -> Result<FrameReport, EngineError> {
        if !self.started {
            self.start(app)?;
        }

        let frame_start = self.clock.now();
        let time = self.frame_clock.tick(frame_start);
        let policy = self.settings.dispatch.failure_policy;
        let mut report = FrameReport::new(time);
        let mut commands = CommandBuffer::new();

        for event in self.input.poll_events()? {
            self.events.send(event);
        }
        self.events.update_time(time.total);
        let events = self.events.drain();
        let seen = std::mem::take(&mut self.carried).min(events.len());
        for event in &events[seen..] {
            self.input_state.apply(event);
            match event.event_type {
                EventType::Quit => commands.quit(),
                EventType::WindowResized => {
                    if let Some((width, height)) = event.size() {
                        self.frame.resize(width, height);
                        self.renderer.resize(width, height);
                    }
                }
                _ => {}
            }
            app.on_event(event, &mut LoopContext::new(time, &mut commands));
        }

        self.scenes.begin_frame();
        let env = FrameEnv::new(time, &self.input_state);

        let pass = self.scenes.dispatch_events(&events, env, &mut commands, policy)?;
        report.events = pass.consumed;
        report.carried = events.len().saturating_sub(pass.consumed);
        report.record(pass);
        if report.carried > 0 {
            log::debug!("Carrying {} event(s) over to the next frame", report.carried);
            self.carried = report.carried;
            self.events.requeue_front(events.into_iter().skip(report.events));
        }

        if !commands.has_transition() {
            app.pre_update(&time, &mut LoopContext::new(time, &mut commands));
            let (steps, step) = match self.fixed_step.as_mut() {
                Some(fixed) => (fixed.advance(time.delta), fixed.step()),
                None => (1, time.delta),
            };
            for _ in 0..steps {
                if commands.has_transition() {
                    break;
                }
                let pass = self.scenes.dispatch_update(step, env, &mut commands, policy)?;
                report.steps += 1;
                report.record(pass);
            }
            app.post_update(&time, &mut LoopContext::new(time, &mut commands));
        }

        if !commands.has_transition() {
            self.frame.reset();
            app.pre_draw(&mut self.frame);
            let pass = self.scenes.dispatch_render(&mut self.frame, env, &mut commands, policy)?;
            report.record(pass);
            app.post_draw(&mut self.frame);
            self.renderer.present(&self.frame)?;
            report.presented = true;
        }

        self.end_frame(&mut report, &mut commands, policy)?;
        self.pace(frame_start);
        Ok(report)
    }

    /// Run until stopped
    ///
    /// The active scene is always exited before this returns, on success or
    /// on error.
    pub fn run<A: Application + ?Sized>(&mut self, app: &mut A) -> Result<LoopSummary, EngineError> {
        self.run_until(app, None)
    }

    /// Run at most `frames` frames
    pub fn run_frames<A: Application + ?Sized>(&mut self, app: &mut A, frames: u64) -> Result<LoopSummary, EngineError> {
        self.run_until(app, Some(frames))
    }

    /// Exit every scene and run the application's cleanup
    pub fn shutdown<A: Application + ?Sized>(&mut self, app: &mut A) {
        self.scenes.shutdown();
        app.cleanup();
        self.running = false;
        self.started = false;
        self.events.clear();
        self.carried = 0;
    }

    fn run_until<A: Application + ?Sized>(&mut self, app: &mut A, limit: Option<u64>) -> Result<LoopSummary, EngineError> {
        log::info!("Starting main loop...");
        let result = self.drive(app, limit);
        self.shutdown(app);
        match result {
            Ok(summary) => {
                log::info!(
                    "Loop finished after {} frames ({:.1} fps average)",
                    summary.frames,
                    summary.average_fps
                );
                Ok(summary)
            }
            Err(err) => {
                log::error!("Loop stopped on error: {}", err);
                Err(err)
            }
        }
    }

    fn drive<A: Application + ?Sized>(&mut self, app: &mut A, limit: Option<u64>) -> Result<LoopSummary, EngineError> {
        if !self.started {
            self.start(app)?;
        }
        let mut summary = LoopSummary::default();
        while self.running && limit.map_or(true, |max| summary.frames < max) {
            let report = self.frame(app)?;
            summary.frames += 1;
            summary.dispatch_errors += report.errors;
        }
        summary.total_time = self.frame_clock.last().total;
        summary.average_fps = self.frame_clock.average_fps();
        Ok(summary)
    }

    fn end_frame(
        &mut self,
        report: &mut FrameReport,
        commands: &mut CommandBuffer,
        policy: FailurePolicy,
    ) -> Result<(), EngineError> {
        report.rejected = self.scenes.flush_pending_objects();
        if policy == FailurePolicy::FailFast && !report.rejected.is_empty() {
            return Err(report.rejected.remove(0).into());
        }

        for (delay, event) in commands.take_events() {
            self.events.post(report.time.total + f64::from(delay), event);
        }
        for request in commands.take_transitions() {
            self.scenes.request(request);
        }
        report.transitions = self.scenes.apply_pending()?;

        if let Some(first) = &report.first_error {
            log::error!(
                "Frame {}: {} dispatch error(s), first: {}",
                report.time.frame_index,
                report.errors,
                first
            );
        }

        if commands.quit_requested() || self.stop.is_stopped() {
            log::info!("Stop requested");
            self.running = false;
        } else if self.scenes.is_empty() {
            log::info!("Scene stack is empty, stopping");
            self.running = false;
        }
        report.stopping = !self.running;

        log::trace!(
            "Frame {}: {} events, {} steps, {} transitions, presented: {}",
            report.time.frame_index,
            report.events,
            report.steps,
            report.transitions,
            report.presented
        );
        Ok(())
    }

    fn pace(&mut self, frame_start: Duration) {
        let Some(fps) = self.settings.timing.target_fps else {
            return;
        };
        let budget = Duration::from_secs_f64(1.0 / f64::from(fps));
        let spent = self.clock.now().saturating_sub(frame_start);
        if let Some(remaining) = budget.checked_sub(spent) {
            if !remaining.is_zero() {
                self.clock.sleep(remaining);
            }
        }
    }
}
