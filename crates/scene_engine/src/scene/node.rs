//! Scenes: a lifecycle state machine around one object collection

use std::time::Duration;

use super::{
    InvalidTransitionError, LifecycleAction, PausedRenderPolicy, RestoreReport, SceneError,
    SceneSnapshot, SceneStatus,
};
use crate::events::Event;
use crate::object::capability::profiled;
use crate::object::{
    Capability, CapabilityDispatchError, CommandBuffer, FailurePolicy, FlushReport, FrameEnv,
    ObjectCollection, ObjectContext, PassReport, Spawn,
};
use crate::render::Frame;

/// Lazily produced objects of a scene
pub type ObjectStream<'a> = Box<dyn Iterator<Item = Spawn> + 'a>;

/// Scene-specific behaviour
///
/// `generate_objects` is the scene's object declaration. It runs on every
/// enter, never at construction, and must yield a fresh set each time.
pub trait SceneBehavior: 'static {
    /// Produce the scene's initial objects
    fn generate_objects(&mut self) -> ObjectStream<'_>;

    /// Called after the generated objects are live. `first_time` is true
    /// only for the first enter of this scene value.
    fn on_enter(&mut self, objects: &mut ObjectCollection, first_time: bool) {
        let _ = (objects, first_time);
    }

    /// Called before the objects are released
    fn on_exit(&mut self) {}

    /// Called when another scene is pushed on top
    fn on_pause(&mut self) {}

    /// Called when the scene on top is popped
    fn on_resume(&mut self) {}

    /// Scene-wide logic, run before the objects update while `Entered`
    fn update(&mut self, elapsed: f32) {
        let _ = elapsed;
    }

    /// Drawn before any object of this scene
    fn draw_background(&mut self, frame: &mut Frame) {
        let _ = frame;
    }

    /// Drawn after every object of this scene, on the top layer
    fn draw_foreground(&mut self, frame: &mut Frame) {
        let _ = frame;
    }

    /// Per-scene override of the paused render policy
    fn paused_render(&self) -> Option<PausedRenderPolicy> {
        None
    }
}

/// Closures returning a list of spawns are scenes too
impl<F> SceneBehavior for F
where
    F: FnMut() -> Vec<Spawn> + 'static,
{
    fn generate_objects(&mut self) -> ObjectStream<'_> {
        Box::new(self().into_iter())
    }
}

/// Callbacks attached to a scene from outside its behaviour
#[derive(Default)]
struct SceneCallbacks {
    enter: Vec<Box<dyn FnMut()>>,
    exit: Vec<Box<dyn FnMut()>>,
    update: Vec<Box<dyn FnMut(f32)>>,
    draw: Vec<Box<dyn FnMut(&mut Frame)>>,
}

/// A named scene
pub struct Scene {
    name: String,
    behavior: Box<dyn SceneBehavior>,
    callbacks: SceneCallbacks,
    objects: ObjectCollection,
    status: SceneStatus,
    enter_count: u32,
    last_snapshot: Option<SceneSnapshot>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("status", &self.status)
            .field("objects", &self.objects.len())
            .field("enter_count", &self.enter_count)
            .finish()
    }
}

impl Scene {
    /// Create a scene in the `Created` state; no objects are generated yet
    pub fn new(name: impl Into<String>, behavior: impl SceneBehavior) -> Self {
        Self::from_boxed(name, Box::new(behavior))
    }

    /// Create a scene from a boxed behaviour
    pub fn from_boxed(name: impl Into<String>, behavior: Box<dyn SceneBehavior>) -> Self {
        Self {
            name: name.into(),
            behavior,
            callbacks: SceneCallbacks::default(),
            objects: ObjectCollection::new(),
            status: SceneStatus::Created,
            enter_count: 0,
            last_snapshot: None,
        }
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lifecycle status
    pub fn status(&self) -> SceneStatus {
        self.status
    }

    /// Whether the scene owns live objects
    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }

    /// How many times the scene has been entered
    pub fn enter_count(&self) -> u32 {
        self.enter_count
    }

    /// Live objects
    pub fn objects(&self) -> &ObjectCollection {
        &self.objects
    }

    /// Live objects, mutably
    pub fn objects_mut(&mut self) -> &mut ObjectCollection {
        &mut self.objects
    }

    /// Most recent snapshot taken with [`snapshot`](Self::snapshot)
    pub fn last_snapshot(&self) -> Option<&SceneSnapshot> {
        self.last_snapshot.as_ref()
    }

    /// Per-scene paused render override
    pub fn paused_render(&self) -> Option<PausedRenderPolicy> {
        self.behavior.paused_render()
    }

    /// Run `callback` after every enter, once `on_enter` has run
    pub fn add_on_enter(&mut self, callback: impl FnMut() + 'static) {
        self.callbacks.enter.push(Box::new(callback));
    }

    /// Run `callback` on every exit, before the objects are released
    pub fn add_on_exit(&mut self, callback: impl FnMut() + 'static) {
        self.callbacks.exit.push(Box::new(callback));
    }

    /// Run `callback` with the step length before the objects update
    pub fn add_on_update(&mut self, callback: impl FnMut(f32) + 'static) {
        self.callbacks.update.push(Box::new(callback));
    }

    /// Run `callback` after the scene's foreground is drawn
    pub fn add_on_draw(&mut self, callback: impl FnMut(&mut Frame) + 'static) {
        self.callbacks.draw.push(Box::new(callback));
    }

    /// Status that `action` would lead to, or the error it would raise
    pub fn check(&self, action: LifecycleAction) -> Result<SceneStatus, InvalidTransitionError> {
        self.status.after(action).ok_or_else(|| InvalidTransitionError {
            scene: self.name.clone(),
            from: self.status,
            action,
        })
    }

    /// Generate objects and become active
    ///
    /// On failure the scene is left exactly as it was.
    pub fn enter(&mut self) -> Result<(), SceneError> {
        self.check(LifecycleAction::Enter)?;
        let objects = self.materialize()?;
        self.commit_enter(objects);
        Ok(())
    }

    /// Suspend updates and events
    pub fn pause(&mut self) -> Result<(), SceneError> {
        self.status = self.check(LifecycleAction::Pause)?;
        self.behavior.on_pause();
        log::debug!("Paused scene `{}`", self.name);
        Ok(())
    }

    /// Become active again
    pub fn resume(&mut self) -> Result<(), SceneError> {
        self.status = self.check(LifecycleAction::Resume)?;
        self.behavior.on_resume();
        log::debug!("Resumed scene `{}`", self.name);
        Ok(())
    }

    /// Run the exit hook and release every object
    pub fn exit(&mut self) -> Result<(), SceneError> {
        let next = self.check(LifecycleAction::Exit)?;
        self.behavior.on_exit();
        for callback in &mut self.callbacks.exit {
            callback();
        }
        let released = self.objects.len();
        self.objects.clear();
        self.status = next;
        log::info!("Exited scene `{}` ({} objects released)", self.name, released);
        Ok(())
    }

    /// Capture the state of every object that opts in
    pub fn snapshot(&mut self) -> Result<SceneSnapshot, SceneError> {
        self.require_live()?;
        let snapshot = SceneSnapshot::capture(&self.name, &self.objects)?;
        self.last_snapshot = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Replay a snapshot onto the live objects
    pub fn restore(&mut self, snapshot: &SceneSnapshot) -> Result<RestoreReport, SceneError> {
        self.require_live()?;
        Ok(snapshot.apply(&self.name, &mut self.objects)?)
    }

    /// Re-read object ordering keys for the coming frame
    pub fn begin_frame(&mut self) {
        if self.is_live() {
            self.objects.refresh_order();
        }
    }

    /// Apply object changes queued during the frame
    pub fn flush_pending(&mut self) -> FlushReport {
        self.objects.flush_pending()
    }

    /// Deliver `events` to every Eventful object, in collection order
    ///
    /// Does nothing unless the scene is `Entered`. Once a scene transition
    /// has been requested, no further callbacks run in this scene and the
    /// events not yet started are left out of `consumed`.
    pub fn dispatch_events(
        &mut self,
        events: &[Event],
        env: FrameEnv<'_>,
        commands: &mut CommandBuffer,
        policy: FailurePolicy,
    ) -> Result<PassReport, CapabilityDispatchError> {
        let mut report = PassReport::new(Capability::Eventful);
        if self.status != SceneStatus::Entered {
            report.consumed = events.len();
            return Ok(report);
        }

        let name = self.name.as_str();
        let mut spent = Duration::ZERO;
        for event in events {
            if commands.has_transition() {
                break;
            }
            report.consumed += 1;
            let pass = self.objects.dispatch(Capability::Eventful, policy, |id, object| {
                if commands.has_transition() {
                    return Ok(false);
                }
                let Some(eventful) = object.as_eventful() else {
                    return Ok(false);
                };
                if !eventful.event_enabled() || !eventful.accepts(event) {
                    return Ok(false);
                }
                let mut ctx = ObjectContext::new(id, name, env.time, env.input, commands);
                let (result, took) = profiled(eventful.event_profile(), &mut spent, || eventful.handle(event, &mut ctx));
                if let Some(took) = took {
                    eventful.on_event_profile(took);
                }
                result.map(|()| true)
            });
            self.objects.defer_commands(commands.take_object_commands());
            report.merge(pass?);
        }
        report.profiled = spent;
        Ok(report)
    }

    /// Advance the scene and then every Logical object by `elapsed` seconds
    ///
    /// Negative or NaN deltas are treated as zero. Does nothing unless the
    /// scene is `Entered`.
    pub fn dispatch_update(
        &mut self,
        elapsed: f32,
        env: FrameEnv<'_>,
        commands: &mut CommandBuffer,
        policy: FailurePolicy,
    ) -> Result<PassReport, CapabilityDispatchError> {
        if self.status != SceneStatus::Entered {
            return Ok(PassReport::new(Capability::Logical));
        }

        let elapsed = elapsed.max(0.0);
        if commands.has_transition() {
            return Ok(PassReport::new(Capability::Logical));
        }
        self.behavior.update(elapsed);
        for callback in &mut self.callbacks.update {
            callback(elapsed);
        }

        let name = self.name.as_str();
        let mut spent = Duration::ZERO;
        let pass = self.objects.dispatch(Capability::Logical, policy, |id, object| {
            if commands.has_transition() {
                return Ok(false);
            }
            let Some(logical) = object.as_logical() else {
                return Ok(false);
            };
            if !logical.update_enabled() {
                return Ok(false);
            }
            let mut ctx = ObjectContext::new(id, name, env.time, env.input, commands);
            let (result, took) = profiled(logical.update_profile(), &mut spent, || logical.update(elapsed, &mut ctx));
            if let Some(took) = took {
                logical.on_update_profile(took);
            }
            result.map(|()| true)
        });
        self.objects.defer_commands(commands.take_object_commands());
        let mut pass = pass?;
        pass.profiled = spent;
        Ok(pass)
    }

    /// Let every visible Drawable object draw into `frame`, lowest layer first
    ///
    /// Runs for `Entered` and `Paused` scenes; whether a paused scene is
    /// asked to draw at all is the manager's decision.
    pub fn dispatch_render(
        &mut self,
        frame: &mut Frame,
        env: FrameEnv<'_>,
        commands: &mut CommandBuffer,
        policy: FailurePolicy,
    ) -> Result<PassReport, CapabilityDispatchError> {
        if !self.is_live() {
            return Ok(PassReport::new(Capability::Drawable));
        }

        frame.set_layer(i32::MIN);
        self.behavior.draw_background(frame);

        let name = self.name.as_str();
        let mut spent = Duration::ZERO;
        let pass = self.objects.dispatch(Capability::Drawable, policy, |id, object| {
            if commands.has_transition() {
                return Ok(false);
            }
            let Some(drawable) = object.as_drawable() else {
                return Ok(false);
            };
            if !drawable.visible() {
                return Ok(false);
            }
            frame.set_layer(drawable.z_index());
            let mut ctx = ObjectContext::new(id, name, env.time, env.input, commands);
            let (result, took) = profiled(drawable.draw_profile(), &mut spent, || drawable.render(frame, &mut ctx));
            if let Some(took) = took {
                drawable.on_draw_profile(took);
            }
            result.map(|()| true)
        });
        self.objects.defer_commands(commands.take_object_commands());
        frame.set_layer(0);
        let mut pass = pass?;
        pass.profiled = spent;

        if !commands.has_transition() {
            frame.set_layer(i32::MAX);
            self.behavior.draw_foreground(frame);
            for callback in &mut self.callbacks.draw {
                callback(&mut *frame);
            }
        }
        frame.set_layer(0);
        Ok(pass)
    }

    /// Pull the generator into a fresh collection without touching state
    pub(crate) fn materialize(&mut self) -> Result<ObjectCollection, SceneError> {
        let mut objects = ObjectCollection::new();
        let count = objects.extend(self.behavior.generate_objects())?;
        log::debug!("Generated {} objects for `{}`", count, self.name);
        Ok(objects)
    }

    /// Install a materialized collection and become `Entered`
    pub(crate) fn commit_enter(&mut self, objects: ObjectCollection) {
        self.objects = objects;
        self.status = SceneStatus::Entered;
        let first_time = self.enter_count == 0;
        self.enter_count += 1;
        self.behavior.on_enter(&mut self.objects, first_time);
        for callback in &mut self.callbacks.enter {
            callback();
        }
        log::info!("Entered scene `{}` ({} objects)", self.name, self.objects.len());
    }

    fn require_live(&self) -> Result<(), SceneError> {
        if self.is_live() {
            Ok(())
        } else {
            Err(SceneError::NotLive {
                scene: self.name.clone(),
                status: self.status,
            })
        }
    }
}
