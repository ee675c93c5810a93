//! Callback context and the per-frame command buffer
//!
//! Callbacks never mutate the collection or the scene stack directly. They
//! queue commands here; the loop applies object commands after the pass and
//! scene transitions at the frame boundary.

use super::{GameObject, ObjectId, Spawn};
use crate::events::Event;
use crate::foundation::time::FrameTime;
use crate::input::InputState;
use crate::scene::{Scene, SceneTarget, TransitionRequest};

/// Deferred change to a scene's object collection
pub enum ObjectCommand {
    /// Insert a new object
    Spawn(Spawn),
    /// Remove an object by identity
    Despawn(ObjectId),
}

impl std::fmt::Debug for ObjectCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectCommand::Spawn(spawn) => f.debug_tuple("Spawn").field(&spawn.id()).finish(),
            ObjectCommand::Despawn(id) => f.debug_tuple("Despawn").field(id).finish(),
        }
    }
}

/// Commands queued during one frame
#[derive(Debug, Default)]
pub struct CommandBuffer {
    objects: Vec<ObjectCommand>,
    transitions: Vec<TransitionRequest>,
    events: Vec<(f32, Event)>,
    quit: bool,
}

impl CommandBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an object insertion
    pub fn spawn(&mut self, spawn: Spawn) {
        self.objects.push(ObjectCommand::Spawn(spawn));
    }

    /// Queue an object removal
    pub fn despawn(&mut self, id: ObjectId) {
        self.objects.push(ObjectCommand::Despawn(id));
    }

    /// Queue a scene transition
    pub fn request(&mut self, request: TransitionRequest) {
        self.transitions.push(request);
    }

    /// Queue an event for delivery `delay` seconds from now
    pub fn post_event(&mut self, delay: f32, event: Event) {
        self.events.push((delay.max(0.0), event));
    }

    /// Ask the loop to stop after this frame
    pub fn quit(&mut self) {
        self.quit = true;
    }

    /// Whether a transition has been requested this frame
    pub fn has_transition(&self) -> bool {
        !self.transitions.is_empty()
    }

    /// Whether a stop has been requested
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Number of queued object commands
    pub fn pending_objects(&self) -> usize {
        self.objects.len()
    }

    /// Take queued object commands
    pub fn take_object_commands(&mut self) -> Vec<ObjectCommand> {
        std::mem::take(&mut self.objects)
    }

    /// Take queued transitions in request order
    pub fn take_transitions(&mut self) -> Vec<TransitionRequest> {
        std::mem::take(&mut self.transitions)
    }

    /// Take posted events with their delays
    pub fn take_events(&mut self) -> Vec<(f32, Event)> {
        std::mem::take(&mut self.events)
    }

    /// Whether nothing at all has been queued
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.transitions.is_empty() && self.events.is_empty() && !self.quit
    }
}

/// Per-frame data shared by every callback of a pass
#[derive(Debug, Clone, Copy)]
pub struct FrameEnv<'a> {
    /// Timing of the current frame
    pub time: FrameTime,
    /// Held keys, buttons and pointer
    pub input: &'a InputState,
}

impl<'a> FrameEnv<'a> {
    /// Bundle frame timing and input state
    pub fn new(time: FrameTime, input: &'a InputState) -> Self {
        Self { time, input }
    }
}

/// What an object sees while one of its callbacks runs
pub struct ObjectContext<'a> {
    id: &'a ObjectId,
    scene: &'a str,
    time: FrameTime,
    input: &'a InputState,
    commands: &'a mut CommandBuffer,
}

impl<'a> ObjectContext<'a> {
    /// Build a context for the object `id` running in `scene`
    pub fn new(
        id: &'a ObjectId,
        scene: &'a str,
        time: FrameTime,
        input: &'a InputState,
        commands: &'a mut CommandBuffer,
    ) -> Self {
        Self {
            id,
            scene,
            time,
            input,
            commands,
        }
    }

    /// Identity of the object being called
    pub fn id(&self) -> &ObjectId {
        self.id
    }

    /// Name of the scene the object lives in
    pub fn scene_name(&self) -> &str {
        self.scene
    }

    /// Timing of the current frame
    pub fn time(&self) -> FrameTime {
        self.time
    }

    /// Held keys, buttons and pointer
    pub fn input(&self) -> &InputState {
        self.input
    }

    /// Add an object to this scene at the end of the frame
    pub fn spawn(&mut self, id: impl Into<ObjectId>, object: impl GameObject) {
        self.commands.spawn(Spawn::named(id, object));
    }

    /// Add an object with a generated identity at the end of the frame
    pub fn spawn_anonymous(&mut self, object: impl GameObject) {
        self.commands.spawn(Spawn::anonymous(object));
    }

    /// Remove an object from this scene at the end of the frame
    pub fn despawn(&mut self, id: impl Into<ObjectId>) {
        self.commands.despawn(id.into());
    }

    /// Remove the calling object at the end of the frame
    pub fn despawn_self(&mut self) {
        self.commands.despawn(self.id.clone());
    }

    /// Replace the active scene with a registered one
    pub fn switch_to(&mut self, scene: impl Into<String>) {
        self.commands
            .request(TransitionRequest::SwitchTo(SceneTarget::Named(scene.into())));
    }

    /// Replace the active scene with a constructed one
    pub fn switch_to_scene(&mut self, scene: Scene) {
        self.commands.request(TransitionRequest::SwitchTo(scene.into()));
    }

    /// Pause the active scene and enter a registered one on top
    pub fn push(&mut self, scene: impl Into<String>) {
        self.commands
            .request(TransitionRequest::Push(SceneTarget::Named(scene.into())));
    }

    /// Pause the active scene and enter a constructed one on top
    pub fn push_scene(&mut self, scene: Scene) {
        self.commands.request(TransitionRequest::Push(scene.into()));
    }

    /// Exit the active scene and resume the one beneath
    pub fn pop(&mut self) {
        self.commands.request(TransitionRequest::Pop);
    }

    /// Deliver `event` to the active scene `delay` seconds from now
    pub fn post_event(&mut self, delay: f32, event: Event) {
        self.commands.post_event(delay, event);
    }

    /// Stop the loop after this frame
    pub fn quit(&mut self) {
        self.commands.quit();
    }
}

/// What application hooks see between passes
pub struct LoopContext<'a> {
    time: FrameTime,
    commands: &'a mut CommandBuffer,
}

impl<'a> LoopContext<'a> {
    /// Build a context over `commands`
    pub fn new(time: FrameTime, commands: &'a mut CommandBuffer) -> Self {
        Self { time, commands }
    }

    /// Timing of the current frame
    pub fn time(&self) -> FrameTime {
        self.time
    }

    /// Queue any scene transition
    pub fn request(&mut self, request: TransitionRequest) {
        self.commands.request(request);
    }

    /// Replace the active scene with a registered one
    pub fn switch_to(&mut self, scene: impl Into<String>) {
        self.request(TransitionRequest::SwitchTo(SceneTarget::Named(scene.into())));
    }

    /// Pause the active scene and enter a registered one on top
    pub fn push(&mut self, scene: impl Into<String>) {
        self.request(TransitionRequest::Push(SceneTarget::Named(scene.into())));
    }

    /// Exit the active scene and resume the one beneath
    pub fn pop(&mut self) {
        self.request(TransitionRequest::Pop);
    }

    /// Deliver `event` `delay` seconds from now
    pub fn post_event(&mut self, delay: f32, event: Event) {
        self.commands.post_event(delay, event);
    }

    /// Stop the loop after this frame
    pub fn quit(&mut self) {
        self.commands.quit();
    }
}
