//! # Scene Manager
//!
//! Owns the scene stack. The top scene is the only `Entered` one; every scene
//! beneath it is `Paused`. All stack operations validate and materialize the
//! incoming scene before touching the current one, so a failed operation
//! leaves the stack exactly as it was.

use std::collections::VecDeque;

use super::{
    EmptyStackError, LifecycleAction, PausedRenderPolicy, Scene, SceneBehavior, SceneError,
    SceneRegistry, SceneStatus, SceneTarget, TransitionRequest,
};
use crate::events::Event;
use crate::object::{
    Capability, CapabilityDispatchError, CollectionError, CommandBuffer, FailurePolicy, FrameEnv,
    PassReport, RegistryError,
};
use crate::render::Frame;

/// Scene stack plus the registry used to resolve names
#[derive(Debug, Default)]
pub struct SceneManager {
    registry: SceneRegistry,
    stack: Vec<Scene>,
    pending: VecDeque<TransitionRequest>,
    paused_render: PausedRenderPolicy,
}

impl SceneManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager over an existing registry
    pub fn with_registry(registry: SceneRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Set the default paused render policy
    pub fn with_paused_render(mut self, policy: PausedRenderPolicy) -> Self {
        self.paused_render = policy;
        self
    }

    /// Default paused render policy
    pub fn paused_render(&self) -> PausedRenderPolicy {
        self.paused_render
    }

    /// Change the default paused render policy
    pub fn set_paused_render(&mut self, policy: PausedRenderPolicy) {
        self.paused_render = policy;
    }

    /// Scene registry
    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    /// Scene registry, mutably
    pub fn registry_mut(&mut self) -> &mut SceneRegistry {
        &mut self.registry
    }

    /// Register a scene constructor under `name`
    pub fn register<F, B>(&mut self, name: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        F: Fn() -> B + 'static,
        B: SceneBehavior,
    {
        self.registry.register(name, factory)
    }

    /// Registered scene names
    pub fn list_scenes(&self) -> Vec<String> {
        self.registry.names().map(str::to_string).collect()
    }

    /// The top scene
    pub fn active(&self) -> Option<&Scene> {
        self.stack.last()
    }

    /// The top scene, mutably
    pub fn active_mut(&mut self) -> Option<&mut Scene> {
        self.stack.last_mut()
    }

    /// Scenes from bottom to top
    pub fn scenes(&self) -> impl Iterator<Item = &Scene> + '_ {
        self.stack.iter()
    }

    /// Topmost scene called `name`
    pub fn find(&self, name: &str) -> Option<&Scene> {
        self.stack.iter().rev().find(|scene| scene.name() == name)
    }

    /// Stack depth
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether the stack is empty
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Replace the top scene: exit it (if any) and enter `scene`
    pub fn switch_to(&mut self, mut scene: Scene) -> Result<(), SceneError> {
        scene.check(LifecycleAction::Enter)?;
        if let Some(top) = self.stack.last() {
            top.check(LifecycleAction::Exit)?;
        }
        let objects = scene.materialize()?;

        if let Some(mut old) = self.stack.pop() {
            old.exit()?;
            log::info!("Switching `{}` -> `{}`", old.name(), scene.name());
        }
        scene.commit_enter(objects);
        self.stack.push(scene);
        Ok(())
    }

    /// Replace the top scene with a registered one
    pub fn switch_to_named(&mut self, name: &str) -> Result<(), SceneError> {
        let scene = self.registry.create(name)?;
        self.switch_to(scene)
    }

    /// Pause the top scene (if any) and enter `scene` above it
    pub fn push(&mut self, mut scene: Scene) -> Result<(), SceneError> {
        scene.check(LifecycleAction::Enter)?;
        if let Some(top) = self.stack.last() {
            top.check(LifecycleAction::Pause)?;
        }
        let objects = scene.materialize()?;

        if let Some(top) = self.stack.last_mut() {
            top.pause()?;
            log::info!("Pushing `{}` over `{}`", scene.name(), top.name());
        }
        scene.commit_enter(objects);
        self.stack.push(scene);
        Ok(())
    }

    /// Push a registered scene
    pub fn push_named(&mut self, name: &str) -> Result<(), SceneError> {
        let scene = self.registry.create(name)?;
        self.push(scene)
    }

    /// Exit the top scene, resume the one beneath and hand the exited scene back
    pub fn pop(&mut self) -> Result<Scene, SceneError> {
        let top = self.stack.last().ok_or(EmptyStackError { operation: "pop" })?;
        top.check(LifecycleAction::Exit)?;
        if let Some(below) = self.stack.len().checked_sub(2).and_then(|i| self.stack.get(i)) {
            below.check(LifecycleAction::Resume)?;
        }

        let mut scene = self.stack.pop().ok_or(EmptyStackError { operation: "pop" })?;
        scene.exit()?;
        if let Some(below) = self.stack.last_mut() {
            below.resume()?;
            log::info!("Popped `{}`, resumed `{}`", scene.name(), below.name());
        } else {
            log::info!("Popped `{}`, stack is now empty", scene.name());
        }
        Ok(scene)
    }

    /// Exit every scene and make `scene` the only one
    pub fn reset(&mut self, mut scene: Scene) -> Result<(), SceneError> {
        scene.check(LifecycleAction::Enter)?;
        let objects = scene.materialize()?;
        self.exit_all();
        scene.commit_enter(objects);
        self.stack.push(scene);
        Ok(())
    }

    /// Exit and re-enter the top scene, regenerating its objects
    pub fn reload_active(&mut self) -> Result<(), SceneError> {
        let top = self.stack.last_mut().ok_or(EmptyStackError { operation: "reload" })?;
        top.check(LifecycleAction::Exit)?;
        let objects = top.materialize()?;
        top.exit()?;
        top.commit_enter(objects);
        Ok(())
    }

    /// Exit every scene, top first, and drop any queued transitions
    pub fn shutdown(&mut self) {
        self.exit_all();
        self.pending.clear();
    }

    /// Queue a transition for [`apply_pending`](Self::apply_pending)
    pub fn request(&mut self, request: TransitionRequest) {
        log::debug!("Transition requested: {:?}", request);
        self.pending.push_back(request);
    }

    /// Number of queued transitions
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Apply queued transitions in request order
    ///
    /// Stops at the first failure; the failed request and everything after
    /// it are dropped.
    pub fn apply_pending(&mut self) -> Result<usize, SceneError> {
        let mut applied = 0;
        while let Some(request) = self.pending.pop_front() {
            if let Err(err) = self.apply(request) {
                self.pending.clear();
                return Err(err);
            }
            applied += 1;
        }
        Ok(applied)
    }

    /// Apply one transition now
    pub fn apply(&mut self, request: TransitionRequest) -> Result<(), SceneError> {
        match request {
            TransitionRequest::SwitchTo(target) => {
                let scene = self.resolve(target)?;
                self.switch_to(scene)
            }
            TransitionRequest::Push(target) => {
                let scene = self.resolve(target)?;
                self.push(scene)
            }
            TransitionRequest::Pop => self.pop().map(|_| ()),
            TransitionRequest::Reset(target) => {
                let scene = self.resolve(target)?;
                self.reset(scene)
            }
            TransitionRequest::ReloadActive => self.reload_active(),
        }
    }

    /// Re-read ordering keys of every live scene
    pub fn begin_frame(&mut self) {
        for scene in &mut self.stack {
            scene.begin_frame();
        }
    }

    /// Deliver events to the active scene
    pub fn dispatch_events(
        &mut self,
        events: &[Event],
        env: FrameEnv<'_>,
        commands: &mut CommandBuffer,
        policy: FailurePolicy,
    ) -> Result<PassReport, CapabilityDispatchError> {
        match self.stack.last_mut() {
            Some(scene) => scene.dispatch_events(events, env, commands, policy),
            None => {
                let mut report = PassReport::new(Capability::Eventful);
                report.consumed = events.len();
                Ok(report)
            }
        }
    }

    /// Advance the active scene
    pub fn dispatch_update(
        &mut self,
        elapsed: f32,
        env: FrameEnv<'_>,
        commands: &mut CommandBuffer,
        policy: FailurePolicy,
    ) -> Result<PassReport, CapabilityDispatchError> {
        match self.stack.last_mut() {
            Some(scene) => scene.dispatch_update(elapsed, env, commands, policy),
            None => Ok(PassReport::new(Capability::Logical)),
        }
    }

    /// Draw the stack bottom to top
    ///
    /// Paused scenes draw only when their own override, or the manager's
    /// default, says [`PausedRenderPolicy::Render`].
    pub fn dispatch_render(
        &mut self,
        frame: &mut Frame,
        env: FrameEnv<'_>,
        commands: &mut CommandBuffer,
        policy: FailurePolicy,
    ) -> Result<PassReport, CapabilityDispatchError> {
        let mut report = PassReport::new(Capability::Drawable);
        let default_policy = self.paused_render;
        for scene in &mut self.stack {
            let draw = match scene.status() {
                SceneStatus::Entered => true,
                SceneStatus::Paused => {
                    scene.paused_render().unwrap_or(default_policy) == PausedRenderPolicy::Render
                }
                SceneStatus::Created | SceneStatus::Exited => false,
            };
            if draw {
                report.merge(scene.dispatch_render(frame, env, commands, policy)?);
            }
        }
        Ok(report)
    }

    /// Apply object changes queued in every scene
    pub fn flush_pending_objects(&mut self) -> Vec<CollectionError> {
        let mut rejected = Vec::new();
        for scene in &mut self.stack {
            rejected.extend(scene.flush_pending().rejected);
        }
        rejected
    }

    fn exit_all(&mut self) {
        while let Some(mut scene) = self.stack.pop() {
            if scene.is_live() {
                if let Err(err) = scene.exit() {
                    log::error!("Failed to exit `{}`: {}", scene.name(), err);
                }
            }
        }
    }

    fn resolve(&self, target: SceneTarget) -> Result<Scene, SceneError> {
        match target {
            SceneTarget::Named(name) => Ok(self.registry.create(&name)?),
            SceneTarget::Scene(scene) => Ok(*scene),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Spawn;
    use crate::object::{Logical, ObjectContext, ObjectResult};

    struct Idle;

    impl Logical for Idle {
        fn update(&mut self, _elapsed: f32, _ctx: &mut ObjectContext<'_>) -> ObjectResult {
            Ok(())
        }
    }

    crate::game_object!(Idle: Logical);

    fn one_object() -> Vec<Spawn> {
        vec![Spawn::named("idle", Idle)]
    }

    fn broken() -> Vec<Spawn> {
        vec![Spawn::named("x", Idle), Spawn::named("x", Idle)]
    }

    fn manager() -> SceneManager {
        let mut manager = SceneManager::new();
        manager.register("a", || one_object).unwrap();
        manager.register("b", || one_object).unwrap();
        manager.register("broken", || broken).unwrap();
        manager
    }

    fn statuses(manager: &SceneManager) -> Vec<(String, SceneStatus)> {
        manager
            .scenes()
            .map(|scene| (scene.name().to_string(), scene.status()))
            .collect()
    }

    #[test]
    fn test_switch_replaces_top() {
        let mut manager = manager();
        manager.switch_to_named("a").unwrap();
        manager.switch_to_named("b").unwrap();

        assert_eq!(statuses(&manager), vec![("b".to_string(), SceneStatus::Entered)]);
    }

    #[test]
    fn test_push_then_pop_restores_exactly() {
        let mut manager = manager();
        manager.switch_to_named("a").unwrap();
        manager.push_named("b").unwrap();

        assert_eq!(
            statuses(&manager),
            vec![("a".to_string(), SceneStatus::Paused), ("b".to_string(), SceneStatus::Entered)]
        );

        let popped = manager.pop().unwrap();
        assert_eq!(popped.status(), SceneStatus::Exited);
        assert!(popped.objects().is_empty());
        assert_eq!(statuses(&manager), vec![("a".to_string(), SceneStatus::Entered)]);
        assert_eq!(manager.active().unwrap().objects().len(), 1);
    }

    #[test]
    fn test_pop_empty_stack() {
        let mut manager = manager();
        let err = manager.pop().unwrap_err();
        assert!(matches!(err, SceneError::EmptyStack(EmptyStackError { operation: "pop" })));
    }

    #[test]
    fn test_failed_switch_keeps_current_scene() {
        let mut manager = manager();
        manager.switch_to_named("a").unwrap();

        assert!(manager.switch_to_named("broken").is_err());
        assert!(manager.switch_to_named("missing").is_err());
        assert_eq!(statuses(&manager), vec![("a".to_string(), SceneStatus::Entered)]);
        assert_eq!(manager.active().unwrap().objects().len(), 1);
    }

    #[test]
    fn test_failed_push_keeps_top_entered() {
        let mut manager = manager();
        manager.switch_to_named("a").unwrap();
        assert!(manager.push_named("broken").is_err());
        assert_eq!(statuses(&manager), vec![("a".to_string(), SceneStatus::Entered)]);
    }

    #[test]
    fn test_switching_to_entered_scene_is_invalid() {
        let mut manager = manager();
        let mut scene = Scene::new("c", one_object);
        scene.enter().unwrap();

        let err = manager.switch_to(scene).unwrap_err();
        assert!(matches!(err, SceneError::InvalidTransition(_)));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_reset_exits_everything() {
        let mut manager = manager();
        manager.switch_to_named("a").unwrap();
        manager.push_named("b").unwrap();
        manager.reset(Scene::new("c", one_object)).unwrap();

        assert_eq!(statuses(&manager), vec![("c".to_string(), SceneStatus::Entered)]);
    }

    #[test]
    fn test_reload_regenerates_objects() {
        let mut manager = manager();
        manager.switch_to_named("a").unwrap();
        manager.active_mut().unwrap().objects_mut().remove(&"idle".into());
        assert!(manager.active().unwrap().objects().is_empty());

        manager.reload_active().unwrap();
        let scene = manager.active().unwrap();
        assert_eq!(scene.objects().len(), 1);
        assert_eq!(scene.enter_count(), 2);
    }

    #[test]
    fn test_pending_requests_apply_in_order() {
        let mut manager = manager();
        manager.request(TransitionRequest::SwitchTo("a".into()));
        manager.request(TransitionRequest::Push("b".into()));
        assert_eq!(manager.depth(), 0);

        assert_eq!(manager.apply_pending().unwrap(), 2);
        assert_eq!(manager.depth(), 2);
        assert_eq!(manager.active().unwrap().name(), "b");
    }

    #[test]
    fn test_failed_request_drops_the_rest() {
        let mut manager = manager();
        manager.request(TransitionRequest::Pop);
        manager.request(TransitionRequest::SwitchTo("a".into()));

        assert!(manager.apply_pending().is_err());
        assert_eq!(manager.pending_len(), 0);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_queued_reset_keeps_later_requests() {
        let mut manager = manager();
        manager.switch_to_named("b").unwrap();
        manager.request(TransitionRequest::Reset("a".into()));
        manager.request(TransitionRequest::Push("b".into()));

        assert_eq!(manager.apply_pending().unwrap(), 2);
        assert_eq!(manager.pending_len(), 0);
        assert_eq!(
            statuses(&manager),
            vec![("a".to_string(), SceneStatus::Paused), ("b".to_string(), SceneStatus::Entered)]
        );
    }

    #[test]
    fn test_shutdown_drops_queued_requests() {
        let mut manager = manager();
        manager.switch_to_named("a").unwrap();
        manager.request(TransitionRequest::Push("b".into()));
        manager.shutdown();
        assert_eq!(manager.pending_len(), 0);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_shutdown_exits_all() {
        let mut manager = manager();
        manager.switch_to_named("a").unwrap();
        manager.push_named("b").unwrap();
        manager.shutdown();
        assert!(manager.is_empty());
    }

    #[test]
    fn test_list_scenes() {
        assert_eq!(manager().list_scenes(), vec!["a", "b", "broken"]);
    }
}
