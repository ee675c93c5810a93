//! Whole-loop scenarios driven headlessly

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::config::EngineSettings;
use crate::events::{Event, EventType};
use crate::foundation::time::ManualClock;
use crate::input::{KeyCode, ScriptedInput};
use crate::object::{
    Capabilities, Capability, Drawable, Eventful, FailurePolicy, GameObject, Logical,
    ObjectCollection, ObjectContext, ObjectError, ObjectId, ObjectResult, Spawn,
};
use crate::render::{Frame, RecordingRenderer};
use crate::scene::{
    ObjectState, ObjectStream, PausedRenderPolicy, Scene, SceneBehavior, SceneStatus, SnapshotError,
};
use crate::{EngineError, GameLoop};

type Log = Rc<RefCell<Vec<String>>>;

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

/// Draws and updates, logging each call
struct Probe {
    name: &'static str,
    log: Log,
}

impl Drawable for Probe {
    fn render(&mut self, _frame: &mut Frame, _ctx: &mut ObjectContext<'_>) -> ObjectResult {
        self.log.borrow_mut().push(format!("render:{}", self.name));
        Ok(())
    }
}

impl Logical for Probe {
    fn update(&mut self, _elapsed: f32, _ctx: &mut ObjectContext<'_>) -> ObjectResult {
        self.log.borrow_mut().push(format!("update:{}", self.name));
        Ok(())
    }
}

crate::game_object!(Probe: Drawable, Logical);

/// Handles events, logging each call
struct Listener {
    name: &'static str,
    log: Log,
}

impl Eventful for Listener {
    fn handle(&mut self, event: &Event, _ctx: &mut ObjectContext<'_>) -> ObjectResult {
        self.log
            .borrow_mut()
            .push(format!("handle:{}:{:?}", self.name, event.event_type));
        Ok(())
    }
}

crate::game_object!(Listener: Eventful);

/// Scene that logs its lifecycle and spawns whatever `make` returns
struct ProbeScene {
    name: &'static str,
    log: Log,
    make: fn(&Log) -> Vec<Spawn>,
    paused_render: Option<PausedRenderPolicy>,
}

impl ProbeScene {
    fn new(name: &'static str, log: &Log, make: fn(&Log) -> Vec<Spawn>) -> Self {
        Self {
            name,
            log: Rc::clone(log),
            make,
            paused_render: None,
        }
    }
}

impl SceneBehavior for ProbeScene {
    fn generate_objects(&mut self) -> ObjectStream<'_> {
        Box::new((self.make)(&self.log).into_iter())
    }

    fn on_enter(&mut self, _objects: &mut ObjectCollection, _first_time: bool) {
        self.log.borrow_mut().push(format!("enter:{}", self.name));
    }

    fn on_exit(&mut self) {
        self.log.borrow_mut().push(format!("exit:{}", self.name));
    }

    fn paused_render(&self) -> Option<PausedRenderPolicy> {
        self.paused_render
    }
}

fn game(settings: EngineSettings, input: ScriptedInput) -> GameLoop<ScriptedInput, RecordingRenderer, ManualClock> {
    match GameLoop::new(settings, input, RecordingRenderer::new(), ManualClock::new()) {
        Ok(game) => game,
        Err(err) => panic!("settings rejected: {err}"),
    }
}

fn register(game: &mut GameLoop<ScriptedInput, RecordingRenderer, ManualClock>, name: &'static str, log: &Log, make: fn(&Log) -> Vec<Spawn>) {
    let log = Rc::clone(log);
    game.scenes_mut()
        .register(name, move || ProbeScene::new(name, &log, make))
        .unwrap();
}

fn probe_and_listener(log: &Log) -> Vec<Spawn> {
    vec![
        Spawn::named("first", Probe { name: "first", log: Rc::clone(log) }),
        Spawn::named("second", Listener { name: "second", log: Rc::clone(log) }),
    ]
}

#[test]
fn test_one_quiet_frame_skips_handlers() {
    let log = new_log();
    let mut game = game(EngineSettings::default(), ScriptedInput::new());
    register(&mut game, "main", &log, probe_and_listener);
    game.start(&mut ()).unwrap();
    log.borrow_mut().clear();

    let report = game.frame(&mut ()).unwrap();
    assert_eq!(entries(&log), vec!["update:first", "render:first"]);
    assert_eq!(report.handle_calls, 0);
    assert_eq!(report.update_calls, 1);
    assert_eq!(report.render_calls, 1);
    assert!(report.presented);
}

#[test]
fn test_each_event_reaches_each_listener() {
    let log = new_log();
    let input = ScriptedInput::new().then([Event::key_pressed(KeyCode::A), Event::custom(7)]);
    let mut game = game(EngineSettings::default(), input);
    register(&mut game, "main", &log, |log| {
        vec![
            Spawn::named("l1", Listener { name: "l1", log: Rc::clone(log) }),
            Spawn::named("l2", Listener { name: "l2", log: Rc::clone(log) }),
        ]
    });

    let report = game.frame(&mut ()).unwrap();
    assert_eq!(report.events, 2);
    assert_eq!(report.handle_calls, 4);
    assert_eq!(
        entries(&log)[1..],
        [
            "handle:l1:KeyPressed",
            "handle:l2:KeyPressed",
            "handle:l1:Custom(7)",
            "handle:l2:Custom(7)",
        ]
    );
}

/// Spawns a child on its first update and removes itself on the second
struct Spawner {
    log: Log,
    updates: u32,
}

impl Logical for Spawner {
    fn update(&mut self, _elapsed: f32, ctx: &mut ObjectContext<'_>) -> ObjectResult {
        self.updates += 1;
        match self.updates {
            1 => ctx.spawn("child", Probe { name: "child", log: Rc::clone(&self.log) }),
            2 => {
                ctx.despawn_self();
                ctx.despawn("spawner");
            }
            _ => {}
        }
        Ok(())
    }
}

crate::game_object!(Spawner: Logical);

#[test]
fn test_changes_land_at_frame_boundary() {
    let log = new_log();
    let mut game = game(EngineSettings::default(), ScriptedInput::new());
    register(&mut game, "main", &log, |log| {
        vec![Spawn::named("spawner", Spawner { log: Rc::clone(log), updates: 0 })]
    });
    game.start(&mut ()).unwrap();

    let first = game.frame(&mut ()).unwrap();
    assert!(!entries(&log).iter().any(|entry| entry.ends_with(":child")));
    assert!(first.rejected.is_empty());
    let objects = game.scenes().active().unwrap().objects();
    assert!(objects.contains(&ObjectId::new("child")));

    log.borrow_mut().clear();
    game.frame(&mut ()).unwrap();
    assert_eq!(entries(&log), vec!["update:child", "render:child"]);
    let objects = game.scenes().active().unwrap().objects();
    assert!(!objects.contains(&ObjectId::new("spawner")));
    assert_eq!(objects.len(), 1);
}

#[test]
fn test_duplicate_spawn_is_reported_at_flush() {
    struct Twin;

    impl Logical for Twin {
        fn update(&mut self, _elapsed: f32, ctx: &mut ObjectContext<'_>) -> ObjectResult {
            ctx.spawn("twin", Twin);
            Ok(())
        }
    }

    crate::game_object!(Twin: Logical);

    let mut game = game(EngineSettings::default(), ScriptedInput::new());
    game.scenes_mut()
        .register("main", || || vec![Spawn::named("twin", Twin)])
        .unwrap();

    let report = game.frame(&mut ()).unwrap();
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(game.scenes().active().unwrap().objects().len(), 1);

    let mut strict = self::game(
        EngineSettings::default().with_failure_policy(FailurePolicy::FailFast),
        ScriptedInput::new(),
    );
    strict
        .scenes_mut()
        .register("main", || || vec![Spawn::named("twin", Twin)])
        .unwrap();
    assert!(matches!(strict.run(&mut ()), Err(EngineError::Collection(_))));
}

/// Switches scenes on Enter
struct Switcher {
    target: &'static str,
}

impl Eventful for Switcher {
    fn handle(&mut self, event: &Event, ctx: &mut ObjectContext<'_>) -> ObjectResult {
        if event.key() == Some(KeyCode::Enter) {
            ctx.switch_to(self.target);
        }
        Ok(())
    }
}

crate::game_object!(Switcher: Eventful);

#[test]
fn test_switch_request_cuts_the_frame() {
    let log = new_log();
    let input = ScriptedInput::new().then([Event::key_pressed(KeyCode::Enter), Event::custom(1)]);
    let mut game = game(EngineSettings::default(), input);
    register(&mut game, "main", &log, |log| {
        vec![
            Spawn::named("switch", Switcher { target: "next" }),
            Spawn::named("probe", Probe { name: "main", log: Rc::clone(log) }),
            Spawn::named("late", Listener { name: "late", log: Rc::clone(log) }),
        ]
    });
    register(&mut game, "next", &log, |log| {
        vec![Spawn::named("probe", Probe { name: "next", log: Rc::clone(log) })]
    });
    game.start(&mut ()).unwrap();
    log.borrow_mut().clear();

    let report = game.frame(&mut ()).unwrap();
    assert!(!report.presented);
    assert_eq!(report.transitions, 1);
    assert_eq!(entries(&log), vec!["exit:main", "enter:next"]);
    assert_eq!(game.scenes().active().unwrap().name(), "next");
    assert_eq!(game.scenes().depth(), 1);

    log.borrow_mut().clear();
    game.frame(&mut ()).unwrap();
    assert_eq!(entries(&log), vec!["update:next", "render:next"]);
}

#[test]
fn test_events_after_a_switch_reach_the_next_scene() {
    #[derive(Default)]
    struct Seen {
        events: Vec<EventType>,
    }

    impl crate::Application for Seen {
        fn on_event(&mut self, event: &Event, _ctx: &mut crate::object::LoopContext<'_>) {
            self.events.push(event.event_type);
        }
    }

    let log = new_log();
    let input = ScriptedInput::new().then([Event::key_pressed(KeyCode::Enter), Event::custom(7)]);
    let mut game = game(EngineSettings::default(), input);
    register(&mut game, "main", &log, |_| vec![Spawn::named("switch", Switcher { target: "next" })]);
    register(&mut game, "next", &log, |log| {
        vec![Spawn::named("listener", Listener { name: "next", log: Rc::clone(log) })]
    });
    let mut app = Seen::default();
    game.start(&mut app).unwrap();
    log.borrow_mut().clear();

    let report = game.frame(&mut app).unwrap();
    assert_eq!(report.events, 1);
    assert_eq!(report.carried, 1);
    assert_eq!(entries(&log), vec!["exit:main", "enter:next"]);

    log.borrow_mut().clear();
    let report = game.frame(&mut app).unwrap();
    assert_eq!(report.events, 1);
    assert_eq!(report.carried, 0);
    assert_eq!(entries(&log), vec!["handle:next:Custom(7)"]);
    assert_eq!(app.events, vec![EventType::KeyPressed, EventType::Custom(7)]);

    log.borrow_mut().clear();
    let report = game.frame(&mut app).unwrap();
    assert_eq!(report.events, 0);
    assert!(entries(&log).is_empty());
}

#[test]
fn test_unknown_transition_target_is_fatal() {
    let log = new_log();
    let input = ScriptedInput::new().then([Event::key_pressed(KeyCode::Enter)]);
    let mut game = game(EngineSettings::default(), input);
    game.scenes_mut()
        .register("main", || || vec![Spawn::named("switch", Switcher { target: "missing" })])
        .unwrap();

    let err = game.run(&mut ()).unwrap_err();
    assert!(matches!(err, EngineError::Scene(_)));
    assert!(game.scenes().is_empty());
    assert!(entries(&log).is_empty());
}

/// Pushes or pops on key presses
struct StackDriver;

impl Eventful for StackDriver {
    fn handle(&mut self, event: &Event, ctx: &mut ObjectContext<'_>) -> ObjectResult {
        match event.key() {
            Some(KeyCode::P) => ctx.push("overlay"),
            Some(KeyCode::Escape) => ctx.pop(),
            _ => {}
        }
        Ok(())
    }
}

crate::game_object!(StackDriver: Eventful);

fn driven(log: &Log, name: &'static str) -> Vec<Spawn> {
    vec![
        Spawn::named("driver", StackDriver),
        Spawn::named("probe", Probe { name, log: Rc::clone(log) }),
    ]
}

#[test]
fn test_push_pop_through_the_loop() {
    let log = new_log();
    let input = ScriptedInput::new()
        .then([Event::key_pressed(KeyCode::P)])
        .idle(1)
        .then([Event::key_pressed(KeyCode::Escape)])
        .idle(1);
    let mut game = game(EngineSettings::default(), input);
    register(&mut game, "main", &log, |log| driven(log, "main"));
    register(&mut game, "overlay", &log, |log| driven(log, "overlay"));
    game.start(&mut ()).unwrap();

    game.frame(&mut ()).unwrap();
    let statuses: Vec<SceneStatus> = game.scenes().scenes().map(Scene::status).collect();
    assert_eq!(statuses, vec![SceneStatus::Paused, SceneStatus::Entered]);

    log.borrow_mut().clear();
    game.frame(&mut ()).unwrap();
    assert_eq!(entries(&log), vec!["update:overlay", "render:main", "render:overlay"]);

    game.frame(&mut ()).unwrap();
    assert_eq!(game.scenes().depth(), 1);
    assert_eq!(game.scenes().active().unwrap().status(), SceneStatus::Entered);

    log.borrow_mut().clear();
    game.frame(&mut ()).unwrap();
    assert_eq!(entries(&log), vec!["update:main", "render:main"]);
}

#[test]
fn test_paused_scene_hidden_under_skip_policy() {
    let log = new_log();
    let input = ScriptedInput::new().then([Event::key_pressed(KeyCode::P)]);
    let settings = EngineSettings::default().with_paused_render(PausedRenderPolicy::Skip);
    let mut game = game(settings, input);
    register(&mut game, "main", &log, |log| driven(log, "main"));
    register(&mut game, "overlay", &log, |log| driven(log, "overlay"));

    game.frame(&mut ()).unwrap();
    log.borrow_mut().clear();
    game.frame(&mut ()).unwrap();
    assert_eq!(entries(&log), vec!["update:overlay", "render:overlay"]);
}

#[test]
fn test_paused_scene_can_override_policy() {
    let log = new_log();
    let mut game = game(
        EngineSettings::default().with_paused_render(PausedRenderPolicy::Skip),
        ScriptedInput::new(),
    );
    let below = Rc::clone(&log);
    game.scenes_mut()
        .register("main", move || {
            let mut scene = ProbeScene::new("main", &below, |log| driven(log, "main"));
            scene.paused_render = Some(PausedRenderPolicy::Render);
            scene
        })
        .unwrap();
    register(&mut game, "overlay", &log, |log| driven(log, "overlay"));
    game.start(&mut ()).unwrap();
    game.scenes_mut().push_named("overlay").unwrap();

    log.borrow_mut().clear();
    game.frame(&mut ()).unwrap();
    assert_eq!(entries(&log), vec!["update:overlay", "render:main", "render:overlay"]);
}

#[test]
fn test_popping_last_scene_stops_the_loop() {
    let log = new_log();
    let input = ScriptedInput::new().then([Event::key_pressed(KeyCode::Escape)]);
    let mut game = game(EngineSettings::default(), input);
    register(&mut game, "main", &log, |log| driven(log, "main"));

    let summary = game.run(&mut ()).unwrap();
    assert_eq!(summary.frames, 1);
    assert!(game.scenes().is_empty());
    assert_eq!(entries(&log).last().map(String::as_str), Some("exit:main"));
}

#[test]
fn test_normal_stop_exits_active_scene() {
    let log = new_log();
    let input = ScriptedInput::new().idle(1).quit_when_done();
    let mut game = game(EngineSettings::default(), input);
    register(&mut game, "main", &log, probe_and_listener);

    game.run(&mut ()).unwrap();
    let log = entries(&log);
    assert_eq!(log.first().map(String::as_str), Some("enter:main"));
    assert_eq!(log.last().map(String::as_str), Some("exit:main"));
    assert!(log.contains(&"handle:second:Quit".to_string()));
}

/// Fails every update
struct Faulty;

impl Logical for Faulty {
    fn update(&mut self, _elapsed: f32, _ctx: &mut ObjectContext<'_>) -> ObjectResult {
        Err(ObjectError::msg("boom"))
    }
}

crate::game_object!(Faulty: Logical);

fn faulty_then_probe(log: &Log) -> Vec<Spawn> {
    vec![
        Spawn::named("faulty", Faulty),
        Spawn::named("probe", Probe { name: "probe", log: Rc::clone(log) }),
    ]
}

#[test]
fn test_failing_object_does_not_stop_the_pass() {
    let log = new_log();
    let mut game = game(EngineSettings::default(), ScriptedInput::new());
    register(&mut game, "main", &log, faulty_then_probe);

    let report = game.frame(&mut ()).unwrap();
    assert_eq!(report.errors, 1);
    let first = report.first_error.unwrap();
    assert_eq!(first.object, ObjectId::new("faulty"));
    assert_eq!(first.capability, Capability::Logical);
    assert!(entries(&log).contains(&"update:probe".to_string()));

    let summary = game.run_frames(&mut (), 3).unwrap();
    assert_eq!(summary.dispatch_errors, 3);
}

#[test]
fn test_fail_fast_surfaces_first_error() {
    let log = new_log();
    let settings = EngineSettings::default().with_failure_policy(FailurePolicy::FailFast);
    let mut game = game(settings, ScriptedInput::new());
    register(&mut game, "main", &log, faulty_then_probe);

    let err = game.run(&mut ()).unwrap_err();
    let EngineError::Dispatch(dispatch) = err else {
        panic!("expected a dispatch error");
    };
    assert_eq!(dispatch.object, ObjectId::new("faulty"));
    assert!(!entries(&log).contains(&"update:probe".to_string()));
    assert_eq!(entries(&log).last().map(String::as_str), Some("exit:main"));
}

/// Posts a delayed event to its own scene and quits when it arrives
struct Alarm {
    log: Log,
    armed: bool,
}

impl Logical for Alarm {
    fn update(&mut self, _elapsed: f32, ctx: &mut ObjectContext<'_>) -> ObjectResult {
        if !self.armed {
            self.armed = true;
            ctx.post_event(0.05, Event::custom(9));
        }
        Ok(())
    }
}

impl Eventful for Alarm {
    fn handle(&mut self, event: &Event, ctx: &mut ObjectContext<'_>) -> ObjectResult {
        if event.event_type == EventType::Custom(9) {
            self.log
                .borrow_mut()
                .push(format!("alarm:{}", ctx.time().frame_index));
            ctx.quit();
        }
        Ok(())
    }
}

crate::game_object!(Alarm: Logical, Eventful);

#[test]
fn test_posted_event_arrives_after_delay() {
    let log = new_log();
    let settings = EngineSettings::default().with_target_fps(Some(50));
    let mut game = game(settings, ScriptedInput::new());
    let alarm_log = Rc::clone(&log);
    game.scenes_mut()
        .register("main", move || {
            let log = Rc::clone(&alarm_log);
            move || vec![Spawn::named("alarm", Alarm { log: Rc::clone(&log), armed: false })]
        })
        .unwrap();

    let summary = game.run_frames(&mut (), 20).unwrap();
    assert_eq!(entries(&log), vec!["alarm:3"]);
    assert_eq!(summary.frames, 4);
}

/// Accumulates elapsed time and takes part in snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Odometer {
    distance: f32,
    laps: u32,
}

impl Logical for Odometer {
    fn update(&mut self, elapsed: f32, _ctx: &mut ObjectContext<'_>) -> ObjectResult {
        self.distance += elapsed * 10.0;
        if self.distance.is_finite() && self.distance >= 100.0 {
            self.laps += 1;
            self.distance = 0.0;
        }
        Ok(())
    }
}

impl Drawable for Odometer {
    fn render(&mut self, frame: &mut Frame, _ctx: &mut ObjectContext<'_>) -> ObjectResult {
        frame.text(
            crate::foundation::math::Vec2::new(0.0, 0.0),
            format!("{:.1}", self.distance),
            crate::render::Color::WHITE,
            12.0,
        );
        Ok(())
    }
}

impl GameObject for Odometer {
    fn as_drawable(&mut self) -> Option<&mut dyn Drawable> {
        Some(self)
    }

    fn as_logical(&mut self) -> Option<&mut dyn Logical> {
        Some(self)
    }

    fn save_state(&self) -> Result<Option<ObjectState>, SnapshotError> {
        ObjectState::encode(self).map(Some)
    }

    fn load_state(&mut self, state: &ObjectState) -> Result<(), SnapshotError> {
        *self = state.decode()?;
        Ok(())
    }
}

fn odometer_scene() -> Vec<Spawn> {
    vec![Spawn::named("odo", Odometer { distance: 0.0, laps: 0 })]
}

fn odometer(scene: &Scene) -> Odometer {
    let state = scene.objects().get(&ObjectId::new("odo")).unwrap().save_state().unwrap().unwrap();
    state.decode().unwrap()
}

fn step(scene: &mut Scene, elapsed: f32) {
    use crate::foundation::time::FrameTime;
    use crate::input::InputState;
    use crate::object::{CommandBuffer, FrameEnv};

    let input = InputState::new();
    let env = FrameEnv::new(FrameTime::default(), &input);
    let mut commands = CommandBuffer::new();
    scene
        .dispatch_update(elapsed, env, &mut commands, FailurePolicy::Continue)
        .unwrap();
}

#[test]
fn test_snapshot_restore_keeps_capabilities() {
    let mut scene = Scene::new("track", odometer_scene);
    scene.enter().unwrap();
    step(&mut scene, 2.5);
    let before = scene.objects().capabilities_of(&ObjectId::new("odo")).unwrap();
    let snapshot = scene.snapshot().unwrap();

    step(&mut scene, 4.0);
    assert_eq!(odometer(&scene), Odometer { distance: 65.0, laps: 0 });

    let report = scene.restore(&snapshot).unwrap();
    assert_eq!(report.restored, vec![ObjectId::new("odo")]);
    assert_eq!(odometer(&scene), Odometer { distance: 25.0, laps: 0 });
    let after = scene.objects().capabilities_of(&ObjectId::new("odo")).unwrap();
    assert_eq!(before, after);
    assert_eq!(after, Capabilities::DRAWABLE | Capabilities::LOGICAL);
    assert!(scene.last_snapshot().is_some());
}

#[test]
fn test_reentry_regenerates_objects() {
    let mut scene = Scene::new("track", odometer_scene);
    scene.enter().unwrap();
    step(&mut scene, 3.0);
    scene.exit().unwrap();
    assert!(scene.objects().is_empty());

    scene.enter().unwrap();
    assert_eq!(scene.enter_count(), 2);
    assert_eq!(scene.objects().len(), 1);
    assert_eq!(odometer(&scene), Odometer { distance: 0.0, laps: 0 });
}

#[test]
fn test_zero_and_huge_elapsed() {
    let mut scene = Scene::new("track", odometer_scene);
    scene.enter().unwrap();
    step(&mut scene, 1.0);
    step(&mut scene, 0.0);
    assert_eq!(odometer(&scene), Odometer { distance: 10.0, laps: 0 });

    step(&mut scene, -5.0);
    assert_eq!(odometer(&scene), Odometer { distance: 10.0, laps: 0 });

    step(&mut scene, f32::MAX);
    assert!(odometer(&scene).distance.is_infinite());
}

#[test]
fn test_stall_is_clamped_by_the_loop() {
    let clock = ManualClock::new();
    let settings = EngineSettings::default().with_target_fps(None);
    let mut game = GameLoop::new(settings, ScriptedInput::new(), RecordingRenderer::new(), clock.clone()).unwrap();
    game.scenes_mut().register("main", || odometer_scene).unwrap();
    game.start(&mut ()).unwrap();

    clock.advance_secs(30.0);
    let report = game.frame(&mut ()).unwrap();
    assert!((report.time.raw_delta - 30.0).abs() < 1e-3);
    assert!((report.time.delta - 0.25).abs() < 1e-6);
    assert_eq!(odometer(game.scenes().active().unwrap()).distance, 2.5);
}

#[test]
fn test_application_hooks_wrap_the_frame() {
    #[derive(Default)]
    struct Hooks {
        calls: Vec<&'static str>,
    }

    impl crate::Application for Hooks {
        fn initialize(&mut self, scenes: &mut crate::scene::SceneManager) -> Result<(), crate::AppError> {
            self.calls.push("initialize");
            scenes.register("main", || odometer_scene)?;
            scenes.switch_to_named("main")?;
            Ok(())
        }

        fn on_event(&mut self, _event: &Event, _ctx: &mut crate::object::LoopContext<'_>) {
            self.calls.push("event");
        }

        fn pre_update(&mut self, _time: &crate::foundation::time::FrameTime, _ctx: &mut crate::object::LoopContext<'_>) {
            self.calls.push("pre_update");
        }

        fn post_update(&mut self, _time: &crate::foundation::time::FrameTime, ctx: &mut crate::object::LoopContext<'_>) {
            self.calls.push("post_update");
            ctx.quit();
        }

        fn pre_draw(&mut self, _frame: &mut Frame) {
            self.calls.push("pre_draw");
        }

        fn post_draw(&mut self, _frame: &mut Frame) {
            self.calls.push("post_draw");
        }

        fn cleanup(&mut self) {
            self.calls.push("cleanup");
        }
    }

    let input = ScriptedInput::new().then([Event::custom(1)]);
    let settings = EngineSettings::default().with_initial_scene("unused");
    let mut game = game(settings, input);
    let mut hooks = Hooks::default();

    let summary = game.run(&mut hooks).unwrap();
    assert_eq!(summary.frames, 1);
    assert_eq!(
        hooks.calls,
        vec!["initialize", "event", "pre_update", "post_update", "pre_draw", "post_draw", "cleanup"]
    );
    assert_eq!(game.renderer().last_frame().map(<[_]>::len), Some(1));
}
