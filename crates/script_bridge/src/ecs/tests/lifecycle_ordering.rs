//! Lifecycle ordering, error containment and deferred destruction

use super::support::{engine, event_log, step, take, EventLog, First, Second, FIXED_STEP};
use crate::ecs::{
    BridgeError, Component, GameObjectHandle, LifecycleHooks, ScriptContext, ScriptError, ScriptResult,
};

#[test]
fn test_full_frame_order() {
    let (mut engine, native) = engine();
    let log = event_log();
    let handle = engine.create_game_object().unwrap();

    engine
        .scene_mut()
        .add_component_with(handle, First::new(&log))
        .unwrap();
    assert_eq!(take(&log), vec!["First:Awake"]);

    let report = step(&mut engine, &native, FIXED_STEP * 2.0);
    assert_eq!(report.fixed_steps, 2);
    assert_eq!(
        take(&log),
        vec![
            "First:Start",
            "First:Update",
            "First:FixedUpdate",
            "First:FixedUpdate",
            "First:LateUpdate",
        ]
    );
    assert_eq!(report.callbacks, 5);

    // Start is never repeated
    step(&mut engine, &native, 0.0);
    assert_eq!(take(&log), vec!["First:Update", "First:LateUpdate"]);
}

#[test]
fn test_components_run_in_attach_order_within_each_pass() {
    let (mut engine, native) = engine();
    let log = event_log();
    let a = engine.create_game_object().unwrap();
    let b = engine.create_game_object().unwrap();

    engine.scene_mut().add_component_with(b, Second::new(&log)).unwrap();
    engine.scene_mut().add_component_with(a, First::new(&log)).unwrap();
    take(&log);

    step(&mut engine, &native, 0.0);
    // Objects run in creation order, so `a` comes first in every pass
    assert_eq!(
        take(&log),
        vec![
            "First:Start",
            "Second:Start",
            "First:Update",
            "Second:Update",
            "First:LateUpdate",
            "Second:LateUpdate",
        ]
    );
}

#[test]
fn test_on_destroy_runs_exactly_once() {
    let (mut engine, native) = engine();
    let log = event_log();
    let handle = engine.create_game_object().unwrap();
    engine.scene_mut().add_component_with(handle, First::new(&log)).unwrap();
    step(&mut engine, &native, 0.0);
    take(&log);

    engine.destroy_game_object(handle).unwrap();
    assert_eq!(take(&log), vec!["First:OnDestroy"]);
    assert_eq!(
        engine.destroy_game_object(handle),
        Err(BridgeError::InvalidHandle(handle))
    );

    step(&mut engine, &native, 0.0);
    assert!(take(&log).is_empty());
    assert_eq!(native.destroyed_handles().len(), 1);
}

#[test]
fn test_shutdown_destroys_everything() {
    let (mut engine, native) = engine();
    let log = event_log();
    let a = engine.create_game_object().unwrap();
    let b = engine.create_game_object().unwrap();
    engine.scene_mut().add_component_with(a, First::new(&log)).unwrap();
    engine.scene_mut().add_component_with(b, Second::new(&log)).unwrap();
    take(&log);

    engine.shutdown();
    assert_eq!(take(&log), vec!["First:OnDestroy", "Second:OnDestroy"]);
    assert_eq!(native.entity_count(), 0);

    engine.shutdown();
    assert!(take(&log).is_empty());
}

#[derive(Default)]
struct Faulty;

impl Component for Faulty {
    const TYPE_NAME: &'static str = "Faulty";
    const HOOKS: LifecycleHooks = LifecycleHooks::UPDATE;

    fn update(&mut self, _ctx: &mut ScriptContext<'_>) -> ScriptResult {
        Err(ScriptError::msg("update failed"))
    }
}

#[derive(Default)]
struct Panicky;

impl Component for Panicky {
    const TYPE_NAME: &'static str = "Panicky";
    const HOOKS: LifecycleHooks = LifecycleHooks::UPDATE;

    fn update(&mut self, _ctx: &mut ScriptContext<'_>) -> ScriptResult {
        panic!("script bug");
    }
}

#[test]
fn test_callback_failures_are_contained() {
    let (mut engine, native) = engine();
    let log = event_log();
    let handle = engine.create_game_object().unwrap();
    let scene = engine.scene_mut();
    scene.add_component::<Faulty>(handle).unwrap();
    scene.add_component::<Panicky>(handle).unwrap();
    scene.add_component_with(handle, First::new(&log)).unwrap();
    take(&log);

    let report = step(&mut engine, &native, 0.0);
    assert_eq!(report.faults, 2);
    assert!(take(&log).contains(&"First:Update".to_string()));

    // Faulting components stay attached and keep being called
    assert!(engine.scene().has_component::<Panicky>(handle).unwrap());
    let report = step(&mut engine, &native, 0.0);
    assert_eq!(report.faults, 2);
}

/// Destroys `target` from its Update
struct Killer {
    target: GameObjectHandle,
}

impl Component for Killer {
    const TYPE_NAME: &'static str = "Killer";
    const HOOKS: LifecycleHooks = LifecycleHooks::UPDATE;

    fn update(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
        if ctx.scene().is_alive(self.target) {
            ctx.destroy(self.target)?;
            // Invalid immediately, even though OnDestroy has not run yet
            if ctx.scene().is_alive(self.target) {
                return Err(ScriptError::msg("target still alive after destroy"));
            }
        }
        Ok(())
    }
}

#[test]
fn test_mid_frame_destroy_skips_scheduled_callbacks() {
    let (mut engine, native) = engine();
    let log = event_log();
    let killer = engine.create_game_object().unwrap();
    let victim = engine.create_game_object().unwrap();
    engine.scene_mut().add_component_with(victim, First::new(&log)).unwrap();
    step(&mut engine, &native, 0.0);
    take(&log);

    engine
        .scene_mut()
        .add_component_with(killer, Killer { target: victim })
        .unwrap();
    // Killer starts this frame and kills the victim during the Update pass,
    // before the victim's own Update
    let report = step(&mut engine, &native, 0.0);

    assert_eq!(take(&log), vec!["First:OnDestroy"]);
    assert_eq!(report.faults, 0);
    assert_eq!(report.destroyed, 1);
    assert_eq!(report.skipped, 1);
    assert!(!engine.scene().is_alive(victim));
}

/// Declares no lifecycle hooks at all
#[derive(Default)]
struct Inert;

impl Component for Inert {
    const TYPE_NAME: &'static str = "Inert";
}

#[test]
fn test_skipped_counts_only_declared_callbacks() {
    let (mut engine, native) = engine();
    let killer = engine.create_game_object().unwrap();
    let victim = engine.create_game_object().unwrap();
    engine.scene_mut().add_component::<Inert>(victim).unwrap();
    step(&mut engine, &native, 0.0);

    engine
        .scene_mut()
        .add_component_with(killer, Killer { target: victim })
        .unwrap();
    let report = step(&mut engine, &native, 0.0);

    assert_eq!(report.destroyed, 1);
    assert_eq!(report.skipped, 0);
    assert!(!engine.scene().is_alive(victim));
}

/// Destroys its own GameObject from Update and records what it observes
struct SelfDestruct {
    log: EventLog,
}

impl Component for SelfDestruct {
    const TYPE_NAME: &'static str = "SelfDestruct";
    const HOOKS: LifecycleHooks = LifecycleHooks::UPDATE
        .union(LifecycleHooks::LATE_UPDATE)
        .union(LifecycleHooks::ON_DESTROY);

    fn update(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
        ctx.destroy_self()?;
        self.log.borrow_mut().push("Update".into());
        Ok(())
    }

    fn late_update(&mut self, _ctx: &mut ScriptContext<'_>) -> ScriptResult {
        self.log.borrow_mut().push("LateUpdate".into());
        Ok(())
    }

    fn on_destroy(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
        let owner = ctx.game_object();
        let alive = ctx.scene().is_alive(owner);
        self.log.borrow_mut().push(format!("OnDestroy alive={alive}"));
        Ok(())
    }
}

#[test]
fn test_destroy_self_defers_on_destroy_until_callback_returns() {
    let (mut engine, native) = engine();
    let log = event_log();
    let handle = engine.create_game_object().unwrap();
    engine
        .scene_mut()
        .add_component_with(handle, SelfDestruct { log: log.clone() })
        .unwrap();

    step(&mut engine, &native, 0.0);
    assert_eq!(take(&log), vec!["Update", "OnDestroy alive=false"]);
    assert_eq!(native.entity_count(), 0);
}

/// Attaches a `Second` to its own GameObject on its first Update
struct Spawner {
    log: EventLog,
    spawned: bool,
}

impl Component for Spawner {
    const TYPE_NAME: &'static str = "Spawner";
    const HOOKS: LifecycleHooks = LifecycleHooks::UPDATE;

    fn update(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
        if !self.spawned {
            self.spawned = true;
            let owner = ctx.game_object();
            ctx.scene().add_component_with(owner, Second::new(&self.log))?;
        }
        Ok(())
    }
}

#[test]
fn test_component_added_mid_frame_starts_next_frame() {
    let (mut engine, native) = engine();
    let log = event_log();
    let handle = engine.create_game_object().unwrap();
    engine
        .scene_mut()
        .add_component_with(
            handle,
            Spawner {
                log: log.clone(),
                spawned: false,
            },
        )
        .unwrap();

    step(&mut engine, &native, FIXED_STEP);
    assert_eq!(take(&log), vec!["Second:Awake"]);

    step(&mut engine, &native, 0.0);
    assert_eq!(
        take(&log),
        vec!["Second:Start", "Second:Update", "Second:LateUpdate"]
    );
}

#[test]
fn test_disabled_components_skip_frame_callbacks() {
    let (mut engine, native) = engine();
    let log = event_log();
    let handle = engine.create_game_object().unwrap();
    let scene = engine.scene_mut();
    scene.add_component_with(handle, First::new(&log)).unwrap();
    scene.set_enabled::<First>(handle, false).unwrap();
    assert!(!scene.is_enabled::<First>(handle).unwrap());
    assert_eq!(take(&log), vec!["First:Awake", "First:OnDisable"]);

    step(&mut engine, &native, FIXED_STEP);
    assert!(take(&log).is_empty());

    let scene = engine.scene_mut();
    scene.set_enabled::<First>(handle, true).unwrap();
    // Enabling twice is a no-op
    scene.set_enabled::<First>(handle, true).unwrap();
    assert_eq!(take(&log), vec!["First:OnEnable"]);

    step(&mut engine, &native, 0.0);
    assert_eq!(
        take(&log),
        vec!["First:Start", "First:Update", "First:LateUpdate"]
    );
}

#[test]
fn test_remove_component_runs_on_destroy_and_keeps_siblings() {
    let (mut engine, native) = engine();
    let log = event_log();
    let handle = engine.create_game_object().unwrap();
    let scene = engine.scene_mut();
    scene.add_component_with(handle, First::new(&log)).unwrap();
    scene.add_component_with(handle, Second::new(&log)).unwrap();
    take(&log);

    engine.scene_mut().remove_component::<First>(handle).unwrap();
    assert_eq!(take(&log), vec!["First:OnDestroy"]);

    step(&mut engine, &native, 0.0);
    assert_eq!(
        take(&log),
        vec!["Second:Start", "Second:Update", "Second:LateUpdate"]
    );

    engine.destroy_game_object(handle).unwrap();
    assert_eq!(take(&log), vec!["Second:OnDestroy"]);
}

/// Records the delta it sees in each phase
#[derive(Default)]
struct DeltaProbe {
    update: Vec<f32>,
    fixed: Vec<f32>,
}

impl Component for DeltaProbe {
    const TYPE_NAME: &'static str = "DeltaProbe";
    const HOOKS: LifecycleHooks = LifecycleHooks::UPDATE.union(LifecycleHooks::FIXED_UPDATE);

    fn update(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
        self.update.push(ctx.delta_time());
        Ok(())
    }

    fn fixed_update(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
        self.fixed.push(ctx.delta_time());
        Ok(())
    }
}

#[test]
fn test_fixed_update_sees_fixed_delta() {
    let (mut engine, native) = engine();
    let handle = engine.create_game_object().unwrap();
    engine.scene_mut().add_component::<DeltaProbe>(handle).unwrap();

    step(&mut engine, &native, 0.75);
    let probe = engine.scene().get_component::<DeltaProbe>(handle).unwrap();
    assert_eq!(probe.update, vec![0.75]);
    assert_eq!(probe.fixed, vec![FIXED_STEP; 3]);
}

#[test]
fn test_time_scale_changes_delta_and_fixed_steps() {
    let (mut engine, native) = engine();
    let handle = engine.create_game_object().unwrap();
    engine.scene_mut().add_component::<DeltaProbe>(handle).unwrap();

    engine.set_time_scale(2.0);
    let report = step(&mut engine, &native, 0.25);
    assert_eq!(report.fixed_steps, 2);
    let probe = engine.scene().get_component::<DeltaProbe>(handle).unwrap();
    assert_eq!(probe.update, vec![0.5]);

    engine.set_time_scale(0.0);
    let report = step(&mut engine, &native, 0.25);
    assert_eq!(report.fixed_steps, 0);
}

#[test]
fn test_fixed_steps_are_capped_per_frame() {
    let (mut engine, native) = engine();
    let report = step(&mut engine, &native, 10.0);
    assert_eq!(report.fixed_steps, 4);
    assert_eq!(report.frame, 1);
}
