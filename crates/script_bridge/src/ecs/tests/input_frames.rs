//! Polled input and debug output as scripts see them

use super::support::{engine, step};
use crate::ecs::{Component, LifecycleHooks, ScriptContext, ScriptResult};
use crate::input::{KeyCode, MouseButton};
use crate::native::DebugLevel;

/// Records (held, down, up) for the space bar every frame
#[derive(Default)]
struct SpaceWatcher {
    frames: Vec<(bool, bool, bool)>,
    mouse: Vec<(f32, f32, bool)>,
}

impl Component for SpaceWatcher {
    const TYPE_NAME: &'static str = "SpaceWatcher";
    const HOOKS: LifecycleHooks = LifecycleHooks::UPDATE.union(LifecycleHooks::LATE_UPDATE);

    fn update(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
        let input = ctx.input();
        self.frames.push((
            input.get_key(KeyCode::Space),
            input.get_key_down(KeyCode::Space),
            input.get_key_up(KeyCode::Space),
        ));
        Ok(())
    }

    fn late_update(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
        let input = ctx.input();
        self.mouse.push((
            input.mouse_x(),
            input.mouse_y(),
            input.get_mouse_button(MouseButton::Left),
        ));
        Ok(())
    }
}

#[test]
fn test_key_down_and_up_last_exactly_one_frame() {
    let (mut engine, native) = engine();
    let handle = engine.create_game_object().unwrap();
    engine.scene_mut().add_component::<SpaceWatcher>(handle).unwrap();

    native.press_key(KeyCode::Space);
    step(&mut engine, &native, 0.1);
    step(&mut engine, &native, 0.1);
    native.release_key(KeyCode::Space);
    step(&mut engine, &native, 0.1);
    step(&mut engine, &native, 0.1);

    let watcher = engine.scene().get_component::<SpaceWatcher>(handle).unwrap();
    assert_eq!(
        watcher.frames,
        vec![
            (true, true, false),
            (true, false, false),
            (false, false, true),
            (false, false, false),
        ]
    );
}

#[test]
fn test_mouse_state_is_captured_per_frame() {
    let (mut engine, native) = engine();
    let handle = engine.create_game_object().unwrap();
    engine.scene_mut().add_component::<SpaceWatcher>(handle).unwrap();

    native.set_mouse_position(320.0, 240.0);
    native.set_mouse_button(MouseButton::Left, true);
    step(&mut engine, &native, 0.1);
    native.set_mouse_position(0.0, 16.0);
    native.set_mouse_button(MouseButton::Left, false);
    step(&mut engine, &native, 0.1);

    let watcher = engine.scene().get_component::<SpaceWatcher>(handle).unwrap();
    assert_eq!(watcher.mouse, vec![(320.0, 240.0, true), (0.0, 16.0, false)]);
}

/// Reports through each debug channel once
#[derive(Default)]
struct Chatty;

impl Component for Chatty {
    const TYPE_NAME: &'static str = "Chatty";
    const HOOKS: LifecycleHooks = LifecycleHooks::START;

    fn start(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
        let debug = ctx.debug();
        debug.log(format_args!("started on frame {}", ctx.time().frame_count));
        debug.log_warning("careful");
        debug.log_error("broken");
        Ok(())
    }
}

#[test]
fn test_debug_output_reaches_the_engine() {
    let (mut engine, native) = engine();
    let handle = engine.create_game_object().unwrap();
    engine.scene_mut().add_component::<Chatty>(handle).unwrap();
    step(&mut engine, &native, 0.1);

    assert_eq!(
        native.logged_messages(),
        vec![
            (DebugLevel::Info, "started on frame 1".to_string()),
            (DebugLevel::Warning, "careful".to_string()),
            (DebugLevel::Error, "broken".to_string()),
        ]
    );
}
