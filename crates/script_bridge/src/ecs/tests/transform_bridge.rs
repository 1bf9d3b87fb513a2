//! Transform reads and writes through the native engine

use super::support::{engine, step};
use crate::ecs::{BridgeError, Component, LifecycleHooks, ScriptContext, ScriptResult, Transform};
use crate::foundation::math::{Quaternion, TransformData, Vector3};
use crate::foundation::mathf;
use crate::native::NativeEngine;
use approx::assert_relative_eq;

#[test]
fn test_new_transform_has_identity_values() {
    let (mut engine, _native) = engine();
    let handle = engine.create_game_object().unwrap();
    let scene = engine.scene_mut();
    scene.add_component::<Transform>(handle).unwrap();

    let transform = scene.transform(handle).unwrap();
    assert_eq!(transform.position().unwrap(), Vector3::ZERO);
    assert_eq!(transform.rotation().unwrap(), Quaternion::IDENTITY);
    assert_eq!(transform.scale().unwrap(), Vector3::ONE);
    assert_eq!(transform.snapshot().unwrap(), TransformData::default());
}

#[test]
fn test_position_round_trip() {
    let (mut engine, _native) = engine();
    let handle = engine.create_game_object().unwrap();
    let scene = engine.scene_mut();
    scene.add_component::<Transform>(handle).unwrap();

    let target = Vector3::new(1.5, -2.25, 1.0e6);
    scene.transform(handle).unwrap().set_position(target).unwrap();
    assert_eq!(scene.transform(handle).unwrap().position().unwrap(), target);

    let scale = Vector3::new(2.0, 0.5, 3.0);
    scene.transform(handle).unwrap().set_scale(scale).unwrap();
    assert_eq!(scene.transform(handle).unwrap().scale().unwrap(), scale);
}

#[test]
fn test_basis_vectors_at_identity() {
    let (mut engine, _native) = engine();
    let handle = engine.create_game_object().unwrap();
    let scene = engine.scene_mut();
    scene.add_component::<Transform>(handle).unwrap();

    let transform = scene.transform(handle).unwrap();
    assert_eq!(transform.forward().unwrap(), Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(transform.right().unwrap(), Vector3::new(1.0, 0.0, 0.0));
    assert_eq!(transform.up().unwrap(), Vector3::new(0.0, 1.0, 0.0));
}

#[test]
fn test_basis_vectors_follow_rotation() {
    let (mut engine, _native) = engine();
    let handle = engine.create_game_object().unwrap();
    let scene = engine.scene_mut();
    scene.add_component::<Transform>(handle).unwrap();

    let mut transform = scene.transform(handle).unwrap();
    let quarter_turn = Quaternion::from_axis_angle(Vector3::UP, 90.0 * mathf::DEG2RAD).unwrap();
    transform.set_rotation(quarter_turn).unwrap();

    assert_relative_eq!(transform.forward().unwrap(), Vector3::RIGHT, epsilon = 1e-6);
    assert_relative_eq!(transform.right().unwrap(), Vector3::BACK, epsilon = 1e-6);
    assert_relative_eq!(transform.up().unwrap(), Vector3::UP, epsilon = 1e-6);
}

#[test]
fn test_reads_are_never_cached() {
    let (mut engine, native) = engine();
    let handle = engine.create_game_object().unwrap();
    let scene = engine.scene_mut();
    scene.add_component::<Transform>(handle).unwrap();
    let native_handle = scene.native_handle(handle).unwrap();

    // A write made directly on the engine side is visible immediately
    let mut engine_side = native.clone();
    engine_side
        .transform_set_position(native_handle, 4.0, 5.0, 6.0)
        .unwrap();
    assert_eq!(
        scene.transform(handle).unwrap().position().unwrap(),
        Vector3::new(4.0, 5.0, 6.0)
    );
}

#[test]
fn test_translate_rotate_and_look_at() {
    let (mut engine, _native) = engine();
    let handle = engine.create_game_object().unwrap();
    let scene = engine.scene_mut();
    scene.add_component::<Transform>(handle).unwrap();
    let mut transform = scene.transform(handle).unwrap();

    transform.translate(Vector3::new(1.0, 0.0, 0.0)).unwrap();
    transform.translate(Vector3::new(0.0, 2.0, 0.0)).unwrap();
    assert_eq!(transform.position().unwrap(), Vector3::new(1.0, 2.0, 0.0));

    let eighth = Quaternion::from_axis_angle(Vector3::UP, mathf::PI / 4.0).unwrap();
    transform.rotate(eighth).unwrap();
    transform.rotate(eighth).unwrap();
    assert_relative_eq!(transform.forward().unwrap(), Vector3::RIGHT, epsilon = 1e-6);

    transform
        .look_at(Vector3::new(1.0, 2.0, -5.0), Vector3::UP)
        .unwrap();
    assert_relative_eq!(transform.forward().unwrap(), Vector3::BACK, epsilon = 1e-6);

    let err = transform.look_at(Vector3::new(1.0, 9.0, 0.0), Vector3::UP).unwrap_err();
    assert!(matches!(err, BridgeError::Math(_)));
}

#[test]
fn test_transform_point_uses_native_values() {
    let (mut engine, _native) = engine();
    let handle = engine.create_game_object().unwrap();
    let scene = engine.scene_mut();
    scene.add_component::<Transform>(handle).unwrap();
    let mut transform = scene.transform(handle).unwrap();
    transform.set_position(Vector3::new(10.0, 0.0, 0.0)).unwrap();
    transform.set_scale(Vector3::new(2.0, 2.0, 2.0)).unwrap();

    assert_relative_eq!(
        transform.transform_point(Vector3::new(0.0, 0.0, 1.0)).unwrap(),
        Vector3::new(10.0, 0.0, 2.0)
    );
}

/// Moves forward at a fixed speed on every fixed step
#[derive(Default)]
struct Glider;

impl Component for Glider {
    const TYPE_NAME: &'static str = "Glider";
    const HOOKS: LifecycleHooks = LifecycleHooks::FIXED_UPDATE;

    fn fixed_update(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
        let step = Vector3::FORWARD * (4.0 * ctx.delta_time());
        ctx.transform()?.translate(step)?;
        Ok(())
    }
}

#[test]
fn test_script_moves_its_own_transform() {
    let (mut engine, native) = engine();
    let handle = engine.create_game_object().unwrap();
    engine.scene_mut().add_component::<Transform>(handle).unwrap();
    engine.scene_mut().add_component::<Glider>(handle).unwrap();

    // Two fixed steps of 0.25s at 4 units per second
    step(&mut engine, &native, 0.5);
    let position = engine.scene_mut().transform(handle).unwrap().position().unwrap();
    assert_eq!(position, Vector3::new(0.0, 0.0, 2.0));
}

#[test]
fn test_script_without_transform_faults() {
    let (mut engine, native) = engine();
    let handle = engine.create_game_object().unwrap();
    engine.scene_mut().add_component::<Glider>(handle).unwrap();

    let report = step(&mut engine, &native, 0.25);
    assert_eq!(report.faults, 1);
}
