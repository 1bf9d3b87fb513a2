//! Per-callback script context
//!
//! Everything a script used to reach through globals (the owning object,
//! time, input, debug output) is handed to each callback explicitly.

use super::component::Component;
use super::components::TransformProxy;
use super::entity::GameObjectHandle;
use super::error::BridgeResult;
use super::lifecycle::Phase;
use super::world::Scene;
use crate::foundation::time::FrameTime;
use crate::input::InputSnapshot;
use crate::native::{DebugLevel, NativeEngine};
use std::fmt;

/// Access to the scene from inside a lifecycle callback
pub struct ScriptContext<'a> {
    scene: &'a mut Scene,
    game_object: GameObjectHandle,
    phase: Phase,
}

impl<'a> ScriptContext<'a> {
    pub(crate) fn new(scene: &'a mut Scene, game_object: GameObjectHandle, phase: Phase) -> Self {
        Self {
            scene,
            game_object,
            phase,
        }
    }

    /// GameObject that owns the running component
    ///
    /// Already invalid during OnDestroy.
    pub const fn game_object(&self) -> GameObjectHandle {
        self.game_object
    }

    /// Callback being delivered
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Timing of the current frame
    pub fn time(&self) -> FrameTime {
        *self.scene.frame()
    }

    /// Seconds to integrate over: the fixed step inside FixedUpdate, the
    /// scaled frame delta everywhere else
    pub fn delta_time(&self) -> f32 {
        let frame = self.scene.frame();
        if self.phase == Phase::FixedUpdate {
            frame.fixed_delta_time
        } else {
            frame.delta_time
        }
    }

    /// Input captured at the start of the frame
    pub fn input(&self) -> &InputSnapshot {
        self.scene.input()
    }

    /// Debug output routed through the native engine
    pub fn debug(&self) -> DebugLog<'_> {
        DebugLog {
            native: self.scene.native(),
        }
    }

    /// The whole scene
    pub fn scene(&mut self) -> &mut Scene {
        self.scene
    }

    /// Transform of the owning GameObject
    pub fn transform(&mut self) -> BridgeResult<TransformProxy<'_>> {
        self.scene.transform(self.game_object)
    }

    /// Sibling component on the owning GameObject
    pub fn get_component<T: Component>(&self) -> BridgeResult<&T> {
        self.scene.get_component::<T>(self.game_object)
    }

    /// Sibling component on the owning GameObject, mutably
    pub fn get_component_mut<T: Component>(&mut self) -> BridgeResult<&mut T> {
        self.scene.get_component_mut::<T>(self.game_object)
    }

    /// Whether the owning GameObject has a reachable `T`
    pub fn has_component<T: Component>(&self) -> BridgeResult<bool> {
        self.scene.has_component::<T>(self.game_object)
    }

    /// Attach a component to the owning GameObject
    pub fn add_component<T: Component + Default>(&mut self) -> BridgeResult<&mut T> {
        self.scene.add_component::<T>(self.game_object)
    }

    /// Detach a component from the owning GameObject
    pub fn remove_component<T: Component>(&mut self) -> BridgeResult<()> {
        self.scene.remove_component::<T>(self.game_object)
    }

    /// Create a GameObject
    pub fn create(&mut self) -> BridgeResult<GameObjectHandle> {
        self.scene.create()
    }

    /// Destroy a GameObject; OnDestroy runs after this callback returns
    pub fn destroy(&mut self, handle: GameObjectHandle) -> BridgeResult<()> {
        self.scene.destroy(handle)
    }

    /// Destroy the owning GameObject
    pub fn destroy_self(&mut self) -> BridgeResult<()> {
        self.scene.destroy(self.game_object)
    }
}

/// `Debug.Log` sink
pub struct DebugLog<'a> {
    native: &'a dyn NativeEngine,
}

impl DebugLog<'_> {
    /// Informational message
    pub fn log(&self, message: impl fmt::Display) {
        self.native.debug_log(DebugLevel::Info, &message.to_string());
    }

    /// Warning
    pub fn log_warning(&self, message: impl fmt::Display) {
        self.native.debug_log(DebugLevel::Warning, &message.to_string());
    }

    /// Error
    pub fn log_error(&self, message: impl fmt::Display) {
        self.native.debug_log(DebugLevel::Error, &message.to_string());
    }
}
