//! Native engine call surface
//!
//! Everything the bridge needs from the engine goes through the
//! [`NativeEngine`] function table. Calls are synchronous, fixed-arity and
//! keyed by opaque [`NativeHandle`]s and stable [`TypeTag`]s; nothing in this
//! layer depends on a particular calling convention.

pub mod headless;

pub use headless::HeadlessEngine;

use crate::input::{KeyCode, MouseButton};
use std::fmt;
use thiserror::Error;

/// Opaque identifier of an engine-side entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(u64);

impl NativeHandle {
    /// Wrap a raw value produced by the engine
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value to hand back to the engine
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "native#{:x}", self.0)
    }
}

/// Stable identifier of a component type as the engine sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag {
    /// Hash of the component's declared type name
    pub id: u64,
    /// Declared type name
    pub name: &'static str,
}

/// Type name the engine treats as the built-in Transform
pub const TRANSFORM_TYPE_NAME: &str = "Transform";

/// Engine-side reference to an attached component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentRef(pub u64);

/// Severity for `debug_log`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugLevel {
    /// `Debug.Log`
    Info,
    /// `Debug.LogWarning`
    Warning,
    /// `Debug.LogError`
    Error,
}

impl From<DebugLevel> for log::Level {
    fn from(level: DebugLevel) -> Self {
        match level {
            DebugLevel::Info => Self::Info,
            DebugLevel::Warning => Self::Warn,
            DebugLevel::Error => Self::Error,
        }
    }
}

/// Failures reported by the native engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NativeError {
    /// The handle does not name a live entity
    #[error("unknown native handle {0}")]
    UnknownHandle(NativeHandle),

    /// No more entities can be allocated
    #[error("native engine is at capacity ({capacity} entities)")]
    CapacityExceeded {
        /// Maximum number of live entities
        capacity: usize,
    },

    /// The entity has no component of this type
    #[error("component {component} is not attached to {handle}")]
    ComponentMissing {
        /// Entity queried
        handle: NativeHandle,
        /// Component type name
        component: &'static str,
    },

    /// The entity already has a component of this type
    #[error("component {component} is already attached to {handle}")]
    ComponentAlreadyPresent {
        /// Entity queried
        handle: NativeHandle,
        /// Component type name
        component: &'static str,
    },
}

/// Result of a native call
pub type NativeResult<T> = Result<T, NativeError>;

/// Function table implemented by the native engine
pub trait NativeEngine {
    /// `GameObject_Create`
    fn game_object_create(&mut self) -> NativeResult<NativeHandle>;

    /// `GameObject_Destroy`
    fn game_object_destroy(&mut self, handle: NativeHandle) -> NativeResult<()>;

    /// `GameObject_AddComponent`
    fn game_object_add_component(
        &mut self,
        handle: NativeHandle,
        tag: TypeTag,
    ) -> NativeResult<ComponentRef>;

    /// `GameObject_GetComponent`; `Ok(None)` when not attached
    fn game_object_get_component(
        &self,
        handle: NativeHandle,
        tag: TypeTag,
    ) -> NativeResult<Option<ComponentRef>>;

    /// `GameObject_HasComponent`
    fn game_object_has_component(&self, handle: NativeHandle, tag: TypeTag) -> NativeResult<bool> {
        Ok(self.game_object_get_component(handle, tag)?.is_some())
    }

    /// Detach a component
    fn game_object_remove_component(&mut self, handle: NativeHandle, tag: TypeTag) -> NativeResult<()>;

    /// `Transform_GetPosition`
    fn transform_get_position(&self, handle: NativeHandle) -> NativeResult<(f32, f32, f32)>;

    /// `Transform_SetPosition`
    fn transform_set_position(&mut self, handle: NativeHandle, x: f32, y: f32, z: f32) -> NativeResult<()>;

    /// `Transform_GetRotation`
    fn transform_get_rotation(&self, handle: NativeHandle) -> NativeResult<(f32, f32, f32, f32)>;

    /// `Transform_SetRotation`
    fn transform_set_rotation(
        &mut self,
        handle: NativeHandle,
        x: f32,
        y: f32,
        z: f32,
        w: f32,
    ) -> NativeResult<()>;

    /// `Transform_GetScale`
    fn transform_get_scale(&self, handle: NativeHandle) -> NativeResult<(f32, f32, f32)>;

    /// `Transform_SetScale`
    fn transform_set_scale(&mut self, handle: NativeHandle, x: f32, y: f32, z: f32) -> NativeResult<()>;

    /// `Time_GetDeltaTime`
    fn time_get_delta_time(&self) -> f32;

    /// `Time_GetTime`; monotonic non-decreasing
    fn time_get_time(&self) -> f32;

    /// `Input_GetKey`
    fn input_get_key(&self, key: KeyCode) -> bool;

    /// `Input_GetKeyDown`; true for exactly one polled frame per press
    fn input_get_key_down(&self, key: KeyCode) -> bool;

    /// `Input_GetKeyUp`; true for exactly one polled frame per release
    fn input_get_key_up(&self, key: KeyCode) -> bool;

    /// `Input_GetMouseButton`
    fn input_get_mouse_button(&self, button: MouseButton) -> bool;

    /// `Input_GetMouseX`
    fn input_get_mouse_x(&self) -> f32;

    /// `Input_GetMouseY`
    fn input_get_mouse_y(&self) -> f32;

    /// `Debug_Log` / `Debug_LogWarning` / `Debug_LogError`; must not fail
    fn debug_log(&self, level: DebugLevel, message: &str);
}
