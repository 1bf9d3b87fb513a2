//! GameObject/Component model
//!
//! Scripts see GameObjects as opaque handles and attach components to them.
//! The [`Scene`] owns the handle registry and every component instance; the
//! [`LifecycleDriver`] delivers Awake, Start, Update, FixedUpdate,
//! LateUpdate and OnDestroy in a deterministic order.

pub mod component;
pub mod components;
pub mod context;
pub mod entity;
pub mod error;
pub mod lifecycle;
pub mod scheduler;
pub mod world;

#[cfg(test)]
mod tests;

pub use component::{Component, ComponentTypeId, LifecycleHooks};
pub use components::{Transform, TransformProxy};
pub use context::{DebugLog, ScriptContext};
pub use entity::GameObjectHandle;
pub use error::{BridgeError, BridgeResult, ScriptError, ScriptResult};
pub use lifecycle::{LifecycleState, Phase};
pub use scheduler::{FrameReport, LifecycleDriver};
pub use world::{FrameStats, Scene};
