//! # Script Bridge
//!
//! A handle-based GameObject/Component model for gameplay scripts, backed by
//! a native engine through a typed function table.
//!
//! ## Features
//!
//! - **Handles, not pointers**: GameObjects are generational handles; stale
//!   handles fail with `InvalidHandle` instead of aliasing
//! - **Components**: one instance per type per GameObject, found by a stable
//!   type id derived from the component's declared name
//! - **Native transforms**: `Transform` reads and writes go straight to the
//!   engine with no bridge-side cache
//! - **Deterministic lifecycle**: Awake, Start, Update, FixedUpdate,
//!   LateUpdate and OnDestroy in a fixed order, with callback failures
//!   contained per component
//! - **Headless backend**: an in-process engine for tests and tools
//!
//! ## Quick Start
//!
//! ```rust
//! use script_bridge::prelude::*;
//!
//! #[derive(Default)]
//! struct Mover;
//!
//! impl Component for Mover {
//!     const TYPE_NAME: &'static str = "Mover";
//!     const HOOKS: LifecycleHooks = LifecycleHooks::UPDATE;
//!
//!     fn update(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
//!         let step = Vector3::FORWARD * ctx.delta_time();
//!         ctx.transform()?.translate(step)?;
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (mut engine, native) = Engine::headless(BridgeConfig::default())?;
//!
//!     let player = engine.create_game_object()?;
//!     engine.scene_mut().add_component::<Transform>(player)?;
//!     engine.scene_mut().add_component::<Mover>(player)?;
//!
//!     native.begin_frame(0.5);
//!     engine.tick();
//!
//!     let position = engine.scene_mut().transform(player)?.position()?;
//!     assert_eq!(position, Vector3::new(0.0, 0.0, 0.5));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod ecs;
pub mod foundation;
pub mod input;
pub mod native;

mod engine;

pub use engine::{Engine, EngineError};

/// Common imports for script authors
pub mod prelude {
    pub use crate::{
        core::config::{BridgeConfig, Config},
        ecs::{
            BridgeError, BridgeResult, Component, GameObjectHandle, LifecycleHooks, Phase, Scene,
            ScriptContext, ScriptError, ScriptResult, Transform, TransformProxy,
        },
        foundation::{
            math::{MathError, Quaternion, TransformData, Vector3},
            mathf,
        },
        input::{KeyCode, MouseButton},
        native::{HeadlessEngine, NativeEngine},
        Engine, EngineError,
    };
}
