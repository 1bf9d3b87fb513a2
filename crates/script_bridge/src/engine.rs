//! Bridge entry point
//!
//! [`Engine`] ties a [`Scene`] to its [`LifecycleDriver`] and owns the
//! configuration both were built from.

use crate::core::config::{BridgeConfig, ConfigError};
use crate::ecs::{BridgeResult, FrameReport, GameObjectHandle, LifecycleDriver, Scene};
use crate::native::{HeadlessEngine, NativeEngine};
use thiserror::Error;

/// Script runtime on top of a native engine
pub struct Engine {
    scene: Scene,
    driver: LifecycleDriver,
    config: BridgeConfig,
    shut_down: bool,
}

impl Engine {
    /// Create an engine around a native function table
    pub fn new(config: BridgeConfig, native: Box<dyn NativeEngine>) -> Result<Self, EngineError> {
        config.validate()?;
        let time = native.time_get_time();
        if !time.is_finite() {
            return Err(EngineError::InitializationFailed(format!(
                "native clock reports non-finite time {time}"
            )));
        }
        log::info!(
            "Initializing script bridge (fixed step {}s, time scale {})",
            config.time.fixed_delta_time,
            config.time.time_scale
        );

        let scene = Scene::new(native, &config.registry);
        let driver = LifecycleDriver::new(&config.time);

        Ok(Self {
            scene,
            driver,
            config,
            shut_down: false,
        })
    }

    /// Create an engine on the in-process headless backend
    ///
    /// The returned [`HeadlessEngine`] shares state with the one the bridge
    /// uses, so it can drive time and input.
    pub fn headless(config: BridgeConfig) -> Result<(Self, HeadlessEngine), EngineError> {
        let native = HeadlessEngine::from_config(&config.native);
        let engine = Self::new(config, Box::new(native.clone()))?;
        Ok((engine, native))
    }

    /// Active configuration
    pub const fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The scene
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene, mutably
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Run one frame of lifecycle callbacks
    pub fn tick(&mut self) -> FrameReport {
        if self.shut_down {
            log::warn!("tick after shutdown ignored");
            return FrameReport::default();
        }
        self.driver.tick(&mut self.scene)
    }

    /// Create a GameObject
    pub fn create_game_object(&mut self) -> BridgeResult<GameObjectHandle> {
        self.scene.create()
    }

    /// Destroy a GameObject, running OnDestroy for its components
    pub fn destroy_game_object(&mut self, handle: GameObjectHandle) -> BridgeResult<()> {
        self.scene.destroy(handle)?;
        self.scene.flush_pending();
        Ok(())
    }

    /// Change the time scale applied to subsequent frames
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.driver.set_time_scale(time_scale);
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.driver.frame_count()
    }

    /// Destroy every GameObject, delivering OnDestroy to each component
    ///
    /// Further ticks are ignored. Calling this twice is harmless.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        log::info!("Shutting down script bridge ({} GameObjects)", self.scene.len());
        self.scene.destroy_all();
        self.shut_down = true;
    }

    /// Whether [`Engine::shutdown`] has run
    pub const fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine initialization failed
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Configuration was rejected
    #[error(transparent)]
    Config(#[from] ConfigError),
}
