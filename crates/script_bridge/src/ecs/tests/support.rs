//! Shared fixtures: an engine with exact fixed steps and components that
//! record every callback they receive

use crate::core::config::BridgeConfig;
use crate::ecs::{Component, LifecycleHooks, ScriptContext, ScriptResult};
use crate::native::HeadlessEngine;
use crate::Engine;
use std::cell::RefCell;
use std::rc::Rc;

/// Fixed step used by [`engine`]; a power of two so step counts are exact
pub const FIXED_STEP: f32 = 0.25;

pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn engine() -> (Engine, HeadlessEngine) {
    let mut config = BridgeConfig::default();
    config.time.fixed_delta_time = FIXED_STEP;
    config.time.max_fixed_steps_per_frame = 4;
    Engine::headless(config).unwrap()
}

/// Advance the headless clock by `delta_time` and run one frame
pub fn step(engine: &mut Engine, native: &HeadlessEngine, delta_time: f32) -> crate::ecs::FrameReport {
    native.begin_frame(delta_time);
    engine.tick()
}

macro_rules! recorder {
    ($name:ident) => {
        pub struct $name {
            pub log: EventLog,
        }

        impl $name {
            pub fn new(log: &EventLog) -> Self {
                Self { log: log.clone() }
            }

            fn record(&self, ctx: &ScriptContext<'_>) -> ScriptResult {
                self.log
                    .borrow_mut()
                    .push(format!("{}:{}", stringify!($name), ctx.phase()));
                Ok(())
            }
        }

        impl Component for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const HOOKS: LifecycleHooks = LifecycleHooks::all();

            fn awake(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
                self.record(ctx)
            }

            fn start(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
                self.record(ctx)
            }

            fn update(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
                self.record(ctx)
            }

            fn fixed_update(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
                self.record(ctx)
            }

            fn late_update(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
                self.record(ctx)
            }

            fn on_destroy(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
                self.record(ctx)
            }

            fn on_enable(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
                self.record(ctx)
            }

            fn on_disable(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
                self.record(ctx)
            }
        }
    };
}

recorder!(First);
recorder!(Second);

/// Drain the log
pub fn take(log: &EventLog) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}
