//! Lifecycle scheduling
//!
//! Runs one frame of script callbacks in a fixed order:
//!
//! 1. finish destroys left over from outside the frame
//! 2. advance the clock and poll input
//! 3. Start pass
//! 4. Update pass
//! 5. FixedUpdate pass, once per fixed step the clock scheduled
//! 6. LateUpdate pass
//!
//! Each pass walks a snapshot of the slots taken when the pass begins, so
//! components attached during a pass are first seen by the next pass that
//! accepts their state. A component attached mid-frame gets its Start on the
//! following frame.

use super::lifecycle::{LifecycleState, Phase};
use super::world::Scene;
use crate::core::config::TimeConfig;
use crate::foundation::time::FrameClock;
use crate::input::InputSnapshot;

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame index, starting at 1
    pub frame: u64,
    /// FixedUpdate passes run
    pub fixed_steps: u32,
    /// Callbacks delivered
    pub callbacks: usize,
    /// Callbacks that returned an error or panicked
    pub faults: usize,
    /// Scheduled callbacks dropped because their target went away
    pub skipped: usize,
    /// GameObjects destroyed during the frame
    pub destroyed: usize,
}

/// Drives lifecycle passes over a [`Scene`]
#[derive(Debug, Clone)]
pub struct LifecycleDriver {
    clock: FrameClock,
}

impl LifecycleDriver {
    /// Create a driver with the given timing
    pub fn new(config: &TimeConfig) -> Self {
        Self {
            clock: FrameClock::new(config),
        }
    }

    /// Change the time scale applied to subsequent frames
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.clock.set_time_scale(time_scale);
    }

    /// Current time scale
    pub fn time_scale(&self) -> f32 {
        self.clock.time_scale()
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }

    /// Run one frame
    pub fn tick(&mut self, scene: &mut Scene) -> FrameReport {
        scene.flush_pending();

        let native = scene.native();
        let frame = self
            .clock
            .advance(native.time_get_delta_time(), native.time_get_time());
        let input = InputSnapshot::capture(native);
        scene.begin_frame(frame, input);

        Self::run_pass(scene, Phase::Start);
        Self::run_pass(scene, Phase::Update);
        for _ in 0..frame.fixed_steps {
            Self::run_pass(scene, Phase::FixedUpdate);
        }
        Self::run_pass(scene, Phase::LateUpdate);

        let stats = scene.end_frame();
        let report = FrameReport {
            frame: frame.frame_count,
            fixed_steps: frame.fixed_steps,
            callbacks: stats.callbacks,
            faults: stats.faults,
            skipped: stats.skipped,
            destroyed: stats.destroyed,
        };

        if report.faults > 0 {
            log::warn!(
                target: "script_bridge::scheduler",
                "frame {} finished with {} faulted callback(s)",
                report.frame,
                report.faults
            );
        }
        log::trace!(target: "script_bridge::scheduler", "{report:?}");
        report
    }

    fn run_pass(scene: &mut Scene, phase: Phase) {
        for (target, hooks) in scene.slot_targets() {
            let Some(status) = scene.slot_status(target) else {
                if hooks.contains(phase.hook()) {
                    scene.note_skipped();
                }
                continue;
            };
            if !status.enabled {
                continue;
            }

            match phase {
                Phase::Start => {
                    if status.state != LifecycleState::AwakeDone {
                        continue;
                    }
                    scene.set_slot_state(target, LifecycleState::Started);
                }
                Phase::Update | Phase::FixedUpdate | Phase::LateUpdate => {
                    if !status.state.is_ticking() {
                        continue;
                    }
                }
                Phase::Awake | Phase::OnDestroy | Phase::OnEnable | Phase::OnDisable => continue,
            }

            if status.hooks.contains(phase.hook()) {
                scene.dispatch(target, phase);
            }

            if phase == Phase::Update && status.state == LifecycleState::Started {
                scene.set_slot_state(target, LifecycleState::Active);
            }
        }
    }
}
