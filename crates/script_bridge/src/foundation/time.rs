//! Frame timing
//!
//! The native engine owns the clock; [`FrameClock`] turns the raw per-frame
//! values it reports into a [`FrameTime`] snapshot, applying time scale and
//! the fixed-step accumulator that decides how many FixedUpdate passes run.

use crate::core::config::TimeConfig;

/// Timing values scripts see for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Scaled seconds since the previous frame
    pub delta_time: f32,
    /// Seconds since the previous frame as reported by the engine
    pub unscaled_delta_time: f32,
    /// Engine time at the start of this frame (monotonic)
    pub time: f32,
    /// Simulated step used by FixedUpdate
    pub fixed_delta_time: f32,
    /// Multiplier applied to the raw delta
    pub time_scale: f32,
    /// Index of this frame, starting at 1 for the first tick
    pub frame_count: u64,
    /// Number of FixedUpdate passes scheduled this frame
    pub fixed_steps: u32,
}

impl Default for FrameTime {
    fn default() -> Self {
        Self {
            delta_time: 0.0,
            unscaled_delta_time: 0.0,
            time: 0.0,
            fixed_delta_time: TimeConfig::default().fixed_delta_time,
            time_scale: 1.0,
            frame_count: 0,
            fixed_steps: 0,
        }
    }
}

/// Accumulating frame clock
#[derive(Debug, Clone)]
pub struct FrameClock {
    fixed_delta_time: f32,
    time_scale: f32,
    max_fixed_steps: u32,
    accumulator: f32,
    last_time: f32,
    frame_count: u64,
}

impl FrameClock {
    /// Create a clock from timing configuration
    pub fn new(config: &TimeConfig) -> Self {
        Self {
            fixed_delta_time: config.fixed_delta_time,
            time_scale: config.time_scale,
            max_fixed_steps: config.max_fixed_steps_per_frame,
            accumulator: 0.0,
            last_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance by one frame using the engine-reported delta and time
    pub fn advance(&mut self, raw_delta: f32, engine_time: f32) -> FrameTime {
        let unscaled = if raw_delta.is_finite() && raw_delta > 0.0 {
            raw_delta
        } else {
            0.0
        };

        let time = if engine_time < self.last_time {
            log::warn!(
                target: "script_bridge::time",
                "engine time went backwards ({engine_time} < {}), holding previous value",
                self.last_time
            );
            self.last_time
        } else {
            engine_time
        };
        self.last_time = time;

        let delta = unscaled * self.time_scale;
        self.accumulator += delta;

        let mut steps = 0;
        while self.accumulator >= self.fixed_delta_time && steps < self.max_fixed_steps {
            self.accumulator -= self.fixed_delta_time;
            steps += 1;
        }
        if steps == self.max_fixed_steps && self.accumulator >= self.fixed_delta_time {
            log::debug!(
                target: "script_bridge::time",
                "fixed step cap of {} reached, dropping {:.4}s of simulation",
                self.max_fixed_steps,
                self.accumulator
            );
            self.accumulator %= self.fixed_delta_time;
        }

        self.frame_count += 1;
        FrameTime {
            delta_time: delta,
            unscaled_delta_time: unscaled,
            time,
            fixed_delta_time: self.fixed_delta_time,
            time_scale: self.time_scale,
            frame_count: self.frame_count,
            fixed_steps: steps,
        }
    }

    /// Change the time scale; negative values are treated as zero
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale.max(0.0);
    }

    /// Current time scale
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Frames advanced so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
