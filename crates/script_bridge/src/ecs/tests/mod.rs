//! Scenario tests driving the scene through the headless engine

mod input_frames;
mod lifecycle_ordering;
mod support;
mod transform_bridge;
