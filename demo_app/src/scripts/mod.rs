//! Gameplay scripts driven by the demo

pub mod health_manager;
pub mod player_controller;

pub use health_manager::HealthManager;
pub use player_controller::PlayerController;
