//! Script bridge demo
//!
//! Runs a player with movement and health scripts against the headless
//! engine, feeding it a short scripted sequence of key and mouse input.
//!
//! Usage: `bridge_demo [config.toml|config.ron]`

mod scripts;

use script_bridge::prelude::*;
use scripts::{HealthManager, PlayerController};
use thiserror::Error;

/// Frame delta fed to the headless engine (60 Hz)
const FRAME_TIME: f32 = 1.0 / 60.0;

#[derive(Debug, Error)]
enum DemoError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] script_bridge::config::ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// One step of the input script: what changes before the frames run
enum InputEvent {
    Press(KeyCode),
    Release(KeyCode),
    Mouse(f32, f32),
}

/// (input change, frames to run afterwards)
const SEQUENCE: &[(Option<InputEvent>, u32)] = &[
    (None, 10),
    (Some(InputEvent::Press(KeyCode::W)), 30),
    (Some(InputEvent::Mouse(8.0, 3.0)), 20),
    (Some(InputEvent::Release(KeyCode::W)), 5),
    (Some(InputEvent::Press(KeyCode::Space)), 1),
    (Some(InputEvent::Release(KeyCode::Space)), 45),
    (Some(InputEvent::Press(KeyCode::H)), 1),
    (Some(InputEvent::Release(KeyCode::H)), 1),
    (Some(InputEvent::Press(KeyCode::H)), 1),
    (Some(InputEvent::Release(KeyCode::H)), 130),
    (Some(InputEvent::Press(KeyCode::T)), 1),
    (Some(InputEvent::Release(KeyCode::T)), 5),
];

fn load_config() -> Result<BridgeConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => Ok(BridgeConfig::load_from_file(path)?),
        None => Ok(BridgeConfig::default()),
    }
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    script_bridge::foundation::logging::init_with_level(&config.logging.log_level);
    log::info!("Starting script bridge demo...");

    let (mut engine, native) = Engine::headless(config)?;

    let player = engine.create_game_object()?;
    let scene = engine.scene_mut();
    if !scene.has_component::<Transform>(player)? {
        scene.add_component::<Transform>(player)?;
    }
    scene.add_component::<PlayerController>(player)?;
    scene.add_component::<HealthManager>(player)?;
    log::info!("Player {player} has {:?}", scene.component_names(player)?);

    let mut faults = 0;
    for (event, frames) in SEQUENCE {
        match event {
            Some(InputEvent::Press(key)) => native.press_key(*key),
            Some(InputEvent::Release(key)) => native.release_key(*key),
            Some(InputEvent::Mouse(x, y)) => native.set_mouse_position(*x, *y),
            None => {}
        }

        for _ in 0..*frames {
            native.begin_frame(FRAME_TIME);
            let report = engine.tick();
            faults += report.faults;
            log::trace!("{report:?}");
        }

        let frame = engine.frame_count();
        let scene = engine.scene_mut();
        let position = scene.transform(player)?.position()?;
        let controller = scene.get_component::<PlayerController>(player)?;
        let (grounded, vertical) = (controller.is_grounded(), controller.vertical_velocity());
        let health = scene.get_component::<HealthManager>(player)?;
        log::info!(
            "frame {:>4}: position ({:.2}, {:.2}, {:.2}) grounded={grounded} vy={vertical:.2} health={:.0}% invulnerable={}",
            frame,
            position.x,
            position.y,
            position.z,
            health.health_percentage() * 100.0,
            health.is_invulnerable(),
        );
    }

    engine.shutdown();
    log::info!(
        "Demo finished after {} frames, {faults} script faults, {} messages from scripts",
        engine.frame_count(),
        native.logged_messages().len()
    );
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        log::error!("{err}");
        eprintln!("bridge_demo: {err}");
        std::process::exit(1);
    }
}
