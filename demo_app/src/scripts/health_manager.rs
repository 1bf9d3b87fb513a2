//! Health with a short invulnerability window after each hit

use script_bridge::prelude::*;

/// Where the player reappears after dying
const RESPAWN_POSITION: Vector3 = Vector3::new(0.0, 1.0, 0.0);

/// Result of [`HealthManager::apply_damage`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Ignored while invulnerable
    Blocked,
    Damaged { health: f32 },
    /// Health reached zero and was reset to the maximum
    Died,
}

#[derive(Debug, Clone)]
pub struct HealthManager {
    pub max_health: f32,
    pub current_health: f32,
    pub invulnerability_time: f32,
    invulnerable: bool,
    invulnerability_timer: f32,
}

impl Default for HealthManager {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            current_health: 0.0,
            invulnerability_time: 2.0,
            invulnerable: false,
            invulnerability_timer: 0.0,
        }
    }
}

impl HealthManager {
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    /// Current health as a fraction of the maximum
    pub fn health_percentage(&self) -> f32 {
        self.current_health / self.max_health
    }

    pub fn apply_damage(&mut self, damage: f32) -> DamageOutcome {
        if self.invulnerable {
            return DamageOutcome::Blocked;
        }

        self.current_health = mathf::clamp(self.current_health - damage, 0.0, self.max_health);
        if damage > 0.0 {
            self.invulnerable = true;
            self.invulnerability_timer = self.invulnerability_time;
        }

        if self.current_health <= 0.0 {
            self.current_health = self.max_health;
            DamageOutcome::Died
        } else {
            DamageOutcome::Damaged {
                health: self.current_health,
            }
        }
    }

    /// Returns the new health
    pub fn heal(&mut self, amount: f32) -> f32 {
        self.current_health = mathf::clamp(self.current_health + amount, 0.0, self.max_health);
        self.current_health
    }

    /// Count down the invulnerability window; true on the frame it closes
    fn tick_invulnerability(&mut self, delta_time: f32) -> bool {
        if !self.invulnerable || self.invulnerability_timer <= 0.0 {
            return false;
        }
        self.invulnerability_timer -= delta_time;
        if self.invulnerability_timer <= 0.0 {
            self.invulnerable = false;
            return true;
        }
        false
    }

    fn take_damage(&mut self, ctx: &mut ScriptContext<'_>, damage: f32) -> ScriptResult {
        match self.apply_damage(damage) {
            DamageOutcome::Blocked => {
                ctx.debug().log("HealthManager: Cannot damage - invulnerable!");
            }
            DamageOutcome::Damaged { health } => {
                ctx.debug().log(format_args!(
                    "HealthManager: Took {damage} damage. Current health: {health}"
                ));
            }
            DamageOutcome::Died => {
                ctx.debug().log(format_args!(
                    "HealthManager: Took {damage} damage. Current health: 0"
                ));
                ctx.debug().log("HealthManager: Player died!");
                ctx.transform()?.set_position(RESPAWN_POSITION)?;
            }
        }
        Ok(())
    }
}

impl Component for HealthManager {
    const TYPE_NAME: &'static str = "HealthManager";
    const HOOKS: LifecycleHooks = LifecycleHooks::START.union(LifecycleHooks::UPDATE);

    fn start(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
        self.current_health = self.max_health;
        ctx.debug().log(format_args!(
            "HealthManager: Health initialized to {}",
            self.current_health
        ));
        Ok(())
    }

    fn update(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
        if self.tick_invulnerability(ctx.delta_time()) {
            ctx.debug().log("HealthManager: Invulnerability ended");
        }

        let (hit, healed) = {
            let input = ctx.input();
            (input.get_key_down(KeyCode::H), input.get_key_down(KeyCode::T))
        };

        if hit {
            self.take_damage(ctx, 10.0)?;
        }
        if healed {
            let health = self.heal(20.0);
            ctx.debug().log(format_args!(
                "HealthManager: Healed 20. Current health: {health}"
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_health() -> HealthManager {
        HealthManager {
            current_health: 100.0,
            ..HealthManager::default()
        }
    }

    #[test]
    fn test_damage_starts_invulnerability() {
        let mut health = full_health();
        assert_eq!(health.apply_damage(10.0), DamageOutcome::Damaged { health: 90.0 });
        assert!(health.is_invulnerable());
        assert_eq!(health.apply_damage(10.0), DamageOutcome::Blocked);
        assert_eq!(health.current_health, 90.0);
    }

    #[test]
    fn test_invulnerability_expires() {
        let mut health = full_health();
        health.apply_damage(10.0);
        assert!(!health.tick_invulnerability(1.5));
        assert!(health.tick_invulnerability(0.5));
        assert!(!health.is_invulnerable());
        assert!(!health.tick_invulnerability(0.5));
    }

    #[test]
    fn test_heal_is_clamped() {
        let mut health = full_health();
        health.apply_damage(30.0);
        assert_eq!(health.heal(20.0), 90.0);
        assert_eq!(health.heal(20.0), 100.0);
        assert_eq!(health.health_percentage(), 1.0);
    }

    #[test]
    fn test_lethal_damage_resets_health() {
        let mut health = full_health();
        assert_eq!(health.apply_damage(250.0), DamageOutcome::Died);
        assert_eq!(health.current_health, 100.0);
    }

    #[test]
    fn test_death_moves_player_to_respawn() {
        let (mut engine, native) = Engine::headless(BridgeConfig::default()).unwrap();
        let handle = engine.create_game_object().unwrap();
        let scene = engine.scene_mut();
        scene.add_component::<Transform>(handle).unwrap();
        scene
            .add_component_with(
                handle,
                HealthManager {
                    max_health: 10.0,
                    ..HealthManager::default()
                },
            )
            .unwrap();
        scene
            .transform(handle)
            .unwrap()
            .set_position(Vector3::new(5.0, 5.0, 5.0))
            .unwrap();

        native.press_key(KeyCode::H);
        native.begin_frame(0.1);
        engine.tick();

        let position = engine.scene_mut().transform(handle).unwrap().position().unwrap();
        assert_eq!(position, RESPAWN_POSITION);
        let manager = engine.scene().get_component::<HealthManager>(handle).unwrap();
        assert_eq!(manager.current_health, 10.0);
        assert!(native
            .logged_messages()
            .iter()
            .any(|(_, message)| message == "HealthManager: Player died!"));
    }
}
