//! WASD movement, mouse facing and a simple jump

use script_bridge::prelude::*;

/// Height of the flat ground plane the player stands on
const GROUND_HEIGHT: f32 = 1.0;

/// Moves the owning object on the XZ plane and turns it towards the cursor
#[derive(Debug, Clone)]
pub struct PlayerController {
    pub move_speed: f32,
    /// Slerp rate towards the cursor, per second
    pub rotate_speed: f32,
    pub jump_force: f32,
    pub gravity: f32,
    velocity: Vector3,
    grounded: bool,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            rotate_speed: 180.0,
            jump_force: 5.0,
            gravity: -9.81,
            velocity: Vector3::ZERO,
            grounded: false,
        }
    }
}

impl PlayerController {
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.velocity.y
    }
}

impl Component for PlayerController {
    const TYPE_NAME: &'static str = "PlayerController";
    const HOOKS: LifecycleHooks = LifecycleHooks::START
        .union(LifecycleHooks::UPDATE)
        .union(LifecycleHooks::ON_DESTROY);

    fn start(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
        ctx.debug().log("PlayerController started!");
        Ok(())
    }

    fn update(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
        let dt = ctx.delta_time();
        let input = ctx.input();
        let horizontal = input.axis(KeyCode::A, KeyCode::D);
        let vertical = input.axis(KeyCode::S, KeyCode::W);
        let cursor = Vector3::new(input.mouse_x(), 0.0, input.mouse_y());
        let jump = input.get_key_down(KeyCode::Space);

        let mut transform = ctx.transform()?;

        let movement = Vector3::new(horizontal, 0.0, vertical).normalize_or_zero();
        transform.translate(movement * (self.move_speed * dt))?;

        let mut direction = cursor - transform.position()?;
        direction.y = 0.0;
        if direction.magnitude() > 0.1 {
            let target = Quaternion::look_rotation(direction.normalized()?, Vector3::UP)?;
            let current = transform.rotation()?;
            transform.set_rotation(Quaternion::slerp(current, target, self.rotate_speed * dt))?;
        }

        if jump && self.grounded {
            self.velocity.y = self.jump_force;
            self.grounded = false;
        }

        self.velocity.y += self.gravity * dt;
        let mut position = transform.position()?;
        position.y += self.velocity.y * dt;

        if position.y <= GROUND_HEIGHT {
            position.y = GROUND_HEIGHT;
            self.velocity.y = 0.0;
            self.grounded = true;
        }
        transform.set_position(position)?;
        Ok(())
    }

    fn on_destroy(&mut self, ctx: &mut ScriptContext<'_>) -> ScriptResult {
        ctx.debug().log("PlayerController destroyed!");
        Ok(())
    }
}
