//! The player's ship

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::Bullet;
use crate::consts::*;
use crate::tuning::Tuning;

/// What a successful trigger pull asks the tick to spawn
#[derive(Debug, Clone, PartialEq)]
pub enum FireCommand {
    Bullet(Bullet),
    Missile { pos: Vec2 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Clamped input target the ship eases toward
    pub target: Vec2,
    pub radius: f32,
    /// Seconds until the next volley is allowed
    pub fire_cooldown: f32,
    pub invulnerability: f32,
    pub hit_flash: f32,
    /// Bullets per volley (>= 1)
    pub shot_level: u32,
    pub shot_level_timer: f32,
    pub missile_active: bool,
    pub missile_timer: f32,
    pub missile_cooldown: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let pos = Self::spawn_point(tuning);
        Self {
            pos,
            target: pos,
            radius: PLAYER_RADIUS,
            fire_cooldown: 0.0,
            invulnerability: 0.0,
            hit_flash: 0.0,
            shot_level: 1,
            shot_level_timer: 0.0,
            missile_active: false,
            missile_timer: 0.0,
            missile_cooldown: 0.0,
        }
    }

    fn spawn_point(tuning: &Tuning) -> Vec2 {
        Vec2::new(tuning.center_x(), tuning.arena_height * 0.75)
    }

    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    /// Ease toward the target and run down every timer
    pub fn update(&mut self, dt: f32, target: Vec2, tuning: &Tuning) {
        self.target = Vec2::new(
            target.x.clamp(self.radius, tuning.arena_width - self.radius),
            target.y.clamp(self.radius, tuning.arena_height - self.radius),
        );
        // Critically damped follow: frame-rate independent
        let smoothing = 1.0 - (-dt * PLAYER_FOLLOW_RATE).exp();
        self.pos += (self.target - self.pos) * smoothing;

        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        self.invulnerability = (self.invulnerability - dt).max(0.0);
        self.hit_flash = (self.hit_flash - dt).max(0.0);
        self.missile_cooldown = (self.missile_cooldown - dt).max(0.0);

        if self.shot_level > 1 {
            self.shot_level_timer = (self.shot_level_timer - dt).max(0.0);
            if self.shot_level_timer <= 0.0 {
                self.shot_level = 1;
            }
        }
        if self.missile_active {
            self.missile_timer = (self.missile_timer - dt).max(0.0);
            if self.missile_timer <= 0.0 {
                self.missile_active = false;
            }
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability > 0.0
    }

    pub fn register_hit(&mut self) {
        self.invulnerability = HIT_INVULNERABILITY;
        self.hit_flash = HIT_FLASH;
    }

    /// One more bullet per volley; timer extends up to the stacking cap
    pub fn activate_shot_upgrade(&mut self, tuning: &Tuning) {
        let duration = tuning.shot_upgrade_duration;
        self.shot_level += 1;
        self.shot_level_timer =
            (self.shot_level_timer + duration).clamp(duration, duration * tuning.power_stack_cap);
    }

    pub fn activate_missiles(&mut self, tuning: &Tuning) {
        let duration = tuning.missile_duration;
        self.missile_active = true;
        self.missile_timer =
            (self.missile_timer + duration).clamp(duration, duration * tuning.power_stack_cap);
        self.missile_cooldown = 0.0;
    }

    /// Pull the trigger. Returns nothing while the cooldown is running.
    pub fn try_fire(&mut self, tuning: &Tuning) -> Vec<FireCommand> {
        if self.fire_cooldown > 0.0 {
            return Vec::new();
        }
        self.fire_cooldown = PLAYER_FIRE_COOLDOWN;

        let base_y = self.pos.y - self.radius - 6.0;
        let shots = self.shot_level.max(1);
        let mut commands = Vec::with_capacity(shots as usize + 1);

        if shots == 1 {
            commands.push(FireCommand::Bullet(Bullet::new(
                Vec2::new(self.pos.x, base_y),
                Vec2::new(0.0, -PLAYER_BULLET_SPEED),
            )));
        } else {
            let straight_up = -std::f32::consts::FRAC_PI_2;
            let middle = (shots - 1) as f32 / 2.0;
            for i in 0..shots {
                let step = i as f32 - middle;
                let angle = straight_up + (step * tuning.spread_deg).to_radians();
                commands.push(FireCommand::Bullet(Bullet::new(
                    Vec2::new(self.pos.x + step * SPREAD_X_OFFSET, base_y),
                    crate::heading(angle) * PLAYER_BULLET_SPEED,
                )));
            }
        }

        if self.missile_active && self.missile_cooldown <= 0.0 {
            commands.push(FireCommand::Missile {
                pos: Vec2::new(self.pos.x, self.pos.y - self.radius * 0.2),
            });
            self.missile_cooldown = tuning.missile_cooldown;
        }

        commands
    }
}
