//! Player bullets, enemy bullets and homing missiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{angle_of, heading, normalize_angle};

/// Despawn margins outside the arena (top, bottom, sides)
#[derive(Debug, Clone, Copy)]
struct Margins {
    top: f32,
    bottom: f32,
    side: f32,
}

impl Margins {
    fn contains(&self, pos: Vec2, tuning: &Tuning) -> bool {
        pos.y >= -self.top
            && pos.y <= tuning.arena_height + self.bottom
            && pos.x >= -self.side
            && pos.x <= tuning.arena_width + self.side
    }
}

const BULLET_MARGINS: Margins = Margins {
    top: 40.0,
    bottom: 40.0,
    side: 40.0,
};
const ENEMY_BULLET_MARGINS: Margins = Margins {
    top: 40.0,
    bottom: 80.0,
    side: 80.0,
};
const MISSILE_MARGINS: Margins = Margins {
    top: 100.0,
    bottom: 150.0,
    side: 150.0,
};

/// A player bullet travelling in a straight line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub active: bool,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: BULLET_RADIUS,
            active: true,
        }
    }

    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        self.pos += self.vel * dt;
        if !BULLET_MARGINS.contains(self.pos, tuning) {
            self.active = false;
        }
    }
}

/// A hostile shot travelling in a straight line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub active: bool,
}

impl EnemyBullet {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            active: true,
        }
    }

    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        self.pos += self.vel * dt;
        if !ENEMY_BULLET_MARGINS.contains(self.pos, tuning) {
            self.active = false;
        }
    }
}

/// A missile that steers toward the nearest live enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomingMissile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub speed: f32,
    /// Max heading change (radians/s)
    pub turn_rate: f32,
    pub radius: f32,
    pub damage: i32,
    /// Heading for renderers
    pub rotation: f32,
    pub active: bool,
}

impl HomingMissile {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            vel: Vec2::new(0.0, -tuning.missile_speed),
            speed: tuning.missile_speed,
            turn_rate: tuning.missile_turn_rate,
            radius: MISSILE_RADIUS,
            damage: MISSILE_DAMAGE,
            rotation: -std::f32::consts::FRAC_PI_2,
            active: true,
        }
    }

    /// Index of the nearest active enemy, if any
    pub fn acquire_target(&self, enemies: &[Enemy]) -> Option<usize> {
        enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.active)
            .min_by(|(_, a), (_, b)| {
                a.pos
                    .distance_squared(self.pos)
                    .partial_cmp(&b.pos.distance_squared(self.pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
    }

    /// Re-target and steer with a bounded turn, then advance.
    /// With no live enemy the missile keeps its last heading.
    pub fn update(&mut self, dt: f32, enemies: &[Enemy], tuning: &Tuning) {
        if !self.active {
            return;
        }

        let current = angle_of(self.vel);
        if let Some(index) = self.acquire_target(enemies) {
            let desired = angle_of(enemies[index].pos - self.pos);
            let max_turn = self.turn_rate * dt;
            let diff = normalize_angle(desired - current).clamp(-max_turn, max_turn);
            let new_angle = current + diff;
            self.vel = heading(new_angle) * self.speed;
            self.rotation = new_angle;
        } else {
            self.rotation = current;
        }

        self.pos += self.vel * dt;
        if !MISSILE_MARGINS.contains(self.pos, tuning) {
            self.active = false;
        }
    }
}
