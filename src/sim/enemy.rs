//! Hostile entities: drones, kamikazes, bosses and asteroids
//!
//! One `Enemy` struct carries the shared kinematics; per-type behavior
//! parameters live in the `EnemyKind` variant and are dispatched from a
//! single `update` entry point.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::asteroid::AsteroidParams;
use super::projectile::EnemyBullet;
use super::rng::random_range;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{angle_of, heading};

/// Enemies despawn this far outside the arena
const ENEMY_DESPAWN_MARGIN: f32 = 160.0;
/// Asteroids drift further before despawning
const ASTEROID_DESPAWN_BOTTOM: f32 = 200.0;
const ASTEROID_DESPAWN_SIDE: f32 = 220.0;

/// Boss lateral sway
const BOSS_SWAY_FREQUENCY: f32 = 1.3;
const BOSS_SWAY_SPEED: f32 = 80.0;
const BOSS_SPREAD: [f32; 3] = [-0.25, 0.0, 0.25];

/// Sine-weaving shooter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneParams {
    /// Descent speed at difficulty 1.0
    pub speed: f32,
    pub sway_amplitude: f32,
    pub sway_frequency: f32,
    pub sway_phase: f32,
    pub fire_cooldown: f32,
    pub fire_timer: f32,
    pub shot_speed: f32,
}

/// Homes in on the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KamikazeParams {
    pub speed: f32,
    /// Steering acceleration toward the player
    pub steer: f32,
}

/// Descends to a hover altitude and fires spreads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossParams {
    pub descent_speed: f32,
    pub hover_y: f32,
    pub fire_cooldown: f32,
    pub fire_timer: f32,
    pub shot_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    Drone(DroneParams),
    Kamikaze(KamikazeParams),
    Boss(BossParams),
    Asteroid(AsteroidParams),
}

/// Any hostile entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Positive while active
    pub health: i32,
    pub score_value: u64,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Post-spawn window during which this cannot hurt the player
    pub grace: f32,
    /// Seconds since spawn
    pub age: f32,
    pub active: bool,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn new(pos: Vec2, radius: f32, health: i32, score_value: u64, kind: EnemyKind) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            health,
            score_value,
            rotation: 0.0,
            rotation_speed: 0.0,
            grace: 0.0,
            age: 0.0,
            active: true,
            kind,
        }
    }

    pub fn drone<R: Rng + ?Sized>(rng: &mut R, pos: Vec2) -> Self {
        let mut enemy = Self::new(
            pos,
            22.0,
            2,
            160,
            EnemyKind::Drone(DroneParams {
                speed: random_range(rng, 120.0, 160.0),
                sway_amplitude: random_range(rng, 60.0, 110.0),
                sway_frequency: random_range(rng, 3.5, 5.5),
                sway_phase: 0.0,
                fire_cooldown: 2.2,
                fire_timer: random_range(rng, 0.8, 1.6),
                shot_speed: 360.0,
            }),
        );
        enemy.rotation_speed = random_range(rng, -1.1, 1.1);
        enemy
    }

    pub fn kamikaze<R: Rng + ?Sized>(rng: &mut R, pos: Vec2) -> Self {
        let mut enemy = Self::new(
            pos,
            20.0,
            1,
            190,
            EnemyKind::Kamikaze(KamikazeParams {
                speed: random_range(rng, 180.0, 220.0),
                steer: 280.0,
            }),
        );
        enemy.rotation_speed = random_range(rng, -2.5, 2.5);
        enemy
    }

    /// Boss toughness scales with the base difficulty at spawn time
    pub fn boss(pos: Vec2, base_factor: f32) -> Self {
        let health = ((50.0 * base_factor).round() as i32).max(1);
        Self::new(
            pos,
            70.0,
            health,
            1200,
            EnemyKind::Boss(BossParams {
                descent_speed: 45.0,
                hover_y: 220.0,
                fire_cooldown: 1.35,
                fire_timer: 1.0,
                shot_speed: 420.0,
            }),
        )
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss(_))
    }

    pub fn is_asteroid(&self) -> bool {
        matches!(self.kind, EnemyKind::Asteroid(_))
    }

    pub fn in_grace(&self) -> bool {
        self.grace > 0.0
    }

    /// Apply damage. Returns true exactly once: on the hit that destroys it.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.active {
            return false;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Advance one frame. Any shots fired are returned for the caller to own.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        dt: f32,
        factor: f32,
        player_pos: Vec2,
        tuning: &Tuning,
    ) -> Vec<EnemyBullet> {
        let mut shots = Vec::new();
        if !self.active {
            return shots;
        }

        self.age += dt;
        self.grace = (self.grace - dt).max(0.0);
        self.rotation += self.rotation_speed * dt;

        let pos = self.pos;
        match &mut self.kind {
            EnemyKind::Drone(drone) => {
                drone.sway_phase += dt * drone.sway_frequency;
                self.pos.x += drone.sway_phase.sin() * drone.sway_amplitude * dt;
                self.pos.y += drone.speed * factor * dt;

                drone.fire_timer -= dt * factor;
                if drone.fire_timer <= 0.0 {
                    drone.fire_timer = drone.fire_cooldown / factor + random_range(rng, 0.05, 0.25);
                    let aim = (player_pos - pos).try_normalize().unwrap_or(Vec2::Y);
                    shots.push(EnemyBullet::new(
                        pos,
                        aim * drone.shot_speed * factor,
                        DRONE_SHOT_RADIUS,
                    ));
                }
            }
            EnemyKind::Kamikaze(kami) => {
                let to_player = (player_pos - pos).try_normalize().unwrap_or(Vec2::Y);
                self.vel += to_player * kami.steer * dt;
                let desired = kami.speed * factor;
                self.vel = self.vel.try_normalize().unwrap_or(to_player) * desired;
                self.pos += self.vel * dt;
            }
            EnemyKind::Boss(boss) => {
                if self.pos.y < boss.hover_y {
                    self.pos.y += boss.descent_speed * factor * dt;
                } else {
                    self.pos.y = boss.hover_y;
                }
                self.pos.x += (self.age * BOSS_SWAY_FREQUENCY).sin() * BOSS_SWAY_SPEED * dt;

                boss.fire_timer -= dt * factor;
                if boss.fire_timer <= 0.0 {
                    boss.fire_timer = boss.fire_cooldown / factor;
                    let aim = angle_of(player_pos - self.pos);
                    let speed = boss.shot_speed * factor;
                    shots.extend(BOSS_SPREAD.iter().map(|offset| {
                        EnemyBullet::new(self.pos, heading(aim + offset) * speed, BOSS_SHOT_RADIUS)
                    }));
                }
            }
            EnemyKind::Asteroid(_) => {
                self.pos += self.vel * factor * dt;
            }
        }

        let (bottom, side) = if self.is_asteroid() {
            (ASTEROID_DESPAWN_BOTTOM, ASTEROID_DESPAWN_SIDE)
        } else {
            (ENEMY_DESPAWN_MARGIN, ENEMY_DESPAWN_MARGIN)
        };
        if self.pos.y > tuning.arena_height + bottom
            || self.pos.x < -side
            || self.pos.x > tuning.arena_width + side
        {
            self.active = false;
        }

        shots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_take_damage_destroys_exactly_once() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut drone = Enemy::drone(&mut rng, Vec2::new(100.0, 100.0));
        assert!(!drone.take_damage(1));
        assert!(drone.take_damage(1));
        assert!(!drone.active);
        assert!(!drone.take_damage(1));
        assert!(!drone.take_damage(5));
    }

    #[test]
    fn test_boss_health_scales_with_base_difficulty() {
        assert_eq!(Enemy::boss(Vec2::ZERO, 1.0).health, 50);
        assert_eq!(Enemy::boss(Vec2::ZERO, 2.5).health, 125);
    }

    #[test]
    fn test_boss_hovers_and_fires_spread() {
        let mut rng = Pcg32::seed_from_u64(1);
        let tuning = Tuning::default();
        let mut boss = Enemy::boss(Vec2::new(960.0, 200.0), 1.0);
        let mut fired = Vec::new();
        for _ in 0..120 {
            fired.extend(boss.update(&mut rng, 1.0 / 60.0, 1.0, Vec2::new(960.0, 900.0), &tuning));
        }
        assert_eq!(boss.pos.y, 220.0);
        assert_eq!(fired.len() % 3, 0);
        assert!(!fired.is_empty());
        assert!(fired.iter().all(|s| s.radius == BOSS_SHOT_RADIUS));
    }

    #[test]
    fn test_drone_shots_aim_at_player() {
        let mut rng = Pcg32::seed_from_u64(9);
        let tuning = Tuning::default();
        let mut drone = Enemy::drone(&mut rng, Vec2::new(500.0, 100.0));
        let player = Vec2::new(500.0, 900.0);
        let mut fired = Vec::new();
        for _ in 0..120 {
            fired.extend(drone.update(&mut rng, 1.0 / 60.0, 1.0, player, &tuning));
        }
        assert!(!fired.is_empty());
        assert!(fired.iter().all(|s| s.vel.y > 0.0));
        assert!((fired[0].vel.length() - 360.0).abs() < 1e-2);
    }

    #[test]
    fn test_kamikaze_speed_tracks_difficulty() {
        let mut rng = Pcg32::seed_from_u64(2);
        let tuning = Tuning::default();
        let mut kami = Enemy::kamikaze(&mut rng, Vec2::new(300.0, 0.0));
        let EnemyKind::Kamikaze(params) = kami.kind.clone() else {
            unreachable!()
        };
        kami.update(&mut rng, 0.016, 2.0, Vec2::new(300.0, 800.0), &tuning);
        assert!((kami.vel.length() - params.speed * 2.0).abs() < 1e-2);
        assert!(kami.vel.y > 0.0);
    }

    #[test]
    fn test_enemy_despawns_below_arena() {
        let mut rng = Pcg32::seed_from_u64(2);
        let tuning = Tuning::default();
        let mut drone = Enemy::drone(&mut rng, Vec2::new(500.0, 1239.0));
        drone.update(&mut rng, 0.05, 1.0, Vec2::new(500.0, 0.0), &tuning);
        assert!(!drone.active);
    }
}
