//! Wave scheduler: decides what spawns and when

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::asteroid::AsteroidSize;
use super::enemy::Enemy;
use super::rng::{random_range, weighted_pick};
use crate::tuning::Tuning;

/// Enemy archetypes the regular spawn timer can pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    Asteroid,
    Drone,
    Kamikaze,
}

/// Run facts the scheduler reads (it never touches run state directly)
#[derive(Debug, Clone, Copy)]
pub struct WaveContext {
    pub level: u32,
    pub effective_difficulty: f32,
    pub base_difficulty: f32,
    /// Live asteroids right now
    pub asteroid_count: usize,
    pub boss_active: bool,
}

/// What one scheduler step produced
#[derive(Debug, Clone, Default)]
pub struct WaveOutcome {
    pub spawned: Vec<Enemy>,
    /// Score for a spawn the asteroid cap refused
    pub free_score: u64,
    pub boss_spawned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveScheduler {
    /// Seconds until the next regular spawn
    pub spawn_timer: f32,
    /// Seconds until the next boss attempt (counts only once unlocked)
    pub boss_timer: f32,
}

impl WaveScheduler {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            spawn_timer: 0.0,
            boss_timer: tuning.boss_interval,
        }
    }

    /// Restart the boss countdown (on first reaching the unlock level)
    pub fn arm_boss_timer(&mut self, tuning: &Tuning) {
        self.boss_timer = tuning.boss_interval;
    }

    /// Spawn weights unlocked at `level`
    pub fn archetype_weights(level: u32) -> Vec<(Archetype, f32)> {
        let level_f = level as f32;
        let mut options = vec![(Archetype::Asteroid, 1.2)];
        if level >= 2 {
            options.push((Archetype::Drone, 0.5 + level_f * 0.1));
        }
        if level >= 3 {
            options.push((Archetype::Kamikaze, 0.4 + level_f * 0.1));
        }
        options
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        dt: f32,
        ctx: WaveContext,
        tuning: &Tuning,
    ) -> WaveOutcome {
        let mut outcome = WaveOutcome::default();

        self.spawn_timer -= dt;
        if ctx.level >= tuning.boss_unlock_level {
            self.boss_timer -= dt;
        }

        if self.spawn_timer <= 0.0 {
            let interval = tuning.base_spawn_interval / ctx.effective_difficulty.max(f32::EPSILON);
            self.spawn_timer = (interval * random_range(rng, 0.7, 1.3)).max(tuning.min_spawn_interval);

            let archetype = weighted_pick(rng, &Self::archetype_weights(ctx.level))
                .unwrap_or(Archetype::Asteroid);
            let x = random_range(rng, 80.0, tuning.arena_width - 80.0);
            match archetype {
                Archetype::Asteroid if ctx.asteroid_count >= tuning.max_asteroids => {
                    // Cap reached: count it as a free kill so progression keeps moving
                    outcome.free_score += AsteroidSize::Large.score();
                }
                Archetype::Asteroid => {
                    outcome
                        .spawned
                        .push(Enemy::large_asteroid(rng, Vec2::new(x, -80.0)));
                }
                Archetype::Drone => outcome.spawned.push(Enemy::drone(rng, Vec2::new(x, -60.0))),
                Archetype::Kamikaze => {
                    outcome.spawned.push(Enemy::kamikaze(rng, Vec2::new(x, -90.0)))
                }
            }
        }

        if self.boss_timer <= 0.0 {
            self.boss_timer = tuning.boss_interval;
            if !ctx.boss_active {
                let x = random_range(rng, 240.0, tuning.arena_width - 240.0);
                outcome
                    .spawned
                    .push(Enemy::boss(Vec2::new(x, -160.0), ctx.base_difficulty));
                outcome.boss_spawned = true;
            }
        }

        outcome
    }
}
