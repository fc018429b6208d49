//! Star Skirmish - A 2D arcade space shooter simulation core
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, collisions, waves, difficulty)
//! - `game`: Session driver (frame capping, pause/resize, collaborators)
//! - `tuning`: Data-driven game balance
//! - `settings`: User preferences and adaptive render quality
//! - `highscores`: Best score persistence
//! - `audio`: Fire-and-forget sound notifications
//! - `platform`: Platform-neutral input state

pub mod audio;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{FrameInput, Game, Snapshot};
pub use highscores::{FileHighScores, HighScoreStore, MemoryHighScores, StoreError};
pub use settings::{AdaptiveQuality, QualityMode, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Fixed gameplay constants (not data-driven)
pub mod consts {
    /// Lives at the start of a run
    pub const START_LIVES: u32 = 3;
    /// Lives can never exceed this
    pub const MAX_LIVES: u32 = 5;

    /// Player ship
    pub const PLAYER_RADIUS: f32 = 20.0;
    /// Exponential follow rate toward the input target (1/s)
    pub const PLAYER_FOLLOW_RATE: f32 = 12.0;
    pub const PLAYER_FIRE_COOLDOWN: f32 = 0.16;
    pub const PLAYER_BULLET_SPEED: f32 = 780.0;
    /// Horizontal gap between bullets of a spread volley
    pub const SPREAD_X_OFFSET: f32 = 12.0;
    pub const HIT_INVULNERABILITY: f32 = 1.0;
    pub const HIT_FLASH: f32 = 0.3;

    /// Projectiles
    pub const BULLET_RADIUS: f32 = 6.0;
    pub const DRONE_SHOT_RADIUS: f32 = 12.0;
    pub const BOSS_SHOT_RADIUS: f32 = 16.0;
    pub const MISSILE_RADIUS: f32 = 10.0;
    pub const MISSILE_DAMAGE: i32 = 3;

    /// Player-vs-enemy contact uses a shrunken enemy hitbox
    pub const CONTACT_RADIUS_SCALE: f32 = 0.7;

    /// Cosmetic bursts
    pub const EXPLOSION_PARTICLES: usize = 14;
    pub const MISSILE_SPARK_PARTICLES: usize = 6;

    /// Score bonuses for collecting power-ups
    pub const SHOT_UPGRADE_BONUS: u64 = 120;
    pub const MISSILE_BONUS: u64 = 140;
    pub const LIFE_BONUS: u64 = 150;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector for a heading angle (radians, 0 = +x, y grows downward)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Heading angle of a vector
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// True when two circles touch or overlap (`distance² <= (r1 + r2)²`)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}
