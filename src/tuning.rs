//! Data-driven game balance
//!
//! Every number a designer might want to tweak lives here. Values can be
//! overridden from JSON; any missing field keeps its default.

use serde::{Deserialize, Serialize};

/// Balance table for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Logical arena size (world units)
    pub arena_width: f32,
    pub arena_height: f32,

    /// Real frame time is clamped to this before simulating (seconds)
    pub max_frame_dt: f32,

    /// Seconds between wave spawns at difficulty 1.0
    pub base_spawn_interval: f32,
    /// Floor for the spawn interval
    pub min_spawn_interval: f32,
    /// Seconds between boss attempts once bosses are unlocked
    pub boss_interval: f32,
    /// Level at which the boss timer starts counting
    pub boss_unlock_level: u32,

    /// Difficulty growth per second of run time
    pub difficulty_per_sec: f32,
    /// Cap on the time component of difficulty
    pub difficulty_time_cap: f32,
    /// Difficulty growth per point of score
    pub difficulty_per_score: f32,
    /// Hard ceiling on any difficulty factor
    pub difficulty_max: f32,
    /// Floor on the effective difficulty
    pub difficulty_min_effective: f32,

    /// Adaptive assist
    pub assist_duration: f32,
    pub assist_cooldown: f32,
    pub assist_multiplier: f32,
    pub assist_accuracy_threshold: f32,

    /// Score needed per level step (level n -> n+1 at n * step)
    pub level_score_step: u64,
    pub max_level: u32,

    /// Power-up economy
    pub power_drop_chance: f32,
    pub power_drop_boost: f32,
    pub power_drop_boost_threshold: f32,
    pub power_drop_max_chance: f32,
    /// No drops before this much run time has passed
    pub power_drop_safe_time: f32,
    pub shot_upgrade_duration: f32,
    pub missile_duration: f32,
    /// Stacked timers are capped at this multiple of one pickup
    pub power_stack_cap: f32,

    /// Simultaneous asteroid population cap
    pub max_asteroids: usize,

    /// Degrees between bullets of a spread volley
    pub spread_deg: f32,

    /// Homing missiles
    pub missile_speed: f32,
    pub missile_turn_rate: f32,
    pub missile_cooldown: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: 1920.0,
            arena_height: 1080.0,

            max_frame_dt: 0.05,

            base_spawn_interval: 0.8,
            min_spawn_interval: 0.2,
            boss_interval: 60.0,
            boss_unlock_level: 4,

            difficulty_per_sec: 0.015,
            difficulty_time_cap: 1.5,
            difficulty_per_score: 0.0008,
            difficulty_max: 3.0,
            difficulty_min_effective: 0.8,

            assist_duration: 10.0,
            assist_cooldown: 20.0,
            assist_multiplier: 0.8,
            assist_accuracy_threshold: 0.2,

            level_score_step: 10_000,
            max_level: 10,

            power_drop_chance: 0.06,
            power_drop_boost: 1.5,
            power_drop_boost_threshold: 2.0,
            power_drop_max_chance: 0.3,
            power_drop_safe_time: 10.0,
            shot_upgrade_duration: 12.0,
            missile_duration: 10.0,
            power_stack_cap: 3.0,

            max_asteroids: 40,

            spread_deg: 7.0,

            missile_speed: 520.0,
            missile_turn_rate: 3.4,
            missile_cooldown: 0.45,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning table from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Arena center x
    pub fn center_x(&self) -> f32 {
        self.arena_width / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_asteroids": 12, "arena_width": 800 }"#).unwrap();
        assert_eq!(tuning.max_asteroids, 12);
        assert_eq!(tuning.arena_width, 800.0);
        assert_eq!(tuning.arena_height, 1080.0);
        assert_eq!(tuning.level_score_step, 10_000);
    }

    #[test]
    fn test_assist_cooldown_outlasts_duration() {
        let tuning = Tuning::default();
        assert!(tuning.assist_cooldown > tuning.assist_duration);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("{ max_asteroids: }").is_err());
    }
}
