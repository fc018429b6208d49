//! Difficulty controller with hysteretic adaptive assist

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Temporary difficulty reduction for a struggling player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveAssist {
    pub active: bool,
    /// Seconds of assist left while active
    pub timer: f32,
    /// Seconds until assist may trigger again
    pub cooldown: f32,
}

/// What the controller reads from the run each frame
#[derive(Debug, Clone, Copy)]
pub struct DifficultyInputs {
    pub elapsed: f32,
    pub score: u64,
    pub lives: u32,
    pub accuracy: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyController {
    /// Pressure from time and score alone
    pub base: f32,
    /// Multiplier actually applied to enemies and spawn rate
    pub effective: f32,
    pub assist: AdaptiveAssist,
}

impl Default for DifficultyController {
    fn default() -> Self {
        Self {
            base: 1.0,
            effective: 1.0,
            assist: AdaptiveAssist::default(),
        }
    }
}

impl DifficultyController {
    pub fn base_factor(elapsed: f32, score: u64, tuning: &Tuning) -> f32 {
        let time = (elapsed * tuning.difficulty_per_sec).min(tuning.difficulty_time_cap);
        let score = (score as f32 * tuning.difficulty_per_score).min(tuning.difficulty_max);
        (1.0 + time + score).clamp(1.0, tuning.difficulty_max)
    }

    /// Recompute both factors. Returns true when assist switched on this frame.
    pub fn update(&mut self, dt: f32, inputs: DifficultyInputs, tuning: &Tuning) -> bool {
        self.base = Self::base_factor(inputs.elapsed, inputs.score, tuning);

        let assist = &mut self.assist;
        if assist.cooldown > 0.0 {
            assist.cooldown = (assist.cooldown - dt).max(0.0);
        }
        if assist.active {
            assist.timer -= dt;
            if assist.timer <= 0.0 {
                assist.active = false;
                assist.timer = 0.0;
            }
        }

        let struggling = inputs.lives == 1 || inputs.accuracy < tuning.assist_accuracy_threshold;
        let activated = !assist.active && assist.cooldown <= 0.0 && struggling;
        if activated {
            assist.active = true;
            assist.timer = tuning.assist_duration;
            assist.cooldown = tuning.assist_cooldown;
        }

        let multiplier = if assist.active {
            tuning.assist_multiplier
        } else {
            1.0
        };
        self.effective =
            (self.base * multiplier).clamp(tuning.difficulty_min_effective, tuning.difficulty_max);

        activated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(elapsed: f32, score: u64, lives: u32, accuracy: f32) -> DifficultyInputs {
        DifficultyInputs {
            elapsed,
            score,
            lives,
            accuracy,
        }
    }

    #[test]
    fn test_base_factor_formula() {
        let tuning = Tuning::default();
        assert_eq!(DifficultyController::base_factor(0.0, 0, &tuning), 1.0);
        // 40s -> 0.6 from time
        assert!((DifficultyController::base_factor(40.0, 0, &tuning) - 1.6).abs() < 1e-5);
        // Time component caps at 1.5
        assert!((DifficultyController::base_factor(1000.0, 0, &tuning) - 2.5).abs() < 1e-5);
        // Everything caps at max
        assert_eq!(DifficultyController::base_factor(1000.0, 100_000, &tuning), 3.0);
    }

    #[test]
    fn test_assist_on_last_life() {
        let tuning = Tuning::default();
        let mut diff = DifficultyController::default();
        assert!(!diff.update(0.016, inputs(40.0, 0, 3, 1.0), &tuning));
        assert!(!diff.assist.active);

        assert!(diff.update(0.016, inputs(40.0, 0, 1, 1.0), &tuning));
        assert!(diff.assist.active);
        assert!((diff.effective - diff.base * 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_assisted_effective_never_below_floor() {
        let tuning = Tuning::default();
        let mut diff = DifficultyController::default();
        diff.update(0.016, inputs(0.0, 0, 1, 1.0), &tuning);
        assert!(diff.assist.active);
        assert_eq!(diff.effective, 0.8);
    }

    #[test]
    fn test_assist_cannot_retrigger_before_cooldown() {
        let tuning = Tuning::default();
        let mut diff = DifficultyController::default();
        let dt = 0.05;
        let struggling = inputs(0.0, 0, 1, 0.0);

        assert!(diff.update(dt, struggling, &tuning));
        let mut t = dt;
        let mut activations = 1;
        let mut last_activation = t;
        while t < 45.0 {
            t += dt;
            if diff.update(dt, struggling, &tuning) {
                activations += 1;
                assert!(t - last_activation >= tuning.assist_cooldown - 1e-3);
                last_activation = t;
            }
        }
        // At 0s, 20s, 40s
        assert_eq!(activations, 3);
    }

    #[test]
    fn test_assist_expires_after_duration() {
        let tuning = Tuning::default();
        let mut diff = DifficultyController::default();
        diff.update(0.1, inputs(0.0, 0, 1, 1.0), &tuning);
        for _ in 0..101 {
            diff.update(0.1, inputs(0.0, 0, 3, 1.0), &tuning);
        }
        assert!(!diff.assist.active);
        assert_eq!(diff.effective, 1.0);
    }
}
