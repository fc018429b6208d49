//! Run state and the entity collections it owns
//!
//! Everything the per-frame tick mutates lives in `GameState`; managers
//! receive the pieces they need explicitly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyController;
use super::enemy::Enemy;
use super::particle::Particle;
use super::player::Player;
use super::powerup::{PowerUpEconomy, PowerUpKind};
use super::projectile::{Bullet, EnemyBullet, HomingMissile};
use super::starfield::Starfield;
use super::wave::WaveScheduler;
use crate::consts::*;
use crate::tuning::Tuning;

/// Visible phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Running,
    Paused,
    GameOver,
}

/// Independent pause causes. The run only advances when neither is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseFlags {
    /// Toggled by the player
    pub user: bool,
    /// Held while the viewport is being resized
    pub resize: bool,
}

/// Notable things that happened during a tick, drained by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Shoot,
    EnemyShoot,
    MissileLaunch,
    Explosion,
    PowerUpCollected(PowerUpKind),
    LevelUp(u32),
    BossSpawned,
    AssistActivated,
    PlayerHit { lives: u32 },
    GameOver { score: u64 },
}

/// Score, lives, level and accuracy counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// Never decreases during a run
    pub score: u64,
    /// Always within [0, MAX_LIVES]
    pub lives: u32,
    /// 1..=max_level, never decreases during a run
    pub level: u32,
    /// Seconds of unpaused play
    pub elapsed: f32,
    pub shots_fired: u64,
    pub shots_hit: u64,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            score: 0,
            lives: START_LIVES,
            level: 1,
            elapsed: 0.0,
            shots_fired: 0,
            shots_hit: 0,
        }
    }
}

impl RunState {
    /// Add points and step the level up through every threshold crossed.
    /// Returns the new level if it changed.
    pub fn add_score(&mut self, points: u64, tuning: &Tuning) -> Option<u32> {
        self.score = self.score.saturating_add(points);
        let old_level = self.level;
        while self.level < tuning.max_level
            && self.score >= u64::from(self.level) * tuning.level_score_step
        {
            self.level += 1;
        }
        (self.level != old_level).then_some(self.level)
    }

    pub fn add_life(&mut self, amount: u32) {
        self.lives = self.lives.saturating_add(amount).min(MAX_LIVES);
    }

    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    /// Hits per shot, 1.0 before the first shot
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            return 1.0;
        }
        (self.shots_hit as f64 / self.shots_fired as f64).clamp(0.0, 1.0) as f32
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed of the current run. `reset` draws a new one and reseeds `rng`.
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub run: RunState,
    pub pause: PauseFlags,
    pub game_over: bool,
    pub difficulty: DifficultyController,
    pub waves: WaveScheduler,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub missiles: Vec<HomingMissile>,
    /// Drones, kamikazes, bosses and asteroids
    pub enemies: Vec<Enemy>,
    pub power_ups: PowerUpEconomy,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub starfield: Starfield,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let starfield = Starfield::new(&mut rng, tuning.arena_width, tuning.arena_height);
        Self {
            seed,
            rng,
            run: RunState::default(),
            pause: PauseFlags::default(),
            game_over: false,
            difficulty: DifficultyController::default(),
            waves: WaveScheduler::new(&tuning),
            player: Player::new(&tuning),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            missiles: Vec::new(),
            enemies: Vec::new(),
            power_ups: PowerUpEconomy::default(),
            particles: Vec::new(),
            starfield,
            events: Vec::new(),
            tuning,
        }
    }

    /// Start a fresh run on a seed drawn from the old stream. The starfield
    /// and any resize hold carry over.
    pub fn reset(&mut self) {
        self.seed = self.rng.random();
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.run = RunState::default();
        self.pause.user = false;
        self.game_over = false;
        self.difficulty = DifficultyController::default();
        self.waves = WaveScheduler::new(&self.tuning);
        self.player.reset(&self.tuning);
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.missiles.clear();
        self.enemies.clear();
        self.power_ups.reset();
        self.particles.clear();
        self.events.clear();
    }

    pub fn phase(&self) -> RunPhase {
        if self.game_over {
            RunPhase::GameOver
        } else if self.pause.user || self.pause.resize {
            RunPhase::Paused
        } else {
            RunPhase::Running
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase() == RunPhase::Running
    }

    /// Player pause toggle. Cannot resume through a resize hold.
    pub fn toggle_pause(&mut self) {
        match self.phase() {
            RunPhase::GameOver => {}
            RunPhase::Running => self.pause.user = true,
            RunPhase::Paused => {
                if self.pause.user {
                    self.pause.user = false;
                }
            }
        }
    }

    pub fn begin_resize(&mut self) {
        self.pause.resize = true;
    }

    pub fn end_resize(&mut self) {
        self.pause.resize = false;
    }

    /// Add score, handling level-ups and the boss unlock
    pub fn award(&mut self, points: u64) {
        if points == 0 {
            return;
        }
        let old_level = self.run.level;
        if let Some(level) = self.run.add_score(points, &self.tuning) {
            log::info!("Level {} reached at score {}", level, self.run.score);
            self.events.push(GameEvent::LevelUp(level));
            let unlock = self.tuning.boss_unlock_level;
            if old_level < unlock && level >= unlock {
                self.waves.arm_boss_timer(&self.tuning);
            }
        }
    }

    /// Grant a collected power-up's effect and bonus
    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::ShotUpgrade => self.player.activate_shot_upgrade(&self.tuning),
            PowerUpKind::Missile => self.player.activate_missiles(&self.tuning),
            PowerUpKind::ExtraLife => self.run.add_life(1),
        }
        self.award(kind.bonus());
        self.events.push(GameEvent::PowerUpCollected(kind));
    }

    /// Player took a hit: costs a life and grants invulnerability
    pub fn hit_player(&mut self) {
        self.player.register_hit();
        self.run.lose_life();
        self.events.push(GameEvent::PlayerHit {
            lives: self.run.lives,
        });
    }

    pub fn asteroid_count(&self) -> usize {
        self.enemies
            .iter()
            .filter(|e| e.active && e.is_asteroid())
            .count()
    }

    pub fn has_active_boss(&self) -> bool {
        self.enemies.iter().any(|e| e.active && e.is_boss())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_definition() {
        let mut run = RunState::default();
        assert_eq!(run.accuracy(), 1.0);
        run.shots_fired = 4;
        run.shots_hit = 1;
        assert_eq!(run.accuracy(), 0.25);
        // Spread volleys can land more hits than volleys fired
        run.shots_hit = 9;
        assert_eq!(run.accuracy(), 1.0);
    }

    #[test]
    fn test_lives_clamped() {
        let mut run = RunState::default();
        run.add_life(10);
        assert_eq!(run.lives, MAX_LIVES);
        for _ in 0..10 {
            run.lose_life();
        }
        assert_eq!(run.lives, 0);
    }

    #[test]
    fn test_level_thresholds() {
        let tuning = Tuning::default();
        let mut run = RunState::default();
        assert_eq!(run.add_score(9_999, &tuning), None);
        assert_eq!(run.level, 1);
        assert_eq!(run.add_score(1, &tuning), Some(2));
        // Level 2 -> 3 at 20000
        assert_eq!(run.add_score(9_999, &tuning), None);
        assert_eq!(run.add_score(1, &tuning), Some(3));
        // A huge award steps through every threshold but stops at the max
        run.add_score(10_000_000, &tuning);
        assert_eq!(run.level, tuning.max_level);
    }

    #[test]
    fn test_boss_timer_armed_on_reaching_level_four() {
        let mut state = GameState::new(1, Tuning::default());
        state.award(29_999);
        assert_eq!(state.run.level, 3);
        state.waves.boss_timer = 12.0;
        state.award(1);
        assert_eq!(state.run.level, 4);
        assert_eq!(state.waves.boss_timer, 60.0);

        // Later level-ups leave it alone
        state.waves.boss_timer = 12.0;
        state.award(10_000);
        assert_eq!(state.run.level, 5);
        assert_eq!(state.waves.boss_timer, 12.0);
    }

    #[test]
    fn test_resize_hold_blocks_user_resume() {
        let mut state = GameState::new(1, Tuning::default());
        assert_eq!(state.phase(), RunPhase::Running);

        state.begin_resize();
        assert_eq!(state.phase(), RunPhase::Paused);
        // Resume request during a resize does nothing
        state.toggle_pause();
        assert_eq!(state.phase(), RunPhase::Paused);
        assert!(!state.pause.user);

        state.end_resize();
        assert_eq!(state.phase(), RunPhase::Running);
    }

    #[test]
    fn test_user_pause_survives_resize() {
        let mut state = GameState::new(1, Tuning::default());
        state.toggle_pause();
        state.begin_resize();
        state.end_resize();
        assert_eq!(state.phase(), RunPhase::Paused);
        state.toggle_pause();
        assert_eq!(state.phase(), RunPhase::Running);
    }

    #[test]
    fn test_game_over_ignores_pause() {
        let mut state = GameState::new(1, Tuning::default());
        state.game_over = true;
        state.toggle_pause();
        assert_eq!(state.phase(), RunPhase::GameOver);
        assert!(!state.pause.user);
    }

    #[test]
    fn test_reset_restores_run() {
        let mut state = GameState::new(1, Tuning::default());
        state.award(25_000);
        state.run.lives = 0;
        state.game_over = true;
        state.pause.user = true;
        state.reset();
        assert_eq!(state.run, RunState::default());
        assert_eq!(state.phase(), RunPhase::Running);
    }

    #[test]
    fn test_reset_reseeds_stream() {
        let mut state = GameState::new(1, Tuning::default());
        state.reset();
        assert_ne!(state.seed, 1);
        assert!(state.rng == Pcg32::seed_from_u64(state.seed));

        // A reset is as reproducible as a fresh start
        let mut again = GameState::new(1, Tuning::default());
        again.reset();
        assert_eq!(again.seed, state.seed);
    }
}
