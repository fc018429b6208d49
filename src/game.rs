//! Session driver
//!
//! Wraps a `GameState` with everything outside the simulation proper: frame
//! delta capping, pause/restart/resize handling, adaptive quality, audio
//! dispatch and best-score persistence. Collaborator failures are logged
//! here and never reach the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::{AudioManager, AudioSink};
use crate::highscores::HighScoreStore;
use crate::settings::{AdaptiveQuality, Settings};
use crate::sim::{GameEvent, GameState, RunPhase, TickInput, tick};
use crate::tuning::Tuning;

/// Input gathered by the host for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Ship target in world coordinates
    pub target: Vec2,
    pub firing: bool,
    /// Edge-triggered: toggle pause
    pub pause: bool,
    /// Edge-triggered: start a fresh run
    pub restart: bool,
}

/// Read-only view of a run for the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u64,
    pub best: u64,
    pub lives: u32,
    pub level: u32,
    pub phase: RunPhase,
    pub accuracy: f32,
    pub assist_active: bool,
    pub resize_paused: bool,
    pub shot_level: u32,
    pub shot_level_remaining: f32,
    pub missile_active: bool,
    pub missile_remaining: f32,
    pub elapsed: f32,
    pub quality_label: String,
}

pub struct Game<H: HighScoreStore, A: AudioSink> {
    state: GameState,
    store: H,
    audio: AudioManager<A>,
    quality: AdaptiveQuality,
    best: u64,
    /// Events from the most recent frame
    events: Vec<GameEvent>,
}

impl<H: HighScoreStore, A: AudioSink> Game<H, A> {
    pub fn new(seed: u64, tuning: Tuning, settings: &Settings, store: H, sink: A) -> Self {
        let best = store.high_score().unwrap_or_else(|err| {
            log::warn!("Could not read best score: {err}");
            0
        });

        let mut audio = AudioManager::new(sink);
        audio.set_volume(settings.volume);
        audio.set_muted(settings.muted);

        log::info!("Starting run with seed {seed} (best {best})");
        Self {
            state: GameState::new(seed, tuning),
            store,
            audio,
            quality: AdaptiveQuality::new(settings.quality),
            best,
            events: Vec::new(),
        }
    }

    /// Run one frame. `real_dt` is wall-clock time since the last frame.
    pub fn frame(&mut self, real_dt: f32, input: &FrameInput) -> &[GameEvent] {
        let real_dt = if real_dt.is_finite() { real_dt.max(0.0) } else { 0.0 };
        let dt = real_dt.min(self.state.tuning.max_frame_dt);

        // Pause first so a restart in the same frame always lands in Running
        if input.pause {
            self.state.toggle_pause();
            log::debug!("Pause toggled: {:?}", self.state.phase());
        }
        if input.restart {
            self.restart();
        }

        self.quality.update(real_dt);

        let was_over = self.state.game_over;
        let tick_input = TickInput {
            target: input.target,
            firing: input.firing,
        };
        tick(&mut self.state, &tick_input, dt);

        self.events = std::mem::take(&mut self.state.events);
        for event in &self.events {
            self.audio.notify(event);
        }
        if !was_over && self.state.game_over {
            self.record_best();
        }
        &self.events
    }

    /// Throw the current run away and start over
    pub fn restart(&mut self) {
        let score = self.state.run.score;
        let level = self.state.run.level;
        self.state.reset();
        log::info!(
            "Restarting run with seed {} (previous score {score}, level {level})",
            self.state.seed
        );
    }

    pub fn toggle_pause(&mut self) {
        self.state.toggle_pause();
    }

    /// Viewport resize began: hold the run until it settles
    pub fn resize_started(&mut self) {
        self.state.begin_resize();
    }

    pub fn resize_finished(&mut self) {
        self.state.end_resize();
    }

    fn record_best(&mut self) {
        let score = self.state.run.score;
        if score <= self.best {
            return;
        }
        self.best = score;
        log::info!("New best score {score}");
        if let Err(err) = self.store.set_high_score(score) {
            log::warn!("Could not save best score: {err}");
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        let player = &state.player;
        Snapshot {
            score: state.run.score,
            best: self.best,
            lives: state.run.lives,
            level: state.run.level,
            phase: state.phase(),
            accuracy: state.run.accuracy(),
            assist_active: state.difficulty.assist.active,
            resize_paused: state.pause.resize,
            shot_level: player.shot_level,
            shot_level_remaining: player.shot_level_timer,
            missile_active: player.missile_active,
            missile_remaining: player.missile_timer,
            elapsed: state.run.elapsed,
            quality_label: self.quality.label(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for hosts and tests that stage scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    pub fn store(&self) -> &H {
        &self.store
    }

    pub fn audio(&self) -> &AudioManager<A> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager<A> {
        &mut self.audio
    }

    pub fn quality(&self) -> &AdaptiveQuality {
        &self.quality
    }

    pub fn quality_mut(&mut self) -> &mut AdaptiveQuality {
        &mut self.quality
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullSink;
    use crate::highscores::{MemoryHighScores, StoreError};

    fn game(best: u64) -> Game<MemoryHighScores, NullSink> {
        Game::new(
            9,
            Tuning::default(),
            &Settings::default(),
            MemoryHighScores::new(best),
            NullSink,
        )
    }

    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn high_score(&self) -> Result<u64, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }

        fn set_high_score(&mut self, _score: u64) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }
    }

    fn idle(game: &Game<impl HighScoreStore, impl AudioSink>) -> FrameInput {
        FrameInput {
            target: game.state().player.pos,
            ..FrameInput::default()
        }
    }

    #[test]
    fn test_frame_delta_is_capped() {
        let mut game = game(0);
        game.state_mut().waves.spawn_timer = 1.0e6;
        let input = idle(&game);
        game.frame(2.0, &input);
        assert!((game.state().run.elapsed - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_pause_edge_toggles() {
        let mut game = game(0);
        let pause = FrameInput {
            pause: true,
            ..idle(&game)
        };
        game.frame(0.016, &pause);
        assert_eq!(game.snapshot().phase, RunPhase::Paused);
        let elapsed = game.state().run.elapsed;
        game.frame(0.016, &idle(&game));
        assert_eq!(game.state().run.elapsed, elapsed);
        game.frame(0.016, &pause);
        assert_eq!(game.snapshot().phase, RunPhase::Running);
    }

    #[test]
    fn test_resize_hold_survives_pause_toggle() {
        let mut game = game(0);
        game.resize_started();
        let pause = FrameInput {
            pause: true,
            ..idle(&game)
        };
        game.frame(0.016, &pause);
        let snap = game.snapshot();
        assert_eq!(snap.phase, RunPhase::Paused);
        assert!(snap.resize_paused);

        game.resize_finished();
        assert_eq!(game.snapshot().phase, RunPhase::Running);
    }

    #[test]
    fn test_game_over_persists_improved_best() {
        let mut game = game(100);
        game.state_mut().waves.spawn_timer = 1.0e6;
        game.state_mut().run.score = 450;
        game.state_mut().run.lives = 0;
        let events = game.frame(0.016, &idle(&game)).to_vec();

        assert!(events.contains(&GameEvent::GameOver { score: 450 }));
        assert_eq!(game.best(), 450);
        assert_eq!(game.store().high_score().unwrap(), 450);
        assert_eq!(game.snapshot().phase, RunPhase::GameOver);
    }

    #[test]
    fn test_game_over_keeps_higher_best() {
        let mut game = game(1_000);
        game.state_mut().run.score = 450;
        game.state_mut().run.lives = 0;
        game.frame(0.016, &idle(&game));
        assert_eq!(game.store().high_score().unwrap(), 1_000);
    }

    #[test]
    fn test_restart_edge_resets_run() {
        let mut game = game(0);
        game.state_mut().run.lives = 0;
        game.frame(0.016, &idle(&game));
        assert_eq!(game.snapshot().phase, RunPhase::GameOver);

        let restart = FrameInput {
            restart: true,
            ..idle(&game)
        };
        game.frame(0.016, &restart);
        let snap = game.snapshot();
        assert_eq!(snap.phase, RunPhase::Running);
        assert_eq!(snap.lives, 3);
        assert_eq!(snap.level, 1);
    }

    #[test]
    fn test_pause_and_restart_in_one_frame_runs() {
        let mut game = game(0);
        game.state_mut().run.lives = 0;
        game.frame(0.016, &idle(&game));
        assert_eq!(game.snapshot().phase, RunPhase::GameOver);

        let both = FrameInput {
            pause: true,
            restart: true,
            ..idle(&game)
        };
        game.frame(0.016, &both);
        assert_eq!(game.snapshot().phase, RunPhase::Running);

        // Same from a running game: the pause is dropped by the restart
        game.frame(0.016, &both);
        assert_eq!(game.snapshot().phase, RunPhase::Running);
        assert!(game.state().run.elapsed > 0.0);
    }

    #[test]
    fn test_restart_draws_fresh_seed() {
        let mut game = game(0);
        let first = game.state().seed;
        game.restart();
        assert_ne!(game.state().seed, first);
    }

    #[test]
    fn test_broken_store_does_not_stop_play() {
        let mut game = Game::new(
            3,
            Tuning::default(),
            &Settings::default(),
            BrokenStore,
            NullSink,
        );
        assert_eq!(game.best(), 0);
        game.state_mut().run.score = 10;
        game.state_mut().run.lives = 0;
        game.frame(0.016, &idle(&game));
        assert_eq!(game.snapshot().phase, RunPhase::GameOver);
        assert_eq!(game.best(), 10);
    }

    #[test]
    fn test_snapshot_reports_quality_label() {
        let game = game(0);
        assert_eq!(game.snapshot().quality_label, "Auto (ultra)");
        assert_eq!(game.snapshot().accuracy, 1.0);
    }
}
