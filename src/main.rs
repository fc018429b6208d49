//! Star Skirmish headless driver
//!
//! Plays one scripted run at 60 fps with no window: the ship sweeps across
//! the lower arena with the trigger held. Usage:
//!
//! ```text
//! star-skirmish [seed] [seconds]
//! ```
//!
//! `STAR_SKIRMISH_TUNING` may point at a JSON balance file. The best score
//! is kept in `star_skirmish_best.json` in the working directory.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use star_skirmish::audio::LogSink;
use star_skirmish::game::FrameInput;
use star_skirmish::sim::{GameEvent, RunPhase};
use star_skirmish::{FileHighScores, Game, Settings, Tuning};

const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 180.0;
const BEST_SCORE_FILE: &str = "star_skirmish_best.json";
const TUNING_ENV: &str = "STAR_SKIRMISH_TUNING";

fn load_tuning() -> Tuning {
    let Ok(path) = std::env::var(TUNING_ENV) else {
        return Tuning::default();
    };
    let parsed = std::fs::read_to_string(&path)
        .map_err(|err| err.to_string())
        .and_then(|json| Tuning::from_json(&json).map_err(|err| err.to_string()));
    match parsed {
        Ok(tuning) => {
            log::info!("Loaded tuning from {path}");
            tuning
        }
        Err(err) => {
            log::warn!("Ignoring tuning file {path}: {err}");
            Tuning::default()
        }
    }
}

/// Ship sweeps side to side in the lower third, always firing
fn scripted_input(tuning: &Tuning, t: f32) -> FrameInput {
    let margin = 120.0;
    let span = tuning.arena_width - margin * 2.0;
    let x = margin + span * (0.5 + 0.5 * (t * 0.7).sin());
    let y = tuning.arena_height * (0.78 + 0.06 * (t * 1.9).sin());
    FrameInput {
        target: Vec2::new(x, y),
        firing: true,
        ..FrameInput::default()
    }
}

/// Explosions from destroyed enemies. Every player hit also explodes, so
/// those are taken back out.
fn enemy_kills(events: &[GameEvent]) -> u32 {
    let count = |wanted: fn(&GameEvent) -> bool| events.iter().filter(|e| wanted(e)).count();
    let explosions = count(|e| matches!(e, GameEvent::Explosion));
    let player_hits = count(|e| matches!(e, GameEvent::PlayerHit { .. }));
    explosions.saturating_sub(player_hits) as u32
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(DEFAULT_SECONDS);

    let tuning = load_tuning();
    let mut game = Game::new(
        seed,
        tuning.clone(),
        &Settings::default(),
        FileHighScores::new(BEST_SCORE_FILE),
        LogSink,
    );
    log::info!("Best score file: {}", game.store().path().display());

    let frames = (seconds / FRAME_DT).ceil() as u64;
    let mut kills = 0u32;
    let mut bosses = 0u32;
    for frame in 0..frames {
        let t = frame as f32 * FRAME_DT;
        let input = scripted_input(&tuning, t);
        let events = game.frame(FRAME_DT, &input);
        kills += enemy_kills(events);
        for event in events {
            match event {
                GameEvent::BossSpawned => bosses += 1,
                GameEvent::PlayerHit { lives } => log::info!("Hit at {t:.1}s, {lives} lives left"),
                _ => {}
            }
        }
        if frame % 600 == 0 {
            let snap = game.snapshot();
            log::debug!(
                "t={:.0}s score={} level={} lives={} enemies={}",
                t,
                snap.score,
                snap.level,
                snap.lives,
                game.state().enemies.len()
            );
        }
        if game.snapshot().phase == RunPhase::GameOver {
            break;
        }
    }

    let snap = game.snapshot();
    println!("Star Skirmish (seed {seed})");
    println!("  score     {}", snap.score);
    println!("  best      {}", snap.best);
    println!("  level     {}", snap.level);
    println!("  lives     {}", snap.lives);
    println!("  time      {:.1}s", snap.elapsed);
    println!("  accuracy  {:.0}%", snap.accuracy * 100.0);
    println!("  blasts    {kills}");
    println!("  bosses    {bosses}");
    match serde_json::to_string(&snap) {
        Ok(json) => log::debug!("Final snapshot: {json}"),
        Err(err) => log::warn!("Could not encode snapshot: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_hits_are_not_kills() {
        let events = [
            GameEvent::Shoot,
            GameEvent::Explosion,
            GameEvent::Explosion,
            GameEvent::PlayerHit { lives: 2 },
            GameEvent::Explosion,
        ];
        assert_eq!(enemy_kills(&events), 2);
        assert_eq!(enemy_kills(&[GameEvent::Explosion, GameEvent::PlayerHit { lives: 0 }]), 0);
        assert_eq!(enemy_kills(&[]), 0);
    }
}
