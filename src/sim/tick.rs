//! Per-frame simulation tick
//!
//! Advances a run by one capped time step in a fixed order: ambient
//! background, difficulty, player, firing, waves, entities, power-ups,
//! collisions, and finally the game-over check.

use glam::Vec2;

use super::collision;
use super::difficulty::DifficultyInputs;
use super::enemy::Enemy;
use super::particle::burst;
use super::player::FireCommand;
use super::powerup::DropContext;
use super::projectile::HomingMissile;
use super::state::{GameEvent, GameState};
use super::wave::WaveContext;
use crate::consts::*;

/// Background drifts slightly slower than real time
const STARFIELD_TIME_SCALE: f32 = 0.9;

/// Input sampled for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Where the ship should head (world coordinates)
    pub target: Vec2,
    /// Trigger held
    pub firing: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Ambient motion keeps going while paused or after game over
    state
        .starfield
        .update(&mut state.rng, dt * STARFIELD_TIME_SCALE);

    if !state.is_running() {
        return;
    }

    state.run.elapsed += dt;
    update_difficulty(state, dt);

    state.player.update(dt, input.target, &state.tuning);
    if input.firing {
        fire(state);
    }

    run_waves(state, dt);
    advance_entities(state, dt);
    collect_power_ups(state, dt);
    resolve_collisions(state);

    if state.run.lives == 0 {
        end_run(state);
    }
}

fn update_difficulty(state: &mut GameState, dt: f32) {
    let inputs = DifficultyInputs {
        elapsed: state.run.elapsed,
        score: state.run.score,
        lives: state.run.lives,
        accuracy: state.run.accuracy(),
    };
    if state.difficulty.update(dt, inputs, &state.tuning) {
        log::info!(
            "Adaptive assist on (lives {}, accuracy {:.2})",
            inputs.lives,
            inputs.accuracy
        );
        state.events.push(GameEvent::AssistActivated);
    }
}

fn fire(state: &mut GameState) {
    let commands = state.player.try_fire(&state.tuning);
    if commands.is_empty() {
        return;
    }
    // Accuracy counts volleys, not individual bullets
    state.run.shots_fired += 1;
    state.events.push(GameEvent::Shoot);

    for command in commands {
        match command {
            FireCommand::Bullet(bullet) => state.bullets.push(bullet),
            FireCommand::Missile { pos } => {
                state.missiles.push(HomingMissile::new(pos, &state.tuning));
                state.events.push(GameEvent::MissileLaunch);
            }
        }
    }
}

fn run_waves(state: &mut GameState, dt: f32) {
    let ctx = WaveContext {
        level: state.run.level,
        effective_difficulty: state.difficulty.effective,
        base_difficulty: state.difficulty.base,
        asteroid_count: state.asteroid_count(),
        boss_active: state.has_active_boss(),
    };
    let outcome = state.waves.update(&mut state.rng, dt, ctx, &state.tuning);

    if outcome.boss_spawned {
        log::info!(
            "Boss incoming at level {} (base difficulty {:.2})",
            ctx.level,
            ctx.base_difficulty
        );
        state.events.push(GameEvent::BossSpawned);
    }
    state.enemies.extend(outcome.spawned);
    state.award(outcome.free_score);
}

fn advance_entities(state: &mut GameState, dt: f32) {
    let tuning = &state.tuning;

    for bullet in &mut state.bullets {
        bullet.update(dt, tuning);
    }
    state.bullets.retain(|b| b.active);

    for shot in &mut state.enemy_bullets {
        shot.update(dt, tuning);
    }
    state.enemy_bullets.retain(|s| s.active);

    for missile in &mut state.missiles {
        missile.update(dt, &state.enemies, tuning);
    }
    state.missiles.retain(|m| m.active);

    let factor = state.difficulty.effective;
    let player_pos = state.player.pos;
    let mut fired = false;
    for enemy in &mut state.enemies {
        let shots = enemy.update(&mut state.rng, dt, factor, player_pos, tuning);
        if !shots.is_empty() {
            fired = true;
            state.enemy_bullets.extend(shots);
        }
    }
    state.enemies.retain(|e| e.active);
    if fired {
        state.events.push(GameEvent::EnemyShoot);
    }

    for particle in &mut state.particles {
        particle.update(dt);
    }
    state.particles.retain(|p| p.is_alive());
}

fn collect_power_ups(state: &mut GameState, dt: f32) {
    let collected = state.power_ups.update(
        dt,
        state.player.pos,
        state.player.radius,
        &state.tuning,
    );
    for kind in collected {
        log::debug!("Collected {:?}", kind);
        state.apply_power_up(kind);
    }
}

/// Run the four passes in order. Children from splits are buffered and
/// only join the enemy list once every pass is done.
fn resolve_collisions(state: &mut GameState) {
    let mut spawned = Vec::new();

    let shots = collision::bullets_vs_enemies(&mut state.bullets, &mut state.enemies);
    state.run.shots_hit += shots.hits;
    for index in shots.kills {
        destroy_enemy(state, index, true, &mut spawned);
    }

    if let Some(index) = collision::player_vs_enemies(&state.player, &mut state.enemies) {
        destroy_enemy(state, index, false, &mut spawned);
        hit_player(state);
    }

    if collision::enemy_bullets_vs_player(&state.player, &mut state.enemy_bullets) {
        hit_player(state);
    }

    let missiles = collision::missiles_vs_enemies(&mut state.missiles, &mut state.enemies);
    for pos in missiles.impacts {
        burst(&mut state.rng, &mut state.particles, pos, MISSILE_SPARK_PARTICLES);
    }
    for index in missiles.kills {
        destroy_enemy(state, index, true, &mut spawned);
    }

    state.enemies.append(&mut spawned);
}

/// Consequences of an enemy dying. Rammed enemies give no score or drop.
fn destroy_enemy(state: &mut GameState, index: usize, rewarded: bool, spawned: &mut Vec<Enemy>) {
    let Some(enemy) = state.enemies.get(index) else {
        return;
    };
    let pos = enemy.pos;
    let score_value = enemy.score_value;
    let is_asteroid = enemy.is_asteroid();

    state.events.push(GameEvent::Explosion);
    burst(&mut state.rng, &mut state.particles, pos, EXPLOSION_PARTICLES);

    if rewarded {
        state.award(score_value);
        let ctx = DropContext {
            elapsed: state.run.elapsed,
            effective_difficulty: state.difficulty.effective,
            lives: state.run.lives,
            missiles_active: state.player.missile_active,
        };
        if let Some(kind) = state
            .power_ups
            .request_drop(&mut state.rng, pos, ctx, &state.tuning)
        {
            log::debug!("Dropped {:?} at ({:.0}, {:.0})", kind, pos.x, pos.y);
        }
    }

    if is_asteroid {
        let pending = spawned.iter().filter(|e| e.is_asteroid()).count();
        let population = state.asteroid_count() + pending;
        let outcome =
            state.enemies[index].split(&mut state.rng, population, state.tuning.max_asteroids);
        spawned.extend(outcome.children);
        state.award(outcome.bonus_score);
    }
}

fn hit_player(state: &mut GameState) {
    let pos = state.player.pos;
    burst(&mut state.rng, &mut state.particles, pos, EXPLOSION_PARTICLES);
    state.events.push(GameEvent::Explosion);
    state.hit_player();
}

fn end_run(state: &mut GameState) {
    state.game_over = true;
    log::info!(
        "Game over: score {}, level {}, accuracy {:.2}, {:.1}s",
        state.run.score,
        state.run.level,
        state.run.accuracy(),
        state.run.elapsed
    );
    state.events.push(GameEvent::GameOver {
        score: state.run.score,
    });
}
