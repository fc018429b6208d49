//! Collision passes between entity collections
//!
//! Every test is a plain circle overlap. The passes only flag entities and
//! report what happened; score, drops, splits and particles are applied by
//! the tick afterwards so no collection grows while it is being scanned.

use glam::Vec2;

use super::enemy::Enemy;
use super::player::Player;
use super::projectile::{Bullet, EnemyBullet, HomingMissile};
use crate::circles_overlap;
use crate::consts::*;

/// Outcome of the player-bullet pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulletPass {
    /// Bullets that struck something
    pub hits: u64,
    /// Indices of enemies destroyed in this pass
    pub kills: Vec<usize>,
}

/// Outcome of the missile pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissilePass {
    /// Where each missile detonated
    pub impacts: Vec<Vec2>,
    /// Indices of enemies destroyed in this pass
    pub kills: Vec<usize>,
}

/// Player bullets against enemies. Each bullet stops at the first enemy it
/// touches; grace does not protect a target from projectiles.
pub fn bullets_vs_enemies(bullets: &mut [Bullet], enemies: &mut [Enemy]) -> BulletPass {
    let mut pass = BulletPass::default();
    for bullet in bullets.iter_mut().filter(|b| b.active) {
        for (index, enemy) in enemies.iter_mut().enumerate() {
            if !enemy.active || !circles_overlap(bullet.pos, bullet.radius, enemy.pos, enemy.radius) {
                continue;
            }
            bullet.active = false;
            pass.hits += 1;
            if enemy.take_damage(1) {
                pass.kills.push(index);
            }
            break;
        }
    }
    pass
}

/// Player body against enemies. The first enemy rammed is destroyed and its
/// index returned; nothing happens while the player is invulnerable.
pub fn player_vs_enemies(player: &Player, enemies: &mut [Enemy]) -> Option<usize> {
    if player.is_invulnerable() {
        return None;
    }
    let (index, enemy) = enemies.iter_mut().enumerate().find(|(_, e)| {
        e.active
            && !e.in_grace()
            && circles_overlap(
                player.pos,
                player.radius,
                e.pos,
                e.radius * CONTACT_RADIUS_SCALE,
            )
    })?;
    enemy.active = false;
    Some(index)
}

/// Enemy shots against the player. At most one shot lands per frame since
/// a hit makes the player invulnerable.
pub fn enemy_bullets_vs_player(player: &Player, shots: &mut [EnemyBullet]) -> bool {
    if player.is_invulnerable() {
        return false;
    }
    let Some(shot) = shots
        .iter_mut()
        .find(|s| s.active && circles_overlap(s.pos, s.radius, player.pos, player.radius))
    else {
        return false;
    };
    shot.active = false;
    true
}

/// Homing missiles against enemies. Enemies killed by an earlier pass are
/// already inactive and skipped.
pub fn missiles_vs_enemies(missiles: &mut [HomingMissile], enemies: &mut [Enemy]) -> MissilePass {
    let mut pass = MissilePass::default();
    for missile in missiles.iter_mut().filter(|m| m.active) {
        for (index, enemy) in enemies.iter_mut().enumerate() {
            if !enemy.active
                || !circles_overlap(missile.pos, missile.radius, enemy.pos, enemy.radius)
            {
                continue;
            }
            missile.active = false;
            pass.impacts.push(missile.pos);
            if enemy.take_damage(missile.damage) {
                pass.kills.push(index);
            }
            break;
        }
    }
    pass
}
