//! Power-ups: probabilistic drops, falling pickups and collection

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rng::{chance, random_range, weighted_pick};
use crate::circles_overlap;
use crate::consts::*;
use crate::tuning::Tuning;

/// Pickups cannot be collected for this long after dropping
pub const PICKUP_GRACE: f32 = 0.2;
/// Pickups fall out of play this far below the arena
const DESPAWN_MARGIN: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    ExtraLife,
    ShotUpgrade,
    Missile,
}

impl PowerUpKind {
    /// Score granted on pickup
    pub fn bonus(self) -> u64 {
        match self {
            PowerUpKind::ExtraLife => LIFE_BONUS,
            PowerUpKind::ShotUpgrade => SHOT_UPGRADE_BONUS,
            PowerUpKind::Missile => MISSILE_BONUS,
        }
    }

    /// (radius, fall speed, float amplitude)
    fn shape(self) -> (f32, f32, f32) {
        match self {
            PowerUpKind::ExtraLife => (18.0, 140.0, 14.0),
            PowerUpKind::ShotUpgrade => (24.0, 120.0, 20.0),
            PowerUpKind::Missile => (22.0, 130.0, 18.0),
        }
    }
}

/// A falling pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub fall_speed: f32,
    pub radius: f32,
    pub float_amplitude: f32,
    pub spin: f32,
    pub spin_speed: f32,
    /// Seconds since drop
    pub age: f32,
    pub grace: f32,
    pub active: bool,
}

impl PowerUp {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, kind: PowerUpKind, pos: Vec2) -> Self {
        let (radius, fall_speed, float_amplitude) = kind.shape();
        Self {
            kind,
            pos,
            fall_speed,
            radius,
            float_amplitude,
            spin: random_range(rng, 0.0, std::f32::consts::TAU),
            spin_speed: random_range(rng, -2.0, 2.0),
            age: 0.0,
            grace: PICKUP_GRACE,
            active: true,
        }
    }

    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        self.age += dt;
        self.grace = (self.grace - dt).max(0.0);
        self.pos.y += self.fall_speed * dt;
        self.pos.x += (self.age * 3.0).sin() * self.float_amplitude * dt;
        self.spin += self.spin_speed * dt;
        if self.pos.y > tuning.arena_height + DESPAWN_MARGIN {
            self.active = false;
        }
    }

    pub fn can_be_collected_by(&self, player_pos: Vec2, player_radius: f32) -> bool {
        self.active
            && self.grace <= 0.0
            && circles_overlap(self.pos, self.radius, player_pos, player_radius)
    }
}

/// Run facts the drop roll depends on
#[derive(Debug, Clone, Copy)]
pub struct DropContext {
    pub elapsed: f32,
    pub effective_difficulty: f32,
    pub lives: u32,
    pub missiles_active: bool,
}

/// Owns every falling pickup and decides what drops
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUpEconomy {
    pub items: Vec<PowerUp>,
}

impl PowerUpEconomy {
    pub fn reset(&mut self) {
        self.items.clear();
    }

    /// Drop probability for the current difficulty
    pub fn drop_chance(effective_difficulty: f32, tuning: &Tuning) -> f32 {
        let base = tuning.power_drop_chance;
        let boosted = if effective_difficulty > tuning.power_drop_boost_threshold {
            base * tuning.power_drop_boost
        } else {
            base
        };
        boosted.clamp(0.0, tuning.power_drop_max_chance)
    }

    /// Weighted menu of kinds on offer
    pub fn drop_weights(lives: u32, missiles_active: bool) -> Vec<(PowerUpKind, f32)> {
        let mut options = vec![
            (PowerUpKind::ShotUpgrade, 0.65),
            (PowerUpKind::Missile, if missiles_active { 0.4 } else { 0.7 }),
        ];
        if lives < MAX_LIVES {
            options.push((PowerUpKind::ExtraLife, if lives < 3 { 0.7 } else { 0.3 }));
        }
        options
    }

    /// Roll for a drop at a kill site. Returns the kind that dropped.
    pub fn request_drop<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        pos: Vec2,
        ctx: DropContext,
        tuning: &Tuning,
    ) -> Option<PowerUpKind> {
        if ctx.elapsed < tuning.power_drop_safe_time {
            return None;
        }
        if !chance(rng, Self::drop_chance(ctx.effective_difficulty, tuning)) {
            return None;
        }
        let kind = weighted_pick(rng, &Self::drop_weights(ctx.lives, ctx.missiles_active))?;
        self.items.push(PowerUp::new(rng, kind, pos));
        Some(kind)
    }

    /// Advance pickups and collect what the player touches.
    /// Collected and fallen items are removed; collected kinds are returned.
    pub fn update(
        &mut self,
        dt: f32,
        player_pos: Vec2,
        player_radius: f32,
        tuning: &Tuning,
    ) -> Vec<PowerUpKind> {
        let mut collected = Vec::new();
        self.items.retain_mut(|item| {
            item.update(dt, tuning);
            if !item.active {
                return false;
            }
            if item.can_be_collected_by(player_pos, player_radius) {
                item.active = false;
                collected.push(item.kind);
                return false;
            }
            true
        });
        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(elapsed: f32) -> DropContext {
        DropContext {
            elapsed,
            effective_difficulty: 1.0,
            lives: 3,
            missiles_active: false,
        }
    }

    #[test]
    fn test_no_drops_early_in_run() {
        let tuning = Tuning {
            power_drop_chance: 1.0,
            power_drop_max_chance: 1.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(8);
        let mut economy = PowerUpEconomy::default();
        for _ in 0..100 {
            assert_eq!(economy.request_drop(&mut rng, Vec2::ZERO, ctx(9.9), &tuning), None);
        }
        assert!(economy.request_drop(&mut rng, Vec2::ZERO, ctx(10.0), &tuning).is_some());
        assert_eq!(economy.items.len(), 1);
    }

    #[test]
    fn test_drop_chance_boost_and_clamp() {
        let tuning = Tuning::default();
        assert!((PowerUpEconomy::drop_chance(1.0, &tuning) - 0.06).abs() < 1e-6);
        assert!((PowerUpEconomy::drop_chance(2.5, &tuning) - 0.09).abs() < 1e-6);

        let generous = Tuning {
            power_drop_chance: 0.25,
            ..Tuning::default()
        };
        assert_eq!(PowerUpEconomy::drop_chance(2.5, &generous), 0.3);
    }

    #[test]
    fn test_life_only_offered_below_cap() {
        let full = PowerUpEconomy::drop_weights(MAX_LIVES, false);
        assert!(!full.iter().any(|(k, _)| *k == PowerUpKind::ExtraLife));

        let low = PowerUpEconomy::drop_weights(2, true);
        let life = low.iter().find(|(k, _)| *k == PowerUpKind::ExtraLife).unwrap();
        assert_eq!(life.1, 0.7);
        let missile = low.iter().find(|(k, _)| *k == PowerUpKind::Missile).unwrap();
        assert_eq!(missile.1, 0.4);
    }

    #[test]
    fn test_pickup_waits_for_grace() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(8);
        let mut economy = PowerUpEconomy::default();
        let spot = Vec2::new(500.0, 500.0);
        economy.items.push(PowerUp::new(&mut rng, PowerUpKind::Missile, spot));

        // Player sitting right on the drop
        let first = economy.update(0.1, spot, PLAYER_RADIUS, &tuning);
        assert!(first.is_empty());
        assert_eq!(economy.items.len(), 1);

        let second = economy.update(0.15, spot, PLAYER_RADIUS, &tuning);
        assert_eq!(second, vec![PowerUpKind::Missile]);
        assert!(economy.items.is_empty());
    }

    #[test]
    fn test_uncollected_pickup_falls_away() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(8);
        let mut economy = PowerUpEconomy::default();
        economy
            .items
            .push(PowerUp::new(&mut rng, PowerUpKind::ExtraLife, Vec2::new(100.0, 1100.0)));
        for _ in 0..60 {
            economy.update(1.0 / 60.0, Vec2::new(1800.0, 100.0), PLAYER_RADIUS, &tuning);
        }
        assert!(economy.items.is_empty());
    }
}
