//! Asteroids: size tiers, outlines and splitting

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind};
use super::rng::random_range;
use crate::{angle_of, heading};

/// Outline vertex count
const OUTLINE_SIDES: usize = 10;
/// Collision grace for wave-spawned asteroids
pub const SPAWN_GRACE: f32 = 0.15;
/// Collision grace for split children
pub const CHILD_GRACE: f32 = 0.3;
/// Children a destroyed asteroid tries to leave behind
pub const CHILDREN_PER_SPLIT: usize = 2;
/// Children always keep drifting downward at least this fast
const CHILD_MIN_FALL_SPEED: f32 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    pub fn radius(self) -> f32 {
        match self {
            AsteroidSize::Large => 64.0,
            AsteroidSize::Medium => 40.0,
            AsteroidSize::Small => 24.0,
        }
    }

    pub fn health(self) -> i32 {
        match self {
            AsteroidSize::Large => 3,
            AsteroidSize::Medium => 2,
            AsteroidSize::Small => 1,
        }
    }

    pub fn score(self) -> u64 {
        match self {
            AsteroidSize::Large => 10,
            AsteroidSize::Medium => 20,
            AsteroidSize::Small => 30,
        }
    }

    /// Tier children split into (None for the smallest)
    pub fn smaller(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }
}

/// Asteroid-specific state carried in `EnemyKind::Asteroid`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidParams {
    pub size: AsteroidSize,
    /// Jittered regular polygon, relative to the center
    pub outline: Vec<Vec2>,
}

/// Result of destroying an asteroid
#[derive(Debug, Clone, Default)]
pub struct SplitOutcome {
    pub children: Vec<Enemy>,
    /// Score standing in for children the population cap refused
    pub bonus_score: u64,
}

fn outline<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec<Vec2> {
    (0..OUTLINE_SIDES)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / OUTLINE_SIDES as f32;
            heading(angle) * radius * random_range(rng, 0.72, 1.08)
        })
        .collect()
}

impl Enemy {
    pub fn asteroid<R: Rng + ?Sized>(rng: &mut R, size: AsteroidSize, pos: Vec2, vel: Vec2) -> Self {
        let radius = size.radius();
        let mut enemy = Self::new(
            pos,
            radius,
            size.health(),
            size.score(),
            EnemyKind::Asteroid(AsteroidParams {
                size,
                outline: outline(rng, radius),
            }),
        );
        enemy.vel = vel;
        enemy.rotation = random_range(rng, 0.0, std::f32::consts::TAU);
        enemy.rotation_speed = random_range(rng, -0.6, 0.6);
        enemy.grace = SPAWN_GRACE;
        enemy
    }

    /// Large asteroid drifting down from above the arena
    pub fn large_asteroid<R: Rng + ?Sized>(rng: &mut R, pos: Vec2) -> Self {
        let vel = Vec2::new(random_range(rng, -65.0, 65.0), random_range(rng, 95.0, 135.0));
        Self::asteroid(rng, AsteroidSize::Large, pos, vel)
    }

    pub fn asteroid_size(&self) -> Option<AsteroidSize> {
        match &self.kind {
            EnemyKind::Asteroid(params) => Some(params.size),
            _ => None,
        }
    }

    /// Break into up to two smaller asteroids.
    ///
    /// `population` is the number of live asteroids (this one excluded, it
    /// is already dead). Children the cap cannot hold are paid out as score.
    pub fn split<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        population: usize,
        max_asteroids: usize,
    ) -> SplitOutcome {
        let Some(child_size) = self.asteroid_size().and_then(AsteroidSize::smaller) else {
            return SplitOutcome::default();
        };

        let free_slots = max_asteroids.saturating_sub(population);
        let spawn_count = CHILDREN_PER_SPLIT.min(free_slots);

        // A motionless parent splits as if it were falling straight down
        let (base_angle, base_speed) = if self.vel == Vec2::ZERO {
            (std::f32::consts::FRAC_PI_2, 1.0)
        } else {
            (angle_of(self.vel), self.vel.length())
        };

        let children = (0..spawn_count)
            .map(|i| {
                let direction = if i == 0 { -1.0 } else { 1.0 };
                let offset = random_range(rng, 25.0, 35.0).to_radians();
                let speed = base_speed * random_range(rng, 1.1, 1.3);
                let mut vel = heading(base_angle + direction * offset) * speed;
                vel.y = vel.y.abs().max(CHILD_MIN_FALL_SPEED);

                let mut child = Enemy::asteroid(rng, child_size, self.pos, vel);
                child.grace = CHILD_GRACE;
                child
            })
            .collect();

        let missing = (CHILDREN_PER_SPLIT - spawn_count) as u64;
        SplitOutcome {
            children,
            bonus_score: missing * child_size.score(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_tier_table() {
        assert_eq!(AsteroidSize::Large.radius(), 64.0);
        assert_eq!(AsteroidSize::Medium.health(), 2);
        assert_eq!(AsteroidSize::Small.score(), 30);
        assert_eq!(AsteroidSize::Small.smaller(), None);
    }

    #[test]
    fn test_outline_is_jittered_polygon() {
        let mut rng = Pcg32::seed_from_u64(11);
        let rock = Enemy::large_asteroid(&mut rng, Vec2::new(400.0, -80.0));
        let EnemyKind::Asteroid(params) = &rock.kind else {
            unreachable!()
        };
        assert_eq!(params.outline.len(), OUTLINE_SIDES);
        for v in &params.outline {
            let r = v.length();
            assert!(r >= 64.0 * 0.72 - 1e-3 && r <= 64.0 * 1.08 + 1e-3);
        }
        assert_eq!(rock.grace, SPAWN_GRACE);
    }

    #[test]
    fn test_split_large_into_two_medium() {
        let mut rng = Pcg32::seed_from_u64(11);
        let rock = Enemy::large_asteroid(&mut rng, Vec2::new(400.0, 300.0));
        let outcome = rock.split(&mut rng, 0, 40);
        assert_eq!(outcome.children.len(), 2);
        assert_eq!(outcome.bonus_score, 0);
        for child in &outcome.children {
            assert_eq!(child.asteroid_size(), Some(AsteroidSize::Medium));
            assert_eq!(child.grace, CHILD_GRACE);
            assert!(child.vel.y >= CHILD_MIN_FALL_SPEED);
            assert_eq!(child.pos, rock.pos);
        }
    }

    #[test]
    fn test_split_at_cap_pays_score() {
        let mut rng = Pcg32::seed_from_u64(11);
        let rock = Enemy::asteroid(
            &mut rng,
            AsteroidSize::Medium,
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 100.0),
        );

        let one_slot = rock.split(&mut rng, 39, 40);
        assert_eq!(one_slot.children.len(), 1);
        assert_eq!(one_slot.bonus_score, 30);

        let full = rock.split(&mut rng, 40, 40);
        assert!(full.children.is_empty());
        assert_eq!(full.bonus_score, 60);
    }

    #[test]
    fn test_small_does_not_split() {
        let mut rng = Pcg32::seed_from_u64(11);
        let rock = Enemy::asteroid(&mut rng, AsteroidSize::Small, Vec2::ZERO, Vec2::Y);
        let outcome = rock.split(&mut rng, 0, 40);
        assert!(outcome.children.is_empty());
        assert_eq!(outcome.bonus_score, 0);
    }
}
