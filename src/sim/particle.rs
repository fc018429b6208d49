//! Cosmetic particles (never part of collision logic)

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rng::random_range;

/// Seconds a particle lives
pub const PARTICLE_LIFE: f32 = 0.5;
/// Downward acceleration applied to sparks
const PARTICLE_GRAVITY: f32 = 240.0;

/// A spark for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime in seconds
    pub life: f32,
}

impl Particle {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::new(
                random_range(rng, -120.0, 120.0),
                random_range(rng, -180.0, 60.0),
            ),
            life: PARTICLE_LIFE,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.life -= dt;
        if self.life <= 0.0 {
            return;
        }
        self.pos += self.vel * dt;
        self.vel.y += PARTICLE_GRAVITY * dt;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Append `count` sparks at `pos`
pub fn burst<R: Rng + ?Sized>(rng: &mut R, particles: &mut Vec<Particle>, pos: Vec2, count: usize) {
    particles.extend((0..count).map(|_| Particle::spawn(rng, pos)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_particle_expires() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut p = Particle::spawn(&mut rng, Vec2::new(10.0, 10.0));
        assert!(p.is_alive());
        for _ in 0..30 {
            p.update(0.02);
        }
        assert!(!p.is_alive());
    }

    #[test]
    fn test_burst_count() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particles = Vec::new();
        burst(&mut rng, &mut particles, Vec2::ZERO, 14);
        assert_eq!(particles.len(), 14);
        assert!(particles.iter().all(|p| p.pos == Vec2::ZERO));
    }
}
