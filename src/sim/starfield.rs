//! Parallax starfield background
//!
//! Purely ambient: keeps moving while the run is paused or over.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rng::random_range;

/// Area the base star counts were designed for
const BASE_AREA: f32 = 1600.0 * 900.0;

/// One depth layer of stars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarLayer {
    pub stars: Vec<Vec2>,
    /// Fall speed (units/s)
    pub speed: f32,
    /// Render size hint
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Starfield {
    pub layers: Vec<StarLayer>,
    width: f32,
    height: f32,
}

impl Starfield {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> Self {
        let density = ((width * height) / BASE_AREA).clamp(1.0, 1.6);
        let count = |base: f32| ((base * density).round() as usize).max(10);

        let mut layer = |base: f32, speed: f32, size: f32| StarLayer {
            stars: (0..count(base))
                .map(|_| Vec2::new(random_range(rng, 0.0, width), random_range(rng, 0.0, height)))
                .collect(),
            speed,
            size,
        };

        let layers = vec![
            layer(80.0, 20.0, 1.0),
            layer(60.0, 38.0, 2.0),
            layer(40.0, 70.0, 3.0),
        ];

        Self {
            layers,
            width,
            height,
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, dt: f32) {
        for layer in &mut self.layers {
            for star in &mut layer.stars {
                star.y += layer.speed * dt;
                if star.y > self.height {
                    star.y = 0.0;
                    star.x = random_range(rng, 0.0, self.width);
                }
            }
        }
    }

    pub fn star_count(&self) -> usize {
        self.layers.iter().map(|l| l.stars.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_density_scales_with_area() {
        let mut rng = Pcg32::seed_from_u64(5);
        let small = Starfield::new(&mut rng, 800.0, 450.0);
        let large = Starfield::new(&mut rng, 1920.0, 1080.0);
        assert_eq!(small.star_count(), 180);
        assert!(large.star_count() > small.star_count());
    }

    #[test]
    fn test_stars_wrap_to_top() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut field = Starfield::new(&mut rng, 1920.0, 1080.0);
        field.layers[2].stars[0] = Vec2::new(100.0, 1079.0);
        field.update(&mut rng, 0.1);
        let star = field.layers[2].stars[0];
        assert_eq!(star.y, 0.0);
        assert!((0.0..=1920.0).contains(&star.x));
    }
}
