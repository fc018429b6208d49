//! Random helpers shared by the simulation
//!
//! Everything takes the run's RNG explicitly so a seed reproduces a session.

use rand::Rng;

/// Uniform value in `[min, max)`; returns `min` for an empty range
#[inline]
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Bernoulli roll with probability clamped to [0, 1]
#[inline]
pub fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f32) -> bool {
    rng.random::<f32>() < probability.clamp(0.0, 1.0)
}

/// Pick a value with probability proportional to its weight
///
/// Non-positive weights never win unless every weight is non-positive, in
/// which case the last option is returned. Empty input yields `None`.
pub fn weighted_pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, options: &[(T, f32)]) -> Option<T> {
    let last = options.last()?.0;
    let total: f32 = options.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return Some(last);
    }

    let mut roll = rng.random::<f32>() * total;
    for &(value, weight) in options {
        let weight = weight.max(0.0);
        if roll < weight {
            return Some(value);
        }
        roll -= weight;
    }
    Some(last)
}
