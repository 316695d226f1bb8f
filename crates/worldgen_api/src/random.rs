//! Small helpers for drawing values from a [`RngCore`] without going through
//! distribution types. Every sampling path in the crate funnels through these
//! so that a fixed RNG produces predictable values in tests.
use rand::RngCore;

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    // 53 significant bits, the full precision of an f64 mantissa.
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Generate a random integer in `0..bound`. Returns 0 when `bound` is 0.
#[inline]
pub(crate) fn rand_below(rng: &mut dyn RngCore, bound: u32) -> u32 {
    ((rng.next_u32() as u64 * bound as u64) >> 32) as u32
}

/// Roll once against `chance`. Values at or below 0 never succeed, values at
/// or above 1 always do.
#[inline]
pub(crate) fn roll(rng: &mut dyn RngCore, chance: f64) -> bool {
    rand01(rng) < chance
}
