//! Random source for element rules
//!
//! One xorshift32 generator per engine instance. Every probabilistic decision
//! in the rules (chance rolls, left/right picks, dispersion distances, flame
//! flicker) draws from here, so substituting a seed makes a whole run
//! reproducible.

/// Engine-owned pseudo-random generator.
///
/// Lifecycle: created once at engine construction, before the first
/// `update()` call. Never shared across engines.
pub struct ElementRng {
    state: u32,
}

impl ElementRng {
    /// Seed from entropy. Good enough for a visual toy: wall-clock nanos on
    /// native, `Date.now()` on wasm.
    pub fn from_entropy() -> Self {
        Self::from_seed(entropy_seed())
    }

    /// Deterministic seam for tests.
    pub fn from_seed(seed: u32) -> Self {
        // xorshift must never be seeded with zero
        let state = if seed == 0 { 0x9E37_79B9 } else { seed };
        Self { state }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    #[inline]
    fn next_unit_f32(&mut self) -> f32 {
        // 24 mantissa bits, uniform in [0, 1)
        (self.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
    }

    /// True with probability `chance`, clamped to [0, 1].
    #[inline]
    pub fn random_chance(&mut self, chance: f32) -> bool {
        let chance = chance.clamp(0.0, 1.0);
        // strict: chance 0.0 never fires, 1.0 always does
        self.next_unit_f32() < chance
    }

    /// Uniformly -1 or +1.
    #[inline]
    pub fn random_direction(&mut self) -> i32 {
        if self.next_u32() & 1 == 0 {
            -1
        } else {
            1
        }
    }

    /// Inclusive uniform integer in [lo, hi].
    #[inline]
    pub fn random_int(&mut self, lo: i32, hi: i32) -> i32 {
        debug_assert!(lo <= hi, "random_int: lo={} hi={}", lo, hi);
        let span = (hi - lo) as u32 + 1;
        lo + (self.next_u32() % span) as i32
    }

    /// Uniform real in [lo, hi].
    #[inline]
    pub fn random_float(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_unit_f32() * (hi - lo)
    }
}

#[cfg(target_arch = "wasm32")]
fn entropy_seed() -> u32 {
    let now = js_sys::Date::now();
    // fold the double's bits down to 32
    let bits = now.to_bits();
    (bits ^ (bits >> 32)) as u32
}

#[cfg(not(target_arch = "wasm32"))]
fn entropy_seed() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0x5EED);
    nanos ^ (std::process::id().rotate_left(16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = ElementRng::from_seed(42);
        let mut b = ElementRng::from_seed(42);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn zero_seed_is_remapped() {
        let mut rng = ElementRng::from_seed(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn chance_extremes() {
        let mut rng = ElementRng::from_seed(7);
        for _ in 0..64 {
            assert!(!rng.random_chance(0.0));
            assert!(rng.random_chance(1.0));
        }
        // out-of-range inputs are clamped, not panicked on
        assert!(rng.random_chance(2.5));
        assert!(!rng.random_chance(-1.0));
    }

    #[test]
    fn random_int_is_inclusive() {
        let mut rng = ElementRng::from_seed(9);
        let mut seen_lo = false;
        let mut seen_hi = false;
        for _ in 0..1000 {
            let v = rng.random_int(-2, 2);
            assert!((-2..=2).contains(&v));
            seen_lo |= v == -2;
            seen_hi |= v == 2;
        }
        assert!(seen_lo && seen_hi);
    }

    #[test]
    fn random_direction_hits_both_sides() {
        let mut rng = ElementRng::from_seed(3);
        let mut left = 0;
        let mut right = 0;
        for _ in 0..200 {
            match rng.random_direction() {
                -1 => left += 1,
                1 => right += 1,
                other => panic!("unexpected direction {}", other),
            }
        }
        assert!(left > 50 && right > 50);
    }

    #[test]
    fn random_float_stays_in_range() {
        let mut rng = ElementRng::from_seed(11);
        for _ in 0..500 {
            let v = rng.random_float(0.5, 1.5);
            assert!((0.5..=1.5).contains(&v));
        }
    }
}
