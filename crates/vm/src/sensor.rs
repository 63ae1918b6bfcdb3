//! Sensors readable through `READ_SENSOR`, and the run's random source.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

/// A named external signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    /// Seconds elapsed since the run started.
    Time,
    /// Uniform sample in `[0, 1)`.
    Rand,
}

impl Sensor {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "time" => Some(Sensor::Time),
            "rand" => Some(Sensor::Rand),
            _ => None,
        }
    }
}

/// Replacement for a zero state, which xorshift can never leave.
const FALLBACK_SEED: u64 = 0x2545_F491_4F6C_DD1D;

/// xorshift64 generator. One per run.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// A generator with a fixed seed. Same seed, same samples.
    ///
    /// The seed is mixed first so that small seeds do not start the
    /// sequence with tiny values.
    pub fn new(seed: u64) -> Self {
        let state = splitmix64(seed);
        Self {
            state: if state == 0 { FALLBACK_SEED } else { state },
        }
    }

    /// A generator seeded from the process hasher keys and the clock.
    pub fn from_entropy() -> Self {
        let mut hasher = RandomState::new().build_hasher();
        if let Ok(now) = SystemTime::now().duration_since(UNIX_EPOCH) {
            hasher.write_u128(now.as_nanos());
        }
        Self::new(hasher.finish())
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform sample in `[0, 1)` built from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_names() {
        assert_eq!(Sensor::from_name("time"), Some(Sensor::Time));
        assert_eq!(Sensor::from_name("rand"), Some(Sensor::Rand));
        assert_eq!(Sensor::from_name("Time"), None);
        assert_eq!(Sensor::from_name("luz"), None);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = XorShift64::new(42);
        let mut b = XorShift64::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn small_seeds_start_spread_out() {
        for seed in 0..64 {
            let x = XorShift64::new(seed).next_f64();
            assert!(x > 1e-4, "seed {seed} starts at {x}");
        }
    }

    #[test]
    fn zero_seed_still_advances() {
        let mut rng = XorShift64::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn samples_stay_in_unit_interval() {
        let mut rng = XorShift64::new(0xDEAD_BEEF_CAFE_BABE);
        for _ in 0..10_000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x), "{x} outside [0, 1)");
        }
    }

    #[test]
    fn consecutive_samples_differ() {
        let mut rng = XorShift64::from_entropy();
        assert_ne!(rng.next_f64(), rng.next_f64());
    }
}
