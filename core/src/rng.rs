//! Random sources for environment drift and reward sampling.
//!
//! Everything that consumes randomness takes a [`UnitSource`], so callers pick
//! the entropy provenance:
//!
//! - [`RandomSource`]: seeded from an arbitrary string, reproducible forever
//! - [`AmbientSource`]: OS-seeded thread-local generator, never reproducible
//! - any `FnMut() -> f64` closure, handy for forcing draws in tests
//!
//! # Seeding
//!
//! The seed string is hashed with FNV-1a and passed through a SplitMix64
//! finalizer so every input bit reaches every state bit. SplitMix64 then
//! expands that word into the 256-bit state of a xoshiro256** generator
//! (period 2^256 - 1).

use bandit_types::SeedKey;

/// 2^-53: maps the top 53 bits of a `u64` onto `[0, 1)`.
const UNIT_SCALE: f64 = 1.0 / (1u64 << 53) as f64;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Provider of uniform draws in `[0, 1)`.
pub trait UnitSource {
    fn next_unit(&mut self) -> f64;
}

impl<F: FnMut() -> f64> UnitSource for F {
    fn next_unit(&mut self) -> f64 {
        self()
    }
}

/// Deterministic generator derived from a string seed.
///
/// Two sources built from equal strings yield identical sequences; sources
/// from different strings are practically independent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomSource {
    state: [u64; 4],
}

impl RandomSource {
    /// Any string is a valid seed, including the empty one.
    #[must_use]
    pub fn new(seed: &str) -> Self {
        Self::from_state(seed_state(seed))
    }

    #[must_use]
    pub fn from_key(key: &SeedKey) -> Self {
        Self::new(&key.to_string())
    }

    /// Expand one 64-bit word into the full generator state.
    #[must_use]
    pub fn from_state(word: u64) -> Self {
        let mut sm = word;
        let state = [
            splitmix64(&mut sm),
            splitmix64(&mut sm),
            splitmix64(&mut sm),
            splitmix64(&mut sm),
        ];
        Self { state }
    }

    /// Next raw 64-bit output (xoshiro256**).
    pub fn next_u64(&mut self) -> u64 {
        let s = &mut self.state;
        let result = s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = s[1] << 17;

        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];
        s[2] ^= t;
        s[3] = s[3].rotate_left(45);

        result
    }
}

impl UnitSource for RandomSource {
    fn next_unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * UNIT_SCALE
    }
}

/// Nondeterministic source backed by `rand`'s thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmbientSource;

impl UnitSource for AmbientSource {
    fn next_unit(&mut self) -> f64 {
        rand::random::<f64>()
    }
}

/// Hash a seed string into the word [`RandomSource::from_state`] expands.
#[must_use]
pub fn seed_state(seed: &str) -> u64 {
    mix64(fnv1a64(seed.as_bytes()))
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(GOLDEN_GAMMA);
    mix64(*state)
}
