//! Injectable corruption for exercising the resend path in tests.
//!
//! A byte-flipping `rand()`-driven corruption mode against unseeded global
//! state is a common way firmware test harnesses force a peer to request a
//! resend. Here the same idea is an explicit, seeded, off-by-default
//! component: [`JitterConfig`] plus [`Jitter::corrupt_copy`], which only
//! ever touches a caller-owned copy of a frame — never the bytes a
//! [`crate::link::sender`] loop actually writes to the wire.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy)]
pub struct JitterConfig {
    pub enabled: bool,
    /// Corrupt roughly one frame in every `corrupt_every`.
    pub corrupt_every: u32,
}

impl Default for JitterConfig {
    fn default() -> Self {
        JitterConfig {
            enabled: false,
            corrupt_every: 3,
        }
    }
}

pub struct Jitter {
    config: JitterConfig,
    rng: StdRng,
}

impl Jitter {
    pub fn new(config: JitterConfig, seed: u64) -> Self {
        Jitter {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns a copy of `frame` with one byte flipped, or `frame`
    /// unchanged, according to `config`. Never mutates `frame` itself.
    pub fn corrupt_copy(&mut self, frame: &[u8]) -> Vec<u8> {
        let mut copy = frame.to_vec();
        if !self.config.enabled || copy.is_empty() {
            return copy;
        }
        if self.rng.gen_range(0..self.config.corrupt_every) == 0 {
            let idx = self.rng.gen_range(0..copy.len());
            copy[idx] ^= 0xFF;
        }
        copy
    }
}
