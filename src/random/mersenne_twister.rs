//! 64-bit Mersenne Twister PRNG (MT19937-64).
//!
//! Period 2^19937 - 1. With a fixed seed the output sequence is fully
//! deterministic, which makes encode results reproducible in tests.

use std::time::{SystemTime, UNIX_EPOCH};

use super::RandomSource;

const NN: usize = 312;
const MM: usize = 156;
const MATRIX_A: u64 = 0xB5026F5AA96619E9;
const UM: u64 = 0xFFFFFFFF80000000; // upper 33 bits
const LM: u64 = 0x7FFFFFFF; // lower 31 bits

/// Seed used when the system clock is unavailable.
const FALLBACK_SEED: u64 = 5489;

/// 64-bit Mersenne Twister PRNG.
///
/// Use [`with_seed`](Self::with_seed) for reproducible sequences and
/// [`from_entropy`](Self::from_entropy) for interactive use.
#[derive(Clone)]
pub struct MersenneTwister {
    mt: [u64; NN],
    mti: usize,
    seed: u64,
}

impl std::fmt::Debug for MersenneTwister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MersenneTwister")
            .field("seed", &self.seed)
            .field("mti", &self.mti)
            .finish_non_exhaustive()
    }
}

impl MersenneTwister {
    /// Creates a generator with a fixed, deterministic seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookcipher::random::MersenneTwister;
    ///
    /// let mut a = MersenneTwister::with_seed(7);
    /// let mut b = MersenneTwister::with_seed(7);
    /// assert_eq!(a.next_u64(), b.next_u64());
    /// ```
    pub fn with_seed(seed: u64) -> Self {
        let mut mt = MersenneTwister {
            mt: [0u64; NN],
            mti: NN,
            seed,
        };
        mt.mt[0] = seed;
        for i in 1..NN {
            let prev = mt.mt[i - 1];
            mt.mt[i] = 6364136223846793005u64
                .wrapping_mul(prev ^ (prev >> 62))
                .wrapping_add(i as u64);
        }
        mt
    }

    /// Creates a generator seeded from the system clock.
    pub fn from_entropy() -> Self {
        let now = SystemTime::now().duration_since(UNIX_EPOCH);
        let seed = now
            .map(|d| (d.as_millis() as u64) ^ (d.as_nanos() as u64).rotate_left(21))
            .unwrap_or(FALLBACK_SEED);
        Self::with_seed(seed)
    }

    /// Returns the seed this generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates the next 64-bit pseudorandom value.
    pub fn next_u64(&mut self) -> u64 {
        let mag01: [u64; 2] = [0, MATRIX_A];

        if self.mti >= NN {
            for i in 0..(NN - MM) {
                let x = (self.mt[i] & UM) | (self.mt[i + 1] & LM);
                self.mt[i] = self.mt[i + MM] ^ (x >> 1) ^ mag01[(x & 1) as usize];
            }
            for i in (NN - MM)..(NN - 1) {
                let x = (self.mt[i] & UM) | (self.mt[i + 1] & LM);
                self.mt[i] = self.mt[i + MM - NN] ^ (x >> 1) ^ mag01[(x & 1) as usize];
            }
            let x = (self.mt[NN - 1] & UM) | (self.mt[0] & LM);
            self.mt[NN - 1] = self.mt[MM - 1] ^ (x >> 1) ^ mag01[(x & 1) as usize];
            self.mti = 0;
        }

        let mut x = self.mt[self.mti];
        self.mti += 1;

        // Tempering
        x ^= (x >> 29) & 0x5555555555555555;
        x ^= (x << 17) & 0x71D67FFFEDA60000;
        x ^= (x << 37) & 0xFFF7EEE000000000;
        x ^= x >> 43;
        x
    }

    /// Generates a bounded pseudorandom value in range [0, n).
    ///
    /// Uses rejection sampling so every value is equally likely.
    /// Returns 0 when `n` is 0.
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        if n.is_power_of_two() {
            return self.next_u64() & (n - 1);
        }
        // Values below 2^64 mod n would over-represent the low residues.
        let threshold = n.wrapping_neg() % n;
        loop {
            let bits = self.next_u64();
            if bits >= threshold {
                return bits % n;
            }
        }
    }
}

impl RandomSource for MersenneTwister {
    fn next_below(&mut self, bound: usize) -> usize {
        self.next_u64_below(bound as u64) as usize
    }
}
