//! Random URL suffix generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Characters a suffix is drawn from: lowercase ASCII letters then digits.
pub const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub const DEFAULT_SUFFIX_LENGTH: usize = 12;

/// Produces fixed-length random suffixes from [`SUFFIX_ALPHABET`].
///
/// Generic over the random source so tests can supply a seeded generator.
pub struct SuffixGenerator<R = StdRng> {
    length: usize,
    rng: R,
}

impl SuffixGenerator<StdRng> {
    /// Create a generator seeded from the operating system.
    pub fn new(length: usize) -> Self {
        Self::with_rng(length, StdRng::from_os_rng())
    }
}

impl<R: Rng> SuffixGenerator<R> {
    pub fn with_rng(length: usize, rng: R) -> Self {
        Self { length, rng }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Generate the next suffix. Every call draws fresh characters.
    pub fn generate(&mut self) -> String {
        let length = self.length;
        let rng = &mut self.rng;

        (0..length)
            .map(|_| {
                let index = rng.random_range(0..SUFFIX_ALPHABET.len());
                char::from(SUFFIX_ALPHABET[index])
            })
            .collect()
    }
}
