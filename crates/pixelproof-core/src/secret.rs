//! # Secret generation
//!
//! Secrets are drawn character by character from the 62 ASCII alphanumerics
//! (`A-Z`, `a-z`, `0-9`) using the operating system's CSPRNG. The unpredictability
//! of a secret is the whole basis of an authenticity claim, so no seedable
//! general purpose generator is ever used here.
//!
//! A secret of length `l` is one of `62^l` equally likely values. Across `n`
//! generated secrets the chance that any two collide is about
//! `1 - exp(-n(n-1) / (2 * 62^l))`, see [`collision_probability`]. For the default
//! length of 16 and a million issued secrets that is below `1e-16`. Collisions are
//! never assumed away though, registries reject a secret that was issued before.

use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::{CryptoRng, Rng, RngCore};

/// number of distinct characters a secret is drawn from
pub const ALPHABET_SIZE: usize = 62;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretOptions {
    /// number of characters of a generated secret
    pub length: usize,
}

impl Default for SecretOptions {
    fn default() -> Self {
        Self { length: 16 }
    }
}

impl SecretOptions {
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }
}

/// generates a fresh secret from the operating system's random source
pub fn generate_secret(options: &SecretOptions) -> String {
    generate_secret_with(&mut OsRng, options)
}

/// generates a secret from any cryptographically secure generator
pub fn generate_secret_with<R: RngCore + CryptoRng>(rng: &mut R, options: &SecretOptions) -> String {
    (0..options.length)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// Birthday bound for at least one collision among `count` secrets of `length` characters.
pub fn collision_probability(count: u64, length: usize) -> f64 {
    if count < 2 {
        return 0.0;
    }
    let space = (ALPHABET_SIZE as f64).powi(length as i32);
    let pairs = count as f64 * (count as f64 - 1.0) / 2.0;

    -(-pairs / space).exp_m1()
}
