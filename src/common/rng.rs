//! Random sources used by the pipeline.
//!
//! Structure and parameters come from a seeded, reproducible generator.
//! Data rows come from a cryptographically strong generator seeded by the
//! operating system; there is no fallback to a weaker source.

use log::debug;
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::{ChaCha8Rng, ChaCha20Rng};

use super::error::{GeneratorError, Result};

/// Reproducible generator for structure and CPT synthesis.
pub type StructureRng = ChaCha8Rng;

/// Cryptographically strong generator for ancestral sampling.
pub type StrongRng = ChaCha20Rng;

pub fn structure_rng(seed: i64) -> StructureRng {
    ChaCha8Rng::seed_from_u64(seed as u64)
}

/// Seeds a [`StrongRng`] from operating-system entropy.
pub fn strong_rng() -> Result<StrongRng> {
    strong_rng_from(&mut OsRng)
}

/// Seeds a [`StrongRng`] from an arbitrary entropy source.
///
/// A failing source surfaces as [`GeneratorError::RandomSourceUnavailable`].
pub fn strong_rng_from<E: RngCore>(entropy: &mut E) -> Result<StrongRng> {
    let mut seed = <StrongRng as SeedableRng>::Seed::default();
    entropy
        .try_fill_bytes(&mut seed)
        .map_err(|e| GeneratorError::RandomSourceUnavailable(e.to_string()))?;
    debug!("Seeded strong RNG from entropy source");
    Ok(ChaCha20Rng::from_seed(seed))
}
