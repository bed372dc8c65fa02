//! Seeded random sources.
//!
//! Stochastic components own their generator; nothing in the crate draws
//! from a global or thread-local source. A run is reproducible as long as
//! every component is built with an explicit seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a generator from a fixed seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator seeded from the operating system.
pub fn entropy_rng() -> StdRng {
    create_rng(rand::random())
}

/// Derives an independent generator from `rng`.
///
/// Used when one seed stream hands out the generators of several
/// components; the children are fixed by the parent's seed.
pub fn fork<R: Rng + ?Sized>(rng: &mut R) -> StdRng {
    create_rng(rng.random())
}
