//! Seedable RNG construction.
//!
//! All stochastic operators take `&mut impl Rng`; this is the single place
//! an RNG is created, so seeding stays explicit and reproducible.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
