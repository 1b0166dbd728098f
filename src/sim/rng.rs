//! Seeded randomness for the simulations
//!
//! Each simulation owns a [`SmallRng`] built from the `seed` in its config,
//! so a given seed replays the same game.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seed used by the default simulation configs
pub const DEFAULT_SEED: u64 = 0x2545_F491_4F6C_DD1D;

/// Generator for `seed`
pub fn seeded(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// `-1` or `1` with equal odds
pub fn sign<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    if rng.gen_bool(0.5) { 1 } else { -1 }
}

/// True with probability `p`
///
/// `p <= 0` never fires and `p >= 1` always does.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f32) -> bool {
    rng.r#gen::<f32>() < p
}
