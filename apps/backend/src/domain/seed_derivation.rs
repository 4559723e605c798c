//! Seed derivation for the starting-player draw.
//!
//! Every room carries random `rng_seed` bytes fixed at creation. The
//! starting player for an instance is derived from `(rng_seed, instance_no)`:
//! uniform because the seed is uniform, and stable for a given instance so a
//! replayed transition cannot re-roll the draw.

use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Derive the turn seed for one game instance.
///
/// Same room + same instance = same seed; a restart (new instance) gets an
/// independent draw.
pub fn derive_turn_seed(rng_seed: &[u8], instance_no: i32) -> u64 {
    xxh3_64_with_seed(rng_seed, instance_no as u64)
}

/// Starting-player draw: host moves first iff the low bit is clear.
pub fn starting_turn_is_host(turn_seed: u64) -> bool {
    turn_seed & 1 == 0
}
