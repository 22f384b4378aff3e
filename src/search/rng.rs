//! The two independently seeded random streams driving a search.

use rand::prelude::*;

/// Random streams for the genetic operators.
///
/// `mutation` governs edit-kind and edit choice and crossover retention;
/// `individual` governs shuffling, tournament draws, padding and HOM
/// sampling. Seeding both makes a run reproducible.
pub struct RngStreams {
    pub mutation: StdRng,
    pub individual: StdRng,
}

impl RngStreams {
    /// Create from the two seeds.
    pub fn new(mutation_seed: u64, individual_seed: u64) -> Self {
        Self {
            mutation: StdRng::seed_from_u64(mutation_seed),
            individual: StdRng::seed_from_u64(individual_seed),
        }
    }
}
