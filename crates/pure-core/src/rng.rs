//! Seeded random streams for samplers and prior draws.

use std::hash::Hasher;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::StandardNormal;
use siphasher::sip::SipHasher13;

/// Seed of substream `substream` of `master_seed`.
///
/// SipHash-1-3 with zero keys over the two words, so the mapping does not
/// depend on platform or `rand` version.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}

/// `StdRng` seeded from a run's master seed or one of its substreams.
///
/// Each sampler walker owns one handle, so walkers never share a stream.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Stream seeded directly with `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Stream `substream` of `master_seed`.
    pub fn substream(master_seed: u64, substream: u64) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, substream))
    }

    /// Metropolis acceptance variate in `[0, 1]`: one raw 64-bit word scaled
    /// by `u64::MAX`.
    pub fn acceptance_draw(&mut self) -> f64 {
        self.rng.next_u64() as f64 / u64::MAX as f64
    }

    /// Standard normal variate.
    pub fn standard_normal(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }

    /// Underlying generator, for `statrs`/`rand` distributions.
    pub fn inner_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
