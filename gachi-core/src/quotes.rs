//! Injectable random source for decorative phrases

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Picks decorative phrases. Seeded sources give reproducible output.
#[derive(Debug, Clone)]
pub struct QuoteSource {
    rng: StdRng,
}

impl QuoteSource {
    pub fn seeded(seed: u64) -> Self {
        QuoteSource {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        QuoteSource {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    pub fn pick<'a>(&mut self, phrases: &[&'a str]) -> Option<&'a str> {
        phrases.choose(&mut self.rng).copied()
    }
}
