use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

/// Which lengths feed the N50 computation.
#[derive(Clone, Debug, Default)]
pub struct LengthSelection {
    pub min_length: usize,
    pub max_length: Option<usize>,
    pub subsample: Option<usize>,
    pub seed: u64,
}

impl LengthSelection {
    pub fn is_identity(&self) -> bool {
        self.min_length == 0 && self.max_length.is_none() && self.subsample.is_none()
    }

    /// Filter by the inclusive length range, then draw a seeded subsample.
    pub fn apply(&self, lengths: &[usize]) -> Vec<usize> {
        let filtered: Vec<usize> = lengths
            .iter()
            .copied()
            .filter(|&l| l >= self.min_length)
            .filter(|&l| self.max_length.is_none_or(|max| l <= max))
            .collect();
        if filtered.len() != lengths.len() {
            log::debug!(
                "length filter kept {} of {} sequences",
                filtered.len(),
                lengths.len()
            );
        }

        match self.subsample {
            Some(k) if k < filtered.len() => {
                let mut rng = StdRng::seed_from_u64(self.seed);
                let picked = index::sample(&mut rng, filtered.len(), k);
                log::debug!("subsampled lengths to {k} (seed {})", self.seed);
                picked.iter().map(|i| filtered[i]).collect()
            }
            _ => filtered,
        }
    }
}
