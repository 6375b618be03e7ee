// VecSource — in-memory batch source with seeded shuffling
//
// Backs small benchmarking datasets and tests. Batch order is shuffled once
// at construction when a seed is configured, then consumed single-pass.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use rayon::prelude::*;

use clipbench_core::error::Result;

use crate::batch::BatchInput;
use crate::config::SourceConfig;
use crate::source::BatchSource;

/// A single-pass source over pre-built batches held in memory.
pub struct VecSource<T> {
    batches: std::vec::IntoIter<BatchInput<T>>,
    total: usize,
}

impl<T> VecSource<T> {
    /// Wrap pre-built batches, shuffling their order when the config carries
    /// a seed. The same seed always yields the same order.
    pub fn new(mut batches: Vec<BatchInput<T>>, config: &SourceConfig) -> Self {
        if let Some(seed) = config.shuffle_seed {
            let mut rng = StdRng::seed_from_u64(seed);
            batches.shuffle(&mut rng);
        }
        let total = batches.len();
        VecSource {
            batches: batches.into_iter(),
            total,
        }
    }
}

impl<T> BatchSource<T> for VecSource<T> {
    fn next_batch(&mut self) -> Result<Option<BatchInput<T>>> {
        Ok(self.batches.next())
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.total)
    }
}

/// Build batches of `batch_size` samples with the caller's collation
/// function, in parallel when the config asks for workers.
pub fn collate<S, T, F>(
    samples: &[S],
    batch_size: usize,
    config: &SourceConfig,
    build: F,
) -> Result<Vec<BatchInput<T>>>
where
    S: Sync,
    T: Send,
    F: Fn(&[S]) -> Result<BatchInput<T>> + Sync,
{
    if batch_size == 0 || samples.is_empty() {
        return Ok(Vec::new());
    }
    if config.workers > 0 && samples.len() > batch_size {
        samples.par_chunks(batch_size).map(&build).collect()
    } else {
        samples.chunks(batch_size).map(&build).collect()
    }
}
