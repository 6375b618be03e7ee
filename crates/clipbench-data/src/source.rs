// BatchSource — the data-source collaborator seam
//
// A source produces a lazy, finite, single-pass sequence of batches. The
// evaluation loop only ever asks for the next batch; prefetch workers and
// buffering are the source's own business.

use clipbench_core::error::Result;

use crate::batch::BatchInput;

/// A lazy, finite, single-pass producer of evaluation batches.
pub trait BatchSource<T> {
    /// Produce the next batch, or `Ok(None)` when the sequence is exhausted.
    ///
    /// Exhaustion is the normal termination signal for an evaluation run,
    /// not an error. A source is not restartable within a single run.
    fn next_batch(&mut self) -> Result<Option<BatchInput<T>>>;

    /// Total number of batches this source will produce, when known.
    ///
    /// Streaming sources may return `None`; progress lines then render with
    /// a zero total.
    fn len_hint(&self) -> Option<usize> {
        None
    }
}
