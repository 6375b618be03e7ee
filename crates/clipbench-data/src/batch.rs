// BatchInput — one evaluation batch: two input streams plus the label
//
// Owned transiently by the evaluation loop for the duration of a single
// iteration; produced by a data source, consumed by the model and the loss.

use clipbench_core::backend::{Backend, BackendTensor};
use clipbench_core::error::Result;

/// One batch of model input: a video tensor, an audio tensor, and the target
/// label tensor.
#[derive(Debug, Clone)]
pub struct BatchInput<T> {
    pub video: T,
    pub audio: T,
    pub target: T,
}

impl<T: BackendTensor> BatchInput<T> {
    /// Convert the fields the model will read into the representation the
    /// resolved backend requires.
    ///
    /// `video` and `audio` convert for any non-plain backend. The `target`
    /// label converts only when the accelerator is active: the CPU paths
    /// compute the loss against the label in its original representation.
    pub fn to_backend(self, backend: Backend) -> Result<Self> {
        match backend {
            Backend::PlainCpu => Ok(self),
            Backend::OptimizedCpu => Ok(BatchInput {
                video: self.video.to_backend(backend)?,
                audio: self.audio.to_backend(backend)?,
                target: self.target,
            }),
            Backend::Accelerator => Ok(BatchInput {
                video: self.video.to_backend(backend)?,
                audio: self.audio.to_backend(backend)?,
                target: self.target.to_backend(backend)?,
            }),
        }
    }
}
