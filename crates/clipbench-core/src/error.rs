use crate::backend::Backend;

/// All errors that can occur within clipbench.
///
/// This enum captures every failure mode the harness itself can produce:
/// conflicting backend flags, faults reported by the active backend, and
/// batch-level context attached by the evaluation loop. Using a single error
/// type across the library simplifies error propagation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Accelerator and optimized-CPU backends requested at the same time.
    /// Fatal before any batch executes.
    #[error("accelerator and optimized-cpu backends cannot both be selected; pick one")]
    ConflictingBackends,

    /// The backend reported an execution error, either during the
    /// synchronization barrier or during compute.
    #[error("{backend} backend fault: {msg}")]
    BackendFault { backend: Backend, msg: String },

    /// A batch iteration failed. Wraps the underlying failure with enough
    /// context (batch index, active backend) to diagnose an aborted run.
    #[error("batch {batch} failed on the {backend} backend")]
    Batch {
        batch: usize,
        backend: Backend,
        #[source]
        source: Box<Error>,
    },

    /// Generic message for collaborator failures not covered above.
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an error from any string message.
    pub fn msg(s: impl Into<String>) -> Self {
        Error::Msg(s.into())
    }

    /// Create a backend fault for the given backend.
    pub fn backend_fault(backend: Backend, msg: impl Into<String>) -> Self {
        Error::BackendFault {
            backend,
            msg: msg.into(),
        }
    }

    /// Wrap this error with batch context.
    pub fn at_batch(self, batch: usize, backend: Backend) -> Self {
        Error::Batch {
            batch,
            backend,
            source: Box::new(self),
        }
    }
}

/// The clipbench result type.
pub type Result<T> = std::result::Result<T, Error>;
