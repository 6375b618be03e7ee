// Backend — which compute target executes the model under measurement
//
// Exactly one backend is active per run: the accelerator, the optimized-CPU
// execution mode, or plain CPU. The choice is resolved once from the user's
// flags at startup and stays immutable for the rest of the process; every
// conversion call receives the resolved value explicitly, so there is no
// ambient "current device" state to reason about.

use std::fmt;

use crate::error::{Error, Result};

/// The execution target for tensor operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Dedicated accelerator device; executes asynchronously relative to
    /// the host, so timing requires a synchronization barrier.
    Accelerator,
    /// CPU execution through an optimized tensor representation.
    OptimizedCpu,
    /// Plain host CPU; tensors stay in their original representation.
    PlainCpu,
}

impl Backend {
    /// Whether this backend executes asynchronously relative to the host.
    ///
    /// When true, wall-clock measurements around backend calls must drain
    /// outstanding work first or they only capture dispatch latency.
    pub fn is_async(self) -> bool {
        matches!(self, Backend::Accelerator)
    }

    /// A human-readable name for this backend.
    pub fn name(self) -> &'static str {
        match self {
            Backend::Accelerator => "accelerator",
            Backend::OptimizedCpu => "optimized-cpu",
            Backend::PlainCpu => "plain-cpu",
        }
    }

    /// Resolve the active backend from mutually exclusive user flags.
    ///
    /// Requesting both the accelerator and the optimized-CPU mode is a fatal
    /// configuration error, checked before availability. An accelerator
    /// request on a host without one falls back to plain CPU rather than
    /// failing.
    pub fn resolve(request: BackendRequest, accelerator_available: bool) -> Result<Backend> {
        if request.accelerator && request.optimized_cpu {
            return Err(Error::ConflictingBackends);
        }
        let backend = if request.accelerator && accelerator_available {
            Backend::Accelerator
        } else if request.optimized_cpu {
            Backend::OptimizedCpu
        } else {
            Backend::PlainCpu
        };
        log::info!("using the {} backend", backend.name());
        Ok(backend)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The user-supplied backend flags, prior to resolution.
///
/// Mirrors the CLI surface: `accelerator` is the inverse of a `--no-cuda`
/// style flag, `optimized_cpu` a `--mkldnn` style flag. Both default to off,
/// which resolves to [`Backend::PlainCpu`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendRequest {
    pub accelerator: bool,
    pub optimized_cpu: bool,
}

/// Conversion of a tensor value into the representation a backend requires.
///
/// Implemented by the collaborator's tensor type. `PlainCpu` conversions are
/// expected to be the identity.
pub trait BackendTensor: Sized {
    fn to_backend(self, backend: Backend) -> Result<Self>;
}

/// A blocking wait until all previously issued asynchronous backend work has
/// completed.
///
/// Implemented by the accelerator collaborator's device handle. An execution
/// fault detected while draining must surface here as an error, not be
/// swallowed.
pub trait Synchronize {
    fn synchronize(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(accelerator: bool, optimized_cpu: bool) -> BackendRequest {
        BackendRequest {
            accelerator,
            optimized_cpu,
        }
    }

    #[test]
    fn test_resolve_conflict_is_fatal_for_all_availability() {
        for available in [true, false] {
            let err = Backend::resolve(request(true, true), available).unwrap_err();
            assert!(matches!(err, Error::ConflictingBackends));
        }
    }

    #[test]
    fn test_resolve_accelerator_when_available() {
        let backend = Backend::resolve(request(true, false), true).unwrap();
        assert_eq!(backend, Backend::Accelerator);
    }

    #[test]
    fn test_resolve_falls_back_when_accelerator_missing() {
        let backend = Backend::resolve(request(true, false), false).unwrap();
        assert_eq!(backend, Backend::PlainCpu);
    }

    #[test]
    fn test_resolve_optimized_cpu() {
        for available in [true, false] {
            let backend = Backend::resolve(request(false, true), available).unwrap();
            assert_eq!(backend, Backend::OptimizedCpu);
        }
    }

    #[test]
    fn test_resolve_default_is_plain_cpu() {
        let backend = Backend::resolve(BackendRequest::default(), true).unwrap();
        assert_eq!(backend, Backend::PlainCpu);
    }

    #[test]
    fn test_only_accelerator_is_async() {
        assert!(Backend::Accelerator.is_async());
        assert!(!Backend::OptimizedCpu.is_async());
        assert!(!Backend::PlainCpu.is_async());
    }
}
