// EvalClock — monotonic time source with an optional backend barrier
//
// When the active backend executes asynchronously relative to the host, a
// bare `Instant::now()` around a backend call only measures dispatch latency.
// The clock therefore takes an optional `Synchronize` handle and drains
// outstanding backend work before sampling whenever the caller asks for a
// backend-bounded timestamp.

use std::time::Instant;

use crate::backend::Synchronize;
use crate::error::Result;

/// A monotonic timestamp source, optionally bounded by backend completion.
pub struct EvalClock {
    barrier: Option<Box<dyn Synchronize>>,
}

impl EvalClock {
    /// A clock with no barrier, for backends that execute synchronously on
    /// the host (plain and optimized CPU).
    pub fn host_only() -> Self {
        EvalClock { barrier: None }
    }

    /// A clock that drains outstanding work on `barrier` before sampling
    /// when asked to wait for the backend.
    pub fn with_barrier(barrier: Box<dyn Synchronize>) -> Self {
        EvalClock {
            barrier: Some(barrier),
        }
    }

    /// Whether this clock carries a synchronization barrier.
    pub fn has_barrier(&self) -> bool {
        self.barrier.is_some()
    }

    /// Read the clock.
    ///
    /// With `wait_for_backend` set and a barrier configured, blocks until all
    /// previously issued backend work has completed before sampling. A fault
    /// reported by the backend while draining propagates as a hard error.
    pub fn now(&self, wait_for_backend: bool) -> Result<Instant> {
        if wait_for_backend {
            if let Some(barrier) = &self.barrier {
                barrier.synchronize()?;
            }
        }
        Ok(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;
    use crate::error::Error;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Simulates an accelerator with queued work: draining sleeps for the
    /// pending duration, like a device completing in-flight kernels.
    #[derive(Clone, Default)]
    struct SimDevice {
        pending: Arc<Mutex<Duration>>,
    }

    impl SimDevice {
        fn launch(&self, work: Duration) {
            *self.pending.lock().unwrap() += work;
        }
    }

    impl Synchronize for SimDevice {
        fn synchronize(&self) -> Result<()> {
            let pending = std::mem::take(&mut *self.pending.lock().unwrap());
            std::thread::sleep(pending);
            Ok(())
        }
    }

    struct FaultyDevice;

    impl Synchronize for FaultyDevice {
        fn synchronize(&self) -> Result<()> {
            Err(Error::backend_fault(Backend::Accelerator, "device lost"))
        }
    }

    #[test]
    fn test_barrier_wait_covers_outstanding_work() {
        let device = SimDevice::default();
        let clock = EvalClock::with_barrier(Box::new(device.clone()));
        let compute = Duration::from_millis(20);

        let start = clock.now(true).unwrap();
        device.launch(compute);
        let end = clock.now(true).unwrap();

        assert!(end.duration_since(start) >= compute);
    }

    #[test]
    fn test_no_wait_skips_barrier() {
        struct MustNotSync;
        impl Synchronize for MustNotSync {
            fn synchronize(&self) -> Result<()> {
                panic!("barrier must not run when wait_for_backend is false");
            }
        }
        let clock = EvalClock::with_barrier(Box::new(MustNotSync));
        clock.now(false).unwrap();
    }

    #[test]
    fn test_barrier_fault_propagates() {
        let clock = EvalClock::with_barrier(Box::new(FaultyDevice));
        let err = clock.now(true).unwrap_err();
        assert!(matches!(err, Error::BackendFault { .. }));
    }

    #[test]
    fn test_host_only_clock_ignores_wait() {
        let clock = EvalClock::host_only();
        assert!(!clock.has_barrier());
        clock.now(true).unwrap();
    }
}
