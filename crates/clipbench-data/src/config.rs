// SourceConfig — explicit data-source configuration
//
// Every recognized option is enumerated here instead of flowing through an
// opaque keyword bag. The harness itself never interprets these fields; they
// configure whatever source implementation the collaborator provides.

/// Configuration accepted by data-source implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceConfig {
    /// Seed for reproducible batch-order shuffling; `None` keeps the
    /// source's natural order.
    pub shuffle_seed: Option<u64>,
    /// Number of parallel workers for batch collation (0 = sequential).
    pub workers: usize,
    /// Whether the source should place host buffers in pinned memory.
    pub pin_memory: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            shuffle_seed: None,
            workers: 0,
            pin_memory: false,
        }
    }
}

impl SourceConfig {
    pub fn shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    pub fn workers(mut self, n: usize) -> Self {
        self.workers = n;
        self
    }

    pub fn pin_memory(mut self, pin: bool) -> Self {
        self.pin_memory = pin;
        self
    }
}
