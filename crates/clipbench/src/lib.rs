//! # clipbench
//!
//! A benchmarking/evaluation harness for neural-network inference pipelines
//! that run on one of three mutually exclusive compute backends.
//!
//! This is the top-level facade crate that re-exports everything you need.
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | `clipbench-core` | Error type, backend selection, backend-aware clock, meters |
//! | `clipbench-data` | Batch input, source configuration, data-source seam |
//! | `clipbench` | Model/loss seams, report sinks, the evaluation loop |
//!
//! ## Usage
//!
//! ```ignore
//! use clipbench::prelude::*;
//!
//! let backend = Backend::resolve(BackendRequest::default(), false)?;
//! let mut evaluator = Evaluator::new(EvalClock::host_only(), EvalOptions::default())
//!     .with_sink(Box::new(StdoutSink));
//! let report = evaluator.run(&mut source, &mut model, &loss, backend)?;
//! println!("avg batch time: {:.3}s", report.batch_time.avg());
//! ```

pub mod eval;
pub mod model;
pub mod report;

pub use clipbench_core::{
    AverageMeter, Backend, BackendRequest, BackendTensor, Error, EvalClock, MeterFormat,
    ProgressMeter, Result, Synchronize,
};
pub use clipbench_data::{collate, BatchInput, BatchSource, SourceConfig, VecSource};

pub use eval::{EvalOptions, EvalReport, EvalState, Evaluator};
pub use model::{EvalLoss, EvalModel, InferenceGuard};
pub use report::{MemorySink, ReportSink, StdoutSink};

/// Prelude: import this for the most common types.
pub mod prelude {
    pub use crate::eval::{EvalOptions, EvalReport, EvalState, Evaluator};
    pub use crate::model::{EvalLoss, EvalModel, InferenceGuard};
    pub use crate::report::{MemorySink, ReportSink, StdoutSink};
    pub use clipbench_core::{
        AverageMeter, Backend, BackendRequest, BackendTensor, Error, EvalClock, MeterFormat,
        ProgressMeter, Result, Synchronize,
    };
    pub use clipbench_data::{collate, BatchInput, BatchSource, SourceConfig, VecSource};
}
