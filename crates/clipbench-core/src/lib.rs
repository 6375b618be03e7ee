//! # clipbench-core
//!
//! Core types for the clipbench evaluation harness:
//!
//! - [`backend`] — backend selection, conversion and synchronization seams
//! - [`clock`] — monotonic timing with an optional backend barrier
//! - [`meter`] — streaming value/average meters and progress rendering
//! - [`error`] — the library-wide error type

pub mod backend;
pub mod clock;
pub mod error;
pub mod meter;

pub use backend::{Backend, BackendRequest, BackendTensor, Synchronize};
pub use clock::EvalClock;
pub use error::{Error, Result};
pub use meter::{AverageMeter, MeterFormat, ProgressMeter};
