//! # clipbench-data
//!
//! Batch input types and data-source collaborators for clipbench:
//!
//! - [`batch`] — [`BatchInput`] and its per-backend conversion rule
//! - [`config`] — explicit data-source configuration
//! - [`source`] — the [`BatchSource`] collaborator seam
//! - [`memory`] — an in-memory source with seeded shuffling and collation

pub mod batch;
pub mod config;
pub mod memory;
pub mod source;

pub use batch::BatchInput;
pub use config::SourceConfig;
pub use memory::{collate, VecSource};
pub use source::BatchSource;
