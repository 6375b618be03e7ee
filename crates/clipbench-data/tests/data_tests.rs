// Tests for clipbench-data: BatchInput conversion, SourceConfig, VecSource

use clipbench_core::backend::{Backend, BackendTensor};
use clipbench_core::error::Result;
use clipbench_data::{collate, BatchInput, BatchSource, SourceConfig, VecSource};

// Toy tensor that records which representation it currently holds.

#[derive(Debug, Clone, PartialEq)]
struct ToyTensor {
    id: usize,
    repr: Backend,
}

impl ToyTensor {
    fn host(id: usize) -> Self {
        ToyTensor {
            id,
            repr: Backend::PlainCpu,
        }
    }
}

impl BackendTensor for ToyTensor {
    fn to_backend(self, backend: Backend) -> Result<Self> {
        Ok(ToyTensor {
            repr: backend,
            ..self
        })
    }
}

fn batch(id: usize) -> BatchInput<ToyTensor> {
    BatchInput {
        video: ToyTensor::host(id),
        audio: ToyTensor::host(id),
        target: ToyTensor::host(id),
    }
}

// BatchInput conversion rules

#[test]
fn test_plain_cpu_conversion_is_identity() {
    let converted = batch(0).to_backend(Backend::PlainCpu).unwrap();
    assert_eq!(converted.video.repr, Backend::PlainCpu);
    assert_eq!(converted.audio.repr, Backend::PlainCpu);
    assert_eq!(converted.target.repr, Backend::PlainCpu);
}

#[test]
fn test_optimized_cpu_leaves_target_unconverted() {
    let converted = batch(0).to_backend(Backend::OptimizedCpu).unwrap();
    assert_eq!(converted.video.repr, Backend::OptimizedCpu);
    assert_eq!(converted.audio.repr, Backend::OptimizedCpu);
    assert_eq!(converted.target.repr, Backend::PlainCpu);
}

#[test]
fn test_accelerator_converts_all_fields() {
    let converted = batch(0).to_backend(Backend::Accelerator).unwrap();
    assert_eq!(converted.video.repr, Backend::Accelerator);
    assert_eq!(converted.audio.repr, Backend::Accelerator);
    assert_eq!(converted.target.repr, Backend::Accelerator);
}

// SourceConfig builder

#[test]
fn test_source_config_builder() {
    let config = SourceConfig::default()
        .shuffle_seed(7)
        .workers(4)
        .pin_memory(true);
    assert_eq!(config.shuffle_seed, Some(7));
    assert_eq!(config.workers, 4);
    assert!(config.pin_memory);

    let defaults = SourceConfig::default();
    assert_eq!(defaults.shuffle_seed, None);
    assert_eq!(defaults.workers, 0);
    assert!(!defaults.pin_memory);
}

// VecSource

fn drain_ids<S: BatchSource<ToyTensor>>(mut source: S) -> Vec<usize> {
    let mut ids = Vec::new();
    while let Some(batch) = source.next_batch().unwrap() {
        ids.push(batch.video.id);
    }
    ids
}

#[test]
fn test_vec_source_preserves_order_without_seed() {
    let source = VecSource::new((0..5).map(batch).collect(), &SourceConfig::default());
    assert_eq!(source.len_hint(), Some(5));
    assert_eq!(drain_ids(source), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_vec_source_shuffle_is_deterministic_per_seed() {
    let config = SourceConfig::default().shuffle_seed(42);
    let first = drain_ids(VecSource::new((0..16).map(batch).collect(), &config));
    let second = drain_ids(VecSource::new((0..16).map(batch).collect(), &config));
    assert_eq!(first, second);

    let mut sorted = first.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..16).collect::<Vec<_>>());
}

#[test]
fn test_vec_source_is_single_pass() {
    let mut source = VecSource::new(vec![batch(0)], &SourceConfig::default());
    assert!(source.next_batch().unwrap().is_some());
    assert!(source.next_batch().unwrap().is_none());
    assert!(source.next_batch().unwrap().is_none());
}

// collate

fn build(chunk: &[usize]) -> clipbench_core::error::Result<BatchInput<ToyTensor>> {
    Ok(batch(chunk[0]))
}

#[test]
fn test_collate_parallel_matches_sequential() {
    let samples: Vec<usize> = (0..37).collect();

    let sequential = collate(&samples, 4, &SourceConfig::default(), build).unwrap();
    let parallel = collate(&samples, 4, &SourceConfig::default().workers(4), build).unwrap();

    assert_eq!(sequential.len(), 10);
    assert_eq!(sequential.len(), parallel.len());
    for (s, p) in sequential.iter().zip(parallel.iter()) {
        assert_eq!(s.video.id, p.video.id);
    }
}

#[test]
fn test_collate_empty_and_zero_batch_size() {
    let none: Vec<usize> = Vec::new();
    assert!(collate(&none, 4, &SourceConfig::default(), build)
        .unwrap()
        .is_empty());
    let samples: Vec<usize> = (0..4).collect();
    assert!(collate(&samples, 0, &SourceConfig::default(), build)
        .unwrap()
        .is_empty());
}
