// Evaluator — the measured inference loop
//
// Drives batches from a source through the model and loss on the resolved
// backend, timing the data-fetch and whole-batch stages with a backend-aware
// clock and folding the results into streaming meters. A progress line is
// emitted every `report_every` batches, starting with batch 0.
//
// Error policy: the first failure anywhere in a batch (barrier, conversion,
// forward, loss) aborts the whole run wrapped with the batch index and
// backend. Benchmark numbers stop meaning anything once continuity breaks,
// so there are no retries and no skipped batches.

use clipbench_core::backend::{Backend, BackendTensor};
use clipbench_core::clock::EvalClock;
use clipbench_core::error::Result;
use clipbench_core::meter::{AverageMeter, MeterFormat, ProgressMeter};
use clipbench_data::source::BatchSource;

use crate::model::{EvalLoss, EvalModel, InferenceGuard};
use crate::report::ReportSink;

/// Loop lifecycle: `Idle` until the first run, `Running` while batches flow,
/// `Done` after the run returns (successfully or not).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalState {
    Idle,
    Running,
    Done,
}

/// Options controlling reporting cadence and presentation.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Emit a progress line every this many batches (batch 0 included).
    pub report_every: usize,
    /// Prefix for every progress line.
    pub prefix: String,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            report_every: 10,
            prefix: "Test: ".to_string(),
        }
    }
}

/// Summary of a completed evaluation run.
#[derive(Debug, Clone)]
pub struct EvalReport {
    /// Number of batches processed.
    pub batches: usize,
    /// Wall time per batch, data fetch through loss computation.
    pub batch_time: AverageMeter,
    /// Gap between the end of one batch and availability of the next input.
    pub data_time: AverageMeter,
    /// Raw loss scalar per batch.
    pub loss: AverageMeter,
}

/// The evaluation loop runner.
///
/// Owns the backend-aware clock, reporting options, and the optional report
/// sink. Collaborators (source, model, loss) are supplied per run.
pub struct Evaluator {
    clock: EvalClock,
    options: EvalOptions,
    sink: Option<Box<dyn ReportSink>>,
    state: EvalState,
}

impl Evaluator {
    pub fn new(clock: EvalClock, options: EvalOptions) -> Self {
        Evaluator {
            clock,
            options,
            sink: None,
            state: EvalState::Idle,
        }
    }

    /// Attach a report sink. Without one, report emission is a no-op.
    pub fn with_sink(mut self, sink: Box<dyn ReportSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn state(&self) -> EvalState {
        self.state
    }

    /// Run one single-pass evaluation over `source`.
    ///
    /// Prepares the model for the backend, holds inference mode for the
    /// loop's duration (restored even on failure), and returns the meters
    /// for a completed run. The run ends in [`EvalState::Done`] whether it
    /// completed or aborted.
    pub fn run<T, S, M, L>(
        &mut self,
        source: &mut S,
        model: &mut M,
        loss_fn: &L,
        backend: Backend,
    ) -> Result<EvalReport>
    where
        T: BackendTensor,
        S: BatchSource<T>,
        M: EvalModel<T>,
        L: EvalLoss<T>,
    {
        self.state = EvalState::Running;
        let result = self.run_inner(source, model, loss_fn, backend);
        self.state = EvalState::Done;
        result
    }

    fn run_inner<T, S, M, L>(
        &mut self,
        source: &mut S,
        model: &mut M,
        loss_fn: &L,
        backend: Backend,
    ) -> Result<EvalReport>
    where
        T: BackendTensor,
        S: BatchSource<T>,
        M: EvalModel<T>,
        L: EvalLoss<T>,
    {
        model.prepare(backend)?;
        let model = &*model;
        let _inference = InferenceGuard::enter(model);

        let wait = backend.is_async();
        let total = source.len_hint().unwrap_or(0);
        let progress = ProgressMeter::new(total, self.options.prefix.clone());
        // A report cadence of 0 has no meaningful reading; treat it as 1.
        let every = self.options.report_every.max(1);

        let mut batch_time = AverageMeter::new(
            "Time",
            MeterFormat::Fixed {
                width: 6,
                precision: 3,
            },
        );
        let mut data_time = AverageMeter::new(
            "Data",
            MeterFormat::Fixed {
                width: 6,
                precision: 3,
            },
        );
        let mut losses = AverageMeter::new("Loss", MeterFormat::Scientific { precision: 4 });

        log::info!(
            "starting evaluation on the {backend} backend ({total} batches expected)"
        );

        let mut end = self.clock.now(wait)?;
        let mut index = 0usize;

        while let Some(batch) = source
            .next_batch()
            .map_err(|e| e.at_batch(index, backend))?
        {
            let fetched = self.clock.now(wait).map_err(|e| e.at_batch(index, backend))?;
            data_time.update(fetched.duration_since(end).as_secs_f64(), 1);

            let batch = batch
                .to_backend(backend)
                .map_err(|e| e.at_batch(index, backend))?;
            let output = model
                .forward(&batch)
                .map_err(|e| e.at_batch(index, backend))?;
            let loss_val = loss_fn
                .compute(&output, &batch.target)
                .map_err(|e| e.at_batch(index, backend))?;
            losses.update(loss_val, 1);

            let finished = self.clock.now(wait).map_err(|e| e.at_batch(index, backend))?;
            batch_time.update(finished.duration_since(end).as_secs_f64(), 1);
            end = finished;

            if index % every == 0 {
                let line = progress.render(index, &[&batch_time, &data_time, &losses]);
                log::debug!("{line}");
                if let Some(sink) = &mut self.sink {
                    sink.emit(&line);
                }
            }
            index += 1;
        }

        log::info!("evaluation complete after {index} batches");
        Ok(EvalReport {
            batches: index,
            batch_time,
            data_time,
            loss: losses,
        })
    }
}
