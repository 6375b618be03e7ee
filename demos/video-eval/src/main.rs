//! Synthetic video-model evaluation benchmark.
//!
//! Runs the clipbench evaluation loop over a generated clip dataset with a
//! small linear scoring model, on a backend chosen from the CLI flags. The
//! accelerator is simulated: forward passes enqueue "device work" that only
//! the synchronization barrier drains, which is exactly the situation the
//! backend-aware clock exists for.
//!
//! Run with: `cargo run -p video-eval -- --batches 50 --print-freq 5`

use std::cell::Cell;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use clipbench::prelude::*;

const FRAME_FEATURES: usize = 64;
const AUDIO_FEATURES: usize = 16;
const NUM_CLASSES: usize = 10;

#[derive(Parser, Debug)]
#[command(
    name = "video-eval",
    about = "Benchmark a synthetic video model on the accelerator, optimized-CPU, or plain-CPU backend"
)]
struct Args {
    /// Disable the (simulated) accelerator.
    #[arg(long, default_value_t = false)]
    no_cuda: bool,
    /// Use the optimized-CPU tensor backend.
    #[arg(long, default_value_t = false)]
    mkldnn: bool,
    /// Print frequency in batches.
    #[arg(short = 'p', long, default_value_t = 10)]
    print_freq: usize,
    /// Batch size for the evaluation step.
    #[arg(short = 'b', long, default_value_t = 10)]
    batch_size_eval: usize,
    /// Number of data collation workers.
    #[arg(short = 'j', long, default_value_t = 0)]
    num_workers: usize,
    /// Number of batches to evaluate.
    #[arg(long, default_value_t = 100)]
    batches: usize,
    /// Shuffle seed for batch order.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

/// Simulated accelerator: launched work accumulates until a barrier drains it.
#[derive(Clone, Default)]
struct SimAccelerator {
    pending: Arc<Mutex<Duration>>,
}

impl SimAccelerator {
    fn launch(&self, work: Duration) {
        *self.pending.lock().unwrap() += work;
    }
}

impl Synchronize for SimAccelerator {
    fn synchronize(&self) -> clipbench::Result<()> {
        let pending = std::mem::take(&mut *self.pending.lock().unwrap());
        std::thread::sleep(pending);
        Ok(())
    }
}

/// A host tensor tagged with the representation it currently holds.
#[derive(Debug, Clone)]
struct ClipTensor {
    data: Vec<f32>,
    repr: Backend,
}

impl ClipTensor {
    fn host(data: Vec<f32>) -> Self {
        ClipTensor {
            data,
            repr: Backend::PlainCpu,
        }
    }
}

impl BackendTensor for ClipTensor {
    fn to_backend(self, backend: Backend) -> clipbench::Result<Self> {
        Ok(ClipTensor {
            repr: backend,
            ..self
        })
    }
}

/// Linear scorer over mean-pooled clip features.
///
/// On the accelerator the per-batch work is enqueued on the simulated device
/// instead of costing host time, so only a synchronized clock sees it.
struct ClipScorer {
    weights: Vec<f32>,
    device: SimAccelerator,
    backend: Cell<Backend>,
    inference: Cell<bool>,
}

impl ClipScorer {
    fn new(seed: u64, device: SimAccelerator) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let weights = (0..(FRAME_FEATURES + AUDIO_FEATURES) * NUM_CLASSES)
            .map(|_| rng.gen_range(-0.1..0.1))
            .collect();
        ClipScorer {
            weights,
            device,
            backend: Cell::new(Backend::PlainCpu),
            inference: Cell::new(false),
        }
    }
}

impl EvalModel<ClipTensor> for ClipScorer {
    fn forward(&self, input: &BatchInput<ClipTensor>) -> clipbench::Result<ClipTensor> {
        let in_dim = FRAME_FEATURES + AUDIO_FEATURES;
        if input.video.data.len() % FRAME_FEATURES != 0
            || input.audio.data.len() % AUDIO_FEATURES != 0
        {
            return Err(Error::msg("ragged batch: feature lengths do not divide"));
        }
        let batch = input.video.data.len() / FRAME_FEATURES;
        if input.audio.data.len() / AUDIO_FEATURES != batch {
            return Err(Error::msg("video and audio batch sizes differ"));
        }

        let mut scores = vec![0.0f32; batch * NUM_CLASSES];
        for b in 0..batch {
            let video = &input.video.data[b * FRAME_FEATURES..][..FRAME_FEATURES];
            let audio = &input.audio.data[b * AUDIO_FEATURES..][..AUDIO_FEATURES];
            for c in 0..NUM_CLASSES {
                let w = &self.weights[c * in_dim..][..in_dim];
                let (wv, wa) = w.split_at(FRAME_FEATURES);
                scores[b * NUM_CLASSES + c] = dot(video, wv) + dot(audio, wa);
            }
        }

        if self.backend.get() == Backend::Accelerator {
            // 50ns per MAC of simulated device time.
            let macs = batch * in_dim * NUM_CLASSES;
            self.device.launch(Duration::from_nanos(macs as u64 * 50));
        }

        Ok(ClipTensor {
            data: scores,
            repr: input.video.repr,
        })
    }

    fn set_inference(&self, on: bool) {
        self.inference.set(on);
    }

    fn is_inference(&self) -> bool {
        self.inference.get()
    }

    fn prepare(&mut self, backend: Backend) -> clipbench::Result<()> {
        self.backend.set(backend);
        log::info!("model prepared for the {backend} backend");
        Ok(())
    }
}

fn dot(xs: &[f32], ws: &[f32]) -> f32 {
    xs.iter().zip(ws).map(|(x, w)| x * w).sum()
}

fn mse_loss(output: &ClipTensor, target: &ClipTensor) -> clipbench::Result<f64> {
    if output.data.len() != target.data.len() {
        return Err(Error::msg(format!(
            "loss shape mismatch: output {} vs target {}",
            output.data.len(),
            target.data.len()
        )));
    }
    let n = output.data.len().max(1);
    let sum: f64 = output
        .data
        .iter()
        .zip(target.data.iter())
        .map(|(o, t)| {
            let d = (o - t) as f64;
            d * d
        })
        .sum();
    Ok(sum / n as f64)
}

/// Generate `batches` random clip batches of `batch_size` clips each.
fn synthetic_source(args: &Args) -> clipbench::Result<VecSource<ClipTensor>> {
    let config = SourceConfig::default()
        .shuffle_seed(args.seed)
        .workers(args.num_workers);

    let clip_ids: Vec<usize> = (0..args.batches * args.batch_size_eval).collect();
    let batches = collate(&clip_ids, args.batch_size_eval, &config, |chunk| {
        let mut rng = StdRng::seed_from_u64(chunk[0] as u64);
        let n = chunk.len();
        let video = (0..n * FRAME_FEATURES).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let audio = (0..n * AUDIO_FEATURES).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let mut target = vec![0.0f32; n * NUM_CLASSES];
        for clip in 0..n {
            target[clip * NUM_CLASSES + rng.gen_range(0..NUM_CLASSES)] = 1.0;
        }
        Ok(BatchInput {
            video: ClipTensor::host(video),
            audio: ClipTensor::host(audio),
            target: ClipTensor::host(target),
        })
    })?;

    Ok(VecSource::new(batches, &config))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let request = BackendRequest {
        accelerator: !args.no_cuda,
        optimized_cpu: args.mkldnn,
    };
    // The simulated accelerator is always present on this host.
    let backend = Backend::resolve(request, true)?;

    let device = SimAccelerator::default();
    let clock = if backend.is_async() {
        EvalClock::with_barrier(Box::new(device.clone()))
    } else {
        EvalClock::host_only()
    };

    let mut source = synthetic_source(&args)?;
    let mut model = ClipScorer::new(args.seed, device);

    let options = EvalOptions {
        report_every: args.print_freq,
        prefix: "Test: ".to_string(),
    };
    let mut evaluator = Evaluator::new(clock, options).with_sink(Box::new(StdoutSink));

    let report = evaluator.run(&mut source, &mut model, &mse_loss, backend)?;

    let avg_batch = report.batch_time.avg();
    let throughput = if avg_batch > 0.0 {
        args.batch_size_eval as f64 / avg_batch
    } else {
        0.0
    };
    println!(
        "\n * {} batches on {backend}: {:.3}s/batch ({:.1} clips/s), avg loss {:.4e}",
        report.batches, avg_batch, throughput, report.loss.avg()
    );
    Ok(())
}
