// Meters — streaming value/average accumulators and progress-line rendering
//
// AverageMeter keeps the current sample and a running weighted mean in O(1)
// space, so a long evaluation run never stores per-batch history.
// ProgressMeter renders one fixed-width progress line over a set of meters.

use std::fmt;

/// Per-meter numeric display format.
///
/// Covers the two layouts the harness reports with: fixed-point with a
/// minimum field width (timings) and scientific notation (loss values).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterFormat {
    /// `{:width$.precision$}` fixed-point, e.g. `6.3` renders `" 0.123"`.
    Fixed { width: usize, precision: usize },
    /// `{:.precision$e}` scientific, e.g. `4` renders `"1.2345e-2"`.
    Scientific { precision: usize },
}

impl MeterFormat {
    /// Render a value with this format.
    pub fn format(&self, value: f64) -> String {
        match *self {
            MeterFormat::Fixed { width, precision } => {
                format!("{value:width$.precision$}")
            }
            MeterFormat::Scientific { precision } => format!("{value:.precision$e}"),
        }
    }
}

/// Computes and stores the current value and running average of a scalar
/// measurement.
///
/// `update` is O(1): only the sum and weighted count are kept, never the
/// sample history. The average is always `sum / count` while `count > 0`;
/// with no samples it stays 0 by convention and no division occurs.
#[derive(Debug, Clone)]
pub struct AverageMeter {
    name: String,
    fmt: MeterFormat,
    val: f64,
    avg: f64,
    sum: f64,
    count: u64,
}

impl AverageMeter {
    /// Create a meter with a display name and numeric format.
    pub fn new(name: impl Into<String>, fmt: MeterFormat) -> Self {
        AverageMeter {
            name: name.into(),
            fmt,
            val: 0.0,
            avg: 0.0,
            sum: 0.0,
            count: 0,
        }
    }

    /// Record `val` as the current sample with weight `n` (e.g. batch size).
    pub fn update(&mut self, val: f64, n: u64) {
        self.val = val;
        self.sum += val * n as f64;
        self.count += n;
        if self.count > 0 {
            self.avg = self.sum / self.count as f64;
        }
    }

    /// Zero the meter back to its freshly constructed state.
    pub fn reset(&mut self) {
        self.val = 0.0;
        self.avg = 0.0;
        self.sum = 0.0;
        self.count = 0;
    }

    /// The most recent sample.
    pub fn val(&self) -> f64 {
        self.val
    }

    /// The running weighted average.
    pub fn avg(&self) -> f64 {
        self.avg
    }

    /// Total weight recorded so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The meter's display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for AverageMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.name,
            self.fmt.format(self.val),
            self.fmt.format(self.avg)
        )
    }
}

/// Renders batch-progress lines with a fixed-width batch index column.
///
/// The index width is computed once from the total batch count so every line
/// of a run aligns. A total of 0 renders with width 1 rather than faulting.
#[derive(Debug, Clone)]
pub struct ProgressMeter {
    prefix: String,
    total_batches: usize,
    width: usize,
}

impl ProgressMeter {
    /// Create a progress meter for a run of `total_batches` batches.
    pub fn new(total_batches: usize, prefix: impl Into<String>) -> Self {
        ProgressMeter {
            prefix: prefix.into(),
            total_batches,
            width: decimal_width(total_batches),
        }
    }

    /// Render one progress line: the padded `[batch/total]` header followed
    /// by each meter, tab-separated.
    pub fn render(&self, batch: usize, meters: &[&AverageMeter]) -> String {
        let mut line = format!(
            "{}[{:>width$}/{}]",
            self.prefix,
            batch,
            self.total_batches,
            width = self.width
        );
        for meter in meters {
            line.push('\t');
            line.push_str(&meter.to_string());
        }
        line
    }
}

/// Number of decimal digits in `n`, minimum 1.
fn decimal_width(n: usize) -> usize {
    let mut width = 1;
    let mut n = n / 10;
    while n > 0 {
        width += 1;
        n /= 10;
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_is_weighted_mean() {
        let mut meter = AverageMeter::new("time", MeterFormat::Fixed { width: 6, precision: 3 });
        meter.update(1.0, 2);
        meter.update(4.0, 1);
        meter.update(2.0, 3);
        // (1*2 + 4*1 + 2*3) / 6 = 2.0
        assert!((meter.avg() - 2.0).abs() < 1e-12);
        assert_eq!(meter.val(), 2.0);
        assert_eq!(meter.count(), 6);
    }

    #[test]
    fn test_reset_reproduces_fresh_state() {
        let fmt = MeterFormat::Fixed { width: 6, precision: 3 };
        let mut used = AverageMeter::new("time", fmt);
        used.update(9.0, 4);
        used.reset();

        let mut fresh = AverageMeter::new("time", fmt);
        for meter in [&mut used, &mut fresh] {
            meter.update(0.5, 1);
            meter.update(1.5, 1);
        }
        assert_eq!(used.val(), fresh.val());
        assert_eq!(used.avg(), fresh.avg());
        assert_eq!(used.count(), fresh.count());
    }

    #[test]
    fn test_empty_meter_has_zero_average() {
        let meter = AverageMeter::new("loss", MeterFormat::Scientific { precision: 4 });
        assert_eq!(meter.avg(), 0.0);
        assert_eq!(meter.count(), 0);
    }

    #[test]
    fn test_display_uses_per_meter_format() {
        let mut meter = AverageMeter::new("Loss", MeterFormat::Scientific { precision: 4 });
        meter.update(0.012345, 1);
        assert_eq!(meter.to_string(), "Loss 1.2345e-2 (1.2345e-2)");

        let mut meter = AverageMeter::new("Time", MeterFormat::Fixed { width: 6, precision: 3 });
        meter.update(0.25, 1);
        assert_eq!(meter.to_string(), "Time  0.250 ( 0.250)");
    }

    #[test]
    fn test_progress_padding_is_fixed_width() {
        let progress = ProgressMeter::new(100, "Test: ");
        assert_eq!(progress.render(0, &[]), "Test: [  0/100]");
        assert_eq!(progress.render(9, &[]), "Test: [  9/100]");
        assert_eq!(progress.render(99, &[]), "Test: [ 99/100]");
    }

    #[test]
    fn test_progress_zero_total_renders_width_one() {
        let progress = ProgressMeter::new(0, "");
        assert_eq!(progress.render(0, &[]), "[0/0]");
    }

    #[test]
    fn test_progress_line_joins_meters_with_tabs() {
        let mut time = AverageMeter::new("Time", MeterFormat::Fixed { width: 6, precision: 3 });
        let mut loss = AverageMeter::new("Loss", MeterFormat::Scientific { precision: 4 });
        time.update(0.5, 1);
        loss.update(0.25, 1);

        let progress = ProgressMeter::new(10, "Test: ");
        let line = progress.render(3, &[&time, &loss]);
        assert_eq!(line, "Test: [ 3/10]\tTime  0.500 ( 0.500)\tLoss 2.5000e-1 (2.5000e-1)");
    }
}
