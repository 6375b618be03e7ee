// Report sinks — where rendered progress lines go
//
// A sink is either configured and present, or absent; absence makes report
// emission a no-op. There is no runtime probing for optional integrations.

use std::sync::{Arc, Mutex};

/// Receives rendered progress lines.
pub trait ReportSink {
    fn emit(&mut self, line: &str);
}

/// Prints each line to standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn emit(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Collects lines in memory behind a shared handle.
///
/// The handle stays valid after the sink is handed to an evaluator, which is
/// what tests and in-process report consumers need.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A shared handle onto the collected lines.
    pub fn handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.lines)
    }
}

impl ReportSink for MemorySink {
    fn emit(&mut self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
