/// Trait for reporting pipeline progress.
///
/// The CLI implements this with indicatif; tests and embedders that want no
/// output use `SilentReporter`. All methods have default no-op
/// implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_extract_start(&self) {}
    fn on_extract_progress(&self, _entries_done: usize, _entries_total: usize) {}
    fn on_extract_complete(&self, _fingerprints: usize, _duration_secs: f64) {}
    fn on_compare_start(&self) {}
    fn on_compare_complete(&self, _pairs: usize, _duration_secs: f64) {}
    fn on_report_complete(&self, _rows: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
