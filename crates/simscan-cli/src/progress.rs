use indicatif::{ProgressBar, ProgressStyle};
use simscan_core::ProgressReporter;
use std::sync::Mutex;

/// CLI progress reporter using indicatif.
///
/// - Extract phase: progress bar over top-level archive entries
/// - Compare phase: spinner (pair count unknown until done)
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(pb);
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_extract_start(&self) {
        // Total is set on the first on_extract_progress call.
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} Fingerprinting [{bar:30.cyan/dim}] {pos}/{len} entries",
            )
            .unwrap()
            .progress_chars("━╸─")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_extract_progress(&self, entries_done: usize, entries_total: usize) {
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            if pb.length() != Some(entries_total as u64) {
                pb.set_length(entries_total as u64);
            }
            pb.set_position(entries_done as u64);
        }
    }

    fn on_extract_complete(&self, fingerprints: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Fingerprinting complete: {} files in {:.2}s",
            fingerprints, duration_secs
        );
    }

    fn on_compare_start(&self) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message("Comparing fingerprints...");
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_compare_complete(&self, pairs: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Comparison complete: {} candidate pairs in {:.2}s",
            pairs, duration_secs
        );
    }

    fn on_report_complete(&self, rows: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Report written: {} rows in {:.2}s",
            rows, duration_secs
        );
    }
}
