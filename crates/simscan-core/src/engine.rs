use std::fs::{self, File};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::AppConfig;
use crate::dispatcher::{self, DispatchOptions};
use crate::error::Error;
use crate::filter::PathFilter;
use crate::fingerprint::{Fingerprinter, SimHasher};
use crate::progress::ProgressReporter;
use crate::report;
use crate::similarity;

pub struct ScanEngine {
    config: AppConfig,
    fingerprinter: Box<dyn Fingerprinter>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub extract_duration: Duration,
    pub compare_duration: Duration,
    pub report_duration: Duration,
    pub total_fingerprints: usize,
    pub filtered_fingerprints: usize,
    pub candidate_pairs: usize,
}

impl ScanEngine {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            fingerprinter: Box::new(SimHasher),
        }
    }

    /// Swap the fingerprint implementation behind the trait seam.
    pub fn with_fingerprinter(mut self, fingerprinter: Box<dyn Fingerprinter>) -> Self {
        self.fingerprinter = fingerprinter;
        self
    }

    /// Run the full pipeline:
    /// 1. Walk the root archive and fingerprint leaf entries on a worker pool
    /// 2. Filter fingerprint paths through the configured pattern rules
    /// 3. All-pairs comparison with category-aware thresholds
    /// 4. Sort by source path and write the CSV report
    pub fn run(&self, reporter: &dyn ProgressReporter) -> Result<RunSummary, Error> {
        let filter = PathFilter::from_config(&self.config)?;
        let thresholds = self.config.thresholds();

        let root_bytes = fs::read(&self.config.input_path)?;

        info!("Fingerprinting entries of {}...", self.config.input_path);
        reporter.on_extract_start();
        let extract_start = Instant::now();
        let dispatch_opts = DispatchOptions {
            fingerprinter: self.fingerprinter.as_ref(),
            parallel: self.config.parallel,
            smallfile_threshold: self.config.smallfile_threshold,
            max_depth: self.config.max_depth,
            fingerprint_top_level: self.config.fingerprint_top_level,
        };
        let fingerprints =
            dispatcher::fingerprint_archive(&root_bytes, &dispatch_opts, reporter)?;
        let extract_duration = extract_start.elapsed();
        reporter.on_extract_complete(fingerprints.len(), extract_duration.as_secs_f64());
        let total_fingerprints = fingerprints.len();
        info!("Total files: {}", total_fingerprints);
        debug!(
            "Fingerprinting completed in {:.2}s",
            extract_duration.as_secs_f64()
        );

        let filtered = filter.retain(fingerprints);
        info!("Total files after filter: {}", filtered.len());

        info!("Comparing fingerprints...");
        reporter.on_compare_start();
        let compare_start = Instant::now();
        let mut pairs = similarity::find_candidates(&filtered, &filter, thresholds);
        let compare_duration = compare_start.elapsed();
        reporter.on_compare_complete(pairs.len(), compare_duration.as_secs_f64());
        debug!(
            "Comparison completed in {:.2}s — {} candidate pairs",
            compare_duration.as_secs_f64(),
            pairs.len()
        );

        let report_start = Instant::now();
        report::sort_by_source(&mut pairs);
        let output = File::create(&self.config.output_path)?;
        report::write_report(output, &pairs)?;
        let report_duration = report_start.elapsed();
        reporter.on_report_complete(pairs.len(), report_duration.as_secs_f64());
        info!("Report written to {}", self.config.output_path);

        Ok(RunSummary {
            extract_duration,
            compare_duration,
            report_duration,
            total_fingerprints,
            filtered_fingerprints: filtered.len(),
            candidate_pairs: pairs.len(),
        })
    }
}
