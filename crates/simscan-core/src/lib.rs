pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod filter;
pub mod fingerprint;
pub mod progress;
pub mod report;
pub mod similarity;
pub mod walker;

pub use config::AppConfig;
pub use engine::{RunSummary, ScanEngine};
pub use error::Error;
pub use fingerprint::{Digest, Fingerprint, FingerprintError, Fingerprinter, SimHasher};
pub use progress::{ProgressReporter, SilentReporter};
