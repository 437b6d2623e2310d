use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;

use crate::similarity::Thresholds;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Root submission archive to scan.
    pub input_path: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    /// Entries with a decompressed size below this are never fingerprinted.
    #[serde(default = "default_smallfile_threshold")]
    pub smallfile_threshold: u64,
    /// Worker count; also the capacity of the dispatch queue.
    #[serde(default = "default_parallel")]
    pub parallel: usize,
    /// Cap on nested-container recursion.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// The original behavior never hashed leaf entries sitting directly in
    /// the root archive; only entries reached through container recursion
    /// were fingerprinted. Set true to hash top-level leaves as well.
    #[serde(default)]
    pub fingerprint_top_level: bool,
    #[serde(default)]
    pub accept_patterns: Vec<String>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    #[serde(default)]
    pub text_patterns: Vec<String>,
    #[serde(default)]
    pub binary_patterns: Vec<String>,
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: u32,
    pub text_threshold: Option<u32>,
    pub binary_threshold: Option<u32>,
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("config"))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

impl AppConfig {
    /// Per-category distance thresholds; both fall back to the single
    /// `distance_threshold` when not set separately.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            text: self.text_threshold.unwrap_or(self.distance_threshold),
            binary: self.binary_threshold.unwrap_or(self.distance_threshold),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_path: String::new(),
            output_path: default_output_path(),
            smallfile_threshold: default_smallfile_threshold(),
            parallel: default_parallel(),
            max_depth: default_max_depth(),
            fingerprint_top_level: false,
            accept_patterns: Vec::new(),
            ignore_patterns: Vec::new(),
            text_patterns: Vec::new(),
            binary_patterns: Vec::new(),
            distance_threshold: default_distance_threshold(),
            text_threshold: None,
            binary_threshold: None,
        }
    }
}

fn default_output_path() -> String {
    "report.csv".to_string()
}

fn default_smallfile_threshold() -> u64 {
    256
}

fn default_parallel() -> usize {
    4
}

fn default_max_depth() -> usize {
    16
}

fn default_distance_threshold() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(toml: &str) -> AppConfig {
        Config::builder()
            .add_source(ConfigFile::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse(r#"input_path = "submissions.zip""#);
        assert_eq!(config.input_path, "submissions.zip");
        assert_eq!(config.output_path, "report.csv");
        assert_eq!(config.smallfile_threshold, 256);
        assert_eq!(config.parallel, 4);
        assert_eq!(config.max_depth, 16);
        assert!(!config.fingerprint_top_level);
        assert_eq!(config.distance_threshold, 10);
    }

    #[test]
    fn test_thresholds_fall_back_to_single_value() {
        let config = parse(
            r#"
            input_path = "in.zip"
            distance_threshold = 7
            "#,
        );
        let thresholds = config.thresholds();
        assert_eq!(thresholds.text, 7);
        assert_eq!(thresholds.binary, 7);
    }

    #[test]
    fn test_separate_category_thresholds() {
        let config = parse(
            r#"
            input_path = "in.zip"
            text_threshold = 12
            binary_threshold = 4
            "#,
        );
        let thresholds = config.thresholds();
        assert_eq!(thresholds.text, 12);
        assert_eq!(thresholds.binary, 4);
    }
}
