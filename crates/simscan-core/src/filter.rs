use regex::Regex;

use crate::config::AppConfig;
use crate::error::Error;
use crate::fingerprint::Fingerprint;

/// Threshold category of a comparison, derived from the source path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Text,
    Binary,
}

/// Ordered pattern rules applied to logical fingerprint paths.
///
/// Two policy shapes are supported. Accept/Ignore keeps an entry iff at
/// least one accept pattern matches and no ignore pattern does (ignore wins
/// ties). Text/Binary/Ignore keeps an entry iff a text or binary pattern
/// matches and no ignore pattern does, and additionally yields the category
/// used to pick the distance threshold. Matching nothing excludes the entry;
/// this is allow-list semantics.
pub struct PathFilter {
    mode: Mode,
}

enum Mode {
    Accept {
        accept: Vec<Regex>,
        ignore: Vec<Regex>,
    },
    TextBinary {
        text: Vec<Regex>,
        binary: Vec<Regex>,
        ignore: Vec<Regex>,
    },
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, Error> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| Error::Pattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

impl PathFilter {
    /// Compile the configured pattern lists. Text/Binary mode is selected
    /// when either a text or binary pattern list is present.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let ignore = compile_all(&config.ignore_patterns)?;
        let mode = if !config.text_patterns.is_empty() || !config.binary_patterns.is_empty() {
            Mode::TextBinary {
                text: compile_all(&config.text_patterns)?,
                binary: compile_all(&config.binary_patterns)?,
                ignore,
            }
        } else {
            Mode::Accept {
                accept: compile_all(&config.accept_patterns)?,
                ignore,
            }
        };
        Ok(Self { mode })
    }

    pub fn keeps(&self, path: &str) -> bool {
        match &self.mode {
            Mode::Accept { accept, ignore } => {
                accept.iter().any(|r| r.is_match(path))
                    && !ignore.iter().any(|r| r.is_match(path))
            }
            Mode::TextBinary {
                text,
                binary,
                ignore,
            } => {
                (text.iter().any(|r| r.is_match(path))
                    || binary.iter().any(|r| r.is_match(path)))
                    && !ignore.iter().any(|r| r.is_match(path))
            }
        }
    }

    pub fn retain(&self, fingerprints: Vec<Fingerprint>) -> Vec<Fingerprint> {
        fingerprints
            .into_iter()
            .filter(|fingerprint| self.keeps(&fingerprint.path))
            .collect()
    }

    /// Category used to pick the distance threshold. Binary patterns take
    /// precedence when both could match; Accept mode has no binary patterns
    /// and is always Text.
    pub fn category(&self, path: &str) -> Category {
        match &self.mode {
            Mode::Accept { .. } => Category::Text,
            Mode::TextBinary { binary, .. } => {
                if binary.iter().any(|r| r.is_match(path)) {
                    Category::Binary
                } else {
                    Category::Text
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::Digest;

    fn fingerprint(path: &str) -> Fingerprint {
        Fingerprint {
            path: path.to_string(),
            digest: Digest::from_raw(0),
        }
    }

    fn accept_filter(accept: &[&str], ignore: &[&str]) -> PathFilter {
        let config = AppConfig {
            accept_patterns: accept.iter().map(|s| s.to_string()).collect(),
            ignore_patterns: ignore.iter().map(|s| s.to_string()).collect(),
            ..AppConfig::default()
        };
        PathFilter::from_config(&config).unwrap()
    }

    fn text_binary_filter(text: &[&str], binary: &[&str], ignore: &[&str]) -> PathFilter {
        let config = AppConfig {
            text_patterns: text.iter().map(|s| s.to_string()).collect(),
            binary_patterns: binary.iter().map(|s| s.to_string()).collect(),
            ignore_patterns: ignore.iter().map(|s| s.to_string()).collect(),
            ..AppConfig::default()
        };
        PathFilter::from_config(&config).unwrap()
    }

    #[test]
    fn test_accept_keeps_matching_paths() {
        let filter = accept_filter(&[r"\.c$"], &[]);
        assert!(filter.keeps("sub.zip:hw1/sol.c"));
        assert!(!filter.keeps("sub.zip:hw1/sol.o"));
    }

    #[test]
    fn test_no_match_is_excluded() {
        let filter = accept_filter(&[r"\.c$"], &[]);
        let kept = filter.retain(vec![fingerprint("sub.zip:readme.md")]);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_ignore_wins_over_accept() {
        let filter = accept_filter(&[r"\.c$"], &["generated"]);
        assert!(!filter.keeps("sub.zip:generated/parser.c"));
        assert!(filter.keeps("sub.zip:src/parser.c"));
    }

    #[test]
    fn test_text_binary_keeps_either_kind() {
        let filter = text_binary_filter(&[r"\.c$"], &[r"\.bin$"], &[]);
        assert!(filter.keeps("sub.zip:sol.c"));
        assert!(filter.keeps("sub.zip:sol.bin"));
        assert!(!filter.keeps("sub.zip:sol.md"));
    }

    #[test]
    fn test_text_binary_ignore_still_wins() {
        let filter = text_binary_filter(&[r"\.c$"], &[r"\.bin$"], &["vendor"]);
        assert!(!filter.keeps("sub.zip:vendor/lib.bin"));
    }

    #[test]
    fn test_binary_category_takes_precedence() {
        // Path matches both lists; category must be Binary.
        let filter = text_binary_filter(&[r"\.dat$"], &[r"hw2/.*"], &[]);
        assert_eq!(filter.category("sub.zip:hw2/trace.dat"), Category::Binary);
        assert_eq!(filter.category("sub.zip:hw1/trace.dat"), Category::Text);
    }

    #[test]
    fn test_accept_mode_is_always_text_category() {
        let filter = accept_filter(&[r"\.c$"], &[]);
        assert_eq!(filter.category("sub.zip:sol.c"), Category::Text);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let config = AppConfig {
            accept_patterns: vec!["[unclosed".to_string()],
            ..AppConfig::default()
        };
        let result = PathFilter::from_config(&config);
        assert!(matches!(result, Err(Error::Pattern { .. })));
    }
}
