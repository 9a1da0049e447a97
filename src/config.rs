//! Extraction settings.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields the standard layout: files `B0001.mat`, `B0002.mat`, ... and an
//! end-of-life threshold of 80% of initial capacity.
//!
//! ```
//! use u_battery::config::ExtractionConfig;
//!
//! let cfg = ExtractionConfig::from_yaml_str("threshold: 0.7\n").unwrap();
//! assert_eq!(cfg.threshold, 0.7);
//! assert_eq!(cfg.file_name(12), "B0012.mat");
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default end-of-life fraction of initial capacity.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Default two-sided confidence level for proportion intervals.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Default significance level for proportion tests.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// How unit records are named and how lifetimes are derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Failure threshold as a fraction of the first capacity reading.
    pub threshold: f64,
    /// Identifier prefix.
    pub prefix: String,
    /// Zero-padded width of the unit index.
    pub width: usize,
    /// File extension without the dot.
    pub extension: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            prefix: "B".to_string(),
            width: 4,
            extension: "mat".to_string(),
        }
    }
}

impl ExtractionConfig {
    /// Parses a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads and parses a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Checks that the threshold is a usable fraction and the width is non-zero.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 || self.threshold > 1.0 {
            return Err(Error::domain(format!(
                "threshold must be in (0, 1], got {}",
                self.threshold
            )));
        }
        if self.width == 0 {
            return Err(Error::domain("width must be at least 1"));
        }
        Ok(())
    }

    /// Record identifier for a unit index, e.g. `B0007`.
    pub fn unit_id(&self, index: u32) -> String {
        format!("{}{:0width$}", self.prefix, index, width = self.width)
    }

    /// File name for a unit index, e.g. `B0007.mat`.
    pub fn file_name(&self, index: u32) -> String {
        format!("{}.{}", self.unit_id(index), self.extension)
    }
}
