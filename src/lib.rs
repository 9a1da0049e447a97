//! # u-battery
//!
//! Battery degradation lifetime extraction and the small set of statistics
//! applied to the resulting lifetimes.
//!
//! Per-unit records (cycle, capacity, impedance) are read from a record
//! store, each capacity curve is reduced to an empirical lifetime (first
//! cycle below a fraction of initial capacity), and the lifetime sample is
//! analysed with Weibull fitting, Beta-Binomial updating and normal
//! approximations for proportions.
//!
//! ## Modules
//!
//! - [`loader`] — Unit records, MAT-file stores, lifetime extraction
//! - [`weibull`] — Weibull MLE and reliability metrics
//! - [`bayes`] — Beta-Binomial conjugate update
//! - [`proportion`] — Wald interval and z-test for a proportion
//! - [`config`] — Extraction settings and analysis defaults
//! - [`error`] — Crate error type
//!
//! ## Example
//!
//! ```
//! use u_battery::config::ExtractionConfig;
//! use u_battery::loader::{extract_lifetimes_from, MemoryRecord, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! for (i, fade) in [0.020, 0.025, 0.030, 0.035].iter().enumerate() {
//!     let capacity: Vec<f64> = (0..40).map(|c| 2.0 - fade * c as f64).collect();
//!     let cycle: Vec<f64> = (1..=40).map(|c| c as f64).collect();
//!     store.insert(
//!         MemoryRecord::new(format!("B{:04}", i + 1))
//!             .with_column("cycle", cycle)
//!             .with_column("capacity", capacity),
//!     );
//! }
//!
//! let sample = extract_lifetimes_from(&store, 4, &ExtractionConfig::default()).unwrap();
//! assert_eq!(sample.len(), 4);
//! let fit = sample.fit_weibull().unwrap();
//! assert!(fit.shape > 0.0 && fit.scale > 0.0);
//! ```

pub mod bayes;
pub mod config;
pub mod error;
pub mod loader;
pub mod proportion;
pub mod weibull;

pub use error::{Error, Result};
