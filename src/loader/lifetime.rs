//! Empirical lifetime from a capacity fade curve.

use std::path::Path;

use tracing::{debug, info};

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::weibull::{fit_weibull, ReliabilityAnalysis, WeibullFit};

use super::mat::MatDirectory;
use super::record::{load_unit_record, RecordStore};

/// Index of the first capacity reading below `threshold * capacity[0]`.
///
/// A series that never drops below the target is reported as failing at
/// its last index (`len - 1`). Survivors are not flagged as censored, so
/// their lifetime is understated.
///
/// # Errors
///
/// [`Error::Domain`] if `capacity` is empty or `threshold` is not finite.
///
/// # Examples
///
/// ```
/// use u_battery::loader::compute_lifetime;
///
/// // target = 0.8 * 2.0 = 1.6; first value below it is 1.5 at index 3
/// let life = compute_lifetime(&[2.0, 1.9, 1.8, 1.5, 1.0], 0.8).unwrap();
/// assert_eq!(life, 3);
///
/// // never crosses: last index
/// assert_eq!(compute_lifetime(&[2.0, 1.95, 1.9], 0.8).unwrap(), 2);
/// ```
pub fn compute_lifetime(capacity: &[f64], threshold: f64) -> Result<usize> {
    let Some(&initial) = capacity.first() else {
        return Err(Error::domain("capacity series is empty"));
    };
    if !threshold.is_finite() {
        return Err(Error::domain(format!("threshold must be finite, got {threshold}")));
    }

    let target = threshold * initial;
    Ok(capacity
        .iter()
        .position(|&c| c < target)
        .unwrap_or(capacity.len() - 1))
}

/// Lifetimes recovered from a batch of units.
///
/// `units`, `lifetimes` and `initial_capacities` are parallel and ordered by
/// ascending unit index. Units without a record are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LifetimeSample {
    units: Vec<u32>,
    lifetimes: Vec<usize>,
    initial_capacities: Vec<f64>,
}

impl LifetimeSample {
    /// Unit indices that produced a lifetime.
    pub fn units(&self) -> &[u32] {
        &self.units
    }

    /// Lifetime (cycle index) per recovered unit.
    pub fn lifetimes(&self) -> &[usize] {
        &self.lifetimes
    }

    /// First capacity reading per recovered unit.
    pub fn initial_capacities(&self) -> &[f64] {
        &self.initial_capacities
    }

    /// Number of recovered units.
    pub fn len(&self) -> usize {
        self.lifetimes.len()
    }

    /// True if no unit was recovered.
    pub fn is_empty(&self) -> bool {
        self.lifetimes.is_empty()
    }

    /// Lifetimes as `f64`, ready for distribution fitting.
    pub fn lifetimes_f64(&self) -> Vec<f64> {
        self.lifetimes.iter().map(|&l| l as f64).collect()
    }

    /// Fits a two-parameter Weibull to the lifetimes.
    pub fn fit_weibull(&self) -> Result<WeibullFit> {
        fit_weibull(&self.lifetimes_f64())
    }

    /// Fits a Weibull to the lifetimes and returns its reliability view.
    pub fn reliability(&self) -> Result<ReliabilityAnalysis> {
        Ok(ReliabilityAnalysis::from_fit(&self.fit_weibull()?))
    }

    fn push(&mut self, unit: u32, lifetime: usize, initial_capacity: f64) {
        self.units.push(unit);
        self.lifetimes.push(lifetime);
        self.initial_capacities.push(initial_capacity);
    }
}

/// Extracts lifetimes for units `1..=count` from a directory of MAT files
/// named `B0001.mat`, `B0002.mat`, ...
///
/// Missing files are skipped. Any other failure aborts the run.
pub fn extract_lifetimes(folder: impl AsRef<Path>, count: u32) -> Result<LifetimeSample> {
    let config = ExtractionConfig::default();
    let store = MatDirectory::with_config(folder.as_ref(), &config);
    extract_lifetimes_from(&store, count, &config)
}

/// Extracts lifetimes for units `1..=count` from any record store.
///
/// Each unit's identifier comes from [`ExtractionConfig::unit_id`]. A unit
/// whose record is not found is omitted; every other error is returned and
/// the lifetimes gathered so far are dropped.
///
/// # Examples
///
/// ```
/// use u_battery::config::ExtractionConfig;
/// use u_battery::loader::{extract_lifetimes_from, MemoryRecord, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.insert(
///     MemoryRecord::new("B0002")
///         .with_column("cycle", vec![1.0, 2.0, 3.0])
///         .with_column("capacity", vec![2.0, 1.7, 1.5]),
/// );
/// let sample = extract_lifetimes_from(&store, 3, &ExtractionConfig::default()).unwrap();
/// assert_eq!(sample.units(), &[2]);
/// assert_eq!(sample.lifetimes(), &[2]);
/// ```
pub fn extract_lifetimes_from<S: RecordStore>(
    store: &S,
    count: u32,
    config: &ExtractionConfig,
) -> Result<LifetimeSample> {
    config.validate()?;
    let mut sample = LifetimeSample::default();

    for index in 1..=count {
        let id = config.unit_id(index);
        let record = match store.open(&id) {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                debug!(unit = %id, "record not found, skipping");
                continue;
            }
            Err(e) => return Err(e),
        };

        let unit = load_unit_record(&record)?;
        let lifetime = compute_lifetime(&unit.capacity, config.threshold)?;
        let initial = unit.capacity[0];
        debug!(unit = %id, lifetime, initial_capacity = initial, "lifetime extracted");
        sample.push(index, lifetime, initial);
    }

    info!(
        requested = count,
        recovered = sample.len(),
        threshold = config.threshold,
        "lifetime extraction finished"
    );
    Ok(sample)
}
