//! Reliability metrics from fitted Weibull parameters.
//!
//! Once a lifetime sample has been fitted, these answer the usual fleet
//! questions: what fraction of cells survives to cycle t, how fast cells are
//! failing at t, the mean life, and by which cycle a given fraction is gone.

use statrs::function::gamma::gamma;

use crate::error::{Error, Result};

use super::mle::WeibullFit;

/// Reliability view of a Weibull(shape k, scale lambda) lifetime model.
///
/// - Reliability: R(t) = exp(-(t/lambda)^k)
/// - Hazard rate: h(t) = (k/lambda) * (t/lambda)^(k-1)
/// - Mean life: lambda * Gamma(1 + 1/k)
///
/// # Examples
///
/// ```
/// use u_battery::weibull::ReliabilityAnalysis;
///
/// let ra = ReliabilityAnalysis::new(2.0, 100.0).unwrap();
/// assert!((ra.reliability(0.0) - 1.0).abs() < 1e-10);
/// assert!(ra.hazard_rate(50.0) > 0.0);
/// let b10 = ra.b_life(0.10).unwrap();
/// assert!(b10 > 0.0 && b10 < 100.0);
/// ```
///
/// # Reference
/// Meeker & Escobar (1998), *Statistical Methods for Reliability Data*, Wiley.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReliabilityAnalysis {
    shape: f64,
    scale: f64,
}

impl ReliabilityAnalysis {
    /// Creates the analysis from shape and scale.
    ///
    /// # Errors
    /// [`Error::Domain`] if either parameter is non-positive or non-finite.
    pub fn new(shape: f64, scale: f64) -> Result<Self> {
        if !shape.is_finite() || !scale.is_finite() || shape <= 0.0 || scale <= 0.0 {
            return Err(Error::domain(format!(
                "Weibull parameters must be positive, got shape {shape}, scale {scale}"
            )));
        }
        Ok(Self { shape, scale })
    }

    /// Creates the analysis from a fit. Fits always carry valid parameters.
    pub fn from_fit(fit: &WeibullFit) -> Self {
        Self {
            shape: fit.shape,
            scale: fit.scale,
        }
    }

    /// Shape parameter (k).
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Scale parameter (lambda).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Probability of surviving past cycle `t`. Returns 1.0 for `t <= 0`.
    pub fn reliability(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        (-(t / self.scale).powf(self.shape)).exp()
    }

    /// Instantaneous failure rate at cycle `t`. Returns 0.0 for `t <= 0`.
    ///
    /// k < 1 decreasing (early failures), k = 1 constant, k > 1 wear-out.
    pub fn hazard_rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        (self.shape / self.scale) * (t / self.scale).powf(self.shape - 1.0)
    }

    /// Mean life, `lambda * Gamma(1 + 1/k)`.
    pub fn mean_life(&self) -> f64 {
        self.scale * gamma(1.0 + 1.0 / self.shape)
    }

    /// Cycle at which reliability falls to `p`: `lambda * (-ln p)^(1/k)`.
    ///
    /// # Errors
    /// [`Error::Domain`] if `p` is outside (0, 1).
    pub fn time_to_reliability(&self, p: f64) -> Result<f64> {
        if !(p > 0.0 && p < 1.0) {
            return Err(Error::domain(format!("reliability must be in (0, 1), got {p}")));
        }
        Ok(self.scale * (-p.ln()).powf(1.0 / self.shape))
    }

    /// B-life: cycle by which `fraction_failed` of the population has failed.
    ///
    /// `b_life(0.10)` is the B10 life.
    ///
    /// # Errors
    /// [`Error::Domain`] if `fraction_failed` is outside (0, 1).
    pub fn b_life(&self, fraction_failed: f64) -> Result<f64> {
        if !(fraction_failed > 0.0 && fraction_failed < 1.0) {
            return Err(Error::domain(format!(
                "failed fraction must be in (0, 1), got {fraction_failed}"
            )));
        }
        self.time_to_reliability(1.0 - fraction_failed)
    }
}
