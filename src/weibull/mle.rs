//! Maximum likelihood fit of a two-parameter Weibull distribution.
//!
//! The location parameter is fixed at zero. The shape is found by
//! Newton-Raphson on the profile likelihood and the scale follows in closed
//! form.

use crate::error::{Error, Result};

/// Fitted two-parameter Weibull model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeibullFit {
    /// Shape parameter (k).
    pub shape: f64,
    /// Scale parameter (lambda).
    pub scale: f64,
    /// Log-likelihood at the fitted parameters.
    pub log_likelihood: f64,
    /// Newton-Raphson iterations used.
    pub iterations: usize,
}

const MAX_ITER: usize = 200;

const TOL: f64 = 1e-10;

/// Starting shape when the log-spread of the data gives no usable guess.
const FALLBACK_SHAPE: f64 = 1.2;

/// Fits a Weibull distribution (location 0) to positive lifetimes by MLE.
///
/// Given t_1, ..., t_n the profile equation for the shape k is
///
/// ```text
/// g(k) = 1/k + mean(ln t) - sum(t^k ln t) / sum(t^k) = 0
/// ```
///
/// and the scale is `lambda = (sum(t^k) / n)^(1/k)`.
///
/// The data are divided by their maximum before iterating so that `t^k`
/// stays bounded for steep (large-k) lifetime samples; the scale is mapped
/// back afterwards. Newton starts from Menon's estimate `1.28 / sd(ln t)`.
///
/// # Errors
///
/// [`Error::Fit`] if the sample has fewer than 2 values, contains a
/// non-positive or non-finite value, or the iteration does not converge
/// (e.g. all values identical).
///
/// # Examples
///
/// ```
/// use u_battery::weibull::fit_weibull;
///
/// let lifetimes = [480.0, 505.0, 520.0, 533.0, 547.0, 561.0, 590.0];
/// let fit = fit_weibull(&lifetimes).unwrap();
/// assert!(fit.shape > 5.0);
/// assert!(fit.scale > 500.0 && fit.scale < 600.0);
/// ```
///
/// # Reference
/// Lawless (2003), *Statistical Models and Methods for Lifetime Data*, 2nd ed.
pub fn fit_weibull(sample: &[f64]) -> Result<WeibullFit> {
    let n = sample.len();
    if n < 2 {
        return Err(Error::Fit(format!(
            "need at least 2 lifetimes, got {n}"
        )));
    }
    if let Some(bad) = sample.iter().find(|&&t| !t.is_finite() || t <= 0.0) {
        return Err(Error::Fit(format!(
            "lifetimes must be positive and finite, got {bad}"
        )));
    }

    let t_max = sample.iter().copied().fold(f64::MIN, f64::max);
    let ln_t: Vec<f64> = sample.iter().map(|&t| (t / t_max).ln()).collect();
    let n_f = n as f64;
    let mean_ln = ln_t.iter().sum::<f64>() / n_f;

    let mut k = initial_shape(&ln_t, mean_ln);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < MAX_ITER {
        iterations += 1;

        // s0 = sum(u^k), s1 = sum(u^k ln u), s2 = sum(u^k (ln u)^2), u = t / t_max
        let (mut s0, mut s1, mut s2) = (0.0_f64, 0.0_f64, 0.0_f64);
        for &lu in &ln_t {
            let w = (k * lu).exp();
            s0 += w;
            s1 += w * lu;
            s2 += w * lu * lu;
        }
        if s0 <= 0.0 || !s0.is_finite() {
            break;
        }

        let g = 1.0 / k + mean_ln - s1 / s0;
        let g_prime = -1.0 / (k * k) - (s2 * s0 - s1 * s1) / (s0 * s0);
        if g_prime.abs() < 1e-300 {
            break;
        }

        let delta = g / g_prime;
        let mut next = k - delta;
        if next <= 0.0 {
            next = k / 2.0;
        }

        if (next - k).abs() < TOL * k.max(1.0) {
            k = next;
            converged = true;
            break;
        }
        k = next;
    }

    if !converged || !k.is_finite() {
        return Err(Error::Fit(format!(
            "shape did not converge after {iterations} iterations"
        )));
    }

    let s0: f64 = ln_t.iter().map(|&lu| (k * lu).exp()).sum();
    let scale = t_max * (s0 / n_f).powf(1.0 / k);
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::Fit(format!("invalid scale estimate {scale}")));
    }

    let sum_ln_t: f64 = sample.iter().map(|t| t.ln()).sum();
    let log_likelihood = n_f * k.ln() - n_f * k * scale.ln() + (k - 1.0) * sum_ln_t
        - sample.iter().map(|&t| (t / scale).powf(k)).sum::<f64>();

    Ok(WeibullFit {
        shape: k,
        scale,
        log_likelihood,
        iterations,
    })
}

/// Menon's moment estimate of the shape from the spread of ln t.
fn initial_shape(ln_t: &[f64], mean_ln: f64) -> f64 {
    let n = ln_t.len() as f64;
    let var = ln_t.iter().map(|&l| (l - mean_ln).powi(2)).sum::<f64>() / (n - 1.0);
    let guess = 1.28 / var.sqrt();
    if guess.is_finite() && guess > 0.0 {
        guess
    } else {
        FALLBACK_SHAPE
    }
}
