//! Beta-Binomial conjugate updating.
//!
//! A Beta(alpha, beta) belief over a success probability (e.g. the chance
//! that a cell reaches a target cycle count) becomes
//! Beta(alpha + s, beta + n - s) after observing s successes in n trials.
//!
//! ```
//! use u_battery::bayes::bayesian_update;
//!
//! let post = bayesian_update(1.0, 1.0, 7, 10).unwrap();
//! assert_eq!((post.alpha, post.beta), (8.0, 4.0));
//! ```

use crate::error::{Error, Result};

/// Beta distribution parameters describing belief over a proportion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetaPosterior {
    /// Prior successes plus observed successes.
    pub alpha: f64,
    /// Prior failures plus observed failures.
    pub beta: f64,
}

impl BetaPosterior {
    /// A prior with the given parameters.
    ///
    /// # Errors
    /// [`Error::Domain`] unless both parameters are positive and finite.
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        if !(alpha.is_finite() && alpha > 0.0 && beta.is_finite() && beta > 0.0) {
            return Err(Error::domain(format!(
                "Beta parameters must be positive, got alpha {alpha}, beta {beta}"
            )));
        }
        Ok(Self { alpha, beta })
    }

    /// Uniform Beta(1, 1) prior.
    pub fn uniform() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }

    /// Posterior after `successes` out of `trials`.
    ///
    /// # Errors
    /// [`Error::Domain`] if `successes > trials`.
    pub fn update(&self, successes: u64, trials: u64) -> Result<Self> {
        if successes > trials {
            return Err(Error::domain(format!(
                "successes ({successes}) exceed trials ({trials})"
            )));
        }
        Ok(Self {
            alpha: self.alpha + successes as f64,
            beta: self.beta + (trials - successes) as f64,
        })
    }

    /// Mean, `alpha / (alpha + beta)`.
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    /// Variance, `alpha beta / ((alpha + beta)^2 (alpha + beta + 1))`.
    pub fn variance(&self) -> f64 {
        let total = self.alpha + self.beta;
        self.alpha * self.beta / (total * total * (total + 1.0))
    }
}

/// Conjugate update of a Beta(`prior_alpha`, `prior_beta`) prior.
///
/// Returns `(prior_alpha + successes, prior_beta + trials - successes)`.
///
/// # Errors
/// [`Error::Domain`] if either prior is not positive or `successes > trials`.
pub fn bayesian_update(
    prior_alpha: f64,
    prior_beta: f64,
    successes: u64,
    trials: u64,
) -> Result<BetaPosterior> {
    BetaPosterior::new(prior_alpha, prior_beta)?.update(successes, trials)
}
