//! Inference on a binomial proportion.
//!
//! Normal-approximation (Wald) interval and one-sample z-test. Neither
//! applies a continuity correction and interval bounds are not clamped to
//! [0, 1]; both are unreliable for small samples or proportions near 0 or 1.
//!
//! # Examples
//!
//! ```
//! use u_battery::proportion::{hypothesis_test_proportion, Alternative};
//!
//! // 60 of 100 cells passed; is the pass rate above 50%?
//! let r = hypothesis_test_proportion(60, 100, 0.5, 0.05, Alternative::Greater).unwrap();
//! assert!((r.z_statistic - 2.0).abs() < 1e-9);
//! assert!(r.reject_null);
//! ```

use std::fmt;
use std::str::FromStr;

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{Error, Result};

/// Direction of the alternative hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alternative {
    /// H₁: p > p₀ (upper tail).
    #[default]
    Greater,
    /// H₁: p < p₀ (lower tail).
    Less,
    /// H₁: p ≠ p₀.
    TwoSided,
}

impl FromStr for Alternative {
    type Err = std::convert::Infallible;

    /// `"greater"` and `"less"` select a tail; any other text is two-sided.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "greater" => Alternative::Greater,
            "less" => Alternative::Less,
            _ => Alternative::TwoSided,
        })
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Alternative::Greater => "greater",
            Alternative::Less => "less",
            Alternative::TwoSided => "two-sided",
        })
    }
}

/// Normal-approximation interval for a proportion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProportionInterval {
    /// Observed proportion p̂ = successes / trials.
    pub estimate: f64,
    /// Lower bound (may be below 0).
    pub lower: f64,
    /// Upper bound (may be above 1).
    pub upper: f64,
    /// Two-sided confidence level.
    pub confidence: f64,
}

/// Result of a one-sample z-test for a proportion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProportionTest {
    /// Observed proportion p̂.
    pub estimate: f64,
    /// z = (p̂ - p₀) / √(p₀(1 - p₀)/n).
    pub z_statistic: f64,
    /// p-value for the chosen alternative.
    pub p_value: f64,
    /// `p_value < alpha`.
    pub reject_null: bool,
    /// Alternative the p-value refers to.
    pub alternative: Alternative,
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| Error::domain(e.to_string()))
}

fn observed_proportion(successes: u64, trials: u64) -> Result<f64> {
    if trials == 0 {
        return Err(Error::domain("trials must be positive"));
    }
    if successes > trials {
        return Err(Error::domain(format!(
            "successes ({successes}) exceed trials ({trials})"
        )));
    }
    Ok(successes as f64 / trials as f64)
}

fn check_open_unit(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(Error::domain(format!("{name} must be in (0, 1), got {value}")))
    }
}

/// Wald interval `p̂ ± z·√(p̂(1-p̂)/n)` at the given two-sided confidence.
///
/// # Errors
/// [`Error::Domain`] if `trials == 0`, `successes > trials`, or
/// `confidence` is outside (0, 1).
///
/// # Examples
///
/// ```
/// use u_battery::proportion::confidence_interval_proportion;
///
/// let ci = confidence_interval_proportion(60, 100, 0.95).unwrap();
/// assert!((ci.estimate - 0.6).abs() < 1e-12);
/// assert!((ci.lower - 0.50398).abs() < 1e-4);
/// assert!((ci.upper - 0.69602).abs() < 1e-4);
/// ```
pub fn confidence_interval_proportion(
    successes: u64,
    trials: u64,
    confidence: f64,
) -> Result<ProportionInterval> {
    let p_hat = observed_proportion(successes, trials)?;
    check_open_unit("confidence", confidence)?;

    let z = standard_normal()?.inverse_cdf(1.0 - (1.0 - confidence) / 2.0);
    let se = (p_hat * (1.0 - p_hat) / trials as f64).sqrt();

    Ok(ProportionInterval {
        estimate: p_hat,
        lower: p_hat - z * se,
        upper: p_hat + z * se,
        confidence,
    })
}

/// One-sample z-test of H₀: p = `p0`.
///
/// The standard error uses the null proportion, `√(p₀(1-p₀)/n)`. The
/// p-value is the upper tail for [`Alternative::Greater`], the lower tail for
/// [`Alternative::Less`] and twice the outer tail for
/// [`Alternative::TwoSided`].
///
/// # Errors
/// [`Error::Domain`] if `trials == 0`, `successes > trials`, `p0` is not
/// strictly inside (0, 1) (the standard error would be zero), or `alpha` is
/// outside [0, 1]. `alpha = 1` always rejects and `alpha = 0` never does.
pub fn hypothesis_test_proportion(
    successes: u64,
    trials: u64,
    p0: f64,
    alpha: f64,
    alternative: Alternative,
) -> Result<ProportionTest> {
    let p_hat = observed_proportion(successes, trials)?;
    check_open_unit("p0", p0)?;
    if !(0.0..=1.0).contains(&alpha) {
        return Err(Error::domain(format!("alpha must be in [0, 1], got {alpha}")));
    }

    let se = (p0 * (1.0 - p0) / trials as f64).sqrt();
    let z = (p_hat - p0) / se;

    let normal = standard_normal()?;
    let p_value = match alternative {
        Alternative::Greater => 1.0 - normal.cdf(z),
        Alternative::Less => normal.cdf(z),
        Alternative::TwoSided => 2.0 * (1.0 - normal.cdf(z.abs())),
    };

    Ok(ProportionTest {
        estimate: p_hat,
        z_statistic: z,
        p_value,
        reject_null: p_value < alpha,
        alternative,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_ALPHA, DEFAULT_CONFIDENCE};

    #[test]
    fn alternative_parsing() {
        assert_eq!("greater".parse::<Alternative>(), Ok(Alternative::Greater));
        assert_eq!("less".parse::<Alternative>(), Ok(Alternative::Less));
        assert_eq!("two-sided".parse::<Alternative>(), Ok(Alternative::TwoSided));
        assert_eq!("anything".parse::<Alternative>(), Ok(Alternative::TwoSided));
        assert_eq!("Greater".parse::<Alternative>(), Ok(Alternative::TwoSided));
        assert_eq!(Alternative::default(), Alternative::Greater);
        assert_eq!(Alternative::TwoSided.to_string(), "two-sided");
    }

    #[test]
    fn interval_known_values() {
        let ci = confidence_interval_proportion(60, 100, DEFAULT_CONFIDENCE).expect("valid");
        // z = 1.959964, se = sqrt(0.24 / 100) = 0.0489898
        let half = 1.959_963_984_540_054 * 0.24_f64.sqrt() / 10.0;
        assert!((ci.lower - (0.6 - half)).abs() < 1e-9, "lower = {}", ci.lower);
        assert!((ci.upper - (0.6 + half)).abs() < 1e-9, "upper = {}", ci.upper);
        assert_eq!(ci.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn interval_widens_with_confidence() {
        let narrow = confidence_interval_proportion(30, 80, 0.80).expect("valid");
        let wide = confidence_interval_proportion(30, 80, 0.99).expect("valid");
        assert!(wide.lower < narrow.lower && wide.upper > narrow.upper);
    }

    #[test]
    fn interval_is_not_clamped() {
        let ci = confidence_interval_proportion(1, 5, 0.95).expect("valid");
        assert!(ci.lower < 0.0, "lower = {}", ci.lower);
    }

    #[test]
    fn interval_degenerate_at_extremes() {
        let ci = confidence_interval_proportion(0, 20, 0.95).expect("valid");
        assert_eq!((ci.lower, ci.upper), (0.0, 0.0));
        let ci = confidence_interval_proportion(20, 20, 0.95).expect("valid");
        assert_eq!((ci.lower, ci.upper), (1.0, 1.0));
    }

    #[test]
    fn interval_domain_errors() {
        assert!(matches!(confidence_interval_proportion(0, 0, 0.95), Err(Error::Domain(_))));
        assert!(matches!(confidence_interval_proportion(6, 5, 0.95), Err(Error::Domain(_))));
        assert!(matches!(confidence_interval_proportion(3, 5, 1.0), Err(Error::Domain(_))));
        assert!(matches!(confidence_interval_proportion(3, 5, 0.0), Err(Error::Domain(_))));
    }

    #[test]
    fn test_greater_example() {
        let r = hypothesis_test_proportion(60, 100, 0.5, DEFAULT_ALPHA, Alternative::Greater)
            .expect("valid");
        assert!((r.z_statistic - 2.0).abs() < 1e-9, "z = {}", r.z_statistic);
        assert!((r.p_value - 0.02275).abs() < 1e-4, "p = {}", r.p_value);
        assert!(r.reject_null);
        assert_eq!(r.alternative, Alternative::Greater);
    }

    #[test]
    fn test_less_and_two_sided() {
        let less = hypothesis_test_proportion(60, 100, 0.5, 0.05, Alternative::Less).expect("valid");
        assert!((less.p_value - 0.97725).abs() < 1e-4);
        assert!(!less.reject_null);

        let two = hypothesis_test_proportion(60, 100, 0.5, 0.05, Alternative::TwoSided)
            .expect("valid");
        assert!((two.p_value - 0.0455).abs() < 1e-4);
        assert!(two.reject_null);

        let stricter = hypothesis_test_proportion(60, 100, 0.5, 0.01, Alternative::TwoSided)
            .expect("valid");
        assert!(!stricter.reject_null);
    }

    #[test]
    fn test_p0_on_boundary_is_domain_error() {
        for p0 in [0.0, 1.0, -0.2, 1.5] {
            assert!(matches!(
                hypothesis_test_proportion(5, 10, p0, 0.05, Alternative::TwoSided),
                Err(Error::Domain(_))
            ));
        }
    }

    #[test]
    fn test_other_domain_errors() {
        assert!(matches!(
            hypothesis_test_proportion(0, 0, 0.5, 0.05, Alternative::Greater),
            Err(Error::Domain(_))
        ));
        assert!(matches!(
            hypothesis_test_proportion(11, 10, 0.5, 0.05, Alternative::Greater),
            Err(Error::Domain(_))
        ));
        assert!(matches!(
            hypothesis_test_proportion(5, 10, 0.5, 1.5, Alternative::Greater),
            Err(Error::Domain(_))
        ));
        assert!(matches!(
            hypothesis_test_proportion(5, 10, 0.5, f64::NAN, Alternative::Greater),
            Err(Error::Domain(_))
        ));
    }

    #[test]
    fn test_alpha_at_bounds() {
        // 40 of 100 against 0.5 (greater): p-value ≈ 0.977
        let always = hypothesis_test_proportion(40, 100, 0.5, 1.0, Alternative::Greater)
            .expect("alpha = 1 is allowed");
        assert!(always.reject_null);

        let never = hypothesis_test_proportion(60, 100, 0.5, 0.0, Alternative::Greater)
            .expect("alpha = 0 is allowed");
        assert!(!never.reject_null);
    }
}
