//! Weibull lifetime modelling.
//!
//! # Modules
//!
//! - [`fit_weibull`] — two-parameter MLE (location fixed at zero)
//! - [`ReliabilityAnalysis`] — R(t), hazard rate, mean life, B-life
//!
//! # References
//!
//! - Abernethy, R.B. (2006). *The New Weibull Handbook*, 5th ed.
//! - Lawless, J.F. (2003). *Statistical Models and Methods for Lifetime Data*, 2nd ed.

mod mle;
mod reliability;

pub use mle::{fit_weibull, WeibullFit};
pub use reliability::ReliabilityAnalysis;
