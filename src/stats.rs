//! Accuracy statistics of judged predictions
//!
//! This module contains the (recurrence, connectivity) [`grid::PredictionGrid`]
//! that collects judged predictions per cell, the p-value [`cutoff`] search
//! and the [`summary`] of the accepted predictions.
//!
//! All ratios are reported as [`Ratio`], which is explicitly undefined if
//! its denominator is zero.

use std::fmt::Display;

pub mod cutoff;
pub mod grid;
pub mod summary;

/// A ratio that is undefined if its denominator is zero
///
/// # Examples
///
/// ```
/// use gopredict::stats::Ratio;
///
/// assert_eq!(Ratio::new(1, 4).value(), Some(0.25));
/// assert_eq!(Ratio::new(0, 0), Ratio::Undefined);
/// assert_eq!(Ratio::new(0, 0).to_string(), "NULL");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    Defined(f64),
    Undefined,
}

impl Ratio {
    pub fn new(numerator: usize, denominator: usize) -> Self {
        if denominator == 0 {
            Ratio::Undefined
        } else {
            Ratio::Defined(usize_to_f64(numerator) / usize_to_f64(denominator))
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Ratio::Defined(value) => Some(*value),
            Ratio::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Ratio::Defined(_))
    }

    /// Formats the ratio as percentage, e.g. `66.67%`
    pub fn as_percent(&self) -> String {
        match self {
            Ratio::Defined(value) => format!("{:.2}%", value * 100.0),
            Ratio::Undefined => String::from("NULL"),
        }
    }
}

impl Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ratio::Defined(value) => write!(f, "{value:.6}"),
            Ratio::Undefined => write!(f, "NULL"),
        }
    }
}

/// Counts never reach 2^52, so the conversion is exact
#[allow(clippy::cast_precision_loss)]
fn usize_to_f64(n: usize) -> f64 {
    n as f64
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn undefined_ratio() {
        let ratio = Ratio::new(3, 0);
        assert!(!ratio.is_defined());
        assert!(ratio.value().is_none());
        assert_eq!(ratio.as_percent(), "NULL");
    }

    #[test]
    fn defined_ratio() {
        let ratio = Ratio::new(2, 3);
        assert!(ratio.is_defined());
        assert_eq!(ratio.as_percent(), "66.67%");
        assert_eq!(ratio.to_string(), "0.666667");
        assert_eq!(Ratio::new(0, 3).value(), Some(0.0));
    }
}
