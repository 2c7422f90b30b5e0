//! Technical indicator implementations.
//!
//! Every indicator works on a slice of closing prices ordered oldest first.
//! None of them fail on short input: a calculation that lacks history
//! reports [`Reading::InsufficientData`] together with the value callers
//! fall back to, and [`Reading::resolve`] is the single place that turns
//! that into a number.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::Ema;
pub use macd::{Macd, MacdLines, MacdSignalMode};
pub use rsi::Rsi;
pub use sma::Sma;

/// Outcome of a single indicator calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// Computed from a full window.
    Value(f64),
    /// Not enough history; `fallback` is the best-effort stand-in.
    InsufficientData { fallback: f64 },
}

impl Reading {
    /// Resolve to a number, taking the fallback for short series.
    pub fn resolve(self) -> f64 {
        match self {
            Reading::Value(v) => v,
            Reading::InsufficientData { fallback } => fallback,
        }
    }

    /// Whether the reading came from a full window.
    pub fn is_sufficient(&self) -> bool {
        matches!(self, Reading::Value(_))
    }
}

/// Trait for indicators that reduce a close series to one value.
pub trait Indicator: Send + Sync {
    /// Minimum number of closes needed for a full calculation.
    fn min_periods(&self) -> usize;

    /// Calculate from closing prices.
    fn compute(&self, closes: &[f64]) -> Reading;
}

/// Last close in the series, or 0 when empty.
pub(crate) fn last_or_zero(closes: &[f64]) -> f64 {
    closes.last().copied().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_resolve() {
        assert_eq!(Reading::Value(42.0).resolve(), 42.0);
        assert_eq!(Reading::InsufficientData { fallback: 7.0 }.resolve(), 7.0);
    }

    #[test]
    fn test_reading_sufficiency() {
        assert!(Reading::Value(1.0).is_sufficient());
        assert!(!Reading::InsufficientData { fallback: 1.0 }.is_sufficient());
    }

    #[test]
    fn test_last_or_zero() {
        assert_eq!(last_or_zero(&[]), 0.0);
        assert_eq!(last_or_zero(&[1.0, 2.0, 3.0]), 3.0);
    }
}
