//! Simple Moving Average (SMA) indicator.

use super::{last_or_zero, Indicator, Reading};

/// SMA (Simple Moving Average) indicator.
///
/// Mean of the most recent `period` closes. With fewer closes than the
/// period, the last close (or 0 for an empty series) stands in.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }
}

impl Indicator for Sma {
    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Reading {
        if closes.len() < self.period {
            return Reading::InsufficientData {
                fallback: last_or_zero(closes),
            };
        }

        let window = &closes[closes.len() - self.period..];
        let sma = window.iter().sum::<f64>() / self.period as f64;
        Reading::Value(sma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_sums_oldest_first() {
        let closes = [5.0, 1e17, -1e17, 1.0];
        let oldest_first = ((1e17 + -1e17) + 1.0) / 3.0;
        let newest_first = ((1.0 + -1e17) + 1e17) / 3.0;
        assert_ne!(oldest_first, newest_first);
        assert_eq!(Sma::new(3).compute(&closes), Reading::Value(oldest_first));
    }

    #[test]
    fn test_sma_uses_most_recent_window() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(Sma::new(2).compute(&closes), Reading::Value(4.5));
        assert_eq!(Sma::new(5).compute(&closes), Reading::Value(3.0));
    }

    #[test]
    fn test_sma_short_series_degrades_to_last_close() {
        let closes = [10.0, 11.0, 12.0, 13.0, 14.0];
        let reading = Sma::new(20).compute(&closes);
        assert_eq!(reading, Reading::InsufficientData { fallback: 14.0 });
        assert_eq!(reading.resolve(), 14.0);
        assert!(!reading.resolve().is_nan());
    }

    #[test]
    fn test_sma_empty_series_is_zero() {
        assert_eq!(Sma::new(20).compute(&[]).resolve(), 0.0);
    }

    #[test]
    fn test_sma_zero_period_is_clamped() {
        let sma = Sma::new(0);
        assert_eq!(sma.min_periods(), 1);
        assert_eq!(sma.compute(&[3.0, 9.0]), Reading::Value(9.0));
    }
}
