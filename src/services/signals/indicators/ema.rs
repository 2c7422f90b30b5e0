//! Exponential Moving Average (EMA) indicator.

use super::{last_or_zero, Indicator, Reading};

/// EMA (Exponential Moving Average) indicator.
///
/// Seeded with the SMA of the first `period` closes, then smoothed with
/// multiplier `2 / (period + 1)` over the rest of the series.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }

    /// EMA value at every index from `period - 1` onward.
    ///
    /// Empty when the series is shorter than the period.
    pub fn series(values: &[f64], period: usize) -> Vec<f64> {
        let period = period.max(1);
        if values.len() < period {
            return Vec::new();
        }

        let multiplier = 2.0 / (period as f64 + 1.0);
        let seed = values.iter().take(period).sum::<f64>() / period as f64;

        let mut ema = Vec::with_capacity(values.len() - period + 1);
        ema.push(seed);

        let mut current = seed;
        for value in &values[period..] {
            current = (value - current) * multiplier + current;
            ema.push(current);
        }

        ema
    }
}

impl Indicator for Ema {
    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Reading {
        match Self::series(closes, self.period).last() {
            Some(&ema) => Reading::Value(ema),
            None => Reading::InsufficientData {
                fallback: last_or_zero(closes),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_seed_is_sma() {
        let closes = [2.0, 4.0, 6.0];
        assert_eq!(Ema::new(3).compute(&closes), Reading::Value(4.0));
    }

    #[test]
    fn test_ema_smoothing_step() {
        // seed = 2.0, multiplier = 2 / (3 + 1) = 0.5, next = (7 - 2) * 0.5 + 2
        let closes = [1.0, 2.0, 3.0, 7.0];
        assert_eq!(Ema::new(3).compute(&closes), Reading::Value(4.5));
        assert_eq!(Ema::series(&closes, 3), vec![2.0, 4.5]);
    }

    #[test]
    fn test_ema_constant_series() {
        let closes = vec![50.0; 40];
        assert_eq!(Ema::new(12).compute(&closes).resolve(), 50.0);
    }

    #[test]
    fn test_ema_short_series_degrades_to_last_value() {
        let closes = [5.0, 6.0, 7.0];
        assert_eq!(
            Ema::new(12).compute(&closes),
            Reading::InsufficientData { fallback: 7.0 }
        );
        assert_eq!(Ema::new(12).compute(&[]).resolve(), 0.0);
    }

    #[test]
    fn test_ema_series_length() {
        let closes: Vec<f64> = (1..=30).map(|i| i as f64).collect();
        assert_eq!(Ema::series(&closes, 12).len(), 19);
        assert!(Ema::series(&closes[..5], 12).is_empty());
    }
}
