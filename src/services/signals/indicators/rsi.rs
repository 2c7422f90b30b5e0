//! Relative Strength Index (RSI) indicator.

use super::{Indicator, Reading};

/// Value reported when there is not enough history.
const NEUTRAL_RSI: f64 = 50.0;

/// RSI (Relative Strength Index) indicator.
///
/// Compares the size of recent gains to recent losses over the last
/// `period` price changes. Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
///
/// Uses plain averages of the window rather than Wilder smoothing.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }
}

impl Indicator for Rsi {
    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, closes: &[f64]) -> Reading {
        if closes.len() < self.min_periods() {
            return Reading::InsufficientData {
                fallback: NEUTRAL_RSI,
            };
        }

        let window = &closes[closes.len() - self.min_periods()..];
        let (gains, losses) = window
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .fold((0.0, 0.0), |(gains, losses), change| {
                if change >= 0.0 {
                    (gains + change, losses)
                } else {
                    (gains, losses - change)
                }
            });

        let avg_gain = gains / self.period as f64;
        let avg_loss = losses / self.period as f64;

        if avg_loss == 0.0 {
            return Reading::Value(100.0);
        }

        let rs = avg_gain / avg_loss;
        Reading::Value(100.0 - (100.0 / (1.0 + rs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uptrend(count: usize) -> Vec<f64> {
        (0..count).map(|i| 100.0 + i as f64 * 1.5).collect()
    }

    fn downtrend(count: usize) -> Vec<f64> {
        (0..count).map(|i| 200.0 - i as f64 * 1.5).collect()
    }

    #[test]
    fn test_rsi_min_periods() {
        let rsi = Rsi::default();
        assert_eq!(rsi.min_periods(), 15);
    }

    #[test]
    fn test_rsi_insufficient_data_is_neutral() {
        let rsi = Rsi::default();
        for len in 0..15 {
            let reading = rsi.compute(&uptrend(len));
            assert_eq!(reading, Reading::InsufficientData { fallback: 50.0 });
            assert_eq!(reading.resolve(), 50.0);
        }
    }

    #[test]
    fn test_rsi_all_gains_is_100() {
        assert_eq!(Rsi::default().compute(&uptrend(15)), Reading::Value(100.0));
    }

    #[test]
    fn test_rsi_all_losses_is_0() {
        assert_eq!(Rsi::default().compute(&downtrend(30)), Reading::Value(0.0));
    }

    #[test]
    fn test_rsi_flat_series_is_100() {
        // No losses at all, so the all-gains convention applies.
        assert_eq!(Rsi::default().compute(&[10.0; 20]), Reading::Value(100.0));
    }

    #[test]
    fn test_rsi_only_uses_last_window() {
        // A big early loss falls outside the last 14 changes.
        let mut closes = vec![500.0, 100.0];
        closes.extend(uptrend(14).iter().map(|c| c + 1.0));
        assert_eq!(Rsi::default().compute(&closes), Reading::Value(100.0));
    }

    #[test]
    fn test_rsi_balanced_moves() {
        // Alternating +1 / -1 gives equal gains and losses.
        let closes: Vec<f64> = (0..15).map(|i| if i % 2 == 0 { 10.0 } else { 11.0 }).collect();
        let value = Rsi::default().compute(&closes).resolve();
        assert!((value - 50.0).abs() < 1e-9, "got {}", value);
    }

    #[test]
    fn test_rsi_value_range() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + ((i * 7) % 11) as f64).collect();
        let value = Rsi::default().compute(&closes).resolve();
        assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn test_rsi_custom_period() {
        let rsi = Rsi::new(7);
        assert_eq!(rsi.min_periods(), 8);
        assert!(rsi.compute(&uptrend(8)).is_sufficient());
    }
}
