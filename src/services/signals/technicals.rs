//! Technical snapshot assembly.

use super::indicators::{Indicator, Macd, MacdSignalMode, Rsi, Sma};
use crate::types::{DataSufficiency, Technicals};

/// Compute the technical snapshot for a close series and live price.
///
/// Uses the approximate MACD signal line. Short series never fail; see
/// [`calculate_technicals_with`] for the per-indicator sufficiency report.
pub fn calculate_technicals(closes: &[f64], price: f64) -> Technicals {
    calculate_technicals_with(closes, price, MacdSignalMode::Approximate).0
}

/// Compute the technical snapshot along with which indicators had enough
/// history.
pub fn calculate_technicals_with(
    closes: &[f64],
    price: f64,
    mode: MacdSignalMode,
) -> (Technicals, DataSufficiency) {
    let rsi = Rsi::default().compute(closes);
    let macd = Macd::with_mode(mode).lines(closes);
    let sma20 = Sma::new(20).compute(closes);
    let sma50 = Sma::new(50).compute(closes);
    let sma200 = Sma::new(200).compute(closes);

    let sufficiency = DataSufficiency {
        points: closes.len(),
        rsi: rsi.is_sufficient(),
        macd: macd.macd_sufficient,
        macd_signal: macd.signal_sufficient,
        sma20: sma20.is_sufficient(),
        sma50: sma50.is_sufficient(),
        sma200: sma200.is_sufficient(),
    };

    let technicals = Technicals {
        rsi: rsi.resolve(),
        macd: macd.macd,
        macd_signal: macd.signal,
        macd_hist: macd.histogram,
        sma20: sma20.resolve(),
        sma50: sma50.resolve(),
        sma200: sma200.resolve(),
        price,
    };

    (technicals, sufficiency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_history_degrades_everywhere() {
        let closes = [10.0, 11.0, 12.0, 13.0, 14.0];
        let (t, s) = calculate_technicals_with(&closes, 15.0, MacdSignalMode::Approximate);

        assert_eq!(t.rsi, 50.0);
        assert_eq!(t.sma20, 14.0);
        assert_eq!(t.sma50, 14.0);
        assert_eq!(t.sma200, 14.0);
        assert_eq!(t.macd, 0.0);
        assert_eq!(t.price, 15.0);

        assert_eq!(s.points, 5);
        assert!(!s.rsi && !s.macd && !s.sma20 && !s.sma50 && !s.sma200);
        assert!(!s.is_complete());
    }

    #[test]
    fn test_empty_history() {
        let t = calculate_technicals(&[], 42.0);
        assert_eq!(t.rsi, 50.0);
        assert_eq!(t.sma20, 0.0);
        assert_eq!(t.sma200, 0.0);
        assert_eq!(t.macd, 0.0);
        assert_eq!(t.price, 42.0);
    }

    #[test]
    fn test_long_history_is_sufficient() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + (i % 17) as f64).collect();
        let (t, s) = calculate_technicals_with(&closes, 110.0, MacdSignalMode::Ema);
        assert!(s.is_complete());
        assert!((0.0..=100.0).contains(&t.rsi));
        assert!((t.macd_hist - (t.macd - t.macd_signal)).abs() < 1e-12);
    }

    #[test]
    fn test_approximate_mode_never_marks_signal_sufficient() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + i as f64).collect();
        let (_, s) = calculate_technicals_with(&closes, 350.0, MacdSignalMode::Approximate);
        assert!(s.macd);
        assert!(!s.macd_signal);
        assert!(s.history_complete());
        assert!(!s.is_complete());
    }

    #[test]
    fn test_three_month_window_lacks_sma200() {
        let closes: Vec<f64> = (0..63).map(|i| 50.0 + i as f64 * 0.5).collect();
        let (t, s) = calculate_technicals_with(&closes, 82.0, MacdSignalMode::Approximate);
        assert!(s.sma20 && s.sma50);
        assert!(!s.sma200);
        assert_eq!(t.sma200, *closes.last().unwrap());
    }
}
