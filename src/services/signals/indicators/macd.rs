//! MACD (Moving Average Convergence Divergence) indicator.

use serde::{Deserialize, Serialize};

use super::{Ema, Indicator, Reading};

/// Ratio used by the approximate signal line.
const APPROXIMATE_SIGNAL_RATIO: f64 = 0.9;

/// How the MACD signal line is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MacdSignalMode {
    /// `signal = macd * 0.9`. Matches the values the dashboard has always
    /// shown, but pins the histogram to `0.1 * macd`.
    #[default]
    Approximate,
    /// EMA of the rolling MACD series over the signal period.
    Ema,
}

impl MacdSignalMode {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "approximate" | "approx" => Some(Self::Approximate),
            "ema" | "rolling" => Some(Self::Ema),
            _ => None,
        }
    }
}

/// MACD line, signal line and histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdLines {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    /// Both EMAs had a full window.
    pub macd_sufficient: bool,
    /// Signal line came from a real EMA of the MACD series.
    pub signal_sufficient: bool,
}

/// MACD indicator.
///
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = per [`MacdSignalMode`]
/// - Histogram = MACD Line - Signal Line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    mode: MacdSignalMode,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
            mode: MacdSignalMode::default(),
        }
    }
}

impl Macd {
    pub fn with_mode(mode: MacdSignalMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Calculate all three MACD lines.
    pub fn lines(&self, closes: &[f64]) -> MacdLines {
        let fast = Ema::new(self.fast_period).compute(closes);
        let slow = Ema::new(self.slow_period).compute(closes);
        let macd = fast.resolve() - slow.resolve();
        let macd_sufficient = fast.is_sufficient() && slow.is_sufficient();

        let rolling_signal = match self.mode {
            MacdSignalMode::Approximate => None,
            MacdSignalMode::Ema => self.rolling_signal(closes),
        };

        let (signal, signal_sufficient) = match rolling_signal {
            Some(signal) => (signal, true),
            None => (macd * APPROXIMATE_SIGNAL_RATIO, false),
        };

        MacdLines {
            macd,
            signal,
            histogram: macd - signal,
            macd_sufficient,
            signal_sufficient,
        }
    }

    /// EMA of the MACD series, if there are enough MACD points.
    fn rolling_signal(&self, closes: &[f64]) -> Option<f64> {
        let fast = Ema::series(closes, self.fast_period);
        let slow = Ema::series(closes, self.slow_period);
        if slow.is_empty() {
            return None;
        }

        // Fast EMA starts earlier; align both on the slow EMA's first index.
        let offset = self.slow_period - self.fast_period;
        let macd_series: Vec<f64> = fast
            .iter()
            .skip(offset)
            .zip(slow.iter())
            .map(|(f, s)| f - s)
            .collect();

        Ema::series(&macd_series, self.signal_period).last().copied()
    }
}

impl Indicator for Macd {
    fn min_periods(&self) -> usize {
        match self.mode {
            MacdSignalMode::Approximate => self.slow_period,
            MacdSignalMode::Ema => self.slow_period + self.signal_period - 1,
        }
    }

    /// Reads the MACD line itself.
    fn compute(&self, closes: &[f64]) -> Reading {
        let lines = self.lines(closes);
        if lines.macd_sufficient {
            Reading::Value(lines.macd)
        } else {
            Reading::InsufficientData {
                fallback: lines.macd,
            }
        }
    }
}
