use serde::{Deserialize, Serialize};

/// Technical indicator snapshot for a symbol.
///
/// Derived once per (symbol, history window) and never updated in place;
/// new history means a fresh snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technicals {
    /// RSI(14), 0-100.
    pub rsi: f64,
    /// MACD line: EMA(12) - EMA(26).
    pub macd: f64,
    /// MACD signal line.
    pub macd_signal: f64,
    /// MACD histogram: macd - signal.
    pub macd_hist: f64,
    pub sma20: f64,
    pub sma50: f64,
    pub sma200: f64,
    /// Live price the snapshot was taken against.
    pub price: f64,
}

/// Which indicators had enough history to be computed for real.
///
/// A `false` entry means the value in [`Technicals`] is a degraded
/// stand-in (neutral RSI, last close for a moving average, or the
/// approximate MACD signal line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSufficiency {
    /// Number of closing prices the snapshot was computed from.
    pub points: usize,
    pub rsi: bool,
    pub macd: bool,
    pub macd_signal: bool,
    pub sma20: bool,
    pub sma50: bool,
    pub sma200: bool,
}

impl DataSufficiency {
    /// True when every indicator was computed from a full window.
    ///
    /// Includes `macd_signal`, so this is never true for technicals built
    /// with the approximate MACD signal line. Use
    /// [`DataSufficiency::history_complete`] to ask only about history.
    pub fn is_complete(&self) -> bool {
        self.history_complete() && self.macd_signal
    }

    /// True when every history-backed indicator had a full window.
    ///
    /// Ignores the MACD signal line, whose sufficiency also depends on the
    /// configured signal mode.
    pub fn history_complete(&self) -> bool {
        self.rsi && self.macd && self.sma20 && self.sma50 && self.sma200
    }
}

/// Label attached to a sentiment reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SentimentLabel {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl SentimentLabel {
    /// Parse a label case-insensitively. Anything unrecognised is neutral.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "bullish" => Self::Bullish,
            "bearish" => Self::Bearish,
            _ => Self::Neutral,
        }
    }

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a headline sentiment analysis.
///
/// The label is carried as reported; scoring only ever looks at `score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResult {
    /// Sentiment score from -1.0 (bearish) to 1.0 (bullish).
    pub score: f64,
    pub label: SentimentLabel,
    pub rationale: String,
}

impl SentimentResult {
    /// A neutral reading with the given explanation.
    pub fn neutral(rationale: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            rationale: rationale.into(),
        }
    }
}

/// Discrete recommendation produced by the signal engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalAction {
    StrongBuy,
    Accumulate,
    Hold,
    Exit,
}

impl SignalAction {
    /// Map a normalized confidence (0-100) to an action.
    pub fn from_confidence(confidence: u8) -> Self {
        match confidence {
            c if c >= 75 => Self::StrongBuy,
            c if c >= 60 => Self::Accumulate,
            c if c <= 25 => Self::Exit,
            _ => Self::Hold,
        }
    }

    /// Style tokens used to render a badge for this action.
    pub fn color(&self) -> SignalColor {
        match self {
            Self::StrongBuy => SignalColor {
                bg: "bg-green-500/20",
                text: "text-green-400",
                border: "border-green-500/50",
            },
            Self::Accumulate => SignalColor {
                bg: "bg-emerald-500/20",
                text: "text-emerald-400",
                border: "border-emerald-500/50",
            },
            Self::Hold => SignalColor {
                bg: "bg-yellow-500/20",
                text: "text-yellow-400",
                border: "border-yellow-500/50",
            },
            Self::Exit => SignalColor {
                bg: "bg-red-500/20",
                text: "text-red-400",
                border: "border-red-500/50",
            },
        }
    }
}

/// Background, text and border style tokens for a signal badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalColor {
    pub bg: &'static str,
    pub text: &'static str,
    pub border: &'static str,
}

/// Human-facing bucket for a confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryHigh,
    High,
    Moderate,
    Low,
    VeryLow,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: u8) -> Self {
        match confidence {
            c if c >= 80 => Self::VeryHigh,
            c if c >= 65 => Self::High,
            c if c >= 50 => Self::Moderate,
            c if c >= 35 => Self::Low,
            _ => Self::VeryLow,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryHigh => "Very High",
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
            Self::VeryLow => "Very Low",
        }
    }
}

/// Output of the signal engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalResult {
    pub action: SignalAction,
    /// Normalized confidence, 0-100.
    pub confidence: u8,
    /// Contributing factors in evaluation order.
    pub rationale: Vec<String>,
}

impl SignalResult {
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_confidence(self.confidence)
    }
}

/// Signal computed for a symbol, with the inputs that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolSignal {
    pub symbol: String,
    pub price: f64,
    pub change_percent: f64,
    pub technicals: Technicals,
    pub sufficiency: DataSufficiency,
    /// Sentiment used for scoring, if an analysis was available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentResult>,
    /// False when the signal was scored with placeholder neutral sentiment.
    pub sentiment_analyzed: bool,
    pub signal: SignalResult,
    /// Unix timestamp (milliseconds) when computed.
    pub computed_at: i64,
}
