//! Signal engine: technicals plus sentiment to a discrete action.
//!
//! Scoring is additive from zero. Technical factors contribute roughly
//! ±65 points and sentiment up to ±50, so the raw score sits in about
//! [-100, 100] and is mapped onto a 0-100 confidence.

use crate::types::{SentimentResult, SignalAction, SignalResult, Technicals};

/// Points per unit of sentiment score.
const SENTIMENT_WEIGHT: f64 = 50.0;

/// Rationale attached to the placeholder sentiment of a quick signal.
pub const NOT_ANALYZED: &str = "Sentiment not analyzed";

/// Generate a signal from technicals and a sentiment reading.
///
/// Deterministic: the same inputs always give the same result, with
/// rationale in the order RSI, MACD, SMA50, SMA200, cross pattern,
/// sentiment. The SMA20 factor scores but adds no rationale.
pub fn generate_signal(technicals: &Technicals, sentiment: &SentimentResult) -> SignalResult {
    let mut score = 0.0;
    let mut rationale = Vec::new();

    let mut add = |points: f64, reason: Option<&str>| {
        score += points;
        if let Some(reason) = reason {
            rationale.push(reason.to_string());
        }
    };

    // Momentum
    let rsi = technicals.rsi;
    if rsi < 30.0 {
        add(15.0, Some("RSI Oversold (<30)"));
    } else if rsi < 40.0 {
        add(10.0, Some("RSI Approaching Oversold"));
    } else if rsi > 70.0 {
        add(-15.0, Some("RSI Overbought (>70)"));
    } else if rsi > 60.0 {
        add(-5.0, Some("RSI Elevated"));
    }

    if technicals.macd_hist > 0.0 {
        if technicals.macd > technicals.macd_signal {
            add(15.0, Some("MACD Bullish Crossover"));
        } else {
            add(8.0, Some("Positive MACD Momentum"));
        }
    } else if technicals.macd < technicals.macd_signal {
        add(-15.0, Some("MACD Bearish Crossover"));
    } else {
        add(-8.0, Some("Negative MACD Momentum"));
    }

    // Trend
    let price = technicals.price;
    if price > technicals.sma20 {
        add(5.0, None);
    } else {
        add(-5.0, None);
    }

    if price > technicals.sma50 {
        add(7.0, Some("Above 50-day SMA"));
    } else {
        add(-7.0, Some("Below 50-day SMA"));
    }

    if price > technicals.sma200 {
        add(8.0, Some("Above 200-day SMA (Long-term Bullish)"));
    } else {
        add(-8.0, Some("Below 200-day SMA (Long-term Bearish)"));
    }

    if technicals.sma50 > technicals.sma200 && price > technicals.sma50 {
        add(5.0, Some("Golden Cross Pattern"));
    } else if technicals.sma50 < technicals.sma200 && price < technicals.sma50 {
        add(-5.0, Some("Death Cross Pattern"));
    }

    // Sentiment is scored on the number alone; the label is only echoed.
    let sentiment_reason = sentiment_rationale(sentiment);
    add(sentiment.score * SENTIMENT_WEIGHT, Some(sentiment_reason.as_str()));

    let confidence = normalize(score);

    SignalResult {
        action: SignalAction::from_confidence(confidence),
        confidence,
        rationale,
    }
}

/// Generate a signal with placeholder neutral sentiment.
///
/// The rationale still ends with "AI: Neutral Sentiment" even though no
/// analysis ran, so callers should carry that fact alongside the result.
pub fn generate_quick_signal(technicals: &Technicals) -> SignalResult {
    generate_signal(technicals, &SentimentResult::neutral(NOT_ANALYZED))
}

fn sentiment_rationale(sentiment: &SentimentResult) -> String {
    let score = sentiment.score;
    let label = sentiment.label;
    if score > 0.5 {
        format!("AI: Strong Positive Sentiment ({})", label)
    } else if score > 0.2 {
        format!("AI: Positive Sentiment ({})", label)
    } else if score < -0.5 {
        format!("AI: Strong Negative Sentiment ({})", label)
    } else if score < -0.2 {
        format!("AI: Negative Sentiment ({})", label)
    } else {
        "AI: Neutral Sentiment".to_string()
    }
}

/// Map a raw score onto 0-100.
fn normalize(raw: f64) -> u8 {
    let scaled = ((raw + 100.0) / 2.0).clamp(0.0, 100.0);
    // NaN sentiment lands here as NaN; `as` saturates it to 0.
    scaled.round() as u8
}
