//! OpenAI chat-completions client for headline sentiment.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

use super::{SentimentSource, SourceError};
use crate::types::{SentimentLabel, SentimentResult};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const SYSTEM_PROMPT: &str = "You are a Wall Street equity research analyst. Provide specific, \
data-driven sentiment analysis. Always cite specific headlines, numbers, or events. Never give \
vague or generic assessments. Respond with valid JSON only.";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key. Without one every analysis is neutral.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.4,
            max_tokens: 350,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// JSON object the model is asked to reply with.
#[derive(Debug, Deserialize)]
struct SentimentReply {
    score: f64,
    #[serde(default)]
    label: String,
    #[serde(default)]
    rationale: Option<String>,
}

/// Build the analysis prompt for a symbol's headlines.
fn build_prompt(symbol: &str, headlines: &[String]) -> String {
    let numbered: Vec<String> = headlines
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{}. {}", i + 1, h))
        .collect();

    format!(
        r#"You are an expert financial analyst providing actionable sentiment analysis for {symbol} stock.

NEWS HEADLINES:
{headlines}

ANALYSIS REQUIREMENTS:
1. Focus ONLY on headlines directly related to {symbol}, its products, services, earnings, or market position
2. Ignore generic market news unless it specifically impacts {symbol}
3. Provide specific, actionable insights - not vague observations
4. Reference specific events, numbers, or developments from the headlines
5. If headlines aren't relevant to {symbol}, state this clearly but still assess any indirect implications

Respond with this JSON format:
{{
  "score": <-1.0 to 1.0>,
  "label": "<Bullish|Bearish|Neutral>",
  "rationale": "<2-3 sentences with SPECIFIC details: mention actual news items, earnings figures, product names, or market developments that drive your assessment. Be concrete, not generic.>"
}}

JSON only, no other text."#,
        symbol = symbol,
        headlines = numbered.join("\n")
    )
}

/// Parse the model's reply into a sentiment result.
///
/// Tolerates a fenced code block around the JSON. The score is clamped to
/// [-1, 1] and unknown labels become neutral.
fn parse_reply(content: &str) -> Result<SentimentResult, SourceError> {
    let trimmed = content.trim();
    let json = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let reply: SentimentReply =
        serde_json::from_str(json).map_err(|e| SourceError::Parse(e.to_string()))?;

    if !reply.score.is_finite() {
        return Err(SourceError::Parse(format!("score {} out of range", reply.score)));
    }

    Ok(SentimentResult {
        score: reply.score.clamp(-1.0, 1.0),
        label: SentimentLabel::parse(&reply.label),
        rationale: reply
            .rationale
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| "Analysis completed.".to_string()),
    })
}

/// Sentiment analysis over OpenAI chat completions.
pub struct OpenAiSentimentClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiSentimentClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn complete(&self, api_key: &str, prompt: &str) -> Result<String, SourceError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!("Sending sentiment request to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(format!("Status {}: {}", status, body)));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SourceError::Parse("No response from OpenAI".to_string()))
    }
}

#[async_trait]
impl SentimentSource for OpenAiSentimentClient {
    async fn analyze(&self, symbol: &str, headlines: &[String]) -> SentimentResult {
        if headlines.is_empty() {
            return SentimentResult::neutral("No recent news headlines available for analysis.");
        }

        let Some(api_key) = self.config.api_key.as_deref() else {
            warn!("OpenAI API key not set, skipping sentiment for {}", symbol);
            return SentimentResult::neutral("OpenAI API not configured.");
        };

        let prompt = build_prompt(symbol, headlines);
        match self.complete(api_key, &prompt).await.and_then(|c| parse_reply(&c)) {
            Ok(result) => result,
            Err(e) => {
                error!("Error analyzing sentiment for {}: {}", symbol, e);
                SentimentResult::neutral("Unable to analyze sentiment at this time.")
            }
        }
    }
}
