//! Natural-language water-quality summaries from a generative-language API.
//!
//! Optional: only built when `GEMINI_API_KEY` is configured. The dashboard's
//! trend and status features never depend on it.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::Reading;

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ---

#[derive(Clone)]
pub struct Summarizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

/// Subset of the `generateContent` response we read.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Response body of `POST /api/analyze`.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub summary: String,
    pub timestamp: i64,
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Summarizer {
    pub fn new(client: reqwest::Client, api_key: &str, model: &str) -> Self {
        Summarizer {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: API_BASE_URL.to_string(),
        }
    }

    /// Point the client at another API root, e.g. a regional endpoint or proxy.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Ask the model for a short plain-language summary of `reading`.
    pub async fn summarize(&self, reading: &Reading) -> Result<Summary> {
        // ---
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(reading) }] }]
        });

        tracing::info!("Requesting summary from model {}", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("Summarizer request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("Summarizer API error: {}", response.status()));
        }

        let parsed: GenerateResponse = response.json().await?;
        let summary = extract_text(parsed)
            .ok_or_else(|| anyhow!("Summarizer returned no text candidates"))?;

        Ok(Summary {
            summary,
            timestamp: reading.timestamp,
        })
    }
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "unavailable".to_string(), |v| v.to_string())
}

fn build_prompt(reading: &Reading) -> String {
    // ---
    let time = DateTime::<Utc>::from_timestamp(reading.timestamp, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| reading.timestamp.to_string());

    format!(
        "You are an expert in water quality monitoring. Based on the following sensor data, \
give a **simple and clear summary** (3–5 sentences max) of the water condition.

Sensor Readings:
- pH: {ph}
- Turbidity (NTU): {turbidity}
- TDS (mg/L): {tds}
- Temperature (°C): {temperature}
- Time: {time}

Focus on:
1. Overall water condition (safe or not).
2. Any issues in the values.
3. One suggestion (if needed).

Avoid headings. Just provide a short summary in plain language.
",
        ph = fmt_value(reading.ph),
        turbidity = fmt_value(reading.turbidity),
        tds = fmt_value(reading.tds),
        temperature = fmt_value(reading.temperature),
        time = time,
    )
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Option<String> {
    // ---
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect::<Vec<_>>()
        .join("");

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn sample_reading() -> Reading {
        Reading {
            timestamp: 1_714_568_400,
            ph: Some(7.2),
            temperature: Some(25.5),
            tds: None,
            turbidity: Some(3.0),
        }
    }

    #[test]
    fn test_prompt_contains_readings() {
        // ---
        let prompt = build_prompt(&sample_reading());

        assert!(prompt.contains("- pH: 7.2"));
        assert!(prompt.contains("- Temperature (°C): 25.5"));
        assert!(prompt.contains("- TDS (mg/L): unavailable"));
        assert!(prompt.contains("- Time: 2024-05-01T13:00:00+00:00"));
    }

    #[test]
    fn test_extract_text_joins_parts() {
        // ---
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Water looks safe. " }, { "text": "pH is neutral.\n" }] }
            }]
        }))
        .unwrap();

        assert_eq!(
            extract_text(response).as_deref(),
            Some("Water looks safe. pH is neutral.")
        );
    }

    #[test]
    fn test_extract_text_empty_response() {
        // ---
        let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(extract_text(response).is_none());
    }
}
