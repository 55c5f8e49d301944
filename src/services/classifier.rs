//! Gateway to the external image-understanding service.
//!
//! One call per captured image: the photo goes out as inline data with a
//! fixed instruction, a strict-JSON classification comes back. Any failure
//! on this path is absorbed into [`ClassificationResult::fallback`] so the
//! reporting flow can always continue with manual entry.

use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine as _;
use serde_json::{json, Value as JsonValue};

use crate::config::Config;
use crate::models::{ClassificationResult, WasteCategory, MAX_DESCRIPTION_LEN};

const PROMPT: &str = "Analyze this image of waste/garbage. Identify the category, describe it \
    briefly, estimate severity (1-5 where 5 is dangerous/blocking traffic), estimate weight in \
    kilograms, and provide any safety warnings. Return strictly JSON.";

pub struct Classifier {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl Classifier {
    pub fn new(config: &Config) -> Result<Self> {
        // Bounded timeout: a hung classifier must fall back, not stall the
        // reporting flow.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.classify_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
        })
    }

    /// Best-effort classification of a captured image. Never fails: network
    /// errors, timeouts, and malformed replies all collapse into the
    /// fallback result.
    pub async fn classify(&self, image: &[u8], mime_type: &str) -> ClassificationResult {
        match self.try_classify(image, mime_type).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("image analysis failed, falling back to manual entry: {e:#}");
                ClassificationResult::fallback()
            }
        }
    }

    async fn try_classify(&self, image: &[u8], mime_type: &str) -> Result<ClassificationResult> {
        let api_key = self
            .api_key
            .as_deref()
            .context("GEMINI_API_KEY is not configured")?;
        let body = build_request(image, mime_type);

        let endpoints = [
            format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
                self.model, api_key
            ),
            format!(
                "https://generativelanguage.googleapis.com/v1/models/{}:generateContent?key={}",
                self.model, api_key
            ),
        ];

        for ep in &endpoints {
            let resp = self.client.post(ep).json(&body).send().await?;
            if resp.status().as_u16() == 404 {
                continue;
            }
            if !resp.status().is_success() {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                anyhow::bail!("classifier returned http {}: {}", status, text);
            }
            let v: JsonValue = resp.json().await?;
            let text = extract_reply_text(&v).context("no text in classifier response")?;
            return parse_classification(&text);
        }
        anyhow::bail!("no classifier endpoint accepted model {}", self.model)
    }
}

fn build_request(image: &[u8], mime_type: &str) -> JsonValue {
    let encoded = base64::engine::general_purpose::STANDARD.encode(image);
    json!({
        "generationConfig": {
            "response_mime_type": "application/json",
            "response_schema": {
                "type": "OBJECT",
                "properties": {
                    "category": {
                        "type": "STRING",
                        "enum": ["roadside", "bin-overflow", "plastic", "wet", "construction", "other"]
                    },
                    "description": { "type": "STRING" },
                    "severity": { "type": "INTEGER" },
                    "estimatedWeightKg": { "type": "NUMBER" },
                    "safetyWarning": { "type": "STRING" }
                },
                "required": ["category", "description", "severity", "estimatedWeightKg"]
            }
        },
        "contents": [{
            "role": "user",
            "parts": [
                { "inline_data": { "mime_type": mime_type, "data": encoded } },
                { "text": PROMPT }
            ]
        }]
    })
}

/// Field-wise tolerant parse of the model's JSON reply. Unknown categories
/// land on `other`, severity is clamped into 1-5, over-long text is cut at
/// the description cap.
fn parse_classification(text: &str) -> Result<ClassificationResult> {
    let obj: JsonValue =
        serde_json::from_str(text).context("classifier reply is not valid JSON")?;

    let category = obj
        .get("category")
        .and_then(|v| v.as_str())
        .and_then(WasteCategory::from_label)
        .unwrap_or(WasteCategory::Other);
    let description: String = obj
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .chars()
        .take(MAX_DESCRIPTION_LEN)
        .collect();
    let severity = obj
        .get("severity")
        .and_then(|v| v.as_i64())
        .unwrap_or(1)
        .clamp(1, 5) as u8;
    let estimated_weight_kg = obj
        .get("estimatedWeightKg")
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
        .max(0.0);
    let safety_warning = obj
        .get("safetyWarning")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    Ok(ClassificationResult {
        category,
        description,
        severity,
        estimated_weight_kg,
        safety_warning,
    })
}

fn extract_reply_text(v: &JsonValue) -> Option<String> {
    let candidates = v.get("candidates")?.as_array()?;
    let content = candidates.first()?.get("content")?;
    let parts = content.get("parts")?.as_array()?;
    parts
        .iter()
        .find_map(|p| p.get("text").and_then(|t| t.as_str()).map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_without_key() -> Config {
        Config {
            port: 8080,
            gemini_api_key: None,
            gemini_model: "gemini-2.5-flash".to_string(),
            classify_timeout_secs: 1,
            token_prefix: "TT".to_string(),
            token_region: "IND".to_string(),
        }
    }

    #[test]
    fn test_parse_well_formed_reply() {
        let text = r#"{
            "category": "plastic",
            "description": "A pile of plastic bottles next to a storm drain",
            "severity": 4,
            "estimatedWeightKg": 12.5,
            "safetyWarning": "Drain may clog during rain"
        }"#;
        let result = parse_classification(text).unwrap();
        assert_eq!(result.category, WasteCategory::Plastic);
        assert_eq!(result.severity, 4);
        assert!((result.estimated_weight_kg - 12.5).abs() < f64::EPSILON);
        assert_eq!(result.safety_warning, "Drain may clog during rain");
    }

    #[test]
    fn test_parse_clamps_out_of_range_fields() {
        let text = r#"{
            "category": "radioactive",
            "description": "something",
            "severity": 9,
            "estimatedWeightKg": -3.0
        }"#;
        let result = parse_classification(text).unwrap();
        assert_eq!(result.category, WasteCategory::Other);
        assert_eq!(result.severity, 5);
        assert_eq!(result.estimated_weight_kg, 0.0);
        assert_eq!(result.safety_warning, "");

        let low = parse_classification(r#"{"severity": 0}"#).unwrap();
        assert_eq!(low.severity, 1);
    }

    #[test]
    fn test_parse_truncates_long_description() {
        let text = format!(r#"{{"category": "wet", "description": "{}"}}"#, "a".repeat(500));
        let result = parse_classification(&text).unwrap();
        assert_eq!(result.description.chars().count(), MAX_DESCRIPTION_LEN);
    }

    #[test]
    fn test_parse_rejects_non_json_reply() {
        assert!(parse_classification("sorry, I cannot help with that").is_err());
    }

    #[test]
    fn test_extract_reply_text() {
        let v = json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "{\"category\":\"wet\"}" }]
                }
            }]
        });
        assert_eq!(extract_reply_text(&v).as_deref(), Some("{\"category\":\"wet\"}"));
        assert_eq!(extract_reply_text(&json!({"candidates": []})), None);
    }

    #[test]
    fn test_request_carries_image_and_schema() {
        let body = build_request(b"not-really-a-jpeg", "image/jpeg");
        let part = &body["contents"][0]["parts"][0]["inline_data"];
        assert_eq!(part["mime_type"], "image/jpeg");
        assert_eq!(
            part["data"],
            base64::engine::general_purpose::STANDARD.encode(b"not-really-a-jpeg")
        );
        assert_eq!(
            body["generationConfig"]["response_mime_type"],
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_classify_without_api_key_returns_literal_fallback() {
        let classifier = Classifier::new(&config_without_key()).unwrap();
        let result = classifier.classify(b"image-bytes", "image/jpeg").await;
        assert_eq!(result, ClassificationResult::fallback());
        assert_eq!(result.category, WasteCategory::Other);
        assert_eq!(result.description, "Could not analyze image automatically.");
        assert_eq!(result.severity, 1);
        assert_eq!(result.estimated_weight_kg, 0.0);
        assert_eq!(result.safety_warning, "");
    }
}
