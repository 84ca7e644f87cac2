use std::time::Duration;

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use renova_contracts::errors::truncate_text;
use renova_contracts::prompts::{
    architect_instruction, parse_architect_reply, parse_room_analysis, TRIAGE_INSTRUCTION,
};
use renova_contracts::render::{ArchitectBrief, ArchitectResult, RoomAnalysis, SourceImage};
use reqwest::blocking::{Client as HttpClient, Response as HttpResponse};
use serde_json::{json, Value};

use crate::capabilities::{
    Architect, ContentPart, GenerationResponse, ImageGenerator, VisionAnalyzer,
};
use crate::config::EngineConfig;

/// `generateContent` client serving triage, architect and image generation.
pub struct GeminiClient {
    api_base: String,
    api_key: String,
    image_model: String,
    text_model: String,
    timeout: Duration,
    http: HttpClient,
}

impl GeminiClient {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let Some(api_key) = config.gemini_api_key.clone() else {
            bail!("GEMINI_API_KEY or GOOGLE_API_KEY not set");
        };
        Ok(Self {
            api_base: config.gemini_api_base.clone(),
            api_key,
            image_model: config.image_model.clone(),
            text_model: config.text_model.clone(),
            timeout: config.request_timeout,
            http: HttpClient::new(),
        })
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }

    fn post(&self, model: &str, parts: Vec<Value>, generation_config: Value) -> Result<Value> {
        let endpoint = self.endpoint_for_model(model);
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": parts,
            }],
            "generationConfig": generation_config,
        });
        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .with_context(|| format!("Gemini request failed ({endpoint})"))?;
        response_json_or_error("Gemini", response)
    }

    fn text_reply(&self, image: &SourceImage, instruction: &str) -> Result<String> {
        let payload = self.post(
            &self.text_model,
            vec![image_part(image), json!({ "text": instruction })],
            json!({ "responseMimeType": "application/json" }),
        )?;
        let response = extract_parts(&payload)?;
        Ok(response.first_text().unwrap_or_default().to_string())
    }
}

impl VisionAnalyzer for GeminiClient {
    fn analyze(&self, image: &SourceImage) -> Result<RoomAnalysis> {
        let reply = self
            .text_reply(image, TRIAGE_INSTRUCTION)
            .context("room triage failed")?;
        parse_room_analysis(&reply)
    }
}

impl Architect for GeminiClient {
    fn plan(&self, image: &SourceImage, brief: &ArchitectBrief) -> Result<ArchitectResult> {
        let reply = self
            .text_reply(image, &architect_instruction(brief))
            .context("architect planning failed")?;
        Ok(parse_architect_reply(&reply, brief))
    }
}

impl ImageGenerator for GeminiClient {
    fn generate(
        &self,
        prompt: &str,
        reference: Option<&SourceImage>,
    ) -> Result<GenerationResponse> {
        let mut parts = Vec::new();
        if let Some(image) = reference {
            parts.push(image_part(image));
        }
        parts.push(json!({ "text": prompt }));
        let payload = self.post(
            &self.image_model,
            parts,
            json!({ "responseModalities": ["TEXT", "IMAGE"] }),
        )?;
        extract_parts(&payload)
    }
}

fn image_part(image: &SourceImage) -> Value {
    json!({
        "inlineData": {
            "mimeType": image.mime_type,
            "data": BASE64.encode(&image.bytes),
        }
    })
}

/// Flattens every candidate's parts, decoding inline image payloads.
fn extract_parts(response_payload: &Value) -> Result<GenerationResponse> {
    let Some(candidates) = response_payload.get("candidates").and_then(Value::as_array) else {
        bail!("Gemini response has no candidates");
    };
    let mut out = Vec::new();
    for candidate in candidates {
        let parts = candidate
            .get("content")
            .and_then(|content| content.get("parts"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        for part in parts {
            if let Some(text) = part.get("text").and_then(Value::as_str) {
                out.push(ContentPart::Text(text.to_string()));
                continue;
            }
            let Some(inline) = part
                .get("inlineData")
                .or_else(|| part.get("inline_data"))
                .and_then(Value::as_object)
            else {
                continue;
            };
            let data = inline
                .get("data")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if data.is_empty() {
                continue;
            }
            let bytes = BASE64
                .decode(data.as_bytes())
                .context("Gemini image base64 decode failed")?;
            let mime_type = inline
                .get("mimeType")
                .or_else(|| inline.get("mime_type"))
                .and_then(Value::as_str)
                .unwrap_or("image/png")
                .to_string();
            out.push(ContentPart::InlineImage { mime_type, bytes });
        }
    }
    Ok(GenerationResponse { parts: out })
}

fn response_json_or_error(provider: &str, response: HttpResponse) -> Result<Value> {
    let status = response.status();
    let code = status.as_u16();
    let body = response
        .text()
        .with_context(|| format!("{provider} response body read failed"))?;
    if !status.is_success() {
        bail!(
            "{provider} request failed ({code}): {}",
            truncate_text(&body, 512)
        );
    }
    let parsed: Value = serde_json::from_str(&body)
        .with_context(|| format!("{provider} returned invalid JSON payload"))?;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_parts_decodes_inline_images_and_text() -> anyhow::Result<()> {
        let payload = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Japandi living room" },
                        { "inlineData": { "mimeType": "image/jpeg", "data": BASE64.encode([1u8, 2, 3]) } },
                        { "inline_data": { "data": "" } },
                    ]
                }
            }]
        });
        let response = extract_parts(&payload)?;
        assert_eq!(response.parts.len(), 2);
        assert_eq!(response.first_text(), Some("Japandi living room"));
        assert_eq!(response.first_image(), Some(("image/jpeg", &[1u8, 2, 3][..])));
        Ok(())
    }

    #[test]
    fn extract_parts_without_candidates_is_an_error() {
        assert!(extract_parts(&json!({ "promptFeedback": { "blockReason": "SAFETY" } })).is_err());
    }

    #[test]
    fn candidates_without_images_are_structurally_valid() -> anyhow::Result<()> {
        let response = extract_parts(&json!({ "candidates": [{ "finishReason": "SAFETY" }] }))?;
        assert!(response.first_image().is_none());
        Ok(())
    }

    #[test]
    fn endpoint_accepts_prefixed_models() -> anyhow::Result<()> {
        let mut config = EngineConfig::default();
        config.gemini_api_key = Some("key".to_string());
        config.gemini_api_base = "https://gemini.example/v1beta".to_string();
        let client = GeminiClient::new(&config)?;
        assert_eq!(
            client.endpoint_for_model("gemini-2.5-flash-image"),
            "https://gemini.example/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
        assert_eq!(
            client.endpoint_for_model("models/gemini-2.5-flash"),
            "https://gemini.example/v1beta/models/gemini-2.5-flash:generateContent"
        );
        Ok(())
    }

    #[test]
    fn client_requires_api_key() {
        assert!(GeminiClient::new(&EngineConfig::default()).is_err());
    }
}
