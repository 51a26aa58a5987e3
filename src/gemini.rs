use crate::models::ProductInput;
use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use serde::Deserialize;
use reqwest::Client;
use tracing::{info, error};

/// Model used for ad image generation.
const GEMINI_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Appended to every concept prompt so the model keeps the product's visual
/// identity and leaves room for later text overlays.
const PRODUCT_FIDELITY_SUFFIX: &str = "IMPORTANT: Keep the central product from the provided image exactly as it is. Do not change its shape, color, or branding labels. Only transform the background and environment to match the style described. Ensure there is some negative space for text overlays.";

/// Shown for a variation whose failure carried no usable message.
pub const GENERIC_FAILURE: &str = "Generation failed";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")] Http(String),
    #[error("API error: status={status} body={body}")] Api { status: u16, body: String },
    #[error("parse error: {0}")] Parse(String),
    #[error("No image was generated in the response parts")] NoImage,
}

/// Boundary around the external image generation call. Injected into the app
/// state so the orchestrator can run against a scripted stand-in under test.
#[async_trait]
pub trait AdImageGenerator: Send + Sync {
    /// Generates one ad rendition of `product` for `prompt`, returning a
    /// self-contained data URL.
    async fn generate_ad(&self, product: &ProductInput, prompt: &str) -> Result<String, GeminiError>;
}

// Helper function to truncate base64 data in JSON for cleaner logging
fn truncate_base64_in_json(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if key == "data" {
                    if let serde_json::Value::String(s) = val {
                        if s.len() > 100 && s.chars().all(|c| c.is_alphanumeric() || c == '+' || c == '/' || c == '=') {
                            *val = serde_json::Value::String(format!("{}...[truncated {} chars]", &s[..50], s.len() - 50));
                        }
                    }
                } else {
                    truncate_base64_in_json(val);
                }
            }
        }
        serde_json::Value::Array(arr) => {
            for val in arr.iter_mut() {
                truncate_base64_in_json(val);
            }
        }
        _ => {}
    }
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        let base_url = std::env::var("GEMINI_API_BASE").unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string());
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    fn build_request_body(product: &ProductInput, prompt: &str) -> serde_json::Value {
        let full_prompt = format!("{} {}", prompt, PRODUCT_FIDELITY_SUFFIX);
        json!({
            "contents": [{
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": product.mime_type,
                            "data": product.raw_base64()
                        }
                    },
                    {"text": full_prompt}
                ]
            }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"],
                "candidateCount": 1,
                "imageConfig": {
                    "aspectRatio": "1:1"
                }
            }
        })
    }

    async fn perform_api_call(&self, product: &ProductInput, prompt: &str) -> Result<String, GeminiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, GEMINI_IMAGE_MODEL, self.api_key
        );

        info!("🔗 Making request to: {}/models/{}:generateContent?key=***", self.base_url, GEMINI_IMAGE_MODEL);

        let request_body = Self::build_request_body(product, prompt);

        let mut logged_body = request_body.clone();
        truncate_base64_in_json(&mut logged_body);
        info!("📤 Request body: {}", serde_json::to_string_pretty(&logged_body).unwrap_or_default());
        let response = self.client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| GeminiError::Http(e.to_string()))?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!("❌ API Error response: {}", error_body);
            return Err(GeminiError::Api { status: status.as_u16(), body: error_body });
        }

        let response_text = response.text().await
            .map_err(|e| GeminiError::Http(e.to_string()))?;

        // Truncate base64 image data for cleaner logging
        let truncated_response = if response_text.len() > 1000 {
            if let Ok(mut json_value) = serde_json::from_str::<serde_json::Value>(&response_text) {
                truncate_base64_in_json(&mut json_value);
                serde_json::to_string_pretty(&json_value).unwrap_or(response_text[..1000].to_string() + "...")
            } else {
                response_text[..1000].to_string() + "..."
            }
        } else {
            response_text.clone()
        };

        info!("📥 Raw Gemini API response: {}", truncated_response);

        let parsed: GeminiResponse = serde_json::from_str(&response_text)
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        extract_first_image(&parsed).ok_or(GeminiError::NoImage)
    }
}

#[async_trait]
impl AdImageGenerator for GeminiClient {
    async fn generate_ad(&self, product: &ProductInput, prompt: &str) -> Result<String, GeminiError> {
        info!("Generating ad image with Gemini API...");
        let result = self.perform_api_call(product, prompt).await;
        match &result {
            Ok(image_data) => {
                let preview = if image_data.len() > 50 {
                    format!("{}...[{} chars total]", &image_data[..50], image_data.len())
                } else {
                    image_data.clone()
                };
                info!("✅ Successfully generated image: {}", preview);
            }
            Err(e) => {
                error!("❌ Failed to generate image: {}", e);
            }
        }
        result
    }
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate { #[serde(default)] content: Content }

#[derive(Debug, Deserialize, Default)]
struct Content { #[serde(default)] parts: Vec<Part> }

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Part {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData
    },
    Text { text: String },
    Other(serde_json::Value)
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
    #[serde(rename = "mimeType")]
    mime_type: String,
}

/// First image-bearing part of the response, re-wrapped as a data URL.
fn extract_first_image(resp: &GeminiResponse) -> Option<String> {
    for c in &resp.candidates {
        for p in &c.content.parts {
            match p {
                Part::Inline { inline_data } => {
                    info!("🎯 Found image data with mime type: {}", inline_data.mime_type);
                    return Some(format!("data:{};base64,{}", inline_data.mime_type, inline_data.data));
                }
                Part::Text { text } => info!("📝 Text part in response: {}", text),
                Part::Other(_) => {}
            }
        }
    }
    info!("⚠️ No inline image data found in response structure");
    None
}
