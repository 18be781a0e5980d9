use crate::config::AnalystConfig;
use crate::error::AnalysisError;
use crate::providers::LlmProvider;
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::{json, Value};

const UNKNOWN_API_ERROR: &str = "An unknown API error occurred.";

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &AnalystConfig) -> Result<Self, AnalysisError> {
        Ok(GeminiProvider::with_base_url(
            config.api_key()?.to_string(),
            config.base_url.clone(),
            config.model.clone(),
        ))
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        GeminiProvider {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    /// Endpoint without the key; it is appended as an encoded query pair
    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

/// Request body asking for a JSON-only answer
pub fn request_body(prompt: &str) -> Value {
    json!({
        "contents": [{
            "parts": [{
                "text": prompt
            }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json"
        }
    })
}

/// Pull `error.message` out of an error body, if there is one
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value["error"]["message"].as_str().map(String::from))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string())
}

/// The generated text at `candidates[0].content.parts[0].text`
fn extract_text(response_body: &Value) -> Option<&str> {
    response_body["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .filter(|text| !text.is_empty())
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        debug!("Sending prompt to Gemini model {}", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("API Error Response ({}): {}", status, body);
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let body = response.text().await?;
        let response_body: Value = serde_json::from_str(&body).map_err(|e| {
            error!("Gemini returned a non-JSON envelope: {}", e);
            AnalysisError::EmptyResponse
        })?;
        debug!("Gemini response: {:?}", response_body);

        extract_text(&response_body)
            .map(String::from)
            .ok_or(AnalysisError::EmptyResponse)
    }
}
