//! Google Gemini Provider
//!
//! Implementation of the LlmProvider trait for the Gemini `generateContent` API.
//! Documents travel as inline data; structured output uses `responseSchema`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::http_client::build_http_client;
use crate::provider::{missing_api_key_error, parse_http_error, LlmProvider};
use crate::types::{
    LlmError, LlmRequestOptions, LlmResponse, LlmResult, Message, MessageContent, MessageRole,
    ParameterSchema, ProviderConfig, StopReason, UsageStats,
};

/// Default Gemini API endpoint
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider
pub struct GeminiProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let client = build_http_client(
            config.proxy.as_ref(),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self { config, client })
    }

    /// Get the API base URL
    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(GEMINI_API_URL)
            .trim_end_matches('/')
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url(), self.config.model)
    }

    fn api_key(&self) -> LlmResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| missing_api_key_error("gemini"))
    }

    /// Build the request body for the API
    fn build_request_body(
        &self,
        messages: &[Message],
        system: Option<&str>,
        request_options: &LlmRequestOptions,
    ) -> serde_json::Value {
        let contents: Vec<serde_json::Value> =
            messages.iter().map(|m| self.message_to_gemini(m)).collect();

        let mut generation_config = serde_json::json!({
            "temperature": self.config.temperature,
            "maxOutputTokens": self.config.max_tokens,
        });

        if let Some(schema) = &request_options.response_schema {
            generation_config["responseMimeType"] = serde_json::json!("application/json");
            generation_config["responseSchema"] = schema_to_gemini(schema);
        }

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": generation_config,
        });

        if let Some(sys) = system {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": sys }]
            });
        }

        body
    }

    /// Convert a Message to Gemini API format
    fn message_to_gemini(&self, message: &Message) -> serde_json::Value {
        let role = match message.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "model",
        };

        let parts: Vec<serde_json::Value> = message
            .content
            .iter()
            .map(|c| match c {
                MessageContent::Text { text } => serde_json::json!({ "text": text }),
                MessageContent::Document {
                    media_type, data, ..
                } => serde_json::json!({
                    "inlineData": {
                        "mimeType": media_type,
                        "data": data
                    }
                }),
            })
            .collect();

        serde_json::json!({
            "role": role,
            "parts": parts
        })
    }

    /// Parse a response from the Gemini API
    fn parse_response(&self, response: &GeminiResponse) -> LlmResult<LlmResponse> {
        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(LlmError::InvalidRequest {
                message: format!("Prompt blocked: {}", reason),
            });
        }

        let candidate = response.candidates.first();

        let content = candidate.and_then(|c| c.content.as_ref()).map(|c| {
            c.parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<String>()
        });

        let stop_reason = candidate
            .and_then(|c| c.finish_reason.as_deref())
            .map(StopReason::from)
            .unwrap_or(StopReason::EndTurn);

        let usage = response
            .usage_metadata
            .as_ref()
            .map(|u| UsageStats {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            stop_reason,
            usage,
            model: response
                .model_version
                .clone()
                .unwrap_or_else(|| self.config.model.clone()),
        })
    }
}

/// Gemini expects OpenAPI-style upper-case type names.
fn schema_to_gemini(schema: &ParameterSchema) -> serde_json::Value {
    let mut value = serde_json::json!({
        "type": schema.schema_type.to_uppercase(),
    });
    if let Some(description) = &schema.description {
        value["description"] = serde_json::json!(description);
    }
    if let Some(properties) = &schema.properties {
        let converted: serde_json::Map<String, serde_json::Value> = properties
            .iter()
            .map(|(name, prop)| (name.clone(), schema_to_gemini(prop)))
            .collect();
        value["properties"] = serde_json::Value::Object(converted);
        // Keep field order stable in the generated JSON
        value["propertyOrdering"] = serde_json::json!(properties.keys().collect::<Vec<_>>());
    }
    if let Some(required) = &schema.required {
        value["required"] = serde_json::json!(required);
    }
    if let Some(items) = &schema.items {
        value["items"] = schema_to_gemini(items);
    }
    if let Some(values) = &schema.enum_values {
        value["format"] = serde_json::json!("enum");
        value["enum"] = serde_json::json!(values);
    }
    value
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        let api_key = self.api_key()?;
        let body = self.build_request_body(&messages, system.as_deref(), &request_options);

        tracing::debug!(model = %self.config.model, "Sending Gemini generateContent request");

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        if status != 200 {
            return Err(parse_http_error(status, &body_text, "gemini"));
        }

        let gemini_response: GeminiResponse =
            serde_json::from_str(&body_text).map_err(|e| LlmError::ParseError {
                message: format!("Failed to parse response: {}", e),
            })?;

        self.parse_response(&gemini_response)
    }

    async fn health_check(&self) -> LlmResult<()> {
        let api_key = self.api_key()?;
        let url = format!("{}/models/{}", self.base_url(), self.config.model);

        let response = self
            .client
            .get(url)
            .header("x-goog-api-key", api_key)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status == 200 {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(parse_http_error(status, &body, "gemini"))
        }
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

// ============================================================================
// Gemini API response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}
