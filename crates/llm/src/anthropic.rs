//! Anthropic Claude Provider
//!
//! Implementation of the LlmProvider trait for Anthropic's Messages API.
//! Structured output is obtained by forcing a single tool call whose input
//! schema is the requested response schema.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;

use crate::http_client::build_http_client;
use crate::provider::{missing_api_key_error, parse_http_error, LlmProvider};
use crate::types::{
    LlmError, LlmRequestOptions, LlmResponse, LlmResult, Message, MessageContent, MessageRole,
    ProviderConfig, StopReason, UsageStats,
};

/// Default Anthropic API endpoint
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Current API version
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Name of the forced tool carrying structured output
const OUTPUT_TOOL_NAME: &str = "record_output";

/// Anthropic Claude provider
pub struct AnthropicProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with the given configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let client = build_http_client(
            config.proxy.as_ref(),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self { config, client })
    }

    /// Get the API base URL
    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(ANTHROPIC_API_URL)
    }

    fn api_key(&self) -> LlmResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| missing_api_key_error("anthropic"))
    }

    /// Build the request body for the API
    fn build_request_body(
        &self,
        messages: &[Message],
        system: Option<&str>,
        request_options: &LlmRequestOptions,
    ) -> LlmResult<serde_json::Value> {
        let claude_messages = messages
            .iter()
            .map(|m| self.message_to_claude(m))
            .collect::<LlmResult<Vec<_>>>()?;

        let mut body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": claude_messages,
        });

        if let Some(sys) = system {
            body["system"] = serde_json::json!(sys);
        }

        if let Some(schema) = &request_options.response_schema {
            body["tools"] = serde_json::json!([{
                "name": OUTPUT_TOOL_NAME,
                "description": "Record the structured result of the analysis.",
                "input_schema": schema,
            }]);
            body["tool_choice"] = serde_json::json!({
                "type": "tool",
                "name": OUTPUT_TOOL_NAME,
            });
        }

        Ok(body)
    }

    /// Convert a Message to Claude API format
    fn message_to_claude(&self, message: &Message) -> LlmResult<serde_json::Value> {
        let role = match message.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };

        let content = message
            .content
            .iter()
            .map(|c| match c {
                MessageContent::Text { text } => Ok(serde_json::json!({
                    "type": "text",
                    "text": text
                })),
                MessageContent::Document {
                    name,
                    media_type,
                    data,
                } => document_block(name, media_type, data),
            })
            .collect::<LlmResult<Vec<_>>>()?;

        Ok(serde_json::json!({
            "role": role,
            "content": content
        }))
    }

    /// Parse a response from Claude API
    fn parse_response(&self, response: &ClaudeResponse) -> LlmResult<LlmResponse> {
        let mut content = None;

        for block in &response.content {
            match block {
                ContentBlock::Text { text } => {
                    content.get_or_insert_with(String::new).push_str(text);
                }
                ContentBlock::ToolUse { name, input } if name == OUTPUT_TOOL_NAME => {
                    let json = serde_json::to_string(input).map_err(|e| LlmError::ParseError {
                        message: format!("Failed to serialize tool input: {}", e),
                    })?;
                    // Tool output wins over any preamble text
                    content = Some(json);
                    break;
                }
                ContentBlock::ToolUse { .. } | ContentBlock::Other => {}
            }
        }

        let stop_reason = response
            .stop_reason
            .as_deref()
            .map(StopReason::from)
            .unwrap_or(StopReason::EndTurn);

        Ok(LlmResponse {
            content,
            stop_reason,
            usage: UsageStats {
                input_tokens: response.usage.input_tokens,
                output_tokens: response.usage.output_tokens,
            },
            model: response.model.clone(),
        })
    }
}

/// PDFs go through as base64; text formats are decoded into a plain-text source.
fn document_block(name: &str, media_type: &str, data: &str) -> LlmResult<serde_json::Value> {
    match media_type {
        "application/pdf" => Ok(serde_json::json!({
            "type": "document",
            "title": name,
            "source": {
                "type": "base64",
                "media_type": media_type,
                "data": data
            }
        })),
        "text/plain" | "text/markdown" => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(data)
                .map_err(|e| LlmError::InvalidRequest {
                    message: format!("Document {} is not valid base64: {}", name, e),
                })?;
            let text = String::from_utf8(bytes).map_err(|e| LlmError::InvalidRequest {
                message: format!("Document {} is not valid UTF-8: {}", name, e),
            })?;
            Ok(serde_json::json!({
                "type": "document",
                "title": name,
                "source": {
                    "type": "text",
                    "media_type": "text/plain",
                    "data": text
                }
            }))
        }
        other => Err(LlmError::InvalidRequest {
            message: format!("anthropic: unsupported document type {}", other),
        }),
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
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
        let body = self.build_request_body(&messages, system.as_deref(), &request_options)?;

        tracing::debug!(model = %self.config.model, "Sending Anthropic messages request");

        let response = self
            .client
            .post(self.base_url())
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
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
            return Err(parse_http_error(status, &body_text, "anthropic"));
        }

        let claude_response: ClaudeResponse =
            serde_json::from_str(&body_text).map_err(|e| LlmError::ParseError {
                message: format!("Failed to parse response: {}", e),
            })?;

        self.parse_response(&claude_response)
    }

    async fn health_check(&self) -> LlmResult<()> {
        let api_key = self.api_key()?;

        // Make a minimal request to verify the API key
        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": 1,
            "messages": [{"role": "user", "content": "Hi"}]
        });

        let response = self
            .client
            .post(self.base_url())
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
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
            Err(parse_http_error(status, &body, "anthropic"))
        }
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// Claude API response format
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ContentBlock>,
    model: String,
    stop_reason: Option<String>,
    usage: ResponseUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        name: String,
        input: serde_json::Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ResponseUsage {
    input_tokens: u32,
    output_tokens: u32,
}
