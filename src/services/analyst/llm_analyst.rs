//! LLM-Backed Contract Analyst
//!
//! Adapts an `LlmProvider` to the `ContractAnalyst` capability: attaches the
//! document inline, requests schema-constrained JSON, and parses the answer
//! strictly. Anything that does not match the requested shape is a schema
//! violation; nothing is partially consumed.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use contract_risk_core::{CollaboratorError, ContractAnalyst, Document, PartyPair, RawAnalysis};
use contract_risk_llm::{LlmProvider, LlmRequestOptions, LlmResponse, Message, StopReason};

use super::prompts::{build_analysis_system_prompt, build_identification_prompt, ANALYSIS_USER_MESSAGE};
use super::schema::{analysis_schema, identification_schema};

#[derive(Debug, Deserialize)]
struct PartiesResponse {
    parties: Vec<String>,
}

/// `ContractAnalyst` implemented on top of any `LlmProvider`.
pub struct LlmContractAnalyst {
    provider: Arc<dyn LlmProvider>,
    name: String,
}

impl LlmContractAnalyst {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        let name = format!("{}:{}", provider.name(), provider.model());
        Self { provider, name }
    }

    /// Send the document with an instruction and return the raw JSON text.
    async fn request_json(
        &self,
        step: &'static str,
        document: &Document,
        system: Option<String>,
        instruction: String,
        options: LlmRequestOptions,
    ) -> Result<String, CollaboratorError> {
        let message = Message::user_with_document(
            document.name(),
            document.media_type(),
            document.to_base64(),
            instruction,
        );

        let started = Instant::now();
        let response = self
            .provider
            .send_message(vec![message], system, options)
            .await
            .map_err(|e| CollaboratorError::transport(e.to_string()))?;

        debug!(
            step,
            provider = self.provider.name(),
            model = %response.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Collaborator responded"
        );

        extract_text(step, &response)
    }
}

fn extract_text(step: &'static str, response: &LlmResponse) -> Result<String, CollaboratorError> {
    if response.stop_reason == StopReason::MaxTokens {
        warn!(step, "Response hit the token limit; output is likely truncated");
    }
    response
        .text()
        .map(str::to_string)
        .ok_or(CollaboratorError::EmptyResponse)
}

/// Parse the identification answer. Only `{"parties": [string, ...]}` is accepted.
pub fn parse_parties(text: &str) -> Result<Vec<String>, CollaboratorError> {
    let value = parse_object("parties", text)?;
    let parsed: PartiesResponse = serde_json::from_value(value)
        .map_err(|e| CollaboratorError::schema_violation(format!("parties: {}", e)))?;
    Ok(parsed.parties)
}

/// Parse the analysis answer into its raw, not yet normalized form.
pub fn parse_analysis(text: &str) -> Result<RawAnalysis, CollaboratorError> {
    let value = parse_object("analysis", text)?;
    for key in ANALYSIS_RECORD_KEYS {
        if let Some(Value::Array(records)) = value.get(key) {
            if let Some(index) = records.iter().position(|r| !r.is_object()) {
                return Err(CollaboratorError::schema_violation(format!(
                    "analysis: {}[{}] is not an object",
                    key, index
                )));
            }
        }
    }
    serde_json::from_value(value)
        .map_err(|e| CollaboratorError::schema_violation(format!("analysis: {}", e)))
}

/// Keys holding record arrays, including the legacy `lol` alias.
const ANALYSIS_RECORD_KEYS: [&str; 3] = ["indemnity", "liability", "lol"];

/// Decode `text` as JSON and require a top-level object.
///
/// Derived struct deserializers also accept sequences, so the shape is checked
/// on the `Value` before it is mapped onto a type.
fn parse_object(step: &str, text: &str) -> Result<Value, CollaboratorError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| CollaboratorError::schema_violation(format!("{}: {}", step, e)))?;
    if !value.is_object() {
        return Err(CollaboratorError::schema_violation(format!(
            "{}: expected a JSON object at the top level",
            step
        )));
    }
    Ok(value)
}

#[async_trait]
impl ContractAnalyst for LlmContractAnalyst {
    fn name(&self) -> &str {
        &self.name
    }

    async fn identify_parties(&self, document: &Document) -> Result<Vec<String>, CollaboratorError> {
        let options = LlmRequestOptions {
            response_schema: Some(identification_schema()),
            ..Default::default()
        };
        let text = self
            .request_json(
                "identify_parties",
                document,
                None,
                build_identification_prompt(),
                options,
            )
            .await?;
        parse_parties(&text)
    }

    async fn analyze_contract(
        &self,
        document: &Document,
        parties: &PartyPair,
    ) -> Result<RawAnalysis, CollaboratorError> {
        let options = LlmRequestOptions {
            response_schema: Some(analysis_schema()),
            ..Default::default()
        };
        let text = self
            .request_json(
                "analyze_contract",
                document,
                Some(build_analysis_system_prompt(parties)),
                ANALYSIS_USER_MESSAGE.to_string(),
                options,
            )
            .await?;
        parse_analysis(&text)
    }
}
