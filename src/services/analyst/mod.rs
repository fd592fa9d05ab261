//! Contract Analyst Service
//!
//! LLM-backed implementation of the `ContractAnalyst` collaborator.
//!
//! ## Architecture
//! - `prompts.rs` - Fixed identification and analysis instructions
//! - `schema.rs` - Structured-output schemas for both passes
//! - `llm_analyst.rs` - Provider adapter with strict response parsing

pub mod llm_analyst;
pub mod prompts;
pub mod schema;

pub use llm_analyst::{parse_analysis, parse_parties, LlmContractAnalyst};
