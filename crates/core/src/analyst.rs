//! Contract Analyst Trait
//!
//! The capability the review pipeline depends on: identify the contracting
//! parties, then analyze the contract on behalf of one of them. Concrete model
//! backends live behind this trait so the pipeline can be driven by a scripted
//! analyst in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::clauses::RawAnalysis;
use crate::document::Document;
use crate::party::PartyPair;

/// Failures at the collaborator boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The request never produced a usable response (network, auth, HTTP status).
    #[error("transport error: {0}")]
    Transport(String),

    /// The collaborator answered with nothing.
    #[error("collaborator returned an empty response")]
    EmptyResponse,

    /// The response did not conform to the requested schema.
    #[error("schema violation: {0}")]
    SchemaViolation(String),
}

impl CollaboratorError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn schema_violation(msg: impl Into<String>) -> Self {
        Self::SchemaViolation(msg.into())
    }
}

/// Two-phase contract analysis capability.
#[async_trait]
pub trait ContractAnalyst: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Return the contracting parties as display strings, in document order.
    ///
    /// The list may be empty; the caller decides how to handle that.
    async fn identify_parties(&self, document: &Document) -> Result<Vec<String>, CollaboratorError>;

    /// Analyze indemnification and limitation-of-liability clauses for `parties.represented`.
    async fn analyze_contract(
        &self,
        document: &Document,
        parties: &PartyPair,
    ) -> Result<RawAnalysis, CollaboratorError>;
}
