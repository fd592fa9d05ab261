//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{watch, Semaphore};

use contract_risk::ReviewSnapshot;
use contract_risk_core::{
    ClaimType, CollaboratorError, ContractAnalyst, DamagesStatus, Document, PartyPair,
    RawAnalysis, RawIndemnityRecord, RawLiabilityRecord,
};

pub const ACME: &str = "Acme Inc. ('Provider')";
pub const GLOBEX: &str = "Globex LLC ('Customer')";

pub fn acme_globex() -> Vec<String> {
    vec![ACME.to_string(), GLOBEX.to_string()]
}

pub fn pdf(name: &str) -> Document {
    Document::new(b"%PDF-1.7 master services agreement".to_vec(), "application/pdf", name)
        .expect("Failed to build test document")
}

pub fn indemnity(party: &str, claim_type: ClaimType) -> RawIndemnityRecord {
    RawIndemnityRecord {
        party_name: party.to_string(),
        claim_type: Some(claim_type),
        scope: Some(vec!["Bodily injury".to_string(), "IP infringement".to_string()]),
        additions: Some(vec!["Data breach".to_string()]),
        removals: None,
        citations: Some("Section 9.1".to_string()),
    }
}

pub fn liability(party: &str, status: DamagesStatus) -> RawLiabilityRecord {
    RawLiabilityRecord {
        party_name: party.to_string(),
        consequential_damages_status: status,
        consequential_damages_exclusions: Some(vec!["Confidentiality".to_string()]),
        cap_description: Some("12 months of fees".to_string()),
        cap_exclusions: Some(vec!["Indemnification".to_string()]),
        citations: Some("Section 10".to_string()),
    }
}

/// Wait until observers see `status`, failing the test after a few seconds.
pub async fn wait_for_status(
    rx: &mut watch::Receiver<ReviewSnapshot>,
    status: contract_risk::ReviewStatus,
) {
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| s.status == status))
        .await
        .unwrap_or_else(|_| panic!("Timed out waiting for {:?}", status))
        .expect("Pipeline dropped");
}

// ============================================================================
// Scripted analyst
// ============================================================================

type Scripted<T> = Mutex<VecDeque<Result<T, CollaboratorError>>>;

/// Answers from queues in call order and records every party pair it analyzed for.
///
/// When gated, each call takes its scripted answer immediately but only
/// returns it after the test releases a permit on the gate.
pub struct ScriptedAnalyst {
    parties: Scripted<Vec<String>>,
    analyses: Scripted<RawAnalysis>,
    analyzed_for: Mutex<Vec<PartyPair>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedAnalyst {
    pub fn new() -> Self {
        Self {
            parties: Mutex::new(VecDeque::new()),
            analyses: Mutex::new(VecDeque::new()),
            analyzed_for: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn with_parties(self, response: Result<Vec<String>, CollaboratorError>) -> Self {
        self.parties.lock().unwrap().push_back(response);
        self
    }

    pub fn with_analysis(self, response: Result<RawAnalysis, CollaboratorError>) -> Self {
        self.analyses.lock().unwrap().push_back(response);
        self
    }

    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn analyzed_for(&self) -> Vec<PartyPair> {
        self.analyzed_for.lock().unwrap().clone()
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
    }
}

fn exhausted<T>() -> Result<T, CollaboratorError> {
    Err(CollaboratorError::transport("no scripted response left"))
}

#[async_trait]
impl ContractAnalyst for ScriptedAnalyst {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn identify_parties(&self, _document: &Document) -> Result<Vec<String>, CollaboratorError> {
        let next = self.parties.lock().unwrap().pop_front();
        self.pass_gate().await;
        next.unwrap_or_else(exhausted)
    }

    async fn analyze_contract(
        &self,
        _document: &Document,
        parties: &PartyPair,
    ) -> Result<RawAnalysis, CollaboratorError> {
        self.analyzed_for.lock().unwrap().push(parties.clone());
        let next = self.analyses.lock().unwrap().pop_front();
        self.pass_gate().await;
        next.unwrap_or_else(exhausted)
    }
}
