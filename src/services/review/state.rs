//! Review State Types
//!
//! The pipeline's finite states, the legal transitions between them, and the
//! read-only snapshot published to observers.

use contract_risk_core::{AnalysisResult, Document, PartyPair};
use serde::{Deserialize, Serialize};

// ============================================================================
// Status
// ============================================================================

/// Data-free mirror of `ReviewStage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Idle,
    ExtractingParties,
    SelectingParty,
    Analyzing,
    Results,
    Error,
}

impl ReviewStatus {
    /// Whether `self -> next` is an edge of the review state machine.
    ///
    /// Reset to `Idle` is legal from every state.
    pub fn can_transition_to(&self, next: ReviewStatus) -> bool {
        use ReviewStatus::*;
        matches!(
            (self, next),
            (_, Idle)
                | (Idle, ExtractingParties)
                | (ExtractingParties, SelectingParty)
                | (ExtractingParties, Error)
                | (SelectingParty, Analyzing)
                | (Analyzing, Results)
                | (Analyzing, Error)
        )
    }

    /// True while an external call is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, ReviewStatus::ExtractingParties | ReviewStatus::Analyzing)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReviewStatus::Idle => "idle",
            ReviewStatus::ExtractingParties => "extracting parties",
            ReviewStatus::SelectingParty => "selecting party",
            ReviewStatus::Analyzing => "analyzing",
            ReviewStatus::Results => "showing results",
            ReviewStatus::Error => "in error",
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Stage
// ============================================================================

/// Pipeline state together with the data that state owns.
#[derive(Debug, Clone, Default)]
pub enum ReviewStage {
    #[default]
    Idle,
    ExtractingParties {
        document: Document,
    },
    SelectingParty {
        document: Document,
        candidates: Vec<String>,
    },
    Analyzing {
        document: Document,
        candidates: Vec<String>,
        parties: PartyPair,
    },
    Results {
        document: Document,
        candidates: Vec<String>,
        parties: PartyPair,
        result: AnalysisResult,
    },
    Error {
        message: String,
    },
}

impl ReviewStage {
    pub fn status(&self) -> ReviewStatus {
        match self {
            ReviewStage::Idle => ReviewStatus::Idle,
            ReviewStage::ExtractingParties { .. } => ReviewStatus::ExtractingParties,
            ReviewStage::SelectingParty { .. } => ReviewStatus::SelectingParty,
            ReviewStage::Analyzing { .. } => ReviewStatus::Analyzing,
            ReviewStage::Results { .. } => ReviewStatus::Results,
            ReviewStage::Error { .. } => ReviewStatus::Error,
        }
    }

    fn document(&self) -> Option<&Document> {
        match self {
            ReviewStage::ExtractingParties { document }
            | ReviewStage::SelectingParty { document, .. }
            | ReviewStage::Analyzing { document, .. }
            | ReviewStage::Results { document, .. } => Some(document),
            ReviewStage::Idle | ReviewStage::Error { .. } => None,
        }
    }

    fn candidates(&self) -> &[String] {
        match self {
            ReviewStage::SelectingParty { candidates, .. }
            | ReviewStage::Analyzing { candidates, .. }
            | ReviewStage::Results { candidates, .. } => candidates,
            _ => &[],
        }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// What an observer sees of the current run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSnapshot {
    pub status: ReviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
    pub candidates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parties: Option<PartyPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for ReviewSnapshot {
    fn default() -> Self {
        Self::from(&ReviewStage::Idle)
    }
}

impl From<&ReviewStage> for ReviewSnapshot {
    fn from(stage: &ReviewStage) -> Self {
        let parties = match stage {
            ReviewStage::Analyzing { parties, .. } | ReviewStage::Results { parties, .. } => {
                Some(parties.clone())
            }
            _ => None,
        };
        let result = match stage {
            ReviewStage::Results { result, .. } => Some(result.clone()),
            _ => None,
        };
        let error = match stage {
            ReviewStage::Error { message } => Some(message.clone()),
            _ => None,
        };

        Self {
            status: stage.status(),
            document_name: stage.document().map(|d| d.name().to_string()),
            candidates: stage.candidates().to_vec(),
            parties,
            result,
            error,
        }
    }
}
