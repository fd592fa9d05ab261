//! Review Pipeline
//!
//! Drives one contract through identification, party selection and analysis.
//!
//! The pipeline is shared by reference. Its state sits behind a mutex that is
//! released before every collaborator call, so `reset` can run while a call is
//! in flight. Each run carries a generation number; a response that comes back
//! for an older generation is dropped without touching the current state.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{error, info, warn};

use contract_risk_core::{
    AnalysisResult, ContractAnalyst, Document, PartySelection, PLACEHOLDER_CANDIDATES,
};

use super::error::PipelineError;
use super::normalizer::normalize;
use super::resolution::resolve_selection;
use super::state::{ReviewSnapshot, ReviewStage, ReviewStatus};

#[derive(Debug, Default)]
struct RunState {
    generation: u64,
    stage: ReviewStage,
}

/// Orchestrates a single review at a time.
pub struct ReviewPipeline {
    analyst: Arc<dyn ContractAnalyst>,
    run: Mutex<RunState>,
    snapshots: watch::Sender<ReviewSnapshot>,
}

impl ReviewPipeline {
    pub fn new(analyst: Arc<dyn ContractAnalyst>) -> Self {
        let (snapshots, _) = watch::channel(ReviewSnapshot::default());
        Self {
            analyst,
            run: Mutex::new(RunState::default()),
            snapshots,
        }
    }

    /// Current state as seen by observers.
    pub fn snapshot(&self) -> ReviewSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn status(&self) -> ReviewStatus {
        self.snapshots.borrow().status
    }

    /// Receive a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<ReviewSnapshot> {
        self.snapshots.subscribe()
    }

    /// Start a new run with `document` and identify its parties.
    ///
    /// Any existing run is discarded first. An empty identification result is
    /// replaced by generic placeholder candidates.
    pub async fn submit_document(&self, document: Document) -> Result<Vec<String>, PipelineError> {
        let generation = {
            let mut run = self.run.lock().await;
            if run.stage.status() != ReviewStatus::Idle {
                info!(from = %run.stage.status(), "Discarding previous review");
                self.reset_locked(&mut run);
            }
            run.generation += 1;
            info!(
                document = document.name(),
                media_type = document.media_type(),
                bytes = document.len(),
                generation = run.generation,
                "Document submitted"
            );
            self.transition(
                &mut run,
                "submit a document",
                ReviewStage::ExtractingParties {
                    document: document.clone(),
                },
            )?;
            run.generation
        };

        let outcome = self.analyst.identify_parties(&document).await;

        let mut run = self.run.lock().await;
        if run.generation != generation {
            warn!(
                analyst = self.analyst.name(),
                stale_generation = generation,
                current_generation = run.generation,
                "Discarding stale party identification response"
            );
            return Err(PipelineError::Superseded);
        }

        match outcome {
            Ok(mut candidates) => {
                if candidates.is_empty() {
                    warn!("No parties identified, offering placeholders");
                    candidates = PLACEHOLDER_CANDIDATES.iter().map(|s| s.to_string()).collect();
                }
                info!(count = candidates.len(), "Parties identified");
                self.transition(
                    &mut run,
                    "finish party identification",
                    ReviewStage::SelectingParty {
                        document,
                        candidates: candidates.clone(),
                    },
                )?;
                Ok(candidates)
            }
            Err(cause) => {
                error!(analyst = self.analyst.name(), error = %cause, "Party identification failed");
                let err = PipelineError::Identification(cause);
                self.transition(
                    &mut run,
                    "fail party identification",
                    ReviewStage::Error {
                        message: err.to_string(),
                    },
                )?;
                Err(err)
            }
        }
    }

    /// Resolve the selection into a party pair and analyze the contract.
    pub async fn confirm_party(
        &self,
        selection: PartySelection,
    ) -> Result<AnalysisResult, PipelineError> {
        let (generation, document, parties) = {
            let mut run = self.run.lock().await;
            let (document, candidates) = match &run.stage {
                ReviewStage::SelectingParty {
                    document,
                    candidates,
                } => (document.clone(), candidates.clone()),
                other => {
                    return Err(PipelineError::InvalidTransition {
                        from: other.status(),
                        action: "confirm a party",
                    })
                }
            };

            let parties = resolve_selection(&candidates, &selection)?;
            info!(
                represented = %parties.represented,
                counter = %parties.counter,
                "Party confirmed"
            );
            self.transition(
                &mut run,
                "confirm a party",
                ReviewStage::Analyzing {
                    document: document.clone(),
                    candidates,
                    parties: parties.clone(),
                },
            )?;
            (run.generation, document, parties)
        };

        let outcome = self.analyst.analyze_contract(&document, &parties).await;

        let mut run = self.run.lock().await;
        if run.generation != generation {
            warn!(
                analyst = self.analyst.name(),
                stale_generation = generation,
                current_generation = run.generation,
                "Discarding stale analysis response"
            );
            return Err(PipelineError::Superseded);
        }

        match outcome {
            Ok(raw) => {
                let result = normalize(raw, &parties.represented);
                info!(
                    indemnity = result.indemnity.len(),
                    liability = result.liability.len(),
                    "Analysis complete"
                );
                let candidates = match &run.stage {
                    ReviewStage::Analyzing { candidates, .. } => candidates.clone(),
                    _ => Vec::new(),
                };
                self.transition(
                    &mut run,
                    "finish analysis",
                    ReviewStage::Results {
                        document,
                        candidates,
                        parties,
                        result: result.clone(),
                    },
                )?;
                Ok(result)
            }
            Err(cause) => {
                error!(analyst = self.analyst.name(), error = %cause, "Contract analysis failed");
                let err = PipelineError::Analysis(cause);
                self.transition(
                    &mut run,
                    "fail analysis",
                    ReviewStage::Error {
                        message: err.to_string(),
                    },
                )?;
                Err(err)
            }
        }
    }

    /// Drop the document, candidates, result and error, and return to `Idle`.
    ///
    /// A collaborator call still in flight is not cancelled; its response is
    /// discarded when it arrives.
    pub async fn reset(&self) {
        let mut run = self.run.lock().await;
        self.reset_locked(&mut run);
    }

    fn reset_locked(&self, run: &mut RunState) {
        run.generation += 1;
        let from = run.stage.status();
        run.stage = ReviewStage::Idle;
        info!(%from, generation = run.generation, "Review reset");
        self.publish(run);
    }

    fn transition(
        &self,
        run: &mut RunState,
        action: &'static str,
        next: ReviewStage,
    ) -> Result<(), PipelineError> {
        let from = run.stage.status();
        let to = next.status();
        if !from.can_transition_to(to) {
            return Err(PipelineError::InvalidTransition { from, action });
        }
        run.stage = next;
        info!(%from, %to, generation = run.generation, "Review state changed");
        self.publish(run);
        Ok(())
    }

    fn publish(&self, run: &RunState) {
        self.snapshots.send_replace(ReviewSnapshot::from(&run.stage));
    }
}
