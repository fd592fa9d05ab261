//! Review Pipeline Integration Tests
//!
//! Drives `ReviewPipeline` through its public API with a scripted analyst:
//! - Linear progression Idle -> ExtractingParties -> SelectingParty -> Analyzing -> Results
//! - Placeholder candidates and counterparty fallback
//! - Represented-party-first ordering and default filling
//! - Failures that never leave partial results behind
//! - Reset and resubmission while a collaborator call is in flight

use std::sync::Arc;

use contract_risk::services::review::{
    normalize, ANALYSIS_FAILED_MESSAGE, IDENTIFICATION_FAILED_MESSAGE,
};
use contract_risk::{PipelineError, ReviewPipeline, ReviewStatus};
use contract_risk_core::{
    ClaimType, CollaboratorError, DamagesStatus, PartyPair, PartySelection, RawAnalysis,
    RawIndemnityRecord, RawLiabilityRecord, COUNTERPARTY_PLACEHOLDER, MUTUAL_PARTY,
};

use crate::support::{
    acme_globex, indemnity, liability, pdf, wait_for_status, ScriptedAnalyst, ACME, GLOBEX,
};

fn pipeline_with(analyst: ScriptedAnalyst) -> (Arc<ReviewPipeline>, Arc<ScriptedAnalyst>) {
    let analyst = Arc::new(analyst);
    let pipeline = Arc::new(ReviewPipeline::new(analyst.clone()));
    (pipeline, analyst)
}

fn mutual_analysis() -> RawAnalysis {
    RawAnalysis {
        indemnity: Some(vec![indemnity(MUTUAL_PARTY, ClaimType::ThirdParty)]),
        liability: Some(vec![liability(MUTUAL_PARTY, DamagesStatus::Pass)]),
    }
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_statuses_advance_one_step_at_a_time() {
    let (analyst, gate) = ScriptedAnalyst::new()
        .with_parties(Ok(acme_globex()))
        .with_analysis(Ok(mutual_analysis()))
        .gated();
    let (pipeline, _) = pipeline_with(analyst);
    let mut rx = pipeline.subscribe();
    assert_eq!(pipeline.status(), ReviewStatus::Idle);

    let submit = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.submit_document(pdf("msa.pdf")).await }
    });
    wait_for_status(&mut rx, ReviewStatus::ExtractingParties).await;
    let snapshot = pipeline.snapshot();
    assert_eq!(snapshot.document_name.as_deref(), Some("msa.pdf"));
    assert!(snapshot.candidates.is_empty());
    assert!(snapshot.result.is_none());

    gate.add_permits(1);
    let candidates = submit.await.unwrap().unwrap();
    assert_eq!(candidates, acme_globex());
    assert_eq!(pipeline.status(), ReviewStatus::SelectingParty);
    assert_eq!(pipeline.snapshot().candidates, acme_globex());

    let confirm = tokio::spawn({
        let pipeline = pipeline.clone();
        async move {
            pipeline
                .confirm_party(PartySelection::Candidate(ACME.to_string()))
                .await
        }
    });
    wait_for_status(&mut rx, ReviewStatus::Analyzing).await;
    assert_eq!(
        pipeline.snapshot().parties,
        Some(PartyPair::new(ACME, GLOBEX))
    );
    assert!(pipeline.snapshot().result.is_none());

    // A second confirmation is not an edge out of Analyzing.
    let err = pipeline
        .confirm_party(PartySelection::Candidate(GLOBEX.to_string()))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        PipelineError::InvalidTransition {
            from: ReviewStatus::Analyzing,
            action: "confirm a party",
        }
    );

    gate.add_permits(1);
    let result = confirm.await.unwrap().unwrap();
    assert_eq!(pipeline.status(), ReviewStatus::Results);
    assert_eq!(pipeline.snapshot().result, Some(result));
}

#[tokio::test]
async fn test_acme_globex_mutual_scenario() {
    let raw = RawAnalysis {
        indemnity: Some(vec![indemnity(MUTUAL_PARTY, ClaimType::ThirdParty)]),
        liability: Some(vec![RawLiabilityRecord {
            party_name: MUTUAL_PARTY.to_string(),
            consequential_damages_status: DamagesStatus::Fail,
            consequential_damages_exclusions: None,
            cap_description: Some("Fees paid in the prior 12 months".to_string()),
            cap_exclusions: None,
            citations: Some("Section 11.2".to_string()),
        }]),
    };
    let (pipeline, analyst) = pipeline_with(
        ScriptedAnalyst::new()
            .with_parties(Ok(acme_globex()))
            .with_analysis(Ok(raw)),
    );

    let candidates = pipeline.submit_document(pdf("msa.pdf")).await.unwrap();
    assert_eq!(candidates, acme_globex());

    let result = pipeline
        .confirm_party(PartySelection::Candidate(ACME.to_string()))
        .await
        .unwrap();

    assert_eq!(analyst.analyzed_for(), vec![PartyPair::new(ACME, GLOBEX)]);
    assert_eq!(result.indemnity.len(), 1);
    assert!(result.indemnity[0].is_mutual());
    assert_eq!(result.liability.len(), 1);
    let lol = &result.liability[0];
    assert_eq!(lol.party_name, MUTUAL_PARTY);
    assert_eq!(lol.consequential_damages_status, DamagesStatus::Fail);
    assert!(lol.cap_exclusions.is_empty());
    assert!(lol.consequential_damages_exclusions.is_empty());
    assert_eq!(pipeline.status(), ReviewStatus::Results);
}

// ============================================================================
// Party resolution
// ============================================================================

#[tokio::test]
async fn test_empty_identification_offers_placeholders() {
    let (pipeline, analyst) = pipeline_with(
        ScriptedAnalyst::new()
            .with_parties(Ok(Vec::new()))
            .with_analysis(Ok(RawAnalysis::default())),
    );

    let candidates = pipeline.submit_document(pdf("scan.pdf")).await.unwrap();
    assert_eq!(candidates, vec!["Party A".to_string(), "Party B".to_string()]);
    assert_eq!(pipeline.snapshot().candidates, candidates);

    pipeline
        .confirm_party(PartySelection::Candidate("Party B".to_string()))
        .await
        .unwrap();
    assert_eq!(
        analyst.analyzed_for(),
        vec![PartyPair::new("Party B", "Party A")]
    );
}

#[tokio::test]
async fn test_manual_party_is_paired_with_first_candidate() {
    let (pipeline, analyst) = pipeline_with(
        ScriptedAnalyst::new()
            .with_parties(Ok(acme_globex()))
            .with_analysis(Ok(RawAnalysis::default())),
    );
    pipeline.submit_document(pdf("msa.pdf")).await.unwrap();

    pipeline
        .confirm_party(PartySelection::Manual("  Initech Corp.  ".to_string()))
        .await
        .unwrap();

    assert_eq!(
        analyst.analyzed_for(),
        vec![PartyPair::new("Initech Corp.", ACME)]
    );
}

#[tokio::test]
async fn test_single_candidate_gets_placeholder_counterparty() {
    let (pipeline, analyst) = pipeline_with(
        ScriptedAnalyst::new()
            .with_parties(Ok(vec![ACME.to_string()]))
            .with_analysis(Ok(RawAnalysis::default())),
    );
    pipeline.submit_document(pdf("msa.pdf")).await.unwrap();

    pipeline
        .confirm_party(PartySelection::Candidate(ACME.to_string()))
        .await
        .unwrap();

    let pairs = analyst.analyzed_for();
    assert_eq!(pairs, vec![PartyPair::new(ACME, COUNTERPARTY_PLACEHOLDER)]);
    assert!(pairs[0].has_placeholder_counter());
}

#[tokio::test]
async fn test_unlisted_candidate_is_rejected_without_leaving_selection() {
    let (pipeline, analyst) = pipeline_with(ScriptedAnalyst::new().with_parties(Ok(acme_globex())));
    pipeline.submit_document(pdf("msa.pdf")).await.unwrap();

    let err = pipeline
        .confirm_party(PartySelection::Candidate("Initech".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::InvalidSelection(_)));
    assert_eq!(pipeline.status(), ReviewStatus::SelectingParty);
    assert!(analyst.analyzed_for().is_empty());
}

// ============================================================================
// Normalization
// ============================================================================

#[tokio::test]
async fn test_represented_party_records_come_first_in_stable_order() {
    let raw = RawAnalysis {
        indemnity: Some(vec![
            indemnity(ACME, ClaimType::ThirdParty),
            indemnity(GLOBEX, ClaimType::FirstParty),
            indemnity(MUTUAL_PARTY, ClaimType::Both),
            indemnity(GLOBEX, ClaimType::ThirdParty),
        ]),
        liability: Some(vec![
            liability(MUTUAL_PARTY, DamagesStatus::Pass),
            liability(GLOBEX, DamagesStatus::Fail),
        ]),
    };
    let (pipeline, _) = pipeline_with(
        ScriptedAnalyst::new()
            .with_parties(Ok(acme_globex()))
            .with_analysis(Ok(raw)),
    );
    pipeline.submit_document(pdf("msa.pdf")).await.unwrap();

    let result = pipeline
        .confirm_party(PartySelection::Candidate(GLOBEX.to_string()))
        .await
        .unwrap();

    let order: Vec<(&str, ClaimType)> = result
        .indemnity
        .iter()
        .map(|r| (r.party_name.as_str(), r.claim_type))
        .collect();
    assert_eq!(
        order,
        vec![
            (GLOBEX, ClaimType::FirstParty),
            (GLOBEX, ClaimType::ThirdParty),
            (ACME, ClaimType::ThirdParty),
            (MUTUAL_PARTY, ClaimType::Both),
        ]
    );
    let liability_order: Vec<&str> = result
        .liability
        .iter()
        .map(|r| r.party_name.as_str())
        .collect();
    assert_eq!(liability_order, vec![GLOBEX, MUTUAL_PARTY]);

    // Normalizing the normalized output again changes nothing.
    assert_eq!(normalize(RawAnalysis::from(result.clone()), GLOBEX), result);
}

#[tokio::test]
async fn test_missing_fields_are_filled_with_defaults() {
    let raw = RawAnalysis {
        indemnity: Some(vec![RawIndemnityRecord {
            party_name: ACME.to_string(),
            claim_type: None,
            scope: None,
            additions: None,
            removals: None,
            citations: None,
        }]),
        liability: None,
    };
    let (pipeline, _) = pipeline_with(
        ScriptedAnalyst::new()
            .with_parties(Ok(acme_globex()))
            .with_analysis(Ok(raw)),
    );
    pipeline.submit_document(pdf("msa.pdf")).await.unwrap();

    let result = pipeline
        .confirm_party(PartySelection::Candidate(ACME.to_string()))
        .await
        .unwrap();

    let record = &result.indemnity[0];
    assert_eq!(record.claim_type, ClaimType::Unknown);
    assert!(record.scope.is_empty());
    assert!(record.additions.is_empty());
    assert!(record.removals.is_empty());
    assert_eq!(record.citations, "");
    assert!(result.liability.is_empty());
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_identification_failure_shows_fixed_message() {
    let (pipeline, _) = pipeline_with(ScriptedAnalyst::new().with_parties(Err(
        CollaboratorError::schema_violation("expected an object"),
    )));

    let err = pipeline.submit_document(pdf("blurry.pdf")).await.unwrap_err();

    assert_eq!(err.to_string(), IDENTIFICATION_FAILED_MESSAGE);
    assert_eq!(
        err.cause(),
        Some(&CollaboratorError::schema_violation("expected an object"))
    );
    let snapshot = pipeline.snapshot();
    assert_eq!(snapshot.status, ReviewStatus::Error);
    assert_eq!(snapshot.error.as_deref(), Some(IDENTIFICATION_FAILED_MESSAGE));
    assert!(snapshot.candidates.is_empty());
}

#[tokio::test]
async fn test_analysis_failure_never_exposes_partial_results() {
    let (pipeline, _) = pipeline_with(
        ScriptedAnalyst::new()
            .with_parties(Ok(acme_globex()))
            .with_analysis(Err(CollaboratorError::EmptyResponse)),
    );
    let mut rx = pipeline.subscribe();
    pipeline.submit_document(pdf("msa.pdf")).await.unwrap();

    let err = pipeline
        .confirm_party(PartySelection::Candidate(ACME.to_string()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Analysis(CollaboratorError::EmptyResponse)
    ));
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.status, ReviewStatus::Error);
    assert_eq!(snapshot.error.as_deref(), Some(ANALYSIS_FAILED_MESSAGE));
    assert!(snapshot.result.is_none());
    assert!(snapshot.parties.is_none());
}

#[tokio::test]
async fn test_confirm_from_idle_is_rejected() {
    let (pipeline, analyst) = pipeline_with(ScriptedAnalyst::new());

    let err = pipeline
        .confirm_party(PartySelection::Candidate(ACME.to_string()))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        PipelineError::InvalidTransition {
            from: ReviewStatus::Idle,
            action: "confirm a party",
        }
    );
    assert_eq!(pipeline.status(), ReviewStatus::Idle);
    assert!(analyst.analyzed_for().is_empty());
}

#[tokio::test]
async fn test_reset_after_error_allows_a_new_run() {
    let (pipeline, _) = pipeline_with(
        ScriptedAnalyst::new()
            .with_parties(Err(CollaboratorError::transport("503 Service Unavailable")))
            .with_parties(Ok(acme_globex())),
    );
    assert!(pipeline.submit_document(pdf("msa.pdf")).await.is_err());
    assert_eq!(pipeline.status(), ReviewStatus::Error);

    pipeline.reset().await;
    let snapshot = pipeline.snapshot();
    assert_eq!(snapshot.status, ReviewStatus::Idle);
    assert!(snapshot.error.is_none());
    assert!(snapshot.document_name.is_none());

    let candidates = pipeline.submit_document(pdf("msa.pdf")).await.unwrap();
    assert_eq!(candidates, acme_globex());
}

// ============================================================================
// Reset and resubmission
// ============================================================================

#[tokio::test]
async fn test_identification_response_after_reset_is_discarded() {
    let (analyst, gate) = ScriptedAnalyst::new()
        .with_parties(Ok(acme_globex()))
        .gated();
    let (pipeline, _) = pipeline_with(analyst);
    let mut rx = pipeline.subscribe();

    let submit = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.submit_document(pdf("msa.pdf")).await }
    });
    wait_for_status(&mut rx, ReviewStatus::ExtractingParties).await;

    pipeline.reset().await;
    assert_eq!(pipeline.status(), ReviewStatus::Idle);

    gate.add_permits(1);
    let outcome = submit.await.unwrap();

    assert_eq!(outcome, Err(PipelineError::Superseded));
    let snapshot = pipeline.snapshot();
    assert_eq!(snapshot.status, ReviewStatus::Idle);
    assert!(snapshot.candidates.is_empty());
    assert!(snapshot.document_name.is_none());
}

#[tokio::test]
async fn test_analysis_response_after_reset_is_discarded() {
    let (analyst, gate) = ScriptedAnalyst::new()
        .with_parties(Ok(acme_globex()))
        .with_analysis(Ok(mutual_analysis()))
        .gated();
    let (pipeline, _) = pipeline_with(analyst);
    let mut rx = pipeline.subscribe();

    gate.add_permits(1);
    pipeline.submit_document(pdf("msa.pdf")).await.unwrap();

    let confirm = tokio::spawn({
        let pipeline = pipeline.clone();
        async move {
            pipeline
                .confirm_party(PartySelection::Candidate(ACME.to_string()))
                .await
        }
    });
    wait_for_status(&mut rx, ReviewStatus::Analyzing).await;

    pipeline.reset().await;
    gate.add_permits(1);

    assert_eq!(confirm.await.unwrap(), Err(PipelineError::Superseded));
    let snapshot = pipeline.snapshot();
    assert_eq!(snapshot.status, ReviewStatus::Idle);
    assert!(snapshot.result.is_none());
}

#[tokio::test]
async fn test_newer_submission_wins_over_one_in_flight() {
    let (analyst, gate) = ScriptedAnalyst::new()
        .with_parties(Ok(vec!["Old Co.".to_string(), "Stale LLC".to_string()]))
        .with_parties(Ok(acme_globex()))
        .gated();
    let (pipeline, _) = pipeline_with(analyst);
    let mut rx = pipeline.subscribe();

    let first = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.submit_document(pdf("draft.pdf")).await }
    });
    wait_for_status(&mut rx, ReviewStatus::ExtractingParties).await;

    let second = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.submit_document(pdf("final.pdf")).await }
    });
    tokio::time::timeout(
        std::time::Duration::from_secs(5),
        rx.wait_for(|s| s.document_name.as_deref() == Some("final.pdf")),
    )
    .await
    .expect("second submission never started")
    .expect("pipeline dropped");

    gate.add_permits(2);

    assert_eq!(first.await.unwrap(), Err(PipelineError::Superseded));
    assert_eq!(second.await.unwrap(), Ok(acme_globex()));
    let snapshot = pipeline.snapshot();
    assert_eq!(snapshot.status, ReviewStatus::SelectingParty);
    assert_eq!(snapshot.document_name.as_deref(), Some("final.pdf"));
    assert_eq!(snapshot.candidates, acme_globex());
}

#[tokio::test]
async fn test_submit_from_results_starts_over() {
    let (pipeline, _) = pipeline_with(
        ScriptedAnalyst::new()
            .with_parties(Ok(acme_globex()))
            .with_analysis(Ok(mutual_analysis()))
            .with_parties(Ok(vec!["Initech".to_string(), "Umbrella".to_string()])),
    );
    pipeline.submit_document(pdf("msa.pdf")).await.unwrap();
    pipeline
        .confirm_party(PartySelection::Candidate(ACME.to_string()))
        .await
        .unwrap();
    assert_eq!(pipeline.status(), ReviewStatus::Results);

    let candidates = pipeline.submit_document(pdf("nda.pdf")).await.unwrap();

    assert_eq!(candidates, vec!["Initech".to_string(), "Umbrella".to_string()]);
    let snapshot = pipeline.snapshot();
    assert_eq!(snapshot.status, ReviewStatus::SelectingParty);
    assert_eq!(snapshot.document_name.as_deref(), Some("nda.pdf"));
    assert!(snapshot.result.is_none());
    assert!(snapshot.parties.is_none());
}
