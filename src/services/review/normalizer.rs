//! Result Normalizer
//!
//! Fills defaults for everything the collaborator left out and puts the
//! represented party's records first. Relative order is otherwise preserved;
//! the order of scope items inside a record is left as the collaborator sent it.

use contract_risk_core::{
    AnalysisResult, IndemnityRecord, LiabilityRecord, RawAnalysis, RawIndemnityRecord,
    RawLiabilityRecord,
};

/// Normalize a raw analysis for display on behalf of `represented`.
pub fn normalize(raw: RawAnalysis, represented: &str) -> AnalysisResult {
    let indemnity: Vec<IndemnityRecord> = raw
        .indemnity
        .unwrap_or_default()
        .into_iter()
        .map(normalize_indemnity)
        .collect();
    let liability: Vec<LiabilityRecord> = raw
        .liability
        .unwrap_or_default()
        .into_iter()
        .map(normalize_liability)
        .collect();

    AnalysisResult {
        indemnity: promote(indemnity, |r| r.party_name == represented),
        liability: promote(liability, |r| r.party_name == represented),
    }
}

fn normalize_indemnity(raw: RawIndemnityRecord) -> IndemnityRecord {
    IndemnityRecord {
        party_name: raw.party_name,
        claim_type: raw.claim_type.unwrap_or_default(),
        scope: raw.scope.unwrap_or_default(),
        additions: raw.additions.unwrap_or_default(),
        removals: raw.removals.unwrap_or_default(),
        citations: raw.citations.unwrap_or_default(),
    }
}

fn normalize_liability(raw: RawLiabilityRecord) -> LiabilityRecord {
    LiabilityRecord {
        party_name: raw.party_name,
        consequential_damages_status: raw.consequential_damages_status,
        consequential_damages_exclusions: raw.consequential_damages_exclusions.unwrap_or_default(),
        cap_description: raw.cap_description.unwrap_or_default(),
        cap_exclusions: raw.cap_exclusions.unwrap_or_default(),
        citations: raw.citations.unwrap_or_default(),
    }
}

/// Stable partition: matching records first, both halves in original order.
fn promote<T>(records: Vec<T>, is_represented: impl Fn(&T) -> bool) -> Vec<T> {
    let (mut front, back): (Vec<T>, Vec<T>) = records.into_iter().partition(|r| is_represented(r));
    front.extend(back);
    front
}
