//! Party Resolution
//!
//! Turns the "I represent" answer into a represented/counter pair.
//!
//! The counterparty is simply the first candidate that differs from the
//! represented party. With more than two parties this picks an arbitrary one
//! of the others; contracts of that shape are not handled specially.

use contract_risk_core::{PartyPair, PartySelection, COUNTERPARTY_PLACEHOLDER};

use super::error::PipelineError;

/// Derive the pair for `represented` from the candidate list.
///
/// Matching is exact string equality, in candidate order.
pub fn resolve_party_pair(candidates: &[String], represented: &str) -> PartyPair {
    let counter = candidates
        .iter()
        .find(|candidate| candidate.as_str() != represented)
        .map(String::as_str)
        .unwrap_or(COUNTERPARTY_PLACEHOLDER);
    PartyPair::new(represented, counter)
}

/// Validate a selection against the offered candidates and resolve it.
pub fn resolve_selection(
    candidates: &[String],
    selection: &PartySelection,
) -> Result<PartyPair, PipelineError> {
    let represented = match selection {
        PartySelection::Candidate(value) => {
            if !candidates.iter().any(|c| c == value) {
                return Err(PipelineError::invalid_selection(format!(
                    "'{}' is not one of the identified parties",
                    value
                )));
            }
            value.as_str()
        }
        PartySelection::Manual(value) => value.trim(),
    };

    if represented.trim().is_empty() {
        return Err(PipelineError::invalid_selection("no party selected"));
    }

    Ok(resolve_party_pair(candidates, represented))
}
