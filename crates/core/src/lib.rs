//! Contract Risk Core
//!
//! Foundational types for the Contract Risk workspace. This crate has zero
//! dependencies on application-level code (HTTP, LLM providers, configuration).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `document` - The uploaded contract as an opaque payload (`Document`)
//! - `party` - Party candidates, selections, and the resolved `PartyPair`
//! - `clauses` - Raw and normalized indemnity / liability records
//! - `analyst` - The `ContractAnalyst` collaborator trait

pub mod analyst;
pub mod clauses;
pub mod document;
pub mod error;
pub mod party;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Document ───────────────────────────────────────────────────────────
pub use document::{Document, DocumentKind, DEFAULT_MEDIA_TYPE};

// ── Parties ────────────────────────────────────────────────────────────
pub use party::{
    PartyCandidate, PartyPair, PartySelection, COUNTERPARTY_PLACEHOLDER, PLACEHOLDER_CANDIDATES,
};

// ── Clause Records ─────────────────────────────────────────────────────
pub use clauses::{
    AnalysisResult, ClaimType, DamagesStatus, IndemnityRecord, LiabilityRecord, RawAnalysis,
    RawIndemnityRecord, RawLiabilityRecord, MUTUAL_PARTY,
};

// ── Collaborator ───────────────────────────────────────────────────────
pub use analyst::{CollaboratorError, ContractAnalyst};
