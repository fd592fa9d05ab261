//! Clause Records
//!
//! Structured indemnification and limitation-of-liability records.
//!
//! Two shapes exist for each record:
//! - `Raw*` types mirror what the analysis collaborator returns. Every field
//!   except `partyName` may be missing on the wire.
//! - The normalized types carry concrete values only. They are produced by the
//!   result normalizer and are what the presentation layer sees.
//!
//! Unknown keys are ignored when reading raw output; keys that are present with
//! the wrong shape (or an out-of-enum value) fail deserialization.

use serde::{Deserialize, Serialize};

/// Party name used for a clause that binds both parties identically.
pub const MUTUAL_PARTY: &str = "Mutual";

/// What kind of claims an indemnity covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ClaimType {
    #[serde(rename = "Third Party")]
    ThirdParty,
    #[serde(rename = "First Party")]
    FirstParty,
    #[serde(rename = "Third Party and First Party")]
    Both,
    #[default]
    Unknown,
}

impl ClaimType {
    pub const ALL: [ClaimType; 4] = [
        ClaimType::ThirdParty,
        ClaimType::FirstParty,
        ClaimType::Both,
        ClaimType::Unknown,
    ];

    /// Wire representation, identical to the serde name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::ThirdParty => "Third Party",
            ClaimType::FirstParty => "First Party",
            ClaimType::Both => "Third Party and First Party",
            ClaimType::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ClaimType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the contract waives consequential damages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamagesStatus {
    /// A waiver is present.
    #[serde(rename = "PASS")]
    Pass,
    /// No waiver.
    #[serde(rename = "FAIL")]
    Fail,
}

impl DamagesStatus {
    pub const ALL: [DamagesStatus; 2] = [DamagesStatus::Pass, DamagesStatus::Fail];

    pub fn as_str(&self) -> &'static str {
        match self {
            DamagesStatus::Pass => "PASS",
            DamagesStatus::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for DamagesStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Raw collaborator output
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIndemnityRecord {
    pub party_name: String,
    /// Only a missing value is defaulted (to `Unknown`); an unrecognized one fails parsing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_type: Option<ClaimType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removals: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLiabilityRecord {
    pub party_name: String,
    /// Required by the schema; the collaborator must commit to PASS or FAIL.
    pub consequential_damages_status: DamagesStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consequential_damages_exclusions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_exclusions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<String>,
}

/// Analysis output exactly as the collaborator produced it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indemnity: Option<Vec<RawIndemnityRecord>>,
    #[serde(default, alias = "lol", skip_serializing_if = "Option::is_none")]
    pub liability: Option<Vec<RawLiabilityRecord>>,
}

// ============================================================================
// Normalized records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndemnityRecord {
    pub party_name: String,
    pub claim_type: ClaimType,
    pub scope: Vec<String>,
    pub additions: Vec<String>,
    pub removals: Vec<String>,
    pub citations: String,
}

impl IndemnityRecord {
    pub fn is_mutual(&self) -> bool {
        self.party_name == MUTUAL_PARTY
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiabilityRecord {
    pub party_name: String,
    pub consequential_damages_status: DamagesStatus,
    pub consequential_damages_exclusions: Vec<String>,
    pub cap_description: String,
    pub cap_exclusions: Vec<String>,
    pub citations: String,
}

impl LiabilityRecord {
    pub fn is_mutual(&self) -> bool {
        self.party_name == MUTUAL_PARTY
    }
}

/// Normalized, display-ordered analysis for one run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub indemnity: Vec<IndemnityRecord>,
    pub liability: Vec<LiabilityRecord>,
}

impl From<IndemnityRecord> for RawIndemnityRecord {
    fn from(record: IndemnityRecord) -> Self {
        Self {
            party_name: record.party_name,
            claim_type: Some(record.claim_type),
            scope: Some(record.scope),
            additions: Some(record.additions),
            removals: Some(record.removals),
            citations: Some(record.citations),
        }
    }
}

impl From<LiabilityRecord> for RawLiabilityRecord {
    fn from(record: LiabilityRecord) -> Self {
        Self {
            party_name: record.party_name,
            consequential_damages_status: record.consequential_damages_status,
            consequential_damages_exclusions: Some(record.consequential_damages_exclusions),
            cap_description: Some(record.cap_description),
            cap_exclusions: Some(record.cap_exclusions),
            citations: Some(record.citations),
        }
    }
}

/// Lift a normalized result back to the raw shape without losing anything.
impl From<AnalysisResult> for RawAnalysis {
    fn from(result: AnalysisResult) -> Self {
        Self {
            indemnity: Some(result.indemnity.into_iter().map(Into::into).collect()),
            liability: Some(result.liability.into_iter().map(Into::into).collect()),
        }
    }
}
