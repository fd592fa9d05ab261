//! Response Schemas
//!
//! Structured-output schemas for the two analyst passes, built from the
//! clause enumerations so the allowed values cannot drift from the parser.

use std::collections::BTreeMap;

use contract_risk_core::{ClaimType, DamagesStatus};
use contract_risk_llm::ParameterSchema;

fn string_array() -> ParameterSchema {
    ParameterSchema::array(None, ParameterSchema::string(None))
}

fn party_name() -> ParameterSchema {
    ParameterSchema::string(Some("Name of the party or 'Mutual'"))
}

/// `{ "parties": [string] }`
pub fn identification_schema() -> ParameterSchema {
    let mut properties = BTreeMap::new();
    properties.insert("parties".to_string(), string_array());
    ParameterSchema::object(None, properties, vec!["parties".to_string()])
}

fn indemnity_record_schema() -> ParameterSchema {
    let mut properties = BTreeMap::new();
    properties.insert("partyName".to_string(), party_name());
    properties.insert(
        "claimType".to_string(),
        ParameterSchema::string_enum(None, ClaimType::ALL.iter().map(ClaimType::as_str)),
    );
    properties.insert("scope".to_string(), string_array());
    properties.insert("additions".to_string(), string_array());
    properties.insert("removals".to_string(), string_array());
    properties.insert("citations".to_string(), ParameterSchema::string(None));
    ParameterSchema::object(None, properties, vec!["partyName".to_string()])
}

fn liability_record_schema() -> ParameterSchema {
    let mut properties = BTreeMap::new();
    properties.insert("partyName".to_string(), party_name());
    properties.insert(
        "consequentialDamagesStatus".to_string(),
        ParameterSchema::string_enum(None, DamagesStatus::ALL.iter().map(DamagesStatus::as_str)),
    );
    properties.insert("consequentialDamagesExclusions".to_string(), string_array());
    properties.insert("capDescription".to_string(), ParameterSchema::string(None));
    properties.insert("capExclusions".to_string(), string_array());
    properties.insert("citations".to_string(), ParameterSchema::string(None));
    ParameterSchema::object(
        None,
        properties,
        vec![
            "partyName".to_string(),
            "consequentialDamagesStatus".to_string(),
        ],
    )
}

/// `{ "indemnity": [IndemnityRecord], "liability": [LiabilityRecord] }`
pub fn analysis_schema() -> ParameterSchema {
    let mut properties = BTreeMap::new();
    properties.insert(
        "indemnity".to_string(),
        ParameterSchema::array(None, indemnity_record_schema()),
    );
    properties.insert(
        "liability".to_string(),
        ParameterSchema::array(None, liability_record_schema()),
    );
    ParameterSchema::object(
        None,
        properties,
        vec!["indemnity".to_string(), "liability".to_string()],
    )
}
