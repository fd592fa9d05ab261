//! Analyst Prompts
//!
//! Fixed instructions sent alongside the contract document.

use contract_risk_core::{PartyPair, MUTUAL_PARTY};

/// Instruction for the party identification pass.
pub fn build_identification_prompt() -> String {
    r#"Read the attached contract.
Find the full legal names of the two primary contracting parties.
For each party, check whether the preamble or opening paragraph assigns it a defined term or alias such as "Provider", "Customer", "Company" or "Consultant".

Return a JSON object with a "parties" array of strings, each formatted as:
"Full Legal Name ('Defined Term')"

When no defined term is stated, return the full legal name alone.

Example:
{"parties": ["Acme Inc. ('Provider')", "Martian Enterprises LLC ('Company')"]}"#
        .to_string()
}

/// System instruction for the clause analysis pass.
pub fn build_analysis_system_prompt(parties: &PartyPair) -> String {
    format!(
        r#"You are an experienced commercial contracts attorney summarizing agreements for non-lawyer executives such as sales leaders and CEOs.
Be accurate, concise and structured.

Context:
- The user represents: "{represented}"
- The counterparty is: "{counter}"

1. INDEMNIFICATION
   - Check mutuality. When both parties' obligations are substantially identical, return a single record with partyName "{mutual}".
   - Classify the claim type as exactly one of "Third Party", "First Party", "Third Party and First Party" or "Unknown".
   - List the scope items (IP infringement, negligence, data breach, death or bodily injury, ...). Sort scope items alphabetically so the parties can be compared side by side.
   - Suggest market-standard additions and removals that would improve the position of "{represented}".
   - Cite the sections where these terms appear.

2. LIMITATION OF LIABILITY
   - Check mutuality the same way, using partyName "{mutual}" for identical terms.
   - Consequential damages waiver: "PASS" if present, "FAIL" if absent. List any exclusions from the waiver.
   - Liability cap: describe the cap (fixed amount, multiple of fees paid, ...) and list any exclusions from it.
   - Cite the sections where these terms appear.

Return a strict JSON object matching the provided schema."#,
        represented = parties.represented,
        counter = parties.counter,
        mutual = MUTUAL_PARTY,
    )
}

/// User turn accompanying the document in the analysis pass.
pub const ANALYSIS_USER_MESSAGE: &str = "Perform the legal analysis as instructed.";
