//! Party Model
//!
//! Candidate parties as returned by identification, the user's "I represent"
//! selection, and the resolved represented/counter pair.

use serde::{Deserialize, Serialize};

/// Counter party name used when no distinct candidate is available.
pub const COUNTERPARTY_PLACEHOLDER: &str = "The Counterparty";

/// Choices offered when identification finds no parties.
pub const PLACEHOLDER_CANDIDATES: [&str; 2] = ["Party A", "Party B"];

/// The represented party and its counterparty for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyPair {
    pub represented: String,
    pub counter: String,
}

impl PartyPair {
    pub fn new(represented: impl Into<String>, counter: impl Into<String>) -> Self {
        Self {
            represented: represented.into(),
            counter: counter.into(),
        }
    }

    /// True when the counter party fell back to the placeholder.
    pub fn has_placeholder_counter(&self) -> bool {
        self.counter == COUNTERPARTY_PLACEHOLDER
    }
}

/// How the user answered "I represent".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PartySelection {
    /// Picked from the identified candidates.
    Candidate(String),
    /// Typed in because the party was not listed.
    Manual(String),
}

impl PartySelection {
    pub fn value(&self) -> &str {
        match self {
            PartySelection::Candidate(v) | PartySelection::Manual(v) => v,
        }
    }
}

/// A candidate display string split into legal name and defined term.
///
/// `"Acme Inc. ('Provider')"` parses to legal name `Acme Inc.` with defined term
/// `Provider`. Anything that does not end in a quoted parenthesised term is
/// treated as a bare legal name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyCandidate {
    pub display: String,
    pub legal_name: String,
    pub defined_term: Option<String>,
}

impl PartyCandidate {
    pub fn parse(display: &str) -> Self {
        let trimmed = display.trim();
        let split = trimmed
            .strip_suffix(')')
            .and_then(|head| head.rfind('(').map(|open| (&head[..open], &head[open + 1..])))
            .and_then(|(name, term)| {
                let term = term.trim();
                let unquoted = strip_quotes(term)?;
                let name = name.trim();
                if name.is_empty() || unquoted.is_empty() {
                    None
                } else {
                    Some((name, unquoted))
                }
            });

        match split {
            Some((legal_name, term)) => Self {
                display: display.to_string(),
                legal_name: legal_name.to_string(),
                defined_term: Some(term.to_string()),
            },
            None => Self {
                display: display.to_string(),
                legal_name: trimmed.to_string(),
                defined_term: None,
            },
        }
    }
}

fn strip_quotes(term: &str) -> Option<&str> {
    const QUOTES: [(char, char); 4] = [('\'', '\''), ('"', '"'), ('\u{2018}', '\u{2019}'), ('\u{201C}', '\u{201D}')];
    QUOTES.iter().find_map(|(open, close)| {
        term.strip_prefix(*open)
            .and_then(|rest| rest.strip_suffix(*close))
            .map(str::trim)
    })
}
