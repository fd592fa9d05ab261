//! Contract Review Service
//!
//! The two-phase review flow: identify the parties, let the user pick the one
//! they represent, analyze the contract, and normalize the result for display.
//!
//! ## Architecture
//! - `state.rs` - Review states, transition table and observer snapshot
//! - `resolution.rs` - Represented/counter party resolution
//! - `normalizer.rs` - Default filling and represented-party-first ordering
//! - `error.rs` - Pipeline errors with fixed user-facing messages
//! - `pipeline.rs` - The orchestrator tying the steps together

pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod resolution;
pub mod state;

pub use error::{PipelineError, ANALYSIS_FAILED_MESSAGE, IDENTIFICATION_FAILED_MESSAGE};
pub use normalizer::normalize;
pub use pipeline::ReviewPipeline;
pub use resolution::{resolve_party_pair, resolve_selection};
pub use state::{ReviewSnapshot, ReviewStage, ReviewStatus};
