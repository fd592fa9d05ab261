//! Services
//!
//! Business logic services for the application.
//! Services handle the core functionality and are called by the CLI.

pub mod analyst;
pub mod review;

pub use analyst::LlmContractAnalyst;
pub use review::{PipelineError, ReviewPipeline, ReviewSnapshot, ReviewStatus};
