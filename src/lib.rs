//! Contract Risk - Application Library
//!
//! Party-aware review of indemnification and limitation-of-liability clauses.
//! It includes:
//! - The review pipeline (identification, party resolution, analysis, normalization)
//! - An LLM-backed contract analyst
//! - Storage layer (JSON config)
//! - Data models and utilities

pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use models::settings::{AppConfig, SettingsUpdate};
pub use services::review::{PipelineError, ReviewPipeline, ReviewSnapshot, ReviewStatus};
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
