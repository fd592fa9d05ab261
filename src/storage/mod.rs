//! Storage Layer
//!
//! Persistence for application settings.

pub mod config;

pub use config::ConfigService;
