//! Data Models
//!
//! Data structures for persisted application state.

pub mod settings;

pub use settings::*;
