//! # abhyas-core
//!
//! Core types, traits, and abstractions for the abhyas content engine.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the other abhyas crates depend on: the category model, cache and scan
//! payload types, the error type, centralized defaults, and the async traits
//! at the external-service seams (content store, reasoning service).

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
