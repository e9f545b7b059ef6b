//! # abhyas-inference
//!
//! Reasoning-service backend for the abhyas engine.
//!
//! Exposes a single completion operation over an OpenAI-compatible
//! chat-completions endpoint with a bearer credential from environment
//! configuration. The staleness scan requests strict-JSON replies; chat
//! replies are free text. A missing credential is not an error here —
//! [`abhyas_core::ReasoningBackend::is_configured`] reports it and callers
//! degrade silently.

pub mod backend;
mod types;

pub use backend::{ReasoningClient, ReasoningConfig};
