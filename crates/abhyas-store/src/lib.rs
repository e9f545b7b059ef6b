//! # abhyas-store
//!
//! HTTP client for the managed content store: reference category decks,
//! history timelines, map sections, the user's note corpus, recently
//! published articles, and the server-computed keyword-match set.
//!
//! The client implements [`abhyas_core::ContentStore`] and performs a typed
//! decode per category family at this boundary, so nothing downstream ever
//! handles an opaque JSON document.

pub mod client;
mod types;

pub use client::{ContentClient, StoreConfig};
