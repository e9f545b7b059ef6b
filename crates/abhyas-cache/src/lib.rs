//! # abhyas-cache
//!
//! Keyed TTL cache over the remote content store, with graceful degradation
//! to bundled fallback data.
//!
//! The contract upward is "always returns something renderable": a fresh
//! entry is served without a network call, a stale or missing entry triggers
//! a fetch, and a failed fetch degrades to the bundled [`fallback`] deck for
//! that category. The maps category is the deliberate exception — map assets
//! are not safe to ship stale, so a failed maps fetch yields an explicit
//! empty structure instead of bundled data.

pub mod cache;
pub mod fallback;

pub use cache::CategoryCache;
