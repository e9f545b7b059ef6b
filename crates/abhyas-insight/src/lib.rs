//! # abhyas-insight
//!
//! The staleness engine: compares the user's note corpus against recently
//! published articles and surfaces notes that may be outdated.
//!
//! This crate provides:
//! - [`InsightAgent`] — one bounded staleness scan via the reasoning service,
//!   with conservative degradation (the engine never claims staleness it
//!   cannot substantiate, and never surfaces an error state to the user)
//! - [`Heartbeat`] — periodic scanning independent of UI lifecycle, with
//!   per-source overlap coalescing and a broadcast event bus
//! - [`ChatSession`] — bounded-context follow-up conversation over the latest
//!   scan result
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use abhyas_insight::{Heartbeat, HeartbeatConfig, HeartbeatEvent, InsightAgent};
//!
//! let agent = InsightAgent::new(store.clone(), reasoning);
//! let handle = Heartbeat::new(agent, store, HeartbeatConfig::from_env()).start();
//!
//! let mut events = handle.events();
//! while let Ok(event) = events.recv().await {
//!     if let HeartbeatEvent::InsightUpdated(status) = event {
//!         println!("{}", status.message);
//!     }
//! }
//!
//! handle.shutdown().await?;
//! ```

pub mod agent;
pub mod context;
pub mod heartbeat;

#[cfg(test)]
pub(crate) mod testing;

pub use agent::{InsightAgent, ONBOARDING_MESSAGE, UP_TO_DATE_MESSAGE};
pub use context::{AgentContext, ChatSession, APOLOGY_MESSAGE};
pub use heartbeat::{Heartbeat, HeartbeatConfig, HeartbeatEvent, HeartbeatHandle, ScanSnapshot};
