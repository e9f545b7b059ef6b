//! Centralized default constants for the abhyas engine.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates reference these constants instead of defining their own magic
//! numbers. When adding new constants, place them in the appropriate section
//! and document the rationale for the chosen value.

// =============================================================================
// CACHE
// =============================================================================

/// Time-to-live for a cached category entry, in seconds.
///
/// 10 minutes balances content freshness against request volume on
/// low-connectivity mobile clients. Uniform across categories.
pub const CACHE_TTL_SECS: u64 = 600;

// =============================================================================
// STALENESS SCAN
// =============================================================================

/// Maximum number of most-recently-updated notes included in a scan.
/// Older notes are never scanned; this bounds reasoning-service cost.
pub const SCAN_NOTE_LIMIT: usize = 50;

/// Maximum number of most-recent articles considered per scan.
pub const SCAN_ARTICLE_LIMIT: usize = 20;

/// Characters of note content included in the scan projection.
pub const NOTE_EXCERPT_CHARS: usize = 400;

// =============================================================================
// HEARTBEAT
// =============================================================================

/// Interval between AI staleness scans while a screen is active, in seconds.
pub const INSIGHT_SCAN_INTERVAL_SECS: u64 = 300;

/// Interval between lightweight keyword-match scans, in seconds.
pub const MATCH_SCAN_INTERVAL_SECS: u64 = 120;

/// Capacity of the heartbeat broadcast event channel.
pub const EVENT_BUS_CAPACITY: usize = 64;

// =============================================================================
// CHAT
// =============================================================================

/// Maximum number of past turns resent with each chat request. The session
/// itself is append-only; only the outbound request is capped.
pub const CHAT_HISTORY_TURNS: usize = 20;

// =============================================================================
// HTTP
// =============================================================================

/// Request timeout for content-store calls, in seconds.
pub const STORE_TIMEOUT_SECS: u64 = 30;

/// Request timeout for reasoning-service calls, in seconds.
pub const REASONING_TIMEOUT_SECS: u64 = 120;
