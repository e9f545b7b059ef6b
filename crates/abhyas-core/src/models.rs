//! Shared data model for the abhyas engine.
//!
//! Wire-facing types use camelCase field names to match the managed content
//! store and the mobile client. Card bodies inside reference decks and map
//! sections are schema-driven and stay as raw JSON values; their shape is
//! owned by the rendering layer, not by this engine.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Identifier for a reference-content category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryId {
    Economy,
    Polity,
    Geography,
    Environment,
    ScienceTech,
    IndianHistory,
    WorldHistory,
    Maps,
}

impl CategoryId {
    /// All categories, in display order.
    pub const ALL: [CategoryId; 8] = [
        CategoryId::Economy,
        CategoryId::Polity,
        CategoryId::Geography,
        CategoryId::Environment,
        CategoryId::ScienceTech,
        CategoryId::IndianHistory,
        CategoryId::WorldHistory,
        CategoryId::Maps,
    ];

    /// Returns the wire-format string for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryId::Economy => "economy",
            CategoryId::Polity => "polity",
            CategoryId::Geography => "geography",
            CategoryId::Environment => "environment",
            CategoryId::ScienceTech => "scienceTech",
            CategoryId::IndianHistory => "indianHistory",
            CategoryId::WorldHistory => "worldHistory",
            CategoryId::Maps => "maps",
        }
    }

    /// Which payload family this category decodes into.
    pub fn family(&self) -> CategoryFamily {
        match self {
            CategoryId::IndianHistory | CategoryId::WorldHistory => CategoryFamily::Timeline,
            CategoryId::Maps => CategoryFamily::Maps,
            _ => CategoryFamily::Reference,
        }
    }

    /// The timeline kind for timeline-family categories.
    pub fn timeline_kind(&self) -> Option<TimelineKind> {
        match self {
            CategoryId::IndianHistory => Some(TimelineKind::Indian),
            CategoryId::WorldHistory => Some(TimelineKind::World),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload family a category belongs to. Each family has its own remote
/// endpoint and its own decoded shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFamily {
    /// Card-deck reference content (economy, polity, ...).
    Reference,
    /// History timelines (indian, world).
    Timeline,
    /// Map sections. No bundled fallback exists for this family.
    Maps,
}

/// Which history timeline to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimelineKind {
    Indian,
    World,
}

impl TimelineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineKind::Indian => "indian",
            TimelineKind::World => "world",
        }
    }
}

impl fmt::Display for TimelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Category payloads
// ---------------------------------------------------------------------------

/// Decoded payload for a category, validated at the remote-client boundary.
///
/// A tagged union instead of a raw JSON value: the runtime-shape assumption
/// of the content store becomes a compile-time-checked variant, and cache
/// consumers match on the family they asked for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CategoryPayload {
    Reference(ReferenceDeck),
    Timeline(Vec<TimelineEvent>),
    Maps(MapsPayload),
}

impl CategoryPayload {
    /// The family this payload belongs to.
    pub fn family(&self) -> CategoryFamily {
        match self {
            CategoryPayload::Reference(_) => CategoryFamily::Reference,
            CategoryPayload::Timeline(_) => CategoryFamily::Timeline,
            CategoryPayload::Maps(_) => CategoryFamily::Maps,
        }
    }

    pub fn as_reference(&self) -> Option<&ReferenceDeck> {
        match self {
            CategoryPayload::Reference(deck) => Some(deck),
            _ => None,
        }
    }

    pub fn as_timeline(&self) -> Option<&[TimelineEvent]> {
        match self {
            CategoryPayload::Timeline(events) => Some(events),
            _ => None,
        }
    }

    pub fn as_maps(&self) -> Option<&MapsPayload> {
        match self {
            CategoryPayload::Maps(maps) => Some(maps),
            _ => None,
        }
    }
}

/// A deck of card sections for one reference category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDeck {
    pub title: String,
    pub sections: Vec<CardSection>,
}

/// A titled group of renderable cards. Card bodies are schema-driven JSON;
/// the mobile renderer owns their shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSection {
    pub heading: String,
    pub cards: Vec<serde_json::Value>,
}

/// One event on a history timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub year: i32,
    pub title: String,
    pub description: String,
}

/// Map sections keyed by region, plus an explicit render order.
///
/// The default value (`sections: {}, sectionOrder: []`) doubles as the
/// degraded result when the maps fetch fails: map assets are not safe to
/// serve stale or offline, so "no content" is signalled explicitly instead
/// of falling back to bundled data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapsPayload {
    pub sections: HashMap<String, Vec<serde_json::Value>>,
    pub section_order: Vec<String>,
}

impl MapsPayload {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.section_order.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Scan inputs
// ---------------------------------------------------------------------------

/// Read-only projection of a note for matching purposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummary {
    pub id: Uuid,
    pub title: String,
    pub content_excerpt: String,
    pub updated_at: DateTime<Utc>,
}

impl NoteSummary {
    /// Content excerpt bounded to `max_chars`, safe on UTF-8 boundaries.
    pub fn bounded_excerpt(&self, max_chars: usize) -> &str {
        match self.content_excerpt.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => &self.content_excerpt[..byte_idx],
            None => &self.content_excerpt,
        }
    }
}

/// Summary of a recently published article.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub published_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Scan output
// ---------------------------------------------------------------------------

/// Observable state of the staleness scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsightState {
    /// Notes look current relative to recent articles.
    Ok,
    /// At least one note may be stale; see `updates`.
    UpdatesAvailable,
}

/// Result of one staleness scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightStatus {
    pub state: InsightState,
    /// Short human-readable summary. Bounded to 1-2 sentences by contract
    /// with the reasoning service; the engine does not truncate it.
    pub message: String,
    #[serde(default)]
    pub updates: Vec<MatchedUpdate>,
}

impl InsightStatus {
    /// An `ok` status with no updates.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            state: InsightState::Ok,
            message: message.into(),
            updates: Vec::new(),
        }
    }
}

/// One note↔article pairing the reasoning service flagged as stale.
/// The rationale is free text, not a score; no numeric confidence is modeled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedUpdate {
    pub note_id: Uuid,
    pub note_title: String,
    pub article_id: Uuid,
    pub article_title: String,
    pub reason: String,
}

/// One note↔article pairing from the lightweight keyword/tag comparison
/// computed by the content service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMatch {
    pub note_id: Uuid,
    pub note_title: String,
    pub article_id: Uuid,
    pub article_title: String,
    pub matched_tags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of a follow-up conversation. Role and content only; the entire
/// history is resent every request, so no server-side metadata exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}
