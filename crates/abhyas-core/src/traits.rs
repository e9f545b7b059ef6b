//! Async traits at the external-collaborator seams.
//!
//! The engine consumes two remote services through narrow contracts: the
//! managed content store (reference categories, timelines, maps, notes,
//! articles, keyword matches) and the reasoning service (semantic comparison
//! and chat replies). Both are modeled as object-safe async traits so tests
//! can substitute deterministic mocks.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{
    ArticleSummary, CategoryFamily, CategoryId, CategoryPayload, ChatTurn, KeywordMatch,
    NoteSummary, ReferenceDeck, TimelineEvent, TimelineKind,
};

/// Remote content store contract.
///
/// Every method may fail with a network or decode error; callers at the cache
/// and scan boundaries are responsible for degrading gracefully.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the card deck for a reference-family category.
    async fn fetch_category(&self, category: CategoryId) -> Result<ReferenceDeck>;

    /// Fetch a history timeline.
    async fn fetch_timeline(&self, kind: TimelineKind) -> Result<Vec<TimelineEvent>>;

    /// Fetch the map sections.
    async fn fetch_maps(&self) -> Result<crate::models::MapsPayload>;

    /// Fetch up to `limit` most-recently-updated notes.
    async fn fetch_recent_notes(&self, limit: usize) -> Result<Vec<NoteSummary>>;

    /// Fetch up to `limit` most-recently-published articles.
    async fn fetch_recent_articles(&self, limit: usize) -> Result<Vec<ArticleSummary>>;

    /// Fetch the current keyword/tag match set computed by the content
    /// service (the lightweight, non-AI comparison).
    async fn fetch_keyword_matches(&self) -> Result<Vec<KeywordMatch>>;

    /// Fetch and wrap the payload for any category, routed by family.
    async fn fetch_payload(&self, category: CategoryId) -> Result<CategoryPayload> {
        match category.family() {
            CategoryFamily::Reference => {
                Ok(CategoryPayload::Reference(self.fetch_category(category).await?))
            }
            CategoryFamily::Timeline => {
                let kind = category
                    .timeline_kind()
                    .ok_or_else(|| Error::Internal(format!("{} has no timeline kind", category)))?;
                Ok(CategoryPayload::Timeline(self.fetch_timeline(kind).await?))
            }
            CategoryFamily::Maps => Ok(CategoryPayload::Maps(self.fetch_maps().await?)),
        }
    }
}

/// Reply format requested from the reasoning service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Free-form natural language (chat replies).
    Text,
    /// Strict JSON object (staleness classification).
    Json,
}

/// Reasoning-service contract: a single completion operation over a system
/// prompt and an ordered message history.
#[async_trait]
pub trait ReasoningBackend: Send + Sync {
    /// Run one completion. `system` constrains the reply; `turns` is the
    /// ordered conversation so far, ending with the newest user turn.
    async fn complete(
        &self,
        system: &str,
        turns: &[ChatTurn],
        format: ResponseFormat,
    ) -> Result<String>;

    /// Whether a credential is configured. When false, enrichment features
    /// degrade silently instead of attempting calls that would fail.
    fn is_configured(&self) -> bool;
}
