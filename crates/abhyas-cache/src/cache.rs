//! TTL category cache with loading/error bookkeeping.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};

use abhyas_core::{
    defaults, CategoryFamily, CategoryId, CategoryPayload, ContentStore, Error, MapsPayload,
    ReferenceDeck, Result, TimelineEvent, TimelineKind,
};

use crate::fallback;

/// One cached category entry. Replaced wholesale on refresh, never merged.
struct CacheEntry {
    payload: CategoryPayload,
    fetched_at: Instant,
}

/// Keyed TTL cache over a [`ContentStore`].
///
/// Owned, constructor-injected state: tests instantiate independent caches
/// and the app owns exactly one. `get` never returns an error — a failed
/// fetch is recorded in the error bookkeeping and degrades to the bundled
/// fallback (or the explicit empty maps structure).
pub struct CategoryCache {
    store: Arc<dyn ContentStore>,
    ttl: Duration,
    entries: RwLock<HashMap<CategoryId, CacheEntry>>,
    loading: RwLock<HashSet<CategoryId>>,
    errors: RwLock<HashMap<CategoryId, String>>,
}

impl CategoryCache {
    /// Create a cache with the default TTL.
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            ttl: Duration::from_secs(defaults::CACHE_TTL_SECS),
            entries: RwLock::new(HashMap::new()),
            loading: RwLock::new(HashSet::new()),
            errors: RwLock::new(HashMap::new()),
        }
    }

    /// Override the TTL (tests, or clients with different freshness needs).
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Get the payload for a category.
    ///
    /// A fresh entry is returned without a network call (the dominant path).
    /// Otherwise the category is fetched; on failure the bundled fallback is
    /// served, except for maps which degrades to an explicit empty structure.
    pub async fn get(&self, category: CategoryId, force_refresh: bool) -> CategoryPayload {
        if !force_refresh {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&category) {
                if entry.fetched_at.elapsed() < self.ttl {
                    debug!(category = %category, "Cache hit");
                    return entry.payload.clone();
                }
            }
        }
        self.refresh(category).await
    }

    /// Evict one entry, or the whole cache.
    pub async fn clear(&self, category: Option<CategoryId>) {
        let mut entries = self.entries.write().await;
        match category {
            Some(c) => {
                entries.remove(&c);
                debug!(category = %c, "Cache entry evicted");
            }
            None => {
                entries.clear();
                debug!("Cache cleared");
            }
        }
    }

    /// Whether a fetch is currently in flight for this category.
    pub async fn is_loading(&self, category: CategoryId) -> bool {
        self.loading.read().await.contains(&category)
    }

    /// The last recorded fetch error for this category, if any. Cleared on
    /// the next successful fetch.
    pub async fn last_error(&self, category: CategoryId) -> Option<String> {
        self.errors.read().await.get(&category).cloned()
    }

    // -----------------------------------------------------------------------
    // Typed accessors (the produced interface)
    // -----------------------------------------------------------------------

    /// Card deck for a reference-family category.
    ///
    /// Errors only on family misuse (a timeline or maps category); fetch
    /// failures still serve the bundled deck.
    pub async fn references(
        &self,
        category: CategoryId,
        force_refresh: bool,
    ) -> Result<ReferenceDeck> {
        if category.family() != CategoryFamily::Reference {
            return Err(Error::InvalidInput(format!(
                "{} is not a reference-family category",
                category
            )));
        }
        match self.get(category, force_refresh).await {
            CategoryPayload::Reference(deck) => Ok(deck),
            other => {
                // Unreachable by construction at the client boundary.
                warn!(category = %category, family = ?other.family(), "Unexpected payload family");
                match fallback::get(category) {
                    CategoryPayload::Reference(deck) => Ok(deck),
                    _ => Err(Error::Internal(format!("no fallback deck for {}", category))),
                }
            }
        }
    }

    /// History timeline events for the given kind.
    pub async fn history_timeline(
        &self,
        kind: TimelineKind,
        force_refresh: bool,
    ) -> Vec<TimelineEvent> {
        let category = match kind {
            TimelineKind::Indian => CategoryId::IndianHistory,
            TimelineKind::World => CategoryId::WorldHistory,
        };
        match self.get(category, force_refresh).await {
            CategoryPayload::Timeline(events) => events,
            other => {
                warn!(category = %category, family = ?other.family(), "Unexpected payload family");
                match fallback::get(category) {
                    CategoryPayload::Timeline(events) => events,
                    _ => Vec::new(),
                }
            }
        }
    }

    /// Map sections. Empty on fetch failure, never bundled.
    pub async fn maps(&self, force_refresh: bool) -> MapsPayload {
        match self.get(CategoryId::Maps, force_refresh).await {
            CategoryPayload::Maps(maps) => maps,
            other => {
                warn!(family = ?other.family(), "Unexpected payload family for maps");
                MapsPayload::default()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Fetch path
    // -----------------------------------------------------------------------

    async fn refresh(&self, category: CategoryId) -> CategoryPayload {
        self.loading.write().await.insert(category);
        let result = self.store.fetch_payload(category).await;
        self.loading.write().await.remove(&category);

        match result {
            Ok(payload) => {
                self.errors.write().await.remove(&category);
                let mut entries = self.entries.write().await;
                entries.insert(
                    category,
                    CacheEntry {
                        payload: payload.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                debug!(category = %category, "Cache entry refreshed");
                payload
            }
            Err(e) => {
                // Fetch failures are local-only: record for observability and
                // degrade, never propagate upward.
                warn!(category = %category, error = %e, "Fetch failed, serving degraded payload");
                self.errors.write().await.insert(category, e.to_string());
                if category == CategoryId::Maps {
                    CategoryPayload::Maps(MapsPayload::default())
                } else {
                    fallback::get(category)
                }
            }
        }
    }
}
