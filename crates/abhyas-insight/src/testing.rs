//! Deterministic test doubles for the two remote collaborators.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;
use uuid::Uuid;

use abhyas_core::{
    ArticleSummary, CategoryId, CategoryPayload, ChatTurn, ContentStore, Error, KeywordMatch,
    MapsPayload, NoteSummary, ReasoningBackend, ReferenceDeck, ResponseFormat, Result,
    TimelineEvent, TimelineKind,
};

pub(crate) fn note(title: &str) -> NoteSummary {
    NoteSummary {
        id: Uuid::new_v4(),
        title: title.to_string(),
        content_excerpt: format!("notes about {}", title),
        updated_at: Utc::now(),
    }
}

pub(crate) fn article(title: &str) -> ArticleSummary {
    ArticleSummary {
        id: Uuid::new_v4(),
        title: title.to_string(),
        summary: format!("coverage of {}", title),
        published_at: Utc::now(),
    }
}

pub(crate) fn keyword_match(note_title: &str, article_title: &str) -> KeywordMatch {
    KeywordMatch {
        note_id: Uuid::new_v4(),
        note_title: note_title.to_string(),
        article_id: Uuid::new_v4(),
        article_title: article_title.to_string(),
        matched_tags: vec!["economy".to_string()],
    }
}

// ---------------------------------------------------------------------------
// MockStore
// ---------------------------------------------------------------------------

/// Content-store double with canned data, per-method failure switches, and
/// call accounting.
#[derive(Default)]
pub(crate) struct MockStore {
    notes: Mutex<Vec<NoteSummary>>,
    articles: Mutex<Vec<ArticleSummary>>,
    matches: Mutex<Vec<KeywordMatch>>,
    fail_notes: AtomicBool,
    fail_articles: AtomicBool,
    fail_matches: AtomicBool,
    note_calls: AtomicUsize,
    article_calls: AtomicUsize,
    match_calls: AtomicUsize,
    note_limits: Mutex<Vec<usize>>,
    article_limits: Mutex<Vec<usize>>,
}

impl MockStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_notes(self, notes: Vec<NoteSummary>) -> Self {
        *self.notes.lock().unwrap() = notes;
        self
    }

    pub(crate) fn with_articles(self, articles: Vec<ArticleSummary>) -> Self {
        *self.articles.lock().unwrap() = articles;
        self
    }

    pub(crate) fn with_matches(self, matches: Vec<KeywordMatch>) -> Self {
        *self.matches.lock().unwrap() = matches;
        self
    }

    pub(crate) fn with_failing_notes(self) -> Self {
        self.fail_notes.store(true, Ordering::SeqCst);
        self
    }

    pub(crate) fn fail_articles(&self, fail: bool) {
        self.fail_articles.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_matches(&self, fail: bool) {
        self.fail_matches.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn note_calls(&self) -> usize {
        self.note_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn article_calls(&self) -> usize {
        self.article_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn match_calls(&self) -> usize {
        self.match_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn note_limits(&self) -> Vec<usize> {
        self.note_limits.lock().unwrap().clone()
    }

    pub(crate) fn article_limits(&self) -> Vec<usize> {
        self.article_limits.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentStore for MockStore {
    async fn fetch_category(&self, category: CategoryId) -> Result<ReferenceDeck> {
        Err(Error::Store(format!(
            "mock store has no category data for {}",
            category
        )))
    }

    async fn fetch_timeline(&self, kind: TimelineKind) -> Result<Vec<TimelineEvent>> {
        Err(Error::Store(format!("mock store has no timeline for {}", kind)))
    }

    async fn fetch_maps(&self) -> Result<MapsPayload> {
        Err(Error::Store("mock store has no maps".to_string()))
    }

    async fn fetch_recent_notes(&self, limit: usize) -> Result<Vec<NoteSummary>> {
        self.note_calls.fetch_add(1, Ordering::SeqCst);
        self.note_limits.lock().unwrap().push(limit);
        if self.fail_notes.load(Ordering::SeqCst) {
            return Err(Error::Store("note fetch failed".to_string()));
        }
        Ok(self.notes.lock().unwrap().clone())
    }

    async fn fetch_recent_articles(&self, limit: usize) -> Result<Vec<ArticleSummary>> {
        self.article_calls.fetch_add(1, Ordering::SeqCst);
        self.article_limits.lock().unwrap().push(limit);
        if self.fail_articles.load(Ordering::SeqCst) {
            return Err(Error::Store("article fetch failed".to_string()));
        }
        Ok(self.articles.lock().unwrap().clone())
    }

    async fn fetch_keyword_matches(&self) -> Result<Vec<KeywordMatch>> {
        self.match_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_matches.load(Ordering::SeqCst) {
            return Err(Error::Store("match fetch failed".to_string()));
        }
        Ok(self.matches.lock().unwrap().clone())
    }

    async fn fetch_payload(&self, category: CategoryId) -> Result<CategoryPayload> {
        Err(Error::Store(format!("mock store has no payload for {}", category)))
    }
}

// ---------------------------------------------------------------------------
// MockReasoning
// ---------------------------------------------------------------------------

/// One recorded `complete` invocation.
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub(crate) system: String,
    pub(crate) turns: Vec<ChatTurn>,
    pub(crate) turn_count: usize,
    pub(crate) last_content: String,
    pub(crate) format: ResponseFormat,
}

/// Rendezvous point for overlap tests: `complete` signals `entered` and then
/// blocks until the test signals `release`.
#[derive(Default)]
pub(crate) struct Gate {
    pub(crate) entered: Notify,
    pub(crate) release: Notify,
}

/// Reasoning-backend double with a response queue and a call log.
pub(crate) struct MockReasoning {
    responses: Mutex<VecDeque<String>>,
    fail: AtomicBool,
    configured: AtomicBool,
    calls: Mutex<Vec<RecordedCall>>,
    gate: Option<Arc<Gate>>,
}

impl MockReasoning {
    pub(crate) fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fail: AtomicBool::new(false),
            configured: AtomicBool::new(true),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Queue a canned reply. Replies are consumed in order; once the queue is
    /// empty a generic reply is returned.
    pub(crate) fn with_response(self, response: &str) -> Self {
        self.responses.lock().unwrap().push_back(response.to_string());
        self
    }

    pub(crate) fn failing(self) -> Self {
        self.fail.store(true, Ordering::SeqCst);
        self
    }

    pub(crate) fn unconfigured(self) -> Self {
        self.configured.store(false, Ordering::SeqCst);
        self
    }

    pub(crate) fn gated(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ReasoningBackend for MockReasoning {
    async fn complete(
        &self,
        system: &str,
        turns: &[ChatTurn],
        format: ResponseFormat,
    ) -> Result<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: system.to_string(),
            turns: turns.to_vec(),
            turn_count: turns.len(),
            last_content: turns.last().map(|t| t.content.clone()).unwrap_or_default(),
            format,
        });

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Inference("reasoning service unreachable".to_string()));
        }
        let queued = self.responses.lock().unwrap().pop_front();
        Ok(queued.unwrap_or_else(|| "Noted.".to_string()))
    }

    fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }
}
