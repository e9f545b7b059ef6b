//! Staleness scanner over the note corpus.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use abhyas_core::{
    defaults, ArticleSummary, ChatTurn, ContentStore, InsightState, InsightStatus, MatchedUpdate,
    NoteSummary, ReasoningBackend, ResponseFormat,
};

/// Message shown when the user has no notes yet. No scan runs against an
/// empty corpus.
pub const ONBOARDING_MESSAGE: &str =
    "Add a few notes and I'll keep an eye out for newer information.";

/// Generic message for every degraded outcome: the engine never claims
/// staleness it cannot substantiate.
pub const UP_TO_DATE_MESSAGE: &str = "Your notes look up to date.";

const SCAN_SYSTEM_PROMPT: &str = r#"You compare a user's study notes against recently published articles and decide whether any note is stale relative to new information.

Respond with a single strict JSON object, no prose, no markdown:
{
  "status": "ok" | "updatesAvailable",
  "message": "<one or two sentences summarizing the result>",
  "updates": [
    {
      "noteId": "<uuid copied verbatim from the input>",
      "noteTitle": "<title of that note>",
      "articleId": "<uuid copied verbatim from the input>",
      "articleTitle": "<title of that article>",
      "reason": "<one sentence: why the article supersedes the note>"
    }
  ]
}

Only report a match when an article plausibly changes, corrects, or extends what a note says. If nothing qualifies, return status "ok" with an empty updates array."#;

/// Internal scan failure taxonomy. Every variant folds to the same
/// externally visible outcome (`ok` with a generic message); the distinction
/// exists for the observability sink only.
#[derive(Debug, Error)]
enum ScanError {
    #[error("network: {0}")]
    Network(String),

    /// Missing reasoning credential. Not an operator fault; the feature
    /// degrades silently.
    #[error("reasoning service not configured")]
    ServiceUnavailable,

    #[error("malformed reasoning reply: {0}")]
    MalformedResponse(String),
}

/// Reply shape the reasoning service is contracted to return.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanReply {
    status: InsightState,
    message: String,
    #[serde(default)]
    updates: Vec<MatchedUpdate>,
}

/// Staleness scanner: one bounded comparison of the note corpus against the
/// recent-article window.
pub struct InsightAgent {
    store: Arc<dyn ContentStore>,
    reasoning: Arc<dyn ReasoningBackend>,
}

impl InsightAgent {
    pub fn new(store: Arc<dyn ContentStore>, reasoning: Arc<dyn ReasoningBackend>) -> Self {
        Self { store, reasoning }
    }

    /// Run one staleness scan.
    ///
    /// Never fails: every internal error folds to an `ok` status with a
    /// generic message, logged through the observability sink. An empty note
    /// corpus short-circuits to an onboarding message without any further
    /// network call.
    pub async fn check_note_status(&self) -> InsightStatus {
        let notes = match self.store.fetch_recent_notes(defaults::SCAN_NOTE_LIMIT).await {
            Ok(notes) => notes,
            Err(e) => {
                warn!(error = %e, "Note fetch failed, scan degraded to ok");
                return InsightStatus::ok(UP_TO_DATE_MESSAGE);
            }
        };

        if notes.is_empty() {
            debug!("Empty note corpus, skipping scan");
            return InsightStatus::ok(ONBOARDING_MESSAGE);
        }

        match self.scan(&notes).await {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Staleness scan degraded to ok");
                InsightStatus::ok(UP_TO_DATE_MESSAGE)
            }
        }
    }

    async fn scan(&self, notes: &[NoteSummary]) -> Result<InsightStatus, ScanError> {
        let articles = self
            .store
            .fetch_recent_articles(defaults::SCAN_ARTICLE_LIMIT)
            .await
            .map_err(|e| ScanError::Network(e.to_string()))?;

        if articles.is_empty() {
            debug!("No recent articles, nothing to compare against");
            return Ok(InsightStatus::ok(UP_TO_DATE_MESSAGE));
        }

        if !self.reasoning.is_configured() {
            return Err(ScanError::ServiceUnavailable);
        }

        let prompt = scan_prompt(notes, &articles);
        debug!(
            notes = notes.len(),
            articles = articles.len(),
            prompt_len = prompt.len(),
            "Invoking reasoning service for staleness scan"
        );

        let reply = self
            .reasoning
            .complete(SCAN_SYSTEM_PROMPT, &[ChatTurn::user(prompt)], ResponseFormat::Json)
            .await
            .map_err(|e| ScanError::Network(e.to_string()))?;

        let parsed = parse_scan_reply(&reply)?;
        Ok(cross_check(parsed, notes, &articles))
    }
}

/// Build the user message: bounded projections of notes and articles.
fn scan_prompt(notes: &[NoteSummary], articles: &[ArticleSummary]) -> String {
    let payload = serde_json::json!({
        "notes": notes.iter().map(|n| serde_json::json!({
            "id": n.id,
            "title": n.title,
            "excerpt": n.bounded_excerpt(defaults::NOTE_EXCERPT_CHARS),
        })).collect::<Vec<_>>(),
        "articles": articles.iter().map(|a| serde_json::json!({
            "id": a.id,
            "title": a.title,
            "summary": a.summary,
        })).collect::<Vec<_>>(),
    });
    payload.to_string()
}

/// Strip a surrounding markdown code fence, if any, and trim whitespace.
///
/// Some models wrap JSON in ```json ... ``` despite the format contract;
/// tolerate that before parsing.
fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the fence's language tag line ("json", possibly empty).
    let body = match rest.split_once('\n') {
        Some((_lang, body)) => body,
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

fn parse_scan_reply(reply: &str) -> Result<InsightStatus, ScanError> {
    let body = strip_code_fences(reply);
    let parsed: ScanReply = serde_json::from_str(body)
        .map_err(|e| ScanError::MalformedResponse(e.to_string()))?;
    Ok(InsightStatus {
        state: parsed.status,
        message: parsed.message,
        updates: parsed.updates,
    })
}

/// Drop updates whose ids do not reference the fetched corpora.
///
/// The reasoning service is trusted for judgment, not for referential
/// integrity. A status left with no surviving updates folds to `ok`.
fn cross_check(
    mut status: InsightStatus,
    notes: &[NoteSummary],
    articles: &[ArticleSummary],
) -> InsightStatus {
    let note_ids: HashSet<_> = notes.iter().map(|n| n.id).collect();
    let article_ids: HashSet<_> = articles.iter().map(|a| a.id).collect();

    let before = status.updates.len();
    status
        .updates
        .retain(|u| note_ids.contains(&u.note_id) && article_ids.contains(&u.article_id));
    let dropped = before - status.updates.len();
    if dropped > 0 {
        warn!(dropped, "Dropped updates referencing unknown note/article ids");
    }

    if status.state == InsightState::UpdatesAvailable && status.updates.is_empty() {
        return InsightStatus::ok(UP_TO_DATE_MESSAGE);
    }
    status
}
