//! Bounded conversational context over the latest scan results.
//!
//! A `ChatSession` is append-only and lives for one modal: the full history
//! (capped to the most recent turns) is resent on every send, so there is no
//! server-side continuity to manage. Dropping the session discards it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, warn};

use abhyas_core::{
    defaults, ChatTurn, Error, InsightStatus, KeywordMatch, MatchedUpdate, ReasoningBackend,
    ResponseFormat, Result,
};

/// Fixed assistant turn appended when a send fails. No automatic retry.
pub const APOLOGY_MESSAGE: &str =
    "Sorry, I couldn't reach the assistant just now. Please try again in a moment.";

const CHAT_SYSTEM_PROMPT: &str = "You are a study assistant. The user maintains personal notes and \
you have just compared them against recently published articles. Answer follow-up questions \
grounded in the scan context below. Be concise and concrete; if the context does not cover a \
question, say so instead of guessing.";

/// Scan-derived context resent with every chat turn.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentContext {
    pub updates: Vec<MatchedUpdate>,
    pub matches: Vec<KeywordMatch>,
    pub summary: String,
}

impl AgentContext {
    pub fn new(status: &InsightStatus, matches: Vec<KeywordMatch>) -> Self {
        Self {
            updates: status.updates.clone(),
            matches,
            summary: status.message.clone(),
        }
    }
}

/// One follow-up conversation about a scan result.
///
/// Shared-reference friendly: interior state is a turn list behind a mutex
/// and an atomic in-flight flag, so the UI can hold the session in an `Arc`
/// and poll `is_thinking` while a send is pending.
pub struct ChatSession {
    reasoning: Arc<dyn ReasoningBackend>,
    context: AgentContext,
    turns: Mutex<Vec<ChatTurn>>,
    thinking: AtomicBool,
}

impl ChatSession {
    pub fn new(reasoning: Arc<dyn ReasoningBackend>, context: AgentContext) -> Self {
        Self {
            reasoning,
            context,
            turns: Mutex::new(Vec::new()),
            thinking: AtomicBool::new(false),
        }
    }

    /// Whether a reply is currently pending.
    pub fn is_thinking(&self) -> bool {
        self.thinking.load(Ordering::SeqCst)
    }

    /// Snapshot of the session so far, newest turn last.
    pub fn turns(&self) -> Vec<ChatTurn> {
        self.turns.lock().unwrap().clone()
    }

    /// Discard the session history, e.g. when the modal is reopened.
    pub fn clear(&self) {
        self.turns.lock().unwrap().clear();
    }

    /// Send one user message and return the assistant's reply text.
    ///
    /// The user turn is appended immediately, before the service call. On a
    /// service failure the reply turn is the fixed apology, not an error:
    /// the session always stays renderable. The only error a caller can see
    /// is the in-flight rejection, which indicates the message was NOT
    /// appended and the caller should retry after the pending reply lands.
    pub async fn send(&self, message: &str) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::InvalidInput("empty chat message".to_string()));
        }
        // Single-in-flight guard: reject, don't queue. Queued sends would
        // reorder against the optimistic appends.
        if self
            .thinking
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::InvalidInput(
                "a reply is still pending for this session".to_string(),
            ));
        }

        let history = {
            let mut turns = self.turns.lock().unwrap();
            turns.push(ChatTurn::user(message));
            bounded_history(&turns)
        };

        debug!(turns = history.len(), "Sending chat turn");
        let reply = match self
            .reasoning
            .complete(&self.system_prompt(), &history, ResponseFormat::Text)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Chat send failed, appending apology turn");
                APOLOGY_MESSAGE.to_string()
            }
        };

        self.turns.lock().unwrap().push(ChatTurn::assistant(&reply));
        self.thinking.store(false, Ordering::SeqCst);
        Ok(reply)
    }

    fn system_prompt(&self) -> String {
        // Context serialization cannot fail for these plain structs; fall
        // back to an empty object rather than poisoning the send.
        let context = serde_json::to_string(&self.context).unwrap_or_else(|e| {
            warn!(error = %e, "Context serialization failed");
            "{}".to_string()
        });
        format!("{}\n\nScan context:\n{}", CHAT_SYSTEM_PROMPT, context)
    }
}

/// The most recent `CHAT_HISTORY_TURNS` turns, oldest first.
fn bounded_history(turns: &[ChatTurn]) -> Vec<ChatTurn> {
    let skip = turns.len().saturating_sub(defaults::CHAT_HISTORY_TURNS);
    turns[skip..].to_vec()
}
