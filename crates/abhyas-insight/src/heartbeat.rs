//! Periodic scan scheduler with per-source overlap coalescing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use abhyas_core::{defaults, ContentStore, InsightStatus, KeywordMatch, Result};

use crate::agent::InsightAgent;

/// Configuration for the heartbeat scheduler.
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Seconds between AI staleness scans.
    pub insight_interval_secs: u64,
    /// Seconds between lightweight keyword-match scans.
    pub match_interval_secs: u64,
    /// Whether the scheduler runs at all.
    pub enabled: bool,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            insight_interval_secs: defaults::INSIGHT_SCAN_INTERVAL_SECS,
            match_interval_secs: defaults::MATCH_SCAN_INTERVAL_SECS,
            enabled: true,
        }
    }
}

impl HeartbeatConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `HEARTBEAT_ENABLED` | `true` | Enable/disable periodic scans |
    /// | `INSIGHT_SCAN_INTERVAL_SECS` | `300` | AI scan period |
    /// | `MATCH_SCAN_INTERVAL_SECS` | `120` | Keyword-match scan period |
    pub fn from_env() -> Self {
        let enabled = std::env::var("HEARTBEAT_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let insight_interval_secs = std::env::var("INSIGHT_SCAN_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::INSIGHT_SCAN_INTERVAL_SECS)
            .max(1);

        let match_interval_secs = std::env::var("MATCH_SCAN_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::MATCH_SCAN_INTERVAL_SECS)
            .max(1);

        Self {
            insight_interval_secs,
            match_interval_secs,
            enabled,
        }
    }

    /// Set the AI scan period. Clamped to at least one second; a zero
    /// period is not a valid interval.
    pub fn with_insight_interval(mut self, secs: u64) -> Self {
        self.insight_interval_secs = secs.max(1);
        self
    }

    /// Set the keyword-match scan period. Clamped to at least one second.
    pub fn with_match_interval(mut self, secs: u64) -> Self {
        self.match_interval_secs = secs.max(1);
        self
    }

    /// Enable or disable the scheduler.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Event emitted by the heartbeat.
#[derive(Debug, Clone)]
pub enum HeartbeatEvent {
    /// Scheduler started; the first scans of both sources are underway.
    Started,
    /// Scheduler stopped; no further events follow.
    Stopped,
    /// An AI staleness scan finished.
    InsightUpdated(InsightStatus),
    /// A keyword-match scan finished.
    MatchesUpdated(Vec<KeywordMatch>),
}

/// Read-only view of one scan source's bookkeeping.
#[derive(Debug, Clone)]
pub struct ScanSnapshot<T> {
    pub in_flight: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub last_result: Option<T>,
    pub last_error: Option<String>,
}

/// Per-source bookkeeping. The `in_flight` flag doubles as the overlap
/// guard: a tick that finds it set is dropped, not queued.
struct SourceState<T> {
    in_flight: bool,
    started_at: Option<DateTime<Utc>>,
    last_result: Option<T>,
    last_error: Option<String>,
}

impl<T> Default for SourceState<T> {
    fn default() -> Self {
        Self {
            in_flight: false,
            started_at: None,
            last_result: None,
            last_error: None,
        }
    }
}

impl<T: Clone> SourceState<T> {
    fn snapshot(&self) -> ScanSnapshot<T> {
        ScanSnapshot {
            in_flight: self.in_flight,
            started_at: self.started_at,
            last_result: self.last_result.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Handle for controlling a running heartbeat.
pub struct HeartbeatHandle {
    shutdown_tx: mpsc::Sender<()>,
    event_rx: broadcast::Receiver<HeartbeatEvent>,
    heartbeat: Arc<Heartbeat>,
}

impl HeartbeatHandle {
    /// Signal the scheduler to shut down gracefully. Timers stop
    /// immediately; a scan already in flight finishes without publishing.
    pub async fn shutdown(&self) -> Result<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| abhyas_core::Error::Internal("Failed to send shutdown signal".into()))?;
        Ok(())
    }

    /// Get a receiver for heartbeat events.
    pub fn events(&self) -> broadcast::Receiver<HeartbeatEvent> {
        self.event_rx.resubscribe()
    }

    /// Run one AI scan immediately, outside the timer (re-focus path).
    /// Coalesces with a scan already in flight.
    pub async fn scan_now(&self) {
        self.heartbeat.run_insight_scan().await;
    }

    /// Run one keyword-match scan immediately, outside the timer.
    pub async fn match_now(&self) {
        self.heartbeat.run_match_scan().await;
    }

    /// Bookkeeping for the AI scan source.
    pub fn insight_state(&self) -> ScanSnapshot<InsightStatus> {
        self.heartbeat.insight.lock().unwrap().snapshot()
    }

    /// Bookkeeping for the keyword-match source.
    pub fn match_state(&self) -> ScanSnapshot<Vec<KeywordMatch>> {
        self.heartbeat.matches.lock().unwrap().snapshot()
    }
}

/// Scheduler driving the two periodic scan sources. Each source ticks on
/// its own interval, never overlaps itself, and keeps ticking after a
/// failed run.
pub struct Heartbeat {
    agent: Arc<InsightAgent>,
    store: Arc<dyn ContentStore>,
    config: HeartbeatConfig,
    event_tx: broadcast::Sender<HeartbeatEvent>,
    insight: Mutex<SourceState<InsightStatus>>,
    matches: Mutex<SourceState<Vec<KeywordMatch>>>,
    stopped: AtomicBool,
}

impl Heartbeat {
    pub fn new(agent: InsightAgent, store: Arc<dyn ContentStore>, config: HeartbeatConfig) -> Self {
        let (event_tx, _) = broadcast::channel(defaults::EVENT_BUS_CAPACITY);
        Self {
            agent: Arc::new(agent),
            store,
            config,
            event_tx,
            insight: Mutex::new(SourceState::default()),
            matches: Mutex::new(SourceState::default()),
            stopped: AtomicBool::new(false),
        }
    }

    /// Get a receiver for heartbeat events. Subscribe before `start` to
    /// observe the `Started` event.
    pub fn events(&self) -> broadcast::Receiver<HeartbeatEvent> {
        self.event_tx.subscribe()
    }

    /// Start the scheduler and return a handle for control.
    pub fn start(self) -> HeartbeatHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        let event_rx = self.event_tx.subscribe();

        let heartbeat = Arc::new(self);
        let runner = heartbeat.clone();

        tokio::spawn(async move {
            runner.run(&mut shutdown_rx).await;
        });

        HeartbeatHandle {
            shutdown_tx,
            event_rx,
            heartbeat,
        }
    }

    /// Scheduler loop. Both intervals fire their first tick immediately, so
    /// fresh data exists as soon as the owning screen appears.
    async fn run(self: &Arc<Self>, shutdown_rx: &mut mpsc::Receiver<()>) {
        if !self.config.enabled {
            info!("Heartbeat is disabled, not starting");
            return;
        }

        info!(
            insight_interval_secs = self.config.insight_interval_secs,
            match_interval_secs = self.config.match_interval_secs,
            "Heartbeat started"
        );
        let _ = self.event_tx.send(HeartbeatEvent::Started);

        let mut insight_timer = interval(Duration::from_secs(self.config.insight_interval_secs));
        insight_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut match_timer = interval(Duration::from_secs(self.config.match_interval_secs));
        match_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Heartbeat received shutdown signal");
                    break;
                }
                _ = insight_timer.tick() => {
                    let heartbeat = self.clone();
                    tokio::spawn(async move {
                        heartbeat.run_insight_scan().await;
                    });
                }
                _ = match_timer.tick() => {
                    let heartbeat = self.clone();
                    tokio::spawn(async move {
                        heartbeat.run_match_scan().await;
                    });
                }
            }
        }

        self.stopped.store(true, Ordering::SeqCst);
        let _ = self.event_tx.send(HeartbeatEvent::Stopped);
        info!("Heartbeat stopped");
    }

    /// One AI scan run. Skipped outright if a run is already in flight.
    pub(crate) async fn run_insight_scan(&self) {
        {
            let mut state = self.insight.lock().unwrap();
            if state.in_flight {
                debug!("Insight scan already in flight, skipping tick");
                return;
            }
            state.in_flight = true;
            state.started_at = Some(Utc::now());
        }

        let status = self.agent.check_note_status().await;

        {
            let mut state = self.insight.lock().unwrap();
            state.in_flight = false;
            state.last_result = Some(status.clone());
            state.last_error = None;
        }
        self.publish(HeartbeatEvent::InsightUpdated(status));
    }

    /// One keyword-match run. A failed fetch records the error and leaves
    /// the previous result standing; the timer keeps going either way.
    pub(crate) async fn run_match_scan(&self) {
        {
            let mut state = self.matches.lock().unwrap();
            if state.in_flight {
                debug!("Match scan already in flight, skipping tick");
                return;
            }
            state.in_flight = true;
            state.started_at = Some(Utc::now());
        }

        let result = self.store.fetch_keyword_matches().await;

        let published = {
            let mut state = self.matches.lock().unwrap();
            state.in_flight = false;
            match result {
                Ok(matches) => {
                    state.last_result = Some(matches.clone());
                    state.last_error = None;
                    Some(matches)
                }
                Err(e) => {
                    warn!(error = %e, "Keyword-match scan failed");
                    state.last_error = Some(e.to_string());
                    None
                }
            }
        };
        if let Some(matches) = published {
            self.publish(HeartbeatEvent::MatchesUpdated(matches));
        }
    }

    /// Drop results that land after shutdown instead of publishing them.
    fn publish(&self, event: HeartbeatEvent) {
        if self.stopped.load(Ordering::SeqCst) {
            debug!("Heartbeat stopped, dropping late scan result");
            return;
        }
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{article, keyword_match, note, Gate, MockReasoning, MockStore};
    use abhyas_core::InsightState;

    fn heartbeat(
        store: Arc<MockStore>,
        reasoning: Arc<MockReasoning>,
        config: HeartbeatConfig,
    ) -> Heartbeat {
        let agent = InsightAgent::new(store.clone(), reasoning);
        Heartbeat::new(agent, store, config)
    }

    // -----------------------------------------------------------------------
    // Config
    // -----------------------------------------------------------------------

    #[test]
    fn config_defaults() {
        let config = HeartbeatConfig::default();
        assert_eq!(
            config.insight_interval_secs,
            defaults::INSIGHT_SCAN_INTERVAL_SECS
        );
        assert_eq!(config.match_interval_secs, defaults::MATCH_SCAN_INTERVAL_SECS);
        assert!(config.enabled);
    }

    #[test]
    fn config_builder_chaining() {
        let config = HeartbeatConfig::default()
            .with_insight_interval(60)
            .with_match_interval(30)
            .with_enabled(false);
        assert_eq!(config.insight_interval_secs, 60);
        assert_eq!(config.match_interval_secs, 30);
        assert!(!config.enabled);
    }

    #[test]
    fn config_builder_clamps_zero_intervals() {
        let config = HeartbeatConfig::default()
            .with_insight_interval(0)
            .with_match_interval(0);
        assert_eq!(config.insight_interval_secs, 1);
        assert_eq!(config.match_interval_secs, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_config_still_starts() {
        let store = Arc::new(MockStore::new());
        let reasoning = Arc::new(MockReasoning::new());
        let config = HeartbeatConfig::default()
            .with_insight_interval(0)
            .with_match_interval(0);
        let hb = heartbeat(store, reasoning, config);

        let mut rx = hb.events();
        let handle = hb.start();

        assert!(matches!(rx.recv().await.unwrap(), HeartbeatEvent::Started));
        handle.shutdown().await.unwrap();
    }

    // -----------------------------------------------------------------------
    // Scan runs and bookkeeping
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn insight_scan_records_result() {
        let store = Arc::new(MockStore::new());
        let reasoning = Arc::new(MockReasoning::new());
        let hb = heartbeat(store, reasoning, HeartbeatConfig::default());

        let mut rx = hb.events();
        hb.run_insight_scan().await;

        let state = hb.insight.lock().unwrap().snapshot();
        assert!(!state.in_flight);
        assert!(state.started_at.is_some());
        let status = state.last_result.unwrap();
        assert_eq!(status.state, InsightState::Ok);
        assert!(matches!(
            rx.try_recv().unwrap(),
            HeartbeatEvent::InsightUpdated(_)
        ));
    }

    #[tokio::test]
    async fn match_scan_records_result_and_publishes() {
        let store = Arc::new(
            MockStore::new().with_matches(vec![keyword_match("GST basics", "New GST slabs")]),
        );
        let reasoning = Arc::new(MockReasoning::new());
        let hb = heartbeat(store, reasoning, HeartbeatConfig::default());

        let mut rx = hb.events();
        hb.run_match_scan().await;

        let state = hb.matches.lock().unwrap().snapshot();
        assert_eq!(state.last_result.unwrap().len(), 1);
        assert!(state.last_error.is_none());
        match rx.try_recv().unwrap() {
            HeartbeatEvent::MatchesUpdated(matches) => assert_eq!(matches.len(), 1),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_match_scan_records_error_and_keeps_previous_result() {
        let store = Arc::new(
            MockStore::new().with_matches(vec![keyword_match("GST basics", "New GST slabs")]),
        );
        let reasoning = Arc::new(MockReasoning::new());
        let hb = heartbeat(store.clone(), reasoning, HeartbeatConfig::default());

        hb.run_match_scan().await;
        store.fail_matches(true);

        let mut rx = hb.events();
        hb.run_match_scan().await;

        let state = hb.matches.lock().unwrap().snapshot();
        assert!(state.last_error.is_some());
        // The stale-but-valid previous result stays available for display.
        assert_eq!(state.last_result.unwrap().len(), 1);
        // No event for a failed run.
        assert!(rx.try_recv().is_err());

        // The source recovers on the next successful run.
        store.fail_matches(false);
        hb.run_match_scan().await;
        let state = hb.matches.lock().unwrap().snapshot();
        assert!(state.last_error.is_none());
    }

    #[tokio::test]
    async fn overlapping_insight_scans_coalesce() {
        let gate = Arc::new(Gate::default());
        let store = Arc::new(
            MockStore::new()
                .with_notes(vec![note("GST basics")])
                .with_articles(vec![article("New GST slabs")]),
        );
        let reasoning = Arc::new(
            MockReasoning::new()
                .with_response(r#"{"status":"ok","message":"fine","updates":[]}"#)
                .gated(gate.clone()),
        );
        let hb = Arc::new(heartbeat(store, reasoning.clone(), HeartbeatConfig::default()));

        let first = {
            let hb = hb.clone();
            tokio::spawn(async move { hb.run_insight_scan().await })
        };
        gate.entered.notified().await;
        assert!(hb.insight.lock().unwrap().in_flight);

        // Second tick while the first run is in flight: dropped, not queued.
        hb.run_insight_scan().await;
        assert_eq!(reasoning.call_count(), 1);

        gate.release.notify_one();
        first.await.unwrap();
        assert_eq!(reasoning.call_count(), 1);
        assert!(!hb.insight.lock().unwrap().in_flight);
    }

    // -----------------------------------------------------------------------
    // Scheduler lifecycle
    // -----------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn start_emits_started_and_immediate_first_scans() {
        let store = Arc::new(MockStore::new());
        let reasoning = Arc::new(MockReasoning::new());
        let hb = heartbeat(store, reasoning, HeartbeatConfig::default());

        let mut rx = hb.events();
        let handle = hb.start();

        assert!(matches!(rx.recv().await.unwrap(), HeartbeatEvent::Started));

        // Both sources tick immediately on start, in either order.
        let mut saw_insight = false;
        let mut saw_matches = false;
        while !(saw_insight && saw_matches) {
            match rx.recv().await.unwrap() {
                HeartbeatEvent::InsightUpdated(_) => saw_insight = true,
                HeartbeatEvent::MatchesUpdated(_) => saw_matches = true,
                other => panic!("unexpected event: {:?}", other),
            }
        }

        handle.shutdown().await.unwrap();
        loop {
            if matches!(rx.recv().await.unwrap(), HeartbeatEvent::Stopped) {
                break;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_heartbeat_emits_nothing() {
        let store = Arc::new(MockStore::new());
        let reasoning = Arc::new(MockReasoning::new());
        let hb = heartbeat(
            store,
            reasoning,
            HeartbeatConfig::default().with_enabled(false),
        );

        let mut rx = hb.events();
        let _handle = hb.start();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn timers_refire_on_interval() {
        let store = Arc::new(MockStore::new());
        let reasoning = Arc::new(MockReasoning::new());
        let config = HeartbeatConfig::default()
            .with_insight_interval(300)
            .with_match_interval(300);
        let hb = heartbeat(store.clone(), reasoning, config);

        let mut rx = hb.events();
        let handle = hb.start();

        // Initial tick of each source.
        let mut updates = 0;
        while updates < 2 {
            match rx.recv().await.unwrap() {
                HeartbeatEvent::InsightUpdated(_) | HeartbeatEvent::MatchesUpdated(_) => {
                    updates += 1
                }
                _ => {}
            }
        }
        let notes_after_first = store.note_calls();
        assert!(notes_after_first >= 1);

        // One full period later both sources have run again.
        let mut updates = 0;
        while updates < 2 {
            match rx.recv().await.unwrap() {
                HeartbeatEvent::InsightUpdated(_) | HeartbeatEvent::MatchesUpdated(_) => {
                    updates += 1
                }
                _ => {}
            }
        }
        assert!(store.note_calls() > notes_after_first);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn scan_now_runs_outside_the_timer() {
        let store = Arc::new(MockStore::new());
        let reasoning = Arc::new(MockReasoning::new());
        let config = HeartbeatConfig::default()
            .with_insight_interval(10_000)
            .with_match_interval(10_000);
        let hb = heartbeat(store.clone(), reasoning, config);

        let mut rx = hb.events();
        let handle = hb.start();

        let mut updates = 0;
        while updates < 2 {
            match rx.recv().await.unwrap() {
                HeartbeatEvent::InsightUpdated(_) | HeartbeatEvent::MatchesUpdated(_) => {
                    updates += 1
                }
                _ => {}
            }
        }

        let notes_before = store.note_calls();
        let matches_before = store.match_calls();
        handle.scan_now().await;
        handle.match_now().await;
        assert_eq!(store.note_calls(), notes_before + 1);
        assert_eq!(store.match_calls(), matches_before + 1);

        assert!(handle.insight_state().last_result.is_some());
        assert!(handle.match_state().last_result.is_some());
        handle.shutdown().await.unwrap();
    }
}
