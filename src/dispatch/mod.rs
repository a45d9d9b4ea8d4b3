//! Rate-limited delivery of extracted phrases
//!
//! - PhrasePayload: The JSON batch posted to the collector
//! - PhraseSink / HttpSink: Where batches go
//! - Dispatcher: The send-eligibility gate and the detached send task

pub mod payload;
pub mod sink;

pub use payload::{Phrase, PhrasePayload};
pub use sink::{HttpSink, PhraseSink};

use crate::config::AgentConfig;
use crate::dom::DomSnapshot;
use crate::extractor::PhraseSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Prefix of every dispatch failure log line
pub const DISPATCH_ERROR_PREFIX: &str = "[locally] phrase dispatch failed:";

/// Mutable dispatch bookkeeping, shared with in-flight sends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchState {
    /// Completion time of the last successful send, `None` until one succeeds
    pub last_send: Option<Instant>,
}

/// What the dispatcher did with one extraction pass
#[derive(Debug)]
pub enum DispatchDecision {
    /// Nothing to send
    Empty,

    /// The minimum interval has not elapsed; the batch is dropped
    Throttled { remaining: Duration },

    /// A send was started; the handle resolves once it settles
    Sent(JoinHandle<()>),
}

impl DispatchDecision {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchDecision::Sent(_))
    }
}

/// Decides whether a pass is shipped and ships it
///
/// Sends are not serialized: two eligible passes before the first send
/// settles both go out, and the later completion wins the timestamp.
#[derive(Clone)]
pub struct Dispatcher {
    project_key: String,
    min_send_interval: Duration,
    sink: Arc<dyn PhraseSink>,
    state: Arc<Mutex<DispatchState>>,
}

impl Dispatcher {
    pub fn new(project_key: impl Into<String>, min_send_interval: Duration, sink: Arc<dyn PhraseSink>) -> Self {
        Self {
            project_key: project_key.into(),
            min_send_interval,
            sink,
            state: Arc::new(Mutex::new(DispatchState::default())),
        }
    }

    pub fn from_config(config: &AgentConfig, sink: Arc<dyn PhraseSink>) -> Self {
        Self::new(config.project_key.clone(), config.min_send_interval, sink)
    }

    /// Current dispatch state
    pub fn state(&self) -> DispatchState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Time left before a send is allowed, `None` when one is allowed now
    pub fn remaining_interval(&self, now: Instant) -> Option<Duration> {
        let last_send = self.state().last_send?;
        let elapsed = now.saturating_duration_since(last_send);
        if elapsed > self.min_send_interval {
            None
        } else {
            // Strictly greater is required, so a zero remainder still waits.
            Some((self.min_send_interval - elapsed).max(Duration::from_millis(1)))
        }
    }

    /// Apply the eligibility rule to a finished pass and start a send if it
    /// passes. Never waits for the network; must run inside a tokio runtime.
    pub fn try_dispatch(&self, phrases: &PhraseSet, snapshot: &DomSnapshot) -> DispatchDecision {
        if phrases.is_empty() {
            return DispatchDecision::Empty;
        }

        if let Some(remaining) = self.remaining_interval(Instant::now()) {
            log::debug!(
                "Skipping dispatch of {} phrases, {}ms until next send",
                phrases.len(),
                remaining.as_millis()
            );
            return DispatchDecision::Throttled { remaining };
        }

        let payload = PhrasePayload::from_phrases(&self.project_key, &snapshot.url, &snapshot.path, phrases);
        let sink = Arc::clone(&self.sink);
        let state = Arc::clone(&self.state);

        let handle = tokio::spawn(async move {
            let count = payload.phrases.len();
            match sink.submit(&payload).await {
                Ok(_) => {
                    state.lock().unwrap_or_else(PoisonError::into_inner).last_send = Some(Instant::now());
                    log::info!("Dispatched {} phrases from {}", count, payload.source_url);
                }
                Err(e) => {
                    log::error!("{} {}", DISPATCH_ERROR_PREFIX, e);
                }
            }
        });

        DispatchDecision::Sent(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AgentError, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    /// Sink answering every request with a fixed outcome
    struct FixedSink {
        status: u16,
        calls: Mutex<Vec<PhrasePayload>>,
    }

    impl FixedSink {
        fn new(status: u16) -> Arc<Self> {
            Arc::new(Self { status, calls: Mutex::new(Vec::new()) })
        }

        fn calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PhraseSink for FixedSink {
        async fn submit(&self, payload: &PhrasePayload) -> Result<serde_json::Value> {
            self.calls.lock().unwrap().push(payload.clone());
            if (200..300).contains(&self.status) {
                Ok(serde_json::json!({}))
            } else {
                Err(AgentError::Rejected { status: self.status })
            }
        }
    }

    /// Sink holding each request until the gate keyed by its first phrase opens
    struct GatedSink {
        gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
        calls: AtomicUsize,
    }

    impl GatedSink {
        fn new(gates: Vec<(&str, oneshot::Receiver<()>)>) -> Arc<Self> {
            Arc::new(Self {
                gates: Mutex::new(gates.into_iter().map(|(k, rx)| (k.to_string(), rx)).collect()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PhraseSink for GatedSink {
        async fn submit(&self, payload: &PhrasePayload) -> Result<serde_json::Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gates.lock().unwrap().remove(&payload.phrases[0].source_text);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(serde_json::json!({}))
        }
    }

    fn phrases(items: &[&str]) -> PhraseSet {
        let mut set = PhraseSet::new();
        for item in items {
            set.insert(item);
        }
        set
    }

    fn snapshot() -> DomSnapshot {
        DomSnapshot::new("https://app.example/home", "/home")
    }

    async fn settle(decision: DispatchDecision) {
        match decision {
            DispatchDecision::Sent(handle) => handle.await.unwrap(),
            other => panic!("Expected a send, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_set_is_not_sent() {
        let sink = FixedSink::new(200);
        let dispatcher = Dispatcher::new("proj", Duration::from_secs(10), sink.clone());

        assert!(matches!(dispatcher.try_dispatch(&PhraseSet::new(), &snapshot()), DispatchDecision::Empty));
        assert_eq!(sink.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_pass_within_interval_is_throttled() {
        let sink = FixedSink::new(200);
        let dispatcher = Dispatcher::new("proj", Duration::from_secs(10), sink.clone());

        settle(dispatcher.try_dispatch(&phrases(&["Hello"]), &snapshot())).await;
        tokio::time::advance(Duration::from_secs(3)).await;

        let decision = dispatcher.try_dispatch(&phrases(&["Hello", "Changed content"]), &snapshot());
        match decision {
            DispatchDecision::Throttled { remaining } => assert_eq!(remaining, Duration::from_secs(7)),
            other => panic!("Expected throttling, got {:?}", other),
        }
        assert_eq!(sink.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_must_be_strictly_exceeded() {
        let sink = FixedSink::new(200);
        let dispatcher = Dispatcher::new("proj", Duration::from_secs(10), sink.clone());

        settle(dispatcher.try_dispatch(&phrases(&["Hello"]), &snapshot())).await;

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(!dispatcher.try_dispatch(&phrases(&["Hello"]), &snapshot()).is_sent());

        tokio::time::advance(Duration::from_millis(1)).await;
        settle(dispatcher.try_dispatch(&phrases(&["Hello"]), &snapshot())).await;
        assert_eq!(sink.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_records_timestamp() {
        let sink = FixedSink::new(200);
        let dispatcher = Dispatcher::new("proj", Duration::from_secs(10), sink.clone());
        assert_eq!(dispatcher.state().last_send, None);

        settle(dispatcher.try_dispatch(&phrases(&["Hello"]), &snapshot())).await;

        assert_eq!(dispatcher.state().last_send, Some(Instant::now()));
        assert!(dispatcher.remaining_interval(Instant::now()).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_leaves_timestamp_untouched() {
        let sink = FixedSink::new(500);
        let dispatcher = Dispatcher::new("proj", Duration::from_secs(10), sink.clone());

        settle(dispatcher.try_dispatch(&phrases(&["Hello"]), &snapshot())).await;
        assert_eq!(dispatcher.state().last_send, None);

        tokio::time::advance(Duration::from_millis(1)).await;
        settle(dispatcher.try_dispatch(&phrases(&["Hello"]), &snapshot())).await;
        assert_eq!(sink.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_neither_shortens_nor_extends_gate() {
        let ok = FixedSink::new(200);
        let failing = FixedSink::new(500);
        let dispatcher = Dispatcher::new("proj", Duration::from_secs(10), ok.clone());
        settle(dispatcher.try_dispatch(&phrases(&["Hello"]), &snapshot())).await;
        let first_send = dispatcher.state().last_send;

        // Same shared state, different outcome for the next send.
        let failing_dispatcher = Dispatcher { sink: failing.clone(), ..dispatcher.clone() };

        tokio::time::advance(Duration::from_secs(11)).await;
        settle(failing_dispatcher.try_dispatch(&phrases(&["Hello"]), &snapshot())).await;
        assert_eq!(failing_dispatcher.state().last_send, first_send);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(failing_dispatcher.try_dispatch(&phrases(&["Hello"]), &snapshot()).is_sent());
    }

    #[tokio::test(start_paused = true)]
    async fn test_payload_carries_snapshot_location() {
        let sink = FixedSink::new(200);
        let dispatcher = Dispatcher::new("proj-7", Duration::from_secs(10), sink.clone());

        settle(dispatcher.try_dispatch(&phrases(&["Hello", "World"]), &snapshot())).await;

        let calls = sink.calls.lock().unwrap();
        assert_eq!(calls[0].project_key, "proj-7");
        assert_eq!(calls[0].source_url, "https://app.example/home");
        assert_eq!(calls[0].phrases[1], Phrase { source_text: "World".into(), context: "/home".into() });
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_sends_last_completion_wins() {
        let (open_first, first_gate) = oneshot::channel();
        let (open_second, second_gate) = oneshot::channel();
        let sink = GatedSink::new(vec![("Alpha", first_gate), ("Beta", second_gate)]);
        let dispatcher = Dispatcher::new("proj", Duration::from_secs(10), sink.clone());

        // Neither send has settled, so the second pass is still eligible
        let first = dispatcher.try_dispatch(&phrases(&["Alpha"]), &snapshot());
        let second = dispatcher.try_dispatch(&phrases(&["Beta"]), &snapshot());
        assert!(first.is_sent());
        assert!(second.is_sent());

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(sink.calls.load(Ordering::SeqCst), 2);
        assert_eq!(dispatcher.state().last_send, None);

        open_second.send(()).unwrap();
        settle(second).await;
        let second_done = Instant::now();
        assert_eq!(dispatcher.state().last_send, Some(second_done));

        tokio::time::advance(Duration::from_millis(5)).await;
        open_first.send(()).unwrap();
        settle(first).await;
        let first_done = Instant::now();

        assert!(first_done > second_done);
        assert_eq!(dispatcher.state().last_send, Some(first_done));
    }
}
