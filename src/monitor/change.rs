use crate::agent::Agent;
use crate::monitor::signal::PageSignal;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Decides when the agent re-extracts
///
/// Triggers are qualifying mutation batches, history navigations, in-page
/// scan requests, newly loaded documents and polled URL changes. Signals
/// that queued up while a pass was running are merged into one pass.
pub struct ChangeMonitor {
    agent: Agent,
    signals: UnboundedReceiver<PageSignal>,
    last_url: Option<String>,
    hooks_installed: bool,
}

impl ChangeMonitor {
    pub fn new(agent: Agent, signals: UnboundedReceiver<PageSignal>) -> Self {
        Self {
            agent,
            signals,
            last_url: None,
            hooks_installed: false,
        }
    }

    /// Last URL seen by the poller
    pub fn last_url(&self) -> Option<&str> {
        self.last_url.as_deref()
    }

    /// Run until the page stops delivering signals
    pub async fn run(mut self) {
        if !self.wait_until_ready().await {
            log::debug!("Page went away before it became ready");
            return;
        }

        // The first pass reflects the initial page before any watcher exists.
        self.extract("initial load");

        self.install_hooks();
        self.last_url = self.read_url();

        let period = self.agent.config().poll_interval;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                signal = self.signals.recv() => match signal {
                    Some(signal) => self.handle_signals(signal),
                    None => break,
                },
                _ = ticker.tick() => self.poll_url(),
            }
        }

        log::debug!("Change monitor stopped");
    }

    async fn wait_until_ready(&mut self) -> bool {
        match self.agent.host().notify_when_ready() {
            Ok(true) => return true,
            Ok(false) => {}
            Err(e) => {
                log::warn!("Could not query document readiness, waiting for ready signal: {}", e);
            }
        }

        while let Some(signal) = self.signals.recv().await {
            if signal == PageSignal::Ready {
                return true;
            }
            log::debug!("Ignoring {:?} before document is ready", signal);
        }

        false
    }

    /// Handle `first` together with everything already queued behind it
    fn handle_signals(&mut self, first: PageSignal) {
        let mut reason = self.note_signal(&first);
        let mut merged = 1;

        while let Ok(next) = self.signals.try_recv() {
            merged += 1;
            reason = reason.or(self.note_signal(&next));
        }

        if merged > 1 {
            log::debug!("Merged {} queued page signals", merged);
        }
        if let Some(reason) = reason {
            self.extract(reason);
        }
    }

    /// Record what a signal says about the page, returning why it needs a pass
    fn note_signal(&mut self, signal: &PageSignal) -> Option<&'static str> {
        if *signal == PageSignal::DocumentLoaded {
            self.hooks_installed = true;
        }
        if !signal.triggers_extraction() {
            return None;
        }

        match signal {
            PageSignal::Mutations { .. } => Some("dom mutation"),
            PageSignal::HistoryNavigation => Some("history navigation"),
            PageSignal::ScanRequested => Some("scan request"),
            PageSignal::DocumentLoaded => Some("document load"),
            PageSignal::Ready => None,
        }
    }

    fn poll_url(&mut self) {
        if !self.hooks_installed {
            self.install_hooks();
        }

        let Some(current) = self.read_url() else {
            return;
        };

        if self.last_url.as_deref() == Some(current.as_str()) {
            return;
        }

        log::debug!("URL changed to {}", current);
        self.last_url = Some(current);

        // A full document load discards the previous document's hooks.
        self.install_hooks();
        self.extract("url change");
    }

    fn install_hooks(&mut self) {
        match self.agent.host().install_hooks() {
            Ok(()) => self.hooks_installed = true,
            Err(e) => {
                if self.hooks_installed {
                    log::warn!("Page hooks lost, retrying on the next poll: {}", e);
                } else {
                    log::debug!("Page hooks not installed yet, retrying on the next poll: {}", e);
                }
                self.hooks_installed = false;
            }
        }
    }

    fn read_url(&self) -> Option<String> {
        match self.agent.host().current_url() {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("Failed to read page URL: {}", e);
                None
            }
        }
    }

    fn extract(&self, reason: &str) {
        match self.agent.scan_now() {
            Ok(outcome) => {
                log::debug!(
                    "Extraction pass ({}) found {} phrases, sent: {}",
                    reason,
                    outcome.phrases.len(),
                    outcome.decision.is_sent()
                );
            }
            Err(e) => log::warn!("Extraction pass ({}) failed: {}", reason, e),
        }
    }
}
