//! The per-page agent session
//!
//! An [`Agent`] bundles the extractor, the dispatcher and the page it reads
//! from. It is created once per attached page and lives as long as the page.

use crate::config::AgentConfig;
use crate::dispatch::{DispatchDecision, Dispatcher, HttpSink, PhraseSink};
use crate::error::Result;
use crate::extractor::{Extractor, PhraseSet};
use crate::monitor::{ChangeMonitor, PageHost};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Result of one extraction pass
#[derive(Debug)]
pub struct ScanOutcome {
    /// Phrases found on the page
    pub phrases: PhraseSet,

    /// What the dispatcher did with them
    pub decision: DispatchDecision,
}

/// Phrase agent attached to one page
#[derive(Clone)]
pub struct Agent {
    config: Arc<AgentConfig>,
    host: Arc<dyn PageHost>,
    extractor: Extractor,
    dispatcher: Dispatcher,
}

impl Agent {
    /// Create an agent delivering to a custom sink
    pub fn new(config: AgentConfig, host: Arc<dyn PageHost>, sink: Arc<dyn PhraseSink>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            extractor: Extractor::from_config(&config),
            dispatcher: Dispatcher::from_config(&config, sink),
            config: Arc::new(config),
            host,
        })
    }

    /// Create an agent posting to the configured HTTP endpoint
    pub fn attach(config: AgentConfig, host: Arc<dyn PageHost>) -> Result<Self> {
        config.validate()?;
        let sink = HttpSink::new(config.endpoint.clone(), config.request_timeout)?;
        Self::new(config, host, Arc::new(sink))
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn host(&self) -> &Arc<dyn PageHost> {
        &self.host
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run one extraction pass right away and hand the result to the
    /// dispatcher. The collector request, if any, runs detached.
    pub fn scan_now(&self) -> Result<ScanOutcome> {
        let snapshot = self.host.snapshot(&self.config.scanned_attributes)?;
        let phrases = self.extractor.extract(&snapshot);
        let decision = self.dispatcher.try_dispatch(&phrases, &snapshot);

        Ok(ScanOutcome { phrases, decision })
    }

    /// Subscribe to the page and start the change monitor
    ///
    /// The returned handle only ends when the page stops delivering signals;
    /// there is no other shutdown path.
    pub fn start(&self) -> Result<AgentHandle> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.host.subscribe(tx)?;

        let monitor = ChangeMonitor::new(self.clone(), rx);
        let task = tokio::spawn(monitor.run());

        Ok(AgentHandle { task })
    }
}

/// Handle to a running change monitor
#[derive(Debug)]
pub struct AgentHandle {
    task: JoinHandle<()>,
}

impl AgentHandle {
    /// Wait for the monitor to stop
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            if e.is_panic() {
                log::error!("Change monitor panicked: {}", e);
            }
        }
    }

    /// Stop the monitor; in-flight collector requests keep running
    pub fn abort(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
