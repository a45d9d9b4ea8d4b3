use crate::dom::DomSnapshot;
use crate::error::{AgentError, Result};
use crate::monitor::{PageHost, PageSignal};
use headless_chrome::Tab;
use headless_chrome::protocol::cdp::{Page, Runtime};
use headless_chrome::protocol::cdp::types::Event;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Name of the runtime binding the in-page scripts report through
pub const BINDING_NAME: &str = "__locallySignal";

const PAGE_HOOKS_JS: &str = include_str!("page_hooks.js");

/// Outcome reported by the page hook script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStatus {
    /// Hooks were installed now
    Installed,

    /// The document already carries the hooks
    Present,

    /// The document is still loading; hooks go in on DOMContentLoaded
    Deferred,
}

impl HookStatus {
    /// Decode the status string returned by the hook script
    pub fn parse(status: &str) -> Result<Self> {
        match status {
            "installed" => Ok(HookStatus::Installed),
            "present" => Ok(HookStatus::Present),
            "deferred" => Ok(HookStatus::Deferred),
            "no-binding" => Err(AgentError::HookInstallFailed(format!(
                "binding {} is not available in the page",
                BINDING_NAME
            ))),
            "no-body" => Err(AgentError::HookInstallFailed("document has no body".to_string())),
            other => Err(AgentError::HookInstallFailed(format!("unexpected hook status '{}'", other))),
        }
    }
}

/// A Chrome tab driven over CDP, seen as a [`PageHost`]
#[derive(Clone)]
pub struct ChromePage {
    tab: Arc<Tab>,
}

impl ChromePage {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    fn evaluate_bool(&self, js_code: &str) -> Result<bool> {
        let result = self
            .tab
            .evaluate(js_code, false)
            .map_err(|e| AgentError::EvaluationFailed(e.to_string()))?;

        Ok(result.value.and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

impl PageHost for ChromePage {
    fn snapshot(&self, scanned_attributes: &[String]) -> Result<DomSnapshot> {
        DomSnapshot::from_tab(&self.tab, scanned_attributes)
    }

    fn current_url(&self) -> Result<String> {
        let result = self
            .tab
            .evaluate("window.location.href", false)
            .map_err(|e| AgentError::EvaluationFailed(format!("Failed to read location: {}", e)))?;

        result
            .value
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or_else(|| AgentError::EvaluationFailed("location.href is not a string".to_string()))
    }

    fn subscribe(&self, signals: UnboundedSender<PageSignal>) -> Result<()> {
        self.tab
            .call_method(Runtime::Enable(None))
            .map_err(|e| AgentError::HookInstallFailed(format!("Failed to enable runtime domain: {}", e)))?;

        // Bindings added without a context id survive navigations.
        self.tab
            .call_method(Runtime::AddBinding {
                name: BINDING_NAME.to_string(),
                execution_context_id: None,
                execution_context_name: None,
            })
            .map_err(|e| AgentError::HookInstallFailed(format!("Failed to add binding: {}", e)))?;

        let listener = Arc::new(move |event: &Event| {
            let Event::RuntimeBindingCalled(called) = event else {
                return;
            };
            if called.params.name != BINDING_NAME {
                return;
            }

            match PageSignal::from_binding_payload(&called.params.payload) {
                Ok(signal) => {
                    // A closed channel means the monitor is gone.
                    let _ = signals.send(signal);
                }
                Err(e) => log::debug!("{}", e),
            }
        });

        self.tab
            .add_event_listener(listener)
            .map_err(|e| AgentError::HookInstallFailed(format!("Failed to add event listener: {}", e)))?;

        // Reloads and full navigations get their hooks without a round trip
        // through the monitor.
        self.tab
            .call_method(Page::AddScriptToEvaluateOnNewDocument {
                source: format!("{}(true)", PAGE_HOOKS_JS.trim_end()),
                world_name: None,
                include_command_line_api: None,
                run_immediately: None,
            })
            .map_err(|e| AgentError::HookInstallFailed(format!("Failed to register new-document hooks: {}", e)))?;

        Ok(())
    }

    fn notify_when_ready(&self) -> Result<bool> {
        self.evaluate_bool(include_str!("ready.js"))
    }

    fn install_hooks(&self) -> Result<()> {
        let result = self
            .tab
            .evaluate(&format!("{}(false)", PAGE_HOOKS_JS.trim_end()), false)
            .map_err(|e| AgentError::HookInstallFailed(e.to_string()))?;

        let status = result
            .value
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or_else(|| AgentError::HookInstallFailed("hook script returned no status".to_string()))?;

        match HookStatus::parse(&status)? {
            HookStatus::Installed => log::debug!("Installed page hooks"),
            HookStatus::Present => log::trace!("Page hooks already present"),
            HookStatus::Deferred => log::debug!("Page hooks deferred until DOMContentLoaded"),
        }
        Ok(())
    }
}
