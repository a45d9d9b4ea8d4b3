use crate::dom::DomSnapshot;
use crate::error::Result;
use crate::monitor::signal::PageSignal;
use tokio::sync::mpsc::UnboundedSender;

/// The page an agent is attached to
///
/// Implementations read the live document and forward in-page events as
/// [`PageSignal`]s. All methods are synchronous; the only asynchronous work
/// of the agent is the collector request.
pub trait PageHost: Send + Sync {
    /// Capture the current document, reading only `scanned_attributes`
    fn snapshot(&self, scanned_attributes: &[String]) -> Result<DomSnapshot>;

    /// Current page URL
    fn current_url(&self) -> Result<String>;

    /// Start forwarding page signals to `signals`. Hosts that load new
    /// documents should also arrange for the hooks to be installed in each
    /// of them.
    fn subscribe(&self, signals: UnboundedSender<PageSignal>) -> Result<()>;

    /// Returns true if the document is ready now. Otherwise arranges for a
    /// single [`PageSignal::Ready`] once it is, and returns false.
    fn notify_when_ready(&self) -> Result<bool>;

    /// Install the mutation observer, the history listener and the in-page
    /// scan control. Must be idempotent per document, and must fail when
    /// the hooks could not be installed.
    fn install_hooks(&self) -> Result<()>;
}
