//! Change monitoring
//!
//! - PageHost: The page abstraction the agent reads and subscribes to
//! - PageSignal / MutationRecord: Events forwarded from the page
//! - ChangeMonitor: Turns signals and URL polling into extraction passes

pub mod change;
pub mod host;
pub mod signal;

pub use change::ChangeMonitor;
pub use host::PageHost;
pub use signal::{MutationRecord, PageSignal};
