//! Browser hosting
//!
//! Launch or connect to Chrome over CDP and expose a tab as a [`PageHost`](crate::monitor::PageHost).

pub mod config;
pub mod page;
pub mod session;
pub mod url;

pub use config::{ConnectionOptions, LaunchOptions};
pub use page::ChromePage;
pub use session::BrowserSession;
pub use url::normalize_url;
