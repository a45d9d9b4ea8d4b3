//! # locally-agent
//!
//! Harvests translatable phrases from a live web page and ships them to a
//! Locally phrase-collection endpoint. The page is driven over the Chrome
//! DevTools Protocol (CDP).
//!
//! ## Features
//!
//! - **Extraction**: Visible text and `placeholder`/`alt`/`title`/`aria-label` values, deduplicated
//! - **Rate-limited dispatch**: At most one successful batch per interval, failures logged and dropped
//! - **Change monitoring**: Re-extraction on DOM mutations, history navigation, reloads and URL changes
//! - **In-page control**: `window.locallyScan()` requests an immediate pass
//!
//! ## Running the agent
//!
//! ```bash
//! locally-agent --project my-project --endpoint https://api.example.com/phrases/extract --url https://example.com
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use locally_agent::{AgentConfig, BrowserSession, LaunchOptions};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> locally_agent::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("https://example.com")?;
//!
//! let config = AgentConfig::new("my-project", "https://api.example.com/phrases/extract");
//! let agent = session.attach_agent(config)?;
//!
//! // Ask for a pass right away; the send itself runs in the background
//! let outcome = agent.scan_now()?;
//! println!("Found {} phrases", outcome.phrases.len());
//!
//! // Keep watching the page
//! agent.start()?.wait().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`dom`]: DOM snapshot model
//! - [`extractor`]: Phrase extraction passes
//! - [`dispatch`]: Payload format, collector sinks and the send gate
//! - [`monitor`]: Page signals and the change monitor
//! - [`agent`]: The per-page agent session
//! - [`browser`]: Chrome session management and the CDP page host
//! - [`config`]: Agent configuration
//! - [`error`]: Error types and result aliases

pub mod agent;
pub mod browser;
pub mod config;
pub mod dispatch;
pub mod dom;
pub mod error;
pub mod extractor;
pub mod monitor;

pub use agent::{Agent, AgentHandle, ScanOutcome};
pub use browser::{BrowserSession, ChromePage, ConnectionOptions, LaunchOptions};
pub use config::AgentConfig;
pub use dispatch::{DispatchDecision, Dispatcher, HttpSink, PhrasePayload, PhraseSink};
pub use dom::{AttributeEntry, DomNode, DomSnapshot, ElementNode, TextEntry};
pub use error::{AgentError, Result};
pub use extractor::{Extractor, PhraseSet};
pub use monitor::{ChangeMonitor, MutationRecord, PageHost, PageSignal};
