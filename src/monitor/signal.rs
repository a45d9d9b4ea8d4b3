use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};

/// Summary of one in-page mutation record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MutationRecord {
    /// Nodes were added to or removed from a parent
    ChildList {
        #[serde(default)]
        added: usize,
        #[serde(default)]
        removed: usize,
    },

    /// A text node's data changed
    CharacterData,
}

impl MutationRecord {
    /// Whether this record warrants a new extraction pass
    pub fn is_qualifying(&self) -> bool {
        match self {
            MutationRecord::ChildList { added, removed } => added + removed > 0,
            MutationRecord::CharacterData => true,
        }
    }
}

/// Notification delivered from the page to the change monitor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageSignal {
    /// The document finished parsing
    Ready,

    /// One observer callback worth of mutation records
    Mutations { records: Vec<MutationRecord> },

    /// Back/forward navigation (`popstate`)
    HistoryNavigation,

    /// The page asked for an immediate scan (`window.locallyScan()`)
    ScanRequested,

    /// A new document (reload or full navigation) installed its own hooks
    DocumentLoaded,
}

impl PageSignal {
    /// Decode the JSON string passed to the page binding
    pub fn from_binding_payload(payload: &str) -> Result<Self> {
        serde_json::from_str(payload)
            .map_err(|e| AgentError::EvaluationFailed(format!("Unrecognized page signal '{}': {}", payload, e)))
    }

    /// Whether handling this signal requires an extraction pass
    pub fn triggers_extraction(&self) -> bool {
        match self {
            PageSignal::Mutations { records } => records.iter().any(MutationRecord::is_qualifying),
            PageSignal::HistoryNavigation | PageSignal::ScanRequested | PageSignal::DocumentLoaded => true,
            PageSignal::Ready => false,
        }
    }
}
