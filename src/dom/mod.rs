//! DOM capture module
//!
//! This module provides the read-only view of a page the extractor works on:
//! - DomSnapshot: Flat, document-ordered text and attribute entries plus the page location
//! - DomNode / ElementNode: In-memory element trees, flattened with `DomSnapshot::from_body`

pub mod element;
pub mod snapshot;

pub use element::{DomNode, ElementNode};
pub use snapshot::{AttributeEntry, DomSnapshot, TextEntry};
