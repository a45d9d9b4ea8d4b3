use crate::dom::element::ElementNode;
use crate::error::{AgentError, Result};
use headless_chrome::Tab;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A non-blank text node and the tag of its parent element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextEntry {
    pub parent_tag: String,

    /// Untrimmed node content
    pub text: String,
}

/// One scanned attribute found on an element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeEntry {
    pub name: String,
    pub value: String,
}

/// The harvestable content of a page at one point in time
///
/// Both lists are flat and in document order, so the size of a snapshot
/// does not depend on how deeply the page is nested.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DomSnapshot {
    /// Full page URL (`location.href`)
    pub url: String,

    /// Page path (`location.pathname`), sent as phrase context
    pub path: String,

    /// Non-blank text nodes under the body
    #[serde(default)]
    pub texts: Vec<TextEntry>,

    /// Scanned attributes on the body and its descendants, per element in
    /// scan order
    #[serde(default)]
    pub attributes: Vec<AttributeEntry>,
}

impl DomSnapshot {
    /// Create a snapshot of a page with no harvestable content
    pub fn new(url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Flatten an in-memory body the same way the page script does
    pub fn from_body(
        url: impl Into<String>,
        path: impl Into<String>,
        body: Option<&ElementNode>,
        scanned_attributes: &[String],
    ) -> Self {
        let mut snapshot = Self::new(url, path);
        let Some(body) = body else {
            return snapshot;
        };

        body.walk_text(&mut |parent, text| {
            if !text.trim().is_empty() {
                snapshot.texts.push(TextEntry {
                    parent_tag: parent.tag_name.to_ascii_lowercase(),
                    text: text.to_string(),
                });
            }
        });

        body.walk_elements(&mut |element| {
            for name in scanned_attributes {
                if let Some(value) = element.get_attribute(name) {
                    snapshot.attributes.push(AttributeEntry {
                        name: name.clone(),
                        value: value.clone(),
                    });
                }
            }
        });

        snapshot
    }

    /// Capture the live document of a browser tab
    pub fn from_tab(tab: &Arc<Tab>, scanned_attributes: &[String]) -> Result<Self> {
        let names = serde_json::to_string(scanned_attributes)
            .map_err(|e| AgentError::DomParseFailed(format!("Failed to encode attribute names: {}", e)))?;
        let js_code = format!("{}({})", include_str!("snapshot_dom.js").trim_end(), names);

        let result = tab
            .evaluate(&js_code, false)
            .map_err(|e| AgentError::DomParseFailed(format!("Failed to execute snapshot script: {}", e)))?;

        let json_value = result
            .value
            .ok_or_else(|| AgentError::DomParseFailed("No value returned from snapshot script".to_string()))?;

        // The script returns a JSON string, unwrap it before parsing the snapshot
        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| AgentError::DomParseFailed(format!("Failed to get JSON string: {}", e)))?;

        Self::from_json(&json_str)
    }

    /// Parse a snapshot produced by the snapshot script
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| AgentError::DomParseFailed(format!("Failed to parse snapshot JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SCANNED_ATTRIBUTES;

    fn scanned() -> Vec<String> {
        DEFAULT_SCANNED_ATTRIBUTES.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "url": "https://shop.example/cart?x=1",
            "path": "/cart",
            "texts": [{"parent_tag": "h1", "text": " Checkout "}],
            "attributes": [{"name": "alt", "value": "Cart icon"}]
        }"#;

        let snapshot = DomSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.url, "https://shop.example/cart?x=1");
        assert_eq!(snapshot.path, "/cart");
        assert_eq!(snapshot.texts, vec![TextEntry { parent_tag: "h1".into(), text: " Checkout ".into() }]);
        assert_eq!(snapshot.attributes, vec![AttributeEntry { name: "alt".into(), value: "Cart icon".into() }]);
    }

    #[test]
    fn test_from_json_without_body() {
        let snapshot = DomSnapshot::from_json(r#"{"url": "about:blank", "path": "blank"}"#).unwrap();
        assert!(snapshot.texts.is_empty());
        assert!(snapshot.attributes.is_empty());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = DomSnapshot::from_json("not json").unwrap_err();
        assert!(matches!(err, AgentError::DomParseFailed(_)));
    }

    #[test]
    fn test_from_body_flattens_in_document_order() {
        let body = ElementNode::new("body")
            .with_child(ElementNode::new("P").with_text("First").with_text("   "))
            .with_child(
                ElementNode::new("input")
                    .with_attribute("aria-label", "Email")
                    .with_attribute("placeholder", "you@example.com")
                    .with_attribute("name", "email"),
            );

        let snapshot = DomSnapshot::from_body("https://a.example/", "/", Some(&body), &scanned());

        assert_eq!(snapshot.texts, vec![TextEntry { parent_tag: "p".into(), text: "First".into() }]);
        assert_eq!(
            snapshot.attributes,
            vec![
                AttributeEntry { name: "placeholder".into(), value: "you@example.com".into() },
                AttributeEntry { name: "aria-label".into(), value: "Email".into() },
            ]
        );
    }

    #[test]
    fn test_deeply_nested_page_round_trips() {
        let mut node = ElementNode::new("div").with_text("Deep label");
        for _ in 0..199 {
            node = ElementNode::new("div").with_child(node);
        }
        let body = ElementNode::new("body").with_child(node);

        let snapshot = DomSnapshot::from_body("https://a.example/deep", "/deep", Some(&body), &scanned());
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed = DomSnapshot::from_json(&json).unwrap();

        assert_eq!(parsed.texts, vec![TextEntry { parent_tag: "div".into(), text: "Deep label".into() }]);
    }
}
