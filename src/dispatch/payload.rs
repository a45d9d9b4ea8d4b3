use crate::extractor::PhraseSet;
use serde::{Deserialize, Serialize};

/// Source type reported for phrases harvested from web pages
pub const SOURCE_TYPE_WEB: &str = "web";

/// A single phrase as understood by the collector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Phrase {
    pub source_text: String,

    /// Page path the phrase was seen on
    pub context: String,
}

/// Batch of phrases posted to the collector endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhrasePayload {
    pub project_key: String,
    pub source_url: String,
    pub source_type: String,
    pub phrases: Vec<Phrase>,
}

impl PhrasePayload {
    /// Build a payload from one extraction pass, keeping the set's order
    pub fn from_phrases(
        project_key: impl Into<String>,
        source_url: impl Into<String>,
        path: &str,
        phrases: &PhraseSet,
    ) -> Self {
        Self {
            project_key: project_key.into(),
            source_url: source_url.into(),
            source_type: SOURCE_TYPE_WEB.to_string(),
            phrases: phrases
                .iter()
                .map(|text| Phrase {
                    source_text: text.to_string(),
                    context: path.to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format() {
        let mut set = PhraseSet::new();
        set.insert("Hello");
        set.insert("Sign in");

        let payload = PhrasePayload::from_phrases("proj-42", "https://app.example/login?next=/", "/login", &set);

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "projectKey": "proj-42",
                "sourceUrl": "https://app.example/login?next=/",
                "sourceType": "web",
                "phrases": [
                    {"sourceText": "Hello", "context": "/login"},
                    {"sourceText": "Sign in", "context": "/login"}
                ]
            })
        );
    }
}
