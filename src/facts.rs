//! Label facts: the read-only input produced by the external extraction step.
//!
//! Extraction output is loosely shaped. A field may be a bare string, a
//! number, an object carrying `text` and `confidence`, or a list of any of
//! those. The types here accept all of these shapes so that nothing
//! downstream has to branch on representation; see
//! [`crate::engine::field_resolver`] for how they are ranked.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Panel key of the principal display panel.
pub const PANEL_PDP: &str = "panel_pdp";

/// Structured facts extracted from one product label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelFacts {
    /// One best candidate per field.
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
    /// Every extraction candidate per field.
    #[serde(default)]
    pub fields_all: HashMap<String, Vec<FieldValue>>,
    /// OCR text grouped by physical label region.
    #[serde(default)]
    pub panels: HashMap<String, Panel>,
    /// Full OCR text of the label, when the extractor provides it.
    #[serde(default)]
    pub text: Option<String>,
}

impl LabelFacts {
    /// Text of `panel`, or `""` when the panel is absent.
    pub fn panel_text(&self, panel: &str) -> &str {
        self.panels.get(panel).map(Panel::text).unwrap_or("")
    }
}

/// One extracted value, in any of the shapes the extractor emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    // Lists come first: a derived struct also accepts a JSON array.
    List(Vec<FieldValue>),
    Candidate(Candidate),
    Text(String),
    Number(serde_json::Number),
    Other(serde_json::Value),
}

/// An extraction candidate with its confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl FieldValue {
    /// Candidate built from a text and a confidence score.
    pub fn scored(text: impl Into<String>, confidence: f64) -> Self {
        FieldValue::Candidate(Candidate { text: text.into(), confidence: Some(confidence) })
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// OCR text of one label region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Panel {
    Region {
        #[serde(default)]
        text: String,
    },
    Text(String),
}

impl Panel {
    pub fn text(&self) -> &str {
        match self {
            Panel::Region { text } | Panel::Text(text) => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_mixed_field_shapes() {
        let facts: LabelFacts = serde_json::from_value(json!({
            "fields": {
                "common_name_en": {"text": "Granola Bar", "confidence": 0.8},
                "brand": "Acme",
                "nft_calories_en": 140,
                "claims": ["Organic", {"text": "Vegan"}]
            },
            "panels": {
                "panel_pdp": {"text": "GRANOLA BAR"},
                "panel_back": "Ingredients: oats"
            }
        }))
        .unwrap();

        assert!(matches!(facts.fields["common_name_en"], FieldValue::Candidate(_)));
        assert_eq!(facts.fields["brand"], FieldValue::Text("Acme".into()));
        assert!(matches!(facts.fields["nft_calories_en"], FieldValue::Number(_)));
        assert!(matches!(facts.fields["claims"], FieldValue::List(_)));
        assert_eq!(facts.panel_text(PANEL_PDP), "GRANOLA BAR");
        assert_eq!(facts.panel_text("panel_back"), "Ingredients: oats");
        assert_eq!(facts.panel_text("panel_side"), "");
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let facts: LabelFacts = serde_json::from_value(json!({})).unwrap();
        assert!(facts.fields.is_empty());
        assert!(facts.fields_all.is_empty());
        assert!(facts.panels.is_empty());
        assert!(facts.text.is_none());
    }
}
