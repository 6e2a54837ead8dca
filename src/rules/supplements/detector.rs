//! Supplement detection over the ingredient list and the nutrition facts
//! table. Every matching keyword is reported, in table order.

use super::keywords::SUPPLEMENT_TERMS;
use crate::rules::terms::{MatchSource, ScanTexts};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedSupplement {
    pub name: String,
    pub category: String,
    pub source: MatchSource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplementDetectionResult {
    pub detected: Vec<DetectedSupplement>,
    pub has_supplements: bool,
}

impl SupplementDetectionResult {
    /// Distinct categories, in detection order.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for d in &self.detected {
            if !out.contains(&d.category.as_str()) {
                out.push(&d.category);
            }
        }
        out
    }
}

/// Scan `ingredients` and `nft_text` for supplemented ingredients.
pub fn detect(ingredients: &str, nft_text: &str) -> SupplementDetectionResult {
    let texts = ScanTexts::new(ingredients, nft_text);
    let detected: Vec<DetectedSupplement> = SUPPLEMENT_TERMS
        .iter()
        .filter_map(|term| {
            texts.locate(term).map(|source| DetectedSupplement {
                name: term.name.to_string(),
                category: term.category.to_string(),
                source,
            })
        })
        .collect();

    let has_supplements = !detected.is_empty();
    tracing::debug!(detections = detected.len(), "scanned for supplements");
    SupplementDetectionResult { detected, has_supplements }
}
