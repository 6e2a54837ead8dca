//! Sweetener detection over the ingredient list and the nutrition facts table.
//!
//! ```text
//! ingredients ─┐                         ┌─▶ with_quantity term ──▶ amount in NFT? ──no──▶ needs_review
//!              ├─normalize─▶ substring ──┤
//! nft text ────┘                         └─▶ no_quantity term
//! ```
//!
//! Every matching keyword is reported, in table order. A polyol needs its
//! amount in the nutrition facts table; the amount is read from
//! `name value unit` runs in that table.

use super::keywords::{NO_QUANTITY_TERMS, WITH_QUANTITY_TERMS};
use crate::engine::evaluator::Verdict;
use crate::rules::terms::{MatchSource, ScanTexts, Term};
use serde::{Deserialize, Serialize};

/// Whether a sweetener must declare its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityRequirement {
    WithQuantity,
    NoQuantity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedSweetener {
    pub name: String,
    pub sweetener_category: String,
    pub category: QuantityRequirement,
    /// Amount found next to the name in the nutrition facts table.
    pub quantity: Option<String>,
    pub source: MatchSource,
    /// `needs_review` when a quantity is required but none was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Verdict>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweetenerDetectionResult {
    pub detected: Vec<DetectedSweetener>,
    pub has_quantity_sweeteners: bool,
    pub has_no_quantity_sweeteners: bool,
}

impl SweetenerDetectionResult {
    /// Sweeteners that still need a declared amount.
    pub fn needing_review(&self) -> impl Iterator<Item = &DetectedSweetener> {
        self.detected.iter().filter(|d| d.status == Some(Verdict::NeedsReview))
    }
}

/// `(name, amount)` pairs read from nutrition facts text, in first-seen order.
/// A repeated name keeps its position and takes the later amount.
///
/// Decimal points survive normalization here so `2.5 g` stays one amount.
pub fn nft_quantities(nft_text: &str) -> Vec<(String, String)> {
    let lower = nft_text.to_lowercase();
    let cleaned = regex!(r"[^a-z0-9.\s]").replace_all(&lower, " ");
    let normalized = regex!(r"\s+").replace_all(&cleaned, " ");

    let mut pairs: Vec<(String, String)> = Vec::new();
    for caps in regex!(r"([a-z\s]+?)\s+([\d.]+\s*[gm]?[gl]?)\b").captures_iter(normalized.trim()) {
        let name = caps[1].trim().to_string();
        let amount = caps[2].trim().to_string();
        match pairs.iter_mut().find(|(n, _)| *n == name) {
            Some(pair) => pair.1 = amount,
            None => pairs.push((name, amount)),
        }
    }
    pairs
}

/// Scan `ingredients` and `nft_text` for sweeteners.
pub fn detect(ingredients: &str, nft_text: &str) -> SweetenerDetectionResult {
    let texts = ScanTexts::new(ingredients, nft_text);
    let amounts = nft_quantities(nft_text);
    let mut detected = Vec::new();

    for term in WITH_QUANTITY_TERMS.iter() {
        let Some(source) = texts.locate(term) else { continue };
        let quantity = amounts.iter().find(|(name, _)| name.contains(&term.needle)).map(|(_, amount)| amount.clone());
        let status = quantity.is_none().then_some(Verdict::NeedsReview);
        detected.push(sweetener(term, QuantityRequirement::WithQuantity, quantity, source, status));
    }
    for term in NO_QUANTITY_TERMS.iter() {
        if let Some(source) = texts.locate(term) {
            detected.push(sweetener(term, QuantityRequirement::NoQuantity, None, source, None));
        }
    }

    let has_quantity_sweeteners = detected.iter().any(|d| d.category == QuantityRequirement::WithQuantity);
    let has_no_quantity_sweeteners = detected.iter().any(|d| d.category == QuantityRequirement::NoQuantity);
    tracing::debug!(detections = detected.len(), has_quantity_sweeteners, has_no_quantity_sweeteners, "scanned for sweeteners");

    SweetenerDetectionResult { detected, has_quantity_sweeteners, has_no_quantity_sweeteners }
}

fn sweetener(
    term: &Term,
    category: QuantityRequirement,
    quantity: Option<String>,
    source: MatchSource,
    status: Option<Verdict>,
) -> DetectedSweetener {
    DetectedSweetener {
        name: term.name.to_string(),
        sweetener_category: term.category.to_string(),
        category,
        quantity,
        source,
        status,
    }
}
