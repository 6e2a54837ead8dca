//! Allergen and gluten-source detection over ingredient text.
//!
//! ```text
//! ingredients ──normalize──▶ "contains wheat flour soy lecithin"
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!   allergen keywords (longest first)     gluten keywords (longest first)
//!            │                                        │
//!   substring hit? category unseen?       substring hit? category unseen?
//!            └──────────────┬─────────────────────────┘
//!                           ▼
//!               Vec<DetectedAllergenOrGluten>
//! ```
//!
//! Matching is plain substring search on the normalized text, so a keyword can
//! hit inside a longer word ("butter" in "butternut"). Ordering keywords by
//! length only makes sure the most specific keyword names the category.

use super::keywords::{ALLERGEN_KEYWORDS, GLUTEN_KEYWORDS, Keyword};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

bitflags::bitflags! {
    /// Keyword universes to scan.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct DetectionScope: u8 {
        const ALLERGENS = 1 << 0;
        const GLUTEN    = 1 << 1;
    }
}

impl Default for DetectionScope {
    fn default() -> Self {
        DetectionScope::all()
    }
}

/// Which universe a detection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionKind {
    Allergen,
    Gluten,
}

/// One detected category, named by the keyword that found it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedAllergenOrGluten {
    pub name: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: DetectionKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergenGlutenDetectionResult {
    pub detected: Vec<DetectedAllergenOrGluten>,
    pub has_allergens: bool,
    pub has_gluten: bool,
}

impl AllergenGlutenDetectionResult {
    /// Categories detected for `kind`, in detection order.
    pub fn categories(&self, kind: DetectionKind) -> Vec<&str> {
        self.detected.iter().filter(|d| d.kind == kind).map(|d| d.category.as_str()).collect()
    }
}

/// Lowercase, replace everything outside `[a-z0-9\s]` with a space, collapse
/// whitespace and trim.
pub fn normalize_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let cleaned = regex!(r"[^a-z0-9\s]").replace_all(&lower, " ");
    regex!(r"\s+").replace_all(&cleaned, " ").trim().to_string()
}

/// Scan `ingredients` for every allergen and gluten category.
pub fn detect(ingredients: &str) -> AllergenGlutenDetectionResult {
    detect_with(ingredients, DetectionScope::all())
}

/// Scan `ingredients` for the universes in `scope`.
pub fn detect_with(ingredients: &str, scope: DetectionScope) -> AllergenGlutenDetectionResult {
    let normalized = normalize_text(ingredients);
    let mut detected = Vec::new();

    if scope.contains(DetectionScope::ALLERGENS) {
        scan(&normalized, &ALLERGEN_KEYWORDS, DetectionKind::Allergen, &mut detected);
    }
    if scope.contains(DetectionScope::GLUTEN) {
        scan(&normalized, &GLUTEN_KEYWORDS, DetectionKind::Gluten, &mut detected);
    }

    let has_allergens = detected.iter().any(|d| d.kind == DetectionKind::Allergen);
    let has_gluten = detected.iter().any(|d| d.kind == DetectionKind::Gluten);
    tracing::debug!(detections = detected.len(), has_allergens, has_gluten, "scanned ingredients");

    AllergenGlutenDetectionResult { detected, has_allergens, has_gluten }
}

/// First keyword per category wins; categories are tracked per universe.
fn scan(normalized: &str, keywords: &[Keyword], kind: DetectionKind, out: &mut Vec<DetectedAllergenOrGluten>) {
    let mut seen: HashSet<&'static str> = HashSet::new();
    for kw in keywords {
        if normalized.contains(kw.keyword) && seen.insert(kw.category) {
            out.push(DetectedAllergenOrGluten {
                name: kw.keyword.to_string(),
                category: kw.category.to_string(),
                kind,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(result: &AllergenGlutenDetectionResult) -> Vec<(&str, &str, DetectionKind)> {
        result.detected.iter().map(|d| (d.name.as_str(), d.category.as_str(), d.kind)).collect()
    }

    #[test]
    fn normalizes_punctuation_and_whitespace() {
        assert_eq!(normalize_text("  Wheat-Flour,\n\tSOY (lecithin).  "), "wheat flour soy lecithin");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("Crème fraîche"), "cr me fra che");
    }

    #[test]
    fn detects_wheat_and_soy_in_both_universes() {
        let result = detect("contains wheat flour, soy lecithin");

        assert_eq!(
            names(&result),
            vec![
                ("soy lecithin", "Soy", DetectionKind::Allergen),
                ("wheat flour", "Wheat and Triticale", DetectionKind::Allergen),
                ("lecithin", "Eggs", DetectionKind::Allergen),
                ("wheat flour", "Wheat", DetectionKind::Gluten),
            ]
        );
        assert!(result.has_allergens);
        assert!(result.has_gluten);
    }

    #[test]
    fn one_detection_per_category() {
        let result = detect("Milk, cream, butter, whey powder, cheese");
        assert_eq!(result.categories(DetectionKind::Allergen), vec!["Milk"]);
        assert_eq!(result.detected[0].name, "butter");
        assert!(!result.has_gluten);
    }

    #[test]
    fn gluten_only_ingredients() {
        let result = detect("Rolled OATS, barley malt extract");
        assert_eq!(result.categories(DetectionKind::Gluten), vec!["Barley", "Oats"]);
        assert_eq!(result.detected[0].name, "barley malt");
        assert!(!result.has_allergens);
        assert!(result.has_gluten);
    }

    #[test]
    fn substring_matches_are_kept() {
        // "butter" also hits inside "butternut".
        let result = detect("roasted butternut squash");
        let allergens = result.categories(DetectionKind::Allergen);
        assert!(allergens.contains(&"Tree Nuts"));
        assert!(allergens.contains(&"Milk"));
    }

    #[test]
    fn empty_text_detects_nothing() {
        let result = detect("   ");
        assert!(result.detected.is_empty());
        assert!(!result.has_allergens);
        assert!(!result.has_gluten);
    }

    #[test]
    fn scope_limits_universes() {
        let result = detect_with("wheat flour", DetectionScope::GLUTEN);
        assert_eq!(names(&result), vec![("wheat flour", "Wheat", DetectionKind::Gluten)]);
        assert!(!result.has_allergens);

        let result = detect_with("wheat flour", DetectionScope::empty());
        assert!(result.detected.is_empty());
    }

    #[test]
    fn detection_is_repeatable() {
        let text = "Sugar, peanuts, sesame oil, wheat";
        assert_eq!(detect(text), detect(text));
    }
}
