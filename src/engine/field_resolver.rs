//! Field resolution.
//!
//! Turns a logical field name into ranked textual candidates. Every shape a
//! [`FieldValue`] can take is flattened into [`ResolvedField`]s here, so the
//! evaluator and the parsers only ever see a [`RankedCandidates`] list.
//!
//! ```text
//! fields_all[name] ──flatten──▶ drop empty ──▶ non-empty? ──yes──▶ rank
//!                                                  │
//!                                                  no
//!                                                  ▼
//! fields[name] ──────flatten──▶ drop empty ──▶ rank (or miss)
//! ```
//!
//! Ranking is a stable sort on descending confidence, so ties keep the order in
//! which the extractor listed them. Candidates without a score get
//! [`DEFAULT_CONFIDENCE`] unless the caller ranks with its own
//! [`CandidatePolicy`].

use crate::facts::{FieldValue, LabelFacts};
use std::cmp::Ordering;

/// Confidence assigned to candidates that carry no score.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// How raw values become candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidatePolicy {
    /// Confidence for `{"text": ...}` objects that carry no score. Bare
    /// strings and numbers always get [`DEFAULT_CONFIDENCE`].
    pub unscored: f64,
    /// Trim candidate text, so whitespace-only values become misses.
    pub trim: bool,
}

impl CandidatePolicy {
    /// Only the empty string is a miss; `" "` is a value.
    pub const LENIENT: CandidatePolicy = CandidatePolicy { unscored: DEFAULT_CONFIDENCE, trim: false };
}

impl Default for CandidatePolicy {
    fn default() -> Self {
        CandidatePolicy::LENIENT
    }
}

/// Which section of [`LabelFacts`] a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// `fields_all`
    AllCandidates,
    /// `fields`
    BestCandidate,
}

/// A single non-empty candidate value.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    pub field: String,
    pub text: String,
    pub confidence: f64,
    pub source: FieldSource,
}

/// Non-empty list of candidates, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidates {
    candidates: Vec<ResolvedField>,
}

impl RankedCandidates {
    fn rank(mut candidates: Vec<ResolvedField>) -> Option<Self> {
        if candidates.is_empty() {
            return None;
        }
        // `sort_by` is stable: equal confidences keep extraction order.
        candidates.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(Ordering::Equal));
        Some(RankedCandidates { candidates })
    }

    /// Highest-confidence candidate.
    pub fn best(&self) -> &ResolvedField {
        &self.candidates[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedField> {
        self.candidates.iter()
    }

    pub fn into_best(mut self) -> ResolvedField {
        self.candidates.swap_remove(0)
    }
}

/// Resolve `field` to the text of its best non-empty candidate.
pub fn resolve(facts: &LabelFacts, field: &str) -> Option<String> {
    rank(facts, field).map(|ranked| ranked.into_best().text)
}

/// Resolve `field` to its best candidate, keeping confidence and source.
pub fn resolve_candidate(facts: &LabelFacts, field: &str) -> Option<ResolvedField> {
    rank(facts, field).map(RankedCandidates::into_best)
}

/// All non-empty candidates for `field`, best first.
pub fn rank(facts: &LabelFacts, field: &str) -> Option<RankedCandidates> {
    rank_many(facts, &[field])
}

/// Rank candidates across several fields at once.
///
/// `fields_all` is consulted for every name before `fields` is consulted for
/// any, so a scored candidate list always beats a single best-guess value.
/// Within a section, earlier names win confidence ties.
pub fn rank_many(facts: &LabelFacts, fields: &[&str]) -> Option<RankedCandidates> {
    rank_many_with(facts, fields, CandidatePolicy::LENIENT)
}

/// [`rank_many`] with an explicit [`CandidatePolicy`].
pub fn rank_many_with(facts: &LabelFacts, fields: &[&str], policy: CandidatePolicy) -> Option<RankedCandidates> {
    let mut all = Vec::new();
    for name in fields {
        if let Some(values) = facts.fields_all.get(*name) {
            for value in values {
                flatten(name, value, FieldSource::AllCandidates, policy, &mut all);
            }
        }
    }
    if let Some(ranked) = RankedCandidates::rank(all) {
        return Some(ranked);
    }

    let mut best = Vec::new();
    for name in fields {
        if let Some(value) = facts.fields.get(*name) {
            flatten(name, value, FieldSource::BestCandidate, policy, &mut best);
        }
    }
    let ranked = RankedCandidates::rank(best);
    if ranked.is_none() {
        tracing::trace!(?fields, "field resolution miss");
    }
    ranked
}

fn flatten(field: &str, value: &FieldValue, source: FieldSource, policy: CandidatePolicy, out: &mut Vec<ResolvedField>) {
    let (text, confidence) = match value {
        FieldValue::Candidate(c) => (c.text.clone(), c.confidence.unwrap_or(policy.unscored)),
        FieldValue::Text(s) => (s.clone(), DEFAULT_CONFIDENCE),
        FieldValue::Number(n) => (n.to_string(), DEFAULT_CONFIDENCE),
        FieldValue::List(items) => {
            for item in items {
                flatten(field, item, source, policy, out);
            }
            return;
        }
        FieldValue::Other(_) => return,
    };

    let text = if policy.trim { text.trim().to_string() } else { text };
    if text.is_empty() {
        return;
    }
    out.push(ResolvedField { field: field.to_string(), text, confidence, source });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn facts(value: serde_json::Value) -> LabelFacts {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn skips_empty_high_confidence_candidate() {
        let f = facts(json!({
            "fields_all": {
                "common_name_en": [
                    {"text": "", "confidence": 0.9},
                    {"text": "Granola Bar", "confidence": 0.2}
                ]
            }
        }));
        assert_eq!(resolve(&f, "common_name_en").as_deref(), Some("Granola Bar"));
    }

    #[test]
    fn ranks_by_confidence_with_stable_ties() {
        let f = facts(json!({
            "fields_all": {
                "brand": [
                    {"text": "first", "confidence": 0.4},
                    {"text": "second", "confidence": 0.7},
                    {"text": "third", "confidence": 0.7}
                ]
            }
        }));
        let ranked = rank(&f, "brand").unwrap();
        let texts: Vec<&str> = ranked.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "third", "first"]);
        assert_eq!(ranked.best().source, FieldSource::AllCandidates);
    }

    #[test]
    fn falls_back_to_best_field_with_default_confidence() {
        let f = facts(json!({
            "fields": {"brand": "Acme", "lot": {"text": "L123"}},
            "fields_all": {"brand": [{"text": "", "confidence": 0.9}]}
        }));

        let brand = resolve_candidate(&f, "brand").unwrap();
        assert_eq!(brand.text, "Acme");
        assert_eq!(brand.confidence, DEFAULT_CONFIDENCE);
        assert_eq!(brand.source, FieldSource::BestCandidate);

        assert_eq!(resolve(&f, "lot").as_deref(), Some("L123"));
    }

    #[test]
    fn list_in_best_field_resolves_to_first_element() {
        let f = facts(json!({"fields": {"claims": ["Organic", "Vegan"]}}));
        assert_eq!(resolve(&f, "claims").as_deref(), Some("Organic"));
    }

    #[test]
    fn numbers_resolve_to_their_text() {
        let f = facts(json!({"fields": {"nft_calories_en": 140}}));
        assert_eq!(resolve(&f, "nft_calories_en").as_deref(), Some("140"));
    }

    #[test]
    fn absent_field_is_a_miss() {
        let f = facts(json!({"fields": {"brand": ""}}));
        assert_eq!(resolve(&f, "brand"), None);
        assert_eq!(resolve(&f, "nothing"), None);
    }

    #[test]
    fn whitespace_is_a_value_unless_trimmed() {
        let f = facts(json!({"fields": {"brand": " ", "lot": {"text": "  L123 "}}}));
        assert_eq!(resolve(&f, "brand").as_deref(), Some(" "));

        let trimmed = CandidatePolicy { trim: true, ..CandidatePolicy::LENIENT };
        assert_eq!(rank_many_with(&f, &["brand"], trimmed), None);
        assert_eq!(rank_many_with(&f, &["lot"], trimmed).unwrap().best().text, "L123");
    }

    #[test]
    fn policy_scores_unscored_objects_only() {
        let f = facts(json!({
            "fields": {"a": {"text": "object"}, "b": "bare"},
            "fields_all": {"c": [{"text": "listed"}, {"text": "scored", "confidence": 0.1}]}
        }));
        let policy = CandidatePolicy { unscored: 0.0, trim: false };

        assert_eq!(rank_many_with(&f, &["a"], policy).unwrap().best().confidence, 0.0);
        assert_eq!(rank_many_with(&f, &["b"], policy).unwrap().best().confidence, DEFAULT_CONFIDENCE);
        let ranked = rank_many_with(&f, &["c"], policy).unwrap();
        assert_eq!(ranked.best().text, "scored");
        assert_eq!(rank_many(&f, &["c"]).unwrap().best().text, "listed");
    }

    #[test]
    fn rank_many_prefers_scored_candidates_across_fields() {
        let f = facts(json!({
            "fields": {"net_quantity_full_text": {"text": "1 kg", "confidence": 0.99}},
            "fields_all": {
                "net_quantity_full_text": [{"text": "500 g", "confidence": 0.3}],
                "net_quantity_value": [{"text": "500", "confidence": 0.8}]
            }
        }));
        let best = rank_many(&f, &["net_quantity_full_text", "net_quantity_value"]).unwrap().into_best();
        assert_eq!(best.text, "500");
        assert_eq!(best.field, "net_quantity_value");
    }
}
