//! Deterministic question evaluation.
//!
//! Each call is a pure function of a [`RuleQuestion`] and the [`LabelFacts`]:
//!
//! ```text
//! RuleQuestion ──▶ dispatch on logic ──┬─ field_exists ───────┐
//!                                      ├─ in_panel ───────────┤
//!                                      ├─ regex ──────────────┼──▶ Some(EvaluationResult)
//!                                      ├─ always_needs_review ┘
//!                                      └─ external ─────────────▶ None (route elsewhere)
//! ```
//!
//! Field values are looked up through [`field_resolver`], so a question never
//! sees how the extractor shaped a field.

use super::field_resolver;
use crate::error::ConfigError;
use crate::facts::{LabelFacts, PANEL_PDP};
use crate::question::{QuestionLogic, RawQuestion, RuleQuestion};
use serde::{Deserialize, Serialize};

/// Outcome of one compliance question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
    NeedsReview,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Fail => "fail",
            Verdict::NeedsReview => "needs_review",
        }
    }

    /// `Pass` iff `ok`.
    pub fn from_bool(ok: bool) -> Self {
        if ok { Verdict::Pass } else { Verdict::Fail }
    }
}

/// Result of evaluating one question against one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub question_id: String,
    pub question_text: String,
    pub result: Verdict,
    pub selected_value: Option<String>,
    pub rationale: String,
}

/// Evaluates [`RuleQuestion`]s with closed-form logic.
#[derive(Debug, Clone)]
pub struct Evaluator {
    default_panel: String,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator { default_panel: PANEL_PDP.to_string() }
    }
}

impl Evaluator {
    /// Evaluator whose `in_panel` questions default to `default_panel`.
    pub fn with_default_panel(default_panel: impl Into<String>) -> Self {
        Evaluator { default_panel: default_panel.into() }
    }

    /// Evaluate a validated question.
    ///
    /// Returns `None` when the question is not answerable deterministically and
    /// must be routed to the external semantic evaluator.
    pub fn evaluate(&self, question: &RuleQuestion, facts: &LabelFacts) -> Option<EvaluationResult> {
        let result = match &question.logic {
            QuestionLogic::FieldExists { field } => field_exists(question, facts, field),
            QuestionLogic::InPanel { field, panel } => {
                let panel = panel.as_deref().unwrap_or(&self.default_panel);
                in_panel(question, facts, field, panel)
            }
            QuestionLogic::Regex { field, pattern } => regex_match(question, facts, field, pattern),
            QuestionLogic::AlwaysNeedsReview => always_needs_review(question),
            QuestionLogic::External(logic) => {
                tracing::debug!(question = %question.id, ?logic, "routing question to semantic evaluator");
                return None;
            }
        };

        tracing::debug!(question = %question.id, logic = question.logic.name(), result = result.result.as_str(), "evaluated");
        Some(result)
    }

    /// Validate and evaluate a raw question record.
    ///
    /// A malformed record is reported as a [`ConfigError`] rather than a `fail`
    /// verdict: it is a defect in the checklist, not in the label.
    pub fn evaluate_raw(
        &self,
        raw: &RawQuestion,
        facts: &LabelFacts,
        strict_logic: bool,
    ) -> Result<Option<EvaluationResult>, ConfigError> {
        let question = RuleQuestion::from_raw(raw, strict_logic)?;
        Ok(self.evaluate(&question, facts))
    }
}

fn result(question: &RuleQuestion, verdict: Verdict, selected: Option<String>, rationale: String) -> EvaluationResult {
    EvaluationResult {
        question_id: question.id.clone(),
        question_text: question.text.clone(),
        result: verdict,
        selected_value: selected,
        rationale,
    }
}

fn field_exists(question: &RuleQuestion, facts: &LabelFacts, field: &str) -> EvaluationResult {
    match field_resolver::resolve(facts, field) {
        Some(value) => result(
            question,
            Verdict::Pass,
            Some(value),
            format!("Field '{field}' found in extracted data."),
        ),
        None => result(
            question,
            Verdict::Fail,
            Some("Not found".to_string()),
            format!("Field '{field}' not found in extracted data."),
        ),
    }
}

fn in_panel(question: &RuleQuestion, facts: &LabelFacts, field: &str, panel: &str) -> EvaluationResult {
    let Some(value) = field_resolver::resolve(facts, field) else {
        return result(question, Verdict::Fail, None, format!("Field '{field}' not found in extracted data."));
    };

    let found = facts.panel_text(panel).to_lowercase().contains(&value.to_lowercase());
    let rationale = format!("'{value}' {} in {panel}.", if found { "found" } else { "not found" });
    result(question, Verdict::from_bool(found), Some(value), rationale)
}

fn regex_match(question: &RuleQuestion, facts: &LabelFacts, field: &str, pattern: &regex::Regex) -> EvaluationResult {
    let Some(value) = field_resolver::resolve(facts, field) else {
        return result(question, Verdict::Fail, None, format!("Field '{field}' not found."));
    };

    let matched = pattern.is_match(&value);
    let rationale = format!(
        "Pattern '{}' {} value '{value}'.",
        pattern.as_str(),
        if matched { "matched" } else { "did not match" }
    );
    result(question, Verdict::from_bool(matched), Some(value), rationale)
}

fn always_needs_review(question: &RuleQuestion) -> EvaluationResult {
    result(
        question,
        Verdict::NeedsReview,
        None,
        "Requires physical inspection or visual verification.".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn facts() -> LabelFacts {
        serde_json::from_value(json!({
            "fields": {
                "lot_code": "LOT 2024-118",
                "brand": {"text": "Acme", "confidence": 0.7}
            },
            "fields_all": {
                "common_name_en": [
                    {"text": "", "confidence": 0.9},
                    {"text": "Granola Bar", "confidence": 0.2}
                ]
            },
            "panels": {
                "panel_pdp": {"text": "GRANOLA BAR, 200g"},
                "panel_back": {"text": "Made by Acme Foods"}
            }
        }))
        .unwrap()
    }

    fn question(raw: serde_json::Value) -> RuleQuestion {
        let raw: RawQuestion = serde_json::from_value(raw).unwrap();
        RuleQuestion::from_raw(&raw, false).unwrap()
    }

    #[test]
    fn field_exists_uses_best_non_empty_candidate() {
        let q = question(json!({"id": "cn-1", "text": "Common name?", "logic": "field_exists", "field": "common_name_en"}));
        let r = Evaluator::default().evaluate(&q, &facts()).unwrap();
        assert_eq!(r.result, Verdict::Pass);
        assert_eq!(r.selected_value.as_deref(), Some("Granola Bar"));
        assert_eq!(r.rationale, "Field 'common_name_en' found in extracted data.");
    }

    #[test]
    fn field_exists_reports_not_found() {
        let q = question(json!({"id": "q", "text": "Allergen statement?", "logic": "field_exists", "field": "contains"}));
        let r = Evaluator::default().evaluate(&q, &facts()).unwrap();
        assert_eq!(r.result, Verdict::Fail);
        assert_eq!(r.selected_value.as_deref(), Some("Not found"));
        assert_eq!(r.rationale, "Field 'contains' not found in extracted data.");
    }

    #[test]
    fn in_panel_is_case_insensitive_and_defaults_to_pdp() {
        let q = question(json!({"id": "cn-2", "text": "On PDP?", "logic": "in_panel", "field": "common_name_en"}));
        let r = Evaluator::default().evaluate(&q, &facts()).unwrap();
        assert_eq!(r.result, Verdict::Pass);
        assert_eq!(r.rationale, "'Granola Bar' found in panel_pdp.");
    }

    #[test]
    fn in_panel_checks_named_panel() {
        let q = question(json!({"id": "b", "text": "Brand on back?", "logic": "in_panel", "field": "brand", "panel": "panel_back"}));
        assert_eq!(Evaluator::default().evaluate(&q, &facts()).unwrap().result, Verdict::Pass);

        let q = question(json!({"id": "b", "text": "Brand on PDP?", "logic": "in_panel", "field": "brand"}));
        let r = Evaluator::default().evaluate(&q, &facts()).unwrap();
        assert_eq!(r.result, Verdict::Fail);
        assert_eq!(r.rationale, "'Acme' not found in panel_pdp.");

        let q = question(json!({"id": "b", "text": "Brand on side?", "logic": "in_panel", "field": "brand", "panel": "panel_side"}));
        assert_eq!(Evaluator::default().evaluate(&q, &facts()).unwrap().result, Verdict::Fail);
    }

    #[test]
    fn in_panel_fails_on_unresolved_field() {
        let q = question(json!({"id": "x", "text": "?", "logic": "in_panel", "field": "missing"}));
        let r = Evaluator::default().evaluate(&q, &facts()).unwrap();
        assert_eq!(r.result, Verdict::Fail);
        assert_eq!(r.selected_value, None);
    }

    #[test]
    fn configured_default_panel_is_used() {
        let q = question(json!({"id": "b", "text": "Brand?", "logic": "in_panel", "field": "brand"}));
        let r = Evaluator::with_default_panel("panel_back").evaluate(&q, &facts()).unwrap();
        assert_eq!(r.result, Verdict::Pass);
    }

    #[test]
    fn regex_matches_unanchored_and_case_insensitive() {
        let q = question(json!({"id": "lot", "text": "Lot code?", "logic": "regex", "field": "lot_code", "pattern": r"lot \d{4}"}));
        let r = Evaluator::default().evaluate(&q, &facts()).unwrap();
        assert_eq!(r.result, Verdict::Pass);
        assert_eq!(r.rationale, r"Pattern 'lot \d{4}' matched value 'LOT 2024-118'.");

        let q = question(json!({"id": "lot", "text": "Lot code?", "logic": "regex", "field": "lot_code", "pattern": r"^\d+$"}));
        assert_eq!(Evaluator::default().evaluate(&q, &facts()).unwrap().result, Verdict::Fail);
    }

    #[test]
    fn whitespace_value_counts_as_present() {
        let f: LabelFacts = serde_json::from_value(json!({"fields": {"brand": " ", "lot": ""}})).unwrap();
        let q = question(json!({"id": "b", "text": "Brand?", "logic": "field_exists", "field": "brand"}));
        let r = Evaluator::default().evaluate(&q, &f).unwrap();
        assert_eq!(r.result, Verdict::Pass);
        assert_eq!(r.selected_value.as_deref(), Some(" "));

        let q = question(json!({"id": "l", "text": "Lot?", "logic": "field_exists", "field": "lot"}));
        assert_eq!(Evaluator::default().evaluate(&q, &f).unwrap().result, Verdict::Fail);
    }

    #[test]
    fn always_needs_review_ignores_facts() {
        let q = question(json!({"id": "v", "text": "Legible?", "logic": "always_needs_review"}));
        let r = Evaluator::default().evaluate(&q, &LabelFacts::default()).unwrap();
        assert_eq!(r.result, Verdict::NeedsReview);
        assert_eq!(r.rationale, "Requires physical inspection or visual verification.");
    }

    #[test]
    fn external_logic_is_not_handled() {
        let q = question(json!({"id": "s", "text": "Is the name misleading?", "logic": "semantic"}));
        assert!(Evaluator::default().evaluate(&q, &facts()).is_none());
    }

    #[test]
    fn evaluate_raw_reports_config_errors() {
        let raw: RawQuestion = serde_json::from_value(json!({"id": "r", "text": "?", "logic": "regex", "field": "lot_code"})).unwrap();
        let err = Evaluator::default().evaluate_raw(&raw, &facts(), false).unwrap_err();
        assert!(matches!(err, ConfigError::MissingAttribute { attribute: "pattern", .. }));
    }

    #[test]
    fn evaluation_is_repeatable() {
        let q = question(json!({"id": "cn-2", "text": "On PDP?", "logic": "in_panel", "field": "common_name_en"}));
        let f = facts();
        let ev = Evaluator::default();
        assert_eq!(ev.evaluate(&q, &f), ev.evaluate(&q, &f));
    }
}
