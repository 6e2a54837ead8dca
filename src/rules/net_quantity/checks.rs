//! Net quantity checklist.
//!
//! Five fixed questions answered from the best net quantity candidate and its
//! parse. Every check yields an [`EvaluationResult`] so the checklist reports
//! the same way as configured questions.

use crate::engine::evaluator::{EvaluationResult, Verdict};
use crate::engine::field_resolver::ResolvedField;
use crate::facts::LabelFacts;
use crate::rules::net_quantity::helpers::{format_value, is_metric_symbol, is_spelled_unit, significant_figures};
use crate::rules::net_quantity::parser::{self, NetQuantityParseResult};
use serde::{Deserialize, Serialize};

pub const CHECK_PRESENT: &str = "net_quantity.present";
pub const CHECK_ON_PDP: &str = "net_quantity.on_pdp";
pub const CHECK_MANNER: &str = "net_quantity.manner";
pub const CHECK_ROUNDING: &str = "net_quantity.rounding";
pub const CHECK_BILINGUAL: &str = "net_quantity.bilingual_symbols";

/// Characters of full label text searched when no PDP text was extracted.
const LABEL_TEXT_FALLBACK_CHARS: usize = 5000;

/// Knobs for [`evaluate`].
#[derive(Debug, Clone)]
pub struct NetQuantityOptions {
    /// Confidence at or above which a present declaration passes outright.
    pub min_confidence: f64,
    /// Panel holding the principal display panel text.
    pub pdp_panel: String,
}

impl Default for NetQuantityOptions {
    fn default() -> Self {
        NetQuantityOptions { min_confidence: 0.5, pdp_panel: crate::facts::PANEL_PDP.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetQuantityReport {
    pub extracted_value: Option<String>,
    pub extraction_confidence: f64,
    pub parsed: NetQuantityParseResult,
    pub results: Vec<EvaluationResult>,
    pub overall_status: Verdict,
}

/// Run the whole checklist.
pub fn evaluate(facts: &LabelFacts, opts: &NetQuantityOptions) -> NetQuantityReport {
    let best = parser::best_candidate(facts);
    let parsed = best.as_ref().map(|c| parser::parse_text(&c.text)).unwrap_or_default();

    let results = vec![
        check_present(best.as_ref(), opts.min_confidence),
        check_on_pdp(facts, best.as_ref(), &parsed, &opts.pdp_panel),
        check_manner(best.as_ref(), &parsed),
        check_rounding(best.as_ref(), &parsed),
        check_bilingual_symbols(best.as_ref(), &parsed),
    ];
    let overall_status = overall(&results);
    tracing::debug!(status = overall_status.as_str(), "net quantity checklist");

    NetQuantityReport {
        extracted_value: best.as_ref().map(|c| c.text.clone()),
        extraction_confidence: best.as_ref().map_or(0.0, |c| c.confidence),
        parsed,
        results,
        overall_status,
    }
}

/// `fail` if anything failed, else `needs_review` if anything needs review.
pub fn overall(results: &[EvaluationResult]) -> Verdict {
    if results.iter().any(|r| r.result == Verdict::Fail) {
        Verdict::Fail
    } else if results.iter().any(|r| r.result == Verdict::NeedsReview) {
        Verdict::NeedsReview
    } else {
        Verdict::Pass
    }
}

fn outcome(id: &str, text: &str, verdict: Verdict, selected: Option<&str>, rationale: String) -> EvaluationResult {
    EvaluationResult {
        question_id: id.to_string(),
        question_text: text.to_string(),
        result: verdict,
        selected_value: selected.map(str::to_string),
        rationale,
    }
}

fn check_present(best: Option<&ResolvedField>, min_confidence: f64) -> EvaluationResult {
    const TEXT: &str = "Is a net quantity declaration present?";
    let Some(best) = best else {
        return outcome(CHECK_PRESENT, TEXT, Verdict::Fail, None, "No net quantity declaration found on the label.".into());
    };
    let pct = (best.confidence * 100.0).round();
    if best.confidence >= min_confidence {
        outcome(
            CHECK_PRESENT,
            TEXT,
            Verdict::Pass,
            Some(&best.text),
            format!("Net quantity '{}' is present (confidence: {pct}%).", best.text),
        )
    } else {
        outcome(
            CHECK_PRESENT,
            TEXT,
            Verdict::NeedsReview,
            Some(&best.text),
            format!("Net quantity '{}' detected with low confidence ({pct}%).", best.text),
        )
    }
}

fn check_on_pdp(
    facts: &LabelFacts,
    best: Option<&ResolvedField>,
    parsed: &NetQuantityParseResult,
    pdp_panel: &str,
) -> EvaluationResult {
    const TEXT: &str = "Is the net quantity declared on the principal display panel?";
    let Some(best) = best else {
        return outcome(CHECK_ON_PDP, TEXT, Verdict::NeedsReview, None, "No net quantity identified.".into());
    };

    let mut pdp_text = facts.panel_text(pdp_panel).to_string();
    if pdp_text.is_empty() {
        pdp_text = facts.text.as_deref().unwrap_or_default().chars().take(LABEL_TEXT_FALLBACK_CHARS).collect();
    }
    if pdp_text.is_empty() {
        return outcome(
            CHECK_ON_PDP,
            TEXT,
            Verdict::NeedsReview,
            Some(&best.text),
            "No principal display panel text available.".into(),
        );
    }

    let haystack = pdp_text.to_lowercase();
    let value_str = parsed.value.filter(|v| *v != 0.0).map(format_value);
    let found = haystack.contains(&best.text.to_lowercase())
        || value_str.as_deref().is_some_and(|v| haystack.contains(v));

    let (verdict, rationale) = if found {
        (Verdict::Pass, format!("Net quantity '{}' found on {pdp_panel}.", best.text))
    } else {
        (Verdict::Fail, format!("Net quantity '{}' not found on {pdp_panel}.", best.text))
    };
    outcome(CHECK_ON_PDP, TEXT, verdict, Some(&best.text), rationale)
}

fn check_manner(best: Option<&ResolvedField>, parsed: &NetQuantityParseResult) -> EvaluationResult {
    const TEXT: &str = "Is the appropriate manner (volume, weight, count) used?";
    let Some(best) = best else {
        return outcome(CHECK_MANNER, TEXT, Verdict::NeedsReview, None, "No net quantity identified.".into());
    };
    let selected = Some(best.text.as_str());

    match (parsed.manner, parsed.unit.as_deref()) {
        (Some(manner), unit) => outcome(
            CHECK_MANNER,
            TEXT,
            Verdict::Pass,
            selected,
            format!("Declared by {} (unit: {}).", manner.as_str(), unit.unwrap_or("count")),
        ),
        (None, Some(unit)) => outcome(
            CHECK_MANNER,
            TEXT,
            Verdict::NeedsReview,
            selected,
            format!("Unit '{unit}' detected but manner unclear."),
        ),
        (None, None) => outcome(CHECK_MANNER, TEXT, Verdict::NeedsReview, selected, "No unit detected.".into()),
    }
}

fn check_rounding(best: Option<&ResolvedField>, parsed: &NetQuantityParseResult) -> EvaluationResult {
    const TEXT: &str = "Is the net quantity rounded to three figures (unless below 100)?";
    let Some(best) = best else {
        return outcome(CHECK_ROUNDING, TEXT, Verdict::NeedsReview, None, "No net quantity identified.".into());
    };
    let selected = Some(best.text.as_str());
    let Some(value) = parsed.value else {
        return outcome(CHECK_ROUNDING, TEXT, Verdict::NeedsReview, selected, "No numeric value to check.".into());
    };

    if value < 100.0 {
        return outcome(
            CHECK_ROUNDING,
            TEXT,
            Verdict::Pass,
            selected,
            format!("Value {} is below 100.", format_value(value)),
        );
    }
    if value.fract() != 0.0 {
        return outcome(
            CHECK_ROUNDING,
            TEXT,
            Verdict::NeedsReview,
            selected,
            format!("Value {value} contains decimals."),
        );
    }

    let figures = significant_figures(value as u64);
    let verdict = if figures <= 3 { Verdict::Pass } else { Verdict::NeedsReview };
    outcome(
        CHECK_ROUNDING,
        TEXT,
        verdict,
        selected,
        format!("Value {} has {figures} significant figures.", format_value(value)),
    )
}

fn check_bilingual_symbols(best: Option<&ResolvedField>, parsed: &NetQuantityParseResult) -> EvaluationResult {
    const TEXT: &str = "Are correct bilingual symbols used?";
    let Some(best) = best else {
        return outcome(CHECK_BILINGUAL, TEXT, Verdict::NeedsReview, None, "No net quantity identified.".into());
    };
    let selected = Some(best.text.as_str());
    let Some(unit) = parsed.unit.as_deref() else {
        return outcome(CHECK_BILINGUAL, TEXT, Verdict::NeedsReview, selected, "No unit detected.".into());
    };

    if is_metric_symbol(unit) {
        outcome(
            CHECK_BILINGUAL,
            TEXT,
            Verdict::Pass,
            selected,
            format!("Metric symbol '{unit}' is bilingual."),
        )
    } else if is_spelled_unit(unit) {
        outcome(
            CHECK_BILINGUAL,
            TEXT,
            Verdict::NeedsReview,
            selected,
            format!("Spelled-out unit '{unit}' needs a bilingual declaration."),
        )
    } else {
        outcome(CHECK_BILINGUAL, TEXT, Verdict::NeedsReview, selected, format!("Unit '{unit}' is not a metric symbol."))
    }
}
