use crate::engine::field_resolver::{self, CandidatePolicy, ResolvedField};
use crate::facts::LabelFacts;
use crate::rules::net_quantity::helpers::{classify_unit, parse_decimal};
use serde::{Deserialize, Serialize};

/// Fields holding the declared net quantity, in priority order.
pub const NET_QUANTITY_FIELDS: &[&str] = &["net_quantity_full_text", "net_quantity_value"];

/// How a quantity is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Manner {
    Volume,
    Weight,
    Count,
}

impl Manner {
    pub fn as_str(self) -> &'static str {
        match self {
            Manner::Volume => "volume",
            Manner::Weight => "weight",
            Manner::Count => "count",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetQuantityParseResult {
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub manner: Option<Manner>,
    pub raw_text: Option<String>,
}

/// Candidate objects without a score count as unconfident here, and padding
/// around the declaration is dropped.
pub const NET_QUANTITY_POLICY: CandidatePolicy = CandidatePolicy { unscored: 0.0, trim: true };

/// Highest-confidence net quantity candidate across [`NET_QUANTITY_FIELDS`].
pub fn best_candidate(facts: &LabelFacts) -> Option<ResolvedField> {
    field_resolver::rank_many_with(facts, NET_QUANTITY_FIELDS, NET_QUANTITY_POLICY).map(|ranked| ranked.into_best())
}

/// Resolve and parse the declared net quantity of a label.
pub fn parse(facts: &LabelFacts) -> NetQuantityParseResult {
    match best_candidate(facts) {
        Some(candidate) => parse_text(&candidate.text),
        None => NetQuantityParseResult::default(),
    }
}

/// Parse a net quantity declaration such as `"500 mL"`, `"1,5 kg"` or
/// `"20 Bars"`.
///
/// Only the first number and the unit token right after it are read. A comma
/// is a decimal separator. Text with no number yields only `raw_text`.
pub fn parse_text(text: &str) -> NetQuantityParseResult {
    let raw_text = text.trim().to_string();
    let clean = raw_text.replace(['\r', '\n'], " ");

    let Some(caps) = regex!(r"([0-9]+(?:[.,][0-9]+)?)\s*((?i:fl\.?\s*oz)|[a-zA-Zℓ]+)?").captures(&clean) else {
        return NetQuantityParseResult { raw_text: Some(raw_text), ..Default::default() };
    };

    let value = caps.get(1).and_then(|m| parse_decimal(m.as_str()));
    let unit = caps.get(2).map(|m| m.as_str().to_string());
    let manner = classify_unit(unit.as_deref());

    NetQuantityParseResult { value, unit, manner, raw_text: Some(raw_text) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_metric_volume() {
        let r = parse_text("500 mL");
        assert_eq!(r.value, Some(500.0));
        assert_eq!(r.unit.as_deref(), Some("mL"));
        assert_eq!(r.manner, Some(Manner::Volume));
        assert_eq!(r.raw_text.as_deref(), Some("500 mL"));
    }

    #[test]
    fn parses_count_words() {
        let r = parse_text("20 Bars");
        assert_eq!(r.value, Some(20.0));
        assert_eq!(r.unit.as_deref(), Some("Bars"));
        assert_eq!(r.manner, Some(Manner::Count));
    }

    #[test]
    fn bare_number_is_a_count() {
        let r = parse_text("12");
        assert_eq!(r.value, Some(12.0));
        assert_eq!(r.unit, None);
        assert_eq!(r.manner, Some(Manner::Count));
    }

    #[test]
    fn comma_is_a_decimal_separator() {
        let r = parse_text("1,5 kg");
        assert_eq!(r.value, Some(1.5));
        assert_eq!(r.manner, Some(Manner::Weight));
    }

    #[test]
    fn reads_first_quantity_only() {
        let r = parse_text("Net\n200g (7 oz)");
        assert_eq!(r.value, Some(200.0));
        assert_eq!(r.unit.as_deref(), Some("g"));
        assert_eq!(r.manner, Some(Manner::Weight));
    }

    #[test]
    fn recognises_imperial_units() {
        let r = parse_text("12 fl oz");
        assert_eq!(r.unit.as_deref(), Some("fl oz"));
        assert_eq!(r.manner, Some(Manner::Volume));

        assert_eq!(parse_text("16 OZ").manner, Some(Manner::Weight));
        assert_eq!(parse_text("2 lbs").manner, Some(Manner::Weight));
        assert_eq!(parse_text("750 mℓ").manner, Some(Manner::Volume));
        assert_eq!(parse_text("1 L").manner, Some(Manner::Volume));
    }

    #[test]
    fn unknown_unit_leaves_manner_unset() {
        let r = parse_text("3 sachets");
        assert_eq!(r.value, Some(3.0));
        assert_eq!(r.unit.as_deref(), Some("sachets"));
        assert_eq!(r.manner, None);
    }

    #[test]
    fn text_without_number_degrades_gracefully() {
        let r = parse_text("Net weight");
        assert_eq!(r.value, None);
        assert_eq!(r.unit, None);
        assert_eq!(r.manner, None);
        assert_eq!(r.raw_text.as_deref(), Some("Net weight"));
    }

    #[test]
    fn parse_picks_best_candidate_across_fields() {
        let facts: LabelFacts = serde_json::from_value(json!({
            "fields_all": {
                "net_quantity_full_text": [{"text": "", "confidence": 0.95}, {"text": "500 mL", "confidence": 0.6}],
                "net_quantity_value": [{"text": "500", "confidence": 0.9}]
            }
        }))
        .unwrap();
        let r = parse(&facts);
        assert_eq!(r.value, Some(500.0));
        assert_eq!(r.unit, None);
        assert_eq!(r.raw_text.as_deref(), Some("500"));
    }

    #[test]
    fn parse_without_candidates_is_empty() {
        let r = parse(&LabelFacts::default());
        assert_eq!(r, NetQuantityParseResult::default());
        assert_eq!(r.raw_text, None);
    }
}
