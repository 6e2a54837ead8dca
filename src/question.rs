//! Compliance question definitions.
//!
//! Checklists arrive as loosely-shaped records ([`RawQuestion`]). They are
//! validated once into a [`RuleQuestion`] whose [`QuestionLogic`] variant
//! carries exactly the attributes that logic needs, so the evaluator never has
//! to check for a missing field or pattern.

use crate::error::ConfigError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// A question record as supplied by the external checklist store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawQuestion {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "question")]
    pub text: String,
    #[serde(default)]
    pub logic: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub panel: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
}

/// The deterministic strategy a question is answered with.
#[derive(Debug, Clone)]
pub enum QuestionLogic {
    /// Pass iff `field` resolves to a non-empty value.
    FieldExists { field: String },
    /// Pass iff the resolved `field` occurs in the text of `panel`.
    InPanel { field: String, panel: Option<String> },
    /// Pass iff `pattern` matches the resolved `field` anywhere.
    Regex { field: String, pattern: Regex },
    /// Always `needs_review`: physical or visual inspection.
    AlwaysNeedsReview,
    /// Not answerable by fixed logic; the caller routes it to the semantic
    /// evaluator. Holds the logic name as given, if any.
    External(Option<String>),
}

impl QuestionLogic {
    /// Canonical name of the logic kind.
    pub fn name(&self) -> &str {
        match self {
            QuestionLogic::FieldExists { .. } => "field_exists",
            QuestionLogic::InPanel { .. } => "in_panel",
            QuestionLogic::Regex { .. } => "regex",
            QuestionLogic::AlwaysNeedsReview => "always_needs_review",
            QuestionLogic::External(Some(name)) => name,
            QuestionLogic::External(None) => "external",
        }
    }
}

/// A validated compliance question.
#[derive(Debug, Clone)]
pub struct RuleQuestion {
    pub id: String,
    pub text: String,
    pub logic: QuestionLogic,
}

impl RuleQuestion {
    pub fn new(id: impl Into<String>, text: impl Into<String>, logic: QuestionLogic) -> Self {
        RuleQuestion { id: id.into(), text: text.into(), logic }
    }

    /// Validate a raw record.
    ///
    /// With `strict_logic` an unrecognised logic name is an error; otherwise it
    /// is kept as [`QuestionLogic::External`]. A missing logic name is always
    /// external.
    pub fn from_raw(raw: &RawQuestion, strict_logic: bool) -> Result<Self, ConfigError> {
        if raw.id.trim().is_empty() {
            return Err(ConfigError::MissingId);
        }

        let logic = match raw.logic.as_deref().map(str::trim) {
            None | Some("") => QuestionLogic::External(None),
            Some("field_exists") => QuestionLogic::FieldExists { field: required(raw, "field_exists", "field")? },
            Some("in_panel") => QuestionLogic::InPanel {
                field: required(raw, "in_panel", "field")?,
                panel: raw.panel.clone().filter(|p| !p.trim().is_empty()),
            },
            Some("regex") => {
                let field = required(raw, "regex", "field")?;
                let pattern = required(raw, "regex", "pattern")?;
                QuestionLogic::Regex { field, pattern: compile_pattern(&raw.id, &pattern)? }
            }
            Some("always_needs_review") => QuestionLogic::AlwaysNeedsReview,
            Some(other) if strict_logic => {
                return Err(ConfigError::UnknownLogic { question_id: raw.id.clone(), logic: other.to_string() });
            }
            Some(other) => QuestionLogic::External(Some(other.to_string())),
        };

        Ok(RuleQuestion { id: raw.id.clone(), text: raw.text.clone(), logic })
    }
}

/// Compile a question pattern. Matching is case-insensitive and unanchored.
pub fn compile_pattern(question_id: &str, pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern).case_insensitive(true).build().map_err(|err| ConfigError::InvalidPattern {
        question_id: question_id.to_string(),
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })
}

fn required(raw: &RawQuestion, logic: &'static str, attribute: &'static str) -> Result<String, ConfigError> {
    let value = if attribute == "pattern" { &raw.pattern } else { &raw.field };
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::MissingAttribute { question_id: raw.id.clone(), logic, attribute })
}
