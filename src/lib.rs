//! Deterministic food label compliance checks.
//!
//! Takes the structured facts an extraction step pulled from a label
//! ([`LabelFacts`]) and answers compliance questions with closed-form logic:
//!
//! - checklist questions (`field_exists`, `in_panel`, `regex`,
//!   `always_needs_review`) through the [`engine`];
//! - nutrient rounding, allergen/gluten, sweetener and supplement detection,
//!   net quantity checks and the nutrition facts audit under [`rules`].
//!
//! Questions that need semantic judgment are not answered here; they come
//! back as [`QuestionOutcome::Deferred`] for the caller to route.

#[macro_use]
mod macros;
pub mod api;
pub mod engine;
pub mod error;
pub mod facts;
pub mod question;
pub mod rules;

pub use api::{
    ComplianceReport, Context, Options, QuestionOutcome, Summary, detect_allergens, detect_supplements,
    detect_sweeteners, evaluate_label, evaluate_questions, load_facts, load_options, load_questions,
};
pub use engine::{CompiledQuestions, EvaluationResult, Evaluator, Verdict};
pub use error::{ConfigError, LoadError};
pub use facts::{FieldValue, LabelFacts, PANEL_PDP, Panel};
pub use question::{QuestionLogic, RawQuestion, RuleQuestion};
pub use rules::rounding::round;
