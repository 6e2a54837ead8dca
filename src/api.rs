use crate::engine::field_resolver;
use crate::engine::{CompiledQuestion, CompiledQuestions, EvaluationResult, Evaluator, PhaseMetrics, RunMetrics, Verdict};
use crate::error::LoadError;
use crate::facts::{LabelFacts, PANEL_PDP};
use crate::question::RawQuestion;
use crate::rules::allergens::{self, AllergenGlutenDetectionResult, DetectionScope};
use crate::rules::net_quantity::{self, NetQuantityOptions, NetQuantityReport};
use crate::rules::nutrition::{self, NutritionAudit};
use crate::rules::supplements::{self, SupplementDetectionResult};
use crate::rules::sweeteners::{self, SweetenerDetectionResult};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};

/// Evaluation context.
///
/// Supplied by the caller so that a report can be reproduced exactly.
#[derive(Debug, Clone)]
pub struct Context {
    /// Timestamp stamped on the report.
    pub evaluated_at: NaiveDateTime,
}

impl Default for Context {
    fn default() -> Self {
        if cfg!(test) {
            let fixed = NaiveDate::from_ymd_opt(2024, 1, 15).and_then(|d| d.and_hms_opt(9, 0, 0));
            Self { evaluated_at: fixed.unwrap_or_default() }
        } else {
            Self { evaluated_at: Local::now().naive_local() }
        }
    }
}

/// Options that affect evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Panel used by `in_panel` questions that name none.
    pub default_panel: String,
    /// Reject unrecognised logic names instead of routing them externally.
    pub strict_logic: bool,
    /// Keyword universes scanned by the allergen detector.
    pub detection_scope: DetectionScope,
    /// Fields holding the ingredient list, in priority order.
    pub ingredients_fields: Vec<String>,
    /// Fields holding the nutrition facts table text, in priority order.
    pub nft_fields: Vec<String>,
    /// Confidence at which a net quantity declaration counts as present.
    pub net_quantity_min_confidence: f64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            default_panel: PANEL_PDP.to_string(),
            strict_logic: false,
            detection_scope: DetectionScope::all(),
            ingredients_fields: vec!["ingredients_list_en".to_string()],
            nft_fields: vec!["nft_table_en".to_string()],
            net_quantity_min_confidence: 0.5,
        }
    }
}

/// What happened to one checklist question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuestionOutcome {
    /// Answered deterministically.
    Evaluated(EvaluationResult),
    /// Needs the external semantic evaluator.
    Deferred { question_id: String },
    /// The question itself is malformed.
    Invalid { question_id: String, message: String },
}

impl QuestionOutcome {
    pub fn question_id(&self) -> &str {
        match self {
            QuestionOutcome::Evaluated(r) => &r.question_id,
            QuestionOutcome::Deferred { question_id } | QuestionOutcome::Invalid { question_id, .. } => question_id,
        }
    }
}

/// Question outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub pass: usize,
    pub fail: usize,
    pub needs_review: usize,
    pub deferred: usize,
    pub invalid: usize,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[QuestionOutcome]) -> Self {
        let mut summary = Summary::default();
        for outcome in outcomes {
            match outcome {
                QuestionOutcome::Evaluated(r) => match r.result {
                    Verdict::Pass => summary.pass += 1,
                    Verdict::Fail => summary.fail += 1,
                    Verdict::NeedsReview => summary.needs_review += 1,
                },
                QuestionOutcome::Deferred { .. } => summary.deferred += 1,
                QuestionOutcome::Invalid { .. } => summary.invalid += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.pass + self.fail + self.needs_review + self.deferred + self.invalid
    }
}

/// Everything the deterministic engine concluded about one label.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReport {
    pub evaluated_at: NaiveDateTime,
    pub questions: Vec<QuestionOutcome>,
    pub summary: Summary,
    pub allergens: AllergenGlutenDetectionResult,
    pub sweeteners: SweetenerDetectionResult,
    pub supplements: SupplementDetectionResult,
    pub net_quantity: NetQuantityReport,
    pub nutrition: NutritionAudit,
    /// Total elapsed time.
    pub elapsed: Duration,
    #[serde(skip)]
    pub metrics: RunMetrics,
}

/// Run the checklist and every built-in rule area over `facts`.
///
/// # Example
/// ```
/// use labelcheck::{CompiledQuestions, Context, LabelFacts, Options, RawQuestion, evaluate_label};
///
/// let facts: LabelFacts = serde_json::from_str(r#"{"fields": {"common_name_en": "Orange Juice"}}"#).unwrap();
/// let raw = vec![RawQuestion {
///     id: "cn".into(),
///     text: "Is the common name present?".into(),
///     logic: Some("field_exists".into()),
///     field: Some("common_name_en".into()),
///     ..Default::default()
/// }];
/// let questions = CompiledQuestions::new(&raw, false);
///
/// let report = evaluate_label(&facts, &questions, &Context::default(), &Options::default());
/// assert_eq!(report.summary.pass, 1);
/// ```
pub fn evaluate_label(
    facts: &LabelFacts,
    questions: &CompiledQuestions,
    context: &Context,
    options: &Options,
) -> ComplianceReport {
    let start = Instant::now();

    let (outcomes, questions_m) = PhaseMetrics::measure(|| evaluate_questions(facts, questions, options), Vec::len);
    let (allergens, allergens_m) = PhaseMetrics::measure(|| detect_allergens(facts, options), |r| r.detected.len());
    let (sweeteners, sweeteners_m) = PhaseMetrics::measure(|| detect_sweeteners(facts, options), |r| r.detected.len());
    let (supplements, supplements_m) =
        PhaseMetrics::measure(|| detect_supplements(facts, options), |r| r.detected.len());
    let (net_quantity, net_quantity_m) = PhaseMetrics::measure(
        || {
            let opts = NetQuantityOptions {
                min_confidence: options.net_quantity_min_confidence,
                pdp_panel: options.default_panel.clone(),
            };
            net_quantity::evaluate(facts, &opts)
        },
        |r| r.results.len(),
    );
    let (nutrition, nutrition_m) =
        PhaseMetrics::measure(|| nutrition::audit_label(facts), |r| r.nutrients.len() + r.cross_checks.len());

    let deferred = questions.deferred_ids();
    if !deferred.is_empty() {
        tracing::debug!(?deferred, "questions left for the semantic evaluator");
    }

    let summary = Summary::from_outcomes(&outcomes);
    let elapsed = start.elapsed();
    tracing::info!(
        questions = summary.total(),
        pass = summary.pass,
        fail = summary.fail,
        needs_review = summary.needs_review,
        deferred = summary.deferred,
        invalid = summary.invalid,
        ?elapsed,
        "label evaluated"
    );

    ComplianceReport {
        evaluated_at: context.evaluated_at,
        questions: outcomes,
        summary,
        allergens,
        sweeteners,
        supplements,
        net_quantity,
        nutrition,
        elapsed,
        metrics: RunMetrics {
            total: elapsed,
            questions: questions_m,
            allergens: allergens_m,
            sweeteners: sweeteners_m,
            supplements: supplements_m,
            net_quantity: net_quantity_m,
            nutrition: nutrition_m,
        },
    }
}

/// Answer every compiled question, in checklist order.
pub fn evaluate_questions(facts: &LabelFacts, questions: &CompiledQuestions, options: &Options) -> Vec<QuestionOutcome> {
    let evaluator = Evaluator::with_default_panel(options.default_panel.clone());
    questions
        .iter()
        .map(|entry| match entry {
            CompiledQuestion::Valid(q) => match evaluator.evaluate(q, facts) {
                Some(result) => QuestionOutcome::Evaluated(result),
                None => QuestionOutcome::Deferred { question_id: q.id.clone() },
            },
            CompiledQuestion::Invalid { question_id, error } => {
                QuestionOutcome::Invalid { question_id: question_id.clone(), message: error.to_string() }
            }
        })
        .collect()
}

/// Ingredient text: the first configured field that resolves.
pub fn ingredients_text(facts: &LabelFacts, options: &Options) -> Option<String> {
    options.ingredients_fields.iter().find_map(|field| field_resolver::resolve(facts, field))
}

/// Scan the ingredient list. A label without one detects nothing.
pub fn detect_allergens(facts: &LabelFacts, options: &Options) -> AllergenGlutenDetectionResult {
    match ingredients_text(facts, options) {
        Some(text) => allergens::detect_with(&text, options.detection_scope),
        None => {
            tracing::debug!(fields = ?options.ingredients_fields, "no ingredient list to scan");
            AllergenGlutenDetectionResult::default()
        }
    }
}

/// Nutrition facts table text: the first configured field that resolves.
pub fn nft_text(facts: &LabelFacts, options: &Options) -> Option<String> {
    options.nft_fields.iter().find_map(|field| field_resolver::resolve(facts, field))
}

/// Scan the ingredient list and nutrition facts table for sweeteners.
pub fn detect_sweeteners(facts: &LabelFacts, options: &Options) -> SweetenerDetectionResult {
    let ingredients = ingredients_text(facts, options).unwrap_or_default();
    let nft = nft_text(facts, options).unwrap_or_default();
    sweeteners::detect(&ingredients, &nft)
}

/// Scan the ingredient list and nutrition facts table for supplemented
/// ingredients.
pub fn detect_supplements(facts: &LabelFacts, options: &Options) -> SupplementDetectionResult {
    let ingredients = ingredients_text(facts, options).unwrap_or_default();
    let nft = nft_text(facts, options).unwrap_or_default();
    supplements::detect(&ingredients, &nft)
}

// --- Loading -----------------------------------------------------------------

/// A checklist file is either a bare array or `{"questions": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionFile {
    List(Vec<RawQuestion>),
    Wrapped { questions: Vec<RawQuestion> },
}

pub fn parse_facts(json: &str) -> Result<LabelFacts, LoadError> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_questions(json: &str) -> Result<Vec<RawQuestion>, LoadError> {
    Ok(match serde_json::from_str(json)? {
        QuestionFile::List(questions) | QuestionFile::Wrapped { questions } => questions,
    })
}

pub fn parse_options(json: &str) -> Result<Options, LoadError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_facts(path: impl AsRef<Path>) -> Result<LabelFacts, LoadError> {
    parse_facts(&read(path.as_ref())?)
}

pub fn load_questions(path: impl AsRef<Path>) -> Result<Vec<RawQuestion>, LoadError> {
    parse_questions(&read(path.as_ref())?)
}

pub fn load_options(path: impl AsRef<Path>) -> Result<Options, LoadError> {
    parse_options(&read(path.as_ref())?)
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.display().to_string(), source })
}
