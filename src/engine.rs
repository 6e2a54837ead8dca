//! Question evaluation engine.
//!
//! The engine answers checklist questions against one label's extracted facts
//! using closed-form logic only. It is split into focused submodules under
//! `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! raw questions ──┐
//!                 │  CompiledQuestions::new       (compiled_questions.rs)
//!                 └───────────────┬──────────────
//!                                 │  validated RuleQuestions, indexed by logic
//!                                 v
//! LabelFacts ────────────▶ Evaluator::evaluate   (evaluator.rs)
//!                            - dispatch on logic
//!                            - look fields up via field_resolver
//!                                 │
//!                 ┌───────────────┴──────────────┐
//!                 v                              v
//!      Some(EvaluationResult)            None: external logic,
//!                                        routed to the semantic evaluator
//! ```
//!
//! ## Responsibilities by module
//!
//! - `field_resolver.rs`: flattens the shapes a field can take and ranks the
//!   candidates by confidence. The rule areas under `src/rules/` use it too.
//! - `compiled_questions.rs`: validates a checklist once and indexes it by
//!   logic kind; malformed questions are kept with their error.
//! - `evaluator.rs`: the per-question decision procedure.
//! - `metrics.rs`: per-phase timings for a label run.
//!
//! ## Debugging
//!
//! Set `LABELCHECK_LOG=labelcheck=debug` (or `trace`) to log every verdict and
//! every field resolution miss.

#[path = "engine/compiled_questions.rs"]
pub mod compiled_questions;
#[path = "engine/evaluator.rs"]
pub mod evaluator;
#[path = "engine/field_resolver.rs"]
pub mod field_resolver;
#[path = "engine/metrics.rs"]
pub mod metrics;

pub use compiled_questions::{CompiledQuestion, CompiledQuestions, LogicMask, QuestionId, QuestionIndex};
pub use evaluator::{EvaluationResult, Evaluator, Verdict};
pub use field_resolver::{CandidatePolicy, DEFAULT_CONFIDENCE, FieldSource, RankedCandidates, ResolvedField};
pub use metrics::{PhaseMetrics, RunMetrics};
