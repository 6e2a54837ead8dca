//! Checklist compilation and indexing.
//!
//! Evaluation is split in two phases:
//!
//! 1. **Compile** (this module): validate every [`RawQuestion`] once into a
//!    [`RuleQuestion`], compiling regex patterns, and index the result by
//!    logic kind.
//! 2. **Run** (see `evaluator.rs`): answer the compiled questions against one
//!    label. A compiled checklist can be reused across labels.
//!
//! A malformed question does not poison the checklist: it is kept as
//! [`CompiledQuestion::Invalid`] with its [`ConfigError`], so a report can
//! list it next to the questions that did evaluate.
//!
//! ## Invariants
//!
//! - `QuestionId` is an index into `CompiledQuestions::entries`, in checklist
//!   order.
//! - `QuestionIndex::by_logic` uses fixed indices (`LOGIC_*`) and lists valid
//!   questions only.

use crate::error::ConfigError;
use crate::question::{QuestionLogic, RawQuestion, RuleQuestion};

/// Question identifier (index into the entries vector).
pub type QuestionId = usize;

bitflags::bitflags! {
    /// Logic kinds present in a checklist.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LogicMask: u8 {
        const FIELD_EXISTS        = 1 << 0;
        const IN_PANEL            = 1 << 1;
        const REGEX               = 1 << 2;
        const ALWAYS_NEEDS_REVIEW = 1 << 3;
        const EXTERNAL            = 1 << 4;
    }
}

pub const LOGIC_COUNT: usize = 5;
pub const LOGIC_FIELD_EXISTS: usize = 0;
pub const LOGIC_IN_PANEL: usize = 1;
pub const LOGIC_REGEX: usize = 2;
pub const LOGIC_ALWAYS_NEEDS_REVIEW: usize = 3;
pub const LOGIC_EXTERNAL: usize = 4;

/// Display names, indexed by `LOGIC_*`.
pub const LOGIC_NAMES: [&str; LOGIC_COUNT] = ["field_exists", "in_panel", "regex", "always_needs_review", "external"];

impl Default for LogicMask {
    fn default() -> Self {
        LogicMask::empty()
    }
}

impl LogicMask {
    /// Mask bit and index slot for a logic variant.
    pub fn of(logic: &QuestionLogic) -> (LogicMask, usize) {
        match logic {
            QuestionLogic::FieldExists { .. } => (LogicMask::FIELD_EXISTS, LOGIC_FIELD_EXISTS),
            QuestionLogic::InPanel { .. } => (LogicMask::IN_PANEL, LOGIC_IN_PANEL),
            QuestionLogic::Regex { .. } => (LogicMask::REGEX, LOGIC_REGEX),
            QuestionLogic::AlwaysNeedsReview => (LogicMask::ALWAYS_NEEDS_REVIEW, LOGIC_ALWAYS_NEEDS_REVIEW),
            QuestionLogic::External(_) => (LogicMask::EXTERNAL, LOGIC_EXTERNAL),
        }
    }
}

/// One checklist entry after validation.
#[derive(Debug, Clone)]
pub enum CompiledQuestion {
    Valid(RuleQuestion),
    Invalid { question_id: String, error: ConfigError },
}

impl CompiledQuestion {
    pub fn id(&self) -> &str {
        match self {
            CompiledQuestion::Valid(q) => &q.id,
            CompiledQuestion::Invalid { question_id, .. } => question_id,
        }
    }
}

#[derive(Debug, Default)]
pub struct QuestionIndex {
    pub by_logic: [Vec<QuestionId>; LOGIC_COUNT],
    pub invalid: Vec<QuestionId>,
    pub present: LogicMask,
}

/// Validated checklist with per-logic indexes.
#[derive(Debug)]
pub struct CompiledQuestions {
    pub entries: Vec<CompiledQuestion>,
    pub index: QuestionIndex,
}

impl CompiledQuestions {
    /// Validate `raw` questions in order. Validation failures are recorded per
    /// question, never returned.
    pub fn new(raw: &[RawQuestion], strict_logic: bool) -> Self {
        let entries: Vec<CompiledQuestion> = raw
            .iter()
            .map(|r| match RuleQuestion::from_raw(r, strict_logic) {
                Ok(question) => CompiledQuestion::Valid(question),
                Err(error) => {
                    tracing::warn!(question = %r.id, %error, "invalid question");
                    CompiledQuestion::Invalid { question_id: r.id.clone(), error }
                }
            })
            .collect();

        let mut index = QuestionIndex::default();
        for (id, entry) in entries.iter().enumerate() {
            match entry {
                CompiledQuestion::Valid(q) => {
                    let (bit, slot) = LogicMask::of(&q.logic);
                    index.present |= bit;
                    index.by_logic[slot].push(id);
                }
                CompiledQuestion::Invalid { .. } => index.invalid.push(id),
            }
        }

        tracing::debug!(
            questions = entries.len(),
            invalid = index.invalid.len(),
            external = index.by_logic[LOGIC_EXTERNAL].len(),
            "compiled checklist"
        );
        CompiledQuestions { entries, index }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledQuestion> {
        self.entries.iter()
    }

    /// Valid questions of one logic kind, in checklist order.
    pub fn with_logic(&self, slot: usize) -> impl Iterator<Item = &RuleQuestion> {
        self.index.by_logic.get(slot).into_iter().flatten().filter_map(|&id| match &self.entries[id] {
            CompiledQuestion::Valid(q) => Some(q),
            CompiledQuestion::Invalid { .. } => None,
        })
    }

    /// Question count per logic kind present in the checklist, in `LOGIC_*`
    /// order.
    pub fn logic_counts(&self) -> Vec<(&'static str, usize)> {
        (0..LOGIC_COUNT)
            .filter(|&slot| self.index.present.contains(LogicMask::from_bits_truncate(1 << slot)))
            .map(|slot| (LOGIC_NAMES[slot], self.index.by_logic[slot].len()))
            .collect()
    }

    /// Ids of the questions routed to the semantic evaluator.
    pub fn deferred_ids(&self) -> Vec<&str> {
        self.with_logic(LOGIC_EXTERNAL).map(|q| q.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, logic: Option<&str>, field: Option<&str>, pattern: Option<&str>) -> RawQuestion {
        RawQuestion {
            id: id.into(),
            text: format!("question {id}"),
            logic: logic.map(str::to_string),
            field: field.map(str::to_string),
            panel: None,
            pattern: pattern.map(str::to_string),
        }
    }

    fn checklist() -> Vec<RawQuestion> {
        vec![
            raw("a", Some("field_exists"), Some("common_name_en"), None),
            raw("b", Some("regex"), Some("net_quantity_full_text"), Some("(")),
            raw("c", Some("always_needs_review"), None, None),
            raw("d", None, None, None),
            raw("e", Some("llm_semantic"), None, None),
            raw("f", Some("field_exists"), Some("ingredients_list_en"), None),
        ]
    }

    #[test]
    fn indexes_by_logic_kind() {
        let compiled = CompiledQuestions::new(&checklist(), false);
        assert_eq!(compiled.len(), 6);
        assert_eq!(compiled.index.by_logic[LOGIC_FIELD_EXISTS], vec![0, 5]);
        assert_eq!(compiled.index.by_logic[LOGIC_ALWAYS_NEEDS_REVIEW], vec![2]);
        assert_eq!(compiled.index.by_logic[LOGIC_EXTERNAL], vec![3, 4]);
        assert!(compiled.index.by_logic[LOGIC_REGEX].is_empty());
        assert_eq!(compiled.index.invalid, vec![1]);
        assert!(compiled.index.present.contains(LogicMask::FIELD_EXISTS | LogicMask::EXTERNAL));
        assert!(!compiled.index.present.contains(LogicMask::REGEX));

        let ids: Vec<&str> = compiled.with_logic(LOGIC_FIELD_EXISTS).map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "f"]);
    }

    #[test]
    fn keeps_errors_per_question() {
        let compiled = CompiledQuestions::new(&checklist(), false);
        assert!(matches!(
            &compiled.entries[1],
            CompiledQuestion::Invalid { question_id, error: ConfigError::InvalidPattern { .. } } if question_id == "b"
        ));
        assert_eq!(compiled.entries[1].id(), "b");
    }

    #[test]
    fn counts_questions_per_logic_kind() {
        let compiled = CompiledQuestions::new(&checklist(), false);
        assert_eq!(
            compiled.logic_counts(),
            vec![("field_exists", 2), ("always_needs_review", 1), ("external", 2)]
        );
        assert_eq!(compiled.deferred_ids(), vec!["d", "e"]);

        let strict = CompiledQuestions::new(&checklist(), true);
        assert_eq!(strict.deferred_ids(), vec!["d"]);
        assert!(CompiledQuestions::new(&[], false).logic_counts().is_empty());
    }

    #[test]
    fn strict_logic_rejects_unknown_names() {
        let compiled = CompiledQuestions::new(&checklist(), true);
        assert_eq!(compiled.index.invalid, vec![1, 4]);
        // A missing logic name is still routed externally.
        assert_eq!(compiled.index.by_logic[LOGIC_EXTERNAL], vec![3]);
    }

    #[test]
    fn empty_checklist() {
        let compiled = CompiledQuestions::new(&[], false);
        assert!(compiled.is_empty());
        assert_eq!(compiled.index.present, LogicMask::empty());
    }
}
