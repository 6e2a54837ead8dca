use labelcheck::rules::allergens::DetectionKind;
use labelcheck::rules::nutrition::AuditStatus;
use labelcheck::rules::terms::MatchSource;
use labelcheck::{CompiledQuestions, ComplianceReport, EvaluationResult, QuestionOutcome, Verdict};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_report(report: &ComplianceReport, questions: &CompiledQuestions, color: bool) {
    let palette = ansi::Palette::new(color);
    println!(
        "\n{}",
        palette.bold(palette.paint(format!("⚙  Label compliance: {}", report.evaluated_at), ansi::CYAN))
    );

    println!("\n{}", palette.paint("━━━ Questions ━━━", ansi::GRAY));
    if report.questions.is_empty() {
        println!("{}", palette.dim("  No questions supplied (use --questions)"));
    } else {
        print_checklist(questions, &palette);
    }
    for outcome in &report.questions {
        print_outcome(outcome, &palette);
    }

    println!("\n{}", palette.paint("━━━ Allergens & gluten ━━━", ansi::GRAY));
    print_allergens(report, &palette);

    println!("\n{}", palette.paint("━━━ Sweeteners & supplements ━━━", ansi::GRAY));
    print_sweeteners(report, &palette);
    print_supplements(report, &palette);

    println!("\n{}", palette.paint("━━━ Net quantity ━━━", ansi::GRAY));
    let nq = &report.net_quantity;
    println!(
        "  {} {}  {}",
        palette.dim("declared:"),
        palette.bold(nq.extracted_value.as_deref().unwrap_or("(none)")),
        verdict_badge(nq.overall_status, &palette),
    );
    for result in &nq.results {
        print_result(result, &palette);
    }

    println!("\n{}", palette.paint("━━━ Nutrition facts ━━━", ansi::GRAY));
    print_nutrition(report, &palette);

    let s = &report.summary;
    println!("\n{}", palette.paint("━━━ Summary ━━━", ansi::GRAY));
    println!(
        "  {}  │  {}  │  {}  │  {}  │  {}",
        palette.paint(format!("pass {}", s.pass), ansi::GREEN),
        palette.paint(format!("fail {}", s.fail), ansi::RED),
        palette.paint(format!("review {}", s.needs_review), ansi::YELLOW),
        palette.paint(format!("deferred {}", s.deferred), ansi::BLUE),
        palette.dim(format!("invalid {}", s.invalid)),
    );
    let m = &report.metrics;
    println!(
        "  Total: {}  │  Questions: {}  │  Keywords: {}  │  Net quantity: {}  │  Nutrition: {}",
        palette.paint(format!("{:?}", m.total), ansi::GREEN),
        palette.dim(format!("{:?}", m.questions.duration)),
        palette.dim(format!("{:?}", m.allergens.duration + m.sweeteners.duration + m.supplements.duration)),
        palette.dim(format!("{:?}", m.net_quantity.duration)),
        palette.dim(format!("{:?}", m.nutrition.duration)),
    );
    println!();
}

fn verdict_badge(verdict: Verdict, palette: &ansi::Palette) -> String {
    match verdict {
        Verdict::Pass => palette.paint("✓ pass", ansi::GREEN),
        Verdict::Fail => palette.paint("✗ fail", ansi::RED),
        Verdict::NeedsReview => palette.paint("? needs_review", ansi::YELLOW),
    }
}

fn status_badge(status: AuditStatus, palette: &ansi::Palette) -> String {
    let color = match status {
        AuditStatus::Pass => ansi::GREEN,
        AuditStatus::Fail => ansi::RED,
        AuditStatus::Warning => ansi::YELLOW,
        AuditStatus::Skip => ansi::GRAY,
    };
    palette.paint(status.as_str(), color)
}

fn print_outcome(outcome: &QuestionOutcome, palette: &ansi::Palette) {
    match outcome {
        QuestionOutcome::Evaluated(result) => print_result(result, palette),
        QuestionOutcome::Deferred { question_id } => {
            println!("  {} {}", palette.paint(question_id, ansi::CYAN), palette.paint("→ deferred", ansi::BLUE));
        }
        QuestionOutcome::Invalid { question_id, message } => {
            println!("  {} {} {}", palette.paint(question_id, ansi::CYAN), palette.paint("! invalid", ansi::RED), palette.dim(message));
        }
    }
}

fn print_result(result: &EvaluationResult, palette: &ansi::Palette) {
    println!("  {} {}", palette.paint(&result.question_id, ansi::CYAN), verdict_badge(result.result, palette));
    println!("      {}", palette.dim(&result.rationale));
}

fn print_checklist(questions: &CompiledQuestions, palette: &ansi::Palette) {
    let mut kinds: Vec<String> =
        questions.logic_counts().into_iter().map(|(name, count)| format!("{name} {count}")).collect();
    if !questions.index.invalid.is_empty() {
        kinds.push(format!("invalid {}", questions.index.invalid.len()));
    }
    println!("  {} {}", palette.dim("checklist:"), palette.dim(kinds.join(" · ")));
}

fn source_label(source: MatchSource) -> &'static str {
    match source {
        MatchSource::Ingredients => "ingredients",
        MatchSource::Nft => "nft",
        MatchSource::Both => "both",
    }
}

fn print_sweeteners(report: &ComplianceReport, palette: &ansi::Palette) {
    let s = &report.sweeteners;
    if s.detected.is_empty() {
        println!("{}", palette.dim("  No sweeteners detected"));
    }
    for d in &s.detected {
        let detail = match (&d.quantity, d.status) {
            (Some(q), _) => palette.bold(q),
            (None, Some(verdict)) => verdict_badge(verdict, palette),
            (None, None) => String::new(),
        };
        println!(
            "  {} {}  {}",
            palette.paint(&d.name, ansi::CYAN),
            palette.dim(format!("({}, {})", d.sweetener_category, source_label(d.source))),
            detail,
        );
    }
}

fn print_supplements(report: &ComplianceReport, palette: &ansi::Palette) {
    let s = &report.supplements;
    if !s.has_supplements {
        println!("{}", palette.dim("  No supplemented ingredients detected"));
        return;
    }
    for category in s.categories() {
        let names: Vec<String> = s
            .detected
            .iter()
            .filter(|d| d.category == category)
            .map(|d| format!("{} {}", d.name, palette.dim(format!("({})", source_label(d.source)))))
            .collect();
        println!("  {} {}", palette.paint(format!("{}:", category.to_lowercase()), ansi::BLUE), names.join(", "));
    }
}

fn print_allergens(report: &ComplianceReport, palette: &ansi::Palette) {
    let a = &report.allergens;
    if a.detected.is_empty() {
        println!("{}", palette.dim("  Nothing detected"));
        return;
    }
    for kind in [DetectionKind::Allergen, DetectionKind::Gluten] {
        let hits: Vec<String> = a
            .detected
            .iter()
            .filter(|d| d.kind == kind)
            .map(|d| format!("{} {}", d.category, palette.dim(format!("({})", d.name))))
            .collect();
        if hits.is_empty() {
            continue;
        }
        let label = match kind {
            DetectionKind::Allergen => "allergens:",
            DetectionKind::Gluten => "gluten:",
        };
        println!("  {} {}", palette.paint(label, ansi::BLUE), hits.join(", "));
    }
}

fn print_nutrition(report: &ComplianceReport, palette: &ansi::Palette) {
    let n = &report.nutrition;
    if n.nutrients.is_empty() && n.cross_checks.is_empty() {
        println!("{}", palette.dim("  No nutrition facts fields found"));
        return;
    }
    for r in &n.nutrients {
        let name = if r.is_dv { format!("{} %DV", r.nutrient_name) } else { r.nutrient_name.clone() };
        let expected = r.expected_value.map(|v| format!(" → {v}")).unwrap_or_default();
        println!(
            "  {} {}{}  {}",
            palette.paint(name, ansi::CYAN),
            palette.bold(format!("{}{}", r.original_value, if r.is_dv { "%" } else { r.unit.as_str() })),
            palette.dim(expected),
            status_badge(r.status, palette),
        );
    }
    for c in &n.cross_checks {
        println!("  {} {}", palette.paint(&c.check_name, ansi::BLUE), status_badge(c.status, palette));
        println!("      {}", palette.dim(&c.message));
    }
}
