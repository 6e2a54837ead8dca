use crate::facts::LabelFacts;
use crate::rules::nutrition::cross_check::{self, CrossFieldResult, NutrientValues};
use crate::rules::nutrition::mapping::{self, NutrientDeclaration};
use crate::rules::rounding;
use serde::{Deserialize, Serialize};

/// Status of a nutrition audit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Pass,
    Fail,
    Warning,
    Skip,
}

impl AuditStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditStatus::Pass => "pass",
            AuditStatus::Fail => "fail",
            AuditStatus::Warning => "warning",
            AuditStatus::Skip => "skip",
        }
    }

    pub fn from_bool(ok: bool) -> Self {
        if ok { AuditStatus::Pass } else { AuditStatus::Fail }
    }
}

/// Rounding audit of one declared value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    pub nutrient_name: String,
    pub original_value: f64,
    pub unit: String,
    pub is_dv: bool,
    pub status: AuditStatus,
    pub expected_value: Option<f64>,
    pub message: String,
    pub rule_applied: Option<String>,
}

/// Audit report for a label's nutrition facts table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionAudit {
    pub nutrients: Vec<AuditResult>,
    pub cross_checks: Vec<CrossFieldResult>,
}

impl NutritionAudit {
    pub fn count(&self, status: AuditStatus) -> usize {
        self.nutrients.iter().filter(|r| r.status == status).count()
            + self.cross_checks.iter().filter(|r| r.status == status).count()
    }
}

/// Check that a declared value equals its rounded form.
pub fn audit_nutrient(decl: &NutrientDeclaration) -> AuditResult {
    let base = AuditResult {
        nutrient_name: decl.name.clone(),
        original_value: decl.value,
        unit: decl.unit.clone(),
        is_dv: decl.is_dv,
        status: AuditStatus::Skip,
        expected_value: None,
        message: String::new(),
        rule_applied: None,
    };

    match rounding::round_with_rule(decl.value, &decl.name, decl.is_dv) {
        Ok(rounded) => {
            let ok = (decl.value - rounded.value).abs() <= 1e-9;
            AuditResult {
                status: AuditStatus::from_bool(ok),
                expected_value: Some(rounded.value),
                message: if ok {
                    "compliant".to_string()
                } else {
                    format!("Value {} should be rounded to {}", decl.value, rounded.value)
                },
                rule_applied: Some(rounded.rule.description.to_string()),
                ..base
            }
        }
        Err(err) => AuditResult { message: err.to_string(), ..base },
    }
}

/// Map, audit and cross-check the nutrition facts table of `facts`.
pub fn audit_label(facts: &LabelFacts) -> NutritionAudit {
    let declarations = mapping::map_label(facts);
    let nutrients: Vec<AuditResult> = declarations.iter().map(audit_nutrient).collect();
    let values = NutrientValues::from_declarations(&declarations);
    let cross_checks = cross_check::run_all(&values);

    tracing::debug!(nutrients = nutrients.len(), cross_checks = cross_checks.len(), "nutrition audit");
    NutritionAudit { nutrients, cross_checks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rounded_value_passes() {
        let r = audit_nutrient(&NutrientDeclaration::new("Sodium", 140.0, "mg", false));
        assert_eq!(r.status, AuditStatus::Pass);
        assert_eq!(r.expected_value, Some(140.0));
        assert_eq!(r.message, "compliant");
        assert_eq!(r.rule_applied.as_deref(), Some("Round to nearest 5 mg (5-140 mg)"));
    }

    #[test]
    fn unrounded_value_fails() {
        let r = audit_nutrient(&NutrientDeclaration::new("Sodium", 142.0, "mg", false));
        assert_eq!(r.status, AuditStatus::Fail);
        assert_eq!(r.expected_value, Some(140.0));
        assert_eq!(r.message, "Value 142 should be rounded to 140");
    }

    #[test]
    fn percent_dv_uses_dv_tables() {
        let r = audit_nutrient(&NutrientDeclaration::new("Fat", 12.5, "%", true));
        assert_eq!(r.status, AuditStatus::Fail);
        assert_eq!(r.expected_value, Some(13.0));
    }

    #[test]
    fn unknown_nutrient_is_skipped() {
        let r = audit_nutrient(&NutrientDeclaration::new("Vitamin Q", 3.0, "mg", false));
        assert_eq!(r.status, AuditStatus::Skip);
        assert_eq!(r.expected_value, None);
        assert!(r.message.contains("Vitamin Q"), "{}", r.message);
    }

    #[test]
    fn audits_whole_label() {
        let facts: LabelFacts = serde_json::from_value(json!({
            "fields": {
                "nft_calories_en": "110",
                "nft_fat_en": "8 g",
                "nft_saturated_fat_en": "1 g",
                "nft_trans_fat_en": "0.2 g",
                "nft_carbohydrate_en": "18 g",
                "nft_fibre_en": "2 g",
                "nft_sugar_en": "12.6 g",
                "nft_protein_en": "3 g",
                "nft_sodium_en": "140 mg",
                "nft_sodium_dv_en": "6 %"
            }
        }))
        .unwrap();

        let audit = audit_label(&facts);
        let statuses: Vec<(&str, bool, AuditStatus)> =
            audit.nutrients.iter().map(|r| (r.nutrient_name.as_str(), r.is_dv, r.status)).collect();
        assert_eq!(
            statuses,
            vec![
                ("Calories", false, AuditStatus::Pass),
                ("Fat", false, AuditStatus::Pass),
                ("Saturated Fat", false, AuditStatus::Pass),
                ("Trans Fat", false, AuditStatus::Fail),
                ("Sodium", false, AuditStatus::Pass),
                ("Carbohydrate", false, AuditStatus::Pass),
                ("Fibre", false, AuditStatus::Pass),
                ("Sugars", false, AuditStatus::Fail),
                ("Protein", false, AuditStatus::Pass),
                ("Sodium", true, AuditStatus::Pass),
            ]
        );

        let names: Vec<&str> = audit.cross_checks.iter().map(|c| c.check_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Calorie Calculation",
                "Saturated + Trans %DV",
                "Fat Component Consistency",
                "Carbohydrate Component Consistency",
                "Sodium %DV Calculation",
            ]
        );
        assert_eq!(audit.count(AuditStatus::Fail), 3);
        assert_eq!(audit.count(AuditStatus::Warning), 1);
    }

    #[test]
    fn empty_label_has_nothing_to_audit() {
        assert_eq!(audit_label(&LabelFacts::default()), NutritionAudit::default());
    }
}
