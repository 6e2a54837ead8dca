//! Consistency checks between nutrition facts table lines.
//!
//! Each check runs only when every value it needs was declared. Quantities
//! and %DV values are kept apart, so "Fat" the amount never shadows "Fat" the
//! percentage.

use crate::rules::nutrition::audit::AuditStatus;
use crate::rules::nutrition::mapping::NutrientDeclaration;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reference daily values (g, or mg for cholesterol and minerals).
pub static DAILY_VALUES: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("Fat", 75.0),
        ("Saturated + Trans", 20.0),
        ("Cholesterol", 300.0),
        ("Sodium", 2300.0),
        ("Carbohydrate", 300.0),
        ("Fibre", 28.0),
        ("Sugars", 100.0),
        ("Protein", 50.0),
        ("Potassium", 4700.0),
        ("Calcium", 1300.0),
        ("Iron", 18.0),
    ])
});

/// Minerals whose %DV is checked against their declared amount.
pub const MINERALS: &[(&str, &str)] = &[("Sodium", "mg"), ("Potassium", "mg"), ("Calcium", "mg"), ("Iron", "mg")];

/// Slack when comparing component sums against their total.
const COMPONENT_SLACK: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossFieldResult {
    pub check_name: String,
    pub status: AuditStatus,
    pub message: String,
    pub fields_involved: Vec<String>,
    pub declared_value: Option<f64>,
    pub expected_value: Option<f64>,
    pub tolerance: Option<String>,
}

impl CrossFieldResult {
    fn new(check_name: impl Into<String>, status: AuditStatus, message: String, fields: &[&str]) -> Self {
        CrossFieldResult {
            check_name: check_name.into(),
            status,
            message,
            fields_involved: fields.iter().map(|f| f.to_string()).collect(),
            declared_value: None,
            expected_value: None,
            tolerance: None,
        }
    }

    fn values(mut self, declared: Option<f64>, expected: Option<f64>) -> Self {
        self.declared_value = declared;
        self.expected_value = expected;
        self
    }
}

/// Declared values by nutrient name, first declaration wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NutrientValues {
    quantity: HashMap<String, f64>,
    percent_dv: HashMap<String, f64>,
}

impl NutrientValues {
    pub fn from_declarations(declarations: &[NutrientDeclaration]) -> Self {
        let mut values = NutrientValues::default();
        for d in declarations {
            values.insert(&d.name, d.value, d.is_dv);
        }
        values
    }

    /// Record a value unless one is already known for `name`.
    pub fn insert(&mut self, name: &str, value: f64, is_dv: bool) {
        let map = if is_dv { &mut self.percent_dv } else { &mut self.quantity };
        map.entry(name.to_string()).or_insert(value);
    }

    pub fn quantity(&self, name: &str) -> Option<f64> {
        self.quantity.get(name).copied()
    }

    pub fn percent_dv(&self, name: &str) -> Option<f64> {
        self.percent_dv.get(name).copied()
    }
}

/// Run every check whose inputs are present.
pub fn run_all(values: &NutrientValues) -> Vec<CrossFieldResult> {
    let q = |name: &str| values.quantity(name);
    let mut results = Vec::new();

    if let (Some(fat), Some(carbs), Some(protein), Some(calories)) =
        (q("Fat"), q("Carbohydrate"), q("Protein"), q("Calories"))
    {
        results.push(calorie_calculation(fat, carbs, protein, calories));
    }
    if let (Some(sat), Some(trans)) = (q("Saturated Fat"), q("Trans Fat")) {
        results.push(sat_trans_combined_dv(sat, trans, values.percent_dv("Saturated + Trans")));
    }
    if let (Some(fat), Some(sat), Some(trans)) = (q("Fat"), q("Saturated Fat"), q("Trans Fat")) {
        results.push(fat_components(fat, sat, trans));
    }
    if let (Some(carbs), Some(fibre), Some(sugars)) = (q("Carbohydrate"), q("Fibre"), q("Sugars")) {
        results.push(carb_components(carbs, fibre, sugars));
    }
    for &(mineral, unit) in MINERALS {
        if let (Some(amount), Some(dv)) = (q(mineral), values.percent_dv(mineral)) {
            results.push(dv_calculation(mineral, amount, dv, unit));
        }
    }
    results
}

/// Declared energy against `fat*9 + carbs*4 + protein*4`, within 20% or
/// 20 Cal, whichever is larger.
pub fn calorie_calculation(fat: f64, carbs: f64, protein: f64, declared: f64) -> CrossFieldResult {
    let calculated = fat * 9.0 + carbs * 4.0 + protein * 4.0;
    let tolerance = (calculated * 0.20).abs().max(20.0);
    let diff = (declared - calculated).abs();

    let mut result = CrossFieldResult::new(
        "Calorie Calculation",
        AuditStatus::from_bool(diff <= tolerance),
        format!(
            "Declared: {declared} Cal, Calculated: {calculated:.1} Cal, Difference: {diff:.1} Cal (tolerance: ±{tolerance:.1} Cal)"
        ),
        &["Fat", "Carbohydrate", "Protein", "Calories"],
    )
    .values(Some(declared), Some(calculated));
    result.tolerance = Some(format!("±{tolerance:.1} Cal"));
    result
}

/// Combined saturated and trans fat %DV. Undeclared is a warning.
pub fn sat_trans_combined_dv(sat: f64, trans: f64, declared: Option<f64>) -> CrossFieldResult {
    let expected = percent_of_daily_value(sat + trans, DAILY_VALUES["Saturated + Trans"]);
    let fields = ["Saturated Fat", "Trans Fat"];

    let (status, message) = match declared {
        None => (AuditStatus::Warning, format!("Saturated + Trans %DV not declared (expected: {expected}%)")),
        Some(d) => (AuditStatus::from_bool((d - expected).abs() < 0.5), format!("Declared: {d}%, Expected: {expected}%")),
    };
    CrossFieldResult::new("Saturated + Trans %DV", status, message, &fields).values(declared, Some(expected))
}

/// Saturated plus trans fat may not exceed total fat.
pub fn fat_components(total: f64, sat: f64, trans: f64) -> CrossFieldResult {
    let combined = sat + trans;
    CrossFieldResult::new(
        "Fat Component Consistency",
        AuditStatus::from_bool(combined <= total + COMPONENT_SLACK),
        format!("Total Fat: {total}g, Saturated: {sat}g, Trans: {trans}g, Combined: {combined}g"),
        &["Fat", "Saturated Fat", "Trans Fat"],
    )
    .values(Some(combined), Some(total))
}

/// Fibre plus sugars may not exceed total carbohydrate.
pub fn carb_components(total: f64, fibre: f64, sugars: f64) -> CrossFieldResult {
    let combined = fibre + sugars;
    CrossFieldResult::new(
        "Carbohydrate Component Consistency",
        AuditStatus::from_bool(combined <= total + COMPONENT_SLACK),
        format!("Total Carbohydrate: {total}g, Fibre: {fibre}g, Sugars: {sugars}g, Combined: {combined}g"),
        &["Carbohydrate", "Fibre", "Sugars"],
    )
    .values(Some(combined), Some(total))
}

/// %DV of a nutrient recomputed from its (already rounded) amount.
pub fn dv_calculation(nutrient: &str, amount: f64, declared: f64, unit: &str) -> CrossFieldResult {
    let check_name = format!("{nutrient} %DV Calculation");
    let Some(&daily) = DAILY_VALUES.get(nutrient) else {
        return CrossFieldResult::new(
            check_name,
            AuditStatus::Skip,
            format!("No daily value defined for {nutrient}"),
            &[nutrient],
        );
    };

    let expected = percent_of_daily_value(amount, daily);
    CrossFieldResult::new(
        check_name,
        AuditStatus::from_bool((declared - expected).abs() < 0.5),
        format!("{nutrient}: {amount}{unit} -> Declared %DV: {declared}%, Expected: {expected}%"),
        &[nutrient],
    )
    .values(Some(declared), Some(expected))
}

fn percent_of_daily_value(amount: f64, daily: f64) -> f64 {
    (amount / daily * 100.0).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calorie_tolerance_has_a_floor() {
        // 2*9 + 5*4 + 1*4 = 42 -> 20% is 8.4, so the 20 Cal floor applies.
        let r = calorie_calculation(2.0, 5.0, 1.0, 60.0);
        assert_eq!(r.status, AuditStatus::Pass);
        assert_eq!(r.expected_value, Some(42.0));
        assert_eq!(r.tolerance.as_deref(), Some("±20.0 Cal"));

        let r = calorie_calculation(2.0, 5.0, 1.0, 63.0);
        assert_eq!(r.status, AuditStatus::Fail);
    }

    #[test]
    fn calorie_tolerance_scales() {
        // 10*9 + 30*4 + 10*4 = 250 -> tolerance 50.
        assert_eq!(calorie_calculation(10.0, 30.0, 10.0, 300.0).status, AuditStatus::Pass);
        assert_eq!(calorie_calculation(10.0, 30.0, 10.0, 301.0).status, AuditStatus::Fail);
    }

    #[test]
    fn sat_trans_dv() {
        // (2 + 0.5) / 20 = 12.5% -> 13 (half away from zero).
        let r = sat_trans_combined_dv(2.0, 0.5, Some(13.0));
        assert_eq!(r.status, AuditStatus::Pass);
        assert_eq!(r.expected_value, Some(13.0));

        assert_eq!(sat_trans_combined_dv(2.0, 0.5, Some(12.0)).status, AuditStatus::Fail);

        let r = sat_trans_combined_dv(2.0, 0.5, None);
        assert_eq!(r.status, AuditStatus::Warning);
        assert_eq!(r.declared_value, None);
    }

    #[test]
    fn component_sums() {
        assert_eq!(fat_components(5.0, 4.5, 0.5).status, AuditStatus::Pass);
        assert_eq!(fat_components(5.0, 4.5, 0.6).status, AuditStatus::Fail);
        assert_eq!(carb_components(20.0, 3.0, 17.0).status, AuditStatus::Pass);
        assert_eq!(carb_components(20.0, 3.0, 18.0).status, AuditStatus::Fail);
    }

    #[test]
    fn mineral_dv() {
        // 690 / 2300 = 30%.
        assert_eq!(dv_calculation("Sodium", 690.0, 30.0, "mg").status, AuditStatus::Pass);
        assert_eq!(dv_calculation("Sodium", 690.0, 25.0, "mg").status, AuditStatus::Fail);
        // 2.5 / 18 = 13.9% -> 14.
        assert_eq!(dv_calculation("Iron", 2.5, 14.0, "mg").expected_value, Some(14.0));

        let r = dv_calculation("Vitamin D", 5.0, 25.0, "µg");
        assert_eq!(r.status, AuditStatus::Skip);
        assert_eq!(r.expected_value, None);
    }

    #[test]
    fn checks_run_only_with_inputs() {
        let mut values = NutrientValues::default();
        values.insert("Fat", 8.0, false);
        values.insert("Fat", 12.0, true);
        assert!(run_all(&values).is_empty());

        values.insert("Saturated Fat", 1.0, false);
        values.insert("Trans Fat", 0.0, false);
        values.insert("Saturated + Trans", 5.0, true);
        let names: Vec<String> = run_all(&values).into_iter().map(|r| r.check_name).collect();
        assert_eq!(names, vec!["Saturated + Trans %DV", "Fat Component Consistency"]);
    }

    #[test]
    fn first_declaration_wins() {
        let mut values = NutrientValues::default();
        values.insert("Sodium", 140.0, false);
        values.insert("Sodium", 150.0, false);
        assert_eq!(values.quantity("Sodium"), Some(140.0));
        assert_eq!(values.percent_dv("Sodium"), None);
    }
}
