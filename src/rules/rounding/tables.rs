use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::rules::rounding::{Condition, Rounding};

/// A condition/action pair in a rounding table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundingRule {
    pub condition: Condition,
    pub action: Rounding,
    pub description: &'static str,
}

/// Ordered tiers for one nutrient category. The first tier whose condition
/// holds is the only one that can hold.
#[derive(Debug, PartialEq)]
pub struct RoundingTable {
    pub name: &'static str,
    pub rules: &'static [RoundingRule],
}

impl RoundingTable {
    /// The tier `value` falls in.
    pub fn tier(&self, value: f64) -> Option<&'static RoundingRule> {
        self.rules.iter().find(|rule| rule.condition.matches(value))
    }
}

// Quantity tables

/// Serving size, metric (g or mL).
pub static SERVING_SIZE: RoundingTable = RoundingTable {
    name: "Serving Size",
    rules: &[
        tier!(Below(10.0) => NearestMultiple(0.1), "Round to nearest 0.1 (if < 10)"),
        tier!(AtLeast(10.0) => NearestMultiple(1.0), "Round to nearest 1 (if >= 10)"),
    ],
};

/// Energy value.
pub static CALORIES: RoundingTable = RoundingTable {
    name: "Calories",
    rules: &[
        tier!(Below(5.0) => ToZero, "Round to 0 (if < 5)"),
        tier!(Within(5.0, 50.0) => NearestMultiple(5.0), "Round to nearest 5 (5-50 Cal)"),
        tier!(Above(50.0) => NearestMultiple(10.0), "Round to nearest 10 (> 50 Cal)"),
    ],
};

/// Fat, saturated fat and trans fat.
pub static FAT: RoundingTable = RoundingTable {
    name: "Fat",
    rules: &[
        tier!(Below(0.5) => ToZero, "Round to 0 (if < 0.5)"),
        tier!(Within(0.5, 5.0) => NearestMultiple(0.5), "Round to nearest 0.5 (0.5-5 g)"),
        tier!(Above(5.0) => NearestMultiple(1.0), "Round to nearest 1 (> 5 g)"),
    ],
};

pub static CHOLESTEROL: RoundingTable = RoundingTable {
    name: "Cholesterol",
    rules: &[
        tier!(Below(2.0) => ToZero, "Round to 0 mg (< 2 mg)"),
        tier!(AtLeast(2.0) => NearestMultiple(5.0), "Round to nearest 5 mg (>= 2 mg)"),
    ],
};

pub static SODIUM: RoundingTable = RoundingTable {
    name: "Sodium",
    rules: &[
        tier!(Below(5.0) => ToZero, "Round to 0 mg (< 5 mg)"),
        tier!(Within(5.0, 140.0) => NearestMultiple(5.0), "Round to nearest 5 mg (5-140 mg)"),
        tier!(Above(140.0) => NearestMultiple(10.0), "Round to nearest 10 mg (> 140 mg)"),
    ],
};

/// Carbohydrate, fibre and sugars.
pub static CARBOHYDRATE: RoundingTable = RoundingTable {
    name: "Carbohydrate",
    rules: &[
        tier!(Below(0.5) => ToZero, "Round to 0 g (< 0.5)"),
        tier!(AtLeast(0.5) => NearestMultiple(1.0), "Round to nearest 1 g (>= 0.5)"),
    ],
};

pub static PROTEIN: RoundingTable = RoundingTable {
    name: "Protein",
    rules: &[
        tier!(Below(0.5) => NearestMultiple(0.1), "Round to nearest 0.1 g (< 0.5)"),
        tier!(AtLeast(0.5) => NearestMultiple(1.0), "Round to nearest 1 g (>= 0.5)"),
    ],
};

/// Potassium and calcium.
pub static POTASSIUM_CALCIUM: RoundingTable = RoundingTable {
    name: "Potassium/Calcium",
    rules: &[
        tier!(Below(5.0) => ToZero, "Round to 0 mg (< 5)"),
        tier!(From(5.0, 50.0) => NearestMultiple(10.0), "Round to nearest 10 mg (5-50)"),
        tier!(From(50.0, 250.0) => NearestMultiple(25.0), "Round to nearest 25 mg (50-250)"),
        tier!(AtLeast(250.0) => NearestMultiple(50.0), "Round to nearest 50 mg (>= 250)"),
    ],
};

pub static IRON: RoundingTable = RoundingTable {
    name: "Iron",
    rules: &[
        tier!(Below(0.05) => ToZero, "Round to 0 mg (< 0.05)"),
        tier!(From(0.05, 0.5) => NearestMultiple(0.1), "Round to nearest 0.1 mg (0.05-0.5)"),
        tier!(From(0.5, 2.5) => NearestMultiple(0.25), "Round to nearest 0.25 mg (0.5-2.5)"),
        tier!(AtLeast(2.5) => NearestMultiple(0.5), "Round to nearest 0.5 mg (>= 2.5)"),
    ],
};

// %DV tables

pub static FAT_DV: RoundingTable = RoundingTable {
    name: "Fat %DV",
    rules: &[
        tier!(Zero => ToZero, "Round to 0% (if 0%)"),
        tier!(NonZero => NearestMultiple(1.0), "Round to nearest 1% (if > 0%)"),
    ],
};

pub static STANDARD_DV: RoundingTable = RoundingTable {
    name: "Standard %DV",
    rules: &[tier!(Any => NearestMultiple(1.0), "Round to nearest 1%")],
};

// Lookups (keys are lowercase)

/// Nutrient name → quantity table.
pub static QUANTITY_TABLES: Lazy<HashMap<&'static str, &'static RoundingTable>> = Lazy::new(|| {
    HashMap::from([
        ("serving size", &SERVING_SIZE),
        ("calories", &CALORIES),
        ("fat", &FAT),
        ("saturated fat", &FAT),
        ("saturated fatty acids", &FAT),
        ("trans fat", &FAT),
        ("trans fatty acids", &FAT),
        ("cholesterol", &CHOLESTEROL),
        ("sodium", &SODIUM),
        ("carbohydrate", &CARBOHYDRATE),
        ("fibre", &CARBOHYDRATE),
        ("sugars", &CARBOHYDRATE),
        ("protein", &PROTEIN),
        ("potassium", &POTASSIUM_CALCIUM),
        ("calcium", &POTASSIUM_CALCIUM),
        ("iron", &IRON),
    ])
});

/// Nutrient name → %DV table.
pub static DV_TABLES: Lazy<HashMap<&'static str, &'static RoundingTable>> = Lazy::new(|| {
    HashMap::from([
        ("fat", &FAT_DV),
        ("saturated", &FAT_DV),
        ("saturated fat", &FAT_DV),
        ("trans", &FAT_DV),
        ("trans fat", &FAT_DV),
        ("saturated + trans", &FAT_DV),
        ("cholesterol", &STANDARD_DV),
        ("sodium", &STANDARD_DV),
        ("carbohydrate", &STANDARD_DV),
        ("fibre", &STANDARD_DV),
        ("sugars", &STANDARD_DV),
        ("potassium", &STANDARD_DV),
        ("calcium", &STANDARD_DV),
        ("iron", &STANDARD_DV),
    ])
});

/// Every distinct table, for exhaustiveness checks.
pub fn all_tables() -> [&'static RoundingTable; 11] {
    [
        &SERVING_SIZE,
        &CALORIES,
        &FAT,
        &CHOLESTEROL,
        &SODIUM,
        &CARBOHYDRATE,
        &PROTEIN,
        &POTASSIUM_CALCIUM,
        &IRON,
        &FAT_DV,
        &STANDARD_DV,
    ]
}
