use crate::engine::field_resolver;
use crate::facts::LabelFacts;
use serde::{Deserialize, Serialize};

/// Unit placeholder for serving sizes, resolved from the declared text.
pub const SERVING_SIZE_UNIT: &str = "g/mL";

/// Where a nutrition facts table field maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub field: &'static str,
    pub nutrient: &'static str,
    pub unit: &'static str,
    pub is_dv: bool,
}

const fn qty(field: &'static str, nutrient: &'static str, unit: &'static str) -> FieldMapping {
    FieldMapping { field, nutrient, unit, is_dv: false }
}

const fn dv(field: &'static str, nutrient: &'static str) -> FieldMapping {
    FieldMapping { field, nutrient, unit: "%", is_dv: true }
}

/// Extracted nutrition facts fields. English fields precede their French
/// counterparts, and the first declared value of a nutrient wins.
pub static FIELD_MAPPING: &[FieldMapping] = &[
    qty("nft_serving_size_en", "Serving Size", SERVING_SIZE_UNIT),
    qty("nft_serving_size_fr", "Serving Size", SERVING_SIZE_UNIT),
    qty("nft_calories_en", "Calories", "Cal"),
    qty("nft_calories_fr", "Calories", "Cal"),
    qty("nft_fat_en", "Fat", "g"),
    qty("nft_fat_fr", "Fat", "g"),
    qty("nft_saturated_fat_en", "Saturated Fat", "g"),
    qty("nft_saturated_fat_fr", "Saturated Fat", "g"),
    qty("nft_trans_fat_en", "Trans Fat", "g"),
    qty("nft_trans_fat_fr", "Trans Fat", "g"),
    qty("nft_cholesterol_en", "Cholesterol", "mg"),
    qty("nft_cholesterol_fr", "Cholesterol", "mg"),
    qty("nft_sodium_en", "Sodium", "mg"),
    qty("nft_sodium_fr", "Sodium", "mg"),
    qty("nft_carbohydrate_en", "Carbohydrate", "g"),
    qty("nft_carbohydrate_fr", "Carbohydrate", "g"),
    qty("nft_fibre_en", "Fibre", "g"),
    qty("nft_fibre_fr", "Fibre", "g"),
    qty("nft_sugar_en", "Sugars", "g"),
    qty("nft_sugar_fr", "Sugars", "g"),
    qty("nft_protein_en", "Protein", "g"),
    qty("nft_protein_fr", "Protein", "g"),
    qty("nft_potassium_en", "Potassium", "mg"),
    qty("nft_potassium_fr", "Potassium", "mg"),
    qty("nft_calcium_en", "Calcium", "mg"),
    qty("nft_calcium_fr", "Calcium", "mg"),
    qty("nft_iron_en", "Iron", "mg"),
    qty("nft_iron_fr", "Iron", "mg"),
    dv("nft_fat_dv_en", "Fat"),
    dv("nft_fat_dv_fr", "Fat"),
    dv("nft_saturated_trans_dv_en", "Saturated + Trans"),
    dv("nft_saturated_trans_dv_fr", "Saturated + Trans"),
    dv("nft_cholesterol_dv_en", "Cholesterol"),
    dv("nft_cholesterol_dv_fr", "Cholesterol"),
    dv("nft_sodium_dv_en", "Sodium"),
    dv("nft_sodium_dv_fr", "Sodium"),
    dv("nft_carbohydrate_dv_en", "Carbohydrate"),
    dv("nft_carbohydrate_dv_fr", "Carbohydrate"),
    dv("nft_fibre_dv_en", "Fibre"),
    dv("nft_fibre_dv_fr", "Fibre"),
    dv("nft_sugars_dv_en", "Sugars"),
    dv("nft_sugars_dv_fr", "Sugars"),
    dv("nft_potassium_dv_en", "Potassium"),
    dv("nft_potassium_dv_fr", "Potassium"),
    dv("nft_calcium_dv_en", "Calcium"),
    dv("nft_calcium_dv_fr", "Calcium"),
    dv("nft_iron_dv_en", "Iron"),
    dv("nft_iron_dv_fr", "Iron"),
];

/// One declared nutrient amount or %DV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientDeclaration {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub is_dv: bool,
    /// Field the value was read from.
    pub source_field: String,
}

impl NutrientDeclaration {
    pub fn new(name: impl Into<String>, value: f64, unit: impl Into<String>, is_dv: bool) -> Self {
        NutrientDeclaration { name: name.into(), value, unit: unit.into(), is_dv, source_field: String::new() }
    }
}

/// Every mapped field of `facts` that carries a number, in mapping order.
pub fn map_label(facts: &LabelFacts) -> Vec<NutrientDeclaration> {
    FIELD_MAPPING
        .iter()
        .filter_map(|mapping| {
            let raw = field_resolver::resolve(facts, mapping.field)?;
            let decl = declaration(mapping, &raw);
            if decl.is_none() {
                tracing::trace!(field = mapping.field, raw = %raw, "no number in nutrition field");
            }
            decl
        })
        .collect()
}

/// Read the first number in `raw`. `--` marks an undeclared value.
pub fn declaration(mapping: &FieldMapping, raw: &str) -> Option<NutrientDeclaration> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "--" {
        return None;
    }
    let value = regex!(r"[0-9]+(?:\.[0-9]+)?").find(raw)?.as_str().parse::<f64>().ok()?;

    let unit = if mapping.unit == SERVING_SIZE_UNIT {
        serving_size_unit(raw)
    } else {
        mapping.unit
    };

    Some(NutrientDeclaration {
        name: mapping.nutrient.to_string(),
        value,
        unit: unit.to_string(),
        is_dv: mapping.is_dv,
        source_field: mapping.field.to_string(),
    })
}

// `mL` is matched case-sensitively so that "mg" or "ML" do not count.
fn serving_size_unit(raw: &str) -> &'static str {
    if raw.contains("mL") {
        "mL"
    } else if raw.to_lowercase().contains('g') {
        "g"
    } else {
        SERVING_SIZE_UNIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(field: &str) -> &'static FieldMapping {
        FIELD_MAPPING.iter().find(|m| m.field == field).unwrap()
    }

    #[test]
    fn extracts_first_number() {
        let d = declaration(mapping("nft_sodium_en"), "Sodium 140 mg 6 %").unwrap();
        assert_eq!(d.name, "Sodium");
        assert_eq!(d.value, 140.0);
        assert_eq!(d.unit, "mg");
        assert!(!d.is_dv);
        assert_eq!(d.source_field, "nft_sodium_en");
    }

    #[test]
    fn placeholders_are_skipped() {
        assert_eq!(declaration(mapping("nft_fat_en"), "--"), None);
        assert_eq!(declaration(mapping("nft_fat_en"), "  "), None);
        assert_eq!(declaration(mapping("nft_fat_en"), "Per container"), None);
    }

    #[test]
    fn serving_size_unit_follows_text() {
        let ss = mapping("nft_serving_size_en");
        assert_eq!(declaration(ss, "250 mL").unwrap().unit, "mL");
        assert_eq!(declaration(ss, "1 cup (30 G)").unwrap().unit, "g");
        assert_eq!(declaration(ss, "2 cookies 30").unwrap().unit, SERVING_SIZE_UNIT);
    }

    #[test]
    fn maps_label_fields_in_table_order() {
        let facts: LabelFacts = serde_json::from_value(json!({
            "fields": {
                "nft_fat_dv_en": {"text": "12 %", "confidence": 0.9},
                "nft_calories_en": {"text": "Calories 110", "confidence": 0.9},
                "nft_fat_en": "8 g",
                "nft_protein_en": "--",
                "unrelated_field": "42"
            }
        }))
        .unwrap();

        let mapped: Vec<(String, f64, bool)> =
            map_label(&facts).into_iter().map(|d| (d.name, d.value, d.is_dv)).collect();
        assert_eq!(
            mapped,
            vec![("Calories".to_string(), 110.0, false), ("Fat".to_string(), 8.0, false), ("Fat".to_string(), 12.0, true)]
        );
    }

    #[test]
    fn every_mapped_nutrient_has_a_rounding_table() {
        use crate::rules::rounding::{TableKind, table};
        for m in FIELD_MAPPING {
            assert!(table(m.nutrient, TableKind::from_dv_flag(m.is_dv)).is_ok(), "{}", m.field);
        }
    }
}
