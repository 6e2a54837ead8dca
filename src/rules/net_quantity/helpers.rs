use crate::rules::net_quantity::parser::Manner;

/// Metric symbols. These read the same in English and French.
pub const VOLUME_SYMBOLS: &[&str] = &["ml", "mL", "mℓ", "L", "l", "ℓ", "cl", "cL"];
pub const WEIGHT_SYMBOLS: &[&str] = &["g", "kg", "mg"];

pub const US_WEIGHT_UNITS: &[&str] = &["oz", "lb", "lbs"];
pub const COUNT_UNITS: &[&str] = &["bars", "pieces", "count", "units", "pack"];

/// Spelled-out units whose presence calls for a bilingual declaration.
pub const SPELLED_UNITS_EN: &[&str] =
    &["millilitre", "millilitres", "litre", "litres", "gram", "grams", "kilogram", "kilograms"];
pub const SPELLED_UNITS_FR: &[&str] =
    &["millilitre", "millilitres", "litre", "litres", "gramme", "grammes", "kilogramme", "kilogrammes"];

/// Parse a decimal number, accepting `,` as the decimal separator.
pub fn parse_decimal(s: &str) -> Option<f64> {
    s.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Collapse `fl. oz`, `FL  OZ`, `floz` to `fl oz`; lowercase everything else.
fn unit_key(unit: &str) -> String {
    let lower = unit.to_lowercase();
    regex!(r"^fl\.?\s*oz$").replace(&lower, "fl oz").into_owned()
}

/// Classify the unit token following a quantity. No unit means a count.
pub fn classify_unit(unit: Option<&str>) -> Option<Manner> {
    let Some(unit) = unit.filter(|u| !u.is_empty()) else {
        return Some(Manner::Count);
    };
    let key = unit_key(unit);
    let key = key.as_str();

    let in_set = |set: &[&str]| set.iter().any(|s| s.to_lowercase() == key);

    if in_set(VOLUME_SYMBOLS) || key == "fl oz" {
        Some(Manner::Volume)
    } else if in_set(WEIGHT_SYMBOLS) || in_set(US_WEIGHT_UNITS) {
        Some(Manner::Weight)
    } else if in_set(COUNT_UNITS) {
        Some(Manner::Count)
    } else {
        None
    }
}

/// Exact (case-sensitive) metric symbol.
pub fn is_metric_symbol(unit: &str) -> bool {
    VOLUME_SYMBOLS.contains(&unit) || WEIGHT_SYMBOLS.contains(&unit)
}

pub fn is_spelled_unit(unit: &str) -> bool {
    let lower = unit.to_lowercase();
    SPELLED_UNITS_EN.contains(&lower.as_str()) || SPELLED_UNITS_FR.contains(&lower.as_str())
}

/// Significant figures of a whole number, ignoring trailing zeros.
pub fn significant_figures(whole: u64) -> usize {
    if whole == 0 {
        return 1;
    }
    whole.to_string().trim_end_matches('0').len()
}

/// `500` for whole values, `1.5` otherwise.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 { format!("{}", value as i64) } else { format!("{value}") }
}
