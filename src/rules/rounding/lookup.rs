use crate::error::ConfigError;
use crate::rules::rounding::tables::{DV_TABLES, QUANTITY_TABLES, RoundingRule, RoundingTable};

/// Which family of tables a value is rounded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Raw nutrient amount (g, mg, Cal).
    Quantity,
    /// Percent daily value.
    PercentDv,
}

impl TableKind {
    pub fn from_dv_flag(is_percent_dv: bool) -> Self {
        if is_percent_dv { TableKind::PercentDv } else { TableKind::Quantity }
    }

    fn label(self) -> &'static str {
        match self {
            TableKind::Quantity => "quantity",
            TableKind::PercentDv => "%DV",
        }
    }
}

/// A rounded value together with the tier that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rounded {
    pub value: f64,
    pub rule: &'static RoundingRule,
}

/// Look up the table for `category`. Names match case-insensitively.
pub fn table(category: &str, kind: TableKind) -> Result<&'static RoundingTable, ConfigError> {
    let key = category.trim().to_lowercase();
    let tables = match kind {
        TableKind::Quantity => &QUANTITY_TABLES,
        TableKind::PercentDv => &DV_TABLES,
    };
    tables
        .get(key.as_str())
        .copied()
        .ok_or_else(|| ConfigError::UnknownCategory { category: category.to_string(), table: kind.label() })
}

/// Round `value` with the first matching tier of the table for `category`.
pub fn round(value: f64, category: &str, is_percent_dv: bool) -> Result<f64, ConfigError> {
    round_with_rule(value, category, is_percent_dv).map(|rounded| rounded.value)
}

/// Like [`round`], also returning the tier that was applied.
pub fn round_with_rule(value: f64, category: &str, is_percent_dv: bool) -> Result<Rounded, ConfigError> {
    let table = table(category, TableKind::from_dv_flag(is_percent_dv))?;

    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidValue { category: category.to_string(), value });
    }

    // Tables partition [0, inf), so a finite non-negative value always lands.
    let rule = table.tier(value).ok_or_else(|| ConfigError::InvalidValue { category: category.to_string(), value })?;
    Ok(Rounded { value: rule.action.apply(value), rule })
}
