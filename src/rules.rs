//! Closed-form regulatory rules: rounding tables, keyword detectors
//! (allergens and gluten, sweeteners, supplements), net quantity checks and
//! the nutrition facts audit.

pub mod terms;

pub mod rounding {
    pub mod helpers;
    mod lookup;
    pub mod predicates;
    pub mod tables;

    pub use helpers::{Rounding, round_to_multiple};
    pub use lookup::{Rounded, TableKind, round, round_with_rule, table};
    pub use predicates::Condition;
    pub use tables::{RoundingRule, RoundingTable};

    #[cfg(test)]
    mod tests;
}

pub mod allergens {
    pub mod detector;
    pub mod keywords;

    pub use detector::{
        AllergenGlutenDetectionResult, DetectedAllergenOrGluten, DetectionKind, DetectionScope, detect, detect_with,
        normalize_text,
    };
}

pub mod sweeteners {
    pub mod detector;
    pub mod keywords;

    pub use detector::{DetectedSweetener, QuantityRequirement, SweetenerDetectionResult, detect, nft_quantities};

    #[cfg(test)]
    mod tests;
}

pub mod supplements {
    pub mod detector;
    pub mod keywords;

    pub use detector::{DetectedSupplement, SupplementDetectionResult, detect};

    #[cfg(test)]
    mod tests;
}

pub mod net_quantity {
    pub mod checks;
    pub mod helpers;
    pub mod parser;

    pub use checks::{NetQuantityOptions, NetQuantityReport, evaluate};
    pub use parser::{Manner, NetQuantityParseResult, parse, parse_text};
}

pub mod nutrition {
    pub mod audit;
    pub mod cross_check;
    pub mod mapping;

    pub use audit::{AuditResult, AuditStatus, NutritionAudit, audit_label, audit_nutrient};
    pub use cross_check::{CrossFieldResult, DAILY_VALUES};
    pub use mapping::{NutrientDeclaration, map_label};
}
