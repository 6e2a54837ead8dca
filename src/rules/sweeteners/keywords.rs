//! Sweetener tables.
//!
//! Polyols must state their amount in the nutrition facts table; the other
//! sweeteners only need to be listed.

use crate::rules::terms::{Term, terms};
use once_cell::sync::Lazy;

/// Sweeteners whose quantity must be declared.
pub static SWEETENERS_WITH_QUANTITY: &[(&str, &[&str])] = &[(
    "Polyol",
    &[
        "polydextrose",
        "erythritol",
        "isomalt",
        "lactitol",
        "maltitol",
        "maltitol syrup",
        "mannitol",
        "sorbitol",
        "sorbitol syrup",
        "xylitol",
        "hydrogenated starch hydrolysates",
    ],
)];

/// Sweeteners without a quantity requirement.
pub static SWEETENERS_NO_QUANTITY: &[(&str, &[&str])] = &[
    ("Non-Nutritive", &["acesulfame potassium", "advantame", "aspartame", "neotame", "sucralose", "thaumatin"]),
    ("Saccharin", &["saccharin", "calcium saccharin", "potassium saccharin", "sodium saccharin"]),
    (
        "Steviol Glycoside",
        &[
            "steviol glycosides",
            "stevia extract",
            "stevia leaf extract",
            "rebaudioside a",
            "rebaudioside m",
            "rebaudioside b",
            "rebaudioside c",
            "rebaudioside d",
            "rebaudioside f",
            "rebiana",
            "dulcoside a",
            "rubusoside",
            "steviolbioside",
            "stevioside",
        ],
    ),
    ("Monk Fruit", &["monk fruit extract"]),
];

pub static WITH_QUANTITY_TERMS: Lazy<Vec<Term>> = Lazy::new(|| terms(SWEETENERS_WITH_QUANTITY));

pub static NO_QUANTITY_TERMS: Lazy<Vec<Term>> = Lazy::new(|| terms(SWEETENERS_NO_QUANTITY));
