//! Supplemented ingredients that trigger the supplemented food facts table.

use crate::rules::terms::{Term, terms};
use once_cell::sync::Lazy;

pub static SUPPLEMENTS: &[(&str, &[&str])] = &[
    (
        "Amino Acid",
        &["l-arginine", "l-citrulline", "l-glutamine", "l-leucine", "l-isoleucine", "l-valine", "taurine"],
    ),
    (
        "Bioactive",
        &[
            "caffeine",
            "green tea extract",
            "inositol",
            "panax ginseng extract",
            "coenzyme q10",
            "glucosamine",
            "chondroitin sulfate",
        ],
    ),
    (
        "Vitamin",
        &[
            "vitamin a",
            "vitamin b1",
            "thiamine",
            "vitamin b2",
            "riboflavin",
            "vitamin b3",
            "niacin",
            "vitamin b5",
            "pantothenic acid",
            "vitamin b6",
            "vitamin b7",
            "biotin",
            "vitamin b9",
            "folate",
            "vitamin b12",
            "vitamin c",
            "vitamin d",
            "vitamin e",
        ],
    ),
    (
        "Mineral",
        &[
            "calcium",
            "iron",
            "magnesium",
            "potassium",
            "zinc",
            "selenium",
            "copper",
            "manganese",
            "chromium",
            "molybdenum",
        ],
    ),
    ("Other", &["choline", "lutein", "lycopene"]),
];

pub static SUPPLEMENT_TERMS: Lazy<Vec<Term>> = Lazy::new(|| terms(SUPPLEMENTS));

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let mut seen = HashSet::new();
        for term in SUPPLEMENT_TERMS.iter() {
            assert!(seen.insert(term.name), "duplicate supplement {}", term.name);
        }
        assert_eq!(seen.len(), 45);
        assert_eq!(SUPPLEMENTS.len(), 5);
    }

    #[test]
    fn hyphenated_names_search_without_the_hyphen() {
        let arginine = SUPPLEMENT_TERMS.iter().find(|t| t.name == "l-arginine").unwrap();
        assert_eq!(arginine.needle, "l arginine");
        assert_eq!(arginine.category, "Amino Acid");
    }
}
