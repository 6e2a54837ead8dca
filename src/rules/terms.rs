//! Keyword terms matched against both the ingredient list and the nutrition
//! facts table.
//!
//! Sweetener and supplement tables store keywords as they are written on a
//! label ("l-arginine"). Both the keyword and the label text go through
//! [`normalize_text`] before the substring test, so punctuation never decides
//! a match.

use crate::rules::allergens::normalize_text;
use serde::{Deserialize, Serialize};

/// Which text a term was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Ingredients,
    Nft,
    Both,
}

impl MatchSource {
    pub fn from_hits(in_ingredients: bool, in_nft: bool) -> Option<MatchSource> {
        match (in_ingredients, in_nft) {
            (true, true) => Some(MatchSource::Both),
            (true, false) => Some(MatchSource::Ingredients),
            (false, true) => Some(MatchSource::Nft),
            (false, false) => None,
        }
    }
}

/// A table keyword with its category and search needle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub name: &'static str,
    pub category: &'static str,
    pub needle: String,
}

/// Flatten a `category -> keywords` table into terms, in table order.
pub fn terms(table: &'static [(&'static str, &'static [&'static str])]) -> Vec<Term> {
    table
        .iter()
        .flat_map(|&(category, names)| {
            names.iter().map(move |&name| Term { name, category, needle: normalize_text(name) })
        })
        .collect()
}

/// Ingredient and nutrition facts text, normalized once per label.
#[derive(Debug, Clone, Default)]
pub struct ScanTexts {
    pub ingredients: String,
    pub nft: String,
}

impl ScanTexts {
    pub fn new(ingredients: &str, nft: &str) -> Self {
        ScanTexts { ingredients: normalize_text(ingredients), nft: normalize_text(nft) }
    }

    /// Where `term` occurs, if anywhere.
    pub fn locate(&self, term: &Term) -> Option<MatchSource> {
        if term.needle.is_empty() {
            return None;
        }
        MatchSource::from_hits(self.ingredients.contains(&term.needle), self.nft.contains(&term.needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TABLE: &[(&str, &[&str])] = &[("Amino Acid", &["l-arginine", "taurine"]), ("Other", &["choline"])];

    #[test]
    fn needles_are_normalized() {
        let t = terms(TABLE);
        let needles: Vec<(&str, &str)> = t.iter().map(|t| (t.name, t.needle.as_str())).collect();
        assert_eq!(needles, vec![("l-arginine", "l arginine"), ("taurine", "taurine"), ("choline", "choline")]);
        assert_eq!(t[2].category, "Other");
    }

    #[test]
    fn locates_terms_in_either_text() {
        let t = terms(TABLE);
        let texts = ScanTexts::new("Water, L-Arginine, taurine.", "Taurine 1000 mg");
        assert_eq!(texts.locate(&t[0]), Some(MatchSource::Ingredients));
        assert_eq!(texts.locate(&t[1]), Some(MatchSource::Both));
        assert_eq!(texts.locate(&t[2]), None);

        let nft_only = ScanTexts::new("", "Choline 50 mg");
        assert_eq!(nft_only.locate(&t[2]), Some(MatchSource::Nft));
    }

    #[test]
    fn source_serializes_snake_case() {
        assert_eq!(serde_json::to_value(MatchSource::Nft).unwrap(), serde_json::json!("nft"));
        assert_eq!(MatchSource::from_hits(false, false), None);
    }
}
