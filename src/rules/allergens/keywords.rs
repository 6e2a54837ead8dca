//! Keyword universes for allergen and gluten-source detection.
//!
//! Each universe maps a category to the keywords that signal it. Every keyword
//! belongs to exactly one category within its universe; the same word may
//! appear in both universes ("wheat" is an allergen and a gluten source).

use once_cell::sync::Lazy;

/// Priority allergens (11 categories).
pub static PRIORITY_ALLERGENS: &[(&str, &[&str])] = &[
    (
        "Eggs",
        &[
            "egg",
            "eggs",
            "egg white",
            "egg yolk",
            "egg powder",
            "dried egg",
            "liquid egg",
            "albumin",
            "ovalbumin",
            "ovomucin",
            "ovotransferrin",
            "lysozyme",
            // can be egg-derived
            "lecithin",
        ],
    ),
    (
        "Milk",
        &[
            "milk",
            "cream",
            "butter",
            "cheese",
            "yogurt",
            "yoghurt",
            "whey",
            "casein",
            "caseinate",
            "lactose",
            "lactalbumin",
            "lactoglobulin",
            "curds",
            "ghee",
            "buttermilk",
            "dairy",
        ],
    ),
    ("Mustard", &["mustard", "mustard seed", "mustard flour", "mustard oil"]),
    (
        "Peanuts",
        &["peanut", "peanuts", "peanut butter", "peanut oil", "peanut flour", "groundnut", "arachis oil"],
    ),
    (
        "Crustaceans and Molluscs",
        &[
            "crab",
            "lobster",
            "shrimp",
            "prawn",
            "crayfish",
            "langoustine",
            "krill",
            "barnacle",
            "oyster",
            "clam",
            "mussel",
            "scallop",
            "squid",
            "octopus",
            "snail",
            "abalone",
            "cockle",
            "periwinkle",
            "whelk",
            "crustacean",
            "mollusc",
            "shellfish",
        ],
    ),
    (
        "Fish",
        &[
            "fish",
            "salmon",
            "tuna",
            "cod",
            "haddock",
            "halibut",
            "anchovy",
            "anchovies",
            "sardine",
            "sardines",
            "mackerel",
            "herring",
            "trout",
            "bass",
            "tilapia",
            "pollock",
            "catfish",
            "fish sauce",
            "fish oil",
        ],
    ),
    ("Sesame Seeds", &["sesame", "sesame seed", "sesame oil", "tahini", "sesamol", "sesamolin"]),
    (
        "Soy",
        &[
            "soy",
            "soya",
            "soybean",
            "soybeans",
            "soy protein",
            "soy lecithin",
            "tofu",
            "tempeh",
            "miso",
            "edamame",
            "soy sauce",
            "tamari",
            "textured vegetable protein",
            "tvp",
        ],
    ),
    (
        "Sulphites",
        &[
            "sulphite",
            "sulfite",
            "sulphites",
            "sulfites",
            "sulfur dioxide",
            "sulphur dioxide",
            "sodium sulphite",
            "sodium sulfite",
            "sodium bisulphite",
            "sodium bisulfite",
            "sodium metabisulphite",
            "sodium metabisulfite",
            "potassium bisulphite",
            "potassium bisulfite",
            "potassium metabisulphite",
            "potassium metabisulfite",
        ],
    ),
    (
        "Tree Nuts",
        &[
            "almond",
            "almonds",
            "brazil nut",
            "brazil nuts",
            "cashew",
            "cashews",
            "hazelnut",
            "hazelnuts",
            "macadamia",
            "macadamia nut",
            "pecan",
            "pecans",
            "pine nut",
            "pine nuts",
            "pistachio",
            "pistachios",
            "walnut",
            "walnuts",
            "chestnut",
            "chestnuts",
            "beechnut",
            "butternut",
            "hickory nut",
            "shea nut",
            "tree nut",
        ],
    ),
    (
        "Wheat and Triticale",
        &["wheat", "triticale", "wheat flour", "wheat starch", "wheat bran", "wheat germ", "bulgur", "couscous"],
    ),
];

/// Gluten sources (6 base grains).
pub static GLUTEN_SOURCES: &[(&str, &[&str])] = &[
    ("Wheat", &["wheat", "wheat flour", "wheat starch", "wheat bran", "wheat germ"]),
    ("Oats", &["oat", "oats", "oat flour", "oat bran", "oatmeal"]),
    ("Barley", &["barley", "barley flour", "barley malt", "malt", "malted barley"]),
    ("Rye", &["rye", "rye flour", "rye bread"]),
    ("Triticale", &["triticale"]),
    ("Hybridized Strains", &["spelt", "kamut", "farro", "einkorn", "emmer"]),
];

/// A keyword with the category it signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    pub keyword: &'static str,
    pub category: &'static str,
}

/// Allergen keywords, longest first.
pub static ALLERGEN_KEYWORDS: Lazy<Vec<Keyword>> = Lazy::new(|| by_length(PRIORITY_ALLERGENS));

/// Gluten keywords, longest first.
pub static GLUTEN_KEYWORDS: Lazy<Vec<Keyword>> = Lazy::new(|| by_length(GLUTEN_SOURCES));

/// Flatten a universe into keywords ordered by descending length.
///
/// Multi-word keywords are therefore tried before the shorter words they
/// contain. Equal lengths keep table order.
fn by_length(universe: &'static [(&'static str, &'static [&'static str])]) -> Vec<Keyword> {
    let mut keywords: Vec<Keyword> = universe
        .iter()
        .flat_map(|&(category, words)| words.iter().map(move |&keyword| Keyword { keyword, category }))
        .collect();
    keywords.sort_by(|a, b| b.keyword.len().cmp(&a.keyword.len()));
    keywords
}
