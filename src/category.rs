//! Keyword-driven product categorization.
//!
//! Rules are evaluated top to bottom and the first keyword hit wins, so
//! earlier rules deliberately shadow later ones ("coconut oil" lands in
//! Oils before the Coconut rule can see it). Rule order is behavior; do not
//! re-sort this table.

/// Fallback label for products no rule recognizes.
pub const OTHER: &str = "Other";

const CATEGORY_RULES: &[(&[&str], &str)] = &[
    (
        &["jaggery", "sarkarai", "vellam", "nattu sarkarai", "palm jaggery", "urundai", "karupatti"],
        "Jaggery Products",
    ),
    (
        &[
            "rice", "idly", "ponni", "seeraga", "thooyamalli", "kichali", "kullakar", "aathur",
            "mappillai", "kavuni", "sornavari", "kattuyanam",
        ],
        "Rice",
    ),
    (
        &["oil", "groundnut oil", "sesame oil", "coconut oil", "gingelly"],
        "Oils",
    ),
    (
        &[
            "dal", "dals", "rajma", "urad", "channa", "horsegram", "kollu", "moong", "toor",
            "green peas", "pattani", "black urad",
        ],
        "Dals & Pulses",
    ),
    (
        &[
            "millet", "ragi", "kambu", "thinai", "varagu", "saamai", "kuthiraivali", "barnyard",
            "foxtail", "kodo", "proso", "little millet",
        ],
        "Millets",
    ),
    (
        &["flour", "maavu", "rava", "sooji", "semolina", "idiyappam", "puttu"],
        "Flours",
    ),
    (&["coffee"], "Coffee"),
    (
        &["moringa", "health mix", "mooligai", "herbal", "sathumaavu"],
        "Health Products",
    ),
    (&["honey"], "Honey"),
    (&["ghee", "butter"], "Ghee & Butter"),
    (
        &[
            "turmeric", "pepper", "chilli", "coriander", "cumin", "jeera", "ginger", "cardamom",
            "mustard", "fenugreek", "asafoetida", "hing", "spice", "masala", "tamarind",
            "dry ginger",
        ],
        "Spices",
    ),
    (&["coconut"], "Coconut"),
    (&["aval", "poha", "beaten rice"], "Aval (Poha)"),
    (
        &["banana", "mango", "malai", "fruit", "vegetables", "veggie"],
        "Fresh Produce",
    ),
    (&["laddu", "sweet", "candy", "chocolate"], "Sweets"),
    (&["pickle", "thokku", "chutney", "pachadi"], "Pickles"),
    (&["tea", "green tea", "herbal tea"], "Tea"),
];

/// Classifies free-text product names into the fixed category vocabulary.
/// Blank input short-circuits to `Other` without scanning the rules.
pub fn classify(product: &str) -> &'static str {
    let lowered = product.trim().to_lowercase();
    if lowered.is_empty() {
        return OTHER;
    }
    for &(keywords, label) in CATEGORY_RULES {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return label;
        }
    }
    OTHER
}

/// Maps a free-text hint onto a category label from the fixed vocabulary,
/// or `None` when the hint names no known category. Used when a source file
/// carries its own category column that classification could not improve on.
pub fn canonical_label(hint: &str) -> Option<&'static str> {
    let trimmed = hint.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.eq_ignore_ascii_case(OTHER) {
        return Some(OTHER);
    }
    CATEGORY_RULES
        .iter()
        .map(|(_, label)| *label)
        .find(|label| label.eq_ignore_ascii_case(trimmed))
}
