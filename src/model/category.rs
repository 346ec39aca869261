// File: ./src/model/category.rs
//! Trade category inference for scope descriptions.

pub const DEFAULT_CATEGORY: &str = "General Construction";

/// Ordered category -> keyword table. The first category with a keyword
/// contained in the (lowercased) description wins, so order matters:
/// "ac" under HVAC would otherwise swallow half the dictionary.
pub static CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Demolition", &["demo", "remove", "tear out", "disposal"]),
    (
        "Plumbing",
        &[
            "plumb", "pipe", "drain", "sink", "toilet", "faucet", "shower", "tub",
        ],
    ),
    (
        "Electrical",
        &[
            "electric", "wire", "outlet", "switch", "light", "panel", "circuit",
        ],
    ),
    ("Framing", &["frame", "stud", "joist", "beam", "wall"]),
    (
        "Drywall",
        &["drywall", "sheetrock", "tape", "mud", "texture"],
    ),
    (
        "Flooring",
        &["floor", "tile", "carpet", "hardwood", "vinyl", "laminate"],
    ),
    ("Painting", &["paint", "primer", "stain"]),
    ("Cabinetry", &["cabinet", "vanity", "shelv"]),
    ("Roofing", &["roof", "shingle", "flashing", "gutter"]),
    ("Windows", &["window", "glass"]),
    ("Doors", &["door", "entry", "interior"]),
    (
        "HVAC",
        &["hvac", "heating", "cooling", "furnace", "ac", "duct"],
    ),
    ("Fixtures", &["fixture", "hardware"]),
    ("Materials", &["material", "supply", "supplies"]),
];

/// Infer a trade category from a cleaned description.
pub fn infer_category(description: &str) -> &'static str {
    let lower = description.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_category_wins() {
        // "remove" (Demolition) beats "cabinet" (Cabinetry)
        assert_eq!(infer_category("Remove existing cabinets"), "Demolition");
        assert_eq!(infer_category("Install new cabinets"), "Cabinetry");
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(infer_category("NEW FURNACE"), "HVAC");
        assert_eq!(infer_category("10 Windows"), "Windows");
    }

    #[test]
    fn unknown_text_falls_back_to_default() {
        assert_eq!(infer_category("Permit fees"), DEFAULT_CATEGORY);
        assert_eq!(infer_category(""), DEFAULT_CATEGORY);
    }
}
