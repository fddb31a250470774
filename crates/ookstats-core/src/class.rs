//! Class colors used to tint search results

/// Fallback for unknown classes
pub const DEFAULT_CLASS_COLOR: &str = "#FFFFFF";

const CLASS_COLORS: &[(&str, &str)] = &[
    ("death_knight", "#C41E3A"),
    ("druid", "#FF7C0A"),
    ("hunter", "#AAD372"),
    ("mage", "#3FC7EB"),
    ("monk", "#00FF98"),
    ("paladin", "#F48CBA"),
    ("priest", "#FFFFFF"),
    ("rogue", "#FFF468"),
    ("shaman", "#0070DD"),
    ("warlock", "#8788EE"),
    ("warrior", "#C69B6D"),
];

/// Canonical class key: lowercase, whitespace runs collapsed to `_`
pub fn class_key(class_name: &str) -> String {
    class_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Hex color for a class name such as "Death Knight"
pub fn class_color(class_name: &str) -> &'static str {
    let key = class_key(class_name);
    CLASS_COLORS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_CLASS_COLOR)
}
