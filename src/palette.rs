//! Tag color utilities.
use rand::RngExt;

/// Fixed palette tags draw their color from.
pub const TAG_COLORS: &[&str] = &[
    "#EF4444", "#F97316", "#F59E0B", "#84CC16", "#22C55E", "#14B8A6", "#06B6D4", "#3B82F6",
    "#6366F1", "#8B5CF6", "#A855F7", "#EC4899",
];

/// Validate if a string is a valid hex color (e.g., #RRGGBB).
pub fn is_valid_hex(s: &str) -> bool {
    s.starts_with('#') && s.len() == 7 && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Picks the first palette color not yet in `used`, or a random palette
/// color once every entry is taken.
pub fn pick_tag_color<'a, I>(used: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let used: Vec<&str> = used.into_iter().collect();
    TAG_COLORS
        .iter()
        .find(|c| !used.iter().any(|u| u.eq_ignore_ascii_case(c)))
        .map(|c| c.to_string())
        .unwrap_or_else(random_color)
}

/// Generate a random color from the palette.
pub fn random_color() -> String {
    let mut rng = rand::rng();
    TAG_COLORS[rng.random_range(0..TAG_COLORS.len())].to_string()
}
