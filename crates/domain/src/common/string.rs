//! String normalization utilities.

/// Case-insensitive comparison key for names.
///
/// Two skills whose keys are equal are the same skill as far as the ladder is
/// concerned.
///
/// ```
/// use fatesheet_domain::common::name_key;
///
/// assert_eq!(name_key("  Fight "), "fight");
/// assert_eq!(name_key("FIGHT"), name_key("fight"));
/// ```
pub fn name_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Lower-case the value and collapse every run of non-alphanumeric characters
/// into a single `-`, with no leading or trailing dash.
///
/// ```
/// use fatesheet_domain::common::slugify;
///
/// assert_eq!(slugify("Sleight of Hand"), "sleight-of-hand");
/// assert_eq!(slugify("__Will/Power__"), "will-power");
/// assert_eq!(slugify("!!!"), "");
/// ```
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for ch in value.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Lower-case and collapse all whitespace runs to one space.
///
/// Used to compare free text (stunt descriptions, hint narratives) loosely.
pub fn normalize_text(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Trimmed copy of the value, or `None` when nothing is left.
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
