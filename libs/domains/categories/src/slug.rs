//! URL slugs derived from display names.

use deunicode::deunicode;

/// Lowercase, dash-separated ASCII form of `name`.
///
/// Non-ASCII text is transliterated first (`é` becomes `e`). Runs of
/// whitespace, `-` and `_` collapse into a single `-`; any other punctuation
/// is dropped. Leading and trailing separators never appear.
///
/// ```
/// use domain_categories::slugify;
///
/// assert_eq!(slugify("Running Shoes"), "running-shoes");
/// assert_eq!(slugify("  Men's T-Shirts & Tops "), "mens-t-shirts-tops");
/// assert_eq!(slugify("Café Crème"), "cafe-creme");
/// ```
pub fn slugify(name: &str) -> String {
    let ascii = deunicode(name);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_separator = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_joins_words() {
        assert_eq!(slugify("Running Shoes"), "running-shoes");
        assert_eq!(slugify("TV"), "tv");
    }

    #[test]
    fn test_separator_runs_collapse() {
        assert_eq!(slugify("snake_case__name"), "snake-case-name");
        assert_eq!(slugify("a - b\t\tc"), "a-b-c");
    }

    #[test]
    fn test_punctuation_is_dropped() {
        assert_eq!(slugify("Men's T-Shirts & Tops!"), "mens-t-shirts-tops");
        assert_eq!(slugify("Home/Garden"), "homegarden");
    }

    #[test]
    fn test_edges_are_trimmed() {
        assert_eq!(slugify("  --Outdoor--  "), "outdoor");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_accents_are_transliterated() {
        assert_eq!(slugify("Café Crème"), "cafe-creme");
        assert_eq!(slugify("Straße Ñandú"), "strasse-nandu");
    }

    #[test]
    fn test_non_latin_scripts_stay_url_safe() {
        let slug = slugify("Ελληνικά 日本");
        assert!(!slug.is_empty());
        assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }

    #[test]
    fn test_is_deterministic() {
        assert_eq!(slugify("Kids & Baby"), slugify("Kids & Baby"));
    }
}
