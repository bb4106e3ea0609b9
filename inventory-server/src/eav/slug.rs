/// Derive a URL-safe slug from a display name.
///
/// Lowercased and trimmed; whitespace runs become `-`; anything other than
/// ASCII letters, digits, `_` and `-` is dropped; repeated dashes collapse
/// and leading/trailing dashes are removed. May return an empty string.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.trim().to_lowercase().chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Orologi"), "orologi");
        assert_eq!(slugify("  Colore  Cinturino "), "colore-cinturino");
        assert_eq!(slugify("Data_acquisto"), "data_acquisto");
    }

    #[test]
    fn test_slugify_drops_symbols_and_collapses_dashes() {
        assert_eq!(slugify("Gioielli & Accessori"), "gioielli-accessori");
        assert_eq!(slugify("--Prezzo -- (€)--"), "prezzo");
        assert_eq!(slugify("Città"), "citt");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("   "), "");
    }
}
