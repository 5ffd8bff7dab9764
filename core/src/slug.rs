/// Convert a human-readable name to a URL-safe slug.
/// e.g. "Jollof Rice" -> "jollof-rice", "Efo  Riro!" -> "efo-riro"
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true; // suppress a leading dash

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Append a numeric suffix to a base slug: "jollof-rice" + 2 -> "jollof-rice-2".
pub fn suffixed(base: &str, n: u32) -> String {
    format!("{}-{}", base, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_title() {
        assert_eq!(slugify("Jollof Rice"), "jollof-rice");
    }

    #[test]
    fn test_punctuation_collapses() {
        assert_eq!(slugify("Efo  Riro!"), "efo-riro");
        assert_eq!(slugify("Moi-Moi (wrapped)"), "moi-moi-wrapped");
    }

    #[test]
    fn test_leading_trailing_junk() {
        assert_eq!(slugify("  Pepper Soup  "), "pepper-soup");
        assert_eq!(slugify("---Akara---"), "akara");
    }

    #[test]
    fn test_non_ascii_dropped() {
        assert_eq!(slugify("Fufu à la maison"), "fufu-la-maison");
    }

    #[test]
    fn test_suffixed() {
        assert_eq!(suffixed("jollof-rice", 2), "jollof-rice-2");
    }
}
