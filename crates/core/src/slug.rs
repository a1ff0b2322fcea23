//! URL-safe identifiers for detail pages.

/// Turn display text into a lowercase, hyphen-separated, URL-safe token.
///
/// Whitespace runs become a single hyphen, `&` becomes the word `and`, and
/// every character other than an ASCII letter, digit or hyphen is dropped.
/// Repeated hyphens collapse to one and leading/trailing hyphens are removed.
/// The result may be empty when the input has no alphanumeric characters.
///
/// ```
/// use local_directory_core::slugify;
///
/// assert_eq!(slugify("Joe's Plumbing & Sons-aurora-il"), "joes-plumbing-and-sons-aurora-il");
/// assert_eq!(slugify("  !!!  "), "");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;

    for c in lowered.chars() {
        if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        } else if c == '&' {
            if !slug.is_empty() {
                slug.push('-');
            }
            slug.push_str("and");
            pending_hyphen = true;
        } else if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        }
    }

    slug
}

/// Slug for a business, built from its name and city.
///
/// Including the city keeps slugs readable and avoids collisions between
/// same-named businesses in different cities.
#[must_use]
pub fn business_slug(name: &str, city: &str) -> String {
    slugify(&format!("{name}-{city}"))
}
