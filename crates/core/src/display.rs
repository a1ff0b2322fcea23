//! Human-readable labels for stored keys.

/// Display name for a city key.
///
/// Hyphen-separated words are capitalised. A trailing two-letter segment is
/// treated as a state code and upper-cased after a comma.
///
/// ```
/// use local_directory_core::display::city_display;
///
/// assert_eq!(city_display("aurora-il"), "Aurora, IL");
/// assert_eq!(city_display("st-charles-il"), "St Charles, IL");
/// assert_eq!(city_display("chicago"), "Chicago");
/// ```
#[must_use]
pub fn city_display(city: &str) -> String {
    let parts: Vec<&str> = city.split('-').filter(|part| !part.is_empty()).collect();

    match parts.split_last() {
        Some((state, locality)) if state.len() == 2 && !locality.is_empty() => {
            let locality: Vec<String> = locality.iter().map(|part| capitalize(part)).collect();
            format!("{}, {}", locality.join(" "), state.to_uppercase())
        }
        _ => parts
            .iter()
            .map(|part| capitalize(part))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Display name for a category key (`plumbers` becomes `Plumbers`).
#[must_use]
pub fn category_display(category: &str) -> String {
    capitalize(category)
}

/// Link target for a stored website, adding `https://` when no scheme is
/// present.
#[must_use]
pub fn website_href(website: &str) -> String {
    if website.starts_with("http") {
        website.to_string()
    } else {
        format!("https://{website}")
    }
}

/// Link text for a stored website, without its `http(s)://` prefix.
#[must_use]
pub fn website_label(website: &str) -> &str {
    ["https://", "http://"]
        .iter()
        .find_map(|scheme| {
            website
                .get(..scheme.len())
                .filter(|prefix| prefix.eq_ignore_ascii_case(scheme))
                .and_then(|_| website.get(scheme.len()..))
        })
        .unwrap_or(website)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
