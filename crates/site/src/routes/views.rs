//! Display data shared by several page templates.

use local_directory_core::display::{category_display, city_display, website_href, website_label};
use local_directory_core::pagination::{PageLink, page_window};
use local_directory_core::{Business, GroupCount};

use crate::config::SiteConfig;

/// Title, description and brand for the `<head>` of every page.
#[derive(Clone)]
pub struct PageMeta {
    pub site_name: String,
    pub title: String,
    pub description: String,
}

impl PageMeta {
    /// Meta for a page; the site name is appended to the title.
    #[must_use]
    pub fn new(config: &SiteConfig, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            site_name: config.site_name.clone(),
            title: format!("{} - {}", title.into(), config.site_name),
            description: description.into(),
        }
    }
}

/// A business as shown in a listing grid.
#[derive(Clone)]
pub struct BusinessCardView {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub phone: String,
    pub address: Option<String>,
    pub website_href: Option<String>,
    pub website_label: Option<String>,
    pub email: Option<String>,
    pub is_featured: bool,
}

impl From<&Business> for BusinessCardView {
    fn from(business: &Business) -> Self {
        Self {
            slug: business.slug.clone(),
            name: business.name.clone(),
            description: business.description.clone().unwrap_or_default(),
            phone: business.phone.clone(),
            address: business.address.clone(),
            website_href: business.website.as_deref().map(website_href),
            website_label: business
                .website
                .as_deref()
                .map(|w| website_label(w).to_string()),
            email: business.email.clone(),
            is_featured: business.is_featured,
        }
    }
}

/// One entry of a category or city filter.
#[derive(Clone)]
pub struct FacetView {
    pub label: String,
    pub count: i64,
    pub href: String,
    pub active: bool,
}

impl FacetView {
    /// Category entries for `city`, marking `current` as active.
    #[must_use]
    pub fn categories(city: &str, counts: &[GroupCount], current: Option<&str>) -> Vec<Self> {
        counts
            .iter()
            .map(|group| Self {
                label: category_display(&group.key),
                count: group.count,
                href: format!("/{city}/{}", group.key),
                active: current == Some(group.key.as_str()),
            })
            .collect()
    }

    /// City entries linking to each city's full listing.
    #[must_use]
    pub fn cities(counts: &[GroupCount], current: Option<&str>) -> Vec<Self> {
        counts
            .iter()
            .map(|group| Self {
                label: city_display(&group.key),
                count: group.count,
                href: format!("/{}/all", group.key),
                active: current == Some(group.key.as_str()),
            })
            .collect()
    }
}

/// A numbered link, or a gap, in a pagination control.
#[derive(Clone)]
pub struct PageLinkView {
    pub label: String,
    /// `None` for gaps.
    pub href: Option<String>,
    pub current: bool,
}

/// Previous/next links plus the numbered window.
#[derive(Clone)]
pub struct PaginationView {
    pub previous: Option<String>,
    pub next: Option<String>,
    pub links: Vec<PageLinkView>,
}

impl PaginationView {
    /// Pagination for `current` of `total` pages, or `None` when one page
    /// suffices. `base` ends with `?` or `&` so `page=N` can be appended.
    #[must_use]
    pub fn build(base: &str, current: u64, total: u64) -> Option<Self> {
        if total <= 1 {
            return None;
        }

        let href = |page: u64| format!("{base}page={page}");
        let links = page_window(current, total)
            .into_iter()
            .map(|link| match link {
                PageLink::Page(page) => PageLinkView {
                    label: page.to_string(),
                    href: Some(href(page)),
                    current: page == current,
                },
                PageLink::Gap => PageLinkView {
                    label: "\u{2026}".to_string(),
                    href: None,
                    current: false,
                },
            })
            .collect();

        Some(Self {
            previous: (current > 1).then(|| href(current - 1)),
            next: (current < total).then(|| href(current + 1)),
            links,
        })
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_single_page_has_no_pagination() {
        assert!(PaginationView::build("/aurora-il/all?", 1, 1).is_none());
        assert!(PaginationView::build("/aurora-il/all?", 1, 0).is_none());
    }

    #[test]
    fn test_pagination_links_keep_query() {
        let view = PaginationView::build("/aurora-il/all?q=plumb&", 2, 3).unwrap();
        assert_eq!(view.previous.as_deref(), Some("/aurora-il/all?q=plumb&page=1"));
        assert_eq!(view.next.as_deref(), Some("/aurora-il/all?q=plumb&page=3"));
        assert_eq!(view.links.len(), 3);
        assert!(view.links[1].current);
    }

    #[test]
    fn test_pagination_gaps_have_no_href() {
        let view = PaginationView::build("/x/all?", 5, 10).unwrap();
        assert!(view.links.iter().any(|l| l.href.is_none()));
        assert!(view.previous.is_some());
    }

    #[test]
    fn test_facet_views() {
        let counts = vec![GroupCount {
            key: "plumbers".to_string(),
            count: 3,
        }];
        let facets = FacetView::categories("aurora-il", &counts, Some("plumbers"));
        assert_eq!(facets[0].label, "Plumbers");
        assert_eq!(facets[0].href, "/aurora-il/plumbers");
        assert!(facets[0].active);

        let cities = FacetView::cities(
            &[GroupCount {
                key: "aurora-il".to_string(),
                count: 3,
            }],
            None,
        );
        assert_eq!(cities[0].label, "Aurora, IL");
        assert_eq!(cities[0].href, "/aurora-il/all");
    }
}
