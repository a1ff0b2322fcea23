//! XML sitemap.
//!
//! Lists the home page, every business, every city listing and every
//! `(city, category)` pair that currently has listings.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// One `<url>` entry.
#[derive(Clone)]
pub struct SitemapUrl {
    pub loc: String,
    pub lastmod: Option<String>,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

/// Sitemap template.
#[derive(Template, WebTemplate)]
#[template(path = "sitemap.xml")]
pub struct SitemapTemplate {
    pub urls: Vec<SitemapUrl>,
}

/// Serve `/sitemap.xml`.
#[instrument(skip(state))]
pub async fn sitemap(State(state): State<AppState>) -> Result<SitemapTemplate> {
    let config = state.config();
    let directory = state.directory();

    let mut urls = vec![SitemapUrl {
        loc: config.absolute_url("/"),
        lastmod: None,
        changefreq: "daily",
        priority: "1.0",
    }];

    for entry in state.store().sitemap_entries().await? {
        urls.push(SitemapUrl {
            loc: config.absolute_url(&format!("/business/{}", entry.slug)),
            lastmod: Some(entry.updated_at.format("%Y-%m-%d").to_string()),
            changefreq: "weekly",
            priority: "0.7",
        });
    }

    for city in directory.city_counts().await?.iter() {
        urls.push(SitemapUrl {
            loc: config.absolute_url(&format!("/{}/all", city.key)),
            lastmod: None,
            changefreq: "daily",
            priority: "0.9",
        });

        for category in directory.category_counts(&city.key).await?.iter() {
            urls.push(SitemapUrl {
                loc: config.absolute_url(&format!("/{}/{}", city.key, category.key)),
                lastmod: None,
                changefreq: "daily",
                priority: "0.8",
            });
        }
    }

    Ok(SitemapTemplate { urls })
}
