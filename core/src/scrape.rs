//! Web scraping import: discover recipe pages, extract, and funnel
//! through the shared validation/upsert path.

use std::sync::OnceLock;

use scraper::{Html, Selector};
use url::Url;

use crate::batch::{import_one, BatchReport};
use crate::error::ImportError;
use crate::extract::extract_recipe;
use crate::fetch::{build_client, fetch_page};
use crate::record::RecipeInput;
use crate::store::CatalogStore;

pub const DEFAULT_MAX_RECIPES: usize = 10;
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub ethnicity: String,
    pub category: String,
    pub max_recipes: usize,
}

/// Heuristic from the site layouts this targets: URLs mentioning a recipe
/// or dish are detail pages, everything else is treated as a listing.
pub fn looks_like_recipe_page(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.contains("recipe") || lower.contains("food")
}

/// Pull candidate recipe links out of a listing page, in document order.
/// Prefers links inside article containers, then falls back to any link
/// whose target mentions recipes. Relative hrefs resolve against the page.
pub fn discover_recipe_urls(html: &str, page_url: &str, max: usize) -> Vec<String> {
    static ARTICLE_LINKS: OnceLock<Selector> = OnceLock::new();
    static ALL_LINKS: OnceLock<Selector> = OnceLock::new();

    let article_links =
        ARTICLE_LINKS.get_or_init(|| Selector::parse("article a[href]").expect("invalid selector"));
    let all_links =
        ALL_LINKS.get_or_init(|| Selector::parse("a[href]").expect("invalid selector"));

    let base = Url::parse(page_url).ok();
    let document = Html::parse_document(html);
    let mut urls: Vec<String> = Vec::new();

    let mut push = |href: &str, urls: &mut Vec<String>| {
        let absolute = match &base {
            Some(base) => match base.join(href) {
                Ok(u) => u.to_string(),
                Err(_) => return,
            },
            None => href.to_string(),
        };
        if !urls.contains(&absolute) {
            urls.push(absolute);
        }
    };

    for el in document.select(article_links) {
        if urls.len() >= max {
            break;
        }
        if let Some(href) = el.value().attr("href") {
            push(href, &mut urls);
        }
    }

    if urls.is_empty() {
        for el in document.select(all_links) {
            if urls.len() >= max {
                break;
            }
            if let Some(href) = el.value().attr("href") {
                if looks_like_recipe_page(href) {
                    push(href, &mut urls);
                }
            }
        }
    }

    urls.truncate(max);
    urls
}

/// Scrape one URL (detail page or listing) and import what it yields.
///
/// An unreachable sole URL is batch-scope and fails the run; once URL
/// discovery has succeeded, each page's failure is recorded and the rest
/// continue. At most `max_recipes` records are ingested, counted by
/// successful upserts.
pub async fn scrape_into_store<S: CatalogStore>(
    store: &mut S,
    url: &str,
    options: &ScrapeOptions,
) -> Result<BatchReport, ImportError> {
    let client = build_client()?;

    let recipe_urls = if looks_like_recipe_page(url) {
        vec![url.to_string()]
    } else {
        let listing = fetch_page(&client, url).await?;
        let urls = discover_recipe_urls(&listing, url, options.max_recipes);
        tracing::info!(listing = %url, found = urls.len(), "discovered recipe links");
        urls
    };

    if recipe_urls.is_empty() {
        return Err(ImportError::Source(format!(
            "no recipe links found at {}",
            url
        )));
    }

    let sole_url = recipe_urls.len() == 1;
    let mut report = BatchReport::default();

    for recipe_url in recipe_urls {
        if report.imported() >= options.max_recipes {
            break;
        }

        let result = scrape_one(&client, store, &recipe_url, options).await;
        match result {
            Ok(outcome) => report.record_outcome(outcome),
            Err(err) => {
                // A single bad URL within a list is per-record; a failed
                // sole URL fails the run.
                if sole_url {
                    return Err(err);
                }
                tracing::warn!(url = %recipe_url, error = %err, "page failed");
                report.record_failure(recipe_url, &err);
            }
        }
    }

    Ok(report)
}

async fn scrape_one<S: CatalogStore>(
    client: &reqwest::Client,
    store: &mut S,
    url: &str,
    options: &ScrapeOptions,
) -> Result<crate::store::UpsertOutcome, ImportError> {
    let html = fetch_page(client, url).await?;

    let input: RecipeInput = extract_recipe(&html, &options.ethnicity, &options.category)
        .map_err(|e| ImportError::Validation(e.to_string()))?;
    let draft = input.validate()?;

    import_one(store, &draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_page_heuristic() {
        assert!(looks_like_recipe_page(
            "https://example.com/recipes/jollof-rice"
        ));
        assert!(looks_like_recipe_page("https://allnigerianfoods.com/suya"));
        assert!(!looks_like_recipe_page("https://example.com/blog/archive"));
    }

    #[test]
    fn test_discover_prefers_article_links() {
        let html = r#"
            <article><a href="/recipes/a">A</a></article>
            <article><a href="/recipes/b">B</a></article>
            <a href="/recipes/c">C outside article</a>"#;
        let urls = discover_recipe_urls(html, "https://example.com/archive", 10);
        assert_eq!(
            urls,
            vec![
                "https://example.com/recipes/a",
                "https://example.com/recipes/b"
            ]
        );
    }

    #[test]
    fn test_discover_falls_back_to_recipe_links() {
        let html = r#"
            <a href="/about">About</a>
            <a href="/recipes/a">A</a>
            <a href="/food/b">B</a>"#;
        let urls = discover_recipe_urls(html, "https://example.com/", 10);
        assert_eq!(
            urls,
            vec!["https://example.com/recipes/a", "https://example.com/food/b"]
        );
    }

    #[test]
    fn test_discover_caps_and_dedupes() {
        let html = r#"
            <article><a href="/recipes/a">A</a></article>
            <article><a href="/recipes/a">A again</a></article>
            <article><a href="/recipes/b">B</a></article>
            <article><a href="/recipes/c">C</a></article>"#;
        let urls = discover_recipe_urls(html, "https://example.com/", 2);
        assert_eq!(
            urls,
            vec![
                "https://example.com/recipes/a",
                "https://example.com/recipes/b"
            ]
        );
    }
}
