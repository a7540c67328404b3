use scraper::{Html, Selector};

use crate::types::SearchResult;

/// Why a search-results page produced no usable listing. The two variants
/// matter to callers: "no results" means the query missed, "structure"
/// means the site markup changed underneath us.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingError {
    #[error("no results found for query '{query}'; check the search term and try again")]
    NoResults { query: String },
    #[error("found {containers} result(s) but could not extract any links; the site structure may have changed")]
    Structure { containers: usize },
}

/// Build the repository search URL for `query`.
pub fn search_url(base: &str, query: &str) -> String {
    format!(
        "{base}/xmlui/search?scope=%2F&query={}&rpp=100&sort_by=0",
        urlencoding::encode(query)
    )
}

/// Extract `(title, detail link)` pairs from a search-results page.
///
/// Each `div.artifact-title` container is one record; the first anchor
/// inside it carries the visible title and the detail-page href. Links are
/// returned as found, relative or absolute; the caller resolves them.
pub fn parse_search_results(html: &str, query: &str) -> Result<Vec<SearchResult>, ListingError> {
    let doc = Html::parse_document(html);
    let container_sel = Selector::parse("div.artifact-title").ok();
    let anchor_sel = Selector::parse("a").ok();
    let (Some(container_sel), Some(anchor_sel)) = (container_sel, anchor_sel) else {
        return Err(ListingError::Structure { containers: 0 });
    };

    let containers: Vec<_> = doc.select(&container_sel).collect();
    if containers.is_empty() {
        return Err(ListingError::NoResults {
            query: query.to_string(),
        });
    }

    let mut results = Vec::new();
    for container in &containers {
        let Some(anchor) = container.select(&anchor_sel).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let title = anchor.text().collect::<String>().trim().to_string();
        results.push(SearchResult {
            title,
            detail_link: href.trim().to_string(),
        });
    }

    if results.is_empty() {
        return Err(ListingError::Structure {
            containers: containers.len(),
        });
    }
    Ok(results)
}
