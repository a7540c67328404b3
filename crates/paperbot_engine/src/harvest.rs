use url::Url;

use bot_logging::{bot_info, bot_warn};

use crate::decode::decode_page;
use crate::fetch::{FetchSettings, Fetcher};
use crate::listing::{parse_search_results, search_url, ListingError};
use crate::resolve::{parse_file_rows, ResolveError};
use crate::types::{FetchError, FileEntry, HarvestResult, RecordGroup, SearchResult};

/// Failures that abort an entire harvest. Per-record trouble never shows
/// up here; it is logged and the record dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HarvestError {
    #[error(transparent)]
    Listing(#[from] ListingError),
    #[error("network error while searching: {0}")]
    Transport(FetchError),
    #[error("repository base URL is invalid: {0}")]
    InvalidBase(String),
    #[error("no files found in any of the search results for '{query}'")]
    NoFiles { query: String },
}

/// Turns a query into a [`HarvestResult`] by walking every matched record.
pub struct Harvester<'a> {
    fetcher: &'a dyn Fetcher,
    settings: FetchSettings,
}

impl<'a> Harvester<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, settings: FetchSettings) -> Self {
        Self { fetcher, settings }
    }

    pub async fn harvest(&self, query: &str) -> Result<HarvestResult, HarvestError> {
        let base = Url::parse(&self.settings.base_url)
            .map_err(|err| HarvestError::InvalidBase(err.to_string()))?;

        let url = search_url(&self.settings.base_url, query);
        let page = self
            .fetcher
            .fetch(&url, self.settings.search_timeout)
            .await
            .map_err(HarvestError::Transport)?;
        let html = decode_page(&page.bytes, page.metadata.content_type.as_deref());

        let records = parse_search_results(&html, query)?;
        bot_info!("query '{}' matched {} record(s)", query, records.len());

        let mut result = HarvestResult::default();
        for record in &records {
            match self.resolve_record(record, &base).await {
                Ok(files) => {
                    result.flat_files.extend(files.iter().cloned());
                    result.groups.push(RecordGroup {
                        title: record.title.clone(),
                        files,
                    });
                }
                Err(err) => {
                    // One bad detail page must never abort the whole harvest.
                    bot_warn!("skipping record '{}': {}", record.title, err);
                }
            }
        }

        if result.groups.is_empty() {
            return Err(HarvestError::NoFiles {
                query: query.to_string(),
            });
        }
        Ok(result)
    }

    async fn resolve_record(
        &self,
        record: &SearchResult,
        base: &Url,
    ) -> Result<Vec<FileEntry>, RecordError> {
        let url = detail_url(&record.detail_link, base);
        let page = self.fetcher.fetch(&url, self.settings.detail_timeout).await?;
        let html = decode_page(&page.bytes, page.metadata.content_type.as_deref());
        Ok(parse_file_rows(&html, base)?)
    }
}

/// Per-record failure; swallowed by the harvest loop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
enum RecordError {
    #[error("network error while accessing files: {0}")]
    Transport(#[from] FetchError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

fn detail_url(link: &str, base: &Url) -> String {
    if link.starts_with("http") {
        return link.to_string();
    }
    // An unjoinable link is left as-is; the fetch will fail and the
    // record will be skipped with a log entry.
    base.join(link)
        .map(Url::into)
        .unwrap_or_else(|_| link.to_string())
}
