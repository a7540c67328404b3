use scraper::{Html, Selector};
use url::Url;

use crate::filename::{normalize_filename, url_tail};
use crate::types::FileEntry;

/// Why a detail page yielded no files. The variants distinguish a missing
/// listing region, an empty one, and rows that carried nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no file listing found on this page; the page structure may have changed")]
    NoListingRegion,
    #[error("file listing has no rows; the page structure may have changed")]
    NoRows,
    #[error("no downloadable files found on this page")]
    NothingExtractable,
}

/// Extract the downloadable attachments from a record's detail page.
///
/// The listing lives in a `.file-list` region with one `.ds-table-row` per
/// attachment; the first href-carrying anchor in a row is the file. Row
/// text is the candidate filename, falling back to the URL tail when the
/// anchor has no visible text.
pub fn parse_file_rows(html: &str, base: &Url) -> Result<Vec<FileEntry>, ResolveError> {
    let doc = Html::parse_document(html);
    let list_sel = Selector::parse(".file-list").ok();
    let row_sel = Selector::parse(".ds-table-row").ok();
    let anchor_sel = Selector::parse("a[href]").ok();
    let (Some(list_sel), Some(row_sel), Some(anchor_sel)) = (list_sel, row_sel, anchor_sel) else {
        return Err(ResolveError::NoListingRegion);
    };

    let Some(listing) = doc.select(&list_sel).next() else {
        return Err(ResolveError::NoListingRegion);
    };

    let rows: Vec<_> = listing.select(&row_sel).collect();
    if rows.is_empty() {
        return Err(ResolveError::NoRows);
    }

    let mut files = Vec::new();
    for row in rows {
        // A row without a link is legal; skip it and keep resolving.
        let Some(anchor) = row.select(&anchor_sel).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(source_url) = resolve_href(href, base) else {
            continue;
        };

        let text = anchor.text().collect::<String>().trim().to_string();
        let candidate = if text.is_empty() {
            url_tail(&source_url).to_string()
        } else {
            text
        };
        files.push(FileEntry {
            name: normalize_filename(&candidate),
            source_url,
        });
    }

    if files.is_empty() {
        return Err(ResolveError::NothingExtractable);
    }
    Ok(files)
}

fn resolve_href(href: &str, base: &Url) -> Option<String> {
    let trimmed = href.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url.into());
    }
    base.join(trimmed).ok().map(Url::into)
}
