use std::time::Duration;

use crate::fetch::Fetcher;
use crate::filename::{extension_for_content_type, normalize_filename, url_tail};
use crate::types::{FetchError, FetchOutput};

/// A fully retrieved file with its settled name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Download one file and settle its filename.
///
/// Name resolution order: the `Content-Disposition` `filename` parameter,
/// then the URL's last path segment; the result goes through the
/// normalizer. When the candidate carried no extension at all, the blind
/// `.pdf` default is replaced by one derived from `Content-Type`.
pub async fn retrieve_file(
    fetcher: &dyn Fetcher,
    url: &str,
    timeout: Duration,
) -> Result<RetrievedFile, FetchError> {
    let FetchOutput { bytes, metadata } = fetcher.fetch(url, timeout).await?;

    let candidate = metadata
        .content_disposition
        .as_deref()
        .and_then(disposition_filename)
        .unwrap_or_else(|| url_tail(url).to_string());

    let mut filename = normalize_filename(&candidate);
    if !candidate.contains('.') {
        if let Some(ct) = metadata.content_type.as_deref() {
            if let Some(stem) = filename.strip_suffix(".pdf") {
                filename = format!("{stem}{}", extension_for_content_type(ct));
            }
        }
    }

    Ok(RetrievedFile { filename, bytes })
}

/// Pull the `filename` parameter out of a Content-Disposition value,
/// quoted or bare, case-insensitively.
fn disposition_filename(value: &str) -> Option<String> {
    value.split(';').find_map(|part| {
        let (key, val) = part.trim().split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let val = val.trim().trim_matches(['"', '\''].as_ref()).trim();
        if val.is_empty() {
            None
        } else {
            Some(val.to_string())
        }
    })
}
