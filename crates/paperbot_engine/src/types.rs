use std::fmt;

/// One hit from the repository search listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    /// Detail-page link exactly as found in the markup, relative or absolute.
    pub detail_link: String,
}

/// A downloadable attachment discovered on a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Normalized, extension-qualified filename.
    pub name: String,
    /// Absolute download URL.
    pub source_url: String,
}

/// Every file found for one search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordGroup {
    pub title: String,
    pub files: Vec<FileEntry>,
}

/// Outcome of a full harvest: per-record grouping plus the flat delivery queue.
///
/// Invariant: `flat_files` is the concatenation of every group's files in
/// group order, so both views hold exactly the same entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HarvestResult {
    pub groups: Vec<RecordGroup>,
    pub flat_files: Vec<FileEntry>,
}

impl HarvestResult {
    pub fn file_count(&self) -> usize {
        self.flat_files.len()
    }
}

/// Terminal state of one delivery item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    /// Payload at or above the inline cutoff; routed as a direct link.
    TooLarge,
    RetrievalFailed,
    DeliveryFailed,
}

/// What happened to one file during a delivery run. Transient; folded into
/// the summary and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub file: FileEntry,
    pub status: DeliveryStatus,
    pub resolved_filename: Option<String>,
    pub detail: String,
}

/// Progress snapshot emitted after each delivery item reaches a terminal
/// state. A liveness signal, not a resumability checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryProgress {
    pub index: usize,
    pub total: usize,
    pub current_name: String,
    pub sent: usize,
    pub failed: usize,
}

/// Final tally for one delivery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliverySummary {
    pub requested: usize,
    pub sent: usize,
    /// Includes too-large items.
    pub failed: usize,
    pub too_large: usize,
}

impl DeliverySummary {
    /// Fold one outcome into the running tally.
    pub fn apply(&mut self, status: DeliveryStatus) {
        match status {
            DeliveryStatus::Delivered => self.sent += 1,
            DeliveryStatus::TooLarge => {
                self.failed += 1;
                self.too_large += 1;
            }
            DeliveryStatus::RetrievalFailed | DeliveryStatus::DeliveryFailed => self.failed += 1,
        }
    }
}

/// Raw bytes plus response metadata for one fetched URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchMetadata {
    pub final_url: String,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
}

/// Transport-level failure carrying a kind for logging and branching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
