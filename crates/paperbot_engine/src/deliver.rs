use std::time::Duration;

use bot_logging::{bot_info, bot_warn};

use crate::fetch::Fetcher;
use crate::retrieve::retrieve_file;
use crate::types::{
    DeliveryProgress, DeliveryStatus, DeliverySummary, DownloadOutcome, FileEntry,
};

/// Inline transfer cutoff; payloads at or above this are routed as direct
/// links instead.
pub const MAX_INLINE_BYTES: usize = 50 * 1024 * 1024;

/// Receives the per-item liveness snapshots during a delivery run.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, progress: DeliveryProgress);
}

/// Channel-backed sink for callers consuming progress on another thread.
pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<DeliveryProgress>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<DeliveryProgress>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, progress: DeliveryProgress) {
        let _ = self.tx.send(progress);
    }
}

/// Failure surfaced by a [`Destination`] implementation.
#[derive(Debug, thiserror::Error)]
#[error("delivery failed: {0}")]
pub struct DeliveryError(pub String);

/// Where delivered files and notices end up. The messaging transport
/// implements this on the far side of the engine boundary.
#[async_trait::async_trait]
pub trait Destination: Send + Sync {
    async fn send_notice(&self, text: &str) -> Result<(), DeliveryError>;
    async fn send_document(
        &self,
        filename: &str,
        bytes: &[u8],
        caption: &str,
    ) -> Result<(), DeliveryError>;
}

/// Drives the retriever over a harvested file set, strictly sequentially,
/// emitting a progress snapshot after each item's terminal state.
pub struct Deliverer<'a> {
    fetcher: &'a dyn Fetcher,
    file_timeout: Duration,
}

impl<'a> Deliverer<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, file_timeout: Duration) -> Self {
        Self {
            fetcher,
            file_timeout,
        }
    }

    /// Retrieve and transmit every file; a bad item never aborts the rest
    /// of the queue.
    pub async fn deliver_all(
        &self,
        files: &[FileEntry],
        query: &str,
        destination: &dyn Destination,
        sink: &dyn ProgressSink,
    ) -> DeliverySummary {
        let mut summary = DeliverySummary {
            requested: files.len(),
            ..DeliverySummary::default()
        };

        for (index, file) in files.iter().enumerate() {
            let outcome = self.deliver_one(file, query, destination).await;
            summary.apply(outcome.status);
            sink.emit(DeliveryProgress {
                index: index + 1,
                total: files.len(),
                current_name: file.name.clone(),
                sent: summary.sent,
                failed: summary.failed,
            });
        }

        bot_info!(
            "delivery finished: {} sent, {} failed ({} too large) of {}",
            summary.sent,
            summary.failed,
            summary.too_large,
            summary.requested
        );
        summary
    }

    async fn deliver_one(
        &self,
        file: &FileEntry,
        query: &str,
        destination: &dyn Destination,
    ) -> DownloadOutcome {
        let retrieved = match retrieve_file(self.fetcher, &file.source_url, self.file_timeout).await
        {
            Ok(retrieved) => retrieved,
            Err(err) => {
                // The kind is logged here; the requester only sees a
                // generic retrieval failure.
                bot_warn!("retrieval of '{}' failed: {}", file.name, err);
                let text = format!("Failed to download '{}'.", file.name);
                self.notify(destination, &text).await;
                return DownloadOutcome {
                    file: file.clone(),
                    status: DeliveryStatus::RetrievalFailed,
                    resolved_filename: None,
                    detail: err.to_string(),
                };
            }
        };

        if retrieved.bytes.len() >= MAX_INLINE_BYTES {
            let text = format!(
                "File '{}' is too large to send inline.\nDirect link: {}",
                retrieved.filename, file.source_url
            );
            self.notify(destination, &text).await;
            return DownloadOutcome {
                file: file.clone(),
                status: DeliveryStatus::TooLarge,
                resolved_filename: Some(retrieved.filename),
                detail: format!("{} bytes", retrieved.bytes.len()),
            };
        }

        let caption = format!("{}\nQuery: {}", retrieved.filename, query);
        match destination
            .send_document(&retrieved.filename, &retrieved.bytes, &caption)
            .await
        {
            Ok(()) => DownloadOutcome {
                file: file.clone(),
                status: DeliveryStatus::Delivered,
                resolved_filename: Some(retrieved.filename),
                detail: String::new(),
            },
            Err(err) => {
                bot_warn!("sending '{}' failed: {}", retrieved.filename, err);
                DownloadOutcome {
                    file: file.clone(),
                    status: DeliveryStatus::DeliveryFailed,
                    resolved_filename: Some(retrieved.filename),
                    detail: err.to_string(),
                }
            }
        }
    }

    async fn notify(&self, destination: &dyn Destination, text: &str) {
        if let Err(err) = destination.send_notice(text).await {
            bot_warn!("notice delivery failed: {}", err);
        }
    }
}
