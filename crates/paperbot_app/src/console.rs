use std::path::PathBuf;

use paperbot_engine::{DeliveryError, DeliveryProgress, Destination, ProgressSink};

use crate::store;

/// Console stand-in for the messaging transport: notices go to stdout and
/// documents land in a downloads directory.
pub struct ConsoleDestination {
    downloads_dir: PathBuf,
}

impl ConsoleDestination {
    pub fn new(downloads_dir: PathBuf) -> Self {
        Self { downloads_dir }
    }
}

#[async_trait::async_trait]
impl Destination for ConsoleDestination {
    async fn send_notice(&self, text: &str) -> Result<(), DeliveryError> {
        println!("{text}");
        Ok(())
    }

    async fn send_document(
        &self,
        filename: &str,
        bytes: &[u8],
        caption: &str,
    ) -> Result<(), DeliveryError> {
        let path = store::write_atomic(&self.downloads_dir, filename, bytes)
            .map_err(|err| DeliveryError(err.to_string()))?;
        println!("Saved {} ({} bytes)", path.display(), bytes.len());
        println!("{caption}");
        Ok(())
    }
}

/// Appends one progress line per delivered item. The messaging transport
/// may instead edit a single message in place; the engine does not care.
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn emit(&self, progress: DeliveryProgress) {
        println!(
            "Downloading files... ({}/{}) current: {} | sent: {} failed: {}",
            progress.index, progress.total, progress.current_name, progress.sent, progress.failed
        );
    }
}
