//! Paperbot engine: repository harvest and delivery pipeline.
mod decode;
mod deliver;
mod fetch;
mod filename;
mod harvest;
mod listing;
mod resolve;
mod retrieve;
mod types;

pub use decode::decode_page;
pub use deliver::{
    ChannelProgressSink, Deliverer, DeliveryError, Destination, ProgressSink, MAX_INLINE_BYTES,
};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use filename::{extension_for_content_type, normalize_filename};
pub use harvest::{HarvestError, Harvester};
pub use listing::{parse_search_results, search_url, ListingError};
pub use resolve::{parse_file_rows, ResolveError};
pub use retrieve::{retrieve_file, RetrievedFile};
pub use types::{
    DeliveryProgress, DeliveryStatus, DeliverySummary, DownloadOutcome, FailureKind, FetchError,
    FetchMetadata, FetchOutput, FileEntry, HarvestResult, RecordGroup, SearchResult,
};
