use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use paperbot_engine::{
    Deliverer, DeliveryError, DeliveryProgress, Destination, FailureKind, FetchError,
    FetchMetadata, FetchOutput, Fetcher, FileEntry, ProgressSink, MAX_INLINE_BYTES,
};
use pretty_assertions::assert_eq;

/// Canned transport keyed by URL; unknown URLs fail like a dead network.
#[derive(Default)]
struct StubFetcher {
    payloads: HashMap<String, Vec<u8>>,
    refuse: HashSet<String>,
}

impl StubFetcher {
    fn with_payload(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.payloads.insert(url.to_string(), bytes);
        self
    }

    fn refusing(mut self, url: &str) -> Self {
        self.refuse.insert(url.to_string());
        self
    }
}

#[async_trait::async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<FetchOutput, FetchError> {
        if self.refuse.contains(url) {
            return Err(FetchError {
                kind: FailureKind::Network,
                message: "connection refused".to_string(),
            });
        }
        match self.payloads.get(url) {
            Some(bytes) => Ok(FetchOutput {
                bytes: bytes.clone(),
                metadata: FetchMetadata {
                    final_url: url.to_string(),
                    content_type: Some("application/pdf".to_string()),
                    content_disposition: None,
                },
            }),
            None => Err(FetchError {
                kind: FailureKind::HttpStatus(404),
                message: "not found".to_string(),
            }),
        }
    }
}

#[derive(Default)]
struct RecordingDestination {
    notices: Mutex<Vec<String>>,
    documents: Mutex<Vec<(String, usize)>>,
    refuse_documents: bool,
}

#[async_trait::async_trait]
impl Destination for RecordingDestination {
    async fn send_notice(&self, text: &str) -> Result<(), DeliveryError> {
        self.notices.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn send_document(
        &self,
        filename: &str,
        bytes: &[u8],
        _caption: &str,
    ) -> Result<(), DeliveryError> {
        if self.refuse_documents {
            return Err(DeliveryError("requester unreachable".to_string()));
        }
        self.documents
            .lock()
            .unwrap()
            .push((filename.to_string(), bytes.len()));
        Ok(())
    }
}

#[derive(Default)]
struct TestSink {
    snapshots: Mutex<Vec<DeliveryProgress>>,
}

impl ProgressSink for TestSink {
    fn emit(&self, progress: DeliveryProgress) {
        self.snapshots.lock().unwrap().push(progress);
    }
}

fn entry(url: &str, name: &str) -> FileEntry {
    FileEntry {
        name: name.to_string(),
        source_url: url.to_string(),
    }
}

#[tokio::test]
async fn all_items_delivered_with_monotonic_progress() {
    let fetcher = StubFetcher::default()
        .with_payload("http://site/a.pdf", vec![1; 100])
        .with_payload("http://site/b.pdf", vec![2; 200]);
    let destination = RecordingDestination::default();
    let sink = TestSink::default();
    let files = vec![
        entry("http://site/a.pdf", "a.pdf"),
        entry("http://site/b.pdf", "b.pdf"),
    ];

    let deliverer = Deliverer::new(&fetcher, Duration::from_secs(1));
    let summary = deliverer
        .deliver_all(&files, "EST100", &destination, &sink)
        .await;

    assert_eq!(summary.requested, 2);
    assert_eq!(summary.sent, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.too_large, 0);

    let documents = destination.documents.lock().unwrap();
    assert_eq!(
        *documents,
        vec![("a.pdf".to_string(), 100), ("b.pdf".to_string(), 200)]
    );

    let snapshots = sink.snapshots.lock().unwrap();
    assert_eq!(snapshots.len(), 2);
    for (i, snapshot) in snapshots.iter().enumerate() {
        assert_eq!(snapshot.index, i + 1);
        assert_eq!(snapshot.total, 2);
        assert_eq!(snapshot.sent + snapshot.failed, i + 1);
    }
}

#[tokio::test]
async fn payload_just_under_the_cutoff_goes_inline() {
    let fetcher =
        StubFetcher::default().with_payload("http://site/big.pdf", vec![0; MAX_INLINE_BYTES - 1]);
    let destination = RecordingDestination::default();
    let sink = TestSink::default();
    let files = vec![entry("http://site/big.pdf", "big.pdf")];

    let deliverer = Deliverer::new(&fetcher, Duration::from_secs(1));
    let summary = deliverer
        .deliver_all(&files, "q", &destination, &sink)
        .await;

    assert_eq!(summary.sent, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.too_large, 0);
}

#[tokio::test]
async fn payload_at_the_cutoff_is_routed_as_a_link() {
    let fetcher =
        StubFetcher::default().with_payload("http://site/huge.pdf", vec![0; MAX_INLINE_BYTES]);
    let destination = RecordingDestination::default();
    let sink = TestSink::default();
    let files = vec![entry("http://site/huge.pdf", "huge.pdf")];

    let deliverer = Deliverer::new(&fetcher, Duration::from_secs(1));
    let summary = deliverer
        .deliver_all(&files, "q", &destination, &sink)
        .await;

    // Too-large items count as failed, never as delivered.
    assert_eq!(summary.sent, 0);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.too_large, 1);

    assert!(destination.documents.lock().unwrap().is_empty());
    let notices = destination.notices.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("http://site/huge.pdf"));
}

#[tokio::test]
async fn retrieval_failure_is_absorbed_and_reported() {
    let fetcher = StubFetcher::default()
        .refusing("http://site/gone.pdf")
        .with_payload("http://site/ok.pdf", vec![9; 10]);
    let destination = RecordingDestination::default();
    let sink = TestSink::default();
    let files = vec![
        entry("http://site/gone.pdf", "gone.pdf"),
        entry("http://site/ok.pdf", "ok.pdf"),
    ];

    let deliverer = Deliverer::new(&fetcher, Duration::from_secs(1));
    let summary = deliverer
        .deliver_all(&files, "q", &destination, &sink)
        .await;

    assert_eq!(summary.requested, 2);
    assert_eq!(summary.sent, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.too_large, 0);

    // The requester sees a generic failure notice, not transport detail.
    let notices = destination.notices.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("gone.pdf"));
    assert!(!notices[0].contains("connection refused"));
}

#[tokio::test]
async fn destination_failure_counts_as_failed() {
    let fetcher = StubFetcher::default().with_payload("http://site/a.pdf", vec![1; 10]);
    let destination = RecordingDestination {
        refuse_documents: true,
        ..RecordingDestination::default()
    };
    let sink = TestSink::default();
    let files = vec![entry("http://site/a.pdf", "a.pdf")];

    let deliverer = Deliverer::new(&fetcher, Duration::from_secs(1));
    let summary = deliverer
        .deliver_all(&files, "q", &destination, &sink)
        .await;

    assert_eq!(summary.sent, 0);
    assert_eq!(summary.failed, 1);
}

#[tokio::test]
async fn summary_accounts_for_every_requested_item() {
    let fetcher = StubFetcher::default()
        .with_payload("http://site/a.pdf", vec![1; 10])
        .with_payload("http://site/huge.pdf", vec![0; MAX_INLINE_BYTES])
        .refusing("http://site/gone.pdf");
    let destination = RecordingDestination::default();
    let sink = TestSink::default();
    let files = vec![
        entry("http://site/a.pdf", "a.pdf"),
        entry("http://site/huge.pdf", "huge.pdf"),
        entry("http://site/gone.pdf", "gone.pdf"),
    ];

    let deliverer = Deliverer::new(&fetcher, Duration::from_secs(1));
    let summary = deliverer
        .deliver_all(&files, "q", &destination, &sink)
        .await;

    assert_eq!(summary.requested, 3);
    assert_eq!(summary.sent + summary.failed, summary.requested);
    assert!(summary.too_large <= summary.failed);
    assert_eq!(summary.sent, 1);
    assert_eq!(summary.too_large, 1);
}

#[tokio::test]
async fn channel_sink_forwards_snapshots_to_a_receiver() {
    let fetcher = StubFetcher::default().with_payload("http://site/a.pdf", vec![1; 10]);
    let destination = RecordingDestination::default();
    let (tx, rx) = std::sync::mpsc::channel();
    let sink = paperbot_engine::ChannelProgressSink::new(tx);
    let files = vec![entry("http://site/a.pdf", "a.pdf")];

    let deliverer = Deliverer::new(&fetcher, Duration::from_secs(1));
    deliverer
        .deliver_all(&files, "q", &destination, &sink)
        .await;
    drop(sink);

    let snapshots: Vec<DeliveryProgress> = rx.iter().collect();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].current_name, "a.pdf");
    assert_eq!(snapshots[0].sent, 1);
}
