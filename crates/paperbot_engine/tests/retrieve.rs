use std::time::Duration;

use paperbot_engine::{retrieve_file, FailureKind, ReqwestFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn filename_comes_from_quoted_content_disposition() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bitstream/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=\"Past Paper.pdf\"")
                .set_body_bytes(b"%PDF-1.4".to_vec()),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::default();
    let url = format!("{}/bitstream/1", server.uri());
    let retrieved = retrieve_file(&fetcher, &url, TIMEOUT).await.expect("retrieve ok");
    assert_eq!(retrieved.filename, "Past Paper.pdf");
    assert_eq!(retrieved.bytes, b"%PDF-1.4");
}

#[tokio::test]
async fn filename_comes_from_bare_content_disposition() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bitstream/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; FILENAME=report.doc")
                .set_body_bytes(b"doc".to_vec()),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::default();
    let url = format!("{}/bitstream/2", server.uri());
    let retrieved = retrieve_file(&fetcher, &url, TIMEOUT).await.expect("retrieve ok");
    assert_eq!(retrieved.filename, "report.doc");
}

#[tokio::test]
async fn filename_falls_back_to_url_tail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/q2.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::default();
    let url = format!("{}/files/q2.pdf", server.uri());
    let retrieved = retrieve_file(&fetcher, &url, TIMEOUT).await.expect("retrieve ok");
    assert_eq!(retrieved.filename, "q2.pdf");
}

#[tokio::test]
async fn extension_is_inferred_from_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/12345"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"img".to_vec(), "image/png"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::default();
    let url = format!("{}/download/12345", server.uri());
    let retrieved = retrieve_file(&fetcher, &url, TIMEOUT).await.expect("retrieve ok");
    assert_eq!(retrieved.filename, "12345.jpg");
}

#[tokio::test]
async fn http_error_is_kind_tagged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::default();
    let url = format!("{}/missing", server.uri());
    let err = retrieve_file(&fetcher, &url, TIMEOUT).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::default();
    let url = format!("{}/slow", server.uri());
    let err = retrieve_file(&fetcher, &url, Duration::from_millis(50))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn invalid_url_is_rejected() {
    let fetcher = ReqwestFetcher::default();
    let err = retrieve_file(&fetcher, "not a url", TIMEOUT).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
