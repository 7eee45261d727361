use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use axum::{extract::Multipart, extract::State, http::StatusCode, routing::post, Router};
use shared::{error::PriceError, protocol::ClassifyOutcome};
use tokio::{net::TcpListener, sync::Mutex};
use url::Url;

use super::*;

#[derive(Debug, Clone)]
struct ReceivedPart {
    name: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    body: String,
    received: Arc<Mutex<Vec<ReceivedPart>>>,
}

async fn handle_classify(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> (StatusCode, String) {
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.expect("field bytes").to_vec();
        state.received.lock().await.push(ReceivedPart {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    (state.status, state.body.clone())
}

async fn spawn_classifier(
    status: StatusCode,
    body: &str,
) -> Result<(Url, Arc<Mutex<Vec<ReceivedPart>>>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        status,
        body: body.to_string(),
        received: received.clone(),
    };
    let app = Router::new()
        .route("/", post(handle_classify))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((Url::parse(&format!("http://{addr}/"))?, received))
}

fn write_photo(dir: &tempfile::TempDir, bytes: &[u8]) -> ImageHandle {
    let path: PathBuf = dir.path().join("photo.jpg");
    std::fs::write(&path, bytes).expect("write photo");
    ImageHandle::new(path.to_string_lossy())
}

fn client(endpoint: Url, encoding: PayloadEncoding) -> UploadClient {
    UploadClient::new(endpoint, Arc::new(FileImageSource::new(encoding)))
}

#[tokio::test]
async fn posts_photo_as_multipart_image_field() {
    let (endpoint, received) =
        spawn_classifier(StatusCode::OK, r#"{"food":"Kiwi","price":"1.20"}"#)
            .await
            .expect("spawn server");
    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_photo(&dir, b"jpeg-bytes");

    let outcome = client(endpoint, PayloadEncoding::Raw)
        .classify(&photo)
        .await
        .expect("classify");

    match outcome {
        ClassifyOutcome::Match(classification) => {
            assert_eq!(classification.food, "Kiwi");
            assert_eq!(classification.price.as_str(), "1.20");
        }
        other => panic!("expected match, got {other:?}"),
    }

    let received = received.lock().await;
    assert_eq!(received.len(), 1);
    let part = &received[0];
    assert_eq!(part.name.as_deref(), Some("image"));
    assert_eq!(part.file_name.as_deref(), Some("upload.jpg"));
    assert_eq!(part.content_type.as_deref(), Some("image/jpg"));
    assert_eq!(part.bytes, b"jpeg-bytes");
}

#[tokio::test]
async fn base64_encoding_sends_data_uri() {
    let (endpoint, received) =
        spawn_classifier(StatusCode::OK, r#"{"food":"Kiwi","price":"1.20"}"#)
            .await
            .expect("spawn server");
    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_photo(&dir, b"abc");

    client(endpoint, PayloadEncoding::Base64DataUri)
        .classify(&photo)
        .await
        .expect("classify");

    let received = received.lock().await;
    assert_eq!(received[0].bytes, b"data:image/jpg;base64,YWJj");
}

#[tokio::test]
async fn unknown_reply_is_a_non_match() {
    let (endpoint, _received) =
        spawn_classifier(StatusCode::OK, r#"{"food":"unknown","price":"unknown"}"#)
            .await
            .expect("spawn server");
    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_photo(&dir, b"blurry");

    let outcome = client(endpoint, PayloadEncoding::Raw)
        .classify(&photo)
        .await
        .expect("classify");
    assert_eq!(outcome, ClassifyOutcome::NonMatch);
}

#[tokio::test]
async fn server_error_status_is_reported() {
    let (endpoint, _received) = spawn_classifier(StatusCode::INTERNAL_SERVER_ERROR, "boom")
        .await
        .expect("spawn server");
    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_photo(&dir, b"jpeg-bytes");

    let err = client(endpoint, PayloadEncoding::Raw)
        .classify(&photo)
        .await
        .expect_err("must fail");
    assert!(matches!(err, UploadError::Status(500)), "unexpected error: {err}");
}

#[tokio::test]
async fn non_json_reply_is_a_decode_error() {
    let (endpoint, _received) = spawn_classifier(StatusCode::OK, "<html>oops</html>")
        .await
        .expect("spawn server");
    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_photo(&dir, b"jpeg-bytes");

    let err = client(endpoint, PayloadEncoding::Raw)
        .classify(&photo)
        .await
        .expect_err("must fail");
    assert!(matches!(err, UploadError::Decode(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn reply_without_price_is_a_decode_error() {
    let (endpoint, _received) = spawn_classifier(StatusCode::OK, r#"{"food":"Kiwi"}"#)
        .await
        .expect("spawn server");
    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_photo(&dir, b"jpeg-bytes");

    let err = client(endpoint, PayloadEncoding::Raw)
        .classify(&photo)
        .await
        .expect_err("must fail");
    assert!(matches!(err, UploadError::Decode(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn unusable_price_is_rejected() {
    let (endpoint, _received) =
        spawn_classifier(StatusCode::OK, r#"{"food":"Kiwi","price":"-3"}"#)
            .await
            .expect("spawn server");
    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_photo(&dir, b"jpeg-bytes");

    let err = client(endpoint, PayloadEncoding::Raw)
        .classify(&photo)
        .await
        .expect_err("must fail");
    assert!(
        matches!(err, UploadError::InvalidPrice(_)),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn exponent_price_is_rejected_before_reaching_the_cart() {
    let (endpoint, _received) =
        spawn_classifier(StatusCode::OK, r#"{"food":"Kiwi","price":"1e-30000000"}"#)
            .await
            .expect("spawn server");
    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_photo(&dir, b"jpeg-bytes");

    let err = client(endpoint, PayloadEncoding::Raw)
        .classify(&photo)
        .await
        .expect_err("must fail");
    assert!(
        matches!(err, UploadError::InvalidPrice(PriceError::NotANumber(ref raw)) if raw == "1e-30000000"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_photo(&dir, b"jpeg-bytes");
    let endpoint = Url::parse(&format!("http://{addr}/")).expect("url");

    let err = client(endpoint, PayloadEncoding::Raw)
        .classify(&photo)
        .await
        .expect_err("must fail");
    assert!(matches!(err, UploadError::Transport(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn unreadable_photo_never_reaches_the_server() {
    let (endpoint, received) =
        spawn_classifier(StatusCode::OK, r#"{"food":"Kiwi","price":"1.20"}"#)
            .await
            .expect("spawn server");

    let err = client(endpoint, PayloadEncoding::Raw)
        .classify(&ImageHandle::new("/no/such/photo.jpg"))
        .await
        .expect_err("must fail");
    assert!(
        matches!(err, UploadError::ReadImage { .. }),
        "unexpected error: {err}"
    );
    assert!(received.lock().await.is_empty());
}

#[test]
fn builds_from_settings() {
    let settings = Settings {
        endpoint_url: "https://classifier.example/upload".to_string(),
        ..Settings::default()
    };
    let client = UploadClient::from_settings(&settings).expect("client");
    assert_eq!(client.endpoint().as_str(), "https://classifier.example/upload");

    let bad = Settings {
        endpoint_url: "ftp://classifier.example/".to_string(),
        ..Settings::default()
    };
    assert!(UploadClient::from_settings(&bad).is_err());
}
