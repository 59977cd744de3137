use super::*;
use crate::web::http::MockHttpClient;
use churchhub_shared::protocol::HttpMethod;
use leptos::prelude::GetUntracked;
use serde_json::json;

// =========================================================
// 辅助函数
// =========================================================

const BASE: &str = "http://api.test";
const UPLOAD_URL: &str = "http://api.test/upload/image";

fn create_uploader() -> ImageUploader<MockHttpClient> {
    let api = Rc::new(ChurchHubApi::new(BASE, MockHttpClient::new()));
    ImageUploader::new(api, UploadPolicy::default())
}

fn client(uploader: &ImageUploader<MockHttpClient>) -> &MockHttpClient {
    uploader.api.client_for_tests()
}

fn png(size: usize) -> UploadFile {
    UploadFile::from_bytes("banner.png", "image/png", vec![0; size])
}

/// 上传的同时读取一次 in_flight
///
/// 模拟客户端在响应前让出一次，第二个分支恰好读到网络阶段的状态。
async fn upload_watching_in_flight(
    uploader: &ImageUploader<MockHttpClient>,
    file: UploadFile,
) -> (AdminResult<String>, bool) {
    tokio::join!(uploader.upload(Some("tok"), file), async {
        uploader.state().with_untracked(|s| s.in_flight)
    })
}

// =========================================================
// 校验测试
// =========================================================

#[tokio::test]
async fn test_oversized_file_never_reaches_network() {
    let uploader = create_uploader();

    let (result, during) = upload_watching_in_flight(&uploader, png(5 * 1024 * 1024 + 1)).await;
    let err = result.unwrap_err();

    assert_eq!(err.kind, AdminErrorKind::FileTooLarge);
    assert_eq!(client(&uploader).request_count(), 0);
    assert_eq!(
        uploader.state().get_untracked().last_error.as_deref(),
        Some("Image file size must be less than 5MB")
    );
    assert!(!during);
    assert!(!uploader.state().get_untracked().in_flight);
}

#[tokio::test]
async fn test_exactly_five_megabytes_is_accepted() {
    let uploader = create_uploader();
    client(&uploader).mock_response(HttpMethod::Post, UPLOAD_URL, 200, json!({"url": "https://x/y.png"}));

    assert!(uploader.upload(Some("tok"), png(5 * 1024 * 1024)).await.is_ok());
}

#[tokio::test]
async fn test_non_image_is_rejected() {
    let uploader = create_uploader();
    let pdf = UploadFile::from_bytes("flyer.pdf", "application/pdf", vec![1, 2, 3]);

    let err = uploader.upload(Some("tok"), pdf).await.unwrap_err();

    assert_eq!(err.kind, AdminErrorKind::InvalidFileType);
    assert_eq!(client(&uploader).request_count(), 0);
    assert_eq!(
        uploader.state().get_untracked().last_error.as_deref(),
        Some("Please select a valid image file")
    );
}

#[tokio::test]
async fn test_type_is_checked_before_size() {
    let uploader = create_uploader();
    let huge_pdf = UploadFile::from_bytes("big.pdf", "application/pdf", vec![0; 6 * 1024 * 1024]);

    let err = uploader.upload(Some("tok"), huge_pdf).await.unwrap_err();

    assert_eq!(err.kind, AdminErrorKind::InvalidFileType);
}

// =========================================================
// 上传测试
// =========================================================

#[tokio::test]
async fn test_successful_upload_returns_url() {
    let uploader = create_uploader();
    client(&uploader).mock_response(HttpMethod::Post, UPLOAD_URL, 200, json!({"url": "https://x/y.png"}));

    let (result, during) = upload_watching_in_flight(&uploader, png(1024)).await;

    assert_eq!(result.unwrap(), "https://x/y.png");
    assert!(during);
    let state = uploader.state().get_untracked();
    assert!(!state.in_flight);
    assert_eq!(state.last_success.as_deref(), Some("Image uploaded successfully!"));
    assert!(state.last_error.is_none());

    let req = client(&uploader).last_request().unwrap();
    assert_eq!(req.headers.get("Authorization").map(String::as_str), Some("Bearer tok"));
    assert_eq!(req.multipart, Some(("image".to_string(), "banner.png".to_string())));
}

#[tokio::test]
async fn test_legacy_image_url_field_is_accepted() {
    let uploader = create_uploader();
    client(&uploader).mock_response(HttpMethod::Post, UPLOAD_URL, 200, json!({"imageUrl": "https://x/old.png"}));

    let url = uploader.upload(Some("tok"), png(10)).await.unwrap();

    assert_eq!(url, "https://x/old.png");
}

#[tokio::test]
async fn test_server_error_message_is_recorded() {
    let uploader = create_uploader();
    client(&uploader).mock_response(HttpMethod::Post, UPLOAD_URL, 413, json!({"error": "Storage quota exceeded"}));

    let (result, during) = upload_watching_in_flight(&uploader, png(10)).await;

    result.unwrap_err();
    assert!(during);
    let state = uploader.state().get_untracked();
    assert_eq!(state.last_error.as_deref(), Some("Storage quota exceeded"));
    assert!(state.last_success.is_none());
    assert!(!state.in_flight);
}

#[tokio::test]
async fn test_failure_without_message_uses_fallback() {
    let uploader = create_uploader();
    client(&uploader).mock_raw(HttpMethod::Post, UPLOAD_URL, 502, "Bad Gateway");

    uploader.upload(Some("tok"), png(10)).await.unwrap_err();

    assert_eq!(
        uploader.state().get_untracked().last_error.as_deref(),
        Some("Failed to upload image")
    );
}

#[tokio::test]
async fn test_ok_response_without_url_is_an_error() {
    let uploader = create_uploader();
    client(&uploader).mock_response(HttpMethod::Post, UPLOAD_URL, 200, json!({}));

    let err = uploader.upload(Some("tok"), png(10)).await.unwrap_err();

    assert_eq!(err.kind, AdminErrorKind::Decode);
    assert!(!uploader.state().get_untracked().in_flight);
}

#[tokio::test]
async fn test_network_failure_message() {
    let uploader = create_uploader();
    client(&uploader).mock_network_failure(HttpMethod::Post, UPLOAD_URL);

    uploader.upload(Some("tok"), png(10)).await.unwrap_err();

    let state = uploader.state().get_untracked();
    assert!(!state.in_flight);
    assert_eq!(
        state.last_error.as_deref(),
        Some("Network error while uploading image. Please try again.")
    );
}

// =========================================================
// 提示过期测试
// =========================================================

#[tokio::test]
async fn test_success_message_expires() {
    let uploader = create_uploader();
    client(&uploader).mock_response(HttpMethod::Post, UPLOAD_URL, 200, json!({"url": "https://x/y.png"}));
    uploader.upload(Some("tok"), png(10)).await.unwrap();
    let seq = uploader.success_seq();

    uploader.expire_success(seq);

    assert!(uploader.state().get_untracked().last_success.is_none());
}

#[tokio::test]
async fn test_stale_expiry_keeps_newer_message() {
    let uploader = create_uploader();
    client(&uploader).mock_response(HttpMethod::Post, UPLOAD_URL, 200, json!({"url": "https://x/y.png"}));
    uploader.upload(Some("tok"), png(10)).await.unwrap();
    let first = uploader.success_seq();
    uploader.upload(Some("tok"), png(10)).await.unwrap();

    uploader.expire_success(first);

    assert_eq!(
        uploader.state().get_untracked().last_success.as_deref(),
        Some("Image uploaded successfully!")
    );
}

#[tokio::test]
async fn test_new_attempt_clears_previous_error() {
    let uploader = create_uploader();
    let pdf = UploadFile::from_bytes("flyer.pdf", "application/pdf", vec![1]);
    uploader.upload(Some("tok"), pdf).await.unwrap_err();
    client(&uploader).mock_response(HttpMethod::Post, UPLOAD_URL, 200, json!({"url": "https://x/y.png"}));

    uploader.upload(Some("tok"), png(10)).await.unwrap();

    assert!(uploader.state().get_untracked().last_error.is_none());
}
