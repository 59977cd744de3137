use super::*;
use crate::web::http::MockHttpClient;
use crate::web::storage::MemoryTokenStore;
use churchhub_shared::protocol::HttpMethod;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// =========================================================
// 辅助函数
// =========================================================

const BASE: &str = "http://api.test";

fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

fn user_json() -> serde_json::Value {
    json!({
        "id": 7,
        "email": "pat@grace.org",
        "name": "Pat",
        "role": "church_admin",
        "enrollment_status": "approved",
        "churchAssignments": [{"id": 1, "user_id": 7, "church_id": 4, "church_name": "Grace"}]
    })
}

fn create_store(storage: MemoryTokenStore) -> SessionStore<MockHttpClient, MemoryTokenStore> {
    let api = Rc::new(ChurchHubApi::new(BASE, MockHttpClient::new()));
    SessionStore::new(api, storage)
}

fn client(store: &SessionStore<MockHttpClient, MemoryTokenStore>) -> &MockHttpClient {
    store.api.client_for_tests()
}

// =========================================================
// bootstrap 测试
// =========================================================

#[tokio::test]
async fn test_bootstrap_without_token_is_noop() {
    let store = create_store(MemoryTokenStore::default());

    let restore = store.bootstrap().await;

    assert_eq!(restore, Restore::NoToken);
    assert_eq!(store.snapshot().phase(), SessionPhase::Unauthenticated);
    assert_eq!(client(&store).request_count(), 0);
}

#[tokio::test]
async fn test_bootstrap_restores_valid_token() {
    let store = create_store(MemoryTokenStore::with_token("stored"));
    client(&store).mock_response(
        HttpMethod::Post,
        &url("/auth/verify-token"),
        200,
        json!({"valid": true, "user": user_json()}),
    );

    let restore = store.bootstrap().await;

    assert_eq!(restore, Restore::Restored);
    let session = store.snapshot();
    assert_eq!(session.current_user().map(|u| u.id), Some(7));
    assert_eq!(session.token.as_deref(), Some("stored"));
    let req = client(&store).last_request().unwrap();
    assert_eq!(req.json(), json!({"token": "stored"}));
}

#[tokio::test]
async fn test_bootstrap_enters_verifying_before_response() {
    let store = create_store(MemoryTokenStore::with_token("stored"));

    let token = store.begin_restore();

    assert_eq!(token.as_deref(), Some("stored"));
    assert_eq!(store.snapshot().phase(), SessionPhase::Verifying);
    assert!(store.current_user().is_none());
}

#[tokio::test]
async fn test_bootstrap_discards_every_kind_of_failed_token() {
    // (响应, 期望的错误类型)
    let cases: Vec<(Option<(u16, serde_json::Value)>, AdminErrorKind)> = vec![
        (Some((200, json!({"valid": false}))), AdminErrorKind::SessionExpired),
        (Some((200, json!({"valid": true}))), AdminErrorKind::Decode),
        (Some((200, json!({"unexpected": 1}))), AdminErrorKind::Decode),
        (Some((401, json!({"error": "Invalid token"}))), AdminErrorKind::Auth),
        (Some((500, json!({}))), AdminErrorKind::NotFoundOrConflict),
        (None, AdminErrorKind::Network),
    ];

    for (reply, expected) in cases {
        let store = create_store(MemoryTokenStore::with_token("stale"));
        match reply {
            Some((status, body)) => {
                client(&store).mock_response(HttpMethod::Post, &url("/auth/verify-token"), status, body)
            }
            None => client(&store).mock_network_failure(HttpMethod::Post, &url("/auth/verify-token")),
        }

        let restore = store.bootstrap().await;

        match restore {
            Restore::Discarded(e) => assert_eq!(e.kind, expected),
            other => panic!("expected discard for {expected:?}, got {other:?}"),
        }
        let session = store.snapshot();
        assert_eq!(session.phase(), SessionPhase::Unauthenticated);
        assert!(session.token.is_none());
        assert!(store.storage().current().is_none());
    }
}

#[tokio::test]
async fn test_logout_during_verification_wins() {
    let store = create_store(MemoryTokenStore::with_token("stored"));
    client(&store).mock_response(
        HttpMethod::Post,
        &url("/auth/verify-token"),
        200,
        json!({"valid": true, "user": user_json()}),
    );
    let token = store.begin_restore().unwrap();

    // 校验请求挂起期间登出，迟到的成功结果必须被丢弃
    let (_, ()) = tokio::join!(store.finish_restore(token), async { store.logout() });

    let session = store.snapshot();
    assert_eq!(session.phase(), SessionPhase::Unauthenticated);
    assert!(session.token.is_none());
    assert!(store.current_user().is_none());
    assert!(store.storage().current().is_none());
}

// =========================================================
// login 测试
// =========================================================

#[tokio::test]
async fn test_login_success_persists_token() {
    let store = create_store(MemoryTokenStore::default());
    client(&store).mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        json!({"token": "fresh", "user": user_json()}),
    );

    let user = store.login("pat@grace.org", "secret").await.unwrap();

    assert_eq!(user.display_name, "Pat");
    let session = store.snapshot();
    assert!(session.is_authenticated());
    assert_eq!(session.current_user(), Some(&user));
    assert_eq!(session.pending_logins, 0);
    assert_eq!(store.storage().current().as_deref(), Some("fresh"));
    assert_eq!(store.bearer().as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_login_invalid_credentials_shows_server_message() {
    let store = create_store(MemoryTokenStore::default());
    client(&store).mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        401,
        json!({"error": "Invalid credentials"}),
    );

    let err = store.login("a@b.com", "wrong").await.unwrap_err();

    assert_eq!(err.kind, AdminErrorKind::Auth);
    let session = store.snapshot();
    assert_eq!(session.phase(), SessionPhase::Unauthenticated);
    assert_eq!(session.last_error.as_deref(), Some("Invalid credentials"));
    assert!(!session.is_logging_in());
    assert!(store.storage().current().is_none());
}

#[tokio::test]
async fn test_login_without_server_message_uses_fallback() {
    let store = create_store(MemoryTokenStore::default());
    client(&store).mock_raw(HttpMethod::Post, &url("/auth/login"), 500, "Internal Server Error");

    store.login("a@b.com", "pw").await.unwrap_err();

    assert_eq!(store.snapshot().last_error.as_deref(), Some("Login failed"));
}

#[tokio::test]
async fn test_login_ok_response_missing_fields_fails() {
    let store = create_store(MemoryTokenStore::default());
    client(&store).mock_response(HttpMethod::Post, &url("/auth/login"), 200, json!({"token": "t"}));

    let err = store.login("a@b.com", "pw").await.unwrap_err();

    assert_eq!(err.kind, AdminErrorKind::Decode);
    assert_eq!(store.snapshot().last_error.as_deref(), Some("Login failed"));
    assert!(store.storage().current().is_none());
}

#[tokio::test]
async fn test_login_network_failure_message() {
    let store = create_store(MemoryTokenStore::default());
    client(&store).mock_network_failure(HttpMethod::Post, &url("/auth/login"));

    let err = store.login("a@b.com", "pw").await.unwrap_err();

    assert_eq!(err.kind, AdminErrorKind::Network);
    assert_eq!(
        store.snapshot().last_error.as_deref(),
        Some("Network error. Please try again.")
    );
}

#[tokio::test]
async fn test_login_marks_loading_while_in_flight() {
    let store = create_store(MemoryTokenStore::default());
    client(&store).mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        json!({"token": "fresh", "user": user_json()}),
    );
    assert!(!store.snapshot().is_logging_in());

    // 模拟客户端在响应前让出一次，第二个分支读到请求进行中的状态
    let (result, during) = tokio::join!(store.login("pat@grace.org", "secret"), async {
        store.snapshot().is_logging_in()
    });

    result.unwrap();
    assert!(during);
    assert!(!store.snapshot().is_logging_in());
}

#[tokio::test]
async fn test_concurrent_logins_are_not_serialised() {
    let store = create_store(MemoryTokenStore::default());
    client(&store).mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        json!({"token": "fresh", "user": user_json()}),
    );

    let (a, b) = tokio::join!(store.login("pat@grace.org", "x"), store.login("pat@grace.org", "x"));

    assert!(a.is_ok() && b.is_ok());
    assert_eq!(client(&store).request_count(), 2);
    assert_eq!(store.snapshot().pending_logins, 0);
}

// =========================================================
// logout / refresh 测试
// =========================================================

#[tokio::test]
async fn test_logout_always_clears_everything() {
    let store = create_store(MemoryTokenStore::default());
    client(&store).mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        json!({"token": "fresh", "user": user_json()}),
    );
    store.login("pat@grace.org", "secret").await.unwrap();

    store.logout();
    let session = store.snapshot();
    assert_eq!(session.phase(), SessionPhase::Unauthenticated);
    assert!(session.current_user().is_none());
    assert!(session.last_error.is_none());
    assert!(store.storage().current().is_none());

    // 未登录时再次登出同样成立
    store.logout();
    assert_eq!(store.snapshot(), Session::default());
    assert_eq!(client(&store).request_count(), 1);
}

#[tokio::test]
async fn test_refresh_without_token_is_noop() {
    let store = create_store(MemoryTokenStore::default());

    store.refresh_user().await;

    assert_eq!(client(&store).request_count(), 0);
}

#[tokio::test]
async fn test_refresh_replaces_user() {
    let store = create_store(MemoryTokenStore::default());
    client(&store).mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        json!({"token": "fresh", "user": user_json()}),
    );
    store.login("pat@grace.org", "secret").await.unwrap();

    let mut updated = user_json();
    updated["name"] = json!("Pat Renamed");
    client(&store).mock_response(
        HttpMethod::Post,
        &url("/auth/verify-token"),
        200,
        json!({"valid": true, "user": updated}),
    );

    store.refresh_user().await;

    assert_eq!(store.current_user().unwrap().display_name, "Pat Renamed");
}

#[tokio::test]
async fn test_refresh_swallows_network_failure() {
    let store = create_store(MemoryTokenStore::default());
    client(&store).mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        json!({"token": "fresh", "user": user_json()}),
    );
    store.login("pat@grace.org", "secret").await.unwrap();
    client(&store).mock_network_failure(HttpMethod::Post, &url("/auth/verify-token"));

    store.refresh_user().await;

    let session = store.snapshot();
    assert!(session.is_authenticated());
    assert!(session.last_error.is_none());
}

#[tokio::test]
async fn test_refresh_with_invalid_token_signs_out_silently() {
    let store = create_store(MemoryTokenStore::default());
    client(&store).mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        json!({"token": "fresh", "user": user_json()}),
    );
    store.login("pat@grace.org", "secret").await.unwrap();
    client(&store).mock_response(
        HttpMethod::Post,
        &url("/auth/verify-token"),
        200,
        json!({"valid": false}),
    );

    store.refresh_user().await;

    let session = store.snapshot();
    assert_eq!(session.phase(), SessionPhase::Unauthenticated);
    assert!(session.last_error.is_none());
    assert!(store.storage().current().is_none());
}

// =========================================================
// 派生信号测试
// =========================================================

#[tokio::test]
async fn test_user_memo_ignores_unrelated_session_changes() {
    let store = create_store(MemoryTokenStore::default());
    client(&store).mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        json!({"token": "fresh", "user": user_json()}),
    );
    store.login("pat@grace.org", "secret").await.unwrap();

    let user = store.user();
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    let name = ArcMemo::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        user.with(|u| u.as_ref().map(|u| u.display_name.clone()))
    });
    assert_eq!(name.get_untracked().as_deref(), Some("Pat"));

    // 令牌与登录计数都变了，用户本身没变
    store.login("pat@grace.org", "secret").await.unwrap();
    assert_eq!(name.get_untracked().as_deref(), Some("Pat"));
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    store.logout();
    assert_eq!(name.get_untracked(), None);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}
