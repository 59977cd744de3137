use super::*;
use crate::web::http::MockHttpClient;
use churchhub_shared::AnnouncementKind;
use churchhub_shared::protocol::HttpMethod;
use leptos::prelude::GetUntracked;
use serde_json::json;
use std::cell::Cell;

// =========================================================
// 辅助函数
// =========================================================

const BASE: &str = "http://api.test";

fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

struct FixedBearer(Option<String>);

impl Bearer for FixedBearer {
    fn bearer(&self) -> Option<String> {
        self.0.clone()
    }
}

fn create_screen<K: Listing>(kind: K) -> ResourceScreen<K, MockHttpClient> {
    let api = Rc::new(ChurchHubApi::new(BASE, MockHttpClient::new()));
    ResourceScreen::new(kind, api, Rc::new(FixedBearer(Some("tok".to_string()))))
}

fn client<K: Listing>(screen: &ResourceScreen<K, MockHttpClient>) -> &MockHttpClient {
    screen.api.client_for_tests()
}

fn church_json(id: Id, name: &str) -> serde_json::Value {
    json!({"id": id, "name": name, "senior_pastor": "Rev. Lee"})
}

fn always(answer: bool) -> impl Fn(&str) -> bool {
    move |_| answer
}

// =========================================================
// load 测试
// =========================================================

#[tokio::test]
async fn test_load_mirrors_server_order() {
    let screen = create_screen(Churches);
    client(&screen).mock_response(
        HttpMethod::Get,
        &url("/churches"),
        200,
        json!([church_json(3, "Hope"), church_json(1, "Grace")]),
    );

    screen.load().await.unwrap();

    let ids: Vec<Id> = screen.items().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![3, 1]);
    assert!(!screen.state().get_untracked().loading);
    let req = client(&screen).last_request().unwrap();
    assert_eq!(req.headers.get("Authorization").map(String::as_str), Some("Bearer tok"));
}

#[tokio::test]
async fn test_failed_load_keeps_previous_items() {
    let screen = create_screen(Churches);
    client(&screen).mock_response(HttpMethod::Get, &url("/churches"), 200, json!([church_json(1, "Grace")]));
    screen.load().await.unwrap();

    client(&screen).mock_network_failure(HttpMethod::Get, &url("/churches"));
    let err = screen.load().await.unwrap_err();

    assert_eq!(err.kind, AdminErrorKind::Network);
    let state = screen.state().get_untracked();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.error.as_deref(), Some("Failed to load churches"));
    assert!(!state.loading);
}

#[tokio::test]
async fn test_auth_failure_on_resource_call_is_plain_error() {
    let screen = create_screen(EventsOf { church_id: 4 });
    client(&screen).mock_response(
        HttpMethod::Get,
        &url("/churches/4/events"),
        401,
        json!({"error": "Token expired"}),
    );

    let err = screen.load().await.unwrap_err();

    assert!(err.is_auth());
    assert_eq!(screen.state().get_untracked().error.as_deref(), Some("Token expired"));
}

// =========================================================
// delete 测试
// =========================================================

#[tokio::test]
async fn test_church_delete_reports_removed_assignments() {
    let screen = create_screen(Churches);
    client(&screen).mock_response(
        HttpMethod::Get,
        &url("/churches"),
        200,
        json!([church_json(5, "St. Mark"), church_json(6, "Grace")]),
    );
    client(&screen).mock_response(
        HttpMethod::Delete,
        &url("/churches/5"),
        200,
        json!({"message": "Church deleted", "removedAssignments": 3}),
    );
    screen.load().await.unwrap();

    let prompts = std::cell::RefCell::new(Vec::new());
    let confirm = |prompt: &str| {
        prompts.borrow_mut().push(prompt.to_string());
        true
    };
    let deleted = screen.delete(5, &confirm).await.unwrap();

    assert!(deleted);
    let state = screen.state().get_untracked();
    assert!(state.items.iter().all(|c| c.id != 5));
    assert_eq!(state.items.len(), 1);
    let notice = state.notice.unwrap();
    assert!(notice.contains("3 admin assignments were also removed"), "{notice}");
    assert!(prompts.borrow()[0].contains("\"St. Mark\""));
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let screen = create_screen(DonationsOf { church_id: 2 });
    client(&screen).mock_response(
        HttpMethod::Get,
        &url("/churches/2/donations"),
        200,
        json!([{"id": 9, "church_id": 2, "method": "Zelle", "contact_info": "give@grace.org"}]),
    );
    screen.load().await.unwrap();
    let before = client(&screen).request_count();

    let deleted = screen.delete(9, &always(false)).await.unwrap();

    assert!(!deleted);
    assert_eq!(client(&screen).request_count(), before);
    assert_eq!(screen.items().len(), 1);
}

#[tokio::test]
async fn test_failed_delete_leaves_list_unchanged() {
    let screen = create_screen(EventsOf { church_id: 4 });
    client(&screen).mock_response(
        HttpMethod::Get,
        &url("/churches/4/events"),
        200,
        json!([{"id": 1, "church_id": 4, "title": "Picnic", "start_datetime": "2025-07-30T14:00:00.000Z"}]),
    );
    client(&screen).mock_response(
        HttpMethod::Delete,
        &url("/churches/4/events/1"),
        409,
        json!({"error": "Event has registrations"}),
    );
    screen.load().await.unwrap();

    let err = screen.delete(1, &always(true)).await.unwrap_err();

    assert_eq!(err.kind, AdminErrorKind::NotFoundOrConflict);
    let state = screen.state().get_untracked();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.error.as_deref(), Some("Event has registrations"));
    assert!(state.notice.is_none());
}

// =========================================================
// create / update 测试
// =========================================================

fn weekly_form(day: u8) -> AnnouncementForm {
    AnnouncementForm {
        title: "Bible study".to_string(),
        description: "Fellowship hall".to_string(),
        posted_at: "2025-07-28T09:00".to_string(),
        kind: AnnouncementKind::Weekly,
        day,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_weekly_announcement_shows_day_chip() {
    let screen = create_screen(AnnouncementsOf { church_id: 2 });
    client(&screen).mock_response(
        HttpMethod::Post,
        &url("/announcements"),
        201,
        json!({
            "id": 11, "church_id": 2, "title": "Bible study", "description": "Fellowship hall",
            "posted_at": "2025-07-28T09:00:00.000Z", "type": "weekly", "day": 2
        }),
    );

    let created = screen.create(&weekly_form(2)).await.unwrap();

    assert_eq!(created.day_chip(), Some("Tuesday"));
    assert_eq!(screen.items()[0].day_chip(), Some("Tuesday"));
    let body = client(&screen).last_request().unwrap().json();
    assert_eq!(body["day"], 2);
    assert_eq!(body["church_id"], 2);
    assert_eq!(body["type"], "weekly");
}

#[tokio::test]
async fn test_general_announcement_never_carries_day() {
    let screen = create_screen(AnnouncementsOf { church_id: 2 });
    client(&screen).mock_response(
        HttpMethod::Post,
        &url("/announcements"),
        201,
        json!({
            "id": 12, "church_id": 2, "title": "Bible study", "description": "Fellowship hall",
            "posted_at": "2025-07-28T09:00:00.000Z", "type": "general"
        }),
    );
    let mut form = weekly_form(5);
    form.kind = AnnouncementKind::General;

    let created = screen.create(&form).await.unwrap();

    assert!(!form.shows_day_selector());
    assert_eq!(created.day_chip(), None);
    let body = client(&screen).last_request().unwrap().json();
    assert!(body["day"].is_null());
}

#[tokio::test]
async fn test_recurrence_rule_is_sent_and_reloaded_into_form() {
    let screen = create_screen(AnnouncementsOf { church_id: 2 });
    client(&screen).mock_response(
        HttpMethod::Post,
        &url("/announcements"),
        201,
        json!({
            "id": 13, "church_id": 2, "title": "Bible study", "description": "Fellowship hall",
            "posted_at": "2025-07-28T09:00:00.000Z", "type": "weekly", "day": 2,
            "recurrence_rule": "FREQ=WEEKLY;BYDAY=TU"
        }),
    );
    let mut form = weekly_form(2);
    form.recurrence_rule = "  FREQ=WEEKLY;BYDAY=TU ".to_string();

    screen.create(&form).await.unwrap();

    let body = client(&screen).last_request().unwrap().json();
    assert_eq!(body["recurrence_rule"], "FREQ=WEEKLY;BYDAY=TU");
    assert_eq!(screen.form_for(13).recurrence_rule, "FREQ=WEEKLY;BYDAY=TU");
}

#[tokio::test]
async fn test_invalid_form_never_reaches_network() {
    let screen = create_screen(EventsOf { church_id: 4 });

    let err = screen.create(&EventForm::default()).await.unwrap_err();

    assert_eq!(err.kind, AdminErrorKind::Validation);
    assert_eq!(client(&screen).request_count(), 0);
    let state = screen.state().get_untracked();
    assert!(state.field_errors.get("title").is_some());
    assert!(state.items.is_empty());
}

#[tokio::test]
async fn test_backend_field_errors_map_to_inputs() {
    let screen = create_screen(DonationsOf { church_id: 2 });
    client(&screen).mock_response(
        HttpMethod::Post,
        &url("/churches/2/donations"),
        400,
        json!({"error": "Validation failed", "details": [{"field": "contact_info", "message": "Already listed"}]}),
    );
    let form = DonationForm {
        contact_info: "$grace".to_string(),
        ..Default::default()
    };

    let err = screen.create(&form).await.unwrap_err();

    assert_eq!(err.kind, AdminErrorKind::BackendValidation);
    let state = screen.state().get_untracked();
    assert_eq!(state.field_errors.get("contact_info"), Some("Already listed"));
    assert_eq!(state.error.as_deref(), Some("Validation failed"));
}

#[tokio::test]
async fn test_update_replaces_record_by_id() {
    let screen = create_screen(DonationsOf { church_id: 2 });
    client(&screen).mock_response(
        HttpMethod::Get,
        &url("/churches/2/donations"),
        200,
        json!([
            {"id": 8, "church_id": 2, "method": "Venmo", "contact_info": "@grace"},
            {"id": 9, "church_id": 2, "method": "Zelle", "contact_info": "give@grace.org"}
        ]),
    );
    client(&screen).mock_response(
        HttpMethod::Put,
        &url("/churches/2/donations/9"),
        200,
        json!({"id": 9, "church_id": 2, "method": "Zelle", "contact_info": "new@grace.org"}),
    );
    screen.load().await.unwrap();

    let mut form = screen.form_for(9);
    assert_eq!(form.contact_info, "give@grace.org");
    form.contact_info = "new@grace.org".to_string();
    screen.update(9, &form).await.unwrap();

    let items = screen.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, 8);
    assert_eq!(items[1].details.contact_info, "new@grace.org");
    assert_eq!(
        screen.state().get_untracked().notice.as_deref(),
        Some("Donation method updated successfully!")
    );
}

#[tokio::test]
async fn test_notice_expiry_respects_newer_notice() {
    let screen = create_screen(DonationsOf { church_id: 2 });
    client(&screen).mock_response(
        HttpMethod::Post,
        &url("/churches/2/donations"),
        201,
        json!({"id": 1, "church_id": 2, "method": "Cash App", "contact_info": "$grace"}),
    );
    let form = DonationForm {
        contact_info: "$grace".to_string(),
        ..Default::default()
    };
    screen.create(&form).await.unwrap();
    let first = screen.notice_seq();
    screen.create(&form).await.unwrap();

    screen.expire_notice(first);
    assert!(screen.state().get_untracked().notice.is_some());

    screen.expire_notice(screen.notice_seq());
    assert!(screen.state().get_untracked().notice.is_none());
}

// =========================================================
// 用户管理测试
// =========================================================

fn users_json() -> serde_json::Value {
    json!([
        {"id": 1, "email": "root@x.io", "name": "Root", "role": "superuser"},
        {"id": 2, "email": "new@grace.org", "name": "New", "role": "church_admin", "churchAssignments": []},
        {"id": 3, "email": "pat@grace.org", "name": "Pat", "role": "church_admin",
         "churchAssignments": [{"id": 1, "church_id": 4, "church_name": "Grace"}]}
    ])
}

#[tokio::test]
async fn test_unassigned_admins() {
    let screen = create_screen(Users);
    client(&screen).mock_response(HttpMethod::Get, &url("/users"), 200, users_json());
    screen.load().await.unwrap();

    let ids: Vec<Id> = screen.unassigned_admins().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![2]);
}

#[tokio::test]
async fn test_assign_church_reloads_users() {
    let screen = create_screen(Users);
    client(&screen).mock_response(HttpMethod::Get, &url("/users"), 200, users_json());
    client(&screen).mock_response(
        HttpMethod::Post,
        &url("/users/2/assign-church"),
        200,
        json!({"message": "assigned"}),
    );

    screen
        .assign_church(&AssignmentForm {
            user_id: Some(2),
            church_id: Some(4),
        })
        .await
        .unwrap();

    let requests = client(&screen).requests.borrow().clone();
    assert_eq!(requests[0].json(), json!({"churchId": 4}));
    assert_eq!(requests[1].url, url("/users"));
    assert_eq!(
        screen.state().get_untracked().notice.as_deref(),
        Some("User assigned to church successfully!")
    );
}

#[tokio::test]
async fn test_assign_requires_both_choices() {
    let screen = create_screen(Users);

    let err = screen
        .assign_church(&AssignmentForm {
            user_id: Some(2),
            church_id: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, AdminErrorKind::Validation);
    assert_eq!(client(&screen).request_count(), 0);
    assert_eq!(
        screen.state().get_untracked().error.as_deref(),
        Some("Please select both user and church")
    );
}

#[tokio::test]
async fn test_create_admin_lowercases_email() {
    let screen = create_screen(Users);
    client(&screen).mock_response(HttpMethod::Post, &url("/auth/register"), 201, json!({"message": "ok"}));
    client(&screen).mock_response(HttpMethod::Get, &url("/users"), 200, users_json());

    screen
        .create_admin(&AdminAccountForm {
            email: "New.Admin@Grace.ORG".to_string(),
            name: "New Admin".to_string(),
            password: "secret1".to_string(),
            role: churchhub_shared::Role::ChurchAdmin,
        })
        .await
        .unwrap();

    let first = client(&screen).requests.borrow()[0].json();
    assert_eq!(first["email"], "new.admin@grace.org");
    assert_eq!(first["role"], "church_admin");
    assert_eq!(screen.items().len(), 3);
}

#[tokio::test]
async fn test_user_delete_uses_generic_prompt() {
    let screen = create_screen(Users);
    client(&screen).mock_response(HttpMethod::Get, &url("/users"), 200, users_json());
    client(&screen).mock_response(HttpMethod::Delete, &url("/users/2"), 200, json!({}));
    screen.load().await.unwrap();
    let asked = Cell::new(false);
    let confirm = |prompt: &str| {
        asked.set(prompt == "Are you sure you want to delete this user?");
        true
    };

    screen.delete(2, &confirm).await.unwrap();

    assert!(asked.get());
    assert!(screen.find(2).is_none());
    assert_eq!(screen.state().get_untracked().notice.as_deref(), Some("User deleted successfully!"));
}

fn pat_unassigned_json() -> serde_json::Value {
    json!([
        {"id": 1, "email": "root@x.io", "name": "Root", "role": "superuser"},
        {"id": 2, "email": "new@grace.org", "name": "New", "role": "church_admin", "churchAssignments": []},
        {"id": 3, "email": "pat@grace.org", "name": "Pat", "role": "church_admin", "churchAssignments": null}
    ])
}

#[tokio::test]
async fn test_church_delete_reloads_users() {
    let churches = create_screen(Churches);
    let users = create_screen(Users);
    client(&churches).mock_response(HttpMethod::Get, &url("/churches"), 200, json!([church_json(4, "Grace")]));
    client(&churches).mock_response(
        HttpMethod::Delete,
        &url("/churches/4"),
        200,
        json!({"message": "Church deleted", "removedAssignments": 1}),
    );
    client(&users).mock_response(HttpMethod::Get, &url("/users"), 200, users_json());
    churches.load().await.unwrap();
    users.load().await.unwrap();
    assert_eq!(users.unassigned_admins().len(), 1);

    // 后端已级联删除 Pat 的分配
    client(&users).mock_response(HttpMethod::Get, &url("/users"), 200, pat_unassigned_json());
    let deleted = churches
        .delete_and_reload_users(4, &always(true), &users)
        .await
        .unwrap();

    assert!(deleted);
    assert!(churches.items().is_empty());
    assert_eq!(client(&users).request_count(), 2);
    let ids: Vec<Id> = users.unassigned_admins().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[tokio::test]
async fn test_declined_church_delete_leaves_users_alone() {
    let churches = create_screen(Churches);
    let users = create_screen(Users);
    client(&churches).mock_response(HttpMethod::Get, &url("/churches"), 200, json!([church_json(4, "Grace")]));
    churches.load().await.unwrap();

    let deleted = churches
        .delete_and_reload_users(4, &always(false), &users)
        .await
        .unwrap();

    assert!(!deleted);
    assert_eq!(client(&churches).request_count(), 1);
    assert_eq!(client(&users).request_count(), 0);
}
