use crate::models::{
    Announcement, AnnouncementDetails, Church, ChurchProfile, DonationDetails, DonationMethod,
    Event, EventDetails,
};
use crate::{Id, Role, User};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// GET / DELETE 不发送请求体
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// 路径参数用 `#[serde(skip)]` 标记，只参与 `path()`，不进入请求体。
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path relative to the API base, including any query string.
    fn path(&self) -> String;
}

macro_rules! fixed_path {
    ($path:expr) => {
        fn path(&self) -> String {
            $path.to_string()
        }
    };
}

// =========================================================
// 通用响应 (Shared Responses)
// =========================================================

/// 只带提示信息的响应；后端可能返回空体，此时全部字段缺省
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// 后端返回的字段级错误
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDetail {
    pub field: String,
    pub message: String,
}

/// 非 2xx 响应体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<FieldDetail>,
}

impl ApiErrorBody {
    /// `error` 优先，其次 `message`
    pub fn text(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fixed_path!("/auth/login");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    #[serde(default)]
    pub user: Option<User>,
}

impl ApiRequest for VerifyTokenRequest {
    type Response = VerifyTokenResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fixed_path!("/auth/verify-token");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl ApiRequest for ChangePasswordRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fixed_path!("/auth/change-password");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

impl ApiRequest for ForgotPasswordRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fixed_path!("/auth/forgot-password");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

impl ApiRequest for ResetPasswordRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fixed_path!("/auth/reset-password");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResetTokenRequest {
    #[serde(skip)]
    pub token: String,
}

/// 重置链接对应的账户
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResetTokenInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl ApiRequest for VerifyResetTokenRequest {
    type Response = ResetTokenInfo;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!(
            "/auth/verify-reset-token?token={}",
            urlencoding::encode(&self.token)
        )
    }
}

/// 超级管理员创建管理员账户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterAdminRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

impl ApiRequest for RegisterAdminRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fixed_path!("/auth/register");
}

// =========================================================
// Churches
// =========================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListChurchesRequest;

impl ApiRequest for ListChurchesRequest {
    type Response = Vec<Church>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fixed_path!("/churches");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetChurchRequest {
    #[serde(skip)]
    pub church_id: Id,
}

impl ApiRequest for GetChurchRequest {
    type Response = Church;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/churches/{}", self.church_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreateChurchRequest {
    pub profile: ChurchProfile,
}

impl ApiRequest for CreateChurchRequest {
    type Response = Church;
    const METHOD: HttpMethod = HttpMethod::Post;
    fixed_path!("/churches");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateChurchRequest {
    #[serde(skip)]
    pub church_id: Id,
    #[serde(flatten)]
    pub profile: ChurchProfile,
}

impl ApiRequest for UpdateChurchRequest {
    type Response = Church;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/churches/{}", self.church_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteChurchRequest {
    #[serde(skip)]
    pub church_id: Id,
}

/// 删除教会会级联移除管理员分配
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurchDeleted {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub removed_assignments: u32,
}

impl ApiRequest for DeleteChurchRequest {
    type Response = ChurchDeleted;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/churches/{}", self.church_id)
    }
}

// =========================================================
// Events
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEventsRequest {
    #[serde(skip)]
    pub church_id: Id,
}

impl ApiRequest for ListEventsRequest {
    type Response = Vec<Event>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/churches/{}/events", self.church_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    #[serde(skip)]
    pub church_id: Id,
    #[serde(flatten)]
    pub details: EventDetails,
}

impl ApiRequest for CreateEventRequest {
    type Response = Event;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/churches/{}/events", self.church_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(skip)]
    pub church_id: Id,
    #[serde(skip)]
    pub event_id: Id,
    #[serde(flatten)]
    pub details: EventDetails,
}

impl ApiRequest for UpdateEventRequest {
    type Response = Event;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/churches/{}/events/{}", self.church_id, self.event_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEventRequest {
    #[serde(skip)]
    pub church_id: Id,
    #[serde(skip)]
    pub event_id: Id,
}

impl ApiRequest for DeleteEventRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/churches/{}/events/{}", self.church_id, self.event_id)
    }
}

// =========================================================
// Donation Methods
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListDonationsRequest {
    #[serde(skip)]
    pub church_id: Id,
}

impl ApiRequest for ListDonationsRequest {
    type Response = Vec<DonationMethod>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/churches/{}/donations", self.church_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDonationRequest {
    #[serde(skip)]
    pub church_id: Id,
    #[serde(flatten)]
    pub details: DonationDetails,
}

impl ApiRequest for CreateDonationRequest {
    type Response = DonationMethod;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/churches/{}/donations", self.church_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDonationRequest {
    #[serde(skip)]
    pub church_id: Id,
    #[serde(skip)]
    pub donation_id: Id,
    #[serde(flatten)]
    pub details: DonationDetails,
}

impl ApiRequest for UpdateDonationRequest {
    type Response = DonationMethod;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/churches/{}/donations/{}", self.church_id, self.donation_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDonationRequest {
    #[serde(skip)]
    pub church_id: Id,
    #[serde(skip)]
    pub donation_id: Id,
}

impl ApiRequest for DeleteDonationRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/churches/{}/donations/{}", self.church_id, self.donation_id)
    }
}

// =========================================================
// Announcements
// =========================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListAnnouncementsRequest {
    /// 为空时列出全部公告
    #[serde(skip)]
    pub church_id: Option<Id>,
}

impl ApiRequest for ListAnnouncementsRequest {
    type Response = Vec<Announcement>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        match self.church_id {
            Some(id) => format!("/announcements?church_id={id}"),
            None => "/announcements".to_string(),
        }
    }
}

/// 公告不挂在教会路径下，church_id 放进请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAnnouncementRequest {
    pub church_id: Id,
    #[serde(flatten)]
    pub details: AnnouncementDetails,
}

impl ApiRequest for CreateAnnouncementRequest {
    type Response = Announcement;
    const METHOD: HttpMethod = HttpMethod::Post;
    fixed_path!("/announcements");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAnnouncementRequest {
    #[serde(skip)]
    pub announcement_id: Id,
    #[serde(flatten)]
    pub details: AnnouncementDetails,
}

impl ApiRequest for UpdateAnnouncementRequest {
    type Response = Announcement;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/announcements/{}", self.announcement_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAnnouncementRequest {
    #[serde(skip)]
    pub announcement_id: Id,
}

impl ApiRequest for DeleteAnnouncementRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/announcements/{}", self.announcement_id)
    }
}

// =========================================================
// Users
// =========================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListUsersRequest;

impl ApiRequest for ListUsersRequest {
    type Response = Vec<User>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fixed_path!("/users");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserRequest {
    #[serde(skip)]
    pub user_id: Id,
}

impl ApiRequest for DeleteUserRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/users/{}", self.user_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(skip)]
    pub user_id: Id,
    pub name: String,
    pub email: String,
}

impl ApiRequest for UpdateProfileRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/users/{}", self.user_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignChurchRequest {
    #[serde(skip)]
    pub user_id: Id,
    pub church_id: Id,
}

impl ApiRequest for AssignChurchRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/users/{}/assign-church", self.user_id)
    }
}

// =========================================================
// Enrollment & Upload
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    pub church_name: String,
    pub pastor_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub website: String,
    pub description: String,
}

impl ApiRequest for EnrollmentRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fixed_path!("/enrollment/submit-church");
}

pub const UPLOAD_IMAGE_PATH: &str = "/upload/image";

/// 上传响应：新后端返回 `url`，旧后端返回 `imageUrl`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "imageUrl")]
    pub image_url: Option<String>,
}

impl UploadResponse {
    pub fn into_url(self) -> Option<String> {
        self.url.or(self.image_url).filter(|u| !u.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_params_stay_out_of_the_body() {
        let req = UpdateEventRequest {
            church_id: 3,
            event_id: 8,
            details: EventDetails {
                title: "Picnic".to_string(),
                start_datetime: "2025-07-30T14:00:00.000Z".to_string(),
                ..Default::default()
            },
        };
        assert_eq!(req.path(), "/churches/3/events/8");
        let body = serde_json::to_value(&req).unwrap();
        assert!(body.get("event_id").is_none());
        assert!(body.get("church_id").is_none());
        assert_eq!(body["title"], "Picnic");
    }

    #[test]
    fn announcement_create_carries_church_in_body() {
        let req = CreateAnnouncementRequest {
            church_id: 5,
            details: AnnouncementDetails {
                title: "Potluck".to_string(),
                posted_at: "2025-07-30T14:00:00.000Z".to_string(),
                ..Default::default()
            },
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["church_id"], 5);
        assert_eq!(body["type"], "weekly");
    }

    #[test]
    fn announcement_list_filters_by_church() {
        assert_eq!(ListAnnouncementsRequest { church_id: None }.path(), "/announcements");
        assert_eq!(
            ListAnnouncementsRequest { church_id: Some(2) }.path(),
            "/announcements?church_id=2"
        );
    }

    #[test]
    fn reset_token_is_url_encoded() {
        let req = VerifyResetTokenRequest {
            token: "a b/c".to_string(),
        };
        assert_eq!(req.path(), "/auth/verify-reset-token?token=a%20b%2Fc");
    }

    #[test]
    fn camel_case_bodies() {
        let body = serde_json::to_value(AssignChurchRequest {
            user_id: 1,
            church_id: 9,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"churchId": 9}));

        let body = serde_json::to_value(ChangePasswordRequest {
            current_password: "old".to_string(),
            new_password: "newpass".to_string(),
        })
        .unwrap();
        assert_eq!(body["currentPassword"], "old");
        assert_eq!(body["newPassword"], "newpass");
    }

    #[test]
    fn church_deleted_reads_cascade_count() {
        let deleted: ChurchDeleted =
            serde_json::from_str(r#"{"message": "ok", "removedAssignments": 3}"#).unwrap();
        assert_eq!(deleted.removed_assignments, 3);
    }

    #[test]
    fn upload_response_accepts_both_url_fields() {
        let a: UploadResponse = serde_json::from_str(r#"{"url": "https://x/a.png"}"#).unwrap();
        let b: UploadResponse = serde_json::from_str(r#"{"imageUrl": "https://x/b.png"}"#).unwrap();
        let c: UploadResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(a.into_url().as_deref(), Some("https://x/a.png"));
        assert_eq!(b.into_url().as_deref(), Some("https://x/b.png"));
        assert_eq!(c.into_url(), None);
    }

    #[test]
    fn error_body_prefers_error_field() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"error": "Validation failed", "message": "m", "details": [{"field": "title", "message": "Title is required"}]}"#,
        )
        .unwrap();
        assert_eq!(body.text(), Some("Validation failed"));
        assert_eq!(body.details[0].field, "title");
        assert_eq!(ApiErrorBody::default().text(), None);
    }

    #[test]
    fn verify_response_without_user() {
        let resp: VerifyTokenResponse = serde_json::from_str(r#"{"valid": false}"#).unwrap();
        assert!(!resp.valid);
        assert!(resp.user.is_none());
    }
}
