use serde::{Deserialize, Deserializer, Serialize};

pub mod date;
pub mod forms;
pub mod models;
pub mod protocol;

pub use chrono;
pub use forms::{FieldErrors, Validate};
pub use models::{
    Announcement, AnnouncementDetails, AnnouncementKind, Church, ChurchProfile, DonationDetails,
    DonationMethod, Event, EventDetails, PaymentMethod,
};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const UPLOAD_FIELD_NAME: &str = "image";

/// 后端实体的主键类型
pub type Id = i64;

/// 字段缺失或为 `null` 时都取缺省值
///
/// 后端的可空列会直接回 `null`，而 `#[serde(default)]` 只覆盖缺失的键。
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ChurchAdmin,
    Superuser,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::ChurchAdmin => "church_admin",
            Role::Superuser => "superuser",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::ChurchAdmin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    None,
    Pending,
    Approved,
}

/// 管理员与其负责教会之间的关联
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurchAssignment {
    #[serde(rename = "id")]
    pub assignment_id: Id,
    pub church_id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub church_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub email: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_status: Option<EnrollmentStatus>,
    #[serde(rename = "churchAssignments", default, deserialize_with = "null_as_default")]
    pub church_assignments: Vec<ChurchAssignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// 登录后 `/dashboard` 应呈现的界面
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardKind {
    Superuser,
    /// 尚未提交教会入驻申请
    EnrollmentForm,
    /// 已提交申请，等待超级管理员审核
    PendingReview,
    /// 正常运营面板，作用域为第一个教会分配
    Operational(ChurchAssignment),
}

impl User {
    pub fn is_superuser(&self) -> bool {
        self.role == Role::Superuser
    }

    /// 当前管理员负责的教会（按后端顺序取第一个）
    pub fn primary_church(&self) -> Option<&ChurchAssignment> {
        self.church_assignments.first()
    }

    /// 尚未分配教会的教会管理员（超级管理员分配列表）
    pub fn needs_assignment(&self) -> bool {
        self.role == Role::ChurchAdmin && self.church_assignments.is_empty()
    }

    pub fn landing(&self) -> DashboardKind {
        if self.is_superuser() {
            return DashboardKind::Superuser;
        }
        if let Some(assignment) = self.primary_church() {
            return DashboardKind::Operational(assignment.clone());
        }
        match self.enrollment_status {
            Some(EnrollmentStatus::Pending) => DashboardKind::PendingReview,
            _ => DashboardKind::EnrollmentForm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(status: Option<EnrollmentStatus>, assignments: Vec<ChurchAssignment>) -> User {
        User {
            id: 7,
            email: "admin@church.org".to_string(),
            display_name: "Pat".to_string(),
            role: Role::ChurchAdmin,
            enrollment_status: status,
            church_assignments: assignments,
            created_at: None,
        }
    }

    fn assignment(church_id: Id) -> ChurchAssignment {
        ChurchAssignment {
            assignment_id: 1,
            church_id,
            church_name: "Grace".to_string(),
        }
    }

    #[test]
    fn pending_admin_without_church_waits_for_review() {
        let user = admin(Some(EnrollmentStatus::Pending), vec![]);
        assert_eq!(user.landing(), DashboardKind::PendingReview);
    }

    #[test]
    fn admin_without_enrollment_sees_the_form() {
        assert_eq!(admin(None, vec![]).landing(), DashboardKind::EnrollmentForm);
        assert_eq!(
            admin(Some(EnrollmentStatus::Approved), vec![]).landing(),
            DashboardKind::EnrollmentForm
        );
    }

    #[test]
    fn assigned_admin_is_scoped_to_first_church() {
        let user = admin(
            Some(EnrollmentStatus::Pending),
            vec![assignment(4), assignment(9)],
        );
        assert_eq!(user.landing(), DashboardKind::Operational(assignment(4)));
    }

    #[test]
    fn superuser_always_gets_the_superuser_dashboard() {
        let mut user = admin(None, vec![]);
        user.role = Role::Superuser;
        assert_eq!(user.landing(), DashboardKind::Superuser);
    }

    #[test]
    fn user_decodes_backend_shape() {
        let body = r#"{
            "id": 3,
            "email": "a@b.com",
            "name": "Ann",
            "role": "church_admin",
            "enrollment_status": "pending",
            "churchAssignments": [{"id": 11, "user_id": 3, "church_id": 5, "church_name": "St. Mark"}]
        }"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert_eq!(user.display_name, "Ann");
        assert_eq!(user.enrollment_status, Some(EnrollmentStatus::Pending));
        assert_eq!(user.church_assignments[0].assignment_id, 11);
        assert_eq!(user.church_assignments[0].church_id, 5);
    }

    #[test]
    fn missing_assignments_default_to_empty() {
        let body = r#"{"id": 1, "email": "s@x.io", "name": "Root", "role": "superuser"}"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert!(user.church_assignments.is_empty());
        assert!(user.enrollment_status.is_none());
    }

    #[test]
    fn null_assignments_and_church_name_decode_as_empty() {
        let body = r#"{"id": 1, "email": "a@x.io", "name": "Ann", "role": "church_admin", "churchAssignments": null}"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert!(user.church_assignments.is_empty());

        let assignment: ChurchAssignment =
            serde_json::from_str(r#"{"id": 2, "church_id": 5, "church_name": null}"#).unwrap();
        assert_eq!(assignment.church_name, "");
    }
}
