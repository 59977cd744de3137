//! 表单模式与客户端校验
//!
//! 表单字段全部是输入框原始字符串；`Validate::validate` 负责把它们解析为
//! 发送给后端的强类型结构，失败时返回按字段索引的错误表。
//! 客户端校验只是体验优化，后端才是最终权威。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::date;
use crate::models::{
    AnnouncementDetails, AnnouncementKind, ChurchProfile, DonationDetails, EventDetails,
    PaymentMethod,
};
use crate::protocol::{EnrollmentRequest, RegisterAdminRequest};
use crate::{Id, Role};

pub const MIN_PASSWORD_LEN: usize = 6;

// =========================================================
// FieldErrors
// =========================================================

/// 字段名 -> 错误信息（有序，保证渲染顺序稳定）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 有错误则返回 Err，否则返回给定值
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl FromIterator<(String, String)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 表单 -> 请求体
pub trait Validate {
    type Output;

    fn validate(&self) -> Result<Self::Output, FieldErrors>;
}

// =========================================================
// 基础规则
// =========================================================

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// 空串 -> None，其余去掉首尾空白
fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 与 `^[^\s@]+@[^\s@]+\.[^\s@]+$` 等价
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn require(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if is_blank(value) {
        errors.insert(field, message);
    }
}

fn check_optional_email(errors: &mut FieldErrors, field: &str, value: &str) {
    if !is_blank(value) && !is_valid_email(value.trim()) {
        errors.insert(field, "Please enter a valid email address");
    }
}

fn check_new_password(errors: &mut FieldErrors, new_password: &str, confirm: &str, mismatch: &str) {
    if new_password.is_empty() {
        errors.insert("new_password", "New password is required");
    } else if new_password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            "new_password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
        );
    } else if new_password != confirm {
        errors.insert("confirm_password", mismatch);
    }
}

// =========================================================
// Login
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl Validate for LoginForm {
    type Output = (String, String);

    fn validate(&self) -> Result<Self::Output, FieldErrors> {
        let mut errors = FieldErrors::new();
        if is_blank(&self.email) || is_blank(&self.password) {
            errors.insert("form", "Please enter both email and password");
        }
        errors.into_result((self.email.trim().to_string(), self.password.clone()))
    }
}

// =========================================================
// Church
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChurchForm {
    pub name: String,
    pub senior_pastor: String,
    pub senior_pastor_avatar: String,
    pub pastor: String,
    pub pastor_avatar: String,
    pub assistant_pastor: String,
    pub assistant_pastor_avatar: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub website: String,
    pub description: String,
    pub logo_url: String,
    pub banner_url: String,
}

impl From<&ChurchProfile> for ChurchForm {
    fn from(p: &ChurchProfile) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            name: p.name.clone(),
            senior_pastor: p.senior_pastor.clone(),
            senior_pastor_avatar: text(&p.senior_pastor_avatar),
            pastor: text(&p.pastor),
            pastor_avatar: text(&p.pastor_avatar),
            assistant_pastor: text(&p.assistant_pastor),
            assistant_pastor_avatar: text(&p.assistant_pastor_avatar),
            address: text(&p.address),
            city: text(&p.city),
            state: text(&p.state),
            zip: text(&p.zip),
            contact_email: text(&p.contact_email),
            contact_phone: text(&p.contact_phone),
            website: text(&p.website),
            description: text(&p.description),
            logo_url: text(&p.logo_url),
            banner_url: text(&p.banner_url),
        }
    }
}

impl Validate for ChurchForm {
    type Output = ChurchProfile;

    fn validate(&self) -> Result<ChurchProfile, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Church name is required");
        require(
            &mut errors,
            "senior_pastor",
            &self.senior_pastor,
            "Senior pastor is required",
        );
        check_optional_email(&mut errors, "contact_email", &self.contact_email);

        errors.into_result(ChurchProfile {
            name: self.name.trim().to_string(),
            senior_pastor: self.senior_pastor.trim().to_string(),
            senior_pastor_avatar: optional(&self.senior_pastor_avatar),
            pastor: optional(&self.pastor),
            pastor_avatar: optional(&self.pastor_avatar),
            assistant_pastor: optional(&self.assistant_pastor),
            assistant_pastor_avatar: optional(&self.assistant_pastor_avatar),
            address: optional(&self.address),
            city: optional(&self.city),
            state: optional(&self.state),
            zip: optional(&self.zip),
            contact_email: optional(&self.contact_email),
            contact_phone: optional(&self.contact_phone),
            website: optional(&self.website),
            description: optional(&self.description),
            logo_url: optional(&self.logo_url),
            banner_url: optional(&self.banner_url),
        })
    }
}

// =========================================================
// Event
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub location: String,
    /// `datetime-local` 格式
    pub start_datetime: String,
    pub end_datetime: String,
    pub image_url: String,
    pub price: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub website: String,
}

impl From<&EventDetails> for EventForm {
    fn from(d: &EventDetails) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            title: d.title.clone(),
            description: d.description.clone(),
            location: text(&d.location),
            start_datetime: date::to_input(&d.start_datetime),
            end_datetime: d.end_datetime.as_deref().map(date::to_input).unwrap_or_default(),
            image_url: text(&d.image_url),
            price: if d.price > 0.0 { d.price.to_string() } else { String::new() },
            contact_email: text(&d.contact_email),
            contact_phone: text(&d.contact_phone),
            website: text(&d.website),
        }
    }
}

impl Validate for EventForm {
    type Output = EventDetails;

    fn validate(&self) -> Result<EventDetails, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "title", &self.title, "Event title is required");
        require(
            &mut errors,
            "description",
            &self.description,
            "Event description is required",
        );
        require(&mut errors, "image_url", &self.image_url, "Event image is required");
        require(&mut errors, "location", &self.location, "Event location is required");

        let start = date::parse_wall_clock(&self.start_datetime);
        let end = date::parse_wall_clock(&self.end_datetime);
        if start.is_none() {
            errors.insert("start_datetime", "Start date and time is required");
        }
        if end.is_none() {
            errors.insert("end_datetime", "End date and time is required");
        }
        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                errors.insert(
                    "end_datetime",
                    "End date and time must be after start date and time",
                );
            }
        }

        check_optional_email(&mut errors, "contact_email", &self.contact_email);

        let price = if is_blank(&self.price) {
            0.0
        } else {
            match self.price.trim().parse::<f64>() {
                Ok(p) if p.is_finite() && p >= 0.0 => p,
                _ => {
                    errors.insert(
                        "price",
                        "Price must be a valid number greater than or equal to 0",
                    );
                    0.0
                }
            }
        };

        errors.into_result(EventDetails {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            start_datetime: date::to_backend(&self.start_datetime).unwrap_or_default(),
            end_datetime: date::to_backend(&self.end_datetime),
            location: optional(&self.location),
            image_url: optional(&self.image_url),
            price,
            contact_email: optional(&self.contact_email),
            contact_phone: optional(&self.contact_phone),
            website: optional(&self.website),
        })
    }
}

// =========================================================
// Announcement
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AnnouncementForm {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub kind: AnnouncementKind,
    pub subcategory: String,
    pub start_time: String,
    pub end_time: String,
    pub recurrence_rule: String,
    pub is_special: bool,
    /// `datetime-local` 格式
    pub posted_at: String,
    /// 仅 weekly 时提交；切换类型时保留用户的选择，但不会被发送
    pub day: u8,
}

impl Default for AnnouncementForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            image_url: String::new(),
            kind: AnnouncementKind::Weekly,
            subcategory: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            recurrence_rule: String::new(),
            is_special: false,
            posted_at: String::new(),
            day: 0,
        }
    }
}

impl AnnouncementForm {
    /// 是否显示星期选择器
    pub fn shows_day_selector(&self) -> bool {
        self.kind == AnnouncementKind::Weekly
    }
}

impl From<&AnnouncementDetails> for AnnouncementForm {
    fn from(d: &AnnouncementDetails) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            title: d.title.clone(),
            description: d.description.clone(),
            image_url: text(&d.image_url),
            kind: d.kind,
            subcategory: text(&d.subcategory),
            start_time: text(&d.start_time),
            end_time: text(&d.end_time),
            recurrence_rule: text(&d.recurrence_rule),
            is_special: d.is_special,
            posted_at: date::to_input(&d.posted_at),
            day: d.day.unwrap_or(0),
        }
    }
}

impl Validate for AnnouncementForm {
    type Output = AnnouncementDetails;

    fn validate(&self) -> Result<AnnouncementDetails, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "title", &self.title, "Title is required");
        require(&mut errors, "description", &self.description, "Description is required");
        let posted_at = date::to_backend(&self.posted_at);
        if posted_at.is_none() {
            errors.insert("posted_at", "Posted date and time is required");
        }
        if self.shows_day_selector() && self.day > 6 {
            errors.insert("day", "Please choose a day of the week");
        }

        errors.into_result(AnnouncementDetails {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            image_url: optional(&self.image_url),
            posted_at: posted_at.unwrap_or_default(),
            kind: self.kind,
            subcategory: optional(&self.subcategory),
            start_time: optional(&self.start_time),
            end_time: optional(&self.end_time),
            recurrence_rule: optional(&self.recurrence_rule),
            is_special: self.is_special,
            day: self.shows_day_selector().then_some(self.day),
        })
    }
}

// =========================================================
// Donation
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonationForm {
    pub method: PaymentMethod,
    pub contact_name: String,
    pub contact_info: String,
    pub note: String,
}

impl From<&DonationDetails> for DonationForm {
    fn from(d: &DonationDetails) -> Self {
        Self {
            method: d.method,
            contact_name: d.contact_name.clone().unwrap_or_default(),
            contact_info: d.contact_info.clone(),
            note: d.note.clone().unwrap_or_default(),
        }
    }
}

impl Validate for DonationForm {
    type Output = DonationDetails;

    fn validate(&self) -> Result<DonationDetails, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(
            &mut errors,
            "contact_info",
            &self.contact_info,
            "Contact info is required",
        );
        errors.into_result(DonationDetails {
            method: self.method,
            contact_name: optional(&self.contact_name),
            contact_info: self.contact_info.trim().to_string(),
            note: optional(&self.note),
        })
    }
}

// =========================================================
// Enrollment
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrollmentForm {
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

impl Validate for EnrollmentForm {
    type Output = EnrollmentRequest;

    fn validate(&self) -> Result<EnrollmentRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "church_name", &self.church_name, "Church name is required");
        require(&mut errors, "pastor_name", &self.pastor_name, "Pastor name is required");
        check_optional_email(&mut errors, "contact_email", &self.contact_email);
        let t = |v: &str| v.trim().to_string();
        errors.into_result(EnrollmentRequest {
            church_name: t(&self.church_name),
            pastor_name: t(&self.pastor_name),
            address: t(&self.address),
            city: t(&self.city),
            state: t(&self.state),
            zip: t(&self.zip),
            contact_email: t(&self.contact_email),
            contact_phone: t(&self.contact_phone),
            website: t(&self.website),
            description: t(&self.description),
        })
    }
}

// =========================================================
// Profile & Password
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
}

impl Validate for ProfileForm {
    type Output = ProfileForm;

    fn validate(&self) -> Result<ProfileForm, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Name is required");
        if !is_valid_email(self.email.trim()) {
            errors.insert("email", "Please enter a valid email address");
        }
        errors.into_result(ProfileForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasswordChangeForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl Validate for PasswordChangeForm {
    /// (current, new)
    type Output = (String, String);

    fn validate(&self) -> Result<Self::Output, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.current_password.is_empty() {
            errors.insert("current_password", "Current password is required");
        }
        check_new_password(
            &mut errors,
            &self.new_password,
            &self.confirm_password,
            "New passwords do not match",
        );
        errors.into_result((self.current_password.clone(), self.new_password.clone()))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasswordResetForm {
    pub new_password: String,
    pub confirm_password: String,
}

impl Validate for PasswordResetForm {
    type Output = String;

    fn validate(&self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_new_password(
            &mut errors,
            &self.new_password,
            &self.confirm_password,
            "Passwords do not match",
        );
        errors.into_result(self.new_password.clone())
    }
}

// =========================================================
// Superuser
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminAccountForm {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

impl Validate for AdminAccountForm {
    type Output = RegisterAdminRequest;

    fn validate(&self) -> Result<RegisterAdminRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        if is_blank(&self.email) || is_blank(&self.name) || self.password.is_empty() {
            errors.insert("form", "Please fill in all required fields");
        } else if !self.email.contains('@') {
            errors.insert("email", "Email must contain an @ symbol");
        }
        errors.into_result(RegisterAdminRequest {
            email: self.email.trim().to_lowercase(),
            password: self.password.clone(),
            name: self.name.trim().to_string(),
            role: self.role,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentForm {
    pub user_id: Option<Id>,
    pub church_id: Option<Id>,
}

impl Validate for AssignmentForm {
    /// (user, church)
    type Output = (Id, Id);

    fn validate(&self) -> Result<(Id, Id), FieldErrors> {
        match (self.user_id, self.church_id) {
            (Some(user), Some(church)) => Ok((user, church)),
            _ => {
                let mut errors = FieldErrors::new();
                errors.insert("form", "Please select both user and church");
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_form() -> EventForm {
        EventForm {
            title: "Fall Festival".to_string(),
            description: "Games and food".to_string(),
            location: "Main lawn".to_string(),
            start_datetime: "2025-10-04T10:00".to_string(),
            end_datetime: "2025-10-04T14:00".to_string(),
            image_url: "https://cdn.example/fest.png".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn email_rule_matches_common_cases() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@c.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@@b.com"));
    }

    #[test]
    fn valid_event_is_converted_for_backend() {
        let details = event_form().validate().unwrap();
        assert_eq!(details.start_datetime, "2025-10-04T10:00:00.000Z");
        assert_eq!(details.end_datetime.as_deref(), Some("2025-10-04T14:00:00.000Z"));
        assert_eq!(details.price, 0.0);
        assert_eq!(details.contact_email, None);
    }

    #[test]
    fn event_requires_core_fields() {
        let errors = EventForm::default().validate().unwrap_err();
        for field in [
            "title",
            "description",
            "image_url",
            "location",
            "start_datetime",
            "end_datetime",
        ] {
            assert!(errors.get(field).is_some(), "missing error for {field}");
        }
    }

    #[test]
    fn event_end_must_follow_start() {
        let mut form = event_form();
        form.end_datetime = form.start_datetime.clone();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("end_datetime"),
            Some("End date and time must be after start date and time")
        );
    }

    #[test]
    fn event_price_must_be_non_negative_number() {
        let mut form = event_form();
        form.price = "-1".to_string();
        assert!(form.validate().unwrap_err().get("price").is_some());
        form.price = "abc".to_string();
        assert!(form.validate().unwrap_err().get("price").is_some());
        form.price = "15.5".to_string();
        assert_eq!(form.validate().unwrap().price, 15.5);
    }

    #[test]
    fn weekly_announcement_keeps_day() {
        let form = AnnouncementForm {
            title: "Choir practice".to_string(),
            description: "Every week".to_string(),
            posted_at: "2025-07-01T09:00".to_string(),
            day: 2,
            ..Default::default()
        };
        assert_eq!(form.validate().unwrap().day, Some(2));
    }

    #[test]
    fn general_announcement_drops_previous_day() {
        let mut form = AnnouncementForm {
            title: "Parking lot repaving".to_string(),
            description: "Use the side entrance".to_string(),
            posted_at: "2025-07-01T09:00".to_string(),
            day: 4,
            ..Default::default()
        };
        form.kind = AnnouncementKind::General;
        assert!(!form.shows_day_selector());
        assert_eq!(form.validate().unwrap().day, None);
    }

    #[test]
    fn announcement_requires_posted_at() {
        let form = AnnouncementForm {
            title: "t".to_string(),
            description: "d".to_string(),
            ..Default::default()
        };
        assert!(form.validate().unwrap_err().get("posted_at").is_some());
    }

    #[test]
    fn donation_requires_contact_info() {
        let errors = DonationForm::default().validate().unwrap_err();
        assert_eq!(errors.get("contact_info"), Some("Contact info is required"));
    }

    #[test]
    fn password_change_rules() {
        let mut form = PasswordChangeForm {
            current_password: "old".to_string(),
            new_password: "12345".to_string(),
            confirm_password: "12345".to_string(),
        };
        assert!(form.validate().unwrap_err().get("new_password").is_some());

        form.new_password = "123456".to_string();
        assert_eq!(
            form.validate().unwrap_err().get("confirm_password"),
            Some("New passwords do not match")
        );

        form.confirm_password = "123456".to_string();
        assert_eq!(
            form.validate().unwrap(),
            ("old".to_string(), "123456".to_string())
        );
    }

    #[test]
    fn admin_account_email_is_lowercased() {
        let form = AdminAccountForm {
            email: "New.Admin@Church.ORG".to_string(),
            name: "New Admin".to_string(),
            password: "secret1".to_string(),
            role: Role::ChurchAdmin,
        };
        assert_eq!(form.validate().unwrap().email, "new.admin@church.org");
    }

    #[test]
    fn admin_account_needs_at_sign() {
        let form = AdminAccountForm {
            email: "nobody".to_string(),
            name: "N".to_string(),
            password: "secret1".to_string(),
            role: Role::ChurchAdmin,
        };
        assert_eq!(
            form.validate().unwrap_err().get("email"),
            Some("Email must contain an @ symbol")
        );
    }

    #[test]
    fn login_form_rejects_blank_fields() {
        let form = LoginForm {
            email: "a@b.com".to_string(),
            password: "  ".to_string(),
        };
        assert_eq!(
            form.validate().unwrap_err().get("form"),
            Some("Please enter both email and password")
        );
    }

    #[test]
    fn church_form_round_trips_profile() {
        let profile = ChurchProfile {
            name: "Grace".to_string(),
            senior_pastor: "Rev. Lee".to_string(),
            city: Some("Austin".to_string()),
            ..Default::default()
        };
        let form = ChurchForm::from(&profile);
        assert_eq!(form.validate().unwrap(), profile);
    }
}
