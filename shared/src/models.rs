//! 教会相关实体
//!
//! 每个实体都拆成 `id` + 可编辑部分（`*Profile` / `*Details`），
//! 可编辑部分同时作为创建/更新请求体使用。

use serde::{Deserialize, Serialize};

use crate::{Id, null_as_default};

// =========================================================
// Church
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChurchProfile {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub senior_pastor: String,
    #[serde(default)]
    pub senior_pastor_avatar: Option<String>,
    #[serde(default)]
    pub pastor: Option<String>,
    #[serde(default)]
    pub pastor_avatar: Option<String>,
    #[serde(default)]
    pub assistant_pastor: Option<String>,
    #[serde(default)]
    pub assistant_pastor_avatar: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Church {
    pub id: Id,
    #[serde(flatten)]
    pub profile: ChurchProfile,
}

impl Church {
    /// 单行地址，用于列表展示
    pub fn address_line(&self) -> String {
        let p = &self.profile;
        [&p.address, &p.city, &p.state, &p.zip]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// =========================================================
// Event
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub start_datetime: String,
    #[serde(default)]
    pub end_datetime: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Id,
    pub church_id: Id,
    #[serde(flatten)]
    pub details: EventDetails,
}

impl Event {
    pub fn is_free(&self) -> bool {
        self.details.price <= 0.0
    }

    pub fn price_label(&self) -> String {
        if self.is_free() {
            "Free".to_string()
        } else {
            format!("${:.2}", self.details.price)
        }
    }
}

// =========================================================
// Announcement
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementKind {
    Weekly,
    Special,
    Yearly,
    General,
}

impl AnnouncementKind {
    pub const ALL: [AnnouncementKind; 4] = [
        AnnouncementKind::Weekly,
        AnnouncementKind::Special,
        AnnouncementKind::Yearly,
        AnnouncementKind::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnnouncementKind::Weekly => "weekly",
            AnnouncementKind::Special => "special",
            AnnouncementKind::Yearly => "yearly",
            AnnouncementKind::General => "general",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnnouncementKind::Weekly => "Weekly",
            AnnouncementKind::Special => "Special",
            AnnouncementKind::Yearly => "Yearly",
            AnnouncementKind::General => "General",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == value)
    }
}

impl Default for AnnouncementKind {
    fn default() -> Self {
        AnnouncementKind::Weekly
    }
}

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// 0 = Sunday ... 6 = Saturday
pub fn weekday_name(day: u8) -> Option<&'static str> {
    WEEKDAY_NAMES.get(usize::from(day)).copied()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementDetails {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub posted_at: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: AnnouncementKind,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub recurrence_rule: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_special: bool,
    /// 仅在 `kind == Weekly` 时有意义
    #[serde(default)]
    pub day: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Id,
    pub church_id: Id,
    #[serde(flatten)]
    pub details: AnnouncementDetails,
}

impl Announcement {
    /// 周期公告的星期标签；非 weekly 公告即使残留了 day 也不显示
    pub fn day_chip(&self) -> Option<&'static str> {
        match self.details.kind {
            AnnouncementKind::Weekly => self.details.day.and_then(weekday_name),
            _ => None,
        }
    }
}

// =========================================================
// Donation
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Cash App")]
    CashApp,
    Zelle,
    Venmo,
    PayPal,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 6] = [
        PaymentMethod::CashApp,
        PaymentMethod::Zelle,
        PaymentMethod::Venmo,
        PaymentMethod::PayPal,
        PaymentMethod::BankTransfer,
        PaymentMethod::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::CashApp => "Cash App",
            PaymentMethod::Zelle => "Zelle",
            PaymentMethod::Venmo => "Venmo",
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Other => "Other",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label() == label)
    }

    /// 卡片上显示的单字符徽标
    pub fn badge(&self) -> &'static str {
        match self {
            PaymentMethod::CashApp => "$",
            PaymentMethod::Zelle => "Z",
            PaymentMethod::Venmo => "V",
            PaymentMethod::PayPal => "P",
            PaymentMethod::BankTransfer => "B",
            PaymentMethod::Other => "?",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::CashApp
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DonationDetails {
    pub method: PaymentMethod,
    #[serde(default)]
    pub contact_name: Option<String>,
    pub contact_info: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationMethod {
    pub id: Id,
    pub church_id: Id,
    #[serde(flatten)]
    pub details: DonationDetails,
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}
