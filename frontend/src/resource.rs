//! 通用资源页面
//!
//! 所有 CRUD 页面遵循同一流程：表单 -> 校验 -> 请求 -> 合并到本地列表。
//! 每种实体只需实现 `Listing`（列表 + 删除），可编辑的实体再实现 `Editable`。
//!
//! 本地列表只是后端数据的临时镜像：按后端顺序保存，离开页面即丢弃。

use std::rc::Rc;

use churchhub_shared::forms::{
    AdminAccountForm, AnnouncementForm, AssignmentForm, ChurchForm, DonationForm, EventForm,
};
use churchhub_shared::protocol::{
    ApiRequest, AssignChurchRequest, ChurchDeleted, CreateAnnouncementRequest,
    CreateChurchRequest, CreateDonationRequest, CreateEventRequest, DeleteAnnouncementRequest,
    DeleteChurchRequest, DeleteDonationRequest, DeleteEventRequest, DeleteUserRequest,
    ListAnnouncementsRequest, ListChurchesRequest, ListDonationsRequest, ListEventsRequest,
    ListUsersRequest, MessageResponse, UpdateAnnouncementRequest, UpdateChurchRequest,
    UpdateDonationRequest, UpdateEventRequest,
};
use churchhub_shared::{
    Announcement, AnnouncementDetails, Church, ChurchProfile, DonationDetails, DonationMethod,
    Event, EventDetails, FieldErrors, Id, User, Validate,
};
use leptos::prelude::{ArcRwSignal, Update, WithUntracked};

use crate::api::ChurchHubApi;
use crate::error::{AdminError, AdminErrorKind, AdminResult};
use crate::session::Bearer;
use crate::web::http::HttpClient;

// =========================================================
// 实体抽象
// =========================================================

pub trait Identified {
    fn id(&self) -> Id;
}

impl Identified for Church {
    fn id(&self) -> Id {
        self.id
    }
}

impl Identified for Event {
    fn id(&self) -> Id {
        self.id
    }
}

impl Identified for Announcement {
    fn id(&self) -> Id {
        self.id
    }
}

impl Identified for DonationMethod {
    fn id(&self) -> Id {
        self.id
    }
}

impl Identified for User {
    fn id(&self) -> Id {
        self.id
    }
}

/// 可列出、可删除的资源
pub trait Listing {
    type Item: Clone + Identified + Send + Sync + 'static;
    type ListReq: ApiRequest<Response = Vec<Self::Item>>;
    type DeleteReq: ApiRequest;

    /// 单数名词，用于提示文案，如 "event"
    fn noun(&self) -> &'static str;
    /// 复数名词，如 "events"
    fn plural(&self) -> &'static str;

    fn list_request(&self) -> Self::ListReq;
    fn delete_request(&self, id: Id) -> Self::DeleteReq;

    fn delete_prompt(&self, _item: &Self::Item) -> String {
        format!("Are you sure you want to delete this {}?", self.noun())
    }

    fn delete_notice(&self, _resp: &<Self::DeleteReq as ApiRequest>::Response) -> String {
        format!("{} deleted successfully!", capitalize(self.noun()))
    }
}

/// 可创建、可更新的资源
pub trait Editable: Listing {
    type Form: Validate + Clone + Default + 'static;
    type CreateReq: ApiRequest<Response = Self::Item>;
    type UpdateReq: ApiRequest<Response = Self::Item>;

    fn create_request(&self, payload: <Self::Form as Validate>::Output) -> Self::CreateReq;
    fn update_request(&self, id: Id, payload: <Self::Form as Validate>::Output) -> Self::UpdateReq;
    /// 编辑已有记录时的表单初值
    fn form_for(&self, item: &Self::Item) -> Self::Form;
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =========================================================
// 资源种类
// =========================================================

/// 全部教会（超级管理员）
#[derive(Debug, Clone, Copy, Default)]
pub struct Churches;

impl Listing for Churches {
    type Item = Church;
    type ListReq = ListChurchesRequest;
    type DeleteReq = DeleteChurchRequest;

    fn noun(&self) -> &'static str {
        "church"
    }

    fn plural(&self) -> &'static str {
        "churches"
    }

    fn list_request(&self) -> ListChurchesRequest {
        ListChurchesRequest
    }

    fn delete_request(&self, id: Id) -> DeleteChurchRequest {
        DeleteChurchRequest { church_id: id }
    }

    fn delete_prompt(&self, item: &Church) -> String {
        format!(
            "Are you sure you want to delete \"{}\"?\n\nThis will also remove all admin assignments for this church and reset affected users' enrollment status.",
            item.profile.name
        )
    }

    fn delete_notice(&self, resp: &ChurchDeleted) -> String {
        format!(
            "Church deleted successfully! {} admin assignments were also removed.",
            resp.removed_assignments
        )
    }
}

impl Editable for Churches {
    type Form = ChurchForm;
    type CreateReq = CreateChurchRequest;
    type UpdateReq = UpdateChurchRequest;

    fn create_request(&self, profile: ChurchProfile) -> CreateChurchRequest {
        CreateChurchRequest { profile }
    }

    fn update_request(&self, id: Id, profile: ChurchProfile) -> UpdateChurchRequest {
        UpdateChurchRequest {
            church_id: id,
            profile,
        }
    }

    fn form_for(&self, item: &Church) -> ChurchForm {
        ChurchForm::from(&item.profile)
    }
}

/// 某个教会的活动
#[derive(Debug, Clone, Copy)]
pub struct EventsOf {
    pub church_id: Id,
}

impl Listing for EventsOf {
    type Item = Event;
    type ListReq = ListEventsRequest;
    type DeleteReq = DeleteEventRequest;

    fn noun(&self) -> &'static str {
        "event"
    }

    fn plural(&self) -> &'static str {
        "events"
    }

    fn list_request(&self) -> ListEventsRequest {
        ListEventsRequest {
            church_id: self.church_id,
        }
    }

    fn delete_request(&self, id: Id) -> DeleteEventRequest {
        DeleteEventRequest {
            church_id: self.church_id,
            event_id: id,
        }
    }

    fn delete_prompt(&self, item: &Event) -> String {
        format!("Are you sure you want to delete \"{}\"?", item.details.title)
    }
}

impl Editable for EventsOf {
    type Form = EventForm;
    type CreateReq = CreateEventRequest;
    type UpdateReq = UpdateEventRequest;

    fn create_request(&self, details: EventDetails) -> CreateEventRequest {
        CreateEventRequest {
            church_id: self.church_id,
            details,
        }
    }

    fn update_request(&self, id: Id, details: EventDetails) -> UpdateEventRequest {
        UpdateEventRequest {
            church_id: self.church_id,
            event_id: id,
            details,
        }
    }

    fn form_for(&self, item: &Event) -> EventForm {
        EventForm::from(&item.details)
    }
}

/// 某个教会的公告
#[derive(Debug, Clone, Copy)]
pub struct AnnouncementsOf {
    pub church_id: Id,
}

impl Listing for AnnouncementsOf {
    type Item = Announcement;
    type ListReq = ListAnnouncementsRequest;
    type DeleteReq = DeleteAnnouncementRequest;

    fn noun(&self) -> &'static str {
        "announcement"
    }

    fn plural(&self) -> &'static str {
        "announcements"
    }

    fn list_request(&self) -> ListAnnouncementsRequest {
        ListAnnouncementsRequest {
            church_id: Some(self.church_id),
        }
    }

    fn delete_request(&self, id: Id) -> DeleteAnnouncementRequest {
        DeleteAnnouncementRequest {
            announcement_id: id,
        }
    }
}

impl Editable for AnnouncementsOf {
    type Form = AnnouncementForm;
    type CreateReq = CreateAnnouncementRequest;
    type UpdateReq = UpdateAnnouncementRequest;

    fn create_request(&self, details: AnnouncementDetails) -> CreateAnnouncementRequest {
        CreateAnnouncementRequest {
            church_id: self.church_id,
            details,
        }
    }

    fn update_request(&self, id: Id, details: AnnouncementDetails) -> UpdateAnnouncementRequest {
        UpdateAnnouncementRequest {
            announcement_id: id,
            details,
        }
    }

    fn form_for(&self, item: &Announcement) -> AnnouncementForm {
        AnnouncementForm::from(&item.details)
    }
}

/// 某个教会的捐赠方式
#[derive(Debug, Clone, Copy)]
pub struct DonationsOf {
    pub church_id: Id,
}

impl Listing for DonationsOf {
    type Item = DonationMethod;
    type ListReq = ListDonationsRequest;
    type DeleteReq = DeleteDonationRequest;

    fn noun(&self) -> &'static str {
        "donation method"
    }

    fn plural(&self) -> &'static str {
        "donation methods"
    }

    fn list_request(&self) -> ListDonationsRequest {
        ListDonationsRequest {
            church_id: self.church_id,
        }
    }

    fn delete_request(&self, id: Id) -> DeleteDonationRequest {
        DeleteDonationRequest {
            church_id: self.church_id,
            donation_id: id,
        }
    }
}

impl Editable for DonationsOf {
    type Form = DonationForm;
    type CreateReq = CreateDonationRequest;
    type UpdateReq = UpdateDonationRequest;

    fn create_request(&self, details: DonationDetails) -> CreateDonationRequest {
        CreateDonationRequest {
            church_id: self.church_id,
            details,
        }
    }

    fn update_request(&self, id: Id, details: DonationDetails) -> UpdateDonationRequest {
        UpdateDonationRequest {
            church_id: self.church_id,
            donation_id: id,
            details,
        }
    }

    fn form_for(&self, item: &DonationMethod) -> DonationForm {
        DonationForm::from(&item.details)
    }
}

/// 全部用户（超级管理员）：只读列表 + 删除 + 分配教会
#[derive(Debug, Clone, Copy, Default)]
pub struct Users;

impl Listing for Users {
    type Item = User;
    type ListReq = ListUsersRequest;
    type DeleteReq = DeleteUserRequest;

    fn noun(&self) -> &'static str {
        "user"
    }

    fn plural(&self) -> &'static str {
        "users"
    }

    fn list_request(&self) -> ListUsersRequest {
        ListUsersRequest
    }

    fn delete_request(&self, id: Id) -> DeleteUserRequest {
        DeleteUserRequest { user_id: id }
    }

    fn delete_notice(&self, _resp: &MessageResponse) -> String {
        "User deleted successfully!".to_string()
    }
}

// =========================================================
// 删除确认
// =========================================================

/// 阻塞式的是/否确认
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// `window.confirm`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserConfirm;

impl Confirm for BrowserConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(prompt).ok())
            .unwrap_or(false)
    }
}

// =========================================================
// 列表状态
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceList<T> {
    pub items: Vec<T>,
    /// 正在加载列表
    pub loading: bool,
    /// 正在提交创建/更新/删除
    pub saving: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    /// 每次设置提示时递增，用于过期判断
    pub notice_seq: u64,
    pub field_errors: FieldErrors,
}

impl<T> Default for ResourceList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            saving: false,
            error: None,
            notice: None,
            notice_seq: 0,
            field_errors: FieldErrors::new(),
        }
    }
}

// =========================================================
// ResourceScreen
// =========================================================

pub struct ResourceScreen<K: Listing, C> {
    kind: K,
    api: Rc<ChurchHubApi<C>>,
    bearer: Rc<dyn Bearer>,
    state: ArcRwSignal<ResourceList<K::Item>>,
}

impl<K: Listing, C: HttpClient> ResourceScreen<K, C> {
    pub fn new(kind: K, api: Rc<ChurchHubApi<C>>, bearer: Rc<dyn Bearer>) -> Self {
        Self {
            kind,
            api,
            bearer,
            state: ArcRwSignal::new(ResourceList::default()),
        }
    }

    pub fn state(&self) -> &ArcRwSignal<ResourceList<K::Item>> {
        &self.state
    }

    pub fn items(&self) -> Vec<K::Item> {
        self.state.with_untracked(|s| s.items.clone())
    }

    pub fn find(&self, id: Id) -> Option<K::Item> {
        self.state
            .with_untracked(|s| s.items.iter().find(|item| item.id() == id).cloned())
    }

    fn token(&self) -> Option<String> {
        self.bearer.bearer()
    }

    fn fail(&self, e: &AdminError, fallback: &str) {
        let message = e.message_or(fallback);
        log_warn!("[Resource] {}", e);
        self.state.update(|s| {
            s.loading = false;
            s.saving = false;
            s.notice = None;
            if e.kind == AdminErrorKind::BackendValidation {
                s.field_errors = e.field_errors.clone();
            }
            s.error = Some(message);
        });
    }

    fn succeed(&self, notice: String, f: impl FnOnce(&mut Vec<K::Item>)) {
        self.state.update(|s| {
            f(&mut s.items);
            s.saving = false;
            s.error = None;
            s.field_errors = FieldErrors::new();
            s.notice = Some(notice);
            s.notice_seq += 1;
        });
    }

    fn begin_save(&self) {
        self.state.update(|s| {
            s.saving = true;
            s.error = None;
            s.notice = None;
        });
    }

    /// 拉取列表；失败时保留原列表
    pub async fn load(&self) -> AdminResult<()> {
        self.state.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let token = self.token();
        match self.api.call(&self.kind.list_request(), token.as_deref()).await {
            Ok(items) => {
                self.state.update(|s| {
                    s.items = items;
                    s.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                let e = e.in_op_with("resource.load", self.kind.plural());
                self.fail(&e, &format!("Failed to load {}", self.kind.plural()));
                Err(e)
            }
        }
    }

    /// 删除前询问；拒绝时不发请求，返回 `Ok(false)`
    pub async fn delete(&self, id: Id, confirm: &dyn Confirm) -> AdminResult<bool> {
        let prompt = match self.find(id) {
            Some(item) => self.kind.delete_prompt(&item),
            None => format!("Are you sure you want to delete this {}?", self.kind.noun()),
        };
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }

        self.begin_save();
        let token = self.token();
        match self.api.call(&self.kind.delete_request(id), token.as_deref()).await {
            Ok(resp) => {
                let notice = self.kind.delete_notice(&resp);
                log_info!("[Resource] Deleted {} {}", self.kind.noun(), id);
                self.succeed(notice, |items| items.retain(|item| item.id() != id));
                Ok(true)
            }
            Err(e) => {
                let e = e.in_op_with("resource.delete", format!("{} {}", self.kind.noun(), id));
                self.fail(&e, &format!("Failed to delete {}", self.kind.noun()));
                Err(e)
            }
        }
    }

    /// 到期清除提示；期间又有新提示时保留新的
    pub fn expire_notice(&self, seq: u64) {
        if self.state.with_untracked(|s| s.notice_seq == seq && s.notice.is_some()) {
            self.state.update(|s| s.notice = None);
        }
    }

    pub fn notice_seq(&self) -> u64 {
        self.state.with_untracked(|s| s.notice_seq)
    }

    pub fn clear_field_errors(&self) {
        if self.state.with_untracked(|s| !s.field_errors.is_empty()) {
            self.state.update(|s| s.field_errors = FieldErrors::new());
        }
    }
}

impl<K: Editable, C: HttpClient> ResourceScreen<K, C> {
    /// 本地校验失败时记录字段错误并返回，不发请求
    fn validated(&self, form: &K::Form) -> AdminResult<<K::Form as Validate>::Output> {
        form.validate().map_err(|fields| {
            self.state.update(|s| {
                s.field_errors = fields.clone();
                s.error = Some("Please fix the validation errors below.".to_string());
                s.notice = None;
            });
            AdminError::validation(fields)
        })
    }

    /// 创建成功后把后端返回的完整记录追加到列表末尾
    pub async fn create(&self, form: &K::Form) -> AdminResult<K::Item> {
        let payload = self.validated(form)?;

        self.begin_save();
        let token = self.token();
        match self.api.call(&self.kind.create_request(payload), token.as_deref()).await {
            Ok(item) => {
                let notice = format!("{} created successfully!", capitalize(self.kind.noun()));
                let created = item.clone();
                self.succeed(notice, move |items| items.push(created));
                Ok(item)
            }
            Err(e) => {
                let e = e.in_op_with("resource.create", self.kind.noun());
                self.fail(&e, &format!("Failed to create {}", self.kind.noun()));
                Err(e)
            }
        }
    }

    /// 更新成功后按 id 替换本地记录
    pub async fn update(&self, id: Id, form: &K::Form) -> AdminResult<K::Item> {
        let payload = self.validated(form)?;

        self.begin_save();
        let token = self.token();
        match self.api.call(&self.kind.update_request(id, payload), token.as_deref()).await {
            Ok(item) => {
                let notice = format!("{} updated successfully!", capitalize(self.kind.noun()));
                let updated = item.clone();
                self.succeed(notice, move |items| {
                    match items.iter().position(|existing| existing.id() == updated.id()) {
                        Some(pos) => items[pos] = updated,
                        None => items.push(updated),
                    }
                });
                Ok(item)
            }
            Err(e) => {
                let e = e.in_op_with("resource.update", format!("{} {}", self.kind.noun(), id));
                self.fail(&e, &format!("Failed to update {}", self.kind.noun()));
                Err(e)
            }
        }
    }

    pub fn form_for(&self, id: Id) -> K::Form {
        self.find(id)
            .map(|item| self.kind.form_for(&item))
            .unwrap_or_default()
    }
}

// =========================================================
// 用户管理（超级管理员）
// =========================================================

impl<C: HttpClient> ResourceScreen<Users, C> {
    /// 尚未分配教会的教会管理员
    pub fn unassigned_admins(&self) -> Vec<User> {
        self.state.with_untracked(|s| {
            s.items
                .iter()
                .filter(|u| u.needs_assignment())
                .cloned()
                .collect()
        })
    }

    /// 创建管理员账户，成功后重新拉取用户列表
    pub async fn create_admin(&self, form: &AdminAccountForm) -> AdminResult<()> {
        let req = form.validate().map_err(|fields| {
            let e = AdminError::validation(fields);
            self.fail(&e, "Failed to create admin");
            e
        })?;

        self.begin_save();
        let token = self.token();
        match self.api.call(&req, token.as_deref()).await {
            Ok(_) => {
                self.succeed("Admin created successfully!".to_string(), |_| {});
                self.reload_quietly().await;
                Ok(())
            }
            Err(e) => {
                let e = e.in_op("resource.create_admin");
                let fallback = match e.kind {
                    AdminErrorKind::Network => "Network error while creating admin",
                    _ => "Failed to create admin",
                };
                self.fail(&e, fallback);
                Err(e)
            }
        }
    }

    /// 把管理员分配到教会，成功后重新拉取用户列表
    pub async fn assign_church(&self, form: &AssignmentForm) -> AdminResult<()> {
        let (user_id, church_id) = form.validate().map_err(|fields| {
            let e = AdminError::validation(fields);
            self.fail(&e, "Please select both user and church");
            e
        })?;

        self.begin_save();
        let token = self.token();
        let req = AssignChurchRequest { user_id, church_id };
        match self.api.call(&req, token.as_deref()).await {
            Ok(_) => {
                self.succeed("User assigned to church successfully!".to_string(), |_| {});
                self.reload_quietly().await;
                Ok(())
            }
            Err(e) => {
                let e = e.in_op_with("resource.assign_church", format!("user {user_id}"));
                let fallback = match e.kind {
                    AdminErrorKind::Network => "Network error while assigning user",
                    _ => "Failed to assign user to church",
                };
                self.fail(&e, fallback);
                Err(e)
            }
        }
    }

    /// 操作已成功，刷新失败只记录日志，不覆盖成功提示
    async fn reload_quietly(&self) {
        let token = self.token();
        match self.api.call(&self.kind.list_request(), token.as_deref()).await {
            Ok(items) => self.state.update(|s| s.items = items),
            Err(e) => log_error!("[Resource] Refresh after change failed: {}", e),
        }
    }
}

impl<C: HttpClient> ResourceScreen<Churches, C> {
    /// 删除教会，成功后重新拉取用户列表
    ///
    /// 后端会级联删除该教会的管理员分配，用户列表里的分配随之过期。
    pub async fn delete_and_reload_users(
        &self,
        id: Id,
        confirm: &dyn Confirm,
        users: &ResourceScreen<Users, C>,
    ) -> AdminResult<bool> {
        let deleted = self.delete(id, confirm).await?;
        if deleted && users.load().await.is_err() {
            log_warn!("[Resource] Users list is stale after deleting church {}", id);
        }
        Ok(deleted)
    }
}

// =========================================================
// 测试模块
// =========================================================

#[cfg(test)]
mod tests;
