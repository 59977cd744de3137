//! 资源页面的 Leptos 绑定
//!
//! `Screen` 持有一个 `ResourceScreen` 并以只读信号暴露它的状态；
//! `Editor` 是"新建/编辑"表单的开关与草稿。

use std::rc::Rc;

use churchhub_shared::{FieldErrors, Id};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::bridge::expire_notices;
use crate::resource::{
    BrowserConfirm, Churches, Editable, Listing, ResourceList, ResourceScreen, Users,
};
use crate::web::http::FetchClient;

pub type Handle<K> = Rc<ResourceScreen<K, FetchClient>>;

pub struct Screen<K: Listing + 'static> {
    inner: StoredValue<Handle<K>, LocalStorage>,
    pub state: ReadSignal<ResourceList<K::Item>>,
}

impl<K: Listing + 'static> Clone for Screen<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: Listing + 'static> Copy for Screen<K> {}

impl<K> Screen<K>
where
    K: Listing + 'static,
    K::Item: Send + Sync,
{
    /// 创建页面并立即拉取列表
    pub fn new(kind: K) -> Self {
        let auth = use_auth();
        let screen = Rc::new(ResourceScreen::new(kind, auth.api(), auth.bearer()));
        expire_notices(&screen, auth.config().notice_ttl_ms);
        let state = ReadSignal::from(screen.state().read_only());
        let this = Self {
            inner: StoredValue::new_local(screen),
            state,
        };
        this.load();
        this
    }

    pub fn handle(&self) -> Handle<K> {
        self.inner.get_value()
    }

    pub fn load(&self) {
        let screen = self.handle();
        spawn_local(async move {
            let _ = screen.load().await;
        });
    }

    pub fn delete(&self, id: Id) {
        let screen = self.handle();
        spawn_local(async move {
            let _ = screen.delete(id, &BrowserConfirm).await;
        });
    }

    pub fn items(&self) -> Signal<Vec<K::Item>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.items.clone()))
    }

    pub fn loading(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.loading))
    }

    pub fn saving(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.saving))
    }

    pub fn error(&self) -> Signal<Option<String>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.error.clone()))
    }

    pub fn notice(&self) -> Signal<Option<String>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.notice.clone()))
    }

    pub fn field_errors(&self) -> Signal<FieldErrors> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.field_errors.clone()))
    }
}

impl Screen<Churches> {
    /// 删除教会；成功后用户列表一并刷新
    pub fn delete_with_users(&self, id: Id, users: Screen<Users>) {
        let churches = self.handle();
        let users = users.handle();
        spawn_local(async move {
            let _ = churches.delete_and_reload_users(id, &BrowserConfirm, &users).await;
        });
    }
}

impl<K> Screen<K>
where
    K: Editable + 'static,
    K::Item: Send + Sync,
    K::Form: Send + Sync,
{
    /// 提交编辑器草稿：有 id 时更新，否则创建；成功后关闭编辑器
    pub fn save(&self, editor: Editor<K::Form>) {
        let screen = self.handle();
        let form = editor.draft.get_untracked();
        let editing = editor.editing.get_untracked();
        spawn_local(async move {
            let result = match editing {
                Some(id) => screen.update(id, &form).await,
                None => screen.create(&form).await,
            };
            if result.is_ok() {
                editor.close();
            }
        });
    }

    pub fn edit(&self, editor: Editor<K::Form>, id: Id) {
        let handle = self.handle();
        handle.clear_field_errors();
        editor.open_with(Some(id), handle.form_for(id));
    }

    pub fn create_new(&self, editor: Editor<K::Form>) {
        self.handle().clear_field_errors();
        editor.open_with(None, K::Form::default());
    }
}

/// 新建/编辑表单的状态
pub struct Editor<F: Send + Sync + 'static> {
    pub open: RwSignal<bool>,
    /// `None` 表示新建
    pub editing: RwSignal<Option<Id>>,
    pub draft: RwSignal<F>,
}

impl<F: Send + Sync + 'static> Clone for Editor<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: Send + Sync + 'static> Copy for Editor<F> {}

impl<F: Default + Send + Sync + 'static> Editor<F> {
    pub fn new() -> Self {
        Self {
            open: RwSignal::new(false),
            editing: RwSignal::new(None),
            draft: RwSignal::new(F::default()),
        }
    }

    pub fn open_with(&self, editing: Option<Id>, draft: F) {
        self.editing.set(editing);
        self.draft.set(draft);
        self.open.set(true);
    }

    pub fn close(&self) {
        self.open.set(false);
        self.editing.set(None);
        self.draft.set(F::default());
    }

    pub fn title(&self, noun: &str) -> String {
        match self.editing.get() {
            Some(_) => format!("Edit {noun}"),
            None => format!("Add {noun}"),
        }
    }

    /// 把草稿的一个字段绑定成 (值信号, 输入回调)
    pub fn bind(&self, get: fn(&F) -> String, set: fn(&mut F, String)) -> (Signal<String>, Callback<String>) {
        let draft = self.draft;
        (
            Signal::derive(move || draft.with(get)),
            Callback::new(move |value| draft.update(|f| set(f, value))),
        )
    }
}

/// 编辑器底部按钮
#[component]
pub fn EditorActions(
    #[prop(into)] saving: Signal<bool>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="flex justify-end gap-2 mt-4">
            <button type="button" class="btn btn-ghost" on:click=move |_| on_cancel.run(())>
                "Cancel"
            </button>
            <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                {move || if saving.get() {
                    view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                } else {
                    "Save".into_any()
                }}
            </button>
        </div>
    }
}
