//! `/profile`：个人资料、修改密码、注销账户

use churchhub_shared::forms::{PasswordChangeForm, ProfileForm};
use churchhub_shared::protocol::{ChangePasswordRequest, DeleteUserRequest, UpdateProfileRequest};
use churchhub_shared::{FieldErrors, Validate};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::bridge::Flash;
use crate::components::crud::Editor;
use crate::components::dashboard::AppShell;
use crate::components::widgets::{ErrorAlert, SuccessToast, TextField};
use crate::error::AdminErrorKind;
use crate::resource::{BrowserConfirm, Confirm};

const DELETE_ACCOUNT_PROMPT: &str =
    "Are you sure you want to delete your account? This action cannot be undone.";

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let flash = Flash::new(auth.config().notice_ttl_ms);

    view! {
        <AppShell>
            <SuccessToast message=flash.message() />
            <div class="grid md:grid-cols-2 gap-8">
                <ProfileCard on_saved=Callback::new(move |_| flash.show("Profile updated successfully!")) />
                <PasswordCard on_saved=Callback::new(move |_| flash.show("Password changed successfully!")) />
            </div>
            <DangerZone />
        </AppShell>
    }
}

#[component]
fn ProfileCard(on_saved: Callback<()>) -> impl IntoView {
    let auth = use_auth();
    let editor = Editor::<ProfileForm>::new();
    let errors = RwSignal::new(FieldErrors::new());
    let error = RwSignal::new(Option::<String>::None);
    let saving = RwSignal::new(false);

    // 当前用户变化（如刷新后）时同步表单初值
    let user = auth.user_signal();
    Effect::new(move |_| {
        if let Some(user) = user.get() {
            editor.draft.set(ProfileForm {
                name: user.display_name,
                email: user.email,
            });
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(user_id) = auth.current_user().map(|u| u.id) else {
            return;
        };
        let profile = match editor.draft.get_untracked().validate() {
            Ok(profile) => profile,
            Err(fields) => {
                errors.set(fields);
                return;
            }
        };
        errors.set(FieldErrors::new());
        error.set(None);
        saving.set(true);
        spawn_local(async move {
            let req = UpdateProfileRequest {
                user_id,
                name: profile.name,
                email: profile.email,
            };
            match auth.api().call(&req, auth.token().as_deref()).await {
                Ok(_) => {
                    auth.refresh_user().await;
                    on_saved.run(());
                }
                Err(e) => {
                    log_warn!("[Profile] {}", e);
                    if e.kind == AdminErrorKind::BackendValidation {
                        errors.set(e.field_errors.clone());
                    }
                    error.set(Some(e.message_or("Failed to update profile")));
                }
            }
            saving.set(false);
        });
    };

    let (name, set_name) = editor.bind(|f| f.name.clone(), |f, v| f.name = v);
    let (email, set_email) = editor.bind(|f| f.email.clone(), |f, v| f.email = v);

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body" on:submit=on_submit>
                <h3 class="card-title">"Profile"</h3>
                <ErrorAlert message=error />
                <TextField label="Name" name="name" value=name on_input=set_name errors=errors required=true />
                <TextField label="Email" name="email" input_type="email" value=email on_input=set_email errors=errors required=true />
                <div class="card-actions justify-end">
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                        {move || if saving.get() { "Saving..." } else { "Update Profile" }}
                    </button>
                </div>
            </form>
        </div>
    }
}

#[component]
fn PasswordCard(on_saved: Callback<()>) -> impl IntoView {
    let auth = use_auth();
    let editor = Editor::<PasswordChangeForm>::new();
    let errors = RwSignal::new(FieldErrors::new());
    let error = RwSignal::new(Option::<String>::None);
    let saving = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (current_password, new_password) = match editor.draft.get_untracked().validate() {
            Ok(pair) => pair,
            Err(fields) => {
                errors.set(fields);
                return;
            }
        };
        errors.set(FieldErrors::new());
        error.set(None);
        saving.set(true);
        spawn_local(async move {
            let req = ChangePasswordRequest {
                current_password,
                new_password,
            };
            match auth.api().call(&req, auth.token().as_deref()).await {
                Ok(_) => {
                    editor.close();
                    on_saved.run(());
                }
                Err(e) => {
                    log_warn!("[Profile] {}", e);
                    error.set(Some(e.message_or("Failed to change password")));
                }
            }
            saving.set(false);
        });
    };

    let (current, set_current) = editor.bind(|f| f.current_password.clone(), |f, v| f.current_password = v);
    let (new_password, set_new_password) = editor.bind(|f| f.new_password.clone(), |f, v| f.new_password = v);
    let (confirm, set_confirm) = editor.bind(|f| f.confirm_password.clone(), |f, v| f.confirm_password = v);

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body" on:submit=on_submit>
                <h3 class="card-title">"Change Password"</h3>
                <ErrorAlert message=error />
                <TextField label="Current password" name="current_password" input_type="password" value=current on_input=set_current errors=errors required=true />
                <TextField label="New password" name="new_password" input_type="password" value=new_password on_input=set_new_password errors=errors required=true />
                <TextField label="Confirm new password" name="confirm_password" input_type="password" value=confirm on_input=set_confirm errors=errors required=true />
                <div class="card-actions justify-end">
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                        {move || if saving.get() { "Changing..." } else { "Change Password" }}
                    </button>
                </div>
            </form>
        </div>
    }
}

#[component]
fn DangerZone() -> impl IntoView {
    let auth = use_auth();
    let error = RwSignal::new(Option::<String>::None);
    let deleting = RwSignal::new(false);

    let on_delete = move |_| {
        let Some(user_id) = auth.current_user().map(|u| u.id) else {
            return;
        };
        if !BrowserConfirm.confirm(DELETE_ACCOUNT_PROMPT) {
            return;
        }
        deleting.set(true);
        spawn_local(async move {
            match auth.api().call(&DeleteUserRequest { user_id }, auth.token().as_deref()).await {
                // 登出后路由守卫会离开受保护页面
                Ok(_) => auth.logout(),
                Err(e) => {
                    log_error!("[Profile] Account deletion failed: {}", e);
                    error.set(Some(e.message_or("Failed to delete account")));
                    deleting.set(false);
                }
            }
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl border border-error/30">
            <div class="card-body">
                <h3 class="card-title text-error">"Danger Zone"</h3>
                <p class="text-sm text-base-content/70">"Deleting your account removes your access to ChurchHub."</p>
                <ErrorAlert message=error />
                <div class="card-actions justify-end">
                    <button class="btn btn-error btn-outline" on:click=on_delete disabled=move || deleting.get()>
                        "Delete Account"
                    </button>
                </div>
            </div>
        </div>
    }
}
