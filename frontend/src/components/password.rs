//! 忘记密码 / 重置密码（公开页面）

use churchhub_shared::forms::PasswordResetForm;
use churchhub_shared::protocol::{
    ForgotPasswordRequest, ResetPasswordRequest, ResetTokenInfo, VerifyResetTokenRequest,
};
use churchhub_shared::forms::is_valid_email;
use churchhub_shared::{FieldErrors, Validate};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::crud::Editor;
use crate::components::widgets::{ErrorAlert, Spinner, TextField};
use crate::web::route::query_param;
use crate::web::router::{Link, current_search};

const RESET_LINK_SENT: &str =
    "If an account with that email exists, a password reset link has been sent.";
const INVALID_RESET_LINK: &str = "Invalid reset link. Please request a new password reset.";

/// 公开页面的卡片外框
#[component]
fn AuthCard(#[prop(into)] title: String, children: Children) -> impl IntoView {
    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">{title}</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <div class="card-body">{children()}</div>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let auth = use_auth();
    let email = RwSignal::new(String::new());
    let error = RwSignal::new(Option::<String>::None);
    let message = RwSignal::new(Option::<String>::None);
    let sending = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let value = email.get_untracked().trim().to_string();
        if !is_valid_email(&value) {
            error.set(Some("Please enter a valid email address".to_string()));
            return;
        }
        error.set(None);
        sending.set(true);
        spawn_local(async move {
            match auth.api().call(&ForgotPasswordRequest { email: value }, None).await {
                Ok(resp) => {
                    message.set(Some(resp.message.unwrap_or_else(|| RESET_LINK_SENT.to_string())));
                }
                Err(e) => {
                    log_warn!("[Password] {}", e);
                    error.set(Some(e.message_or("Failed to send reset email")));
                }
            }
            sending.set(false);
        });
    };

    view! {
        <AuthCard title="Forgot Password">
            <ErrorAlert message=error />
            {move || match message.get() {
                Some(text) => view! {
                    <div role="alert" class="alert alert-success text-sm">{text}</div>
                    <Link to="/login" class="btn btn-primary mt-4">"Back to Sign In"</Link>
                }.into_any(),
                None => view! {
                    <form on:submit=on_submit class="space-y-4">
                        <p class="text-sm text-base-content/70">
                            "Enter your account email and we will send you a reset link."
                        </p>
                        <input
                            type="email"
                            placeholder="admin@church.org"
                            class="input input-bordered w-full"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                        <button class="btn btn-primary w-full" disabled=move || sending.get()>
                            {move || if sending.get() { "Sending..." } else { "Send Reset Link" }}
                        </button>
                        <Link to="/login" class="link link-hover text-sm">"Back to Sign In"</Link>
                    </form>
                }.into_any(),
            }}
        </AuthCard>
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ResetStage {
    Checking,
    Invalid(String),
    Ready(ResetTokenInfo),
    Done(String),
}

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let auth = use_auth();
    let token = query_param(&current_search(), "token");
    let stage = RwSignal::new(ResetStage::Checking);
    let editor = Editor::<PasswordResetForm>::new();
    let errors = RwSignal::new(FieldErrors::new());
    let error = RwSignal::new(Option::<String>::None);
    let saving = RwSignal::new(false);

    match token.clone() {
        None => stage.set(ResetStage::Invalid(INVALID_RESET_LINK.to_string())),
        Some(token) => spawn_local(async move {
            match auth.api().call(&VerifyResetTokenRequest { token }, None).await {
                Ok(info) => stage.set(ResetStage::Ready(info)),
                Err(e) => {
                    log_warn!("[Password] Reset token rejected: {}", e);
                    stage.set(ResetStage::Invalid(e.message_or(INVALID_RESET_LINK)));
                }
            }
        }),
    }

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(token) = token.clone() else {
            return;
        };
        let new_password = match editor.draft.get_untracked().validate() {
            Ok(password) => password,
            Err(fields) => {
                errors.set(fields);
                return;
            }
        };
        errors.set(FieldErrors::new());
        error.set(None);
        saving.set(true);
        spawn_local(async move {
            let req = ResetPasswordRequest { token, new_password };
            match auth.api().call(&req, None).await {
                Ok(resp) => stage.set(ResetStage::Done(
                    resp.message
                        .unwrap_or_else(|| "Password has been reset successfully.".to_string()),
                )),
                Err(e) => {
                    log_warn!("[Password] {}", e);
                    error.set(Some(e.message_or("Failed to reset password")));
                }
            }
            saving.set(false);
        });
    };

    let (new_password, set_new_password) = editor.bind(|f| f.new_password.clone(), |f, v| f.new_password = v);
    let (confirm, set_confirm) = editor.bind(|f| f.confirm_password.clone(), |f, v| f.confirm_password = v);

    view! {
        <AuthCard title="Reset Password">
            {move || match stage.get() {
                ResetStage::Checking => view! { <Spinner label="Checking reset link..." /> }.into_any(),
                ResetStage::Invalid(text) => view! {
                    <div role="alert" class="alert alert-error text-sm">{text}</div>
                    <Link to="/forgot-password" class="btn btn-primary mt-4">"Request a new link"</Link>
                }.into_any(),
                ResetStage::Done(text) => view! {
                    <div role="alert" class="alert alert-success text-sm">{text}</div>
                    <Link to="/login" class="btn btn-primary mt-4">"Sign In"</Link>
                }.into_any(),
                ResetStage::Ready(info) => {
                    let on_submit = on_submit.clone();
                    view! {
                        <form on:submit=on_submit class="space-y-2">
                            <p class="text-sm text-base-content/70">
                                {format!("Choose a new password for {}", if info.email.is_empty() { info.name } else { info.email })}
                            </p>
                            <ErrorAlert message=error />
                            <TextField label="New password" name="new_password" input_type="password" value=new_password on_input=set_new_password errors=errors required=true />
                            <TextField label="Confirm password" name="confirm_password" input_type="password" value=confirm on_input=set_confirm errors=errors required=true />
                            <button class="btn btn-primary w-full mt-4" disabled=move || saving.get()>
                                {move || if saving.get() { "Resetting..." } else { "Reset Password" }}
                            </button>
                        </form>
                    }.into_any()
                }
            }}
        </AuthCard>
    }
}
