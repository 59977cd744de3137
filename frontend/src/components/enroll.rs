//! 教会入驻：公开介绍页、登录后的申请表与等待审核页

use churchhub_shared::forms::EnrollmentForm;
use churchhub_shared::{FieldErrors, Validate};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::crud::Editor;
use crate::components::icons::Church;
use crate::components::widgets::{ErrorAlert, TextArea, TextField};
use crate::error::AdminErrorKind;
use crate::web::router::Link;

/// `/enroll`
#[component]
pub fn EnrollInfoPage() -> impl IntoView {
    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content text-center max-w-2xl">
                <div class="space-y-4">
                    <h1 class="text-4xl font-bold">"Bring your church to ChurchHub"</h1>
                    <p class="text-base-content/70">
                        "Ask the platform team for an admin account, sign in, and submit your church's details. "
                        "Once a superuser approves your enrollment you can publish events, announcements and donation options."
                    </p>
                    <ol class="steps steps-vertical md:steps-horizontal w-full">
                        <li class="step step-primary">"Get an account"</li>
                        <li class="step step-primary">"Submit your church"</li>
                        <li class="step">"Approval"</li>
                        <li class="step">"Go live"</li>
                    </ol>
                    <div class="flex justify-center gap-2">
                        <Link to="/login" class="btn btn-primary">"Sign In"</Link>
                        <Link to="/" class="btn btn-ghost">"Back"</Link>
                    </div>
                </div>
            </div>
        </div>
    }
}

/// 尚未提交申请的教会管理员看到的表单
#[component]
pub fn ChurchEnrollmentForm() -> impl IntoView {
    let auth = use_auth();
    let editor = Editor::<EnrollmentForm>::new();
    let errors = RwSignal::new(FieldErrors::new());
    let error = RwSignal::new(Option::<String>::None);
    let submitting = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let req = match editor.draft.get_untracked().validate() {
            Ok(req) => req,
            Err(fields) => {
                errors.set(fields);
                return;
            }
        };
        errors.set(FieldErrors::new());
        error.set(None);
        submitting.set(true);
        spawn_local(async move {
            let api = auth.api();
            match api.call(&req, auth.token().as_deref()).await {
                // 刷新用户后 enrollment_status 变为 pending，面板随之切换
                Ok(_) => auth.refresh_user().await,
                Err(e) => {
                    log_warn!("[Enroll] {}", e);
                    if e.kind == AdminErrorKind::BackendValidation {
                        errors.set(e.field_errors.clone());
                    }
                    error.set(Some(e.message_or("Failed to submit church enrollment")));
                }
            }
            submitting.set(false);
        });
    };

    let (church_name, set_church_name) = editor.bind(|f| f.church_name.clone(), |f, v| f.church_name = v);
    let (pastor_name, set_pastor_name) = editor.bind(|f| f.pastor_name.clone(), |f, v| f.pastor_name = v);
    let (address, set_address) = editor.bind(|f| f.address.clone(), |f, v| f.address = v);
    let (city, set_city) = editor.bind(|f| f.city.clone(), |f, v| f.city = v);
    let (state, set_state) = editor.bind(|f| f.state.clone(), |f, v| f.state = v);
    let (zip, set_zip) = editor.bind(|f| f.zip.clone(), |f, v| f.zip = v);
    let (email, set_email) = editor.bind(|f| f.contact_email.clone(), |f, v| f.contact_email = v);
    let (phone, set_phone) = editor.bind(|f| f.contact_phone.clone(), |f, v| f.contact_phone = v);
    let (website, set_website) = editor.bind(|f| f.website.clone(), |f, v| f.website = v);
    let (description, set_description) = editor.bind(|f| f.description.clone(), |f, v| f.description = v);

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body" on:submit=on_submit>
                <h3 class="card-title">"Enroll your church"</h3>
                <p class="text-base-content/70 text-sm">
                    "Tell us about your church. A superuser will review the request."
                </p>
                <ErrorAlert message=error />
                <div class="grid md:grid-cols-2 gap-4">
                    <TextField label="Church name" name="church_name" value=church_name on_input=set_church_name errors=errors required=true />
                    <TextField label="Pastor name" name="pastor_name" value=pastor_name on_input=set_pastor_name errors=errors required=true />
                    <TextField label="Address" name="address" value=address on_input=set_address errors=errors />
                    <TextField label="City" name="city" value=city on_input=set_city errors=errors />
                    <TextField label="State" name="state" value=state on_input=set_state errors=errors />
                    <TextField label="ZIP" name="zip" value=zip on_input=set_zip errors=errors />
                    <TextField label="Contact email" name="contact_email" input_type="email" value=email on_input=set_email errors=errors />
                    <TextField label="Contact phone" name="contact_phone" value=phone on_input=set_phone errors=errors />
                    <TextField label="Website" name="website" value=website on_input=set_website errors=errors />
                </div>
                <TextArea label="Description" name="description" value=description on_input=set_description errors=errors />
                <div class="card-actions justify-end">
                    <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Submitting..." } else { "Submit for review" }}
                    </button>
                </div>
            </form>
        </div>
    }
}

#[component]
pub fn PendingReview() -> impl IntoView {
    let auth = use_auth();
    let checking = RwSignal::new(false);
    let on_check = move |_| {
        checking.set(true);
        spawn_local(async move {
            auth.refresh_user().await;
            checking.set(false);
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body items-center text-center">
                <Church attr:class="h-12 w-12 text-primary" />
                <h3 class="card-title">"Enrollment pending review"</h3>
                <p class="text-base-content/70">
                    "Your church enrollment has been submitted. You will get access to the dashboard once a superuser assigns your church."
                </p>
                <button class="btn btn-outline btn-sm" on:click=on_check disabled=move || checking.get()>
                    {move || if checking.get() { "Checking..." } else { "Check again" }}
                </button>
            </div>
        </div>
    }
}
