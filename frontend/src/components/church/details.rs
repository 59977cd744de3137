//! 教会资料：读取 `GET /churches/{id}`，保存 `PUT /churches/{id}`

use churchhub_shared::forms::ChurchForm;
use churchhub_shared::protocol::{GetChurchRequest, UpdateChurchRequest};
use churchhub_shared::{Church, FieldErrors, Id, Validate};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::bridge::Flash;
use crate::components::crud::Editor;
use crate::components::icons::Pencil;
use crate::components::image_upload::ImageUpload;
use crate::components::widgets::{ErrorAlert, Spinner, SuccessToast, TextArea, TextField};
use crate::error::AdminErrorKind;

#[component]
pub fn ChurchDetailsSection(church_id: Id) -> impl IntoView {
    let auth = use_auth();
    let flash = Flash::new(auth.config().notice_ttl_ms);

    let church = RwSignal::new(Option::<Church>::None);
    let loading = RwSignal::new(true);
    let saving = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);
    let errors = RwSignal::new(FieldErrors::new());
    let editor = Editor::<ChurchForm>::new();

    spawn_local(async move {
        let api = auth.api();
        match api.call(&GetChurchRequest { church_id }, auth.token().as_deref()).await {
            Ok(c) => church.set(Some(c)),
            Err(e) => {
                log_warn!("[Church] {}", e);
                error.set(Some(e.message_or("Failed to load church details")));
            }
        }
        loading.set(false);
    });

    let open_editor = move |_| {
        if let Some(c) = church.get_untracked() {
            errors.set(FieldErrors::new());
            editor.open_with(Some(c.id), ChurchForm::from(&c.profile));
        }
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let profile = match editor.draft.get_untracked().validate() {
            Ok(profile) => profile,
            Err(fields) => {
                errors.set(fields);
                error.set(Some("Please fix the validation errors below.".to_string()));
                return;
            }
        };
        saving.set(true);
        error.set(None);
        spawn_local(async move {
            let api = auth.api();
            let req = UpdateChurchRequest { church_id, profile };
            match api.call(&req, auth.token().as_deref()).await {
                Ok(updated) => {
                    church.set(Some(updated));
                    errors.set(FieldErrors::new());
                    editor.close();
                    flash.show("Church details updated successfully!");
                }
                Err(e) => {
                    log_warn!("[Church] {}", e);
                    if e.kind == AdminErrorKind::BackendValidation {
                        errors.set(e.field_errors.clone());
                    }
                    error.set(Some(e.message_or("Failed to update church details")));
                }
            }
            saving.set(false);
        });
    };

    let bind = |get: fn(&ChurchForm) -> String, set: fn(&mut ChurchForm, String)| editor.bind(get, set);
    let (name, set_name) = bind(|f| f.name.clone(), |f, v| f.name = v);
    let (senior_pastor, set_senior_pastor) = bind(|f| f.senior_pastor.clone(), |f, v| f.senior_pastor = v);
    let (senior_avatar, set_senior_avatar) = bind(|f| f.senior_pastor_avatar.clone(), |f, v| f.senior_pastor_avatar = v);
    let (pastor, set_pastor) = bind(|f| f.pastor.clone(), |f, v| f.pastor = v);
    let (pastor_avatar, set_pastor_avatar) = bind(|f| f.pastor_avatar.clone(), |f, v| f.pastor_avatar = v);
    let (assistant, set_assistant) = bind(|f| f.assistant_pastor.clone(), |f, v| f.assistant_pastor = v);
    let (assistant_avatar, set_assistant_avatar) = bind(|f| f.assistant_pastor_avatar.clone(), |f, v| f.assistant_pastor_avatar = v);
    let (address, set_address) = bind(|f| f.address.clone(), |f, v| f.address = v);
    let (city, set_city) = bind(|f| f.city.clone(), |f, v| f.city = v);
    let (state, set_state) = bind(|f| f.state.clone(), |f, v| f.state = v);
    let (zip, set_zip) = bind(|f| f.zip.clone(), |f, v| f.zip = v);
    let (email, set_email) = bind(|f| f.contact_email.clone(), |f, v| f.contact_email = v);
    let (phone, set_phone) = bind(|f| f.contact_phone.clone(), |f, v| f.contact_phone = v);
    let (website, set_website) = bind(|f| f.website.clone(), |f, v| f.website = v);
    let (description, set_description) = bind(|f| f.description.clone(), |f, v| f.description = v);
    let (logo, set_logo) = bind(|f| f.logo_url.clone(), |f, v| f.logo_url = v);
    let (banner, set_banner) = bind(|f| f.banner_url.clone(), |f, v| f.banner_url = v);

    view! {
        <div class="card bg-base-100 shadow-xl">
            <SuccessToast message=flash.message() />
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h3 class="card-title">"Church Details"</h3>
                    <Show when=move || !editor.open.get() && church.with(Option::is_some)>
                        <button class="btn btn-outline btn-sm gap-2" on:click=open_editor>
                            <Pencil attr:class="h-4 w-4" /> "Edit"
                        </button>
                    </Show>
                </div>
                <ErrorAlert message=error />
                <Show when=move || loading.get()>
                    <Spinner label="Loading church details..." />
                </Show>

                <Show when=move || editor.open.get()>
                    <form class="space-y-2" on:submit=on_submit>
                        <div class="grid md:grid-cols-2 gap-4">
                            <TextField label="Church name" name="name" value=name on_input=set_name errors=errors required=true />
                            <TextField label="Senior pastor" name="senior_pastor" value=senior_pastor on_input=set_senior_pastor errors=errors required=true />
                            <TextField label="Pastor" name="pastor" value=pastor on_input=set_pastor errors=errors />
                            <TextField label="Assistant pastor" name="assistant_pastor" value=assistant on_input=set_assistant errors=errors />
                            <TextField label="Address" name="address" value=address on_input=set_address errors=errors />
                            <TextField label="City" name="city" value=city on_input=set_city errors=errors />
                            <TextField label="State" name="state" value=state on_input=set_state errors=errors />
                            <TextField label="ZIP" name="zip" value=zip on_input=set_zip errors=errors />
                            <TextField label="Contact email" name="contact_email" input_type="email" value=email on_input=set_email errors=errors />
                            <TextField label="Contact phone" name="contact_phone" value=phone on_input=set_phone errors=errors />
                            <TextField label="Website" name="website" value=website on_input=set_website errors=errors />
                        </div>
                        <TextArea label="Description" name="description" value=description on_input=set_description errors=errors />
                        <div class="grid md:grid-cols-2 gap-4">
                            <ImageUpload label="Logo" value=logo on_change=set_logo />
                            <ImageUpload label="Banner" value=banner on_change=set_banner />
                            <ImageUpload label="Senior pastor photo" value=senior_avatar on_change=set_senior_avatar />
                            <ImageUpload label="Pastor photo" value=pastor_avatar on_change=set_pastor_avatar />
                            <ImageUpload label="Assistant pastor photo" value=assistant_avatar on_change=set_assistant_avatar />
                        </div>
                        <div class="flex justify-end gap-2 mt-4">
                            <button type="button" class="btn btn-ghost" on:click=move |_| editor.close()>"Cancel"</button>
                            <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                                {move || if saving.get() { "Saving..." } else { "Save" }}
                            </button>
                        </div>
                    </form>
                </Show>

                <Show when=move || !editor.open.get()>
                    {move || church.get().map(|c| view! { <ChurchSummary church=c /> })}
                </Show>
            </div>
        </div>
    }
}

#[component]
fn ChurchSummary(church: Church) -> impl IntoView {
    let address = church.address_line();
    let p = church.profile;
    view! {
        <div class="space-y-4">
            {p.banner_url.clone().map(|url| view! {
                <img src=url alt="banner" class="w-full h-40 object-cover rounded-box" />
            })}
            <div class="flex items-center gap-4">
                {p.logo_url.clone().map(|url| view! {
                    <div class="avatar"><div class="w-16 rounded-full"><img src=url alt="logo" /></div></div>
                })}
                <div>
                    <h4 class="text-xl font-bold">{p.name.clone()}</h4>
                    <p class="text-sm text-base-content/70">{address}</p>
                </div>
            </div>
            <div class="grid md:grid-cols-3 gap-2 text-sm">
                <div><span class="font-semibold">"Senior pastor: "</span>{p.senior_pastor.clone()}</div>
                <div><span class="font-semibold">"Pastor: "</span>{p.pastor.clone().unwrap_or_default()}</div>
                <div><span class="font-semibold">"Assistant: "</span>{p.assistant_pastor.clone().unwrap_or_default()}</div>
                <div><span class="font-semibold">"Email: "</span>{p.contact_email.clone().unwrap_or_default()}</div>
                <div><span class="font-semibold">"Phone: "</span>{p.contact_phone.clone().unwrap_or_default()}</div>
                <div><span class="font-semibold">"Website: "</span>{p.website.clone().unwrap_or_default()}</div>
            </div>
            {p.description.clone().map(|d| view! { <p class="text-base-content/80">{d}</p> })}
        </div>
    }
}
