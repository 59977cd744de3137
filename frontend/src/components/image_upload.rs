//! 图片字段：选择文件 -> 上传 -> 回填托管 URL

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::bridge::expire_upload_success;
use crate::components::icons::{Trash2, Upload};
use crate::upload::{ImageUploader, UploadPolicy};
use crate::web::http::UploadFile;

#[component]
pub fn ImageUpload(
    #[prop(into)] label: String,
    /// 当前 URL（空串表示未设置）
    #[prop(into)]
    value: Signal<String>,
    /// 上传成功或清除时回调新的 URL
    #[prop(into)]
    on_change: Callback<String>,
) -> impl IntoView {
    let auth = use_auth();
    let uploader = Rc::new(ImageUploader::new(
        auth.api(),
        UploadPolicy::from_config(&auth.config()),
    ));
    expire_upload_success(&uploader);
    let state = ReadSignal::from(uploader.state().read_only());
    let limit = auth.config().max_upload_label();
    let uploader = StoredValue::new_local(uploader);

    let on_file = move |ev: leptos::ev::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        let Some(file) = input.files().and_then(|list| list.get(0)) else {
            return;
        };
        // 允许再次选择同一文件
        input.set_value("");

        let uploader = uploader.get_value();
        let token = auth.token();
        spawn_local(async move {
            if let Ok(url) = uploader
                .upload(token.as_deref(), UploadFile::from_browser(file))
                .await
            {
                on_change.run(url);
            }
        });
    };

    let in_flight = move || state.with(|s| s.in_flight);

    view! {
        <div class="form-control w-full">
            <label class="label">
                <span class="label-text">{label}</span>
                <span class="label-text-alt text-base-content/50">{format!("Max {limit}")}</span>
            </label>
            <div class="flex items-center gap-4">
                {move || {
                    let url = value.get();
                    (!url.is_empty()).then(|| view! {
                        <div class="avatar">
                            <div class="w-16 rounded-lg">
                                <img src=url alt="preview" />
                            </div>
                        </div>
                    })
                }}
                <label class=move || if in_flight() { "btn btn-outline btn-sm btn-disabled" } else { "btn btn-outline btn-sm" }>
                    {move || if in_flight() {
                        view! { <span class="loading loading-spinner loading-xs"></span> "Uploading..." }.into_any()
                    } else {
                        view! { <Upload attr:class="h-4 w-4" /> "Choose image" }.into_any()
                    }}
                    <input type="file" accept="image/*" class="hidden" on:change=on_file disabled=in_flight />
                </label>
                <Show when=move || !value.get().is_empty()>
                    <button type="button" class="btn btn-ghost btn-sm text-error" on:click=move |_| on_change.run(String::new())>
                        <Trash2 attr:class="h-4 w-4" />
                    </button>
                </Show>
            </div>
            {move || state.with(|s| s.last_error.clone()).map(|msg| view! {
                <label class="label"><span class="label-text-alt text-error">{msg}</span></label>
            })}
            {move || state.with(|s| s.last_success.clone()).map(|msg| view! {
                <label class="label"><span class="label-text-alt text-success">{msg}</span></label>
            })}
        </div>
    }
}
