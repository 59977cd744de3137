//! 页面间共用的小组件：提示条、输入框、加载占位

use churchhub_shared::FieldErrors;
use leptos::prelude::*;

/// 错误提示条；`message` 为 `None` 时不渲染
#[component]
pub fn ErrorAlert(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message.get().map(|text| {
            view! {
                <div role="alert" class="alert alert-error text-sm py-2">
                    <svg xmlns="http://www.w3.org/2000/svg" class="stroke-current shrink-0 h-6 w-6" fill="none" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M10 14l2-2m0 0l2-2m-2 2l-2-2m2 2l2 2m7-2a9 9 0 11-18 0 9 9 0 0118 0z" /></svg>
                    <span>{text}</span>
                </div>
            }
        })
    }
}

/// 成功提示（右上角 toast）
#[component]
pub fn SuccessToast(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message.get().map(|text| {
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class="alert alert-success shadow-lg">
                        <span>{text}</span>
                    </div>
                </div>
            }
        })
    }
}

/// 单行输入框，带标签与字段错误
#[component]
pub fn TextField(
    #[prop(into)] label: String,
    /// 字段名，同时作为 `id` 和字段错误的键
    name: &'static str,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_input: Callback<String>,
    #[prop(into)] errors: Signal<FieldErrors>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional, into)] placeholder: String,
    #[prop(optional)] required: bool,
) -> impl IntoView {
    let error = move || errors.with(|e| e.get(name).map(str::to_string));
    view! {
        <div class="form-control w-full">
            <label for=name class="label">
                <span class="label-text">{label} {required.then_some(" *")}</span>
            </label>
            <input
                id=name
                type=input_type
                placeholder=placeholder
                class=move || if error().is_some() { "input input-bordered input-error w-full" } else { "input input-bordered w-full" }
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            />
            {move || error().map(|msg| view! {
                <label class="label">
                    <span class="label-text-alt text-error">{msg}</span>
                </label>
            })}
        </div>
    }
}

/// 多行输入框
#[component]
pub fn TextArea(
    #[prop(into)] label: String,
    name: &'static str,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_input: Callback<String>,
    #[prop(into)] errors: Signal<FieldErrors>,
    #[prop(optional)] required: bool,
) -> impl IntoView {
    let error = move || errors.with(|e| e.get(name).map(str::to_string));
    view! {
        <div class="form-control w-full">
            <label for=name class="label">
                <span class="label-text">{label} {required.then_some(" *")}</span>
            </label>
            <textarea
                id=name
                rows="3"
                class=move || if error().is_some() { "textarea textarea-bordered textarea-error w-full" } else { "textarea textarea-bordered w-full" }
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            ></textarea>
            {move || error().map(|msg| view! {
                <label class="label">
                    <span class="label-text-alt text-error">{msg}</span>
                </label>
            })}
        </div>
    }
}

#[component]
pub fn Spinner(#[prop(optional, into)] label: String) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-8 text-base-content/50 gap-2">
            <span class="loading loading-spinner loading-md"></span>
            {label}
        </div>
    }
}

/// 会话校验期间受保护页面的占位
pub fn full_page_spinner() -> AnyView {
    view! {
        <div class="flex items-center justify-center min-h-screen">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
    .into_any()
}
