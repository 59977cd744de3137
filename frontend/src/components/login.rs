use churchhub_shared::Validate;
use churchhub_shared::forms::LoginForm;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::icons::Church;
use crate::components::widgets::ErrorAlert;
use crate::web::router::Link;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let session = auth.session();

    let form = RwSignal::new(LoginForm::default());
    let (local_error, set_local_error) = signal(Option::<String>::None);

    // 本地校验错误优先，其次是会话存储记录的登录错误
    let error = Signal::derive(move || {
        local_error
            .get()
            .or_else(|| session.with(|s| s.last_error.clone()))
    });
    let is_submitting = move || session.with(|s| s.is_logging_in());

    let edit = move |f: fn(&mut LoginForm, String)| {
        move |ev: leptos::ev::Event| {
            set_local_error.set(None);
            auth.clear_error();
            form.update(|form| f(form, event_target_value(&ev)));
        }
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (email, password) = match form.get_untracked().validate() {
            Ok(credentials) => credentials,
            Err(errors) => {
                set_local_error.set(errors.iter().next().map(|(_, msg)| msg.to_string()));
                return;
            }
        };
        set_local_error.set(None);

        // 成功后由路由守卫跳转到面板；失败时停留在本页
        spawn_local(async move {
            let _ = auth.login(&email, &password).await;
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <Church attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"ChurchHub Admin"</h1>
                        <p class="text-base-content/70">"Sign in to manage your church"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert message=error />

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="admin@church.org"
                                on:input=edit(|f, v| f.email = v)
                                prop:value=move || form.with(|f| f.email.clone())
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=edit(|f, v| f.password = v)
                                prop:value=move || form.with(|f| f.password.clone())
                                class="input input-bordered"
                            />
                            <label class="label">
                                <Link to="/forgot-password" class="label-text-alt link link-hover">
                                    "Forgot password?"
                                </Link>
                            </label>
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=is_submitting>
                                {move || if is_submitting() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign In".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm text-base-content/70">
                            "New church? "
                            <Link to="/enroll" class="link link-primary">"Learn about enrollment"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
