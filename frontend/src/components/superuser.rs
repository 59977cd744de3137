//! 超级管理员面板：用户、教会、分配

use churchhub_shared::forms::{AdminAccountForm, AssignmentForm};
use churchhub_shared::{Church, Id, Role, User};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::crud::Screen;
use crate::components::icons::{Plus, RefreshCw, Trash2};
use crate::components::widgets::{ErrorAlert, Spinner, SuccessToast};
use crate::resource::{Churches, Users};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Users,
    Churches,
    Assignments,
}

#[component]
pub fn SuperuserDashboard() -> impl IntoView {
    let users = Screen::new(Users);
    let churches = Screen::new(Churches);
    let tab = RwSignal::new(Tab::Users);

    let notice = Signal::derive(move || users.notice().get().or_else(|| churches.notice().get()));
    let error = Signal::derive(move || users.error().get().or_else(|| churches.error().get()));
    let refreshing = move || users.loading().get() || churches.loading().get();

    let tab_button = move |target: Tab, label: &'static str| {
        view! {
            <a
                role="tab"
                class=move || if tab.get() == target { "tab tab-active" } else { "tab" }
                on:click=move |_| tab.set(target)
            >
                {label}
            </a>
        }
    };

    view! {
        <SuccessToast message=notice />
        <div class="flex items-center justify-between">
            <div>
                <h2 class="text-2xl font-bold">"Superuser Dashboard"</h2>
                <p class="text-base-content/70">"Manage admins, churches and assignments."</p>
            </div>
            <button
                class="btn btn-ghost btn-circle"
                disabled=refreshing
                on:click=move |_| {
                    users.load();
                    churches.load();
                }
            >
                <RefreshCw attr:class=move || if refreshing() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
            </button>
        </div>
        <ErrorAlert message=error />

        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-title">"Users"</div>
                <div class="stat-value text-primary">{move || users.state.with(|s| s.items.len())}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Churches"</div>
                <div class="stat-value text-secondary">{move || churches.state.with(|s| s.items.len())}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Unassigned admins"</div>
                <div class="stat-value text-warning">{move || users.state.with(|s| s.items.iter().filter(|u| u.needs_assignment()).count())}</div>
            </div>
        </div>

        <CreateAdminCard users=users />

        <div role="tablist" class="tabs tabs-boxed bg-base-100">
            {tab_button(Tab::Users, "All Users")}
            {tab_button(Tab::Churches, "Churches")}
            {tab_button(Tab::Assignments, "Assignments")}
        </div>

        {move || match tab.get() {
            Tab::Users => view! { <UsersTable users=users /> }.into_any(),
            Tab::Churches => view! { <ChurchesTable churches=churches users=users /> }.into_any(),
            Tab::Assignments => view! { <AssignmentCard users=users churches=churches /> }.into_any(),
        }}
    }
}

#[component]
fn CreateAdminCard(users: Screen<Users>) -> impl IntoView {
    let open = RwSignal::new(false);
    let form = RwSignal::new(AdminAccountForm::default());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let draft = form.get_untracked();
        let screen = users.handle();
        spawn_local(async move {
            if screen.create_admin(&draft).await.is_ok() {
                form.set(AdminAccountForm::default());
                open.set(false);
            }
        });
    };

    let input = move |id: &'static str, label: &'static str, kind: &'static str, get: fn(&AdminAccountForm) -> String, set: fn(&mut AdminAccountForm, String)| {
        view! {
            <div class="form-control w-full">
                <label for=id class="label"><span class="label-text">{label}</span></label>
                <input
                    id=id
                    type=kind
                    class="input input-bordered w-full"
                    prop:value=move || form.with(get)
                    on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                />
            </div>
        }
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h3 class="card-title">"Admin accounts"</h3>
                    <button class="btn btn-primary btn-sm gap-2" on:click=move |_| open.update(|o| *o = !*o)>
                        <Plus attr:class="h-4 w-4" /> "Create Admin"
                    </button>
                </div>
                <Show when=move || open.get()>
                    <form class="grid md:grid-cols-2 gap-4" on:submit=on_submit>
                        {input("admin_email", "Email", "email", |f| f.email.clone(), |f, v| f.email = v)}
                        {input("admin_name", "Name", "text", |f| f.name.clone(), |f, v| f.name = v)}
                        {input("admin_password", "Password", "password", |f| f.password.clone(), |f, v| f.password = v)}
                        <div class="form-control w-full">
                            <label for="admin_role" class="label"><span class="label-text">"Role"</span></label>
                            <select
                                id="admin_role"
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    let role = if event_target_value(&ev) == Role::Superuser.as_str() {
                                        Role::Superuser
                                    } else {
                                        Role::ChurchAdmin
                                    };
                                    form.update(|f| f.role = role);
                                }
                            >
                                <option value=Role::ChurchAdmin.as_str() selected=move || form.with(|f| f.role == Role::ChurchAdmin)>"Church Admin"</option>
                                <option value=Role::Superuser.as_str() selected=move || form.with(|f| f.role == Role::Superuser)>"Superuser"</option>
                            </select>
                        </div>
                        <div class="md:col-span-2 flex justify-end gap-2">
                            <button type="button" class="btn btn-ghost" on:click=move |_| open.set(false)>"Cancel"</button>
                            <button type="submit" class="btn btn-primary" disabled=move || users.saving().get()>"Create"</button>
                        </div>
                    </form>
                </Show>
            </div>
        </div>
    }
}

#[component]
fn UsersTable(users: Screen<Users>) -> impl IntoView {
    let items = users.items();
    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <Show when=move || users.loading().get() && items.with(Vec::is_empty)>
                    <Spinner label="Loading users..." />
                </Show>
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Name"</th>
                                <th>"Email"</th>
                                <th>"Role"</th>
                                <th>"Church Assignments"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || items.get().into_iter().map(|user| view! { <UserRow user=user users=users /> }).collect_view()}
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}

#[component]
fn UserRow(user: User, users: Screen<Users>) -> impl IntoView {
    let id: Id = user.id;
    let role_badge = if user.is_superuser() { "badge badge-secondary" } else { "badge badge-primary badge-outline" };
    let unassigned = user.needs_assignment();
    view! {
        <tr>
            <td>{id}</td>
            <td>{user.display_name.clone()}</td>
            <td class="font-mono text-sm">{user.email.clone()}</td>
            <td><span class=role_badge>{user.role.as_str()}</span></td>
            <td>
                <div class="flex flex-wrap gap-1">
                    {user.church_assignments.iter().map(|a| view! {
                        <span class="badge badge-ghost">{a.church_name.clone()}</span>
                    }).collect_view()}
                    {unassigned.then(|| view! { <span class="badge badge-warning">"Unassigned"</span> })}
                </div>
            </td>
            <td>
                <button class="btn btn-ghost btn-xs text-error" on:click=move |_| users.delete(id)>
                    <Trash2 attr:class="h-4 w-4" />
                </button>
            </td>
        </tr>
    }
}

#[component]
fn ChurchesTable(churches: Screen<Churches>, users: Screen<Users>) -> impl IntoView {
    let items = churches.items();
    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <Show when=move || churches.loading().get() && items.with(Vec::is_empty)>
                    <Spinner label="Loading churches..." />
                </Show>
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Church Name"</th>
                                <th>"Senior Pastor"</th>
                                <th>"Contact Email"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || items.get().into_iter().map(|church| view! { <ChurchRow church=church churches=churches users=users /> }).collect_view()}
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}

#[component]
fn ChurchRow(church: Church, churches: Screen<Churches>, users: Screen<Users>) -> impl IntoView {
    let id = church.id;
    view! {
        <tr>
            <td>{id}</td>
            <td class="font-semibold">{church.profile.name.clone()}</td>
            <td>{church.profile.senior_pastor.clone()}</td>
            <td class="font-mono text-sm">{church.profile.contact_email.clone().unwrap_or_default()}</td>
            <td>
                <button class="btn btn-ghost btn-xs text-error" on:click=move |_| churches.delete_with_users(id, users)>
                    <Trash2 attr:class="h-4 w-4" />
                </button>
            </td>
        </tr>
    }
}

#[component]
fn AssignmentCard(users: Screen<Users>, churches: Screen<Churches>) -> impl IntoView {
    let form = RwSignal::new(AssignmentForm::default());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let draft = form.get_untracked();
        let screen = users.handle();
        spawn_local(async move {
            if screen.assign_church(&draft).await.is_ok() {
                form.set(AssignmentForm::default());
            }
        });
    };

    let candidates = Signal::derive(move || {
        users.state.with(|s| {
            s.items
                .iter()
                .filter(|u| u.needs_assignment())
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body" on:submit=on_submit>
                <h3 class="card-title">"Assign admin to church"</h3>
                <div class="grid md:grid-cols-2 gap-4">
                    <select
                        class="select select-bordered w-full"
                        on:change=move |ev| form.update(|f| f.user_id = event_target_value(&ev).parse().ok())
                    >
                        <option value="" selected=move || form.with(|f| f.user_id.is_none())>"Select admin"</option>
                        {move || candidates.get().into_iter().map(|u| {
                            let id = u.id;
                            view! {
                                <option value=id.to_string() selected=move || form.with(|f| f.user_id == Some(id))>
                                    {format!("{} ({})", u.display_name, u.email)}
                                </option>
                            }
                        }).collect_view()}
                    </select>
                    <select
                        class="select select-bordered w-full"
                        on:change=move |ev| form.update(|f| f.church_id = event_target_value(&ev).parse().ok())
                    >
                        <option value="" selected=move || form.with(|f| f.church_id.is_none())>"Select church"</option>
                        {move || churches.items().get().into_iter().map(|c| {
                            let id = c.id;
                            view! {
                                <option value=id.to_string() selected=move || form.with(|f| f.church_id == Some(id))>
                                    {c.profile.name}
                                </option>
                            }
                        }).collect_view()}
                    </select>
                </div>
                <Show when=move || candidates.with(Vec::is_empty)>
                    <p class="text-sm text-base-content/50">"Every church admin already has a church."</p>
                </Show>
                <div class="card-actions justify-end">
                    <button type="submit" class="btn btn-primary" disabled=move || users.saving().get()>"Assign"</button>
                </div>
            </form>
        </div>
    }
}
