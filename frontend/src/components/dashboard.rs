use churchhub_shared::{ChurchAssignment, DashboardKind, User};
use leptos::prelude::*;

use crate::auth::use_auth;
use crate::components::church::announcements::AnnouncementsSection;
use crate::components::church::details::ChurchDetailsSection;
use crate::components::church::donations::DonationsSection;
use crate::components::church::events::EventsSection;
use crate::components::crud::Screen;
use crate::components::enroll::{ChurchEnrollmentForm, PendingReview};
use crate::components::icons::*;
use crate::components::superuser::SuperuserDashboard;
use crate::components::widgets::{SuccessToast, full_page_spinner};
use crate::resource::{AnnouncementsOf, DonationsOf, EventsOf};
use crate::web::router::Link;

/// 登录后的页面框架：导航栏 + 内容
#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let name = move || {
        auth.session()
            .with(|s| s.current_user().map(|u| u.display_name.clone()))
            .unwrap_or_default()
    };

    // 登出后路由守卫会把受保护页面重定向到登录页
    let on_logout = move |_| auth.logout();

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <Church attr:class="text-primary h-6 w-6" />
                        <Link to="/dashboard" class="btn btn-ghost text-xl">"ChurchHub Admin"</Link>
                    </div>
                    <div class="flex-none gap-2">
                        <Link to="/profile" class="btn btn-ghost gap-2">
                            <UserIcon attr:class="h-4 w-4" /> {name}
                        </Link>
                        <button on:click=on_logout class="btn btn-outline btn-error gap-2">
                            <LogOut attr:class="h-4 w-4" /> "Log out"
                        </button>
                    </div>
                </div>
                {children()}
            </div>
        </div>
    }
}

/// `/dashboard`：按当前用户分派到对应的面板
#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let session = auth.session();
    let landing = Memo::new(move |_| session.with(|s| s.current_user().map(User::landing)));

    view! {
        <AppShell>
            {move || match landing.get() {
                Some(DashboardKind::Superuser) => view! { <SuperuserDashboard /> }.into_any(),
                Some(DashboardKind::EnrollmentForm) => view! { <ChurchEnrollmentForm /> }.into_any(),
                Some(DashboardKind::PendingReview) => view! { <PendingReview /> }.into_any(),
                Some(DashboardKind::Operational(assignment)) => {
                    view! { <OperationalDashboard assignment=assignment /> }.into_any()
                }
                None => full_page_spinner(),
            }}
        </AppShell>
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Details,
    Events,
    Announcements,
    Donations,
}

/// 教会管理员的日常面板，作用域为其第一个教会分配
#[component]
fn OperationalDashboard(assignment: ChurchAssignment) -> impl IntoView {
    let church_id = assignment.church_id;
    let events = Screen::new(EventsOf { church_id });
    let announcements = Screen::new(AnnouncementsOf { church_id });
    let donations = Screen::new(DonationsOf { church_id });
    let tab = RwSignal::new(Tab::Details);

    let event_count = move || events.state.with(|s| s.items.len());
    let announcement_count = move || announcements.state.with(|s| s.items.len());
    let donation_count = move || donations.state.with(|s| s.items.len());

    let notice = Signal::derive(move || {
        events
            .notice()
            .get()
            .or_else(|| announcements.notice().get())
            .or_else(|| donations.notice().get())
    });

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

        <div>
            <h2 class="text-2xl font-bold">{assignment.church_name.clone()}</h2>
            <p class="text-base-content/70">"Manage your church's presence on ChurchHub."</p>
        </div>

        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-figure text-primary"><CalendarDays attr:class="h-8 w-8" /></div>
                <div class="stat-title">"Events"</div>
                <div class="stat-value text-primary">{event_count}</div>
            </div>
            <div class="stat">
                <div class="stat-figure text-secondary"><Megaphone attr:class="h-8 w-8" /></div>
                <div class="stat-title">"Announcements"</div>
                <div class="stat-value text-secondary">{announcement_count}</div>
            </div>
            <div class="stat">
                <div class="stat-figure text-accent"><HandCoins attr:class="h-8 w-8" /></div>
                <div class="stat-title">"Donation methods"</div>
                <div class="stat-value text-accent">{donation_count}</div>
            </div>
        </div>

        <div role="tablist" class="tabs tabs-boxed bg-base-100">
            {tab_button(Tab::Details, "Church Details")}
            {tab_button(Tab::Events, "Events")}
            {tab_button(Tab::Announcements, "Announcements")}
            {tab_button(Tab::Donations, "Donations")}
        </div>

        {move || match tab.get() {
            Tab::Details => view! { <ChurchDetailsSection church_id=church_id /> }.into_any(),
            Tab::Events => view! { <EventsSection screen=events /> }.into_any(),
            Tab::Announcements => view! { <AnnouncementsSection screen=announcements /> }.into_any(),
            Tab::Donations => view! { <DonationsSection screen=donations /> }.into_any(),
        }}
    }
}
