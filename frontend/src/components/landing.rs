use leptos::prelude::*;

use crate::components::icons::{CalendarDays, Church, HandCoins, Megaphone};
use crate::web::router::Link;

/// `/`
#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200">
            <div class="navbar bg-base-100 shadow">
                <div class="flex-1 gap-2 px-4">
                    <Church attr:class="text-primary h-6 w-6" />
                    <span class="text-xl font-bold">"ChurchHub"</span>
                </div>
                <div class="flex-none px-4">
                    <Link to="/login" class="btn btn-primary btn-sm">"Sign In"</Link>
                </div>
            </div>
            <div class="hero py-20">
                <div class="hero-content text-center max-w-3xl">
                    <div class="space-y-6">
                        <h1 class="text-5xl font-bold">"Your church, one place"</h1>
                        <p class="text-lg text-base-content/70">
                            "Publish events, weekly announcements and giving options for your congregation from a single admin console."
                        </p>
                        <div class="flex justify-center gap-2">
                            <Link to="/login" class="btn btn-primary">"Admin Sign In"</Link>
                            <Link to="/enroll" class="btn btn-outline">"Enroll your church"</Link>
                        </div>
                    </div>
                </div>
            </div>
            <div class="grid md:grid-cols-3 gap-6 max-w-5xl mx-auto px-4 pb-16">
                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <CalendarDays attr:class="h-8 w-8 text-primary" />
                        <h3 class="card-title">"Events"</h3>
                        <p class="text-sm text-base-content/70">"Dates, locations, pricing and contacts."</p>
                    </div>
                </div>
                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <Megaphone attr:class="h-8 w-8 text-secondary" />
                        <h3 class="card-title">"Announcements"</h3>
                        <p class="text-sm text-base-content/70">"Weekly schedules and one-off notices."</p>
                    </div>
                </div>
                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <HandCoins attr:class="h-8 w-8 text-accent" />
                        <h3 class="card-title">"Giving"</h3>
                        <p class="text-sm text-base-content/70">"Share how members can donate."</p>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center space-y-4">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl">"Page not found"</p>
                <Link to="/" class="btn btn-primary">"Go home"</Link>
            </div>
        </div>
    }
}
