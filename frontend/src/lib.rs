//! ChurchHub 管理后台
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `session` / `upload` / `resource`: 信号承载的状态与流程（不依赖 DOM，可在原生目标上测试）
//! - `web::route` / `web::guard` / `web::router`: 路由定义、守卫决策与路由服务
//! - `auth` / `bridge`: 认证上下文与提示过期
//! - `components`: UI 组件层

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (web_sys::console::warn_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

mod api;
mod auth;
mod bridge;
mod config;
mod error;
mod resource;
mod session;
mod upload;
mod components {
    pub mod church {
        pub mod announcements;
        pub mod details;
        pub mod donations;
        pub mod events;
    }
    pub mod crud;
    pub mod dashboard;
    pub mod enroll;
    pub mod icons;
    pub mod image_upload;
    pub mod landing;
    pub mod login;
    pub mod password;
    pub mod profile;
    pub mod superuser;
    pub mod widgets;
}

// 浏览器 API 适配层；核心模块只依赖其中的 trait
pub(crate) mod web {
    pub mod guard;
    pub mod http;
    pub mod route;
    pub mod router;
    pub mod storage;
    pub mod timer;
}

use crate::auth::AuthContext;
use crate::components::dashboard::DashboardPage;
use crate::components::enroll::EnrollInfoPage;
use crate::components::landing::{LandingPage, NotFoundPage};
use crate::components::login::LoginPage;
use crate::components::password::{ForgotPasswordPage, ResetPasswordPage};
use crate::components::profile::ProfilePage;
use crate::components::widgets::full_page_spinner;
use crate::config::AppConfig;

use leptos::prelude::*;

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Landing => view! { <LandingPage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Enroll => view! { <EnrollInfoPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::ForgotPassword => view! { <ForgotPasswordPage /> }.into_any(),
        AppRoute::ResetPassword => view! { <ResetPasswordPage /> }.into_any(),
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth = AuthContext::new(AppConfig::from_env());
    provide_context(auth);

    // 2. 有已保存的令牌时进入校验阶段并后台恢复会话
    auth.init();

    // 3. 路由服务只拿到会话阶段信号
    let phase = auth.phase_signal();

    view! {
        <Router phase=phase>
            <RouterOutlet matcher=route_matcher suspended=full_page_spinner />
        </Router>
    }
}
