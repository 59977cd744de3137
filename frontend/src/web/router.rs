//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 守卫 -> 处理 -> 加载"的导航流程，守卫规则见 `guard`。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::guard::{GuardDecision, decide_route};
use super::route::AppRoute;
use crate::session::SessionPhase;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 获取当前查询串（含 `?`）
pub fn current_search() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入会话阶段信号实现与会话存储的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话阶段（注入的信号，实现解耦）
    phase: Signal<SessionPhase>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// # Arguments
    /// * `phase` - 会话阶段信号，由外部注入实现解耦
    fn new(phase: Signal<SessionPhase>) -> Self {
        // 1. 初始化当前路由（从 URL 解析）
        let path = current_path();
        let initial_route = AppRoute::from_path(&path);
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            phase,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 当前路由的守卫结论（响应式）
    pub fn decision(&self) -> GuardDecision {
        decide_route(self.current_route.get(), self.phase.get())
    }

    /// **核心方法：导航与守卫**
    ///
    /// `path` 可以带查询串，如 `/reset-password?token=...`。
    pub fn navigate(&self, path: &str) {
        let target_route = AppRoute::from_path(path);
        let phase = self.phase.get_untracked();

        // --- Step 1: 验证目标路由 ---
        if let GuardDecision::Redirect(redirect) = decide_route(target_route, phase) {
            log_info!("[Router] {} is not reachable now, redirecting to {}", path, redirect);
            push_history_state(redirect.to_path());
            self.set_route.set(redirect);
            return;
        }

        // --- Step 2: 加载页面 (更新状态) ---
        // 校验中的受保护页面也会被推入，由出口挂起渲染
        push_history_state(path);
        self.set_route.set(target_route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;

        // 守卫由 setup_guard_redirect 中的 Effect 统一处理
        let closure = Closure::<dyn Fn()>::new(move || {
            let path = current_path();
            set_route.set(AppRoute::from_path(&path));
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话阶段或路由变化时重新执行守卫
    ///
    /// 覆盖：首屏加载、popstate、登录成功、登出、静默登出、校验完成。
    fn setup_guard_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let phase = self.phase;

        Effect::new(move |_| {
            let phase = phase.get();
            let route = current_route.get();

            if let GuardDecision::Redirect(redirect) = decide_route(route, phase) {
                log_info!(
                    "[Router] Session is {:?}, redirecting {} -> {}",
                    phase,
                    route,
                    redirect
                );
                replace_history_state(redirect.to_path());
                set_route.set(redirect);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(phase: Signal<SessionPhase>) -> RouterService {
    let router = RouterService::new(phase);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_guard_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话阶段信号
    phase: Signal<SessionPhase>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    // 提供路由服务到 Context
    provide_router(phase);

    children()
}

/// 路由出口组件
///
/// 根据守卫结论渲染：内容、挂起占位，或（等待重定向时）空白。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
    /// 会话校验中的占位视图
    suspended: fn() -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || match router.decision() {
        GuardDecision::Render => matcher(router.current_route().get()),
        GuardDecision::Suspend => suspended(),
        GuardDecision::Redirect(_) => ().into_any(),
    }
}

/// 站内链接：拦截点击，走路由服务而不是整页刷新
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    #[prop(into, optional)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
