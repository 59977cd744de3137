//! 认证模块
//!
//! 把 `SessionStore` 接入 Leptos：会话状态以只读信号暴露，
//! 路由服务只拿到注入的 `SessionPhase` 信号，与会话存储解耦。

use std::rc::Rc;

use churchhub_shared::User;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ChurchHubApi;
use crate::config::AppConfig;
use crate::error::AdminResult;
use crate::session::{Bearer, Session, SessionPhase, SessionStore};
use crate::web::http::FetchClient;
use crate::web::storage::BrowserTokenStore;

pub type Api = ChurchHubApi<FetchClient>;
pub type Store = SessionStore<FetchClient, BrowserTokenStore>;

/// 非 `Send` 的服务句柄
#[derive(Clone)]
struct Services {
    config: AppConfig,
    api: Rc<Api>,
    store: Rc<Store>,
}

/// 认证上下文
///
/// 通过 Context 在组件间共享；`session` 是 `SessionStore` 状态的只读视图。
#[derive(Clone, Copy)]
pub struct AuthContext {
    services: StoredValue<Services, LocalStorage>,
    session: ReadSignal<Session>,
}

impl AuthContext {
    pub fn new(config: AppConfig) -> Self {
        let api = Rc::new(ChurchHubApi::new(config.api_url.clone(), FetchClient));
        let store = Rc::new(SessionStore::new(
            api.clone(),
            BrowserTokenStore::new(config.token_key.clone()),
        ));

        let session = ReadSignal::from(store.state().read_only());

        Self {
            services: StoredValue::new_local(Services { config, api, store }),
            session,
        }
    }

    /// 启动时恢复会话
    ///
    /// 同步进入 `Verifying`，首帧即可挂起受保护页面；校验在后台完成。
    pub fn init(&self) {
        let store = self.store();
        if let Some(token) = store.begin_restore() {
            spawn_local(async move {
                let restore = store.finish_restore(token).await;
                log_info!("[Auth] Bootstrap finished: {:?}", restore);
            });
        }
    }

    pub fn session(&self) -> ReadSignal<Session> {
        self.session
    }

    /// 会话阶段信号（用于路由服务注入）
    pub fn phase_signal(&self) -> Signal<SessionPhase> {
        let session = self.session;
        Memo::new(move |_| session.with(|s| s.phase())).into()
    }

    /// 当前用户；只在用户本身变化时通知下游
    pub fn user_signal(&self) -> Memo<Option<User>> {
        Memo::from(self.store().user())
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.with(|s| s.current_user().cloned())
    }

    pub fn config(&self) -> AppConfig {
        self.services.with_value(|s| s.config.clone())
    }

    pub fn api(&self) -> Rc<Api> {
        self.services.with_value(|s| s.api.clone())
    }

    pub fn store(&self) -> Rc<Store> {
        self.services.with_value(|s| s.store.clone())
    }

    /// 资源页面取令牌用
    pub fn bearer(&self) -> Rc<dyn Bearer> {
        self.store()
    }

    pub fn token(&self) -> Option<String> {
        self.store().token()
    }

    /// 登录；成功后的跳转由路由守卫完成
    pub async fn login(&self, email: &str, password: &str) -> AdminResult<User> {
        self.store().login(email, password).await
    }

    /// 登出；导航由路由服务监听会话阶段自动处理
    pub fn logout(&self) {
        self.store().logout();
    }

    pub async fn refresh_user(&self) {
        self.store().refresh_user().await;
    }

    pub fn clear_error(&self) {
        self.store().clear_error();
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}
