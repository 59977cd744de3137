//! 会话存储
//!
//! "当前是否有人登录、是谁" 的唯一来源。显式构造、显式注入，
//! 状态为三态枚举，`User` 只存在于 `Authenticated` 中。

use std::rc::Rc;

use churchhub_shared::User;
use churchhub_shared::protocol::{LoginRequest, VerifyTokenRequest};
use leptos::prelude::{ArcMemo, ArcRwSignal, GetUntracked, Update, With, WithUntracked};

use crate::api::ChurchHubApi;
use crate::error::{AdminError, AdminErrorKind, AdminResult};
use crate::web::http::HttpClient;
use crate::web::storage::TokenStore;

// =========================================================
// 常量定义
// =========================================================
const LOGIN_FAILED: &str = "Login failed";
const LOGIN_NETWORK_ERROR: &str = "Network error. Please try again.";

// =========================================================
// 状态模型
// =========================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionStatus {
    #[default]
    Unauthenticated,
    /// 正在校验本地保存的令牌
    Verifying,
    Authenticated(User),
}

/// 不含用户数据的会话阶段，供路由守卫使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Unauthenticated,
    Verifying,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub token: Option<String>,
    pub status: SessionStatus,
    pub last_error: Option<String>,
    /// 进行中的登录请求数（登录按钮的 loading 状态）
    pub pending_logins: u32,
}

impl Session {
    pub fn phase(&self) -> SessionPhase {
        match self.status {
            SessionStatus::Unauthenticated => SessionPhase::Unauthenticated,
            SessionStatus::Verifying => SessionPhase::Verifying,
            SessionStatus::Authenticated(_) => SessionPhase::Authenticated,
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        match &self.status {
            SessionStatus::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase() == SessionPhase::Authenticated
    }

    pub fn is_logging_in(&self) -> bool {
        self.pending_logins > 0
    }

    fn signed_out(pending_logins: u32) -> Self {
        Self {
            pending_logins,
            ..Self::default()
        }
    }
}

/// `bootstrap` 的结果报告（仅用于日志与测试，失败已体现在状态中）
#[derive(Debug, Clone, PartialEq)]
pub enum Restore {
    /// 本地没有令牌
    NoToken,
    Restored,
    /// 令牌被丢弃：SessionExpired（明确无效）或 Network / Decode / Auth
    Discarded(AdminError),
}

/// 为需要认证的请求提供令牌
pub trait Bearer {
    fn bearer(&self) -> Option<String>;
}

// =========================================================
// SessionStore
// =========================================================

pub struct SessionStore<C, S> {
    api: Rc<ChurchHubApi<C>>,
    storage: S,
    state: ArcRwSignal<Session>,
}

impl<C: HttpClient, S: TokenStore> SessionStore<C, S> {
    pub fn new(api: Rc<ChurchHubApi<C>>, storage: S) -> Self {
        Self {
            api,
            storage,
            state: ArcRwSignal::new(Session::default()),
        }
    }

    /// 响应式会话状态；组件侧包成 `ReadSignal` 使用
    pub fn state(&self) -> &ArcRwSignal<Session> {
        &self.state
    }

    /// 只随当前用户变化的派生值
    ///
    /// 登录计数、错误文本等字段变化时值相等，下游不会重新计算。
    pub fn user(&self) -> ArcMemo<Option<User>> {
        let state = self.state.clone();
        ArcMemo::new(move |_| state.with(|s| s.current_user().cloned()))
    }

    pub fn snapshot(&self) -> Session {
        self.state.get_untracked()
    }

    pub fn token(&self) -> Option<String> {
        self.state.with_untracked(|s| s.token.clone())
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.with_untracked(|s| s.current_user().cloned())
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }

    // --- bootstrap ---

    /// 启动时恢复会话
    ///
    /// 永不返回错误：任何失败都会清除本地令牌并回到未登录状态。
    pub async fn bootstrap(&self) -> Restore {
        match self.begin_restore() {
            Some(token) => self.finish_restore(token).await,
            None => Restore::NoToken,
        }
    }

    /// 第一阶段（同步）：读取令牌并进入 `Verifying`，保证首帧就能挂起受保护页面
    pub fn begin_restore(&self) -> Option<String> {
        let token = self.storage.load()?;
        self.state.update(|s| {
            s.token = Some(token.clone());
            s.status = SessionStatus::Verifying;
            s.last_error = None;
        });
        log_info!("[Session] Found stored token, verifying");
        Some(token)
    }

    /// 第二阶段（异步）：向后端校验令牌
    pub async fn finish_restore(&self, token: String) -> Restore {
        let result = self.verify(&token).await;

        // 校验期间会话已被登录/登出替换时，丢弃这次结果
        if self.token().as_deref() != Some(token.as_str()) {
            log_info!("[Session] Session changed during verification, ignoring result");
            return match result {
                Ok(_) => Restore::Restored,
                Err(e) => Restore::Discarded(e),
            };
        }

        match result {
            Ok(user) => {
                log_info!("[Session] Restored session for {}", user.email);
                self.state.update(|s| {
                    s.status = SessionStatus::Authenticated(user);
                });
                Restore::Restored
            }
            Err(e) => {
                log_warn!("[Session] Discarding stored token: {}", e);
                self.storage.clear();
                self.state.update(|s| *s = Session::signed_out(s.pending_logins));
                Restore::Discarded(e.in_op("session.bootstrap"))
            }
        }
    }

    async fn verify(&self, token: &str) -> AdminResult<User> {
        let req = VerifyTokenRequest {
            token: token.to_string(),
        };
        let resp = self.api.call(&req, None).await?;
        match (resp.valid, resp.user) {
            (true, Some(user)) => Ok(user),
            (true, None) => Err(AdminError::decode("verification response is missing user")),
            (false, _) => Err(AdminError::session_expired()),
        }
    }

    // --- login / logout ---

    /// 用邮箱密码换取令牌
    ///
    /// 并发调用互不干扰，最后写入的结果生效。
    pub async fn login(&self, email: &str, password: &str) -> AdminResult<User> {
        self.state.update(|s| {
            s.pending_logins += 1;
            s.last_error = None;
        });

        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.api.call(&req, None).await;

        match result {
            Ok(resp) => {
                log_info!("[Session] Logged in as {}", resp.user.email);
                self.storage.save(&resp.token);
                let user = resp.user;
                self.state.update(|s| {
                    s.pending_logins = s.pending_logins.saturating_sub(1);
                    s.token = Some(resp.token);
                    s.status = SessionStatus::Authenticated(user.clone());
                    s.last_error = None;
                });
                Ok(user)
            }
            Err(e) => {
                let message = match e.kind {
                    AdminErrorKind::Network => LOGIN_NETWORK_ERROR.to_string(),
                    _ => e.message_or(LOGIN_FAILED),
                };
                log_warn!("[Session] Login failed: {}", e);
                self.storage.clear();
                self.state.update(|s| {
                    let pending = s.pending_logins.saturating_sub(1);
                    *s = Session::signed_out(pending);
                    s.last_error = Some(message);
                });
                Err(e.in_op("session.login"))
            }
        }
    }

    /// 本地登出，不请求后端
    pub fn logout(&self) {
        self.storage.clear();
        self.state.update(|s| *s = Session::signed_out(s.pending_logins));
        log_info!("[Session] Logged out");
    }

    /// 清除登录错误提示（用户重新编辑表单时）
    pub fn clear_error(&self) {
        if self.state.with_untracked(|s| s.last_error.is_some()) {
            self.state.update(|s| s.last_error = None);
        }
    }

    // --- refresh ---

    /// 后台刷新当前用户（资料修改后拉取最新数据）
    ///
    /// 网络与解码失败只记录日志；令牌被明确判定无效时静默登出。
    pub async fn refresh_user(&self) {
        let Some(token) = self.storage.load() else {
            return;
        };

        match self.verify(&token).await {
            Ok(user) => {
                self.state.update(|s| {
                    if s.token.as_deref() == Some(token.as_str()) && s.is_authenticated() {
                        s.status = SessionStatus::Authenticated(user);
                    }
                });
            }
            Err(e) if e.kind == AdminErrorKind::SessionExpired => {
                log_warn!("[Session] Token no longer valid, signing out");
                self.logout();
            }
            Err(e) => {
                log_error!("[Session] User refresh failed: {}", e.in_op("session.refresh_user"));
            }
        }
    }
}

impl<C: HttpClient, S: TokenStore> Bearer for SessionStore<C, S> {
    fn bearer(&self) -> Option<String> {
        self.token()
    }
}

// =========================================================
// 测试模块
// =========================================================

#[cfg(test)]
mod tests;
