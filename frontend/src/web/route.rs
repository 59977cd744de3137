//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其访问级别。

use std::fmt::Display;

/// 路由访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 仅未登录用户可见（已登录时重定向到面板）
    Public,
    /// 仅已登录用户可见
    Protected,
    /// 不做守卫
    Open,
}

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页 (默认路由)
    #[default]
    Landing,
    Login,
    /// 入驻介绍页
    Enroll,
    /// 控制面板 (需要认证)
    Dashboard,
    /// 个人资料 (需要认证)
    Profile,
    ForgotPassword,
    ResetPassword,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举（忽略查询串与末尾 `/`）
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("/");
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        match path {
            "/" => Self::Landing,
            "/login" => Self::Login,
            "/enroll" => Self::Enroll,
            "/dashboard" => Self::Dashboard,
            "/profile" => Self::Profile,
            "/forgot-password" => Self::ForgotPassword,
            "/reset-password" => Self::ResetPassword,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Enroll => "/enroll",
            Self::Dashboard => "/dashboard",
            Self::Profile => "/profile",
            Self::ForgotPassword => "/forgot-password",
            Self::ResetPassword => "/reset-password",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫属性：该路由的访问级别**
    pub fn access(&self) -> Access {
        match self {
            Self::Dashboard | Self::Profile => Access::Protected,
            Self::Landing
            | Self::Login
            | Self::Enroll
            | Self::ForgotPassword
            | Self::ResetPassword => Access::Public,
            Self::NotFound => Access::Open,
        }
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取已认证用户访问公共页时的重定向目标
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 从 `location.search`（如 `?token=abc&x=1`）中取出参数并解码
pub fn query_param(search: &str, name: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| {
            let value = value.replace('+', " ");
            urlencoding::decode(&value).ok().map(|v| v.into_owned())
        })
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Landing);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/dashboard/"), AppRoute::Dashboard);
        assert_eq!(
            AppRoute::from_path("/reset-password?token=x"),
            AppRoute::ResetPassword
        );
        assert_eq!(AppRoute::from_path("/churches"), AppRoute::NotFound);
    }

    #[test]
    fn test_paths_round_trip() {
        for route in [
            AppRoute::Landing,
            AppRoute::Login,
            AppRoute::Enroll,
            AppRoute::Dashboard,
            AppRoute::Profile,
            AppRoute::ForgotPassword,
            AppRoute::ResetPassword,
        ] {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
    }

    #[test]
    fn test_access_levels() {
        assert_eq!(AppRoute::Dashboard.access(), Access::Protected);
        assert_eq!(AppRoute::Profile.access(), Access::Protected);
        assert_eq!(AppRoute::Login.access(), Access::Public);
        assert_eq!(AppRoute::NotFound.access(), Access::Open);
    }

    #[test]
    fn test_query_param() {
        assert_eq!(
            query_param("?token=a%2Fb&x=1", "token").as_deref(),
            Some("a/b")
        );
        assert_eq!(query_param("?x=1", "token"), None);
        assert_eq!(query_param("?token=", "token"), None);
        assert_eq!(query_param("", "token"), None);
    }
}
