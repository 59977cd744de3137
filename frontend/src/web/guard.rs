//! 路由守卫
//!
//! 纯函数：根据路由访问级别与会话阶段决定渲染、重定向或挂起。
//! 任意时刻只会得到三者之一。

use super::route::{Access, AppRoute};
use crate::session::SessionPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(AppRoute),
    /// 会话校验中：既不渲染内容也不重定向
    Suspend,
}

pub fn decide(access: Access, phase: SessionPhase) -> GuardDecision {
    match (access, phase) {
        (Access::Open, _) => GuardDecision::Render,

        (Access::Protected, SessionPhase::Authenticated) => GuardDecision::Render,
        (Access::Protected, SessionPhase::Verifying) => GuardDecision::Suspend,
        (Access::Protected, SessionPhase::Unauthenticated) => {
            GuardDecision::Redirect(AppRoute::auth_failure_redirect())
        }

        (Access::Public, SessionPhase::Authenticated) => {
            GuardDecision::Redirect(AppRoute::auth_success_redirect())
        }
        // 校验期间公共页照常显示，校验成功后由阶段变化触发重定向
        (Access::Public, _) => GuardDecision::Render,
    }
}

/// 路由级便捷函数
pub fn decide_route(route: AppRoute, phase: SessionPhase) -> GuardDecision {
    decide(route.access(), phase)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHASES: [SessionPhase; 3] = [
        SessionPhase::Unauthenticated,
        SessionPhase::Verifying,
        SessionPhase::Authenticated,
    ];

    #[test]
    fn test_protected_renders_only_when_authenticated() {
        for phase in PHASES {
            let decision = decide(Access::Protected, phase);
            assert_eq!(
                decision == GuardDecision::Render,
                phase == SessionPhase::Authenticated,
                "{phase:?}"
            );
        }
    }

    #[test]
    fn test_protected_suspends_while_verifying() {
        assert_eq!(
            decide(Access::Protected, SessionPhase::Verifying),
            GuardDecision::Suspend
        );
    }

    #[test]
    fn test_protected_redirects_to_login() {
        assert_eq!(
            decide_route(AppRoute::Dashboard, SessionPhase::Unauthenticated),
            GuardDecision::Redirect(AppRoute::Login)
        );
        assert_eq!(
            decide_route(AppRoute::Profile, SessionPhase::Unauthenticated),
            GuardDecision::Redirect(AppRoute::Login)
        );
    }

    #[test]
    fn test_public_redirects_authenticated_users() {
        for route in [AppRoute::Landing, AppRoute::Login, AppRoute::ResetPassword] {
            assert_eq!(
                decide_route(route, SessionPhase::Authenticated),
                GuardDecision::Redirect(AppRoute::Dashboard)
            );
            assert_eq!(
                decide_route(route, SessionPhase::Unauthenticated),
                GuardDecision::Render
            );
        }
    }

    #[test]
    fn test_public_pages_stay_visible_while_verifying() {
        assert_eq!(
            decide_route(AppRoute::Login, SessionPhase::Verifying),
            GuardDecision::Render
        );
    }

    #[test]
    fn test_not_found_is_unguarded() {
        for phase in PHASES {
            assert_eq!(decide_route(AppRoute::NotFound, phase), GuardDecision::Render);
        }
    }
}
