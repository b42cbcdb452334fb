//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面
    #[default]
    Login,
    /// 忘记密码
    ForgotPassword,
    /// 重置密码，令牌来自查询串 `?token=`
    ResetPassword { token: Option<String> },
    /// `/`，总是转到班级列表
    Home,
    /// 班级列表 (需要认证)
    Classes,
    /// 班级详情与点名 (需要认证)
    ClassDetail { id: String },
    /// 会话出勤汇总 (需要认证)
    Session { id: String },
    /// 人员名录 (需要认证)
    People,
    /// 页面未找到
    NotFound,
}

/// 读取查询串中的参数（按 URLSearchParams 的规则解码）
pub fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| {
            let value = value.replace('+', " ");
            urlencoding::decode(&value)
                .map(|v| v.into_owned())
                .unwrap_or(value)
        })
}

/// 导航链接是否处于激活状态：完全匹配或作为前缀
pub fn is_active_link(current_path: &str, link: &str) -> bool {
    current_path == link || current_path.starts_with(&format!("{}/", link))
}

impl AppRoute {
    /// 将 `path?query` 解析为路由枚举
    pub fn from_location(location: &str) -> Self {
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["forgot-password"] => Self::ForgotPassword,
            ["reset-password"] => Self::ResetPassword {
                token: query_param(query, "token").filter(|t| !t.is_empty()),
            },
            ["turmas"] => Self::Classes,
            ["turmas", id] => Self::ClassDetail {
                id: decode_segment(id),
            },
            ["sessions", id] => Self::Session {
                id: decode_segment(id),
            },
            ["pessoas"] => Self::People,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL（含查询串）
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::ForgotPassword => "/forgot-password".to_string(),
            Self::ResetPassword { token: Some(token) } => {
                format!("/reset-password?token={}", urlencoding::encode(token))
            }
            Self::ResetPassword { token: None } => "/reset-password".to_string(),
            Self::Home => "/".to_string(),
            Self::Classes => "/turmas".to_string(),
            Self::ClassDetail { id } => format!("/turmas/{}", urlencoding::encode(id)),
            Self::Session { id } => format!("/sessions/{}", urlencoding::encode(id)),
            Self::People => "/pessoas".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Self::Login | Self::ForgotPassword | Self::ResetPassword { .. }
        )
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 无页面的路由需要转发：`/` -> `/turmas`，未知路径 -> `/`
    pub fn forward(&self) -> Option<Self> {
        match self {
            Self::Home => Some(Self::Classes),
            Self::NotFound => Some(Self::Home),
            _ => None,
        }
    }

    /// 解析完所有转发后的最终路由
    pub fn resolve(self) -> Self {
        let mut route = self;
        while let Some(next) = route.forward() {
            route = next;
        }
        route
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的默认重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Classes
    }

    /// 登录成功后的目标：被拦截的受保护路径，否则回到班级列表
    pub fn login_target(return_to: Option<&str>) -> Self {
        return_to
            .map(|path| Self::from_location(path).resolve())
            .filter(Self::requires_auth)
            .unwrap_or_else(Self::auth_success_redirect)
    }
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_public_routes() {
        assert_eq!(AppRoute::from_location("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_location("/forgot-password"), AppRoute::ForgotPassword);
        assert_eq!(
            AppRoute::from_location("/reset-password?token=abc%2B1"),
            AppRoute::ResetPassword {
                token: Some("abc+1".to_string())
            }
        );
        assert_eq!(
            AppRoute::from_location("/reset-password?token="),
            AppRoute::ResetPassword { token: None }
        );
        assert_eq!(
            AppRoute::from_location("/reset-password"),
            AppRoute::ResetPassword { token: None }
        );
    }

    #[test]
    fn test_parse_protected_routes() {
        assert_eq!(AppRoute::from_location("/"), AppRoute::Home);
        assert_eq!(AppRoute::from_location("/turmas"), AppRoute::Classes);
        assert_eq!(AppRoute::from_location("/turmas/"), AppRoute::Classes);
        assert_eq!(
            AppRoute::from_location("/turmas/c1"),
            AppRoute::ClassDetail { id: "c1".to_string() }
        );
        assert_eq!(
            AppRoute::from_location("/sessions/s-9"),
            AppRoute::Session { id: "s-9".to_string() }
        );
        assert_eq!(AppRoute::from_location("/pessoas"), AppRoute::People);
        assert_eq!(AppRoute::from_location("/turmas/c1/extra"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_location("/nada"), AppRoute::NotFound);
    }

    #[test]
    fn test_path_roundtrip() {
        let routes = [
            AppRoute::Login,
            AppRoute::ForgotPassword,
            AppRoute::ResetPassword { token: Some("a b".to_string()) },
            AppRoute::Classes,
            AppRoute::ClassDetail { id: "c 1".to_string() },
            AppRoute::Session { id: "s1".to_string() },
            AppRoute::People,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_location(&route.to_path()), route);
        }
    }

    #[test]
    fn test_guard_flags() {
        assert!(!AppRoute::Login.requires_auth());
        assert!(!AppRoute::ForgotPassword.requires_auth());
        assert!(!AppRoute::ResetPassword { token: None }.requires_auth());
        assert!(AppRoute::Home.requires_auth());
        assert!(AppRoute::NotFound.requires_auth());
        assert!(AppRoute::People.requires_auth());
        assert!(AppRoute::Login.should_redirect_when_authenticated());
        assert!(!AppRoute::Classes.should_redirect_when_authenticated());
    }

    #[test]
    fn test_unknown_and_root_resolve_to_classes() {
        assert_eq!(AppRoute::NotFound.resolve(), AppRoute::Classes);
        assert_eq!(AppRoute::Home.resolve(), AppRoute::Classes);
        assert_eq!(AppRoute::People.resolve(), AppRoute::People);
    }

    #[test]
    fn test_login_target() {
        assert_eq!(
            AppRoute::login_target(Some("/turmas/c1")),
            AppRoute::ClassDetail { id: "c1".to_string() }
        );
        assert_eq!(AppRoute::login_target(Some("/pessoas")), AppRoute::People);
        assert_eq!(AppRoute::login_target(None), AppRoute::Classes);
        assert_eq!(AppRoute::login_target(Some("/login")), AppRoute::Classes);
        assert_eq!(AppRoute::login_target(Some("/reset-password?token=x")), AppRoute::Classes);
        assert_eq!(AppRoute::login_target(Some("/nao-existe")), AppRoute::Classes);
    }

    #[test]
    fn test_query_param() {
        assert_eq!(query_param("token=x&b=2", "b").as_deref(), Some("2"));
        assert_eq!(query_param("?flag", "flag").as_deref(), Some(""));
        assert_eq!(query_param("a=hello+world", "a").as_deref(), Some("hello world"));
        assert_eq!(query_param("", "token"), None);
    }

    #[test]
    fn test_active_link() {
        assert!(is_active_link("/turmas", "/turmas"));
        assert!(is_active_link("/turmas/c1", "/turmas"));
        assert!(!is_active_link("/turmasx", "/turmas"));
        assert!(!is_active_link("/pessoas", "/turmas"));
    }
}
