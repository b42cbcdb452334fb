//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 路由服务通过注入的认证信号来检查认证状态。

use chamada_shared::User;
use chamada_shared::session::{SessionError, SessionStore};
use leptos::logging::{log, warn};
use leptos::prelude::*;

use crate::web::BrowserStorage;

/// 认证状态
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    /// 当前用户；`None` 表示未认证
    pub user: Option<User>,
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    /// 创建新的认证上下文
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.user.is_some()))
    }
}

fn session_store() -> SessionStore<BrowserStorage> {
    SessionStore::new(BrowserStorage)
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 从 LocalStorage 恢复会话；不一致的数据会被清除。
pub fn init_auth(ctx: &AuthContext) {
    let user = match session_store().restore() {
        Ok(user) => user,
        Err(e) => {
            warn!("[Auth] Discarding stored session: {}", e);
            None
        }
    };
    if let Some(user) = &user {
        log!("[Auth] Restored session for {}", user.username);
    }
    ctx.set_state.set(AuthState { user });
}

/// 保存会话并进入已认证状态
///
/// 导航将由路由服务的认证状态监听自动处理。
pub fn login(ctx: &AuthContext, token: &str, user: User) -> Result<(), SessionError> {
    session_store().save(token, &user)?;
    log!("[Auth] Logged in as {}", user.username);
    ctx.set_state.set(AuthState { user: Some(user) });
    Ok(())
}

/// 注销并清除状态
pub fn logout(ctx: &AuthContext) {
    session_store().clear();
    ctx.set_state.set(AuthState::default());
    // 注意：不需要手动导航，路由服务会监听认证状态变化并自动重定向
}
