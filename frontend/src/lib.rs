//! Chamada 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态管理
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod feedback;
    pub mod forgot_password;
    pub mod layout;
    pub mod login;
    pub mod pessoas;
    pub mod reset_password;
    pub mod session_chamada;
    pub mod turma_detalhe;
    pub mod turmas;
}

use crate::api::load_config;
use crate::auth::{AuthContext, init_auth};
use crate::components::forgot_password::ForgotPasswordPage;
use crate::components::layout::Shell;
use crate::components::login::LoginPage;
use crate::components::pessoas::PessoasPage;
use crate::components::reset_password::ResetPasswordPage;
use crate::components::session_chamada::SessionChamadaPage;
use crate::components::turma_detalhe::TurmaDetalhePage;
use crate::components::turmas::TurmasPage;

use leptos::prelude::*;

// 浏览器适配层：共享层接口的 fetch / localStorage 实现，以及路由
pub(crate) mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::FetchClient;
    pub use storage::BrowserStorage;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。需要认证的页面包在 Shell 中。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::ForgotPassword => view! { <ForgotPasswordPage /> }.into_any(),
        AppRoute::ResetPassword { token } => view! { <ResetPasswordPage token=token /> }.into_any(),
        AppRoute::Classes => view! { <Shell><TurmasPage /></Shell> }.into_any(),
        AppRoute::ClassDetail { id } => {
            view! { <Shell><TurmaDetalhePage class_id=id /></Shell> }.into_any()
        }
        AppRoute::Session { id } => {
            view! { <Shell><SessionChamadaPage session_id=id /></Shell> }.into_any()
        }
        AppRoute::People => view! { <Shell><PessoasPage /></Shell> }.into_any(),
        // 路由服务会先转发，不会停留在这两个路由上
        AppRoute::Home | AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 构建时配置（API 地址、时区）
    provide_context(load_config());

    // 2. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 3. 初始化认证状态（从 LocalStorage 恢复会话）
    init_auth(&auth_ctx);

    // 4. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        // 5. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
