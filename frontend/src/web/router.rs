//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程。

use leptos::logging::log;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, is_active_link};

/// 获取当前浏览器位置（路径 + 查询串）
fn current_location() -> String {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return "/".to_string();
    };
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let search = location.search().unwrap_or_default();
    format!("{}{}", path, search)
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
/// 通过注入认证检查信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 认证状态检查（注入的信号，实现解耦）
    is_authenticated: Signal<bool>,
    /// 被守卫拦截时用户原本要访问的地址，登录后返回
    return_to: RwSignal<Option<String>>,
    /// 一次性提示消息（例如 "Senha atualizada"）
    flash: RwSignal<Option<String>>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// # Arguments
    /// * `is_authenticated` - 认证状态信号，由外部注入实现解耦
    fn new(is_authenticated: Signal<bool>) -> Self {
        let (current_route, set_route) = signal(AppRoute::default());

        Self {
            current_route,
            set_route,
            is_authenticated,
            return_to: RwSignal::new(None),
            flash: RwSignal::new(None),
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 导航链接是否指向当前页面
    pub fn is_active(&self, link: &str) -> bool {
        is_active_link(&self.current_route.get().to_path(), link)
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.flash.set(None);
        let target_route = AppRoute::from_location(path);
        self.navigate_to_route(target_route, true);
    }

    /// 导航并携带一次性提示消息
    pub fn navigate_with_flash(&self, path: &str, message: impl Into<String>) {
        let target_route = AppRoute::from_location(path);
        self.flash.set(Some(message.into()));
        self.navigate_to_route(target_route, false);
    }

    /// 取出一次性提示消息
    pub fn take_flash(&self) -> Option<String> {
        let message = self.flash.get_untracked();
        if message.is_some() {
            self.flash.set(None);
        }
        message
    }

    fn take_return_to(&self) -> AppRoute {
        let target = AppRoute::login_target(self.return_to.get_untracked().as_deref());
        self.return_to.set(None);
        target
    }

    fn commit(&self, route: AppRoute, use_push: bool) {
        let path = route.to_path();
        if use_push {
            push_history_state(&path);
        } else {
            replace_history_state(&path);
        }
        self.set_route.set(route);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target_route` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let is_auth = self.is_authenticated.get_untracked();
        // `/` 与未知路径不对应任何页面
        let target_route = target_route.resolve();

        // --- Step 1: 验证目标路由 ---
        // 如果目标需要认证但用户未认证，记住目标地址
        if target_route.requires_auth() && !is_auth {
            log!("[Router] Access denied to {}. Redirecting to login.", target_route);
            self.return_to.set(Some(target_route.to_path()));
            self.commit(AppRoute::auth_failure_redirect(), use_push);
            return;
        }

        // 如果用户已认证但访问登录页，重定向到目标或班级列表
        if target_route.should_redirect_when_authenticated() && is_auth {
            let redirect = self.take_return_to();
            log!("[Router] Already authenticated. Redirecting to {}.", redirect);
            self.commit(redirect, use_push);
            return;
        }

        // --- Step 2: 加载页面 (更新状态) ---
        self.commit(target_route, use_push);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        // popstate 时也执行守卫逻辑
        let closure = Closure::<dyn Fn()>::new(move || {
            let target_route = AppRoute::from_location(&current_location());
            router.navigate_to_route(target_route, false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证状态变化时的自动重定向
    fn setup_auth_redirect(&self) {
        let router = *self;

        // 首次运行只记录初始状态，之后只响应变化
        Effect::new(move |prev: Option<bool>| {
            let is_auth = router.is_authenticated.get();
            let route = router.current_route.get_untracked();

            if prev.is_some_and(|was| was != is_auth) {
                if is_auth {
                    // 用户刚登录，返回被拦截前的地址
                    if route.should_redirect_when_authenticated() {
                        let redirect = router.take_return_to();
                        log!("[Router] Logged in, redirecting to {}.", redirect);
                        router.commit(redirect, false);
                    }
                } else if route.requires_auth() {
                    // 主动登出不保留返回地址
                    router.return_to.set(None);
                    log!("[Router] Logged out, redirecting to login.");
                    router.commit(AppRoute::auth_failure_redirect(), true);
                }
            }
            is_auth
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);

    // 对初始地址同样执行守卫
    router.navigate_to_route(AppRoute::from_location(&current_location()), false);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_auth_redirect();

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
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    // 提供路由服务到 Context
    provide_router(is_authenticated);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接：拦截点击并交给路由服务
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    #[prop(optional, into)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        // 保留 Ctrl/Cmd 点击在新标签页打开的行为
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() {
            return;
        }
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}

/// 导航栏链接，激活时附加 `active` 类
#[component]
pub fn NavLink(
    #[prop(into)] to: String,
    #[prop(into)] label: String,
) -> impl IntoView {
    let router = use_router();
    let link = to.clone();
    let class = move || {
        if router.is_active(&link) {
            "btn btn-ghost btn-sm btn-active"
        } else {
            "btn btn-ghost btn-sm"
        }
    };

    view! {
        <a
            href=to.clone()
            class=class
            on:click=move |ev: leptos::ev::MouseEvent| {
                ev.prevent_default();
                router.navigate(&to);
            }
        >
            {label}
        </a>
    }
}
