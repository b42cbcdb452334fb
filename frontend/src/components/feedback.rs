//! 加载、错误、空状态与提示框
//!
//! 各页面共用的反馈组件。

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// 提示框停留时间（毫秒）
const TOAST_DURATION_MS: u32 = 3000;

/// 异步数据的加载状态
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

#[component]
pub fn Loading(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center gap-2 py-8 text-base-content/70">
            <span class="loading loading-spinner loading-md text-primary"></span>
            {label.unwrap_or_else(|| "Carregando...".to_string())}
        </div>
    }
}

#[component]
pub fn ErrorAlert(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div role="alert" class="alert alert-error text-sm py-2">
            <span>{message}</span>
        </div>
    }
}

#[component]
pub fn Empty(#[prop(into)] message: String) -> impl IntoView {
    view! { <p class="text-center py-8 text-base-content/50">{message}</p> }
}

/// 显示一条提示，3 秒后自动消失
///
/// 只清除自己那一条，后来的提示不受影响。
pub fn show_toast(toast: RwSignal<Option<String>>, message: impl Into<String>) {
    let message = message.into();
    toast.set(Some(message.clone()));
    Timeout::new(TOAST_DURATION_MS, move || {
        toast.try_update(|current| {
            if current.as_deref() == Some(message.as_str()) {
                *current = None;
            }
        });
    })
    .forget();
}

#[component]
pub fn Toast(toast: RwSignal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || toast.with(|t| t.is_some())>
            <div class="toast toast-top toast-end z-50">
                <div class="alert alert-error shadow-lg">
                    <span>{move || toast.get().unwrap_or_default()}</span>
                </div>
            </div>
        </Show>
    }
}
