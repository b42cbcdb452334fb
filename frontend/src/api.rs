//! API 客户端装配
//!
//! 共享层的 [`ApiClient`] 在浏览器中使用 fetch 与 localStorage。

use chamada_shared::ApiClient;
use chamada_shared::config::{AppConfig, VAR_API_BASE_URL, VAR_TIMEZONE};
use leptos::logging::warn;
use leptos::prelude::*;

use crate::web::{BrowserStorage, FetchClient};

pub type Api = ApiClient<FetchClient, BrowserStorage>;

/// 读取构建时注入的配置
pub fn load_config() -> AppConfig {
    let (config, warnings) = AppConfig::from_lookup(|name| match name {
        VAR_API_BASE_URL => option_env!("CHAMADA_API_URL").map(str::to_string),
        VAR_TIMEZONE => option_env!("CHAMADA_TIMEZONE").map(str::to_string),
        _ => None,
    });
    for warning in warnings {
        warn!("[Config] {}", warning);
    }
    config
}

pub fn use_config() -> AppConfig {
    use_context::<AppConfig>().unwrap_or_default()
}

/// 每次调用都会重新从存储读取令牌，因此可以随用随建
pub fn use_api() -> Api {
    Api::new(use_config().api_base_url, FetchClient, BrowserStorage)
}
