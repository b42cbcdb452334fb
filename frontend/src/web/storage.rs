//! LocalStorage 封装模块
//!
//! 使用 `gloo-storage` 实现共享层的 [`SessionStorage`] 接口。
//! 值以原始字符串保存，不经过 gloo 的 JSON 编码。

use chamada_shared::session::SessionStorage;
use gloo_storage::{LocalStorage, Storage};

/// 浏览器 localStorage
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrowserStorage;

impl SessionStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        LocalStorage::raw().set_item(key, value).is_ok()
    }

    fn delete(&self, key: &str) -> bool {
        LocalStorage::delete(key);
        true
    }
}
