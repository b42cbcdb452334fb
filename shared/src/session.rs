//! 会话持久化
//!
//! 令牌与用户 JSON 作为一对存储在两个键中，二者总是一起写入、一起清除。
//! 具体的存储介质通过 [`SessionStorage`] 注入，浏览器中为 localStorage。

use std::fmt;

use crate::User;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// 键值存储的最小接口
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;
}

impl<T: SessionStorage + ?Sized> SessionStorage for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> bool {
        (**self).delete(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// 只有令牌或只有用户
    Partial,
    /// 用户 JSON 无法解析
    Corrupt(String),
    /// 必需字段为空
    MissingField(&'static str),
    /// 写入存储失败
    WriteFailed,
    /// 用户序列化失败
    Encode(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Partial => write!(f, "stored session is incomplete"),
            SessionError::Corrupt(e) => write!(f, "stored user is corrupt: {}", e),
            SessionError::MissingField(field) => write!(f, "stored user lacks {}", field),
            SessionError::WriteFailed => write!(f, "failed to write session storage"),
            SessionError::Encode(e) => write!(f, "failed to encode user: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
}

/// 会话存储：`load / save / clear`
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// 读取并校验已保存的会话，不产生副作用
    pub fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        let token = self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty());
        let raw_user = self.storage.get(USER_KEY).filter(|u| !u.is_empty());

        let (token, raw_user) = match (token, raw_user) {
            (None, None) => return Ok(None),
            (Some(token), Some(raw_user)) => (token, raw_user),
            _ => return Err(SessionError::Partial),
        };

        let user: User =
            serde_json::from_str(&raw_user).map_err(|e| SessionError::Corrupt(e.to_string()))?;
        if user.person_id.trim().is_empty() {
            return Err(SessionError::MissingField("personId"));
        }

        Ok(Some(StoredSession { token, user }))
    }

    /// 启动时恢复会话；任何不一致都会清除两个键并回到未认证状态
    pub fn restore(&self) -> Result<Option<User>, SessionError> {
        match self.load() {
            Ok(session) => Ok(session.map(|s| s.user)),
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    pub fn save(&self, token: &str, user: &User) -> Result<(), SessionError> {
        let raw_user = serde_json::to_string(user).map_err(|e| SessionError::Encode(e.to_string()))?;
        if self.storage.set(TOKEN_KEY, token) && self.storage.set(USER_KEY, &raw_user) {
            Ok(())
        } else {
            self.clear();
            Err(SessionError::WriteFailed)
        }
    }

    pub fn clear(&self) {
        self.storage.delete(TOKEN_KEY);
        self.storage.delete(USER_KEY);
    }

    /// 当前持久化的 bearer 令牌
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }
}

// =========================================================
// 测试工具: MemoryStorage
// =========================================================

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    pub data: std::cell::RefCell<std::collections::HashMap<String, String>>,
    pub read_only: std::cell::Cell<bool>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(entries: &[(&str, &str)]) -> Self {
        let storage = Self::new();
        for (k, v) in entries {
            storage.data.borrow_mut().insert(k.to_string(), v.to_string());
        }
        storage
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.borrow().contains_key(key)
    }
}

#[cfg(test)]
impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.data.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        if self.read_only.get() {
            return false;
        }
        self.data.borrow_mut().insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.data.borrow_mut().remove(key);
        true
    }
}
