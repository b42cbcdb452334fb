//! 请求票据
//!
//! 每次发起请求时领取一张票据；响应返回时只有最新的票据仍然有效，
//! 过期的响应直接丢弃，避免旧数据覆盖新数据。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: Arc<AtomicU64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 领取新票据，之前的票据全部失效
    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst).wrapping_add(1))
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// 使所有未完成的请求失效（例如视图卸载时）
    pub fn invalidate(&self) {
        self.begin();
    }
}
