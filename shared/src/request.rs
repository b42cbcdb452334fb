use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::ApiError;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::VecDeque;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 方法枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析 JSON 响应体；空响应体按 `null` 处理（例如 204）
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// HTTP 客户端特性 (Trait)
///
/// 浏览器中的 fetch future 不是 Send 的，因此使用 (?Send)。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[async_trait::async_trait(?Send)]
impl<T: HttpClient + ?Sized> HttpClient for &T {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(req).await
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
#[derive(Default)]
pub struct MockHttpClient {
    // (Method, URL) -> 依次返回的 (Status, Body)，最后一个会被重复使用
    responses: RefCell<HashMap<(HttpMethod, String), VecDeque<(u16, String)>>>,
    failures: RefCell<Vec<(HttpMethod, String)>>,
    /// 记录发出的请求
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.mock_raw(method, url, status, &body.to_string());
    }

    pub fn mock_raw(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .entry((method, url.to_string()))
            .or_default()
            .push_back((status, body.to_string()));
    }

    /// 模拟网络层失败
    pub fn mock_transport_failure(&self, method: HttpMethod, url: &str) {
        self.failures.borrow_mut().push((method, url.to_string()));
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(req.clone());

        let key = (req.method, req.url.clone());
        if self.failures.borrow().contains(&key) {
            return Err(ApiError::Transport("connection refused".to_string()));
        }

        let mut responses = self.responses.borrow_mut();
        match responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => {
                let (status, body) = queue.pop_front().unwrap_or((500, String::new()));
                Ok(HttpResponse { status, body })
            }
            Some(queue) if !queue.is_empty() => {
                let (status, body) = queue[0].clone();
                Ok(HttpResponse { status, body })
            }
            _ => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_ok_range() {
        let ok = HttpResponse { status: 204, body: String::new() };
        let created = HttpResponse { status: 201, body: String::new() };
        let redirect = HttpResponse { status: 302, body: String::new() };
        assert!(ok.ok());
        assert!(created.ok());
        assert!(!redirect.ok());
    }

    #[test]
    fn test_empty_body_parses_as_null() {
        let resp = HttpResponse { status: 204, body: "  ".to_string() };
        let parsed: Option<u32> = resp.json().unwrap();
        assert_eq!(parsed, None);
    }

    #[tokio::test]
    async fn test_mock_client_replays_queue_then_repeats_last() {
        let client = MockHttpClient::new();
        client.mock_response(HttpMethod::Get, "http://x/a", 200, json!(1));
        client.mock_response(HttpMethod::Get, "http://x/a", 200, json!(2));

        let req = || HttpRequest::new("http://x/a", HttpMethod::Get);
        assert_eq!(client.send(req()).await.unwrap().body, "1");
        assert_eq!(client.send(req()).await.unwrap().body, "2");
        assert_eq!(client.send(req()).await.unwrap().body, "2");
        assert_eq!(client.request_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_client_unknown_route_is_404() {
        let client = MockHttpClient::new();
        let resp = client
            .send(HttpRequest::new("http://x/missing", HttpMethod::Post))
            .await
            .unwrap();
        assert_eq!(resp.status, 404);
    }
}
