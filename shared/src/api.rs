//! API 客户端
//!
//! 对 HTTP 客户端的薄封装：拼接根地址、从会话存储读取 bearer 令牌、
//! JSON 编解码，以及把非 2xx 响应转换为 [`ApiError`]。

use chrono::NaiveDate;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::ApiError;
use crate::protocol::{
    ApiRequest, ForgotPasswordRequest, GetAttendanceRequest, ListClassesRequest,
    ListPeopleRequest, LoginRequest, LoginResponse, OpenSessionRequest, PeopleFilter,
    ResetPasswordRequest, UpdateAttendanceRequest,
};
use crate::request::{HttpClient, HttpMethod, HttpRequest};
use crate::session::{SessionStorage, TOKEN_KEY};
use crate::validation::validate_reason;
use crate::{
    AttendanceStatus, AttendanceSummary, ClassInfo, HEADER_ACCEPT, HEADER_AUTHORIZATION,
    HEADER_CONTENT_TYPE, MIME_JSON, Person, SessionWithMembers,
};

#[cfg(test)]
mod tests;

#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient<C, S> {
    base_url: String,
    http: C,
    storage: S,
}

impl<C: HttpClient, S: SessionStorage> ApiClient<C, S> {
    pub fn new(base_url: impl Into<String>, http: C, storage: S) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http,
            storage,
        }
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn build(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let mut req = HttpRequest::new(&self.url(path), method).with_header(HEADER_ACCEPT, MIME_JSON);

        if let Some(token) = self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty()) {
            req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }
        if let Some(body) = body {
            req = req
                .with_header(HEADER_CONTENT_TYPE, MIME_JSON)
                .with_body(body);
        }
        req
    }

    async fn dispatch<T: DeserializeOwned>(&self, req: HttpRequest) -> Result<T, ApiError> {
        let resp = self.http.send(req).await?;
        if !resp.ok() {
            return Err(ApiError::from_status(resp.status, &resp.body));
        }
        resp.json::<T>()
    }

    fn encode<B: Serialize>(body: &B) -> Result<String, ApiError> {
        serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))
    }

    // =========================================================
    // 通用方法
    // =========================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.dispatch(self.build(HttpMethod::Get, path, None)).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = Self::encode(body)?;
        self.dispatch(self.build(HttpMethod::Post, path, Some(body)))
            .await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = Self::encode(body)?;
        self.dispatch(self.build(HttpMethod::Put, path, Some(body)))
            .await
    }

    /// 执行目录中的任意请求
    pub async fn execute<R: ApiRequest>(&self, req: &R) -> Result<R::Response, ApiError> {
        let path = req.path();
        match R::METHOD {
            HttpMethod::Get => self.get(&path).await,
            HttpMethod::Post => self.post(&path, req).await,
            HttpMethod::Put => self.put(&path, req).await,
        }
    }

    // =========================================================
    // 认证
    // =========================================================

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let req = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        self.execute(&req).await
    }

    pub async fn forgot_password(&self, username_or_email: &str) -> Result<(), ApiError> {
        let req = ForgotPasswordRequest {
            username_or_email: username_or_email.trim().to_string(),
        };
        self.execute(&req).await.map(|_| ())
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), ApiError> {
        let req = ResetPasswordRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        self.execute(&req).await.map(|_| ())
    }

    // =========================================================
    // 班级与点名
    // =========================================================

    pub async fn list_classes(&self) -> Result<Vec<ClassInfo>, ApiError> {
        self.execute(&ListClassesRequest).await
    }

    /// 没有单个班级的接口：取列表后按 id 查找
    pub async fn find_class(&self, class_id: &str) -> Result<Option<ClassInfo>, ApiError> {
        let classes = self.list_classes().await?;
        Ok(classes.into_iter().find(|c| c.id == class_id))
    }

    pub async fn open_session(
        &self,
        class_id: &str,
        date: NaiveDate,
    ) -> Result<SessionWithMembers, ApiError> {
        let req = OpenSessionRequest {
            class_id: class_id.to_string(),
            date,
        };
        self.execute(&req).await
    }

    pub async fn attendance(&self, session_id: &str) -> Result<AttendanceSummary, ApiError> {
        let req = GetAttendanceRequest {
            session_id: session_id.to_string(),
        };
        self.execute(&req).await
    }

    /// 打开会话，随后读取当前出勤状态
    pub async fn open_chamada(
        &self,
        class_id: &str,
        date: NaiveDate,
    ) -> Result<(SessionWithMembers, AttendanceSummary), ApiError> {
        let session = self.open_session(class_id, date).await?;
        let summary = self.attendance(&session.id).await?;
        Ok((session, summary))
    }

    /// 更新单个参与者的出勤状态。
    ///
    /// 从不在本地合并结果：写入成功后恰好执行一次权威读取并返回。
    /// `justified` 状态的理由在发出请求前校验。
    pub async fn record_attendance(
        &self,
        session_id: &str,
        participant_id: &str,
        status: AttendanceStatus,
        justification_reason: Option<&str>,
    ) -> Result<AttendanceSummary, ApiError> {
        let reason = match status {
            AttendanceStatus::Justified => Some(validate_reason(justification_reason.unwrap_or(""))?),
            _ => None,
        };
        let req = UpdateAttendanceRequest::new(session_id, participant_id, status, reason);
        self.execute(&req).await?;
        self.attendance(session_id).await
    }

    // =========================================================
    // 人员
    // =========================================================

    pub async fn list_people(&self, filter: &PeopleFilter) -> Result<Vec<Person>, ApiError> {
        let req = ListPeopleRequest {
            filter: filter.clone(),
        };
        self.execute(&req).await
    }
}
