//! 接口目录
//!
//! 每个请求结构体通过 [`ApiRequest`] 声明自己的方法、路径与响应类型。
//! 路径参数字段不参与请求体序列化。

use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::request::HttpMethod;
use crate::{AttendanceStatus, AttendanceSummary, ClassInfo, Person, SessionWithMembers, User};

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path, with path parameters already substituted.
    fn path(&self) -> String;
}

/// 只关心成功与否的确认响应
pub type Ack = IgnoredAny;

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

// =========================================================
// 认证 (Auth)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/login".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub username_or_email: String,
}

impl ApiRequest for ForgotPasswordRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/forgot-password".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

impl ApiRequest for ResetPasswordRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/reset-password".to_string()
    }
}

// =========================================================
// 班级与点名 (Classes & Sessions)
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct ListClassesRequest;

impl ApiRequest for ListClassesRequest {
    type Response = Vec<ClassInfo>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/classes".to_string()
    }
}

/// 打开（或获取已存在的）某班级某天的点名会话
#[derive(Debug, Clone, Serialize)]
pub struct OpenSessionRequest {
    #[serde(skip_serializing)]
    pub class_id: String,
    pub date: NaiveDate,
}

impl ApiRequest for OpenSessionRequest {
    type Response = SessionWithMembers;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/classes/{}/sessions/open", segment(&self.class_id))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetAttendanceRequest {
    #[serde(skip_serializing)]
    pub session_id: String,
}

impl ApiRequest for GetAttendanceRequest {
    type Response = AttendanceSummary;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/sessions/{}/attendance", segment(&self.session_id))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceRequest {
    #[serde(skip_serializing)]
    pub session_id: String,
    pub participant_id: String,
    pub status: AttendanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification_reason: Option<String>,
}

impl UpdateAttendanceRequest {
    /// 只有 `justified` 状态才携带理由
    pub fn new(
        session_id: impl Into<String>,
        participant_id: impl Into<String>,
        status: AttendanceStatus,
        justification_reason: Option<String>,
    ) -> Self {
        let justification_reason = match status {
            AttendanceStatus::Justified => justification_reason.filter(|r| !r.is_empty()),
            _ => None,
        };
        Self {
            session_id: session_id.into(),
            participant_id: participant_id.into(),
            status,
            justification_reason,
        }
    }
}

impl ApiRequest for UpdateAttendanceRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/sessions/{}/attendance", segment(&self.session_id))
    }
}

// =========================================================
// 人员名录 (People)
// =========================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PersonTypeFilter {
    #[default]
    All,
    Worker,
    Participant,
}

impl PersonTypeFilter {
    pub const ALL: [PersonTypeFilter; 3] = [
        PersonTypeFilter::All,
        PersonTypeFilter::Worker,
        PersonTypeFilter::Participant,
    ];

    /// 查询参数值，`All` 不发送
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            PersonTypeFilter::All => None,
            PersonTypeFilter::Worker => Some("worker"),
            PersonTypeFilter::Participant => Some("participant"),
        }
    }

    pub fn from_param(value: &str) -> Self {
        match value {
            "worker" => PersonTypeFilter::Worker,
            "participant" => PersonTypeFilter::Participant,
            _ => PersonTypeFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PersonTypeFilter::All => "Todos",
            PersonTypeFilter::Worker => "Trabalhadores",
            PersonTypeFilter::Participant => "Participantes",
        }
    }
}

/// 人员筛选条件，完全交由服务端处理
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeopleFilter {
    pub person_type: PersonTypeFilter,
    pub query: String,
}

impl PeopleFilter {
    pub fn query_string(&self) -> String {
        let mut params = Vec::new();
        if let Some(t) = self.person_type.as_param() {
            params.push(format!("type={}", t));
        }
        let q = self.query.trim();
        if !q.is_empty() {
            params.push(format!("q={}", urlencoding::encode(q)));
        }
        params.join("&")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListPeopleRequest {
    #[serde(skip)]
    pub filter: PeopleFilter,
}

impl ApiRequest for ListPeopleRequest {
    type Response = Vec<Person>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        let query = self.filter.query_string();
        if query.is_empty() {
            "/people".to_string()
        } else {
            format!("/people?{}", query)
        }
    }
}
