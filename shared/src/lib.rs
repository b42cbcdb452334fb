use serde::{Deserialize, Serialize};

pub mod api;
pub mod attendance;
pub mod config;
pub mod date;
pub mod error;
pub mod protocol;
pub mod request;
pub mod session;
pub mod ticket;
pub mod validation;

pub use api::ApiClient;
pub use error::{ApiError, ValidationError};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_ACCEPT: &str = "Accept";
pub const MIME_JSON: &str = "application/json";

// =========================================================
// 用户与角色 (Users & Roles)
// =========================================================

/// 后端 WorkerRole 枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    Worker,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::Admin => "admin",
            UserRole::Worker => "worker",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub person_id: String,
    pub username: String,
    pub role: UserRole,
    #[serde(default)]
    pub full_name: String,
}

impl User {
    /// 页头显示的名称：优先全名，否则退回角色
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            self.role.as_str()
        } else {
            &self.full_name
        }
    }
}

/// 唯一的角色授权判断入口。
///
/// 仅用于界面上的便利性隐藏（导航链接），真正的权限边界在服务端。
pub fn can_view_people_directory(user: Option<&User>) -> bool {
    matches!(
        user.map(|u| u.role),
        Some(UserRole::Admin | UserRole::SuperAdmin)
    )
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassOwner {
    pub full_name: String,
}

/// 班级 (Turma)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub day_of_week: u8,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    pub status: String,
    pub owner: ClassOwner,
}

impl ClassInfo {
    /// 课程时间标签，例如 `Seg 08:00` 或 `Seg 08:00–10:00`
    pub fn schedule_label(&self, range_separator: &str) -> String {
        let day = date::day_abbreviation(self.day_of_week).unwrap_or("?");
        match self.end_time.as_deref() {
            Some(end) if !end.is_empty() => {
                format!("{} {}{}{}", day, self.start_time, range_separator, end)
            }
            _ => format!("{} {}", day, self.start_time),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// 某班级某一天的点名会话 (Chamada)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionWithMembers {
    pub id: String,
    pub session_date: String,
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Justified,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Justified => "justified",
        }
    }

    /// 按钮与徽章上的文字
    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Presente",
            AttendanceStatus::Absent => "Falta",
            AttendanceStatus::Justified => "Justificada",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceParticipant {
    pub id: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceItem {
    pub id: String,
    pub participant_id: String,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub justification_reason: Option<String>,
    pub participant: AttendanceParticipant,
}

/// 会话出勤汇总，计数以服务端为准
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    #[serde(default)]
    pub items: Vec<AttendanceItem>,
    pub total: u32,
    pub present: u32,
    pub absent: u32,
    pub justified: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerInfo {
    pub role: String,
    pub function: String,
}

/// 人员名录条目（只读）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub person_type: String,
    pub status: String,
    #[serde(default)]
    pub worker: Option<WorkerInfo>,
}

impl Person {
    /// `função (role)`，非工作人员返回 None
    pub fn worker_label(&self) -> Option<String> {
        self.worker
            .as_ref()
            .map(|w| format!("{} ({})", w.function, w.role))
    }
}

/// 服务端结构化错误体 `{ "error": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}
