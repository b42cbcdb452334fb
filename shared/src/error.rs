use std::fmt;

use crate::ApiErrorBody;

// =========================================================
// 客户端校验错误
// =========================================================

/// 在发出任何网络请求之前被拦截的输入错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    PasswordTooShort,
    PasswordMissingLetter,
    PasswordMissingDigit,
    PasswordMismatch,
    ReasonTooShort,
    MissingResetToken,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ValidationError::PasswordTooShort => "Senha deve ter no mínimo 8 caracteres",
            ValidationError::PasswordMissingLetter => "Senha deve conter letras",
            ValidationError::PasswordMissingDigit => "Senha deve conter números",
            ValidationError::PasswordMismatch => "As senhas não coincidem",
            ValidationError::ReasonTooShort => "Motivo deve ter no mínimo 3 caracteres",
            ValidationError::MissingResetToken => {
                "Token inválido. Solicite um novo link de recuperação."
            }
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ValidationError {}

// =========================================================
// API 错误
// =========================================================

/// API 调用失败的分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 请求未发出：客户端校验失败
    Invalid(ValidationError),
    /// 非 2xx，且服务端返回了 `{ error }`
    Api { status: u16, message: String },
    /// 非 2xx，响应体不可读
    Status(u16),
    /// 网络层失败
    Transport(String),
    /// 2xx 但响应体无法解析
    Decode(String),
    /// 请求体序列化失败
    Encode(String),
}

impl ApiError {
    /// 从非 2xx 响应构建错误，尽量保留服务端的原始消息
    pub fn from_status(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) if !parsed.error.trim().is_empty() => ApiError::Api {
                status,
                message: parsed.error,
            },
            _ => ApiError::Status(status),
        }
    }

    /// 服务端报告的消息（若有）
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Api { message, .. } => Some(message),
            _ => None,
        }
    }

    /// 面向用户的消息：校验错误与服务端消息原样展示，其余使用兜底文案
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ApiError::Invalid(e) => e.to_string(),
            ApiError::Api { message, .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } | ApiError::Status(status) => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Invalid(e) => write!(f, "{}", e),
            ApiError::Api { message, .. } => write!(f, "{}", message),
            ApiError::Status(status) => write!(f, "Erro HTTP {}", status),
            ApiError::Transport(msg) => write!(f, "Erro de rede: {}", msg),
            ApiError::Decode(msg) => write!(f, "Resposta inválida: {}", msg),
            ApiError::Encode(msg) => write!(f, "Requisição inválida: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Invalid(e)
    }
}
