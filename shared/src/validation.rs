//! 表单校验规则
//!
//! 所有规则都在网络请求之前执行。

use crate::error::ValidationError;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_REASON_LEN: usize = 3;

/// 密码强度：至少 8 个字符，同时包含字母与数字
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::PasswordMissingLetter);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordMissingDigit);
    }
    Ok(())
}

/// 重置密码表单：先比较确认密码，再检查强度，最后检查令牌
pub fn validate_password_reset(
    token: Option<&str>,
    new_password: &str,
    confirm_password: &str,
) -> Result<String, ValidationError> {
    if new_password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    validate_password(new_password)?;
    // 令牌按链接中收到的原样发送
    match token {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => Err(ValidationError::MissingResetToken),
    }
}

/// 请假理由：去除首尾空白后至少 3 个字符，返回去空白后的文本
pub fn validate_reason(reason: &str) -> Result<String, ValidationError> {
    let trimmed = reason.trim();
    if trimmed.chars().count() < MIN_REASON_LEN {
        return Err(ValidationError::ReasonTooShort);
    }
    Ok(trimmed.to_string())
}
