// =========================================================
// 运行时配置 (Runtime Configuration)
// =========================================================

use chrono_tz::Tz;

/// 这些是默认值，构建环境中没有定义对应变量时使用
pub const DEFAULT_API_BASE_URL: &str = "/api";
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Bahia;

pub const VAR_API_BASE_URL: &str = "CHAMADA_API_URL";
pub const VAR_TIMEZONE: &str = "CHAMADA_TIMEZONE";

/// 前端配置
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// API 根地址，不带末尾的 `/`
    pub api_base_url: String,
    /// 计算 "今天" 所用的时区
    pub timezone: Tz,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

impl AppConfig {
    /// 从变量查找函数构建配置
    ///
    /// 返回配置以及需要报告的警告（例如无法识别的时区名）。
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<String>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        let api_base_url = lookup(VAR_API_BASE_URL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timezone = match lookup(VAR_TIMEZONE).map(|v| v.trim().to_string()) {
            Some(name) if !name.is_empty() => match name.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warnings.push(format!(
                        "unknown timezone {:?}, falling back to {}",
                        name,
                        DEFAULT_TIMEZONE.name()
                    ));
                    DEFAULT_TIMEZONE
                }
            },
            _ => DEFAULT_TIMEZONE,
        };

        (Self { api_base_url, timezone }, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let (config, warnings) = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.timezone.name(), "America/Bahia");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_overrides() {
        let (config, warnings) = AppConfig::from_lookup(lookup_from(&[
            (VAR_API_BASE_URL, "https://api.example.com/"),
            (VAR_TIMEZONE, "America/Sao_Paulo"),
        ]));
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.timezone, chrono_tz::America::Sao_Paulo);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unknown_timezone_warns_and_falls_back() {
        let (config, warnings) =
            AppConfig::from_lookup(lookup_from(&[(VAR_TIMEZONE, "Mars/Olympus")]));
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
        assert_eq!(warnings.len(), 1);
    }
}
