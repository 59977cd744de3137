//! 运行时配置
//!
//! 所有配置在编译期通过环境变量注入（Trunk 构建时设置），缺省值见 `DEFAULT_*`。

// =========================================================
// 常量定义
// =========================================================
const DEFAULT_API_URL: &str = "http://localhost:3000/api";
const DEFAULT_TOKEN_KEY: &str = "authToken";
const DEFAULT_MAX_UPLOAD_MB: u64 = 5;
const DEFAULT_NOTICE_TTL_MS: u32 = 3_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 后端 API 根地址（不含末尾 `/`）
    pub api_url: String,
    /// LocalStorage 中保存令牌的键
    pub token_key: String,
    /// 上传大小上限（字节）
    pub max_upload_bytes: u64,
    /// 成功提示的显示时长（毫秒）
    pub notice_ttl_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            notice_ttl_ms: DEFAULT_NOTICE_TTL_MS,
        }
    }
}

impl AppConfig {
    /// 从编译期环境变量构建
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("CHURCHHUB_API_URL"),
            option_env!("CHURCHHUB_TOKEN_KEY"),
            option_env!("CHURCHHUB_MAX_UPLOAD_MB"),
            option_env!("CHURCHHUB_NOTICE_TTL_MS"),
        )
    }

    /// 无法解析的值回退到缺省值，并记录警告
    fn from_values(
        api_url: Option<&str>,
        token_key: Option<&str>,
        max_upload_mb: Option<&str>,
        notice_ttl_ms: Option<&str>,
    ) -> Self {
        let mut config = Self::default();

        if let Some(url) = api_url.map(str::trim).filter(|s| !s.is_empty()) {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(key) = token_key.map(str::trim).filter(|s| !s.is_empty()) {
            config.token_key = key.to_string();
        }
        if let Some(raw) = max_upload_mb {
            match raw.trim().parse::<u64>() {
                Ok(mb) if mb > 0 => config.max_upload_bytes = mb * 1024 * 1024,
                _ => log_warn!("[Config] Ignoring CHURCHHUB_MAX_UPLOAD_MB={}", raw),
            }
        }
        if let Some(raw) = notice_ttl_ms {
            match raw.trim().parse::<u32>() {
                Ok(ms) => config.notice_ttl_ms = ms,
                Err(_) => log_warn!("[Config] Ignoring CHURCHHUB_NOTICE_TTL_MS={}", raw),
            }
        }

        config
    }

    /// 上传上限的展示文本，如 "5MB"
    pub fn max_upload_label(&self) -> String {
        format!("{}MB", self.max_upload_bytes / (1024 * 1024))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_values(None, None, None, None);
        assert_eq!(config.token_key, "authToken");
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.notice_ttl_ms, 3_000);
        assert_eq!(config.max_upload_label(), "5MB");
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = AppConfig::from_values(
            Some("https://api.example.org/api/"),
            Some("token"),
            Some("10"),
            Some("1500"),
        );
        assert_eq!(config.api_url, "https://api.example.org/api");
        assert_eq!(config.token_key, "token");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.notice_ttl_ms, 1500);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = AppConfig::from_values(Some("  "), Some(""), Some("lots"), Some("-1"));
        assert_eq!(config, AppConfig::default());
    }
}
