use std::fmt;

use churchhub_shared::FieldErrors;
use churchhub_shared::protocol::ApiErrorBody;

// =========================================================
// 错误类型枚举
// =========================================================

/// 错误类型枚举
/// 区分错误来源与语义，决定界面如何呈现
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminErrorKind {
    /// 客户端表单校验失败（不会发出请求）
    Validation,
    /// 400: 后端返回字段级错误
    BackendValidation,
    /// 401/403: 凭据错误或令牌无效
    Auth,
    /// 令牌校验返回 `valid: false`
    SessionExpired,
    /// 请求未完成（断网、CORS、DNS 等）
    Network,
    /// 其他非 2xx 响应
    NotFoundOrConflict,
    /// 2xx 响应体不符合约定结构
    Decode,
    /// 上传文件类型不被接受
    InvalidFileType,
    /// 上传文件超过大小上限
    FileTooLarge,
}

impl AdminErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            AdminErrorKind::Validation => "VALIDATION",
            AdminErrorKind::BackendValidation => "BACKEND_VALIDATION",
            AdminErrorKind::Auth => "AUTH",
            AdminErrorKind::SessionExpired => "SESSION_EXPIRED",
            AdminErrorKind::Network => "NETWORK",
            AdminErrorKind::NotFoundOrConflict => "NOT_FOUND_OR_CONFLICT",
            AdminErrorKind::Decode => "DECODE",
            AdminErrorKind::InvalidFileType => "INVALID_FILE_TYPE",
            AdminErrorKind::FileTooLarge => "FILE_TOO_LARGE",
        }
    }
}

/// 错误信息由谁给出
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOrigin {
    /// 后端响应体中的 `error` / `message`
    Server,
    /// 客户端生成
    Local,
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "session.login", "api.call"
    pub operation: String,
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 管理端统一错误
///
/// - kind: 错误语义
/// - message: 面向用户的消息
/// - origin: 消息来源（服务端 / 本地）
/// - field_errors: 字段级错误（校验类错误）
/// - spans: 结构化的调用追踪栈
#[derive(Debug, Clone, PartialEq)]
pub struct AdminError {
    pub kind: AdminErrorKind,
    pub message: String,
    pub origin: ErrorOrigin,
    pub field_errors: FieldErrors,
    /// HTTP 状态码（仅服务端错误）
    status: Option<u16>,
    spans: Vec<ErrorSpan>,
}

impl AdminError {
    pub fn new(kind: AdminErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            origin: ErrorOrigin::Local,
            field_errors: FieldErrors::new(),
            status: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    /// 客户端校验失败；消息取第一个字段错误
    pub fn validation(field_errors: FieldErrors) -> Self {
        let message = field_errors
            .iter()
            .next()
            .map(|(_, msg)| msg.to_string())
            .unwrap_or_else(|| "Please fix the highlighted fields".to_string());
        Self {
            field_errors,
            ..Self::new(AdminErrorKind::Validation, message)
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(AdminErrorKind::Auth, message)
    }

    pub fn session_expired() -> Self {
        Self::new(AdminErrorKind::SessionExpired, "Session expired")
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AdminErrorKind::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(AdminErrorKind::Decode, message)
    }

    pub fn invalid_file_type() -> Self {
        Self::new(
            AdminErrorKind::InvalidFileType,
            "Please select a valid image file",
        )
    }

    pub fn file_too_large(limit_label: &str) -> Self {
        Self::new(
            AdminErrorKind::FileTooLarge,
            format!("Image file size must be less than {limit_label}"),
        )
    }

    /// 将非 2xx 响应映射为错误
    ///
    /// 401/403 -> Auth；400 且带 `details` -> BackendValidation；其余 -> NotFoundOrConflict。
    /// 响应体不是 JSON 时保留状态码，消息留空，由调用方提供兜底文案。
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();

        let kind = match status {
            401 | 403 => AdminErrorKind::Auth,
            400 if !parsed.details.is_empty() => AdminErrorKind::BackendValidation,
            _ => AdminErrorKind::NotFoundOrConflict,
        };

        let field_errors = parsed
            .details
            .iter()
            .map(|d| (d.field.clone(), d.message.clone()))
            .collect::<FieldErrors>();

        let (message, origin) = match parsed.text() {
            Some(text) => (text.to_string(), ErrorOrigin::Server),
            None => (format!("Request failed with status {status}"), ErrorOrigin::Local),
        };

        Self {
            kind,
            message,
            origin,
            field_errors,
            status: Some(status),
            spans: Vec::new(),
        }
    }

    // --- Context builders (Builder Pattern) ---

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn is_auth(&self) -> bool {
        matches!(
            self.kind,
            AdminErrorKind::Auth | AdminErrorKind::SessionExpired
        )
    }

    /// 服务端给出消息时使用之，否则使用界面自己的兜底文案
    ///
    /// 本地错误（校验、上传检查）的消息本身就是面向用户的，直接返回。
    pub fn message_or(&self, fallback: &str) -> String {
        match (self.origin, self.kind) {
            (ErrorOrigin::Server, _) => self.message.clone(),
            (
                ErrorOrigin::Local,
                AdminErrorKind::Validation
                | AdminErrorKind::InvalidFileType
                | AdminErrorKind::FileTooLarge,
            ) => self.message.clone(),
            _ => fallback.to_string(),
        }
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for AdminError {}

pub type AdminResult<T> = std::result::Result<T, AdminError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<serde_json::Error> for AdminError {
    fn from(e: serde_json::Error) -> Self {
        AdminError::decode(e.to_string())
    }
}

impl From<FieldErrors> for AdminError {
    fn from(errors: FieldErrors) -> Self {
        AdminError::validation(errors)
    }
}
