// ==========================================
// KCCR 产品目录 - API 层错误类型
// ==========================================
// 职责: 统一业务错误 → HTTP 状态码 + {message, detail?}
// 约定: message 为面向用户的本地化文本；detail 只放技术细节
// ==========================================

use crate::auth::AuthError;
use crate::i18n::{t, t_with_args};
use crate::importer::{ImportError, SheetRow};
use crate::repository::error::RepositoryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value as JsonValue};
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 客户端错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("未认证: {0}")]
    Unauthorized(String),

    #[error("无权限: {0}")]
    Forbidden(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("资源冲突: {0}")]
    Conflict(String),

    // ==========================================
    // 导入错误
    // ==========================================
    /// 没有任何有效行（回显表头与首行样例）
    #[error("导入文件没有有效行")]
    NoValidRows {
        headers: Vec<String>,
        sample_row: Option<SheetRow>,
    },

    /// 某批插入失败，携带已提交进度
    #[error("导入中断: {detail}")]
    ImportAborted {
        detail: String,
        batches_committed: usize,
        inserted_so_far: usize,
    },

    #[error("文件导入失败: {0}")]
    ImportFailed(String),

    // ==========================================
    // 服务端错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::NoValidRows { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ImportAborted { .. }
            | ApiError::ImportFailed(_)
            | ApiError::DatabaseError(_)
            | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 响应体 JSON
    pub fn to_body(&self) -> JsonValue {
        let mut body = Map::new();
        match self {
            ApiError::InvalidInput(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => {
                body.insert("message".into(), json!(msg));
            }
            ApiError::NoValidRows { headers, sample_row } => {
                body.insert("message".into(), json!(t("import.no_valid_rows")));
                body.insert("headersDetectados".into(), json!(headers));
                body.insert("ejemploFila".into(), json!(sample_row));
            }
            ApiError::ImportAborted {
                detail,
                batches_committed,
                inserted_so_far,
            } => {
                let batches = batches_committed.to_string();
                let inserted = inserted_so_far.to_string();
                body.insert(
                    "message".into(),
                    json!(t_with_args(
                        "import.partial",
                        &[("batches", &batches), ("inserted", &inserted)]
                    )),
                );
                body.insert("detail".into(), json!(detail));
                body.insert("lotesConfirmados".into(), json!(batches_committed));
                body.insert("totalInsertados".into(), json!(inserted_so_far));
            }
            ApiError::ImportFailed(detail) => {
                body.insert("message".into(), json!(t("import.failed")));
                body.insert("detail".into(), json!(detail));
            }
            ApiError::DatabaseError(detail) | ApiError::InternalError(detail) => {
                body.insert("message".into(), json!(t("common.server_error")));
                body.insert("detail".into(), json!(detail));
            }
        }
        JsonValue::Object(body)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "请求处理失败");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "请求被拒绝");
        }
        (status, Json(self.to_body())).into_response()
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::UniqueConstraintViolation(msg) => ApiError::Conflict(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("{}: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::EmptySheet => ApiError::InvalidInput(t("import.empty_sheet")),
            ImportError::NoValidRows { headers, sample_row } => {
                ApiError::NoValidRows { headers, sample_row }
            }
            ImportError::BatchInsertFailed {
                batches_committed,
                inserted_so_far,
                ..
            } => ApiError::ImportAborted {
                detail: err.to_string(),
                batches_committed,
                inserted_so_far,
            },
            ImportError::UnsupportedFormat(_) => ApiError::InvalidInput(err.to_string()),
            other => ApiError::ImportFailed(other.to_string()),
        }
    }
}

// ==========================================
// 从 AuthError 转换
// ==========================================
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => ApiError::Unauthorized(t("auth.missing_token")),
            AuthError::InvalidToken(_) => ApiError::Unauthorized(t("auth.invalid_token")),
            AuthError::AdminOnly => ApiError::Forbidden(t("auth.admin_only")),
            AuthError::TokenIssueFailed(msg) | AuthError::PasswordHashFailed(msg) => {
                ApiError::InternalError(msg)
            }
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
