// ==========================================
// KCCR 产品目录 - 认证错误类型
// ==========================================

use thiserror::Error;

/// 认证/授权错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("缺少 Authorization 令牌")]
    MissingToken,

    #[error("令牌无效或已过期: {0}")]
    InvalidToken(String),

    #[error("仅限管理员访问")]
    AdminOnly,

    #[error("令牌签发失败: {0}")]
    TokenIssueFailed(String),

    #[error("密码哈希失败: {0}")]
    PasswordHashFailed(String),
}

pub type AuthResult<T> = Result<T, AuthError>;
