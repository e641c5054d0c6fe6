// ==========================================
// KCCR 产品目录 - 认证 API
// ==========================================
// 职责: 登录签发令牌、令牌校验 + 管理员判定
// 红线: 公开注册永久关闭；非 admin 用户不能登录
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::auth::{verify_password, AuthError, Claims, JwtService};
use crate::domain::UserSummary;
use crate::i18n::t;
use crate::repository::UserRepository;

/// 登录请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// 登录响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// 认证 API
pub struct AuthApi {
    user_repo: Arc<UserRepository>,
    jwt: JwtService,
}

impl AuthApi {
    pub fn new(user_repo: Arc<UserRepository>, jwt: JwtService) -> Self {
        Self { user_repo, jwt }
    }

    /// 公开注册（始终拒绝）
    pub fn register(&self) -> ApiResult<()> {
        Err(ApiError::Forbidden(t("auth.register_disabled")))
    }

    /// 管理员登录
    ///
    /// # 返回
    /// - 401: 用户不存在或密码错误（不区分）
    /// - 403: 非 admin 角色
    pub fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let invalid = || ApiError::Unauthorized(t("auth.invalid_credentials"));

        let email = request.email.as_deref().unwrap_or_default();
        let password = request.password.as_deref().unwrap_or_default();
        if email.is_empty() || password.is_empty() {
            return Err(invalid());
        }

        let user = self.user_repo.find_by_email(email)?.ok_or_else(invalid)?;
        if !verify_password(password, &user.password_hash) {
            warn!(email = %email, "登录失败: 密码错误");
            return Err(invalid());
        }
        if !user.is_admin() {
            warn!(email = %email, rol = ?user.rol_nombre, "登录失败: 非管理员");
            return Err(ApiError::Forbidden(t("auth.admin_only_login")));
        }

        let token = self.jwt.issue(&user)?;
        info!(user_id = user.id, "管理员登录成功");
        Ok(LoginResponse {
            token,
            user: user.to_summary(),
        })
    }

    /// 校验 `Authorization` 头并要求管理员角色
    ///
    /// # 参数
    /// - header: 原始头部值（`Bearer <token>`）
    pub fn authorize_admin(&self, header: Option<&str>) -> ApiResult<Claims> {
        let token = header
            .and_then(bearer_token)
            .ok_or(AuthError::MissingToken)?;
        let claims = self.jwt.verify(token)?;
        if !claims.is_admin() {
            return Err(AuthError::AdminOnly.into());
        }
        Ok(claims)
    }
}

/// 取出 Bearer 令牌（方案名大小写不敏感）
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
