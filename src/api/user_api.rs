// ==========================================
// KCCR 产品目录 - 管理员用户 API
// ==========================================
// 职责: 管理员账号的增删改查（只会创建 admin 角色用户）
// 红线: 不能删除自己；email 全局唯一
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::MessageResponse;
use crate::api::validator::{optional_text, parse_positive_id, required_text};
use crate::auth::hash_password;
use crate::domain::{NewUser, UserSummary, UserUpdate, ADMIN_ROLE};
use crate::i18n::t;
use crate::repository::UserRepository;

/// 新建管理员请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// 更新请求（缺失字段保持不变；空密码忽略）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// 新建响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub message: String,
    pub usuario: UserSummary,
}

/// 用户 API
pub struct UserApi {
    user_repo: Arc<UserRepository>,
}

impl UserApi {
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// 新建管理员
    ///
    /// # 返回
    /// - 400: nombre / email / password 任一缺失
    /// - 409: email 已存在
    pub fn create_user(&self, request: &CreateUserRequest) -> ApiResult<CreateUserResponse> {
        let (Some(nombre), Some(email), Some(password)) = (
            required_text(request.nombre.as_deref()),
            required_text(request.email.as_deref()),
            optional_text(request.password.clone()),
        ) else {
            return Err(ApiError::InvalidInput(t("user.required_fields")));
        };

        if self.user_repo.find_by_email(&email)?.is_some() {
            return Err(ApiError::Conflict(t("user.email_taken")));
        }

        let role = self
            .user_repo
            .find_role_by_name(ADMIN_ROLE)?
            .ok_or_else(|| ApiError::InternalError(t("user.admin_role_missing")))?;

        let user = self.user_repo.create(&NewUser {
            nombre,
            email,
            password_hash: hash_password(&password)?,
            rol_id: role.id,
        })?;
        info!(user_id = user.id, "管理员已创建");

        Ok(CreateUserResponse {
            message: t("user.created"),
            usuario: user.to_summary(),
        })
    }

    /// 全部用户（按 id 升序）
    pub fn list_users(&self) -> ApiResult<Vec<UserSummary>> {
        Ok(self
            .user_repo
            .list()?
            .iter()
            .map(|u| u.to_summary())
            .collect())
    }

    /// 更新用户
    ///
    /// # 返回
    /// - 400: id 非正整数
    /// - 409: email 已被其他用户占用
    /// - 404: 用户不存在
    pub fn update_user(&self, raw_id: &str, request: &UpdateUserRequest) -> ApiResult<UserSummary> {
        let id = parse_positive_id(raw_id).ok_or_else(|| ApiError::InvalidInput(t("common.invalid_id")))?;

        let email = optional_text(request.email.clone());
        if let Some(email) = &email {
            if self.user_repo.email_taken_by_other(email, id)? {
                return Err(ApiError::Conflict(t("user.email_taken")));
            }
        }

        let password_hash = match optional_text(request.password.clone()) {
            Some(password) => Some(hash_password(&password)?),
            None => None,
        };

        let update = UserUpdate {
            nombre: request.nombre.clone(),
            email,
            password_hash,
        };
        let user = self
            .user_repo
            .update(id, &update)?
            .ok_or_else(|| ApiError::NotFound(t("user.not_found")))?;
        info!(user_id = id, "用户已更新");
        Ok(user.to_summary())
    }

    /// 删除用户
    ///
    /// # 参数
    /// - caller_id: 当前登录管理员（不能删除自己）
    pub fn delete_user(&self, raw_id: &str, caller_id: i64) -> ApiResult<MessageResponse> {
        let id = parse_positive_id(raw_id).ok_or_else(|| ApiError::InvalidInput(t("common.invalid_id")))?;
        if id == caller_id {
            return Err(ApiError::InvalidInput(t("user.cannot_delete_self")));
        }
        if !self.user_repo.delete(id)? {
            return Err(ApiError::NotFound(t("user.not_found")));
        }
        info!(user_id = id, caller_id, "用户已删除");
        Ok(MessageResponse::new(t("user.deleted")))
    }
}
