// ==========================================
// KCCR 产品目录 - 用户与角色领域模型
// ==========================================
// 红线: 系统只认 "admin" 角色
// ==========================================

use serde::{Deserialize, Serialize};

/// 唯一有意义的角色名
pub const ADMIN_ROLE: &str = "admin";

/// 管理员角色描述（种子数据）
pub const ADMIN_ROLE_DESCRIPTION: &str = "Administrador del sistema";

// ==========================================
// Role - 角色
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
}

// ==========================================
// User - 用户（含密码哈希，仅服务端使用）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    pub password_hash: String,
    pub rol_id: i64,
    pub rol_nombre: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.rol_nombre.as_deref() == Some(ADMIN_ROLE)
    }

    /// 对外视图（不含密码哈希）
    pub fn to_summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            nombre: self.nombre.clone(),
            email: self.email.clone(),
            rol: self.rol_nombre.clone(),
        }
    }
}

/// 用户对外视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    pub rol: Option<String>,
}

/// 新建用户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub nombre: String,
    pub email: String,
    pub password_hash: String,
    pub rol_id: i64,
}

/// 用户更新（None = 保持不变）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub nombre: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}
