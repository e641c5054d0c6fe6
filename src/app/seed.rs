// ==========================================
// KCCR 产品目录 - 启动种子数据
// ==========================================
// 职责: 确保 admin 角色与至少一个管理员用户存在
// 约束: 幂等；已有任一 admin 用户时不做任何写入
// ==========================================

use tracing::info;

use crate::auth::hash_password;
use crate::config::AdminSeed;
use crate::domain::user::ADMIN_ROLE_DESCRIPTION;
use crate::domain::{NewUser, ADMIN_ROLE};
use crate::repository::UserRepository;

/// 种子执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// 已存在管理员（返回其 email）
    AlreadyPresent(String),
    /// 新建了默认管理员
    Created(String),
}

/// 确保默认管理员存在
pub fn ensure_admin_user(user_repo: &UserRepository, seed: &AdminSeed) -> anyhow::Result<SeedOutcome> {
    info!("检查默认管理员角色与用户");

    let role = match user_repo.find_role_by_name(ADMIN_ROLE)? {
        Some(role) => role,
        None => {
            let role = user_repo.create_role(ADMIN_ROLE, Some(ADMIN_ROLE_DESCRIPTION))?;
            info!(role_id = role.id, "已创建 admin 角色");
            role
        }
    };

    if let Some(existing) = user_repo.find_first_by_role(role.id)? {
        info!(email = %existing.email, "已存在管理员用户");
        return Ok(SeedOutcome::AlreadyPresent(existing.email));
    }

    let password_hash = hash_password(&seed.password)?;
    let user = user_repo.create(&NewUser {
        nombre: seed.name.clone(),
        email: seed.email.clone(),
        password_hash,
        rol_id: role.id,
    })?;
    info!(user_id = user.id, email = %user.email, "已创建默认管理员");
    Ok(SeedOutcome::Created(user.email))
}
