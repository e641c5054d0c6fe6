// ==========================================
// KCCR 产品目录 - 认证层
// ==========================================
// 职责: 密码哈希、JWT 签发与校验
// 红线: 只有 admin 角色可登录；密码哈希永不出现在响应中
// ==========================================

pub mod error;
pub mod jwt;
pub mod password;

pub use error::{AuthError, AuthResult};
pub use jwt::{Claims, JwtService};
pub use password::{hash_password, verify_password};
