// ==========================================
// KCCR 产品目录 - JWT 服务
// ==========================================
// 算法: HS256，共享密钥来自 ServerConfig
// 载荷: { id, email, rolId, rol, iat, exp }（与旧前端保持一致）
// ==========================================

use crate::auth::error::{AuthError, AuthResult};
use crate::domain::{User, ADMIN_ROLE};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// 令牌载荷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// 用户 ID
    pub id: i64,
    pub email: String,
    pub rol_id: i64,
    /// 角色名（签发时快照）
    pub rol: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.rol.as_deref() == Some(ADMIN_ROLE)
    }
}

/// JWT 签发与校验
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expire_secs: i64,
}

impl JwtService {
    pub fn new(secret: &str, expire_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            expire_secs,
        }
    }

    /// 为用户签发令牌
    pub fn issue(&self, user: &User) -> AuthResult<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            id: user.id,
            email: user.email.clone(),
            rol_id: user.rol_id,
            rol: user.rol_nombre.clone(),
            iat: now,
            exp: now + self.expire_secs,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenIssueFailed(e.to_string()))
    }

    /// 校验令牌并取出载荷（签名错误、过期均返回 InvalidToken）
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}
