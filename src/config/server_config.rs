// ==========================================
// KCCR 产品目录 - 服务启动配置
// ==========================================
// 来源: 环境变量（进程启动时读取一次）
// 红线: 非法值不中断启动，记录告警后回退默认值
// ==========================================

use crate::db::{get_default_db_path, DB_PATH_ENV};
use crate::i18n::DEFAULT_LOCALE;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{info, warn};

/// JWT 默认有效期: 7 天
pub const DEFAULT_JWT_EXPIRE_SECS: u64 = 7 * 24 * 60 * 60;

pub mod env_keys {
    pub const PORT: &str = "PORT";
    pub const JWT_SECRET: &str = "JWT_SECRET";
    pub const JWT_EXPIRE_SECS: &str = "JWT_EXPIRE_SECS";
    pub const DEFAULT_ADMIN_NAME: &str = "DEFAULT_ADMIN_NAME";
    pub const DEFAULT_ADMIN_EMAIL: &str = "DEFAULT_ADMIN_EMAIL";
    pub const DEFAULT_ADMIN_PASSWORD: &str = "DEFAULT_ADMIN_PASSWORD";
    pub const DEFAULT_LOCALE: &str = "DEFAULT_LOCALE";
}

// ==========================================
// AdminSeed - 启动时确保存在的管理员
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

// ==========================================
// ServerConfig - 服务配置
// ==========================================
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expire_secs: u64,
    pub db_path: String,
    pub admin: AdminSeed,
    pub locale: String,
}

impl ServerConfig {
    /// 从进程环境变量加载
    pub fn load() -> Self {
        Self::load_with(|key| env::var(key).ok())
    }

    /// 从任意键值来源加载（测试可注入）
    pub fn load_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = match lookup(DB_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            Some(path) => path,
            None => get_default_db_path(),
        };

        let jwt_secret = string_or(&lookup, env_keys::JWT_SECRET, "cambia_esto");
        if jwt_secret == "cambia_esto" {
            warn!("JWT_SECRET 使用默认值，生产环境必须覆盖");
        }

        Self {
            port: parse_or(&lookup, env_keys::PORT, 4000),
            jwt_secret,
            jwt_expire_secs: parse_or(&lookup, env_keys::JWT_EXPIRE_SECS, DEFAULT_JWT_EXPIRE_SECS),
            db_path,
            admin: AdminSeed {
                name: string_or(&lookup, env_keys::DEFAULT_ADMIN_NAME, "Admin"),
                email: string_or(&lookup, env_keys::DEFAULT_ADMIN_EMAIL, "admin@kccr.com"),
                password: string_or(&lookup, env_keys::DEFAULT_ADMIN_PASSWORD, "Admin123!"),
            },
            locale: string_or(&lookup, env_keys::DEFAULT_LOCALE, DEFAULT_LOCALE),
        }
    }
}

fn string_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(v) => v,
        None => {
            info!("{key} 未设置，使用默认值");
            default.to_string()
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        info!("{key} 未设置，使用默认值: {default}");
        return default;
    };
    match raw.trim().parse() {
        Ok(v) => v,
        Err(e) => {
            warn!("{key} 取值非法 ({raw}): {e}，使用默认值: {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = ServerConfig::load_with(lookup_from(&[(DB_PATH_ENV, "/tmp/kccr-test.db")]));
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.jwt_secret, "cambia_esto");
        assert_eq!(cfg.jwt_expire_secs, DEFAULT_JWT_EXPIRE_SECS);
        assert_eq!(cfg.db_path, "/tmp/kccr-test.db");
        assert_eq!(cfg.admin.email, "admin@kccr.com");
        assert_eq!(cfg.admin.password, "Admin123!");
        assert_eq!(cfg.locale, "es");
    }

    #[test]
    fn test_overrides_and_invalid_port() {
        let cfg = ServerConfig::load_with(lookup_from(&[
            (DB_PATH_ENV, "/tmp/kccr-test.db"),
            (env_keys::PORT, "abc"),
            (env_keys::JWT_SECRET, "s3cret"),
            (env_keys::JWT_EXPIRE_SECS, "60"),
            (env_keys::DEFAULT_ADMIN_EMAIL, " root@kccr.com "),
        ]));
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.jwt_secret, "s3cret");
        assert_eq!(cfg.jwt_expire_secs, 60);
        assert_eq!(cfg.admin.email, "root@kccr.com");
    }
}
