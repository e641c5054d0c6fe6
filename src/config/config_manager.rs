// ==========================================
// KCCR 产品目录 - 配置管理器
// ==========================================
// 职责: 运行期配置查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::{
    ConfigReadError, ImportConfigReader, DEFAULT_IMPORT_BATCH_SIZE,
};
use crate::importer::header_resolver::Presence;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// 配置键
pub mod config_keys {
    pub const IMPORT_BATCH_SIZE: &str = "import_batch_size";
    pub const IMPORT_HEADER_PRESENCE: &str = "import_header_presence";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Clone)]
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, ConfigReadError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), ConfigReadError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> Result<BTreeMap<String, String>, ConfigReadError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_import_batch_size(&self) -> Result<usize, ConfigReadError> {
        let Some(raw) = self.get_global_config_value(config_keys::IMPORT_BATCH_SIZE)? else {
            return Ok(DEFAULT_IMPORT_BATCH_SIZE);
        };
        match raw.trim().parse::<usize>() {
            Ok(size) if size > 0 => Ok(size),
            _ => {
                warn!(value = %raw, "import_batch_size 非法，使用默认值");
                Ok(DEFAULT_IMPORT_BATCH_SIZE)
            }
        }
    }

    async fn get_header_presence(&self) -> Result<Presence, ConfigReadError> {
        let Some(raw) = self.get_global_config_value(config_keys::IMPORT_HEADER_PRESENCE)? else {
            return Ok(Presence::default());
        };
        match raw.parse::<Presence>() {
            Ok(p) => Ok(p),
            Err(e) => {
                warn!(error = %e, "import_header_presence 非法，使用默认值");
                Ok(Presence::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let cfg = manager();
        assert_eq!(cfg.get_import_batch_size().await.unwrap(), 200);
        assert_eq!(cfg.get_header_presence().await.unwrap(), Presence::Defined);
    }

    #[tokio::test]
    async fn test_overrides() {
        let cfg = manager();
        cfg.set_global_config_value(config_keys::IMPORT_BATCH_SIZE, "50").unwrap();
        cfg.set_global_config_value(config_keys::IMPORT_HEADER_PRESENCE, "non_empty")
            .unwrap();

        assert_eq!(cfg.get_import_batch_size().await.unwrap(), 50);
        assert_eq!(cfg.get_header_presence().await.unwrap(), Presence::NonEmpty);
        assert_eq!(cfg.get_config_snapshot().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_values_fall_back() {
        let cfg = manager();
        cfg.set_global_config_value(config_keys::IMPORT_BATCH_SIZE, "0").unwrap();
        cfg.set_global_config_value(config_keys::IMPORT_HEADER_PRESENCE, "loose")
            .unwrap();

        assert_eq!(cfg.get_import_batch_size().await.unwrap(), 200);
        assert_eq!(cfg.get_header_presence().await.unwrap(), Presence::Defined);
    }
}
