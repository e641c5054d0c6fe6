// ==========================================
// KCCR 产品目录 - 配置层
// ==========================================
// 职责: 启动配置（环境变量）+ 运行期配置（config_kv 表）
// ==========================================

pub mod config_manager;
pub mod import_config_trait;
pub mod server_config;

pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::{ConfigReadError, ImportConfigReader, DEFAULT_IMPORT_BATCH_SIZE};
pub use server_config::{AdminSeed, ServerConfig, DEFAULT_JWT_EXPIRE_SECS};
