// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、共享连接、导入器与测试文件构造
// ==========================================

#![allow(dead_code)]

use std::error::Error;
use std::io::Write;
use std::sync::{Arc, Mutex};

use kccr_catalog::config::{ConfigManager, ServerConfig};
use kccr_catalog::db::{init_schema, open_sqlite_connection};
use kccr_catalog::importer::{ProductImporterImpl, UniversalFileParser};
use kccr_catalog::repository::ProductRepositoryImpl;
use rusqlite::Connection;
use tempfile::NamedTempFile;

pub type TestImporter = ProductImporterImpl<ProductRepositoryImpl, ConfigManager>;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接（与服务端一致的 PRAGMA）
pub fn open_shared(db_path: &str) -> Arc<Mutex<Connection>> {
    let conn = open_sqlite_connection(db_path).expect("Failed to open db");
    Arc::new(Mutex::new(conn))
}

/// 基于共享连接构造导入器
pub fn build_importer(conn: Arc<Mutex<Connection>>) -> TestImporter {
    ProductImporterImpl::new(
        ProductRepositoryImpl::from_connection(conn.clone()),
        ConfigManager::from_connection(conn),
        Box::new(UniversalFileParser),
    )
}

/// 测试用服务配置（固定 JWT 密钥与管理员种子）
pub fn test_server_config(db_path: &str) -> ServerConfig {
    let db_path = db_path.to_string();
    ServerConfig::load_with(move |key| match key {
        "KCCR_DB_PATH" => Some(db_path.clone()),
        "JWT_SECRET" => Some("test-secret".to_string()),
        _ => None,
    })
}

/// 写入临时 CSV 文件
pub fn write_csv(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("Failed to create temp csv");
    file.write_all(content.as_bytes()).expect("Failed to write csv");
    file
}

/// 产品表行数
pub fn count_products(conn: &Arc<Mutex<Connection>>) -> i64 {
    conn.lock()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM productos", [], |row| row.get(0))
        .expect("Failed to count products")
}
