// ==========================================
// KCCR 产品目录 - 清空产品表
// ==========================================
// 用法: clear_products（数据库路径取 KCCR_DB_PATH）
// ==========================================

use std::sync::{Arc, Mutex};

use anyhow::Context;

use kccr_catalog::config::ServerConfig;
use kccr_catalog::db::{init_schema, open_sqlite_connection};
use kccr_catalog::logging;
use kccr_catalog::repository::{ProductRepository, ProductRepositoryImpl};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let config = ServerConfig::load();

    let conn = open_sqlite_connection(&config.db_path)
        .with_context(|| format!("无法打开数据库: {}", config.db_path))?;
    init_schema(&conn)?;

    let repo = ProductRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)));
    let deleted = repo.delete_all().await.context("清空产品表失败")?;

    println!("已删除产品: {}", deleted);
    Ok(())
}
