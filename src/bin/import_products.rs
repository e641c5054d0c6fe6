// ==========================================
// KCCR 产品目录 - 离线产品导入工具
// ==========================================
// 用法: import_products <文件> [--sheet 名称]
// 默认优先工作表 "Final_02-26"，不存在时取第一张
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context};

use kccr_catalog::config::{ConfigManager, ServerConfig};
use kccr_catalog::db::{init_schema, open_sqlite_connection};
use kccr_catalog::importer::{ProductImporter, ProductImporterImpl, SheetSelector, UniversalFileParser};
use kccr_catalog::logging;
use kccr_catalog::repository::{ProductRepository, ProductRepositoryImpl};

/// 默认优先读取的工作表
const PREFERRED_SHEET: &str = "Final_02-26";

struct Args {
    file: PathBuf,
    sheet: SheetSelector,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut file = None;
    let mut sheet = SheetSelector::Prefer(PREFERRED_SHEET.to_string());

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sheet" => {
                let name = args.next().context("--sheet 需要工作表名称")?;
                sheet = SheetSelector::Named(name);
            }
            other if file.is_none() => file = Some(PathBuf::from(other)),
            other => bail!("无法识别的参数: {}", other),
        }
    }

    let Some(file) = file else {
        bail!("用法: import_products <文件> [--sheet 名称]");
    };
    Ok(Args { file, sheet })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let args = parse_args()?;
    let config = ServerConfig::load();

    let conn = open_sqlite_connection(&config.db_path)
        .with_context(|| format!("无法打开数据库: {}", config.db_path))?;
    init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let product_repo = ProductRepositoryImpl::from_connection(conn.clone());
    let importer = ProductImporterImpl::new(
        ProductRepositoryImpl::from_connection(conn.clone()),
        ConfigManager::from_connection(conn),
        Box::new(UniversalFileParser),
    );

    println!("导入文件: {}", args.file.display());
    let summary = importer
        .import_from_path(&args.file, &args.sheet)
        .await
        .context("产品导入失败")?;

    println!("导入完成");
    println!("  总行数:   {}", summary.total_rows);
    println!("  有效行:   {}", summary.total_valid);
    println!("  丢弃行:   {}", summary.total_rejected);
    println!("  插入行:   {}", summary.total_inserted);
    println!("  批次数:   {}", summary.batches);
    println!("  表内总数: {}", product_repo.count().await?);
    Ok(())
}
