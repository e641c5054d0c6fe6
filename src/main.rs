// ==========================================
// KCCR 产品目录 - HTTP 服务主入口
// ==========================================

use kccr_catalog::config::ServerConfig;
use kccr_catalog::{app, i18n, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 版本 {}", kccr_catalog::APP_NAME, kccr_catalog::VERSION);
    tracing::info!("==================================================");

    let config = ServerConfig::load();
    i18n::set_locale(&config.locale);
    tracing::info!(port = config.port, db_path = %config.db_path, locale = %config.locale, "配置加载完成");

    app::serve(config).await
}
