// ==========================================
// KCCR 产品目录 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和 API 实例
// 约束: 全进程共享一个 SQLite 连接（Arc<Mutex<Connection>>），
//       由此注入全部仓储
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::info;

use crate::api::{AuthApi, EventApi, ImportApi, NewsApi, ProductApi, UserApi};
use crate::auth::JwtService;
use crate::config::{ConfigManager, ServerConfig, DEFAULT_JWT_EXPIRE_SECS};
use crate::db::{init_schema, open_sqlite_connection};
use crate::importer::{ProductImporterImpl, UniversalFileParser};
use crate::repository::{EventRepository, NewsRepository, ProductRepositoryImpl, UserRepository};

/// 应用状态
///
/// 作为 axum Router 的共享状态（clone 只复制 Arc）
#[derive(Clone)]
pub struct AppState {
    /// 认证 API
    pub auth_api: Arc<AuthApi>,

    /// 管理员用户 API
    pub user_api: Arc<UserApi>,

    /// 产品 API
    pub product_api: Arc<ProductApi>,

    /// 产品导入 API
    pub import_api: Arc<ImportApi>,

    /// 新闻 API
    pub news_api: Arc<NewsApi>,

    /// 活动 API
    pub event_api: Arc<EventApi>,

    /// 用户仓储（启动时管理员种子使用）
    pub user_repo: Arc<UserRepository>,

    /// 运行期配置（config_kv）
    pub config_manager: ConfigManager,
}

impl AppState {
    /// 按服务配置打开数据库并初始化全部组件
    ///
    /// # 说明
    /// 1. 打开连接（统一 PRAGMA）
    /// 2. 幂等建表
    /// 3. 组装仓储、导入器与各 API
    pub fn new(config: &ServerConfig) -> rusqlite::Result<Self> {
        info!(db_path = %config.db_path, "初始化 AppState");
        let conn = open_sqlite_connection(&config.db_path)?;
        init_schema(&conn)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn)), config))
    }

    /// 基于已初始化的共享连接组装（测试可注入内存库）
    pub fn from_connection(conn: Arc<Mutex<Connection>>, config: &ServerConfig) -> Self {
        // ==========================================
        // 初始化 Repository 层
        // ==========================================
        let user_repo = Arc::new(UserRepository::from_connection(conn.clone()));
        let product_repo = Arc::new(ProductRepositoryImpl::from_connection(conn.clone()));
        let news_repo = Arc::new(NewsRepository::from_connection(conn.clone()));
        let event_repo = Arc::new(EventRepository::from_connection(conn.clone()));
        let config_manager = ConfigManager::from_connection(conn.clone());

        // ==========================================
        // 初始化导入器
        // ==========================================
        let importer = ProductImporterImpl::new(
            ProductRepositoryImpl::from_connection(conn),
            config_manager.clone(),
            Box::new(UniversalFileParser),
        );

        // ==========================================
        // 初始化 API 层
        // ==========================================
        let expire_secs = i64::try_from(config.jwt_expire_secs).unwrap_or(DEFAULT_JWT_EXPIRE_SECS as i64);
        let jwt = JwtService::new(&config.jwt_secret, expire_secs);

        Self {
            auth_api: Arc::new(AuthApi::new(user_repo.clone(), jwt)),
            user_api: Arc::new(UserApi::new(user_repo.clone())),
            product_api: Arc::new(ProductApi::new(product_repo)),
            import_api: Arc::new(ImportApi::new(Arc::new(importer))),
            news_api: Arc::new(NewsApi::new(news_repo)),
            event_api: Arc::new(EventApi::new(event_repo)),
            user_repo,
            config_manager,
        }
    }
}
