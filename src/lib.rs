// ==========================================
// KCCR 产品目录 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite
// 系统定位: 产品目录与新闻后台（管理端 + 门户只读接口）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "es");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 认证 - 密码与令牌
pub mod auth;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    Event, FilterExpression, ImportSummary, News, NewsDestination, Product, ProductField,
    ProductRecord,
};

// 导入
pub use importer::{ProductImporter, ProductImporterImpl, SheetSelector};

// API
pub use api::{ApiError, ApiResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "KCCR 产品目录";
