// ==========================================
// KCCR 产品目录 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod event_repo;
pub mod news_repo;
pub mod product_repo;
pub mod product_repo_impl;
pub mod sql_builder;
pub mod user_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use event_repo::EventRepository;
pub use news_repo::NewsRepository;
pub use product_repo::ProductRepository;
pub use product_repo_impl::ProductRepositoryImpl;
pub use sql_builder::SqlQueryBuilder;
pub use user_repo::UserRepository;
