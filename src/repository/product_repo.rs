// ==========================================
// KCCR 产品目录 - 产品 Repository Trait
// ==========================================
// 职责: 定义产品数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::{FilterExpression, Page, PageRequest, Product, ProductPatch, ProductRecord};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ProductRepository Trait
// ==========================================
// 用途: 产品表访问
// 实现者: ProductRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 全量列表（按 fabricante_marca, nombre 排序）
    async fn list_all(&self) -> RepositoryResult<Vec<Product>>;

    /// 分页列表
    async fn list_paged(&self, page: PageRequest) -> RepositoryResult<Page<Product>>;

    /// 按过滤表达式检索（MatchAll 等价于全量列表）
    async fn search(&self, filter: &FilterExpression) -> RepositoryResult<Vec<Product>>;

    async fn count(&self) -> RepositoryResult<usize>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>>;

    async fn create(&self, record: &ProductRecord) -> RepositoryResult<Product>;

    /// 按 patch 局部更新
    ///
    /// # 返回
    /// - Ok(Some(Product)): 更新后的记录
    /// - Ok(None): 记录不存在
    async fn update(&self, id: i64, patch: &ProductPatch) -> RepositoryResult<Option<Product>>;

    /// 删除；返回是否确有记录被删除
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;

    /// 批量插入（一条事务，INSERT OR IGNORE）
    ///
    /// # 返回
    /// - Ok(usize): 实际插入的行数（被唯一约束跳过的不计）
    /// - Err: 数据库错误（整批回滚）
    async fn insert_batch(&self, records: &[ProductRecord]) -> RepositoryResult<usize>;

    /// 清空产品表；返回删除行数
    async fn delete_all(&self) -> RepositoryResult<usize>;
}
