// ==========================================
// KCCR 产品目录 - 产品 Repository 实现
// ==========================================
// 存储: productos 表
// 排序: 所有列表统一 ORDER BY fabricante_marca, nombre
// ==========================================

use crate::domain::{
    FilterExpression, Page, PageRequest, Product, ProductPatch, ProductRecord, PRODUCT_FIELDS,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_repo::ProductRepository;
use crate::repository::sql_builder::SqlQueryBuilder;
use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

const ORDER_BY: &str = "fabricante_marca, nombre, id";

// ==========================================
// ProductRepositoryImpl
// ==========================================
pub struct ProductRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepositoryImpl {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn column_list() -> String {
        PRODUCT_FIELDS
            .iter()
            .map(|f| f.column())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn select_sql() -> String {
        format!("SELECT id, {} FROM productos", Self::column_list())
    }

    fn insert_sql(verb: &str) -> String {
        let placeholders = (1..=PRODUCT_FIELDS.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{} INTO productos ({}) VALUES ({})",
            verb,
            Self::column_list(),
            placeholders
        )
    }

    fn record_values(record: &ProductRecord) -> Vec<Option<String>> {
        PRODUCT_FIELDS
            .iter()
            .map(|f| record.get(*f).map(str::to_string))
            .collect()
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Product> {
        let mut record = ProductRecord::default();
        for (idx, field) in PRODUCT_FIELDS.iter().enumerate() {
            record.set(*field, row.get::<_, Option<String>>(idx + 1)?);
        }
        Ok(Product {
            id: row.get(0)?,
            record,
        })
    }

    fn query_products(
        conn: &Connection,
        builder: SqlQueryBuilder,
    ) -> RepositoryResult<Vec<Product>> {
        let (sql, values) = builder.build_with_params();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), Self::map_row)?;
        let mut products = Vec::new();
        for row in rows {
            products.push(row?);
        }
        Ok(products)
    }

    fn find_by_id_in(conn: &Connection, id: i64) -> RepositoryResult<Option<Product>> {
        let sql = format!("{} WHERE id = ?1", Self::select_sql());
        let product = conn
            .query_row(&sql, params![id], Self::map_row)
            .optional()?;
        Ok(product)
    }

    fn count_in(conn: &Connection) -> RepositoryResult<usize> {
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM productos", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

#[async_trait]
impl ProductRepository for ProductRepositoryImpl {
    async fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        Self::query_products(&conn, SqlQueryBuilder::new(&Self::select_sql()).order_by(ORDER_BY))
    }

    async fn list_paged(&self, page: PageRequest) -> RepositoryResult<Page<Product>> {
        let conn = self.get_conn()?;
        let total = Self::count_in(&conn)?;
        let items = Self::query_products(
            &conn,
            SqlQueryBuilder::new(&Self::select_sql())
                .order_by(ORDER_BY)
                .limit(page.page_size)
                .offset(page.offset()),
        )?;
        Ok(Page {
            items,
            total,
            page: page.page,
            page_size: page.page_size,
        })
    }

    async fn search(&self, filter: &FilterExpression) -> RepositoryResult<Vec<Product>> {
        let mut builder = SqlQueryBuilder::new(&Self::select_sql());
        if !filter.is_match_all() {
            let (condition, needles) = filter.to_sql();
            debug!(condition = %condition, "产品检索条件");
            builder = builder.where_with_params(
                &condition,
                needles.into_iter().map(Value::Text).collect(),
            );
        }
        let conn = self.get_conn()?;
        Self::query_products(&conn, builder.order_by(ORDER_BY))
    }

    async fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Self::count_in(&conn)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        Self::find_by_id_in(&conn, id)
    }

    async fn create(&self, record: &ProductRecord) -> RepositoryResult<Product> {
        let conn = self.get_conn()?;
        conn.execute(
            &Self::insert_sql("INSERT"),
            params_from_iter(Self::record_values(record)),
        )?;
        Ok(Product {
            id: conn.last_insert_rowid(),
            record: record.clone(),
        })
    }

    async fn update(&self, id: i64, patch: &ProductPatch) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let Some(mut product) = Self::find_by_id_in(&conn, id)? else {
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(product));
        }

        patch.apply_to(&mut product.record);

        let assignments = PRODUCT_FIELDS
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{} = ?{}", f.column(), i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE productos SET {} WHERE id = ?{}",
            assignments,
            PRODUCT_FIELDS.len() + 1
        );

        let mut values: Vec<Value> = Self::record_values(&product.record)
            .into_iter()
            .map(|v| v.map(Value::Text).unwrap_or(Value::Null))
            .collect();
        values.push(Value::Integer(id));

        conn.execute(&sql, params_from_iter(values.iter()))?;
        Ok(Some(product))
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM productos WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    async fn insert_batch(&self, records: &[ProductRecord]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(&Self::insert_sql("INSERT OR IGNORE"))?;
            for record in records {
                inserted += stmt.execute(params_from_iter(Self::record_values(record)))?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(inserted)
    }

    async fn delete_all(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM productos", [])?;
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};
    use crate::domain::{sanitize_product_payload, ProductField};
    use serde_json::json;

    fn repo() -> ProductRepositoryImpl {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        ProductRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn record(brand: &str, name: &str) -> ProductRecord {
        ProductRecord {
            brand: Some(brand.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = repo();
        let created = repo.create(&record("Acme", "Widget")).await.unwrap();
        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert!(repo.find_by_id(created.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_is_ordered() {
        let repo = repo();
        repo.create(&record("Beta", "B")).await.unwrap();
        repo.create(&record("Acme", "Z")).await.unwrap();
        repo.create(&record("Acme", "A")).await.unwrap();

        let names: Vec<_> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| format!("{}/{}", p.record.brand.unwrap(), p.record.name.unwrap()))
            .collect();
        assert_eq!(names, vec!["Acme/A", "Acme/Z", "Beta/B"]);
    }

    #[tokio::test]
    async fn test_list_paged() {
        let repo = repo();
        for i in 0..5 {
            repo.create(&record("Acme", &format!("P{}", i))).await.unwrap();
        }
        let page = repo
            .list_paged(PageRequest { page: 2, page_size: 2 })
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].record.name.as_deref(), Some("P2"));
    }

    #[tokio::test]
    async fn test_update_applies_patch_only() {
        let repo = repo();
        let mut rec = record("Acme", "Widget");
        rec.store = Some("Central".to_string());
        let created = repo.create(&rec).await.unwrap();

        let patch = sanitize_product_payload(&json!({ "nombre": "Widget 2", "existe": 1 }));
        let updated = repo.update(created.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.record.name.as_deref(), Some("Widget 2"));
        assert_eq!(updated.record.store.as_deref(), Some("Central"));

        assert!(repo.update(999, &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo();
        let created = repo.create(&record("Acme", "Widget")).await.unwrap();
        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_search_unicode_case_insensitive() {
        let repo = repo();
        let mut rec = record("Acme", "Queso");
        rec.general_category = Some("LÁCTEOS".to_string());
        repo.create(&rec).await.unwrap();
        repo.create(&record("Beta", "Pan")).await.unwrap();

        let filter = FilterExpression::contains(ProductField::GeneralCategory, "lácteos");
        let hits = repo.search(&filter).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.brand.as_deref(), Some("Acme"));

        assert_eq!(repo.search(&FilterExpression::MatchAll).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_insert_batch_and_delete_all() {
        let repo = repo();
        let records = vec![record("Acme", "A"), record("Acme", "B")];
        assert_eq!(repo.insert_batch(&records).await.unwrap(), 2);
        assert_eq!(repo.count().await.unwrap(), 2);
        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_batch_skips_duplicates_with_unique_index() {
        let repo = repo();
        repo.get_conn()
            .unwrap()
            .execute_batch(
                "CREATE UNIQUE INDEX ux_productos_marca_nombre ON productos (fabricante_marca, nombre)",
            )
            .unwrap();

        let records = vec![record("Acme", "A"), record("Acme", "A")];
        assert_eq!(repo.insert_batch(&records).await.unwrap(), 1);
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
