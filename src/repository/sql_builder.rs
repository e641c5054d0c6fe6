// ==========================================
// KCCR 产品目录 - SQL 构建工具
// ==========================================
// 职责: 动态 WHERE / ORDER BY / LIMIT 拼装，参数与占位符同步收集
// 红线: 只拼接调用方给定的列名/片段，值一律走绑定参数
// ==========================================

use rusqlite::types::Value;

/// SQL 查询构建器（流式 API）
///
/// # 示例
/// ```
/// use kccr_catalog::repository::sql_builder::SqlQueryBuilder;
/// use rusqlite::types::Value;
///
/// let (sql, params) = SqlQueryBuilder::new("SELECT * FROM productos")
///     .where_with_params("tienda = ?", vec![Value::Text("Central".into())])
///     .order_by("fabricante_marca, nombre")
///     .limit(10)
///     .offset(20)
///     .build_with_params();
///
/// assert_eq!(
///     sql,
///     "SELECT * FROM productos WHERE tienda = ? ORDER BY fabricante_marca, nombre LIMIT 10 OFFSET 20"
/// );
/// assert_eq!(params.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlQueryBuilder {
    select_clause: String,
    where_clauses: Vec<String>,
    params: Vec<Value>,
    order_by_clause: Option<String>,
    limit_clause: Option<usize>,
    offset_clause: Option<usize>,
}

impl SqlQueryBuilder {
    /// 创建新的 SQL 查询构建器
    pub fn new(select: &str) -> Self {
        Self {
            select_clause: select.to_string(),
            ..Default::default()
        }
    }

    /// 添加带绑定参数的 WHERE 条件（参数顺序与 `?` 占位符一致）
    pub fn where_with_params(mut self, condition: &str, params: Vec<Value>) -> Self {
        self.where_clauses.push(condition.to_string());
        self.params.extend(params);
        self
    }

    /// 添加 ORDER BY 子句
    pub fn order_by(mut self, order: &str) -> Self {
        self.order_by_clause = Some(order.to_string());
        self
    }

    /// 添加 LIMIT 子句
    pub fn limit(mut self, n: usize) -> Self {
        self.limit_clause = Some(n);
        self
    }

    /// 添加 OFFSET 子句（仅在设置了 LIMIT 时生效）
    pub fn offset(mut self, n: usize) -> Self {
        self.offset_clause = Some(n);
        self
    }

    /// 构建最终的 SQL 语句
    pub fn build(&self) -> String {
        let mut sql = self.select_clause.clone();

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(order) = &self.order_by_clause {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        if let Some(n) = self.limit_clause {
            sql.push_str(&format!(" LIMIT {}", n));
            if let Some(off) = self.offset_clause {
                sql.push_str(&format!(" OFFSET {}", off));
            }
        }

        sql
    }

    /// 构建 SQL 并取出绑定参数
    pub fn build_with_params(self) -> (String, Vec<Value>) {
        let sql = self.build();
        (sql, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_select() {
        let sql = SqlQueryBuilder::new("SELECT id FROM eventos").build();
        assert_eq!(sql, "SELECT id FROM eventos");
    }

    #[test]
    fn test_conditions_are_anded_in_order() {
        let (sql, params) = SqlQueryBuilder::new("SELECT id FROM eventos")
            .where_with_params("inicio >= ?", vec![Value::Text("2025-01-01".into())])
            .where_with_params("inicio <= ?", vec![Value::Text("2025-12-31".into())])
            .order_by("inicio ASC")
            .build_with_params();

        assert_eq!(
            sql,
            "SELECT id FROM eventos WHERE inicio >= ? AND inicio <= ? ORDER BY inicio ASC"
        );
        assert_eq!(
            params,
            vec![
                Value::Text("2025-01-01".into()),
                Value::Text("2025-12-31".into())
            ]
        );
    }

    #[test]
    fn test_offset_requires_limit() {
        let sql = SqlQueryBuilder::new("SELECT id FROM productos").offset(10).build();
        assert_eq!(sql, "SELECT id FROM productos");
    }
}
