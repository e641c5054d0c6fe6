// ==========================================
// KCCR 产品目录 - 产品检索过滤表达式
// ==========================================
// 职责: 与存储无关的过滤树，可渲染为参数化 SQL，也可在内存中求值
// 语义: Contains 为 Unicode 大小写不敏感的子串匹配；字段为空时不匹配
// ==========================================

use crate::domain::product::{ProductField, ProductRecord};

/// SQL 中使用的大小写不敏感匹配函数（由 db 模块在每个连接上注册）
pub const CONTAINS_CI_FN: &str = "contains_ci";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterExpression {
    /// 不过滤
    #[default]
    MatchAll,
    Contains { field: ProductField, needle: String },
    And(Vec<FilterExpression>),
    Or(Vec<FilterExpression>),
}

impl FilterExpression {
    pub fn contains(field: ProductField, needle: impl Into<String>) -> Self {
        FilterExpression::Contains {
            field,
            needle: needle.into(),
        }
    }

    /// 多个字段任一包含 needle
    pub fn any_field_contains(fields: &[ProductField], needle: &str) -> Self {
        match fields {
            [single] => Self::contains(*single, needle),
            _ => FilterExpression::Or(
                fields
                    .iter()
                    .map(|f| Self::contains(*f, needle))
                    .collect(),
            ),
        }
    }

    /// AND 组合；MatchAll 子项被吸收，空集合退化为 MatchAll
    pub fn all(parts: Vec<FilterExpression>) -> Self {
        let mut parts: Vec<_> = parts.into_iter().filter(|p| !p.is_match_all()).collect();
        match parts.len() {
            0 => FilterExpression::MatchAll,
            1 => parts.remove(0),
            _ => FilterExpression::And(parts),
        }
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, FilterExpression::MatchAll)
    }

    /// 在内存中对一条记录求值
    pub fn matches(&self, record: &ProductRecord) -> bool {
        match self {
            FilterExpression::MatchAll => true,
            FilterExpression::Contains { field, needle } => record
                .get(*field)
                .is_some_and(|value| value.to_lowercase().contains(&needle.to_lowercase())),
            FilterExpression::And(parts) => parts.iter().all(|p| p.matches(record)),
            FilterExpression::Or(parts) => parts.iter().any(|p| p.matches(record)),
        }
    }

    /// 渲染为 SQL 条件片段与按序绑定的参数
    pub fn to_sql(&self) -> (String, Vec<String>) {
        let mut params = Vec::new();
        let sql = self.render(&mut params);
        (sql, params)
    }

    fn render(&self, params: &mut Vec<String>) -> String {
        match self {
            FilterExpression::MatchAll => "1 = 1".to_string(),
            FilterExpression::Contains { field, needle } => {
                params.push(needle.clone());
                format!("{}({}, ?)", CONTAINS_CI_FN, field.column())
            }
            FilterExpression::And(parts) => Self::render_group(parts, " AND ", "1 = 1", params),
            FilterExpression::Or(parts) => Self::render_group(parts, " OR ", "0 = 1", params),
        }
    }

    fn render_group(
        parts: &[FilterExpression],
        joiner: &str,
        empty: &str,
        params: &mut Vec<String>,
    ) -> String {
        if parts.is_empty() {
            return empty.to_string();
        }
        let rendered: Vec<String> = parts.iter().map(|p| p.render(params)).collect();
        format!("({})", rendered.join(joiner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(brand: &str, name: &str) -> ProductRecord {
        ProductRecord {
            brand: Some(brand.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_all_absorbs_match_all() {
        assert_eq!(FilterExpression::all(vec![]), FilterExpression::MatchAll);

        let single = FilterExpression::contains(ProductField::Name, "x");
        assert_eq!(
            FilterExpression::all(vec![FilterExpression::MatchAll, single.clone()]),
            single
        );
    }

    #[test]
    fn test_matches_case_insensitive() {
        let expr = FilterExpression::contains(ProductField::Brand, "ÁCME");
        assert!(expr.matches(&record("ácme foods", "Widget")));
        assert!(!expr.matches(&record("Beta", "Widget")));
    }

    #[test]
    fn test_null_field_never_matches() {
        let expr = FilterExpression::contains(ProductField::Store, "central");
        assert!(!expr.matches(&record("Acme", "Widget")));
    }

    #[test]
    fn test_to_sql_nesting_and_params() {
        let expr = FilterExpression::all(vec![
            FilterExpression::any_field_contains(
                &[ProductField::GeneralCategory, ProductField::SubCategory],
                "lacteos",
            ),
            FilterExpression::contains(ProductField::Store, "central"),
        ]);

        let (sql, params) = expr.to_sql();
        assert_eq!(
            sql,
            "((contains_ci(cat_general, ?) OR contains_ci(categoria1, ?)) AND contains_ci(tienda, ?))"
        );
        assert_eq!(params, vec!["lacteos", "lacteos", "central"]);
    }
}
