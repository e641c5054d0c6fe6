// ==========================================
// KCCR 产品目录 - 产品检索条件构建
// ==========================================
// 职责: 查询参数 → FilterExpression
// 红线: 无状态、无 I/O；不拼 SQL（渲染交给仓储层）
// ==========================================
// 参数规则:
// - catGeneral / categoria1 / fabricanteMarca / nombre / certifica / sello / tienda
//   各自字段子串匹配
// - categoria (legacy): catGeneral OR categoria1
// - marca (legacy): fabricanteMarca 缺失时的别名
// - atributo: atributo1..3 任一
// - q: 10 个文本字段任一
// - gf / pesaj (legacy): 仅告警，不参与过滤
// - 所有条件 AND 组合；空值视为未提供
// ==========================================

use crate::domain::product::{ProductField, ATTRIBUTE_FIELDS, TEXT_SEARCH_FIELDS};
use crate::domain::FilterExpression;
use std::collections::HashMap;
use tracing::warn;

/// 独立参数（参数名 → 字段）；fabricanteMarca 单独处理
const DIRECT_PARAMS: [(&str, ProductField); 6] = [
    ("catGeneral", ProductField::GeneralCategory),
    ("categoria1", ProductField::SubCategory),
    ("nombre", ProductField::Name),
    ("certifica", ProductField::Certification),
    ("sello", ProductField::Seal),
    ("tienda", ProductField::Store),
];

const BRAND_PARAM_ALIASES: [&str; 2] = ["fabricanteMarca", "marca"];
const LEGACY_IGNORED_PARAMS: [&str; 2] = ["gf", "pesaj"];

/// 取参数值：trim 后为空视为缺失
fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// 构建检索过滤表达式
///
/// # 参数
/// - params: 原始查询参数
///
/// # 返回
/// - FilterExpression（无任何有效条件时为 MatchAll）
pub fn build_filter(params: &HashMap<String, String>) -> FilterExpression {
    let mut parts = Vec::new();

    if let Some(categoria) = param(params, "categoria") {
        parts.push(FilterExpression::any_field_contains(
            &[ProductField::GeneralCategory, ProductField::SubCategory],
            categoria,
        ));
    }

    for (key, field) in DIRECT_PARAMS {
        if let Some(value) = param(params, key) {
            parts.push(FilterExpression::contains(field, value));
        }
    }

    // fabricanteMarca 优先，其次 legacy 的 marca；键名区分大小写，空串不算命中
    if let Some(brand) = BRAND_PARAM_ALIASES.iter().find_map(|key| param(params, key)) {
        parts.push(FilterExpression::contains(ProductField::Brand, brand));
    }

    if let Some(atributo) = param(params, "atributo") {
        parts.push(FilterExpression::any_field_contains(&ATTRIBUTE_FIELDS, atributo));
    }

    if let Some(q) = param(params, "q") {
        parts.push(FilterExpression::any_field_contains(&TEXT_SEARCH_FIELDS, q));
    }

    if LEGACY_IGNORED_PARAMS.iter().any(|k| param(params, k).is_some()) {
        warn!("收到 legacy 检索参数 (gf/pesaj)，当前结构已不使用，忽略");
    }

    FilterExpression::all(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProductRecord;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn product(brand: &str, name: &str) -> ProductRecord {
        ProductRecord {
            brand: Some(brand.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_params_match_all() {
        assert!(build_filter(&params(&[])).is_match_all());
        assert!(build_filter(&params(&[("nombre", "  "), ("gf", "1")])).is_match_all());
    }

    #[test]
    fn test_q_matches_any_text_field() {
        let filter = build_filter(&params(&[("q", "acme")]));
        assert!(filter.matches(&product("Otra", "Acme Widgets")));
        assert!(!filter.matches(&product("Beta", "Gadget")));
    }

    #[test]
    fn test_q_ignores_photo_columns() {
        let filter = build_filter(&params(&[("q", "foto.png")]));
        let mut rec = product("Beta", "Gadget");
        rec.product_photo = Some("foto.png".to_string());
        assert!(!filter.matches(&rec));
    }

    #[test]
    fn test_categoria_legacy_or() {
        let filter = build_filter(&params(&[("categoria", "Lacteos")]));

        let mut by_general = product("A", "a");
        by_general.general_category = Some("LACTEOS".to_string());
        let mut by_sub = product("B", "b");
        by_sub.sub_category = Some("Quesos y lacteos".to_string());

        assert!(filter.matches(&by_general));
        assert!(filter.matches(&by_sub));
        assert!(!filter.matches(&product("C", "c")));
    }

    #[test]
    fn test_marca_alias_and_precedence() {
        let legacy = build_filter(&params(&[("marca", "acme")]));
        assert_eq!(legacy, FilterExpression::contains(ProductField::Brand, "acme"));

        let canonical_wins = build_filter(&params(&[("fabricanteMarca", "beta"), ("marca", "acme")]));
        assert_eq!(canonical_wins, FilterExpression::contains(ProductField::Brand, "beta"));

        let empty_canonical = build_filter(&params(&[("fabricanteMarca", ""), ("marca", "acme")]));
        assert_eq!(empty_canonical, FilterExpression::contains(ProductField::Brand, "acme"));
    }

    #[test]
    fn test_brand_keys_are_case_sensitive() {
        for key in ["MARCA", "Marca", "FabricanteMarca"] {
            assert!(build_filter(&params(&[(key, "acme")])).is_match_all(), "key {key}");
        }
        let mixed = build_filter(&params(&[("MARCA", "a"), ("Marca", "b"), ("marca", "c")]));
        assert_eq!(mixed, FilterExpression::contains(ProductField::Brand, "c"));
    }

    #[test]
    fn test_groups_are_anded() {
        let filter = build_filter(&params(&[("atributo", "organico"), ("tienda", "central")]));

        let mut both = product("A", "a");
        both.attribute2 = Some("Orgánico".to_string());
        both.attribute3 = Some("organico".to_string());
        both.store = Some("Central".to_string());
        assert!(filter.matches(&both));

        let mut only_attr = product("B", "b");
        only_attr.attribute1 = Some("organico".to_string());
        assert!(!filter.matches(&only_attr));
    }
}
