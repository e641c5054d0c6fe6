// ==========================================
// KCCR 产品目录 - 产品领域模型
// ==========================================
// 职责: 产品记录、13 个规范字段白名单、payload 清洗
// 红线: 只允许白名单字段落库（legacy 列如 "existe" 一律丢弃）
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

// ==========================================
// ProductField - 规范字段
// ==========================================
// 对齐: productos 表 13 个业务列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    GeneralCategory, // 大类
    SubCategory,     // 子类
    Brand,           // 厂商/品牌
    Name,            // 名称
    Certification,   // 认证
    Seal,            // 标识
    Attribute1,      // 属性 1
    Attribute2,      // 属性 2
    Attribute3,      // 属性 3
    Store,           // 店铺
    ProductPhoto,    // 产品图片
    SealPhoto1,      // 标识图片 1
    SealPhoto2,      // 标识图片 2
}

/// 产品字段白名单（顺序即导出/落库列顺序）
///
/// 新增字段时必须同时修改 `ProductRecord`，`get`/`set` 的 match 会在编译期强制覆盖。
pub const PRODUCT_FIELDS: [ProductField; 13] = [
    ProductField::GeneralCategory,
    ProductField::SubCategory,
    ProductField::Brand,
    ProductField::Name,
    ProductField::Certification,
    ProductField::Seal,
    ProductField::Attribute1,
    ProductField::Attribute2,
    ProductField::Attribute3,
    ProductField::Store,
    ProductField::ProductPhoto,
    ProductField::SealPhoto1,
    ProductField::SealPhoto2,
];

/// 自由文本检索覆盖的 10 个文本字段（不含图片引用）
pub const TEXT_SEARCH_FIELDS: [ProductField; 10] = [
    ProductField::GeneralCategory,
    ProductField::SubCategory,
    ProductField::Brand,
    ProductField::Name,
    ProductField::Certification,
    ProductField::Seal,
    ProductField::Attribute1,
    ProductField::Attribute2,
    ProductField::Attribute3,
    ProductField::Store,
];

/// 三个属性字段（`atributo` 检索参数）
pub const ATTRIBUTE_FIELDS: [ProductField; 3] = [
    ProductField::Attribute1,
    ProductField::Attribute2,
    ProductField::Attribute3,
];

impl ProductField {
    /// 前端 JSON 键名
    pub fn json_key(self) -> &'static str {
        match self {
            ProductField::GeneralCategory => "catGeneral",
            ProductField::SubCategory => "categoria1",
            ProductField::Brand => "fabricanteMarca",
            ProductField::Name => "nombre",
            ProductField::Certification => "certifica",
            ProductField::Seal => "sello",
            ProductField::Attribute1 => "atributo1",
            ProductField::Attribute2 => "atributo2",
            ProductField::Attribute3 => "atributo3",
            ProductField::Store => "tienda",
            ProductField::ProductPhoto => "fotoProducto",
            ProductField::SealPhoto1 => "fotoSello1",
            ProductField::SealPhoto2 => "fotoSello2",
        }
    }

    /// 数据库列名
    pub fn column(self) -> &'static str {
        match self {
            ProductField::GeneralCategory => "cat_general",
            ProductField::SubCategory => "categoria1",
            ProductField::Brand => "fabricante_marca",
            ProductField::Name => "nombre",
            ProductField::Certification => "certifica",
            ProductField::Seal => "sello",
            ProductField::Attribute1 => "atributo1",
            ProductField::Attribute2 => "atributo2",
            ProductField::Attribute3 => "atributo3",
            ProductField::Store => "tienda",
            ProductField::ProductPhoto => "foto_producto",
            ProductField::SealPhoto1 => "foto_sello1",
            ProductField::SealPhoto2 => "foto_sello2",
        }
    }

    /// 由 JSON 键名反查（白名单之外返回 None）
    pub fn from_json_key(key: &str) -> Option<Self> {
        PRODUCT_FIELDS.iter().copied().find(|f| f.json_key() == key)
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.json_key())
    }
}

// ==========================================
// ProductRecord - 产品业务字段（不含 id）
// ==========================================
// 空值语义: 缺失 / 空串 / 纯空白 一律为 None（不写 "N/A"）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "catGeneral")]
    pub general_category: Option<String>,
    #[serde(rename = "categoria1")]
    pub sub_category: Option<String>,
    #[serde(rename = "fabricanteMarca")]
    pub brand: Option<String>,
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "certifica")]
    pub certification: Option<String>,
    #[serde(rename = "sello")]
    pub seal: Option<String>,
    #[serde(rename = "atributo1")]
    pub attribute1: Option<String>,
    #[serde(rename = "atributo2")]
    pub attribute2: Option<String>,
    #[serde(rename = "atributo3")]
    pub attribute3: Option<String>,
    #[serde(rename = "tienda")]
    pub store: Option<String>,
    #[serde(rename = "fotoProducto")]
    pub product_photo: Option<String>,
    #[serde(rename = "fotoSello1")]
    pub seal_photo1: Option<String>,
    #[serde(rename = "fotoSello2")]
    pub seal_photo2: Option<String>,
}

impl ProductRecord {
    /// 读取字段值
    pub fn get(&self, field: ProductField) -> Option<&str> {
        let value = match field {
            ProductField::GeneralCategory => &self.general_category,
            ProductField::SubCategory => &self.sub_category,
            ProductField::Brand => &self.brand,
            ProductField::Name => &self.name,
            ProductField::Certification => &self.certification,
            ProductField::Seal => &self.seal,
            ProductField::Attribute1 => &self.attribute1,
            ProductField::Attribute2 => &self.attribute2,
            ProductField::Attribute3 => &self.attribute3,
            ProductField::Store => &self.store,
            ProductField::ProductPhoto => &self.product_photo,
            ProductField::SealPhoto1 => &self.seal_photo1,
            ProductField::SealPhoto2 => &self.seal_photo2,
        };
        value.as_deref()
    }

    /// 写入字段值
    pub fn set(&mut self, field: ProductField, value: Option<String>) {
        let slot = match field {
            ProductField::GeneralCategory => &mut self.general_category,
            ProductField::SubCategory => &mut self.sub_category,
            ProductField::Brand => &mut self.brand,
            ProductField::Name => &mut self.name,
            ProductField::Certification => &mut self.certification,
            ProductField::Seal => &mut self.seal,
            ProductField::Attribute1 => &mut self.attribute1,
            ProductField::Attribute2 => &mut self.attribute2,
            ProductField::Attribute3 => &mut self.attribute3,
            ProductField::Store => &mut self.store,
            ProductField::ProductPhoto => &mut self.product_photo,
            ProductField::SealPhoto1 => &mut self.seal_photo1,
            ProductField::SealPhoto2 => &mut self.seal_photo2,
        };
        *slot = value;
    }

    /// 可导入判定: 品牌与名称均非空（trim 后）
    pub fn is_importable(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.brand) && present(&self.name)
    }
}

// ==========================================
// Product - 带主键的产品
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(flatten)]
    pub record: ProductRecord,
}

// ==========================================
// ProductPatch - 清洗后的写入 payload
// ==========================================
// 只包含白名单字段；未出现的字段在 update 时保持不变
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub fields: Vec<(ProductField, Option<String>)>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 应用到已有记录
    pub fn apply_to(&self, record: &mut ProductRecord) {
        for (field, value) in &self.fields {
            record.set(*field, value.clone());
        }
    }

    /// 转换为新记录（未出现字段为 None）
    pub fn into_record(self) -> ProductRecord {
        let mut record = ProductRecord::default();
        self.apply_to(&mut record);
        record
    }
}

/// 清洗产品 payload
///
/// - 非对象输入 → 空 patch
/// - 丢弃白名单之外的键（如 legacy 的 `existe`、客户端带上的 `id`）
/// - 字符串 trim，空串 → None；数字/布尔转字符串；null → None
pub fn sanitize_product_payload(input: &JsonValue) -> ProductPatch {
    let Some(map) = input.as_object() else {
        return ProductPatch::default();
    };
    sanitize_product_map(map)
}

fn sanitize_product_map(map: &Map<String, JsonValue>) -> ProductPatch {
    let mut fields = Vec::new();
    for (key, value) in map {
        match ProductField::from_json_key(key) {
            Some(field) => fields.push((field, json_to_text(value))),
            None => tracing::debug!(key = %key, "丢弃非白名单产品字段"),
        }
    }
    ProductPatch { fields }
}

fn json_to_text(value: &JsonValue) -> Option<String> {
    let text = match value {
        JsonValue::Null => return None,
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        other => other.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_allow_list_covers_every_field_once() {
        for field in PRODUCT_FIELDS {
            assert_eq!(ProductField::from_json_key(field.json_key()), Some(field));
        }
        assert_eq!(ProductField::from_json_key("existe"), None);
    }

    #[test]
    fn test_sanitize_drops_legacy_columns() {
        let payload = json!({
            "fabricanteMarca": "  Acme ",
            "nombre": "Widget",
            "existe": true,
            "id": 99,
            "sello": ""
        });

        let patch = sanitize_product_payload(&payload);
        let record = patch.into_record();

        assert_eq!(record.brand.as_deref(), Some("Acme"));
        assert_eq!(record.name.as_deref(), Some("Widget"));
        assert_eq!(record.seal, None);
    }

    #[test]
    fn test_sanitize_non_object_is_empty() {
        assert!(sanitize_product_payload(&json!("texto")).is_empty());
        assert!(sanitize_product_payload(&JsonValue::Null).is_empty());
    }

    #[test]
    fn test_is_importable() {
        let mut record = ProductRecord::default();
        assert!(!record.is_importable());

        record.brand = Some("Acme".to_string());
        assert!(!record.is_importable());

        record.name = Some("   ".to_string());
        assert!(!record.is_importable());

        record.name = Some("Widget".to_string());
        assert!(record.is_importable());
    }

    #[test]
    fn test_product_serializes_flat_with_spanish_keys() {
        let product = Product {
            id: 7,
            record: ProductRecord {
                brand: Some("Acme".to_string()),
                name: Some("Widget".to_string()),
                ..Default::default()
            },
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["fabricanteMarca"], "Acme");
        assert_eq!(value["catGeneral"], JsonValue::Null);
    }
}
