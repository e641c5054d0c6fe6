// ==========================================
// KCCR 产品目录 - 行规范化
// ==========================================
// 职责: 原始表格行 → ProductRecord（13 个规范字段）
// 规则:
// - 每个字段按固定别名列表经表头解析器取值
// - 值统一转为 trim 后的字符串；缺失 / 空白 → None
// - 品牌与名称缺一即为无效行
// ==========================================

use crate::domain::product::{ProductField, ProductRecord, PRODUCT_FIELDS};
use crate::importer::header_resolver::{resolve, Presence};
use crate::importer::sheet::SheetRow;

/// 各规范字段可接受的表头拼写（按优先级）
pub fn field_aliases(field: ProductField) -> &'static [&'static str] {
    match field {
        ProductField::GeneralCategory => &[
            "Cat.General",
            "Cat General",
            "cat_general",
            "catGeneral",
            "Categoria General",
            "Categoría General",
        ],
        ProductField::SubCategory => &["Categoria 1", "Categoría 1", "categoria_1", "categoria1"],
        ProductField::Brand => &[
            "Fabricante/Marca",
            "Fabricante",
            "Marca",
            "fabricante_marca",
            "fabricanteMarca",
        ],
        ProductField::Name => &["Nombre", "nombre"],
        ProductField::Certification => &["Certifica", "certifica"],
        ProductField::Seal => &["Sello", "sello"],
        ProductField::Attribute1 => &["Atributo 1", "atributo_1", "atributo1"],
        ProductField::Attribute2 => &["Atributo 2", "atributo_2", "atributo2"],
        ProductField::Attribute3 => &["Atributo 3", "atributo_3", "atributo3"],
        ProductField::Store => &["Tienda", "tienda", "Comercio"],
        ProductField::ProductPhoto => &[
            "Fotografia Producto",
            "Fotografía Producto",
            "foto_producto",
            "fotoProducto",
            "Foto Producto",
            "Imagen",
        ],
        ProductField::SealPhoto1 => &[
            "Fotografia Sello 1",
            "Fotografía Sello 1",
            "foto_sello_1",
            "fotoSello1",
            "LogoSello1",
            "Logo Sello 1",
        ],
        ProductField::SealPhoto2 => &[
            "Fotografia Sello 2",
            "Fotografía Sello 2",
            "foto_sello_2",
            "fotoSello2",
            "LogoSello2",
            "Logo Sello 2",
        ],
    }
}

// ==========================================
// RowNormalizer Trait
// ==========================================
pub trait RowNormalizer: Send + Sync {
    /// 规范化一行
    ///
    /// # 返回
    /// - Some(ProductRecord): 有效行
    /// - None: 缺少品牌或名称
    fn normalize(&self, row: &SheetRow) -> Option<ProductRecord>;
}

// ==========================================
// ProductRowNormalizer - 产品行规范化实现
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductRowNormalizer {
    presence: Presence,
}

impl ProductRowNormalizer {
    pub fn new(presence: Presence) -> Self {
        Self { presence }
    }

    /// 不做有效性判定的映射（供调试 / 预览）
    pub fn map_row(&self, row: &SheetRow) -> ProductRecord {
        let mut record = ProductRecord::default();
        for field in PRODUCT_FIELDS {
            let value = resolve(row, field_aliases(field), self.presence).and_then(|v| v.to_trimmed());
            record.set(field, value);
        }
        record
    }
}

impl RowNormalizer for ProductRowNormalizer {
    fn normalize(&self, row: &SheetRow) -> Option<ProductRecord> {
        let record = self.map_row(row);
        record.is_importable().then_some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::sheet::CellValue;

    fn row(cells: &[(&str, &str)]) -> SheetRow {
        cells.iter().map(|(h, v)| (*h, *v)).collect()
    }

    #[test]
    fn test_canonical_headers() {
        let r = row(&[
            ("Cat.General", "Lácteos"),
            ("Fabricante/Marca", " Acme "),
            ("Nombre", "Widget"),
            ("Fotografia Producto", "w.png"),
            ("existe", "SI"),
        ]);
        let record = ProductRowNormalizer::default().normalize(&r).unwrap();

        assert_eq!(record.general_category.as_deref(), Some("Lácteos"));
        assert_eq!(record.brand.as_deref(), Some("Acme"));
        assert_eq!(record.name.as_deref(), Some("Widget"));
        assert_eq!(record.product_photo.as_deref(), Some("w.png"));
        assert_eq!(record.store, None);
    }

    #[test]
    fn test_alias_and_case_variants_agree() {
        let canonical = row(&[("Fabricante/Marca", "Acme"), ("Nombre", "Widget"), ("Tienda", "Central")]);
        let aliased = row(&[("MARCA", "Acme"), ("NOMBRE", "Widget"), ("comercio", "Central")]);

        let n = ProductRowNormalizer::default();
        assert_eq!(n.normalize(&canonical), n.normalize(&aliased));
    }

    #[test]
    fn test_numbers_are_coerced_to_text() {
        let mut r = row(&[("Marca", "Acme")]);
        r.insert("Nombre", CellValue::Number(7790.0));
        let record = ProductRowNormalizer::default().normalize(&r).unwrap();
        assert_eq!(record.name.as_deref(), Some("7790"));
    }

    #[test]
    fn test_missing_brand_or_name_is_invalid() {
        let n = ProductRowNormalizer::default();
        assert!(n.normalize(&row(&[("Nombre", "Gadget"), ("Marca", "")])).is_none());
        assert!(n.normalize(&row(&[("Marca", "Beta"), ("Nombre", "   ")])).is_none());
        assert!(n.normalize(&row(&[("Otra", "x")])).is_none());
    }

    #[test]
    fn test_presence_changes_which_alias_wins() {
        // 第一个别名列存在但为空
        let r = row(&[("Fabricante/Marca", ""), ("Marca", "Acme"), ("Nombre", "Widget")]);

        assert!(ProductRowNormalizer::new(Presence::Defined).normalize(&r).is_none());

        let record = ProductRowNormalizer::new(Presence::NonEmpty).normalize(&r).unwrap();
        assert_eq!(record.brand.as_deref(), Some("Acme"));
    }
}
