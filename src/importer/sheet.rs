// ==========================================
// KCCR 产品目录 - 表格行模型
// ==========================================
// 职责: 解析器输出的原始单元格 / 行 / 工作表结构
// 约定: 行保持表头列顺序，表头在同一张表内唯一
// ==========================================

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

// ==========================================
// CellValue - 原始单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// 空单元格或空字符串（不 trim）
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// 转为 trim 后的字符串；空值 / 纯空白 → None
    pub fn to_trimmed(&self) -> Option<String> {
        let text = match self {
            CellValue::Empty => return None,
            CellValue::Text(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            // 整数值的浮点（Excel 全部按 f64 存）不带小数点
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // 与上传端默认值对齐：空单元格回显为 ""
            CellValue::Empty => serializer.serialize_str(""),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

// ==========================================
// SheetRow - 一行数据（表头 → 单元格）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRow {
    cells: Vec<(String, CellValue)>,
}

impl SheetRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加单元格（同名表头覆盖旧值）
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<CellValue>) {
        let header = header.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(h, _)| *h == header) {
            Some(slot) => slot.1 = value,
            None => self.cells.push((header, value)),
        }
    }

    /// 精确匹配表头
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(h, _)| h == header).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 整行无任何内容（仅空白字符的单元格不算空）
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_blank())
    }
}

impl<H, V> FromIterator<(H, V)> for SheetRow
where
    H: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (H, V)>>(iter: I) -> Self {
        let mut row = SheetRow::new();
        for (h, v) in iter {
            row.insert(h, v);
        }
        row
    }
}

impl Serialize for SheetRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (header, value) in &self.cells {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

// ==========================================
// ParsedSheet - 解析后的工作表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSheet {
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

/// 表头去重: 重复的表头依次追加 `_1`、`_2`
///
/// 空表头以 `__EMPTY` 占位，保证每列都能被寻址。
pub fn dedupe_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut headers: Vec<String> = Vec::new();
    for h in raw {
        let base = match h.as_ref().trim() {
            "" => "__EMPTY".to_string(),
            trimmed => trimmed.to_string(),
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while headers.contains(&candidate) {
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        headers.push(candidate);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_display_without_trailing_zero() {
        assert_eq!(CellValue::Number(7790.0).to_string(), "7790");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Number(-3.0).to_trimmed(), Some("-3".to_string()));
    }

    #[test]
    fn test_to_trimmed_blank() {
        assert_eq!(CellValue::Empty.to_trimmed(), None);
        assert_eq!(CellValue::from("   ").to_trimmed(), None);
        assert_eq!(CellValue::from(" x ").to_trimmed(), Some("x".to_string()));
    }

    #[test]
    fn test_dedupe_headers() {
        let headers = dedupe_headers(["Nombre", "Nombre", "", "Nombre", " "]);
        assert_eq!(
            headers,
            vec!["Nombre", "Nombre_1", "__EMPTY", "Nombre_2", "__EMPTY_1"]
        );
    }

    #[test]
    fn test_row_serializes_in_column_order() {
        let row: SheetRow = vec![
            ("Nombre", CellValue::from("Widget")),
            ("Precio", CellValue::Number(3.0)),
            ("Sello", CellValue::Empty),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"Nombre":"Widget","Precio":3.0,"Sello":""}"#);
    }
}
