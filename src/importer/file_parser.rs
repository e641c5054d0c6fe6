// ==========================================
// KCCR 产品目录 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xls/.xlsb/.ods) / CSV (.csv)
// 输出: ParsedSheet（表头去重，空单元格为 Empty，整行空白跳过）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::product_importer_trait::{FileParser, SheetSelector};
use crate::importer::sheet::{dedupe_headers, CellValue, ParsedSheet, SheetRow};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

const EXCEL_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 按表头组装行；缺失的尾部单元格补 Empty，超出表头的列丢弃
fn build_rows<I, R>(headers: &[String], raw_rows: I) -> Vec<SheetRow>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = CellValue>,
{
    let mut rows = Vec::new();
    for raw in raw_rows {
        let mut cells = raw.into_iter();
        let row: SheetRow = headers
            .iter()
            .map(|h| (h.clone(), cells.next().unwrap_or(CellValue::Empty)))
            .collect();

        // 跳过完全空的行；仅含空白字符的行保留，由规范化阶段计入拒绝数
        if row.is_blank() {
            continue;
        }
        rows.push(row);
    }
    rows
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
        _sheet: &SheetSelector,
    ) -> ImportResult<ParsedSheet> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let headers = dedupe_headers(
            reader
                .headers()?
                .iter()
                .map(|h| h.trim_start_matches('\u{feff}').to_string()),
        );

        let mut raw_rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            raw_rows.push(
                record
                    .iter()
                    .map(|v| {
                        if v.is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::Text(v.to_string())
                        }
                    })
                    .collect::<Vec<_>>(),
            );
        }

        let rows = build_rows(&headers, raw_rows);
        let sheet_name = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("csv")
            .to_string();

        debug!(sheet = %sheet_name, rows = rows.len(), "CSV 解析完成");
        Ok(ParsedSheet {
            sheet_name,
            headers,
            rows,
        })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    fn to_cell(data: &Data) -> CellValue {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::Error(_) => CellValue::Empty,
            other => CellValue::Text(other.to_string()),
        }
    }

    fn pick_sheet(names: &[String], selector: &SheetSelector) -> ImportResult<String> {
        let first = || {
            names
                .first()
                .cloned()
                .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))
        };
        match selector {
            SheetSelector::First => first(),
            SheetSelector::Named(name) => names
                .iter()
                .find(|n| *n == name)
                .cloned()
                .ok_or_else(|| ImportError::SheetNotFound(name.clone())),
            SheetSelector::Prefer(name) => match names.iter().find(|n| *n == name) {
                Some(found) => Ok(found.clone()),
                None => first(),
            },
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_bytes(
        &self,
        _file_name: &str,
        bytes: &[u8],
        sheet: &SheetSelector,
    ) -> ImportResult<ParsedSheet> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let sheet_name = Self::pick_sheet(&workbook.sheet_names(), sheet)?;
        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(ParsedSheet {
                sheet_name,
                ..Default::default()
            });
        };
        let headers = dedupe_headers(header_row.iter().map(|cell| cell.to_string()));

        let rows = build_rows(
            &headers,
            rows.map(|r| r.iter().map(Self::to_cell).collect::<Vec<_>>()),
        );

        debug!(sheet = %sheet_name, rows = rows.len(), "Excel 解析完成");
        Ok(ParsedSheet {
            sheet_name,
            headers,
            rows,
        })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
// 无扩展名时按 Excel 处理（上传端常见，calamine 按内容识别格式）
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
        sheet: &SheetSelector,
    ) -> ImportResult<ParsedSheet> {
        let ext = extension_of(file_name);
        match ext.as_str() {
            "csv" => CsvParser.parse_bytes(file_name, bytes, sheet),
            "" => ExcelParser.parse_bytes(file_name, bytes, sheet),
            e if EXCEL_EXTENSIONS.contains(&e) => ExcelParser.parse_bytes(file_name, bytes, sheet),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
