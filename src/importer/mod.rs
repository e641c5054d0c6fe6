// ==========================================
// KCCR 产品目录 - 导入层
// ==========================================
// 职责: 表格文件 → 规范化产品记录 → 分批落库
// 支持: Excel (xlsx/xls/ods), CSV
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod header_resolver;
pub mod product_importer_impl;
pub mod product_importer_trait;
pub mod row_normalizer;
pub mod sheet;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use header_resolver::{resolve, Presence};
pub use product_importer_impl::ProductImporterImpl;
pub use row_normalizer::{field_aliases, ProductRowNormalizer};
pub use sheet::{CellValue, ParsedSheet, SheetRow};

// 重导出 Trait 接口
pub use product_importer_trait::{FileParser, ProductImporter, SheetSelector};
pub use row_normalizer::RowNormalizer;
