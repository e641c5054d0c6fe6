// ==========================================
// KCCR 产品目录 - 产品导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 解析 → 规范化 → 切批 → 顺序落库
// 红线: 批次严格串行；某批失败即放弃后续批次，已提交批次不回滚
// ==========================================

use crate::config::{config_keys, ImportConfigReader};
use crate::domain::{ImportSummary, ProductRecord};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::product_importer_trait::{FileParser, ProductImporter, SheetSelector};
use crate::importer::row_normalizer::{ProductRowNormalizer, RowNormalizer};
use crate::importer::sheet::{ParsedSheet, SheetRow};
use crate::repository::ProductRepository;
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// ProductImporterImpl - 产品导入器实现
// ==========================================
pub struct ProductImporterImpl<R, C>
where
    R: ProductRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    product_repo: R,

    // 配置读取器
    config: C,

    // 文件解析器
    file_parser: Box<dyn FileParser>,
}

impl<R, C> ProductImporterImpl<R, C>
where
    R: ProductRepository,
    C: ImportConfigReader,
{
    /// 创建新的 ProductImporter 实例
    ///
    /// # 参数
    /// - product_repo: 产品仓储
    /// - config: 配置读取器
    /// - file_parser: 文件解析器
    pub fn new(product_repo: R, config: C, file_parser: Box<dyn FileParser>) -> Self {
        Self {
            product_repo,
            config,
            file_parser,
        }
    }

    async fn load_normalizer(&self) -> ImportResult<ProductRowNormalizer> {
        let presence = self
            .config
            .get_header_presence()
            .await
            .map_err(|e| ImportError::ConfigReadError {
                key: config_keys::IMPORT_HEADER_PRESENCE.to_string(),
                message: e.to_string(),
            })?;
        Ok(ProductRowNormalizer::new(presence))
    }

    async fn load_batch_size(&self) -> ImportResult<usize> {
        let size = self
            .config
            .get_import_batch_size()
            .await
            .map_err(|e| ImportError::ConfigReadError {
                key: config_keys::IMPORT_BATCH_SIZE.to_string(),
                message: e.to_string(),
            })?;
        Ok(size.max(1))
    }

    /// 顺序插入各批次
    ///
    /// # 返回
    /// - Ok((插入总数, 批次数))
    async fn insert_in_batches(
        &self,
        records: &[ProductRecord],
        batch_size: usize,
    ) -> ImportResult<(usize, usize)> {
        let mut inserted_so_far = 0;
        let mut batches_committed = 0;

        for (idx, chunk) in records.chunks(batch_size).enumerate() {
            match self.product_repo.insert_batch(chunk).await {
                Ok(count) => {
                    inserted_so_far += count;
                    batches_committed += 1;
                    debug!(batch = idx + 1, size = chunk.len(), inserted = count, "批次插入完成");
                }
                Err(e) => {
                    error!(
                        batch = idx + 1,
                        batches_committed,
                        inserted_so_far,
                        error = %e,
                        "批次插入失败，放弃剩余批次"
                    );
                    return Err(ImportError::BatchInsertFailed {
                        batch_index: idx + 1,
                        batches_committed,
                        inserted_so_far,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok((inserted_so_far, batches_committed))
    }

    async fn import_sheet(&self, sheet: ParsedSheet) -> ImportResult<ImportSummary> {
        if sheet.rows.is_empty() {
            warn!(sheet = %sheet.sheet_name, "工作表没有数据行");
            return Err(ImportError::EmptySheet);
        }
        info!(sheet = %sheet.sheet_name, rows = sheet.rows.len(), "文件解析完成");
        self.import_rows(&sheet.rows, &sheet.headers).await
    }
}

#[async_trait]
impl<R, C> ProductImporter for ProductImporterImpl<R, C>
where
    R: ProductRepository + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, rows, headers), fields(total_rows = rows.len()))]
    async fn import_rows(&self, rows: &[SheetRow], headers: &[String]) -> ImportResult<ImportSummary> {
        let normalizer = self.load_normalizer().await?;
        let batch_size = self.load_batch_size().await?;

        // === 步骤 1: 规范化 ===
        let valid: Vec<ProductRecord> = rows.iter().filter_map(|r| normalizer.normalize(r)).collect();
        let total_rejected = rows.len() - valid.len();
        info!(total_valid = valid.len(), total_rejected, "行规范化完成");

        if valid.is_empty() {
            warn!(headers = ?headers, "没有有效行");
            return Err(ImportError::NoValidRows {
                headers: headers.to_vec(),
                sample_row: rows.first().cloned(),
            });
        }

        // === 步骤 2: 分批落库 ===
        let (total_inserted, batches) = self.insert_in_batches(&valid, batch_size).await?;

        info!(
            total_rows = rows.len(),
            total_valid = valid.len(),
            total_inserted,
            batches,
            "产品导入完成"
        );

        Ok(ImportSummary {
            total_rows: rows.len(),
            total_valid: valid.len(),
            total_rejected,
            total_inserted,
            batches,
            headers: headers.to_vec(),
        })
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn import_from_bytes(&self, file_name: &str, bytes: &[u8]) -> ImportResult<ImportSummary> {
        let sheet = self
            .file_parser
            .parse_bytes(file_name, bytes, &SheetSelector::First)
            .map_err(|e| {
                error!(error = %e, "文件解析失败");
                e
            })?;
        self.import_sheet(sheet).await
    }

    #[instrument(skip(self))]
    async fn import_from_path(&self, path: &Path, sheet: &SheetSelector) -> ImportResult<ImportSummary> {
        let parsed = self.file_parser.parse_path(path, sheet).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        self.import_sheet(parsed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigReadError;
    use crate::domain::{FilterExpression, Page, PageRequest, Product, ProductPatch};
    use crate::importer::file_parser::UniversalFileParser;
    use crate::importer::header_resolver::Presence;
    use crate::repository::{RepositoryError, RepositoryResult};
    use std::sync::Mutex;

    struct FixedConfig {
        batch_size: usize,
    }

    #[async_trait]
    impl ImportConfigReader for FixedConfig {
        async fn get_import_batch_size(&self) -> Result<usize, ConfigReadError> {
            Ok(self.batch_size)
        }

        async fn get_header_presence(&self) -> Result<Presence, ConfigReadError> {
            Ok(Presence::Defined)
        }
    }

    /// 记录每次 insert_batch 的批大小；fail_on 指定第几次调用失败（从 1 开始）
    #[derive(Default)]
    struct RecordingRepo {
        calls: Mutex<Vec<usize>>,
        fail_on: Option<usize>,
    }

    #[async_trait]
    impl ProductRepository for RecordingRepo {
        async fn list_all(&self) -> RepositoryResult<Vec<Product>> {
            Ok(vec![])
        }
        async fn list_paged(&self, page: PageRequest) -> RepositoryResult<Page<Product>> {
            Ok(Page { items: vec![], total: 0, page: page.page, page_size: page.page_size })
        }
        async fn search(&self, _filter: &FilterExpression) -> RepositoryResult<Vec<Product>> {
            Ok(vec![])
        }
        async fn count(&self) -> RepositoryResult<usize> {
            Ok(0)
        }
        async fn find_by_id(&self, _id: i64) -> RepositoryResult<Option<Product>> {
            Ok(None)
        }
        async fn create(&self, record: &ProductRecord) -> RepositoryResult<Product> {
            Ok(Product { id: 1, record: record.clone() })
        }
        async fn update(&self, _id: i64, _patch: &ProductPatch) -> RepositoryResult<Option<Product>> {
            Ok(None)
        }
        async fn delete(&self, _id: i64) -> RepositoryResult<bool> {
            Ok(false)
        }
        async fn insert_batch(&self, records: &[ProductRecord]) -> RepositoryResult<usize> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(records.len());
            if self.fail_on == Some(calls.len()) {
                return Err(RepositoryError::DatabaseQueryError("disk I/O error".to_string()));
            }
            Ok(records.len())
        }
        async fn delete_all(&self) -> RepositoryResult<usize> {
            Ok(0)
        }
    }

    fn importer(repo: RecordingRepo, batch_size: usize) -> ProductImporterImpl<RecordingRepo, FixedConfig> {
        ProductImporterImpl::new(repo, FixedConfig { batch_size }, Box::new(UniversalFileParser))
    }

    fn valid_rows(n: usize) -> Vec<SheetRow> {
        (0..n)
            .map(|i| {
                vec![("Marca", "Acme".to_string()), ("Nombre", format!("P{}", i))]
                    .into_iter()
                    .collect()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_batches_are_ceil_of_valid_rows() {
        let imp = importer(RecordingRepo::default(), 200);
        let rows = valid_rows(450);

        let summary = imp.import_rows(&rows, &["Marca".into(), "Nombre".into()]).await.unwrap();

        assert_eq!(summary.batches, 3);
        assert_eq!(summary.total_inserted, 450);
        assert_eq!(*imp.product_repo.calls.lock().unwrap(), vec![200, 200, 50]);
    }

    #[tokio::test]
    async fn test_no_valid_rows_carries_headers_and_sample() {
        let imp = importer(RecordingRepo::default(), 200);
        let rows: Vec<SheetRow> = vec![vec![("Producto", "X")].into_iter().collect()];

        let err = imp.import_rows(&rows, &["Producto".into()]).await.unwrap_err();
        match err {
            ImportError::NoValidRows { headers, sample_row } => {
                assert_eq!(headers, vec!["Producto"]);
                assert_eq!(sample_row, Some(rows[0].clone()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(imp.product_repo.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_failure_reports_partial_progress() {
        let repo = RecordingRepo {
            fail_on: Some(2),
            ..Default::default()
        };
        let imp = importer(repo, 10);

        let err = imp.import_rows(&valid_rows(35), &[]).await.unwrap_err();
        match err {
            ImportError::BatchInsertFailed {
                batch_index,
                batches_committed,
                inserted_so_far,
                ..
            } => {
                assert_eq!(batch_index, 2);
                assert_eq!(batches_committed, 1);
                assert_eq!(inserted_so_far, 10);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // 第 3、4 批未执行
        assert_eq!(imp.product_repo.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_zero_batch_size_is_treated_as_one() {
        let imp = importer(RecordingRepo::default(), 0);
        let summary = imp.import_rows(&valid_rows(3), &[]).await.unwrap();
        assert_eq!(summary.batches, 3);
    }

    #[tokio::test]
    async fn test_import_from_bytes_empty_sheet() {
        let imp = importer(RecordingRepo::default(), 200);
        let err = imp.import_from_bytes("vacio.csv", b"Marca,Nombre\n").await.unwrap_err();
        assert!(matches!(err, ImportError::EmptySheet));
    }
}
