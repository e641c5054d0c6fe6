// ==========================================
// KCCR 产品目录 - 新闻 API
// ==========================================
// 职责: 新闻发布（管理端）与门户列表/详情
// ==========================================

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::MessageResponse;
use crate::api::validator::{optional_text, parse_positive_id, required_text};
use crate::domain::{NewNews, News, NewsDestination, NewsUpdate};
use crate::i18n::{t, t_with_args};
use crate::repository::NewsRepository;

/// 新闻写入请求（新建与更新共用）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsRequest {
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub contenido: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub destino: Option<String>,
}

/// 解析栏目；空值视为未提供
fn parse_destination(raw: Option<&str>) -> ApiResult<Option<NewsDestination>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            ApiError::InvalidInput(t_with_args("news.invalid_destination", &[("value", value)]))
        }),
    }
}

/// 新闻 API
pub struct NewsApi {
    news_repo: Arc<NewsRepository>,
}

impl NewsApi {
    pub fn new(news_repo: Arc<NewsRepository>) -> Self {
        Self { news_repo }
    }

    /// 发布新闻
    ///
    /// # 参数
    /// - author_id: 当前登录管理员
    pub fn create_news(&self, request: &NewsRequest, author_id: i64) -> ApiResult<News> {
        let titulo = required_text(request.titulo.as_deref())
            .ok_or_else(|| ApiError::InvalidInput(t("news.title_required")))?;
        let destino = parse_destination(request.destino.as_deref())?.unwrap_or_default();

        let news = self.news_repo.create(&NewNews {
            titulo,
            contenido: optional_text(request.contenido.clone()),
            image_url: optional_text(request.image_url.clone()),
            file_url: optional_text(request.file_url.clone()),
            destino,
            autor_id: Some(author_id),
        })?;
        info!(id = news.id, destino = %news.destino, "新闻已发布");
        Ok(news)
    }

    /// 列表（最新在前，可按栏目过滤）
    pub fn list_news(&self, destino: Option<&str>) -> ApiResult<Vec<News>> {
        let destino = parse_destination(destino)?;
        Ok(self.news_repo.list(destino)?)
    }

    pub fn get_news(&self, raw_id: &str) -> ApiResult<News> {
        let not_found = || ApiError::NotFound(t("news.not_found"));
        let id = parse_positive_id(raw_id).ok_or_else(not_found)?;
        self.news_repo.find_by_id(id)?.ok_or_else(not_found)
    }

    /// 更新新闻；缺失字段保持不变，栏目仅在提供时修改
    pub fn update_news(&self, raw_id: &str, request: &NewsRequest) -> ApiResult<News> {
        let id = parse_positive_id(raw_id).ok_or_else(|| ApiError::InvalidInput(t("common.invalid_id")))?;
        let update = NewsUpdate {
            titulo: request.titulo.clone(),
            contenido: request.contenido.clone(),
            image_url: request.image_url.clone(),
            file_url: request.file_url.clone(),
            destino: parse_destination(request.destino.as_deref())?,
        };
        let news = self
            .news_repo
            .update(id, &update)?
            .ok_or_else(|| ApiError::NotFound(t("news.not_found")))?;
        info!(id, "新闻已更新");
        Ok(news)
    }

    pub fn delete_news(&self, raw_id: &str) -> ApiResult<MessageResponse> {
        let id = parse_positive_id(raw_id).ok_or_else(|| ApiError::InvalidInput(t("common.invalid_id")))?;
        if !self.news_repo.delete(id)? {
            return Err(ApiError::NotFound(t("news.not_found")));
        }
        info!(id, "新闻已删除");
        Ok(MessageResponse::new(t("news.deleted")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};
    use rusqlite::Connection;
    use std::sync::Mutex;

    fn api() -> NewsApi {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        NewsApi::new(Arc::new(NewsRepository::from_connection(Arc::new(Mutex::new(conn)))))
    }

    fn titled(titulo: &str) -> NewsRequest {
        NewsRequest {
            titulo: Some(titulo.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_defaults_and_validation() {
        let api = api();
        assert!(matches!(
            api.create_news(&NewsRequest::default(), 1),
            Err(ApiError::InvalidInput(_))
        ));

        let mut request = titled("Feria");
        request.contenido = Some(String::new());
        let news = api.create_news(&request, 1).unwrap();
        assert_eq!(news.destino, NewsDestination::Novedades);
        assert_eq!(news.contenido, None);

        let mut bad = titled("X");
        bad.destino = Some("PORTADA".into());
        assert!(matches!(api.create_news(&bad, 1), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_list_filters_by_destination() {
        let api = api();
        api.create_news(&titled("A"), 1).unwrap();
        let mut ads = titled("B");
        ads.destino = Some("anunciantes".into());
        api.create_news(&ads, 1).unwrap();

        assert_eq!(api.list_news(None).unwrap().len(), 2);
        assert_eq!(api.list_news(Some("")).unwrap().len(), 2);
        let only_ads = api.list_news(Some("ANUNCIANTES")).unwrap();
        assert_eq!(only_ads.len(), 1);
        assert_eq!(only_ads[0].titulo, "B");
    }

    #[test]
    fn test_update_keeps_destination_when_absent() {
        let api = api();
        let mut ads = titled("B");
        ads.destino = Some("ANUNCIANTES".into());
        let created = api.create_news(&ads, 1).unwrap();

        let updated = api
            .update_news(&created.id.to_string(), &titled("B2"))
            .unwrap();
        assert_eq!(updated.titulo, "B2");
        assert_eq!(updated.destino, NewsDestination::Anunciantes);
        assert!(updated.actualizado_en >= created.actualizado_en);
    }

    #[test]
    fn test_missing_news() {
        let api = api();
        assert!(matches!(api.get_news("7"), Err(ApiError::NotFound(_))));
        assert!(matches!(api.get_news("x"), Err(ApiError::NotFound(_))));
        assert!(matches!(api.delete_news("7"), Err(ApiError::NotFound(_))));
    }
}
