// ==========================================
// KCCR 产品目录 - 新闻仓储
// ==========================================
// 存储: noticias 表
// 排序: 最新在前（creado_en DESC, id DESC）
// ==========================================

use crate::domain::{NewNews, News, NewsDestination, NewsUpdate};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const NEWS_SELECT: &str = r#"
    SELECT id, titulo, contenido, image_url, file_url, destino, autor_id, creado_en, actualizado_en
    FROM noticias
"#;

pub struct NewsRepository {
    conn: Arc<Mutex<Connection>>,
}

impl NewsRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<News> {
        let destino: String = row.get(5)?;
        Ok(News {
            id: row.get(0)?,
            titulo: row.get(1)?,
            contenido: row.get(2)?,
            image_url: row.get(3)?,
            file_url: row.get(4)?,
            // CHECK 约束限定取值，解析失败时按默认栏目处理
            destino: destino.parse().unwrap_or_default(),
            autor_id: row.get(6)?,
            creado_en: row.get(7)?,
            actualizado_en: row.get(8)?,
        })
    }

    fn find_by_id_in(conn: &Connection, id: i64) -> RepositoryResult<Option<News>> {
        let sql = format!("{} WHERE id = ?1", NEWS_SELECT);
        Ok(conn.query_row(&sql, params![id], Self::map_row).optional()?)
    }

    pub fn create(&self, news: &NewNews) -> RepositoryResult<News> {
        let conn = self.get_conn()?;
        let now = Utc::now().naive_utc();
        conn.execute(
            r#"
            INSERT INTO noticias (
                titulo, contenido, image_url, file_url, destino, autor_id, creado_en, actualizado_en
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
            params![
                news.titulo,
                news.contenido,
                news.image_url,
                news.file_url,
                news.destino.to_string(),
                news.autor_id,
                now,
            ],
        )?;
        let id = conn.last_insert_rowid();
        Self::find_by_id_in(&conn, id)?.ok_or_else(|| RepositoryError::not_found("noticias", id))
    }

    /// 列表（可按栏目过滤）
    pub fn list(&self, destino: Option<NewsDestination>) -> RepositoryResult<Vec<News>> {
        let conn = self.get_conn()?;
        let order = "ORDER BY creado_en DESC, id DESC";
        let mut items = Vec::new();
        match destino {
            Some(d) => {
                let mut stmt = conn.prepare(&format!("{} WHERE destino = ?1 {}", NEWS_SELECT, order))?;
                for row in stmt.query_map(params![d.to_string()], Self::map_row)? {
                    items.push(row?);
                }
            }
            None => {
                let mut stmt = conn.prepare(&format!("{} {}", NEWS_SELECT, order))?;
                for row in stmt.query_map([], Self::map_row)? {
                    items.push(row?);
                }
            }
        }
        Ok(items)
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<News>> {
        let conn = self.get_conn()?;
        Self::find_by_id_in(&conn, id)
    }

    /// 局部更新，并刷新 actualizado_en
    pub fn update(&self, id: i64, update: &NewsUpdate) -> RepositoryResult<Option<News>> {
        let conn = self.get_conn()?;
        let Some(mut news) = Self::find_by_id_in(&conn, id)? else {
            return Ok(None);
        };

        if let Some(titulo) = &update.titulo {
            news.titulo = titulo.clone();
        }
        if update.contenido.is_some() {
            news.contenido = update.contenido.clone();
        }
        if update.image_url.is_some() {
            news.image_url = update.image_url.clone();
        }
        if update.file_url.is_some() {
            news.file_url = update.file_url.clone();
        }
        if let Some(destino) = update.destino {
            news.destino = destino;
        }
        news.actualizado_en = Utc::now().naive_utc();

        conn.execute(
            r#"
            UPDATE noticias
            SET titulo = ?1, contenido = ?2, image_url = ?3, file_url = ?4,
                destino = ?5, actualizado_en = ?6
            WHERE id = ?7
            "#,
            params![
                news.titulo,
                news.contenido,
                news.image_url,
                news.file_url,
                news.destino.to_string(),
                news.actualizado_en,
                id,
            ],
        )?;
        Ok(Some(news))
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM noticias WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}
