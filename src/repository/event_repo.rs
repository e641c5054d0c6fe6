// ==========================================
// KCCR 产品目录 - 活动仓储
// ==========================================
// 存储: eventos 表
// 排序: inicio 升序
// ==========================================

use crate::domain::{EndUpdate, Event, EventUpdate, NewEvent};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_builder::SqlQueryBuilder;
use chrono::NaiveDateTime;
use rusqlite::types::{ToSqlOutput, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, ToSql};
use std::sync::{Arc, Mutex, MutexGuard};

const EVENT_SELECT: &str = r#"
    SELECT id, titulo, descripcion, ubicacion, inicio, fin, todo_el_dia, creado_por_id
    FROM eventos
"#;

pub struct EventRepository {
    conn: Arc<Mutex<Connection>>,
}

/// 按 rusqlite 的存储格式生成绑定值，保证与已落库的文本可比较
fn datetime_value(dt: &NaiveDateTime) -> rusqlite::Result<Value> {
    Ok(match dt.to_sql()? {
        ToSqlOutput::Owned(v) => v,
        ToSqlOutput::Borrowed(v) => v.into(),
        _ => Value::Text(dt.format("%F %T%.f").to_string()),
    })
}

impl EventRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Event> {
        Ok(Event {
            id: row.get(0)?,
            titulo: row.get(1)?,
            descripcion: row.get(2)?,
            ubicacion: row.get(3)?,
            inicio: row.get(4)?,
            fin: row.get(5)?,
            todo_el_dia: row.get(6)?,
            creado_por_id: row.get(7)?,
        })
    }

    fn find_by_id_in(conn: &Connection, id: i64) -> RepositoryResult<Option<Event>> {
        let sql = format!("{} WHERE id = ?1", EVENT_SELECT);
        Ok(conn.query_row(&sql, params![id], Self::map_row).optional()?)
    }

    /// 列表（可选 inicio 上下界，闭区间）
    pub fn list(
        &self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> RepositoryResult<Vec<Event>> {
        let mut builder = SqlQueryBuilder::new(EVENT_SELECT.trim());
        if let Some(from) = from {
            builder = builder.where_with_params("inicio >= ?", vec![datetime_value(&from)?]);
        }
        if let Some(to) = to {
            builder = builder.where_with_params("inicio <= ?", vec![datetime_value(&to)?]);
        }
        let (sql, values) = builder.order_by("inicio ASC, id ASC").build_with_params();

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), Self::map_row)?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Event>> {
        let conn = self.get_conn()?;
        Self::find_by_id_in(&conn, id)
    }

    pub fn create(&self, event: &NewEvent) -> RepositoryResult<Event> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO eventos (titulo, descripcion, ubicacion, inicio, fin, todo_el_dia, creado_por_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                event.titulo,
                event.descripcion,
                event.ubicacion,
                event.inicio,
                event.fin,
                event.todo_el_dia,
                event.creado_por_id,
            ],
        )?;
        let id = conn.last_insert_rowid();
        Self::find_by_id_in(&conn, id)?.ok_or_else(|| RepositoryError::not_found("eventos", id))
    }

    /// 更新
    ///
    /// descripcion / ubicacion 直接覆盖（None 即清空）；其余字段 None 保持不变
    pub fn update(&self, id: i64, update: &EventUpdate) -> RepositoryResult<Option<Event>> {
        let conn = self.get_conn()?;
        let Some(mut event) = Self::find_by_id_in(&conn, id)? else {
            return Ok(None);
        };

        if let Some(titulo) = &update.titulo {
            event.titulo = titulo.clone();
        }
        event.descripcion = update.descripcion.clone();
        event.ubicacion = update.ubicacion.clone();
        if let Some(inicio) = update.inicio {
            event.inicio = inicio;
        }
        match update.fin {
            EndUpdate::Keep => {}
            EndUpdate::Clear => event.fin = None,
            EndUpdate::Set(fin) => event.fin = Some(fin),
        }
        if let Some(flag) = update.todo_el_dia {
            event.todo_el_dia = flag;
        }

        conn.execute(
            r#"
            UPDATE eventos
            SET titulo = ?1, descripcion = ?2, ubicacion = ?3, inicio = ?4, fin = ?5, todo_el_dia = ?6
            WHERE id = ?7
            "#,
            params![
                event.titulo,
                event.descripcion,
                event.ubicacion,
                event.inicio,
                event.fin,
                event.todo_el_dia,
                id,
            ],
        )?;
        Ok(Some(event))
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM eventos WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}
