// ==========================================
// KCCR 产品目录 - 用户与角色仓储
// ==========================================
// 红线: Repository 不含业务逻辑（密码哈希、权限判断在上层）
// ==========================================

use crate::domain::{NewUser, Role, User, UserUpdate};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const USER_SELECT: &str = r#"
    SELECT u.id, u.nombre, u.email, u.password_hash, u.rol_id, r.nombre
    FROM usuarios u
    LEFT JOIN roles r ON r.id = u.rol_id
"#;

// ==========================================
// UserRepository - 用户仓储
// ==========================================
/// 职责: 管理 usuarios / roles 表
pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            nombre: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            rol_id: row.get(4)?,
            rol_nombre: row.get(5)?,
        })
    }

    fn find_one(conn: &Connection, condition: &str, value: &dyn rusqlite::ToSql) -> RepositoryResult<Option<User>> {
        let sql = format!("{} WHERE {}", USER_SELECT, condition);
        let user = conn.query_row(&sql, [value], Self::map_user).optional()?;
        Ok(user)
    }

    // ===== 角色 =====

    pub fn find_role_by_name(&self, nombre: &str) -> RepositoryResult<Option<Role>> {
        let conn = self.get_conn()?;
        let role = conn
            .query_row(
                "SELECT id, nombre, descripcion FROM roles WHERE nombre = ?1",
                params![nombre],
                |row| {
                    Ok(Role {
                        id: row.get(0)?,
                        nombre: row.get(1)?,
                        descripcion: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(role)
    }

    pub fn create_role(&self, nombre: &str, descripcion: Option<&str>) -> RepositoryResult<Role> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO roles (nombre, descripcion) VALUES (?1, ?2)",
            params![nombre, descripcion],
        )?;
        Ok(Role {
            id: conn.last_insert_rowid(),
            nombre: nombre.to_string(),
            descripcion: descripcion.map(str::to_string),
        })
    }

    // ===== 用户 =====

    pub fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        Self::find_one(&conn, "u.email = ?1", &email)
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        Self::find_one(&conn, "u.id = ?1", &id)
    }

    /// 该角色下 id 最小的用户
    pub fn find_first_by_role(&self, rol_id: i64) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE u.rol_id = ?1 ORDER BY u.id ASC LIMIT 1", USER_SELECT);
        Ok(conn.query_row(&sql, params![rol_id], Self::map_user).optional()?)
    }

    /// 全部用户（按 id 升序）
    pub fn list(&self) -> RepositoryResult<Vec<User>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY u.id ASC", USER_SELECT))?;
        let rows = stmt.query_map([], Self::map_user)?;
        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    /// 创建用户（email 重复 → UniqueConstraintViolation）
    pub fn create(&self, user: &NewUser) -> RepositoryResult<User> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO usuarios (nombre, email, password_hash, rol_id) VALUES (?1, ?2, ?3, ?4)",
            params![user.nombre, user.email, user.password_hash, user.rol_id],
        )?;
        let id = conn.last_insert_rowid();
        Self::find_one(&conn, "u.id = ?1", &id)?
            .ok_or_else(|| RepositoryError::not_found("usuarios", id))
    }

    /// 局部更新
    ///
    /// # 返回
    /// - Ok(None): 用户不存在
    pub fn update(&self, id: i64, update: &UserUpdate) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        let Some(mut user) = Self::find_one(&conn, "u.id = ?1", &id)? else {
            return Ok(None);
        };

        if let Some(nombre) = &update.nombre {
            user.nombre = nombre.clone();
        }
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        if let Some(hash) = &update.password_hash {
            user.password_hash = hash.clone();
        }

        conn.execute(
            "UPDATE usuarios SET nombre = ?1, email = ?2, password_hash = ?3 WHERE id = ?4",
            params![user.nombre, user.email, user.password_hash, id],
        )?;
        Ok(Some(user))
    }

    /// 删除；返回是否确有记录被删除
    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM usuarios WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// email 是否已被其他用户占用
    pub fn email_taken_by_other(&self, email: &str, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let taken: bool = conn
            .query_row(
                "SELECT 1 FROM usuarios WHERE email = ?1 AND id <> ?2 LIMIT 1",
                params![email, id],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(taken)
    }
}
