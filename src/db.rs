// ==========================================
// KCCR 产品目录 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 注册检索用的自定义标量函数 contains_ci
// - 幂等建表并记录 schema_version
// ==========================================

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "KCCR_DB_PATH";

/// 配置 SQLite 连接的统一 PRAGMA 与自定义函数
///
/// 说明：
/// - foreign_keys / busy_timeout 需要“每个连接”单独配置
/// - contains_ci 同样是连接级注册，必须在每个连接上执行
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    register_contains_ci(conn)?;
    Ok(())
}

/// 注册 contains_ci(haystack, needle)
///
/// SQLite 内置 LOWER / LIKE 只处理 ASCII，"LÁCTEOS" 与 "lácteos" 无法匹配；
/// 这里用 Rust 的 Unicode 小写比较。任一参数为 NULL 时返回 0。
fn register_contains_ci(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "contains_ci",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let haystack: Option<String> = ctx.get(0)?;
            let needle: Option<String> = ctx.get(1)?;
            Ok(match (haystack, needle) {
                (Some(h), Some(n)) => h.to_lowercase().contains(&n.to_lowercase()),
                _ => false,
            })
        },
    )
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 默认数据库路径
///
/// 优先读取 KCCR_DB_PATH，否则落在系统数据目录下 kccr-catalog/kccr.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.push("kccr-catalog");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        warn!(error = %e, dir = %dir.display(), "创建数据目录失败，回退到当前目录");
        return "kccr.db".to_string();
    }
    dir.push("kccr.db");
    dir.to_string_lossy().to_string()
}

/// 建表（幂等）
///
/// productos 不定义唯一约束：INSERT OR IGNORE 只有在运维方自行加唯一索引后才会去重。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS roles (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre      TEXT NOT NULL UNIQUE,
            descripcion TEXT
        );

        CREATE TABLE IF NOT EXISTS usuarios (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre        TEXT NOT NULL,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            rol_id        INTEGER NOT NULL REFERENCES roles(id),
            creado_en     TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS productos (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            cat_general      TEXT,
            categoria1       TEXT,
            fabricante_marca TEXT NOT NULL,
            nombre           TEXT NOT NULL,
            certifica        TEXT,
            sello            TEXT,
            atributo1        TEXT,
            atributo2        TEXT,
            atributo3        TEXT,
            tienda           TEXT,
            foto_producto    TEXT,
            foto_sello1      TEXT,
            foto_sello2      TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_productos_orden
            ON productos (fabricante_marca, nombre);

        CREATE TABLE IF NOT EXISTS noticias (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            titulo         TEXT NOT NULL,
            contenido      TEXT,
            image_url      TEXT,
            file_url       TEXT,
            destino        TEXT NOT NULL DEFAULT 'NOVEDADES'
                           CHECK (destino IN ('NOVEDADES', 'ANUNCIANTES')),
            autor_id       INTEGER REFERENCES usuarios(id) ON DELETE SET NULL,
            creado_en      TEXT NOT NULL,
            actualizado_en TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS eventos (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            titulo        TEXT NOT NULL,
            descripcion   TEXT,
            ubicacion     TEXT,
            inicio        TEXT NOT NULL,
            fin           TEXT,
            todo_el_dia   INTEGER NOT NULL DEFAULT 0,
            creado_por_id INTEGER REFERENCES usuarios(id) ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_eventos_inicio ON eventos (inicio);

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id   TEXT NOT NULL DEFAULT 'global',
            key        TEXT NOT NULL,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    match read_schema_version(conn)? {
        Some(v) if v > CURRENT_SCHEMA_VERSION => {
            warn!(db_version = v, code_version = CURRENT_SCHEMA_VERSION, "数据库版本高于当前代码版本");
        }
        v => info!(schema_version = ?v, "数据库结构已就绪"),
    }

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
