// ==========================================
// 智能体测试夹具 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少偶发 busy 错误
// - 初始化元数据表（config_kv / __model_meta）
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    init_meta_schema(&conn)?;
    Ok(conn)
}

/// 打开内存数据库（测试与一次性运行使用）
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    init_meta_schema(&conn)?;
    Ok(conn)
}

/// 初始化元数据表（幂等）
///
/// - config_kv: 全局配置键值
/// - __model_meta: 模型列定义（名称/标签/类型），用于报表列名人性化
pub fn init_meta_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS __model_meta (
            model TEXT NOT NULL,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            label TEXT NOT NULL,
            kind TEXT NOT NULL,
            nullable INTEGER NOT NULL DEFAULT 1,
            is_unique INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (model, name)
        );
        "#,
    )
}

/// 引用 SQLite 标识符（表名/列名）
///
/// 模型名可能包含 `.`（如 `admin.user`），统一用双引号包裹并转义内部引号
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
