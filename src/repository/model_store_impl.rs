// ==========================================
// 智能体测试夹具 - 模型存储 SQLite 实现
// ==========================================
// 职责: 实现模型表的建表/插入/分页/查询（使用 rusqlite）
// 约束: 所有值使用参数化绑定；标识符统一 quote_ident
// ==========================================

use crate::db::{open_in_memory, open_sqlite_connection, quote_ident};
use crate::domain::{ColumnKind, ModelColumn, ModelSchema, Row, Where, ID_FIELD};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::model_store::ModelStore;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde_json::{Number, Value};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// ==========================================
// 值转换
// ==========================================

/// JSON 值 → SQLite 值（数组/对象按 JSON 文本存储）
pub(crate) fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                SqlValue::Real(f)
            } else {
                SqlValue::Null
            }
        }
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

/// SQLite 值 → JSON 值
pub(crate) fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(hex::encode(b)),
    }
}

fn where_clause(wheres: &[Where]) -> (String, Vec<SqlValue>) {
    if wheres.is_empty() {
        return (String::new(), Vec::new());
    }

    let mut parts = Vec::with_capacity(wheres.len());
    let mut args = Vec::new();
    for w in wheres {
        if w.value.is_null() {
            parts.push(format!("{} IS NULL", quote_ident(&w.column)));
        } else {
            parts.push(format!("{} = ?", quote_ident(&w.column)));
            args.push(to_sql_value(&w.value));
        }
    }
    (format!(" WHERE {}", parts.join(" AND ")), args)
}

// ==========================================
// SqliteModelStore
// ==========================================
pub struct SqliteModelStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteModelStore {
    /// 打开数据库文件
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 内存数据库
    pub fn in_memory() -> RepositoryResult<Self> {
        let conn = open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（调用方负责元数据表初始化）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 共享底层连接（配置管理器等复用同一数据库）
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn table_exists(conn: &Connection, model: &str) -> RepositoryResult<bool> {
        let exists = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type='table' AND name = ?1 LIMIT 1",
                params![model],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    fn query_rows(conn: &Connection, sql: &str, args: Vec<SqlValue>) -> RepositoryResult<Vec<Row>> {
        let mut stmt = conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();
        let mut rows = stmt.query(params_from_iter(args))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Row::new();
            for (idx, name) in names.iter().enumerate() {
                record.insert(name.clone(), from_value_ref(row.get_ref(idx)?));
            }
            out.push(record);
        }
        Ok(out)
    }
}

impl ModelStore for SqliteModelStore {
    fn register(&self, schema: &ModelSchema) -> RepositoryResult<()> {
        let mut conn = self.lock()?;

        let mut defs = vec![format!(
            "{} INTEGER PRIMARY KEY AUTOINCREMENT",
            quote_ident(ID_FIELD)
        )];
        for column in &schema.columns {
            let mut def = quote_ident(&column.name);
            let sql_type = column.kind.sql_type();
            if !sql_type.is_empty() {
                def.push(' ');
                def.push_str(sql_type);
            }
            if !column.nullable {
                def.push_str(" NOT NULL");
            }
            if column.unique {
                def.push_str(" UNIQUE");
            }
            defs.push(def);
        }

        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        tx.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} ({})",
                quote_ident(&schema.name),
                defs.join(", ")
            ),
            [],
        )?;
        tx.execute("DELETE FROM __model_meta WHERE model = ?1", params![schema.name])?;
        for (position, column) in schema.columns.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO __model_meta (model, position, name, label, kind, nullable, is_unique)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    schema.name,
                    position as i64,
                    column.name,
                    column.label,
                    column.kind.as_str(),
                    column.nullable,
                    column.unique,
                ],
            )?;
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        debug!(model = %schema.name, columns = schema.columns.len(), "模型已注册");
        Ok(())
    }

    fn columns(&self, model: &str) -> RepositoryResult<Vec<ModelColumn>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT name, label, kind, nullable, is_unique FROM __model_meta WHERE model = ?1 ORDER BY position",
        )?;
        let columns = stmt
            .query_map(params![model], |row| {
                let kind: String = row.get(2)?;
                Ok(ModelColumn {
                    name: row.get(0)?,
                    label: row.get(1)?,
                    kind: ColumnKind::parse(&kind),
                    nullable: row.get(3)?,
                    unique: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        if !columns.is_empty() {
            return Ok(columns);
        }

        // 未登记列定义的表：回退到 PRAGMA，标签取列名
        if !Self::table_exists(&conn, model)? {
            return Err(RepositoryError::ModelNotFound(model.to_string()));
        }
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(model)))?;
        let columns = stmt
            .query_map([], |row| {
                let name: String = row.get(1)?;
                let decl: String = row.get(2)?;
                let notnull: bool = row.get(3)?;
                Ok(ModelColumn {
                    label: name.clone(),
                    name,
                    kind: ColumnKind::parse(&decl),
                    nullable: !notnull,
                    unique: false,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns.into_iter().filter(|c| c.name != ID_FIELD).collect())
    }

    fn insert(&self, model: &str, fields: &[String], rows: &[Vec<Value>]) -> RepositoryResult<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut conn = self.lock()?;
        let columns: Vec<String> = fields.iter().map(|f| quote_ident(f)).collect();
        let placeholders: Vec<String> = (1..=fields.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(model),
            columns.join(", "),
            placeholders.join(", ")
        );

        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for (idx, row) in rows.iter().enumerate() {
                if row.len() != fields.len() {
                    return Err(RepositoryError::ColumnCountMismatch {
                        model: model.to_string(),
                        fields: fields.len(),
                        row: idx + 1,
                        actual: row.len(),
                    });
                }
                stmt.execute(params_from_iter(row.iter().map(to_sql_value)))?;
            }
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(rows.len())
    }

    fn create(&self, model: &str, row: &Row) -> RepositoryResult<i64> {
        let conn = self.lock()?;

        if row.is_empty() {
            conn.execute(&format!("INSERT INTO {} DEFAULT VALUES", quote_ident(model)), [])?;
            return Ok(conn.last_insert_rowid());
        }

        let columns: Vec<String> = row.keys().map(|k| quote_ident(k)).collect();
        let placeholders: Vec<String> = (1..=row.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(model),
            columns.join(", "),
            placeholders.join(", ")
        );
        conn.execute(&sql, params_from_iter(row.values().map(to_sql_value)))?;
        Ok(conn.last_insert_rowid())
    }

    fn upsert(
        &self,
        model: &str,
        row: &Row,
        unique_by: &str,
        update_columns: &[&str],
    ) -> RepositoryResult<()> {
        let conn = self.lock()?;

        let columns: Vec<String> = row.keys().map(|k| quote_ident(k)).collect();
        let placeholders: Vec<String> = (1..=row.len()).map(|i| format!("?{}", i)).collect();

        // 只更新本行实际携带的列，避免把未提供的列覆盖为 NULL
        let updates: Vec<String> = update_columns
            .iter()
            .filter(|c| row.contains_key(**c))
            .map(|c| format!("{col} = excluded.{col}", col = quote_ident(c)))
            .collect();
        let conflict_action = if updates.is_empty() {
            "DO NOTHING".to_string()
        } else {
            format!("DO UPDATE SET {}", updates.join(", "))
        };

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}) {}",
            quote_ident(model),
            columns.join(", "),
            placeholders.join(", "),
            quote_ident(unique_by),
            conflict_action
        );
        conn.execute(&sql, params_from_iter(row.values().map(to_sql_value)))?;
        Ok(())
    }

    fn paginate(
        &self,
        model: &str,
        order_by: &str,
        offset: usize,
        limit: usize,
    ) -> RepositoryResult<Vec<Row>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT * FROM {} ORDER BY {} ASC LIMIT ?1 OFFSET ?2",
            quote_ident(model),
            quote_ident(order_by)
        );
        Self::query_rows(
            &conn,
            &sql,
            vec![SqlValue::Integer(limit as i64), SqlValue::Integer(offset as i64)],
        )
    }

    fn find(
        &self,
        model: &str,
        select: &[&str],
        wheres: &[Where],
        limit: Option<usize>,
    ) -> RepositoryResult<Vec<Row>> {
        let conn = self.lock()?;

        let select_sql = if select.is_empty() {
            "*".to_string()
        } else {
            select.iter().map(|c| quote_ident(c)).collect::<Vec<_>>().join(", ")
        };
        let (where_sql, mut args) = where_clause(wheres);
        let mut sql = format!("SELECT {} FROM {}{}", select_sql, quote_ident(model), where_sql);
        if let Some(limit) = limit {
            sql.push_str(" LIMIT ?");
            args.push(SqlValue::Integer(limit as i64));
        }

        Self::query_rows(&conn, &sql, args)
    }

    fn count(&self, model: &str, wheres: &[Where]) -> RepositoryResult<i64> {
        let conn = self.lock()?;
        let (where_sql, args) = where_clause(wheres);
        let sql = format!("SELECT COUNT(*) AS count FROM {}{}", quote_ident(model), where_sql);
        let count: Option<i64> = conn
            .query_row(&sql, params_from_iter(args), |row| row.get(0))
            .optional()?;
        Ok(count.unwrap_or(0))
    }
}
