// ==========================================
// 智能体测试夹具 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 模型错误 =====
    #[error("模型未定义: {0}")]
    ModelNotFound(String),

    #[error("字段不存在 (model={model}): {field}")]
    UnknownField { model: String, field: String },

    #[error("字段与数据列数不一致 (model={model}): 字段 {fields} 列, 第 {row} 行有 {actual} 列")]
    ColumnCountMismatch {
        model: String,
        fields: usize,
        row: usize,
        actual: usize,
    },

    // ===== 数据库错误 =====
    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("非空约束违反: {0}")]
    NotNullViolation(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if let Some(model) = msg.strip_prefix("no such table: ") {
                    RepositoryError::ModelNotFound(model.to_string())
                } else if let Some((table, field)) = msg.split_once(" has no column named ") {
                    RepositoryError::UnknownField {
                        model: table.trim_start_matches("table ").to_string(),
                        field: field.to_string(),
                    }
                } else if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("NOT NULL") {
                    RepositoryError::NotNullViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_sqlite_errors_are_classified() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE t (a TEXT NOT NULL UNIQUE)", []).unwrap();

        let err: RepositoryError = conn.execute("INSERT INTO missing (a) VALUES (1)", []).unwrap_err().into();
        assert!(matches!(err, RepositoryError::ModelNotFound(ref m) if m == "missing"));

        let err: RepositoryError = conn.execute("INSERT INTO t (b) VALUES (1)", []).unwrap_err().into();
        assert!(matches!(err, RepositoryError::UnknownField { ref model, ref field } if model == "t" && field == "b"));

        let err: RepositoryError = conn.execute("INSERT INTO t (a) VALUES (NULL)", []).unwrap_err().into();
        assert!(matches!(err, RepositoryError::NotNullViolation(_)));

        conn.execute("INSERT INTO t (a) VALUES ('x')", []).unwrap();
        let err: RepositoryError = conn.execute("INSERT INTO t (a) VALUES ('x')", []).unwrap_err().into();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }
}
