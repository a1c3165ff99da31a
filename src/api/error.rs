// ==========================================
// 智能体测试夹具 - API层错误类型
// ==========================================
// 职责: 把各层技术错误转换为用户可读的错误消息
// ==========================================

use crate::importer::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("数据清洗失败: {0}")]
    CleanError(String),

    #[error("预览生成失败: {0}")]
    PreviewError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ModelNotFound(model) => ApiError::NotFound(format!("模型 {}", model)),
            RepositoryError::UnknownField { model, field } => {
                ApiError::InvalidInput(format!("模型 {} 不存在字段 {}", model, field))
            }
            RepositoryError::ColumnCountMismatch { .. } => ApiError::InvalidInput(err.to_string()),
            RepositoryError::DatabaseTransactionError(msg) => ApiError::DatabaseTransactionError(msg),
            RepositoryError::LockError(msg)
            | RepositoryError::DatabaseQueryError(msg)
            | RepositoryError::UniqueConstraintViolation(msg)
            | RepositoryError::NotNullViolation(msg) => ApiError::DatabaseError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Repository(repo) => repo.into(),
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件 {}", path)),
            ImportError::InvalidColumnName(_)
            | ImportError::MissingArgument(_)
            | ImportError::FieldValueMismatch { .. } => ApiError::InvalidInput(err.to_string()),
            ImportError::CleanerNotFound(_) | ImportError::InvalidCleanResult(_) => {
                ApiError::CleanError(err.to_string())
            }
            ImportError::PreviewWriteError { .. } => ApiError::PreviewError(err.to_string()),
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
