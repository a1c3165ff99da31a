// ==========================================
// 智能体测试夹具 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 这里只放“致命”错误（调用方/配置问题）；
//       行级错误作为数据进入错误报表，不走这里
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xlsm/.xlsb/.xls/.ods/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("工作表不存在: {0}")]
    SheetNotFound(String),

    // ===== 规则/参数错误 =====
    #[error("无效的列名: {0}（应为 Excel 列字母，如 A、AB）")]
    InvalidColumnName(String),

    #[error("缺少必填参数: {0}")]
    MissingArgument(String),

    #[error("字段与值类型不匹配 field:{field} value:{value}")]
    FieldValueMismatch { field: String, value: String },

    // ===== 清洗错误 =====
    #[error("清洗函数未注册: {0}")]
    CleanerNotFound(String),

    #[error("Invalid target row {0}")]
    InvalidCleanResult(String),

    // ===== 数据库错误 =====
    #[error("数据库操作失败: {0}")]
    Repository(#[from] RepositoryError),

    // ===== 预览错误 =====
    #[error("预览数据写入失败 ({path}): {message}")]
    PreviewWriteError { path: String, message: String },

    #[error("序列化失败: {0}")]
    SerializeError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::Repository(RepositoryError::from(err))
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::SerializeError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
