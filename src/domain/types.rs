// ==========================================
// 智能体测试夹具 - 领域类型定义
// ==========================================
// 职责: 导入管道共享的常量与枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 行号字段（Excel 行号，1-based）
pub const LINE_FIELD: &str = "__line";

/// 主键字段（数据库自增 ID）
pub const ID_FIELD: &str = "__id";

/// 报表中行号列的显示名
pub const LINE_LABEL: &str = "行号(Excel)";

/// 报表中主键列的显示名
pub const ID_LABEL: &str = "ID(DB)";

/// 报表中错误信息列的显示名
pub const MESSAGE_LABEL: &str = "错误信息";

/// 清洗函数返回的成功状态码
pub const CLEAN_OK_CODE: i64 = 200;

// ==========================================
// 报表记录类型 (Report Record Type)
// ==========================================
// 序列化格式: lowercase (与报表表 type 列一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportRecordType {
    Success,
    Error,
}

impl ReportRecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportRecordType::Success => "success",
            ReportRecordType::Error => "error",
        }
    }
}

impl fmt::Display for ReportRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 列类型 (Column Kind)
// ==========================================
// 对应规则/模型中的 type 字段，决定 SQLite 列亲和性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Real,
    Boolean,
    Any,
}

impl ColumnKind {
    /// 从规则中的类型字符串解析（大小写不敏感，未知类型视为 Any）
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "string" | "text" | "char" | "longtext" | "mediumtext" | "json" | "date"
            | "datetime" | "timestamp" | "time" => ColumnKind::Text,
            "integer" | "int" | "bigint" | "smallint" | "tinyint" | "id" => ColumnKind::Integer,
            "float" | "double" | "decimal" | "number" | "real" => ColumnKind::Real,
            "boolean" | "bool" => ColumnKind::Boolean,
            _ => ColumnKind::Any,
        }
    }

    /// SQLite 列声明类型
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnKind::Text => "TEXT",
            ColumnKind::Integer | ColumnKind::Boolean => "INTEGER",
            ColumnKind::Real => "REAL",
            ColumnKind::Any => "",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Text => "string",
            ColumnKind::Integer => "integer",
            ColumnKind::Real => "float",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Any => "any",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_kind_parse() {
        assert_eq!(ColumnKind::parse("String"), ColumnKind::Text);
        assert_eq!(ColumnKind::parse("bigint"), ColumnKind::Integer);
        assert_eq!(ColumnKind::parse("decimal"), ColumnKind::Real);
        assert_eq!(ColumnKind::parse("whatever"), ColumnKind::Any);
        assert_eq!(ColumnKind::Any.sql_type(), "");
    }

    #[test]
    fn test_report_record_type_serde() {
        let json = serde_json::to_string(&ReportRecordType::Success).unwrap();
        assert_eq!(json, "\"success\"");
        assert_eq!(ReportRecordType::Error.to_string(), "error");
    }
}
