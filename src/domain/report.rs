// ==========================================
// 智能体测试夹具 - 导入报表
// ==========================================
// 职责: 错误记录、预览表格、对账结果
// ==========================================

use crate::domain::types::{LINE_LABEL, MESSAGE_LABEL};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 错误记录（转换拒绝或写入失败）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(rename = "__line")]
    pub line: Value,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(line: Value, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }

    /// 错误预览行: [行号, 错误信息]
    pub fn to_preview_row(&self) -> Vec<Value> {
        vec![self.line.clone(), Value::String(self.message.clone())]
    }
}

/// 预览表格（列名 + 数据行）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

impl ReportTable {
    /// 空的错误表（固定两列）
    pub fn error_table() -> Self {
        Self {
            columns: vec![LINE_LABEL.to_string(), MESSAGE_LABEL.to_string()],
            data: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// 表到表对账结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub success: ReportTable,
    pub error: ReportTable,
}

impl ReconcileReport {
    /// 已处理的源行总数（成功 + 失败）
    pub fn total(&self) -> usize {
        self.success.len() + self.error.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_record_serializes_line_field() {
        let record = ErrorRecord::new(json!(7), "金额格式错误");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"__line": 7, "message": "金额格式错误"}));
        assert_eq!(record.to_preview_row(), vec![json!(7), json!("金额格式错误")]);
    }

    #[test]
    fn test_error_table_columns() {
        let table = ReportTable::error_table();
        assert_eq!(table.columns, vec!["行号(Excel)", "错误信息"]);
        assert!(table.is_empty());
    }
}
