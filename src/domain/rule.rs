// ==========================================
// 智能体测试夹具 - 导入规则
// ==========================================
// 职责: 描述电子表格列到目标表字段的映射
// 说明: 规则由调用方按次提供，导入过程中不可变
// ==========================================

use crate::domain::model::{model_table_name, ModelColumn, ModelSchema};
use crate::domain::types::{ColumnKind, LINE_FIELD};
use serde::{Deserialize, Serialize};

/// 导入规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// 目标表名（模型名）
    pub name: String,
    /// 列映射（name 为 Excel 列字母，如 "A"、"AB"）
    pub columns: Vec<RuleColumn>,
}

/// 规则列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleColumn {
    /// Excel 列名（列字母）
    pub name: String,
    /// Excel 字段名（表头文字）
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn default_nullable() -> bool {
    true
}

impl Rule {
    /// 参与数据读取的列（排除 __line）
    pub fn data_columns(&self) -> impl Iterator<Item = &RuleColumn> {
        self.columns.iter().filter(|c| c.name != LINE_FIELD)
    }

    /// 由规则派生暂存表的模型定义（__line + 规则列）
    pub fn to_schema(&self) -> ModelSchema {
        let mut columns = vec![ModelColumn::line()];
        columns.extend(self.data_columns().map(|c| ModelColumn {
            name: c.name.clone(),
            label: c.label.clone(),
            kind: ColumnKind::parse(&c.kind),
            nullable: c.nullable,
            unique: false,
        }));
        ModelSchema::new(model_table_name(&self.name), columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rule() -> Rule {
        serde_json::from_value(serde_json::json!({
            "name": "tmp_src",
            "columns": [
                {"name": "__line", "label": "行号", "type": "integer", "nullable": false},
                {"name": "A", "label": "门店", "type": "string", "nullable": true},
                {"name": "C", "label": "金额", "type": "decimal", "nullable": true, "comment": "元"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_data_columns_skip_line() {
        let rule = sample_rule();
        let names: Vec<&str> = rule.data_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_to_schema_prepends_line_column() {
        let schema = sample_rule().to_schema();
        assert_eq!(schema.name, "tmp_src");
        let names: Vec<&str> = schema.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["__line", "A", "C"]);
        assert_eq!(schema.columns[2].kind, ColumnKind::Real);
    }

    #[test]
    fn test_nullable_defaults_to_true() {
        let column: RuleColumn =
            serde_json::from_value(serde_json::json!({"name": "B", "label": "x", "type": "string"}))
                .unwrap();
        assert!(column.nullable);
    }
}
