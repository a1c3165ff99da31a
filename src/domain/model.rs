// ==========================================
// 智能体测试夹具 - 模型定义
// ==========================================
// 职责: 模型（数据表）的列定义、查询条件、行类型
// ==========================================

use crate::domain::types::{ColumnKind, LINE_FIELD};
use serde_json::{Map, Value};

/// 模型 ID → 表名（`admin.user` → `admin_user`）
pub fn model_table_name(model_id: &str) -> String {
    model_id.replace('.', "_")
}

/// 一行数据：字段名 → 值（保持插入顺序）
pub type Row = Map<String, Value>;

/// 模型定义
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    pub name: String,
    pub columns: Vec<ModelColumn>,
}

/// 模型列
#[derive(Debug, Clone, PartialEq)]
pub struct ModelColumn {
    pub name: String,
    pub label: String,
    pub kind: ColumnKind,
    pub nullable: bool,
    pub unique: bool,
}

impl ModelColumn {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            nullable: true,
            unique: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// 行号列
    pub fn line() -> Self {
        ModelColumn::new(LINE_FIELD, "行号", ColumnKind::Integer)
    }

    /// 人性化列名: `{label} ({name})`
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.label, self.name)
    }
}

impl ModelSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ModelColumn>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// 导入报表模型: __line 唯一，message / type 可更新
    pub fn import_report(name: impl Into<String>) -> Self {
        Self::new(
            name,
            vec![
                ModelColumn::line().unique(),
                ModelColumn::new("message", "错误信息", ColumnKind::Text),
                ModelColumn::new("type", "类型", ColumnKind::Text),
            ],
        )
    }

    pub fn column(&self, name: &str) -> Option<&ModelColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// 等值查询条件（value 为 null 时匹配 IS NULL）
#[derive(Debug, Clone, PartialEq)]
pub struct Where {
    pub column: String,
    pub value: Value,
}

impl Where {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}
