// ==========================================
// 智能体测试夹具 - 电子表格导入暂存表
// ==========================================
// 流程: 读取窗口 → 按规则选列 → 标记行号 → 批量插入
// 约束: 批量插入全部成功或全部失败，错误原样向上传递
// ==========================================

use crate::domain::{model_table_name, Rule, LINE_FIELD};
use crate::importer::column_name::column_name_to_number;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::SheetSource;
use crate::repository::{ModelStore, RepositoryError};
use serde_json::Value;
use tracing::{debug, info, instrument};

/// 规则列解析结果: 字段名 + 0-based 列下标
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSelection {
    pub fields: Vec<String>,
    pub indices: Vec<usize>,
}

impl ColumnSelection {
    /// 解析规则列（跳过 __line）
    pub fn from_rule(rule: &Rule) -> ImportResult<Self> {
        let mut fields = Vec::new();
        let mut indices = Vec::new();
        for column in rule.data_columns() {
            indices.push(column_name_to_number(&column.name)? - 1);
            fields.push(column.name.clone());
        }
        Ok(Self { fields, indices })
    }

    /// 插入字段顺序: [__line, ...规则列]
    pub fn insert_fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(self.fields.len() + 1);
        fields.push(LINE_FIELD.to_string());
        fields.extend(self.fields.iter().cloned());
        fields
    }
}

/// 确保暂存表存在（不存在时按规则建表）
fn ensure_staging_model(store: &dyn ModelStore, rule: &Rule, table: &str) -> ImportResult<()> {
    match store.columns(table) {
        Ok(_) => Ok(()),
        Err(RepositoryError::ModelNotFound(_)) => {
            debug!(model = %rule.name, table = %table, "暂存表不存在，按规则建表");
            store.register(&rule.to_schema())?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// 把窗口内的行转换为插入元组 `[line, ...cells]`
///
/// 行号从 `from + 1` 开始逐行递增（缺行也占用行号）
pub fn select_rows(rows: Vec<Option<Vec<Value>>>, selection: &ColumnSelection, from: usize) -> Vec<Vec<Value>> {
    let mut data = Vec::new();
    let mut line = from;
    for row in rows {
        line += 1;
        let Some(cells) = row else {
            continue;
        };

        let mut tuple = Vec::with_capacity(selection.indices.len() + 1);
        tuple.push(Value::from(line as u64));
        for &idx in &selection.indices {
            tuple.push(cells.get(idx).cloned().unwrap_or(Value::Null));
        }
        data.push(tuple);
    }
    data
}

/// ExcelToTable: 读取窗口并批量写入 `rule.name`
///
/// # 返回
/// - 已插入的元组（与写入顺序一致）
#[instrument(skip(source, store, rule), fields(model = %rule.name))]
pub fn excel_to_table(
    source: &mut dyn SheetSource,
    store: &dyn ModelStore,
    sheet: &str,
    rule: &Rule,
    from: usize,
    chunk_size: usize,
) -> ImportResult<Vec<Vec<Value>>> {
    let selection = ColumnSelection::from_rule(rule)?;
    let rows = source.rows(sheet, from, chunk_size)?;
    debug!(read = rows.len(), "窗口读取完成");

    let data = select_rows(rows, &selection, from);

    let table = model_table_name(&rule.name);
    ensure_staging_model(store, rule, &table)?;
    let inserted = store.insert(&table, &selection.insert_fields(), &data)?;
    info!(inserted = inserted, from = from, chunk_size = chunk_size, "暂存表写入完成");

    Ok(data)
}
