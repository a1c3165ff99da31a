// ==========================================
// 智能体测试夹具 - 表到表对账
// ==========================================
// 流程: 分页读取源表 → 键名归一 → 清洗 → 逐行写入目标表
//       → 错误写入报表 → 成功记录写入报表 → 生成预览表格
// 约束: 每一行源数据要么进入成功报表，要么进入错误报表
//       报表写入失败只记录日志，不中断对账
// ==========================================

use crate::domain::{
    model_table_name, ErrorRecord, ModelColumn, ReconcileReport, ReportRecordType, ReportTable,
    Row, ID_FIELD, ID_LABEL, LINE_FIELD, LINE_LABEL,
};
use crate::importer::cleaner::{CleanOutcome, RowCleaner};
use crate::importer::error::ImportResult;
use crate::repository::ModelStore;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, warn};

/// 报表更新列
const REPORT_UPDATE_COLUMNS: [&str; 2] = ["message", "type"];

/// 对账任务参数
#[derive(Debug, Clone, PartialEq)]
pub struct TableToTableJob {
    /// 源表（暂存表）
    pub source: String,
    /// 目标表
    pub target: String,
    /// 报表
    pub report: String,
    /// 源表行偏移
    pub from: usize,
    pub chunk_size: usize,
}

/// 键名归一: `{source}_x` → `X`，其余键保持原样
///
/// 未带前缀的键保持原有顺序在前，改名后的键依次追加
pub fn fmt_key(source: &str, row: Row) -> Row {
    let prefix = format!("{}_", source);
    let mut plain = Row::new();
    let mut renamed = Vec::new();
    for (key, value) in row {
        match key.strip_prefix(&prefix) {
            Some(rest) => renamed.push((rest.to_uppercase(), value)),
            None => {
                plain.insert(key, value);
            }
        }
    }
    for (key, value) in renamed {
        plain.insert(key, value);
    }
    plain
}

/// 人性化列名
///
/// # 参数
/// - labels: 目标表列名 → `{label} ({name})`
pub fn column_display_name(labels: &HashMap<String, String>, column: &str) -> String {
    if let Some(label) = labels.get(column) {
        return label.clone();
    }
    match column {
        LINE_FIELD => LINE_LABEL.to_string(),
        ID_FIELD => ID_LABEL.to_string(),
        other => other.to_string(),
    }
}

fn display_names(columns: &[ModelColumn]) -> HashMap<String, String> {
    columns
        .iter()
        .map(|c| (c.name.clone(), c.display_name()))
        .collect()
}

/// 源行 → 目标行（清洗结果分类）
fn transform_row(row: Row, cleaner: Option<&dyn RowCleaner>) -> ImportResult<CleanOutcome> {
    let line = row.get(LINE_FIELD).cloned().unwrap_or(Value::Null);
    let outcome = match cleaner {
        Some(cleaner) => CleanOutcome::classify(cleaner.clean(&row))?,
        None => CleanOutcome::Accepted(row),
    };

    Ok(match outcome {
        CleanOutcome::Accepted(mut data) => {
            data.insert(LINE_FIELD.to_string(), line);
            CleanOutcome::Accepted(data)
        }
        rejected => rejected,
    })
}

fn record_error(store: &dyn ModelStore, report: &str, record: &ErrorRecord) {
    let mut row = Row::new();
    row.insert(LINE_FIELD.to_string(), record.line.clone());
    row.insert("message".to_string(), Value::String(record.message.clone()));
    row.insert(
        "type".to_string(),
        Value::String(ReportRecordType::Error.to_string()),
    );

    if let Err(e) = store.upsert(report, &row, LINE_FIELD, &REPORT_UPDATE_COLUMNS) {
        error!(report = %report, line = %record.line, error = %e, "[Import] 错误记录写入报表失败");
    }
}

fn record_success(store: &dyn ModelStore, report: &str, line: &Value) {
    let mut row = Row::new();
    row.insert(LINE_FIELD.to_string(), line.clone());
    row.insert(
        "type".to_string(),
        Value::String(ReportRecordType::Success.to_string()),
    );

    if let Err(e) = store.create(report, &row) {
        error!(report = %report, line = %line, error = %e, "[Import] 成功记录写入报表失败");
    }
}

/// 成功表格: 列取自首个成功行（排除 __line / __id）
fn success_table(effective: &[Row], labels: &HashMap<String, String>) -> ReportTable {
    let source_columns: Vec<String> = effective
        .first()
        .map(|row| {
            row.keys()
                .filter(|k| k.as_str() != LINE_FIELD && k.as_str() != ID_FIELD)
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    let mut columns = vec![LINE_LABEL.to_string()];
    columns.extend(source_columns.iter().map(|c| column_display_name(labels, c)));

    let data = effective
        .iter()
        .map(|row| {
            let mut cells = vec![row.get(LINE_FIELD).cloned().unwrap_or(Value::Null)];
            cells.extend(
                source_columns
                    .iter()
                    .map(|c| row.get(c).cloned().unwrap_or(Value::Null)),
            );
            cells
        })
        .collect();

    ReportTable { columns, data }
}

/// TableToTable: 源表 → 目标表，附带对账报表
///
/// # 返回
/// - 成功/错误两张预览表格
///
/// # 错误
/// - 清洗结果形状非法、源表读取失败、目标表列定义读取失败
#[instrument(skip(store, cleaner), fields(source = %job.source, target = %job.target))]
pub fn table_to_table(
    store: &dyn ModelStore,
    job: &TableToTableJob,
    cleaner: Option<&dyn RowCleaner>,
) -> ImportResult<ReconcileReport> {
    let source = model_table_name(&job.source);
    let target = model_table_name(&job.target);
    let report = model_table_name(&job.report);

    let source_rows = store.paginate(&source, LINE_FIELD, job.from, job.chunk_size)?;
    debug!(rows = source_rows.len(), "源表分页读取完成");

    // 1. 清洗
    let mut target_rows = Vec::new();
    let mut errors = Vec::new();
    for row in source_rows {
        let row: Row = fmt_key(&source, row)
            .into_iter()
            .filter(|(key, _)| key != ID_FIELD)
            .collect();
        let line = row.get(LINE_FIELD).cloned().unwrap_or(Value::Null);

        match transform_row(row, cleaner)? {
            CleanOutcome::Accepted(data) => target_rows.push(data),
            CleanOutcome::Rejected(message) => errors.push(ErrorRecord::new(line, message)),
        }
    }

    // 2. 逐行写入目标表
    let mut effective = Vec::with_capacity(target_rows.len());
    for row in target_rows {
        match store.create(&target, &row) {
            Ok(_) => effective.push(row),
            Err(e) => {
                let line = row.get(LINE_FIELD).cloned().unwrap_or(Value::Null);
                warn!(line = %line, error = %e, "目标表写入失败，转入错误报表");
                errors.push(ErrorRecord::new(line, e.to_string()));
            }
        }
    }

    // 3. 报表
    for record in &errors {
        record_error(store, &report, record);
    }
    for row in &effective {
        record_success(store, &report, row.get(LINE_FIELD).unwrap_or(&Value::Null));
    }

    // 4. 预览表格
    let labels = display_names(&store.columns(&target)?);
    let success = success_table(&effective, &labels);
    let mut error_table = ReportTable::error_table();
    error_table.data = errors.iter().map(ErrorRecord::to_preview_row).collect();

    info!(
        success = success.len(),
        error = error_table.len(),
        "对账完成"
    );

    Ok(ReconcileReport {
        success,
        error: error_table,
    })
}
