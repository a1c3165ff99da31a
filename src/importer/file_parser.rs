// ==========================================
// 智能体测试夹具 - 电子表格读取
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xlsb/.xls/.ods) / CSV (.csv)
// 约定: 行号与电子表格行号一致（第 from+i+1 行）
//       缺失/空白单元格为 null；整行空白视为缺行（None）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use csv::ReaderBuilder;
use serde_json::{Number, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 一行单元格；None 表示缺行（空白行或窗口内不存在的行）
pub type SheetRow = Option<Vec<Value>>;

/// 工作表尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SheetDimension {
    pub rows: usize,
    pub cols: usize,
}

// ==========================================
// SheetSource Trait
// ==========================================
// 实现者: ExcelSheetSource, CsvSheetSource
pub trait SheetSource {
    /// 读取窗口内的行（from 为 0-based 行偏移）
    fn rows(&mut self, sheet: &str, from: usize, chunk_size: usize) -> ImportResult<Vec<SheetRow>>;

    /// 工作表尺寸（rows 为最后一个非空行的行号）
    fn dimension(&mut self, sheet: &str) -> ImportResult<SheetDimension>;
}

fn normalize_row(cells: Vec<Value>) -> SheetRow {
    if cells.iter().all(Value::is_null) {
        None
    } else {
        Some(cells)
    }
}

fn text_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::String(trimmed.to_string())
    }
}

// ==========================================
// Excel 实现
// ==========================================
pub struct ExcelSheetSource {
    workbook: Sheets<BufReader<File>>,
}

impl ExcelSheetSource {
    pub fn open(path: &Path) -> ImportResult<Self> {
        let workbook = open_workbook_auto(path)?;
        Ok(Self { workbook })
    }

    fn range(&mut self, sheet: &str) -> ImportResult<Range<Data>> {
        if !self.workbook.sheet_names().iter().any(|name| name == sheet) {
            return Err(ImportError::SheetNotFound(sheet.to_string()));
        }
        Ok(self.workbook.worksheet_range(sheet)?)
    }
}

/// 单元格 → JSON 值（日期等其它类型保留文本表示）
pub(crate) fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => text_cell(s),
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        Data::Bool(b) => Value::Bool(*b),
        other => Value::String(other.to_string()),
    }
}

impl SheetSource for ExcelSheetSource {
    fn rows(&mut self, sheet: &str, from: usize, chunk_size: usize) -> ImportResult<Vec<SheetRow>> {
        let range = self.range(sheet)?;
        let (start, end) = match (range.start(), range.end()) {
            (Some(start), Some(end)) => (start, end),
            _ => return Ok(Vec::new()),
        };

        let last_row = end.0 as usize;
        let width = end.1 as usize + 1;
        let mut rows = Vec::new();
        for r in from..from.saturating_add(chunk_size) {
            if r > last_row {
                break;
            }
            if r < start.0 as usize {
                rows.push(None);
                continue;
            }
            let cells = (0..width)
                .map(|c| {
                    range
                        .get_value((r as u32, c as u32))
                        .map(cell_to_value)
                        .unwrap_or(Value::Null)
                })
                .collect();
            rows.push(normalize_row(cells));
        }
        Ok(rows)
    }

    fn dimension(&mut self, sheet: &str) -> ImportResult<SheetDimension> {
        let range = self.range(sheet)?;
        Ok(match range.end() {
            Some((row, col)) if !range.is_empty() => SheetDimension {
                rows: row as usize + 1,
                cols: col as usize + 1,
            },
            _ => SheetDimension::default(),
        })
    }
}

// ==========================================
// CSV 实现（单工作表，sheet 参数忽略）
// ==========================================
pub struct CsvSheetSource {
    records: Vec<Vec<String>>,
}

impl CsvSheetSource {
    pub fn open(path: &Path) -> ImportResult<Self> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            records.push(record.iter().map(|v| v.to_string()).collect());
        }
        Ok(Self { records })
    }

    /// 直接从内存数据构造（测试与脚本使用）
    pub fn from_records(records: Vec<Vec<String>>) -> Self {
        Self { records }
    }

    fn width(&self) -> usize {
        self.records.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl SheetSource for CsvSheetSource {
    fn rows(&mut self, _sheet: &str, from: usize, chunk_size: usize) -> ImportResult<Vec<SheetRow>> {
        let width = self.width();
        let rows = self
            .records
            .iter()
            .skip(from)
            .take(chunk_size)
            .map(|record| {
                let cells = (0..width)
                    .map(|c| record.get(c).map(|v| text_cell(v)).unwrap_or(Value::Null))
                    .collect();
                normalize_row(cells)
            })
            .collect();
        Ok(rows)
    }

    fn dimension(&mut self, _sheet: &str) -> ImportResult<SheetDimension> {
        // 末尾空白行不计入
        let rows = self
            .records
            .iter()
            .rposition(|r| r.iter().any(|v| !v.trim().is_empty()))
            .map(|idx| idx + 1)
            .unwrap_or(0);
        Ok(SheetDimension {
            rows,
            cols: self.width(),
        })
    }
}

// ==========================================
// 通用打开入口（根据扩展名自动选择）
// ==========================================
pub fn open_sheet_source<P: AsRef<Path>>(file_path: P) -> ImportResult<Box<dyn SheetSource>> {
    let path = file_path.as_ref();
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => Ok(Box::new(CsvSheetSource::open(path)?)),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Box::new(ExcelSheetSource::open(path)?)),
        _ => Err(ImportError::UnsupportedFormat(ext)),
    }
}
