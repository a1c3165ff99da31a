// ==========================================
// 智能体测试夹具 - 导入层
// ==========================================
// 流程: 电子表格 → 暂存表 → 目标表对账 → 预览
// 支持: Excel, CSV
// ==========================================
// 错误分两级: 行级错误写入报表（数据），形状/配置错误直接返回（致命）
// ==========================================

// 模块声明
pub mod cleaner;
pub mod column_name;
pub mod counter;
pub mod error;
pub mod excel_to_table;
pub mod file_parser;
pub mod id_resolver;
pub mod preview;
pub mod table_to_table;

// 重导出核心类型
pub use cleaner::{CleanOutcome, CleanerRegistry, RowCleaner};
pub use column_name::{column_name_to_number, column_number_to_name};
pub use counter::{count_model, count_model_where, count_rows};
pub use error::{ImportError, ImportResult};
pub use excel_to_table::{excel_to_table, ColumnSelection};
pub use file_parser::{open_sheet_source, CsvSheetSource, ExcelSheetSource, SheetDimension, SheetSource};
pub use id_resolver::{get_id, IdLookup};
pub use preview::{fingerprint, make_preview_data, preview_message, FileSink, LocalFs};
pub use table_to_table::{fmt_key, table_to_table, TableToTableJob};
