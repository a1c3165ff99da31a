// ==========================================
// 智能体测试夹具 - 领域模型层
// ==========================================
// 职责: 定义导入规则、模型、报表、预览等领域类型
// 红线: 不含数据访问逻辑,不含管道逻辑
// ==========================================

pub mod model;
pub mod preview;
pub mod report;
pub mod rule;
pub mod types;

// 重导出核心类型
pub use model::{model_table_name, ModelColumn, ModelSchema, Row, Where};
pub use preview::{ActionProps, EmitEvent, EventPayload, PreviewAction, PreviewParams, TableData};
pub use report::{ErrorRecord, ReconcileReport, ReportTable};
pub use rule::{Rule, RuleColumn};
pub use types::{
    ColumnKind, ReportRecordType, CLEAN_OK_CODE, ID_FIELD, ID_LABEL, LINE_FIELD, LINE_LABEL,
    MESSAGE_LABEL,
};
