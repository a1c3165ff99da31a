// ==========================================
// 智能体测试夹具 - 核心库
// ==========================================
// 组成:
// - 导入管道: ExcelToTable / TableToTable / 计数 / GetID / 预览
// - 模拟工具: echo / mcpload / search 测试服务
// - Hook 夹具: 按助手 ID 注册的 Create / Next Hook
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 规则 / 模型 / 报表 / 预览
pub mod domain;

// 数据仓储层 - 模型表与缓存
pub mod repository;

// 导入层 - 电子表格导入管道
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 导入入口
pub mod api;

// Hook 层 - 上下文 / 能力端口 / 返回结构
pub mod hooks;

// 模拟工具层 - MCP 测试服务
pub mod tools;

// 助手层 - Hook 夹具
pub mod assistants;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    ModelColumn, ModelSchema, PreviewAction, PreviewParams, ReconcileReport, Row, Rule,
    RuleColumn, TableData, Where,
};

// 导入管道
pub use importer::{ImportError, ImportResult, RowCleaner};

// API
pub use api::{ApiError, ApiResult, ImportApi};

// Hook
pub use hooks::{
    AgentContext, ContextInfo, CreateHook, CreateResponse, HookError, HookReply, HookResult,
    Message, NextHook, NextPayload, NextResponse,
};

// 工具与助手
pub use assistants::AssistantRegistry;
pub use tools::{ToolError, ToolRegistry};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "智能体测试夹具";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(!APP_NAME.is_empty());
    }
}
