// ==========================================
// 智能体测试夹具 - 宿主能力端口
// ==========================================
// 职责: 定义 Hook 可调用的宿主能力接口（不包含实现）
// 实现者: ToolRegistry (MCP), MemoryTracer, MockSearchClient,
//         MemorySpace, StoreProcessRunner
// ==========================================

use crate::hooks::error::HookResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

// ==========================================
// MCP
// ==========================================

/// 工具定义（MCP 格式）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// ListTools 结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolList {
    pub tools: Vec<ToolDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

pub trait McpClient: Send + Sync {
    fn list_tools(&self, server: &str, cursor: &str) -> HookResult<ToolList>;

    fn call_tool(&self, server: &str, tool: &str, args: Value) -> HookResult<Value>;
}

// ==========================================
// Trace
// ==========================================

/// 追踪节点选项
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TraceOptions {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }
}

pub trait Tracer: Send + Sync {
    /// 新建根节点
    fn add(&self, input: Value, options: TraceOptions) -> HookResult<Arc<dyn TraceNode>>;
}

pub trait TraceNode: Send + Sync {
    fn id(&self) -> String;

    fn info(&self, message: &str);

    fn debug(&self, message: &str);

    fn complete(&self, output: Value);

    /// 新建子节点
    fn add(&self, input: Value, options: TraceOptions) -> HookResult<Arc<dyn TraceNode>>;
}

// ==========================================
// Search
// ==========================================

/// 单次搜索选项
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sites: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,
}

impl SearchOptions {
    pub fn limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Web,
    Kb,
    Db,
}

/// 并发搜索中的单个请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "type")]
    pub kind: SearchType,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl SearchRequest {
    pub fn web(query: impl Into<String>, limit: usize) -> Self {
        Self {
            kind: SearchType::Web,
            query: query.into(),
            limit: Some(limit),
        }
    }
}

pub trait SearchClient: Send + Sync {
    fn web(&self, query: &str, options: &SearchOptions) -> HookResult<Value>;

    fn kb(&self, query: &str, options: &SearchOptions) -> HookResult<Value>;

    fn db(&self, query: &str, options: &SearchOptions) -> HookResult<Value>;

    /// 全部完成后返回（顺序与请求一致）
    fn all(&self, requests: &[SearchRequest]) -> HookResult<Vec<Value>>;

    /// 返回首个成功的结果
    fn any(&self, requests: &[SearchRequest]) -> HookResult<Value>;

    /// 返回首个完成的结果
    fn race(&self, requests: &[SearchRequest]) -> HookResult<Value>;
}

// ==========================================
// Space / Process
// ==========================================

pub trait Space: Send + Sync {
    fn get(&self, key: &str) -> HookResult<Option<Value>>;
}

pub trait ProcessRunner: Send + Sync {
    /// 调用命名 Process（如 `models.__yao.role.Get`、`scripts.tests.create.GetRoles`）
    fn call(&self, name: &str, args: &[Value]) -> HookResult<Value>;
}
