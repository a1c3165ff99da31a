// ==========================================
// 智能体测试夹具 - 测试服务注册表
// ==========================================
// 职责: 按 (server, tool) 分发调用，提供 MCP ListTools / CallTool
// 服务: echo / mcpload / search
// ==========================================

use crate::hooks::{ContextInfo, HookResult, McpClient, ToolDefinition, ToolList};
use crate::tools::args::provided;
use crate::tools::error::{ToolError, ToolResult};
use crate::tools::{echo, mcpload, search};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

pub const ECHO_SERVER: &str = "echo";
pub const MCPLOAD_SERVER: &str = "mcpload";
pub const SEARCH_SERVER: &str = "search";

/// 资源定义
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceDefinition {
    pub name: String,
    pub description: String,
}

fn resource(name: &str, description: &str) -> ResourceDefinition {
    ResourceDefinition {
        name: name.to_string(),
        description: description.to_string(),
    }
}

fn string_prop(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

fn echo_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "ping",
            "连通性测试",
            json!({
                "type": "object",
                "properties": {
                    "message": string_prop("消息 (默认 ping)"),
                    "count": {"type": "number", "description": "次数 (默认 1)"}
                }
            }),
        ),
        ToolDefinition::new(
            "status",
            "服务状态",
            json!({
                "type": "object",
                "properties": {
                    "verbose": {"type": "boolean", "description": "附带版本与运行环境"}
                }
            }),
        ),
        ToolDefinition::new(
            "echo",
            "回显消息",
            json!({
                "type": "object",
                "properties": {
                    "message": string_prop("要回显的消息"),
                    "uppercase": {"type": "boolean", "description": "是否转为大写"}
                },
                "required": ["message"]
            }),
        ),
    ]
}

fn mcpload_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "hello",
            "问候",
            json!({
                "type": "object",
                "properties": {"name": string_prop("名字 (默认 World)")}
            }),
        ),
        ToolDefinition::new(
            "ping",
            "回显 Pong",
            json!({
                "type": "object",
                "properties": {"message": string_prop("消息")},
                "required": ["message"]
            }),
        ),
        ToolDefinition::new(
            "calculate",
            "四则运算",
            json!({
                "type": "object",
                "properties": {
                    "operation": {
                        "type": "string",
                        "enum": ["add", "subtract", "multiply", "divide"]
                    },
                    "a": {"type": "number"},
                    "b": {"type": "number"}
                },
                "required": ["operation", "a", "b"]
            }),
        ),
    ]
}

fn search_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "web_search",
            "模拟网页搜索",
            json!({
                "type": "object",
                "properties": {
                    "query": string_prop("查询"),
                    "limit": {"type": "number", "description": "条数 (默认 10, 最多 20)"},
                    "sites": {"type": "array", "items": {"type": "string"}},
                    "time_range": string_prop("时间范围")
                },
                "required": ["query"]
            }),
        ),
        ToolDefinition::new(
            "news_search",
            "模拟新闻搜索",
            json!({
                "type": "object",
                "properties": {
                    "query": string_prop("查询"),
                    "limit": {"type": "number"},
                    "time_range": string_prop("时间范围 (默认 week)")
                },
                "required": ["query"]
            }),
        ),
        ToolDefinition::new(
            "extract_keywords",
            "词频关键词提取",
            json!({
                "type": "object",
                "properties": {
                    "content": string_prop("文本"),
                    "max_keywords": {"type": "number", "description": "最多关键词数 (默认 10)"},
                    "language": string_prop("语言 (默认 auto)")
                },
                "required": ["content"]
            }),
        ),
        ToolDefinition::new(
            "generate_query_dsl",
            "生成 QueryDSL",
            json!({
                "type": "object",
                "properties": {
                    "query": string_prop("自然语言查询"),
                    "limit": {"type": "number", "description": "limit (默认 20)"}
                }
            }),
        ),
        ToolDefinition::new(
            "rerank",
            "模拟语义重排",
            json!({
                "type": "object",
                "properties": {
                    "query": string_prop("查询"),
                    "items": {"type": "array", "items": {"type": "object"}},
                    "top_n": {"type": "number"}
                },
                "required": ["query"]
            }),
        ),
    ]
}

/// 测试服务注册表
///
/// 可附带调用上下文，echo 工具会在结果中反映该上下文。
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    context: Option<ContextInfo>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(mut self, context: ContextInfo) -> Self {
        self.context = Some(context);
        self
    }

    pub fn servers(&self) -> [&'static str; 3] {
        [ECHO_SERVER, MCPLOAD_SERVER, SEARCH_SERVER]
    }

    /// 服务的工具列表
    pub fn tools(&self, server: &str) -> ToolResult<Vec<ToolDefinition>> {
        match server {
            ECHO_SERVER => Ok(echo_tools()),
            MCPLOAD_SERVER => Ok(mcpload_tools()),
            SEARCH_SERVER => Ok(search_tools()),
            _ => Err(ToolError::UnknownServer(server.to_string())),
        }
    }

    /// 服务的资源列表
    pub fn resources(&self, server: &str) -> ToolResult<Vec<ResourceDefinition>> {
        match server {
            ECHO_SERVER => Ok(vec![
                resource("info", "服务信息"),
                resource("health", "健康检查 (check = all 时附带明细)"),
            ]),
            MCPLOAD_SERVER => Ok(Vec::new()),
            SEARCH_SERVER => Ok(vec![resource("get_config", "搜索配置")]),
            _ => Err(ToolError::UnknownServer(server.to_string())),
        }
    }

    /// 调用工具
    pub fn call(&self, server: &str, tool: &str, args: &Value) -> ToolResult<Value> {
        debug!(server = %server, tool = %tool, "调用测试工具");
        match (server, tool) {
            (ECHO_SERVER, "ping") => echo::ping(args),
            (ECHO_SERVER, "status") => echo::status(args),
            (ECHO_SERVER, "echo") => echo::echo(args, self.context.as_ref()),
            (MCPLOAD_SERVER, "hello") => mcpload::hello(args),
            (MCPLOAD_SERVER, "ping") => mcpload::ping(args),
            (MCPLOAD_SERVER, "calculate") => mcpload::calculate(args),
            (SEARCH_SERVER, "web_search") => search::web_search(args),
            (SEARCH_SERVER, "news_search") => search::news_search(args),
            (SEARCH_SERVER, "extract_keywords") => search::extract_keywords(args),
            (SEARCH_SERVER, "generate_query_dsl") => search::generate_query_dsl(args),
            (SEARCH_SERVER, "rerank") => search::rerank(args),
            (ECHO_SERVER | MCPLOAD_SERVER | SEARCH_SERVER, _) => Err(ToolError::UnknownTool {
                server: server.to_string(),
                tool: tool.to_string(),
            }),
            _ => Err(ToolError::UnknownServer(server.to_string())),
        }
    }

    /// 读取资源
    pub fn read_resource(&self, server: &str, name: &str, args: &Value) -> ToolResult<Value> {
        match (server, name) {
            (ECHO_SERVER, "info") => Ok(echo::info()),
            (ECHO_SERVER, "health") => Ok(echo::health(
                provided(args, "check").and_then(Value::as_str),
            )),
            (SEARCH_SERVER, "get_config") => Ok(search::get_config()),
            (ECHO_SERVER | MCPLOAD_SERVER | SEARCH_SERVER, _) => Err(ToolError::UnknownResource {
                server: server.to_string(),
                resource: name.to_string(),
            }),
            _ => Err(ToolError::UnknownServer(server.to_string())),
        }
    }
}

impl McpClient for ToolRegistry {
    fn list_tools(&self, server: &str, _cursor: &str) -> HookResult<ToolList> {
        // 工具数量固定，单页返回
        Ok(ToolList {
            tools: self.tools(server)?,
            next_cursor: None,
        })
    }

    fn call_tool(&self, server: &str, tool: &str, args: Value) -> HookResult<Value> {
        Ok(self.call(server, tool, &args)?)
    }
}
