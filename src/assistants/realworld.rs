// ==========================================
// 智能体测试夹具 - tests.realworld (Create)
// ==========================================
// 模拟生产场景: MCP 调用 / 数据库查询 / 密集追踪 / 上下文调整
// 能力调用失败时转为错误消息返回，不中断会话
// ==========================================

use crate::assistants::{array_len, display_or, first_content, now};
use crate::hooks::{
    AgentContext, CreateHook, CreateResponse, HookError, HookReply, HookResult, Message,
    TraceOptions,
};
use serde_json::json;
use tracing::warn;

const ECHO: &str = "echo";
const ROLE_MODEL_GET: &str = "models.__yao.role.Get";

/// trace_intensive 的根节点数
const TRACE_NODE_COUNT: usize = 10;

/// resource_heavy 的 MCP 迭代次数
const RESOURCE_ITERATIONS: usize = 5;

#[derive(Debug, Default, Clone, Copy)]
pub struct RealworldCreate;

impl CreateHook for RealworldCreate {
    fn create(&self, ctx: &AgentContext, messages: &[Message]) -> HookResult<HookReply<CreateResponse>> {
        let content = first_content(messages);
        let response = match content {
            "simple" => simple(),
            "mcp_health" => mcp_health(ctx).unwrap_or_else(|e| {
                failure("mcp_health", Some("MCP health check failed"), format!("Error: {}", e), &e)
            }),
            "mcp_tools" => mcp_tools(ctx).unwrap_or_else(|e| {
                failure("mcp_tools", None, format!("MCP tools execution error: {}", e), &e)
            }),
            "database_query" => database_query(ctx).unwrap_or_else(|e| {
                plain_error(format!("Database query error: {}", e), &e)
            }),
            "trace_intensive" => trace_intensive(ctx).unwrap_or_else(|e| {
                plain_error(format!("Trace intensive error: {}", e), &e)
            }),
            "full_workflow" => full_workflow(ctx).unwrap_or_else(|e| {
                failure("full_workflow", None, format!("Full workflow error: {}", e), &e)
            }),
            "context_adjustment" => context_adjustment(ctx),
            "resource_heavy" => resource_heavy(ctx).unwrap_or_else(|e| {
                failure("resource_heavy", None, format!("Resource heavy error: {}", e), &e)
            }),
            _ => default_handler(ctx, content)
                .unwrap_or_else(|e| plain_error(format!("Error: {}", e), &e)),
        };
        Ok(HookReply::Partial(response))
    }
}

/// 带 scenario / error 元数据的失败响应
fn failure(scenario: &str, system: Option<&str>, content: String, err: &HookError) -> CreateResponse {
    warn!(scenario = %scenario, error = %err, "场景执行失败");
    let mut messages = Vec::new();
    if let Some(system) = system {
        messages.push(Message::system(system));
    }
    messages.push(Message::assistant(content));
    CreateResponse::with_messages(messages).metadata(json!({
        "scenario": scenario,
        "error": err.to_string(),
    }))
}

fn plain_error(content: String, err: &HookError) -> CreateResponse {
    warn!(error = %err, "场景执行失败");
    CreateResponse::with_messages(vec![Message::assistant(content)])
}

fn tools_count(ctx: &AgentContext) -> HookResult<usize> {
    Ok(ctx.mcp.list_tools(ECHO, "")?.tools.len())
}

fn simple() -> CreateResponse {
    CreateResponse::with_messages(vec![
        Message::system("Simple response without external dependencies"),
        Message::assistant("I'm ready to help! This is a simple scenario."),
    ])
    .metadata(json!({"scenario": "simple", "timestamp": now()}))
}

fn mcp_health(ctx: &AgentContext) -> HookResult<CreateResponse> {
    let tools = tools_count(ctx)?;
    let status = ctx.mcp.call_tool(ECHO, "status", json!({"verbose": true}))?;

    Ok(CreateResponse::with_messages(vec![
        Message::system("System health check completed via MCP"),
        Message::assistant(format!("Health Status: {}\nAvailable Tools: {}", status, tools)),
    ])
    .metadata(json!({
        "scenario": "mcp_health",
        "tools_count": tools,
        "health_data": status,
    })))
}

fn mcp_tools(ctx: &AgentContext) -> HookResult<CreateResponse> {
    let tools = tools_count(ctx)?;
    let ping = ctx.mcp.call_tool(ECHO, "ping", json!({"count": 3}))?;
    let status = ctx.mcp.call_tool(ECHO, "status", json!({"verbose": true}))?;

    Ok(CreateResponse::with_messages(vec![
        Message::system("Multiple MCP tools executed successfully"),
        Message::assistant(format!(
            "Tools Available: {}\nPing Result: {}\nStatus Result: {}",
            tools, ping, status
        )),
    ])
    .metadata(json!({
        "scenario": "mcp_tools",
        "tools_count": tools,
        "operations": ["ping", "status"],
        "ping_result": ping,
        "status_result": status,
    })))
}

fn database_query(ctx: &AgentContext) -> HookResult<CreateResponse> {
    let roles = ctx.process.call(ROLE_MODEL_GET, &[json!({})])?;

    let mut messages = vec![Message::system("Database query completed successfully")];
    for role in roles.as_array().into_iter().flatten() {
        messages.push(Message::assistant(format!(
            "Role: {}, ID: {}",
            display_or(role.get("name"), "unknown"),
            display_or(role.get("id"), "N/A")
        )));
    }

    Ok(CreateResponse::with_messages(messages).metadata(json!({
        "scenario": "database_query",
        "roles_count": array_len(&roles),
        "query_time": now(),
    })))
}

fn trace_intensive(ctx: &AgentContext) -> HookResult<CreateResponse> {
    for i in 0..TRACE_NODE_COUNT {
        let step = i + 1;
        let node = ctx.trace.add(
            json!({"step": i, "type": "processing"}),
            TraceOptions::label(format!("Step {}", step)),
        )?;
        node.info(&format!("Processing step {}", step));
        node.debug(&format!("Step {} details", step));

        let child = node.add(
            json!({"parent": i, "type": "validation"}),
            TraceOptions::label(format!("Validation {}", step)),
        )?;
        child.info(&format!("Validating step {}", step));
        child.complete(json!({"valid": true}));

        node.complete(json!({"result": format!("step_{}_completed", i)}));
    }

    let total = TRACE_NODE_COUNT * 2;
    Ok(CreateResponse::with_messages(vec![
        Message::system("Trace intensive scenario completed"),
        Message::assistant(format!(
            "Created {} trace nodes with {} total nodes (including children)",
            TRACE_NODE_COUNT, total
        )),
    ])
    .metadata(json!({"scenario": "trace_intensive", "nodes_created": total})))
}

fn full_workflow(ctx: &AgentContext) -> HookResult<CreateResponse> {
    let init = ctx
        .trace
        .add(json!({"phase": "init"}), TraceOptions::label("Workflow Initialization"))?;
    init.info("Starting full workflow");

    let mcp = ctx.trace.add(json!({"phase": "mcp"}), TraceOptions::label("MCP Operations"))?;
    mcp.info("Checking MCP tools");
    let tools = tools_count(ctx)?;
    mcp.complete(json!({"tools_count": tools}));

    let db = ctx
        .trace
        .add(json!({"phase": "database"}), TraceOptions::label("Database Query"))?;
    db.info("Querying database");
    let roles = ctx.process.call(ROLE_MODEL_GET, &[json!({})])?;
    let roles_count = array_len(&roles);
    db.complete(json!({"roles_count": roles_count}));

    let tool_node = ctx.trace.add(json!({"phase": "tools"}), TraceOptions::label("MCP Tools"))?;
    tool_node.info("Executing MCP tools");
    let ping = ctx.mcp.call_tool(ECHO, "ping", json!({"count": 1}))?;
    let status = ctx.mcp.call_tool(ECHO, "status", json!({"verbose": false}))?;
    tool_node.complete(json!({"ping": ping, "status": status}));

    init.complete(json!({"workflow": "completed", "phases": 4}));

    Ok(CreateResponse::with_messages(vec![
        Message::system("Full workflow completed successfully"),
        Message::assistant(format!(
            "Workflow Results:\n- MCP Tools: {}\n- Database Roles: {}\n- Tools Executed: ping, status",
            tools, roles_count
        )),
    ])
    .metadata(json!({
        "scenario": "full_workflow",
        "phases_completed": 4,
        "mcp_tools": tools,
        "db_records": roles_count,
        "execution_time": now(),
    })))
}

fn context_adjustment(ctx: &AgentContext) -> CreateResponse {
    let original_assistant = ctx.info.assistant_id.clone();
    let original_locale = ctx.info.locale.clone();

    CreateResponse {
        messages: Some(vec![
            Message::system("Context fields adjusted dynamically"),
            Message::assistant(format!(
                "Original: {} ({})\nAdjusted: production.assistant (zh-cn)",
                original_assistant.as_deref().unwrap_or("undefined"),
                original_locale.as_deref().unwrap_or("undefined")
            )),
        ]),
        assistant_id: Some("production.assistant".to_string()),
        locale: Some("zh-cn".to_string()),
        theme: Some("dark".to_string()),
        ..Default::default()
    }
    .metadata(json!({
        "scenario": "context_adjustment",
        "original_assistant": original_assistant,
        "original_locale": original_locale,
        "adjusted": true,
    }))
}

fn resource_heavy(ctx: &AgentContext) -> HookResult<CreateResponse> {
    for i in 0..RESOURCE_ITERATIONS {
        let node = ctx
            .trace
            .add(json!({"op": i}), TraceOptions::label(format!("Operation {}", i + 1)))?;
        let tools = tools_count(ctx)?;
        let ping = ctx.mcp.call_tool(ECHO, "ping", json!({"count": 1}))?;
        let status = ctx.mcp.call_tool(ECHO, "status", json!({"verbose": false}))?;
        node.complete(json!({"tools": tools, "ping": ping, "status": status}));
    }

    let db = ctx.trace.add(json!({"phase": "db"}), TraceOptions::label("Database Operations"))?;
    let roles = ctx.process.call(ROLE_MODEL_GET, &[json!({})])?;
    db.complete(json!({"count": array_len(&roles)}));

    Ok(CreateResponse::with_messages(vec![
        Message::system("Resource-heavy scenario completed"),
        Message::assistant(format!(
            "Completed {} MCP iterations and 1 database query\nTotal trace nodes: {}",
            RESOURCE_ITERATIONS,
            RESOURCE_ITERATIONS + 1
        )),
    ])
    .metadata(json!({
        "scenario": "resource_heavy",
        "mcp_iterations": RESOURCE_ITERATIONS,
        // 每轮 3 次 MCP 操作 + 1 次数据库查询
        "total_operations": RESOURCE_ITERATIONS * 3 + 1,
    })))
}

fn default_handler(ctx: &AgentContext, content: &str) -> HookResult<CreateResponse> {
    let node = ctx
        .trace
        .add(json!({"type": "default"}), TraceOptions::label("Default Handler"))?;
    node.info(&format!("Processing: {}", content));
    let tools = tools_count(ctx)?;
    node.complete(json!({"tools_available": tools}));

    Ok(CreateResponse::with_messages(vec![
        Message::system("Processing your request"),
        Message::assistant(format!(
            "Received: \"{}\"\nAvailable MCP tools: {}",
            content, tools
        )),
    ])
    .metadata(json!({
        "scenario": "default",
        "user_input": content,
        "tools_count": tools,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistants::test_support::context;
    use crate::hooks::ContextInfo;

    fn run(content: &str) -> (CreateResponse, crate::hooks::MemoryTracer) {
        let (ctx, tracer) = context(ContextInfo::default());
        let reply = RealworldCreate.create(&ctx, &[Message::user(content)]).unwrap();
        (reply.into_option().unwrap(), tracer)
    }

    #[test]
    fn test_mcp_health() {
        let (response, _) = run("mcp_health");
        let metadata = response.metadata.unwrap();
        assert_eq!(metadata["tools_count"], json!(3));
        assert_eq!(metadata["health_data"]["version"], json!("1.0.0"));
    }

    #[test]
    fn test_trace_intensive_creates_twenty_nodes() {
        let (response, tracer) = run("trace_intensive");
        assert_eq!(response.metadata.unwrap()["nodes_created"], json!(20));
        let records = tracer.records();
        assert_eq!(records.len(), 20);
        assert!(records.iter().all(|r| r.is_complete()));
    }

    #[test]
    fn test_database_failure_becomes_message() {
        // 内存库中没有角色表
        let (response, _) = run("database_query");
        let messages = response.messages.unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text().unwrap().starts_with("Database query error:"));

        let (workflow, _) = run("full_workflow");
        assert!(workflow.metadata.unwrap()["error"].is_string());
    }

    #[test]
    fn test_context_adjustment() {
        let (response, _) = run("context_adjustment");
        assert_eq!(response.assistant_id.as_deref(), Some("production.assistant"));
        assert_eq!(
            response.messages.unwrap()[1].text(),
            Some("Original: undefined (undefined)\nAdjusted: production.assistant (zh-cn)")
        );
    }

    #[test]
    fn test_default_handler() {
        let (response, tracer) = run("anything");
        assert_eq!(response.metadata.unwrap()["user_input"], json!("anything"));
        assert!(tracer.find_by_label("Default Handler").unwrap().is_complete());
    }
}
