// ==========================================
// 智能体测试夹具 - echo 测试服务
// ==========================================
// 工具: ping / status / echo
// 资源: info / health
// ==========================================

use crate::hooks::ContextInfo;
use crate::tools::args::{flag, provided, required_str, str_or};
use crate::tools::error::ToolResult;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 将基础对象与附加字段合并（附加字段在后）
fn merge(base: Value, extra: Value) -> Value {
    match (base, extra) {
        (Value::Object(mut base), Value::Object(extra)) => {
            base.extend(extra);
            Value::Object(base)
        }
        (base, _) => base,
    }
}

/// ping: `{message, count, timestamp}`
pub fn ping(args: &Value) -> ToolResult<Value> {
    let count = provided(args, "count").cloned().unwrap_or_else(|| json!(1));
    let message = str_or(args, "message", "ping");
    let message = if message == "ping" { "pong" } else { message };

    Ok(json!({
        "message": message,
        "count": count,
        "timestamp": now(),
    }))
}

/// status: 在线状态，verbose 时附带版本与运行环境
pub fn status(args: &Value) -> ToolResult<Value> {
    let basic = json!({
        "status": "online",
        "uptime": 3600,
        "time": now(),
    });

    if flag(args, "verbose") {
        return Ok(merge(
            basic,
            json!({
                "version": "1.0.0",
                "memory": "128MB",
                "platform": "linux",
                "nodeVersion": "v18.0.0",
            }),
        ));
    }
    Ok(basic)
}

fn context_summary(ctx: Option<&ContextInfo>) -> Value {
    let Some(ctx) = ctx else {
        return json!({"has_context": false});
    };

    let authorized = ctx.authorized.as_ref().map(|auth| {
        json!({
            "user_id": auth.user_id,
            "tenant_id": auth.tenant_id,
        })
    });

    let mut summary = Map::new();
    summary.insert("has_context".to_string(), json!(true));
    summary.insert("chat_id".to_string(), json!(ctx.chat_id));
    summary.insert("assistant_id".to_string(), json!(ctx.assistant_id));
    summary.insert("locale".to_string(), json!(ctx.locale));
    summary.insert("authorized".to_string(), authorized.unwrap_or(Value::Null));
    Value::Object(summary)
}

/// echo: 回显消息，附带调用上下文摘要
pub fn echo(args: &Value, ctx: Option<&ContextInfo>) -> ToolResult<Value> {
    let message = required_str(args, "message")?;
    let uppercase = flag(args, "uppercase");

    Ok(json!({
        "echo": if uppercase { message.to_uppercase() } else { message.to_string() },
        "uppercase": uppercase,
        "length": message.chars().count(),
        "timestamp": now(),
        "context": context_summary(ctx),
    }))
}

/// 资源 info: 服务信息
pub fn info() -> Value {
    json!({
        "name": "Echo Test Server",
        "version": "1.0.0",
        "description": "Simple MCP server for testing",
        "capabilities": ["ping", "status", "echo"],
        "uptime": 7200,
        "startTime": "2024-11-27T10:00:00.000Z",
        "time": now(),
    })
}

/// 资源 health: 健康检查，check = "all" 时附带明细
pub fn health(check: Option<&str>) -> Value {
    let basic = json!({
        "status": "healthy",
        "uptime": 3600,
        "time": now(),
    });

    if check != Some("all") {
        return basic;
    }
    merge(
        basic,
        json!({
            "checks": {"memory": "ok", "uptime": "ok", "cpu": "ok", "disk": "ok"},
            "details": {"memoryUsage": {"heapUsed": 95, "heapTotal": 128, "rss": 150}},
        }),
    )
}
