// ==========================================
// 智能体测试夹具 - tests.create
// ==========================================
// Create Hook 返回值与上下文字段的场景测试
// 场景由首条消息内容决定
// ==========================================

use crate::assistants::{array_len, display_or, first_content, now};
use crate::hooks::{
    AgentContext, AudioConfig, CreateHook, CreateResponse, HookReply, HookResult, Message, Uses,
};
use serde_json::{json, Value};

const ROLE_MODEL_GET: &str = "models.__yao.role.Get";

#[derive(Debug, Default, Clone, Copy)]
pub struct CreateScenarios;

impl CreateHook for CreateScenarios {
    fn create(&self, ctx: &AgentContext, messages: &[Message]) -> HookResult<HookReply<CreateResponse>> {
        let content = first_content(messages);
        match content {
            "return_null" | "return_undefined" => Ok(HookReply::NoOverride),
            "return_empty" => Ok(HookReply::Partial(CreateResponse::default())),
            "return_full" => Ok(HookReply::Full(return_full())),
            "return_partial" => Ok(HookReply::Partial(CreateResponse {
                messages: Some(vec![Message::user("Partial test")]),
                temperature: Some(0.5),
                ..Default::default()
            })),
            "return_process" => return_process(ctx).map(HookReply::Partial),
            "verify_context" => Ok(HookReply::Partial(verify_context(ctx))),
            "adjust_context" => Ok(HookReply::Partial(adjust_context(ctx))),
            "adjust_uses" => Ok(HookReply::Partial(adjust_uses(ctx, false))),
            "adjust_uses_force" => Ok(HookReply::Partial(adjust_uses(ctx, true))),
            "nested_script_call" => nested_script_call(ctx).map(HookReply::Partial),
            "deep_nested_call" => deep_nested_call(ctx).map(HookReply::Partial),
            _ => Ok(HookReply::Partial(CreateResponse::with_messages(vec![
                Message::user(content),
            ]))),
        }
    }
}

fn return_full() -> CreateResponse {
    CreateResponse {
        messages: Some(vec![
            Message::system("You are a helpful assistant."),
            Message::user("Hello!"),
        ]),
        audio: Some(AudioConfig {
            voice: "alloy".to_string(),
            format: "mp3".to_string(),
        }),
        temperature: Some(0.7),
        max_tokens: Some(2000),
        max_completion_tokens: Some(1500),
        ..Default::default()
    }
    .metadata(json!({"test": "full_response", "user_id": "test_user_123"}))
}

fn return_process(ctx: &AgentContext) -> HookResult<CreateResponse> {
    let roles = ctx.process.call(ROLE_MODEL_GET, &[json!({})])?;

    let mut messages = vec![Message::system("Here are the available roles in the system:")];
    for role in roles.as_array().into_iter().flatten() {
        messages.push(Message::user(format!(
            "Role: {}, ID: {}",
            display_or(role.get("name"), "unknown"),
            display_or(role.get("id"), "unknown")
        )));
    }

    Ok(CreateResponse::with_messages(messages).metadata(json!({
        "test": "process_call",
        "roles_count": array_len(&roles).to_string(),
    })))
}

// ===== verify_context =====

/// 逐项校验结果
struct Validations {
    lines: Vec<String>,
    all_valid: bool,
}

impl Validations {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            all_valid: true,
        }
    }

    fn check(&mut self, field: &str, actual: Value, expected: Value) {
        if actual == expected {
            self.lines.push(format!("{}:true", field));
        } else {
            let shown = match &actual {
                Value::Null => "undefined".to_string(),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            self.lines.push(format!("{}:false:{}", field, shown));
            self.all_valid = false;
        }
    }

    fn missing(&mut self, field: &str) {
        self.lines.push(format!("{}:false:missing", field));
        self.all_valid = false;
    }
}

fn verify_context(ctx: &AgentContext) -> CreateResponse {
    let info = &ctx.info;
    let mut v = Validations::new();

    match &info.authorized {
        Some(auth) => {
            v.check("authorized.user_id", json!(auth.user_id), json!("test-user-123"));
            v.check("authorized.team_id", json!(auth.team_id), json!("test-team-456"));
            v.check("authorized.tenant_id", json!(auth.tenant_id), json!("test-tenant-789"));
            match &auth.constraints {
                Some(constraints) => {
                    v.check(
                        "authorized.constraints.team_only",
                        json!(constraints.team_only),
                        json!(true),
                    );
                    match &constraints.extra {
                        Some(extra) => v.check(
                            "authorized.constraints.extra.department",
                            extra.get("department").cloned().unwrap_or(Value::Null),
                            json!("engineering"),
                        ),
                        None => v.missing("authorized.constraints.extra"),
                    }
                }
                None => v.missing("authorized.constraints"),
            }
        }
        None => v.missing("authorized"),
    }

    v.check("chat_id", json!(info.chat_id), json!("chat-test-create-hook"));
    v.check("assistant_id", json!(info.assistant_id), json!("tests.create"));
    v.check("locale", json!(info.locale), json!("en-us"));
    v.check("theme", json!(info.theme), json!("light"));

    match &info.client {
        Some(client) => {
            v.check("client.type", json!(client.kind), json!("web"));
            v.check("client.user_agent", json!(client.user_agent), json!("TestAgent/1.0"));
            v.check("client.ip", json!(client.ip), json!("127.0.0.1"));
        }
        None => v.missing("client"),
    }

    v.check("referer", json!(info.referer), json!("api"));
    v.check("accept", json!(info.accept), json!("cui-web"));

    let status = if v.all_valid {
        "success:all_fields_validated"
    } else {
        "failure:validation_failed"
    };
    CreateResponse::with_messages(vec![
        Message::system(status),
        Message::assistant(v.lines.join("\n")),
    ])
}

// ===== 上下文 / uses 调整 =====

fn adjust_context(ctx: &AgentContext) -> CreateResponse {
    CreateResponse {
        messages: Some(vec![Message::system("Context fields will be adjusted")]),
        assistant_id: Some("adjusted.assistant".to_string()),
        connector: Some("adjusted-connector".to_string()),
        locale: Some("zh-cn".to_string()),
        theme: Some("dark".to_string()),
        route: Some("/adjusted/route".to_string()),
        ..Default::default()
    }
    .metadata(json!({
        "adjusted": true,
        "original_assistant": ctx.info.assistant_id,
        "timestamp": now(),
    }))
}

fn adjust_uses(ctx: &AgentContext, force: bool) -> CreateResponse {
    let (content, uses, flag) = if force {
        (
            "Uses configuration will be forced (ignore model capabilities)",
            Uses {
                vision: Some("tests.vision-helper".to_string()),
                audio: Some("mcp:audio-server".to_string()),
                ..Default::default()
            },
            "uses_forced",
        )
    } else {
        (
            "Uses configuration will be adjusted",
            Uses {
                vision: Some("mcp:vision-server".to_string()),
                audio: Some("mcp:audio-server".to_string()),
                search: Some("agent".to_string()),
                fetch: Some("mcp:fetch-server".to_string()),
            },
            "uses_adjusted",
        )
    };

    CreateResponse {
        messages: Some(vec![Message::system(content)]),
        uses: Some(uses),
        force_uses: force.then_some(true),
        ..Default::default()
    }
    .metadata(json!({flag: true, "chat_id": ctx.info.chat_id}))
}

// ===== 嵌套调用 =====

fn nested_script_call(ctx: &AgentContext) -> HookResult<CreateResponse> {
    let roles = ctx.process.call("scripts.tests.create.GetRoles", &[])?;
    let count = array_len(&roles);

    Ok(CreateResponse::with_messages(vec![
        Message::system("Nested script call completed (hook -> script -> model)"),
        Message::assistant(format!("Retrieved {} roles through nested script call", count)),
    ])
    .metadata(json!({
        "test": "nested_script_call",
        "roles_count": count.to_string(),
    })))
}

fn deep_nested_call(ctx: &AgentContext) -> HookResult<CreateResponse> {
    let result = ctx.process.call("scripts.tests.create.NestedCall", &[])?;

    Ok(CreateResponse::with_messages(vec![
        Message::system("Deep nested call completed (hook -> script -> script -> model)"),
        Message::assistant(format!("Nested result: {}", result)),
    ])
    .metadata(json!({
        "test": "deep_nested_call",
        "nested_result": result,
    })))
}
