// ==========================================
// 智能体测试夹具 - tests.realworld-next (Next)
// ==========================================
// 场景由最近一条含 `scenario:<name>` 的 user 消息决定（不区分大小写）
// standard / default 不覆盖
// ==========================================

use crate::assistants::now;
use crate::hooks::{
    AgentContext, Completion, HookReply, HookResult, Message, NextHook, NextPayload,
    NextResponse, ToolCallResult,
};
use regex::Regex;
use serde_json::{json, Value};
use std::sync::LazyLock;
use tracing::info;

static SCENARIO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"scenario:\s*([\w_]+)").expect("scenario pattern"));

const DELEGATE_TARGET: &str = "tests.create";

/// 预览截断长度（字符）
const PREVIEW_CHARS: usize = 100;

/// 长输出阈值（字符）
const LONG_COMPLETION_CHARS: usize = 500;

#[derive(Debug, Default, Clone, Copy)]
pub struct RealworldNext;

/// 提取场景名（无标记时为 default）
pub fn extract_scenario(messages: &[Message]) -> String {
    messages
        .iter()
        .rev()
        .filter(|m| m.role == "user")
        .filter_map(Message::text)
        .map(str::to_lowercase)
        .filter(|content| content.contains("scenario:"))
        .find_map(|content| SCENARIO_RE.captures(&content).map(|c| c[1].to_string()))
        .unwrap_or_else(|| "default".to_string())
}

impl NextHook for RealworldNext {
    fn next(&self, _ctx: &AgentContext, payload: &NextPayload) -> HookResult<HookReply<NextResponse>> {
        let completion = payload.completion.as_ref();
        let response = match extract_scenario(&payload.messages).as_str() {
            "custom_data" => custom_data(completion, &payload.messages),
            "delegate" => delegate(completion),
            "process_tools" => process_tools(&payload.tools),
            "error_recovery" => error_recovery(payload.error.as_deref()),
            "conditional" => conditional(completion),
            "conditional_success" => conditional_success(completion),
            "conditional_delegate" => delegate_to_create("Delegated based on conditional analysis")
                .with_metadata(json!({
                    "scenario": "conditional_delegate",
                    "action": "delegate",
                    "reason": "Explicit delegation requested",
                })),
            _ => return Ok(HookReply::NoOverride),
        };
        Ok(HookReply::Partial(response))
    }
}

/// 小写化的非空文本输出
fn completion_text(completion: Option<&Completion>) -> Option<String> {
    completion.and_then(Completion::content_str).map(str::to_lowercase)
}

fn preview(content: &str) -> String {
    let head: String = content.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", head)
}

fn delegate_to_create(content: &str) -> NextResponse {
    NextResponse::delegate(DELEGATE_TARGET, vec![Message::user(content)])
}

fn custom_data(completion: Option<&Completion>, messages: &[Message]) -> NextResponse {
    let summary = match completion {
        Some(c) => {
            let text = c.content.as_str().unwrap_or("");
            format!("LLM said: {}", preview(text))
        }
        None => "No completion".to_string(),
    };

    NextResponse::data(json!({
        "type": "custom_response",
        "message": "This is a custom response from Next Hook",
        "completion_summary": summary,
        "message_count": messages.len(),
        "timestamp": now(),
    }))
    .with_metadata(json!({"scenario": "custom_data", "processed_by": "next_hook"}))
}

fn delegate(completion: Option<&Completion>) -> NextResponse {
    let should_delegate = completion_text(completion)
        .map(|c| c.contains("delegate") || c.contains("transfer"))
        .unwrap_or(false);

    if should_delegate {
        return delegate_to_create("Please handle this delegated request").with_metadata(json!({
            "scenario": "delegate",
            "reason": "Completion suggested delegation",
        }));
    }

    NextResponse::data(json!({
        "message": "No delegation needed",
        "reason": "Completion did not suggest delegation",
    }))
}

fn process_tools(tools: &[ToolCallResult]) -> NextResponse {
    if tools.is_empty() {
        return NextResponse::data(json!({"message": "No tools were called", "tool_count": 0}));
    }

    let failed = tools.iter().filter(|t| t.error.is_some()).count();
    let details: Vec<Value> = tools
        .iter()
        .map(|t| {
            json!({
                "server": t.server,
                "tool": t.tool,
                "success": t.error.is_none(),
                "error": t.error,
            })
        })
        .collect();

    NextResponse::data(json!({
        "message": "Tool execution summary",
        "summary": {
            "total": tools.len(),
            "successful": tools.len() - failed,
            "failed": failed,
            "tools": details,
        },
        "timestamp": now(),
    }))
    .with_metadata(json!({"scenario": "process_tools", "has_failures": failed > 0}))
}

fn error_recovery(error: Option<&str>) -> NextResponse {
    let Some(error) = error.filter(|e| !e.is_empty()) else {
        return NextResponse::data(json!({"message": "No error to recover from", "status": "ok"}));
    };

    info!(error = %error, "Next Hook 捕获到错误");
    NextResponse::data(json!({
        "message": "Error was handled by Next Hook",
        "error": error,
        "recovery_action": "Logged error and returned graceful response",
        "user_message": "We encountered an issue but have handled it gracefully.",
        "timestamp": now(),
    }))
    .with_metadata(json!({"scenario": "error_recovery", "error_handled": true}))
}

/// 输出内容的特征
struct Conditions {
    has_question: bool,
    has_error: bool,
    has_success: bool,
    is_long: bool,
    mentions_delegate: bool,
}

impl Conditions {
    fn analyze(content: &str, allow_delegate: bool) -> Self {
        Self {
            has_question: content.contains('?'),
            has_error: content.contains("error") || content.contains("fail"),
            has_success: content.contains("success") || content.contains("complete"),
            is_long: content.chars().count() > LONG_COMPLETION_CHARS,
            mentions_delegate: allow_delegate
                && (content.contains("delegate") || content.contains("forward")),
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "hasQuestion": self.has_question,
            "hasError": self.has_error,
            "hasSuccess": self.has_success,
            "isLong": self.is_long,
            "mentions_delegate": self.mentions_delegate,
        })
    }
}

fn analysis(scenario: &str, content: &str, conditions: &Conditions, action: &str, reason: &str) -> NextResponse {
    NextResponse::data(json!({
        "message": "Conditional analysis complete",
        "action": action,
        "reason": reason,
        "conditions": conditions.to_json(),
        "completion_preview": preview(content),
    }))
    .with_metadata(json!({"scenario": scenario, "action_taken": action}))
}

fn conditional(completion: Option<&Completion>) -> NextResponse {
    let Some(content) = completion_text(completion) else {
        return NextResponse::data(json!({"message": "No completion to analyze"}));
    };

    let conditions = Conditions::analyze(&content, true);
    if conditions.mentions_delegate {
        return delegate_to_create("Delegated based on conditional analysis").with_metadata(json!({
            "scenario": "conditional",
            "action": "delegate",
            "reason": "Completion mentioned delegation",
        }));
    }

    let (action, reason) = if conditions.has_error {
        ("flag_for_review", "Completion contains error indicators")
    } else if conditions.has_success {
        ("confirm_success", "Completion indicates success")
    } else if conditions.is_long {
        ("summarize", "Completion is long, consider summarizing")
    } else {
        ("continue", "Standard completion")
    };
    analysis("conditional", &content, &conditions, action, reason)
}

/// 确定性子场景: 从不委派
fn conditional_success(completion: Option<&Completion>) -> NextResponse {
    let content = completion_text(completion).unwrap_or_default();
    let conditions = Conditions::analyze(&content, false);
    let (action, reason) = if conditions.has_success {
        ("confirm_success", "Completion indicates success")
    } else {
        ("continue", "Standard completion")
    };
    analysis("conditional_success", &content, &conditions, action, reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistants::test_support::context;
    use crate::hooks::ContextInfo;

    fn payload(marker: &str, completion: Option<&str>) -> NextPayload {
        NextPayload {
            messages: vec![Message::user(marker)],
            completion: completion.map(Completion::text),
            ..Default::default()
        }
    }

    fn run(payload: &NextPayload) -> HookReply<NextResponse> {
        let (ctx, _) = context(ContextInfo::default());
        RealworldNext.next(&ctx, payload).unwrap()
    }

    #[test]
    fn test_extract_scenario() {
        let messages = vec![
            Message::user("scenario: delegate"),
            Message::assistant("scenario:custom_data"),
            Message::user("Please run SCENARIO:Conditional_Success now"),
        ];
        assert_eq!(extract_scenario(&messages), "conditional_success");
        assert_eq!(extract_scenario(&[Message::user("hello")]), "default");
        assert_eq!(extract_scenario(&[]), "default");
    }

    #[test]
    fn test_standard_and_default_do_not_override() {
        assert_eq!(run(&payload("scenario:standard", None)), HookReply::NoOverride);
        assert_eq!(run(&payload("no marker", Some("hi"))), HookReply::NoOverride);
    }

    #[test]
    fn test_delegate_depends_on_completion() {
        let reply = run(&payload("scenario:delegate", Some("Let me transfer you"))).into_option().unwrap();
        assert_eq!(reply.delegate.unwrap().agent_id, "tests.create");

        let reply = run(&payload("scenario:delegate", Some("done"))).into_option().unwrap();
        assert!(reply.delegate.is_none());
        assert_eq!(reply.data.unwrap()["message"], json!("No delegation needed"));
    }

    #[test]
    fn test_process_tools_summary() {
        let mut p = payload("scenario:process_tools", None);
        p.tools = vec![
            ToolCallResult {
                server: "echo".to_string(),
                tool: "ping".to_string(),
                result: Some(json!({"message": "pong"})),
                error: None,
            },
            ToolCallResult {
                server: "echo".to_string(),
                tool: "echo".to_string(),
                result: None,
                error: Some("message is required".to_string()),
            },
        ];
        let reply = run(&p).into_option().unwrap();
        let summary = &reply.data.unwrap()["summary"];
        assert_eq!(summary["successful"], json!(1));
        assert_eq!(summary["failed"], json!(1));
        assert_eq!(reply.metadata.unwrap()["has_failures"], json!(true));
    }

    #[test]
    fn test_conditional_actions() {
        let reply = run(&payload("scenario:conditional", Some("The task failed"))).into_option().unwrap();
        assert_eq!(reply.data.unwrap()["action"], json!("flag_for_review"));

        let reply = run(&payload("scenario:conditional", Some("please forward this"))).into_option().unwrap();
        assert!(reply.delegate.is_some());

        let reply = run(&payload("scenario:conditional_success", Some("please forward, success")))
            .into_option()
            .unwrap();
        let data = reply.data.unwrap();
        assert_eq!(data["action"], json!("confirm_success"));
        assert_eq!(data["conditions"]["mentions_delegate"], json!(false));

        let reply = run(&payload("scenario:conditional_delegate", None)).into_option().unwrap();
        assert_eq!(reply.metadata.unwrap()["action"], json!("delegate"));
    }

    #[test]
    fn test_error_recovery() {
        let mut p = payload("scenario:error_recovery", None);
        let reply = run(&p).into_option().unwrap();
        assert_eq!(reply.data.unwrap()["status"], json!("ok"));

        p.error = Some("upstream timeout".to_string());
        let reply = run(&p).into_option().unwrap();
        assert_eq!(reply.data.unwrap()["error"], json!("upstream timeout"));
    }
}
