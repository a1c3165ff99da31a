// ==========================================
// 智能体测试夹具 - QueryDSL 生成夹具 (Next)
// ==========================================
// tests.querydsl-agent: 固定的合法 QueryDSL
// tests.querydsl-agent-retry: 首次返回缺少 from 的 DSL，
//   请求中带 retry.lint_errors 时返回修正后的 DSL
// ==========================================

use crate::assistants::parse_request;
use crate::hooks::{AgentContext, HookReply, HookResult, NextHook, NextPayload, NextResponse};
use crate::tools::args::{provided, str_or, usize_or};
use crate::tools::search::DEFAULT_DSL_LIMIT;
use serde_json::{json, Value};

/// 请求对象（非 JSON 文本视为 query）
fn request_of(payload: &NextPayload) -> Option<Value> {
    let message = payload.last_user_message()?;
    Some(parse_request(message).unwrap_or_else(|text| json!({"query": text})))
}

fn active_status_filter() -> Value {
    json!([{"field": "status", "op": "=", "value": "active"}])
}

fn newest_first() -> Value {
    json!([{"field": "created_at", "sort": "desc"}])
}

#[derive(Debug, Default, Clone, Copy)]
pub struct QueryDslAgent;

impl NextHook for QueryDslAgent {
    fn next(&self, _ctx: &AgentContext, payload: &NextPayload) -> HookResult<HookReply<NextResponse>> {
        let Some(request) = request_of(payload) else {
            return Ok(HookReply::NoOverride);
        };
        let query = str_or(&request, "query", "");
        let limit = usize_or(&request, "limit", DEFAULT_DSL_LIMIT);

        Ok(HookReply::Partial(NextResponse::data(json!({
            "dsl": {
                "select": ["id", "name", "status", "created_at"],
                "from": "users",
                "wheres": active_status_filter(),
                "orders": newest_first(),
                "limit": limit,
            },
            "explain": format!("Generated QueryDSL for: \"{}\"", query),
            "warnings": [],
        }))))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct QueryDslRetryAgent;

impl NextHook for QueryDslRetryAgent {
    fn next(&self, _ctx: &AgentContext, payload: &NextPayload) -> HookResult<HookReply<NextResponse>> {
        let Some(request) = request_of(payload) else {
            return Ok(HookReply::NoOverride);
        };
        let limit = usize_or(&request, "limit", DEFAULT_DSL_LIMIT);
        let retry = provided(&request, "retry");

        if retry.and_then(|r| provided(r, "lint_errors")).is_none() {
            return Ok(HookReply::Partial(NextResponse::data(json!({
                "dsl": {
                    "select": ["id", "name", "status"],
                    "wheres": active_status_filter(),
                    "limit": limit,
                },
                "explain": "Mock QueryDSL (first attempt, intentionally invalid - missing 'from')",
                "warnings": ["Test: missing 'from' field to trigger retry"],
            }))));
        }

        let attempt = retry
            .and_then(|r| provided(r, "attempt"))
            .cloned()
            .unwrap_or_else(|| json!(2));
        Ok(HookReply::Partial(NextResponse::data(json!({
            "dsl": {
                "select": ["id", "name", "status"],
                "from": "users",
                "wheres": active_status_filter(),
                "orders": newest_first(),
                "limit": limit,
            },
            "explain": format!("Mock QueryDSL (attempt {}, fixed after receiving lint errors)", attempt),
            "warnings": [],
        }))))
    }
}
