// ==========================================
// 智能体测试夹具 - tests.rerank-agent (Next)
// ==========================================
// 请求: `{action:"rerank", query, items:[{citation_id}], top_n}`
// 模拟语义重排: 倒序后截取 top_n
// ==========================================

use crate::assistants::parse_request;
use crate::hooks::{AgentContext, HookReply, HookResult, NextHook, NextPayload, NextResponse};
use crate::tools::args::provided;
use crate::tools::search::rerank_order;
use serde_json::{json, Value};

#[derive(Debug, Default, Clone, Copy)]
pub struct RerankAgent;

fn error(message: &str) -> HookReply<NextResponse> {
    HookReply::Partial(NextResponse::data(json!({"error": message})))
}

impl NextHook for RerankAgent {
    fn next(&self, _ctx: &AgentContext, payload: &NextPayload) -> HookResult<HookReply<NextResponse>> {
        let Some(message) = payload.last_user_message() else {
            return Ok(HookReply::NoOverride);
        };
        let Ok(request) = parse_request(message) else {
            return Ok(error("Invalid JSON request"));
        };

        if request.get("action").and_then(Value::as_str) != Some("rerank") {
            return Ok(error("Invalid action, expected 'rerank'"));
        }

        let items = match request.get("items").and_then(Value::as_array) {
            Some(items) if !items.is_empty() => items,
            _ => return Ok(HookReply::Partial(NextResponse::data(json!({"order": []})))),
        };

        let top_n = provided(&request, "top_n").and_then(Value::as_u64).map(|n| n as usize);
        let order = rerank_order(items, top_n);
        Ok(HookReply::Partial(NextResponse::data(json!({
            "order": order,
            "query": request.get("query").cloned().unwrap_or(Value::Null),
            "total": items.len(),
            "returned": order.len(),
        }))))
    }
}
