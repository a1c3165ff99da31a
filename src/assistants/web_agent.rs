// ==========================================
// 智能体测试夹具 - tests.web-agent (Next)
// ==========================================
// 不经过模型，直接返回模拟网页搜索结果
// ==========================================

use crate::assistants::parse_request;
use crate::hooks::{AgentContext, HookReply, HookResult, NextHook, NextPayload, NextResponse};
use crate::tools::args::{str_list, str_or, usize_or};
use crate::tools::mock_results::{generate_mock_results, ResultKind};
use crate::tools::search::DEFAULT_LIMIT;
use serde_json::json;

const PROVIDER: &str = "agent:tests.web-agent";

#[derive(Debug, Default, Clone, Copy)]
pub struct WebAgent;

impl NextHook for WebAgent {
    fn next(&self, _ctx: &AgentContext, payload: &NextPayload) -> HookResult<HookReply<NextResponse>> {
        let Some(message) = payload.last_user_message() else {
            return Ok(HookReply::Partial(NextResponse::data(json!({
                "error": "No user message found",
            }))));
        };

        let params = parse_request(message).unwrap_or_else(|text| json!({"query": text}));
        let query = str_or(&params, "query", "");
        let limit = usize_or(&params, "limit", DEFAULT_LIMIT);
        let sites = str_list(&params, "sites");
        let time_range = str_or(&params, "time_range", "");

        let items = generate_mock_results(query, limit, &sites, ResultKind::Web);
        Ok(HookReply::Partial(NextResponse::data(json!({
            "type": "web",
            "query": query,
            "total": items.len(),
            "items": items,
            "metadata": {
                "provider": PROVIDER,
                "time_range": time_range,
                "sites": sites,
            },
        }))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistants::test_support::context;
    use crate::hooks::{ContextInfo, Message};
    use serde_json::Value;

    fn run(messages: Vec<Message>) -> Value {
        let (ctx, _) = context(ContextInfo::default());
        let payload = NextPayload {
            messages,
            ..Default::default()
        };
        WebAgent.next(&ctx, &payload).unwrap().into_option().unwrap().data.unwrap()
    }

    #[test]
    fn test_json_search_request() {
        let data = run(vec![Message::user(r#"{"query":"yao agents","limit":30,"sites":["docs.rs"]}"#)]);
        assert_eq!(data["total"], json!(20));
        assert_eq!(data["metadata"]["provider"], json!("agent:tests.web-agent"));
        assert_eq!(
            data["items"][0]["url"],
            json!("https://docs.rs/article/yao-agents-1")
        );
    }

    #[test]
    fn test_plain_query_and_missing_user() {
        let data = run(vec![Message::user("rust")]);
        assert_eq!(data["query"], json!("rust"));
        assert_eq!(data["total"], json!(10));

        let data = run(vec![Message::assistant("hi")]);
        assert_eq!(data, json!({"error": "No user message found"}));
    }
}
