// ==========================================
// 智能体测试夹具 - tests.keyword-agent (Next)
// ==========================================
// 请求: `{content, max_keywords, language}` 的 JSON 文本，或直接给出文本
// ==========================================

use crate::assistants::parse_request;
use crate::hooks::{AgentContext, HookReply, HookResult, NextHook, NextPayload, NextResponse};
use crate::tools::args::{str_or, usize_or};
use crate::tools::keywords::{extract_keywords, DEFAULT_MAX_KEYWORDS};
use serde_json::json;

#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordAgent;

impl NextHook for KeywordAgent {
    fn next(&self, _ctx: &AgentContext, payload: &NextPayload) -> HookResult<HookReply<NextResponse>> {
        let Some(message) = payload.last_user_message() else {
            return Ok(HookReply::NoOverride);
        };

        let keywords = match parse_request(message) {
            Ok(request) => extract_keywords(
                str_or(&request, "content", ""),
                usize_or(&request, "max_keywords", DEFAULT_MAX_KEYWORDS),
            ),
            Err(text) => extract_keywords(&text, DEFAULT_MAX_KEYWORDS),
        };

        Ok(HookReply::Partial(NextResponse::data(json!({"keywords": keywords}))))
    }
}
