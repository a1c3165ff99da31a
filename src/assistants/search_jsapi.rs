// ==========================================
// 智能体测试夹具 - 搜索能力夹具 (Create)
// ==========================================
// tests.search-jsapi: `test:<method> [query]` → ctx.search 各方法，结果以消息返回
// tests.search-auto-hook-disable: 关闭自动搜索
// ==========================================

use crate::hooks::{
    AgentContext, CreateHook, CreateResponse, HookReply, HookResult, Message, SearchOptions,
    SearchRequest, Uses,
};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static TEST_COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^test:(\w+)(?:\s+(.*))?$").expect("test command pattern"));

const DEFAULT_QUERY: &str = "Yao App Engine";

/// 单次搜索条数
const SEARCH_LIMIT: usize = 5;

/// 并发搜索中每个请求的条数
const PARALLEL_LIMIT: usize = 3;

#[derive(Debug, Default, Clone, Copy)]
pub struct SearchJsApi;

fn reply(content: impl Into<String>) -> HookReply<CreateResponse> {
    HookReply::Partial(CreateResponse::with_messages(vec![Message::assistant(content)]))
}

fn pair(a: &str, b: &str) -> [SearchRequest; 2] {
    [SearchRequest::web(a, PARALLEL_LIMIT), SearchRequest::web(b, PARALLEL_LIMIT)]
}

fn run_method(ctx: &AgentContext, method: &str, query: &str) -> Option<HookResult<Value>> {
    let search = &ctx.search;
    let result = match method {
        "web" => search.web(query, &SearchOptions::limit(SEARCH_LIMIT)),
        "web_sites" => search.web(
            query,
            &SearchOptions {
                limit: Some(SEARCH_LIMIT),
                sites: vec!["github.com".to_string(), "yaoapps.com".to_string()],
                ..Default::default()
            },
        ),
        "kb" => search.kb(
            query,
            &SearchOptions {
                limit: Some(SEARCH_LIMIT),
                collections: vec!["docs".to_string()],
                ..Default::default()
            },
        ),
        "db" => search.db(
            query,
            &SearchOptions {
                limit: Some(SEARCH_LIMIT),
                models: vec!["product".to_string()],
                ..Default::default()
            },
        ),
        "all" => search
            .all(&pair("golang programming", "rust programming"))
            .map(Value::from),
        "any" => search.any(&pair("kubernetes containers", "docker orchestration")),
        "race" => search.race(&pair("machine learning", "deep learning")),
        _ => return None,
    };
    Some(result)
}

impl CreateHook for SearchJsApi {
    fn create(&self, ctx: &AgentContext, messages: &[Message]) -> HookResult<HookReply<CreateResponse>> {
        let content = messages
            .iter()
            .find(|m| m.role == "user")
            .and_then(Message::text)
            .unwrap_or("");

        let Some(caps) = TEST_COMMAND_RE.captures(content) else {
            return Ok(reply(
                "Invalid test command. Use: test:web, test:kb, test:db, test:all, test:any, test:race",
            ));
        };
        let method = &caps[1];
        let query = caps
            .get(2)
            .map(|m| m.as_str())
            .filter(|q| !q.is_empty())
            .unwrap_or(DEFAULT_QUERY);

        let text = match run_method(ctx, method, query) {
            None => format!(
                "Unknown test method: {}. Use: web, web_sites, kb, db, all, any, race",
                method
            ),
            Some(Ok(result)) => serde_json::to_string_pretty(&result).map_err(anyhow::Error::from)?,
            Some(Err(e)) => format!("Error: {}", e),
        };
        Ok(reply(text))
    }
}

/// 通过 uses.search = "disabled" 关闭自动搜索
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchAutoHookDisable;

impl CreateHook for SearchAutoHookDisable {
    fn create(&self, _ctx: &AgentContext, _messages: &[Message]) -> HookResult<HookReply<CreateResponse>> {
        Ok(HookReply::Partial(CreateResponse {
            uses: Some(Uses {
                search: Some("disabled".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }))
    }
}
