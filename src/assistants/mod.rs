// ==========================================
// 智能体测试夹具 - 助手 Hook 夹具
// ==========================================
// 职责: 按助手 ID 注册 Create / Next Hook，并按 ID 分发调用
// 助手:
// - tests.create / tests.realworld / tests.search-jsapi
//   tests.search-auto-hook-disable (Create)
// - tests.realworld-next / tests.keyword-agent / tests.querydsl-agent
//   tests.querydsl-agent-retry / tests.rerank-agent / tests.web-agent
//   tests.vision-helper (Next)
// ==========================================

pub mod create;
pub mod keyword_agent;
pub mod querydsl_agent;
pub mod realworld;
pub mod realworld_next;
pub mod rerank_agent;
pub mod search_jsapi;
pub mod vision_helper;
pub mod web_agent;

use crate::hooks::{
    AgentContext, CreateHook, CreateResponse, HookError, HookReply, HookResult, Message, NextHook,
    NextPayload, NextResponse,
};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

pub use create::CreateScenarios;
pub use keyword_agent::KeywordAgent;
pub use querydsl_agent::{QueryDslAgent, QueryDslRetryAgent};
pub use realworld::RealworldCreate;
pub use realworld_next::RealworldNext;
pub use rerank_agent::RerankAgent;
pub use search_jsapi::{SearchAutoHookDisable, SearchJsApi};
pub use vision_helper::VisionHelper;
pub use web_agent::WebAgent;

// ==========================================
// 夹具共用工具
// ==========================================

pub(crate) fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 首条消息的文本内容（缺失时为空串）
pub(crate) fn first_content(messages: &[Message]) -> &str {
    messages.first().and_then(Message::text).unwrap_or("")
}

/// 值的展示文本: 空值回退为 fallback，字符串不加引号
pub(crate) fn display_or(value: Option<&Value>, fallback: &str) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => fallback.to_string(),
        Some(Value::String(s)) if s.is_empty() => fallback.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// 数组长度（非数组为 0）
pub(crate) fn array_len(value: &Value) -> usize {
    value.as_array().map(Vec::len).unwrap_or(0)
}

/// 解析 user 消息中的 JSON 请求
///
/// # 返回
/// - Ok(value): 内容为合法 JSON 文本，或本身即结构化内容
/// - Err(text): 内容不是 JSON 文本
pub(crate) fn parse_request(message: &Message) -> Result<Value, String> {
    match &message.content {
        Value::String(text) => serde_json::from_str(text).map_err(|_| text.clone()),
        other => Ok(other.clone()),
    }
}

// ==========================================
// AssistantRegistry
// ==========================================

/// 助手注册表
#[derive(Default, Clone)]
pub struct AssistantRegistry {
    create_hooks: HashMap<String, Arc<dyn CreateHook>>,
    next_hooks: HashMap<String, Arc<dyn NextHook>>,
}

impl AssistantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册内置的全部测试助手
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register_create("tests.create", CreateScenarios);
        registry.register_create("tests.realworld", RealworldCreate);
        registry.register_create("tests.search-jsapi", SearchJsApi);
        registry.register_create("tests.search-auto-hook-disable", SearchAutoHookDisable);
        registry.register_next("tests.realworld-next", RealworldNext);
        registry.register_next("tests.keyword-agent", KeywordAgent);
        registry.register_next("tests.querydsl-agent", QueryDslAgent);
        registry.register_next("tests.querydsl-agent-retry", QueryDslRetryAgent);
        registry.register_next("tests.rerank-agent", RerankAgent);
        registry.register_next("tests.web-agent", WebAgent);
        registry.register_next("tests.vision-helper", VisionHelper);
        registry
    }

    pub fn register_create(&mut self, assistant_id: impl Into<String>, hook: impl CreateHook + 'static) {
        self.create_hooks.insert(assistant_id.into(), Arc::new(hook));
    }

    pub fn register_next(&mut self, assistant_id: impl Into<String>, hook: impl NextHook + 'static) {
        self.next_hooks.insert(assistant_id.into(), Arc::new(hook));
    }

    /// 已注册的助手 ID（排序后）
    pub fn assistant_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .create_hooks
            .keys()
            .chain(self.next_hooks.keys())
            .cloned()
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    fn ensure_known(&self, assistant_id: &str) -> HookResult<()> {
        if self.create_hooks.contains_key(assistant_id) || self.next_hooks.contains_key(assistant_id) {
            Ok(())
        } else {
            Err(HookError::UnknownAssistant(assistant_id.to_string()))
        }
    }

    /// 调用 Create Hook
    #[instrument(skip(self, ctx, messages), fields(messages = messages.len()))]
    pub fn create(
        &self,
        assistant_id: &str,
        ctx: &AgentContext,
        messages: &[Message],
    ) -> HookResult<HookReply<CreateResponse>> {
        self.ensure_known(assistant_id)?;
        let hook = self
            .create_hooks
            .get(assistant_id)
            .ok_or_else(|| HookError::HookNotImplemented {
                assistant: assistant_id.to_string(),
                hook: "Create".to_string(),
            })?;

        let reply = hook.create(ctx, messages)?;
        debug!(assistant = %assistant_id, overridden = reply.is_override(), "Create Hook 完成");
        Ok(reply)
    }

    /// 调用 Next Hook
    #[instrument(skip(self, ctx, payload), fields(messages = payload.messages.len()))]
    pub fn next(
        &self,
        assistant_id: &str,
        ctx: &AgentContext,
        payload: &NextPayload,
    ) -> HookResult<HookReply<NextResponse>> {
        self.ensure_known(assistant_id)?;
        let hook = self
            .next_hooks
            .get(assistant_id)
            .ok_or_else(|| HookError::HookNotImplemented {
                assistant: assistant_id.to_string(),
                hook: "Next".to_string(),
            })?;

        let reply = hook.next(ctx, payload)?;
        debug!(assistant = %assistant_id, overridden = reply.is_override(), "Next Hook 完成");
        Ok(reply)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::hooks::{
        AgentContext, ContextInfo, MemorySpace, MemoryTracer, MockSearchClient, StoreProcessRunner,
    };
    use crate::repository::SqliteModelStore;
    use crate::tools::ToolRegistry;
    use std::sync::Arc;

    /// 无角色表的上下文
    pub fn context(info: ContextInfo) -> (AgentContext, MemoryTracer) {
        let store = Arc::new(SqliteModelStore::in_memory().unwrap());
        let tracer = MemoryTracer::new();
        let ctx = AgentContext::new(
            info.clone(),
            Arc::new(ToolRegistry::new().with_context(info)),
            Arc::new(tracer.clone()),
            Arc::new(MockSearchClient::new()),
            Arc::new(StoreProcessRunner::new(store).with_test_scripts()),
        )
        .with_space(Arc::new(MemorySpace::new()));
        (ctx, tracer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::ContextInfo;
    use serde_json::json;

    #[test]
    fn test_display_or() {
        assert_eq!(display_or(None, "unknown"), "unknown");
        assert_eq!(display_or(Some(&json!("")), "unknown"), "unknown");
        assert_eq!(display_or(Some(&json!("admin")), "unknown"), "admin");
        assert_eq!(display_or(Some(&json!(7)), "unknown"), "7");
    }

    #[test]
    fn test_parse_request() {
        assert_eq!(parse_request(&Message::user(r#"{"query":"q"}"#)), Ok(json!({"query": "q"})));
        assert_eq!(parse_request(&Message::user("plain")), Err("plain".to_string()));
    }

    #[test]
    fn test_registry_dispatch_errors() {
        let registry = AssistantRegistry::builtin();
        let (ctx, _) = test_support::context(ContextInfo::default());

        assert!(matches!(
            registry.create("tests.unknown", &ctx, &[]),
            Err(HookError::UnknownAssistant(_))
        ));
        assert!(matches!(
            registry.next("tests.create", &ctx, &NextPayload::default()),
            Err(HookError::HookNotImplemented { .. })
        ));
        assert!(matches!(
            registry.create("tests.web-agent", &ctx, &[]),
            Err(HookError::HookNotImplemented { .. })
        ));
        assert_eq!(registry.assistant_ids().len(), 11);
    }
}
