// ==========================================
// 智能体测试夹具 - Hook 返回结构
// ==========================================
// 约定: 响应字段全部可缺省，缺省字段不覆盖宿主默认值
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 对话消息（content 可为文本或结构化内容）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    #[serde(default)]
    pub content: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Value::String(content.into()),
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    /// 文本内容（结构化内容返回 None）
    pub fn text(&self) -> Option<&str> {
        self.content.as_str()
    }
}

/// 音频输出配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    pub voice: String,
    pub format: String,
}

/// 能力路由（vision / audio / search / fetch）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Uses {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch: Option<String>,
}

/// Create Hook 响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<Uses>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_uses: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

impl CreateResponse {
    /// 只含消息的响应
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages: Some(messages),
            ..Default::default()
        }
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        if let Value::Object(map) = metadata {
            self.metadata = Some(map);
        }
        self
    }
}

/// 模型输出
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    #[serde(default)]
    pub content: Value,
}

impl Completion {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Value::String(content.into()),
        }
    }

    /// 非空文本内容
    pub fn content_str(&self) -> Option<&str> {
        self.content.as_str().filter(|s| !s.is_empty())
    }
}

/// 工具调用结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResult {
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub tool: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Next Hook 负载
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NextPayload {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<Completion>,
    #[serde(default)]
    pub tools: Vec<ToolCallResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NextPayload {
    /// 最后一条消息（仅当其为 user 消息）
    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages.last().filter(|m| m.role == "user")
    }
}

/// 委派给其它助手
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delegate {
    pub agent_id: String,
    pub messages: Vec<Message>,
}

/// Next Hook 响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NextResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<Delegate>,
}

impl NextResponse {
    pub fn data(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn delegate(agent_id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            delegate: Some(Delegate {
                agent_id: agent_id.into(),
                messages,
            }),
            ..Default::default()
        }
    }
}

/// Hook 返回值
///
/// - NoOverride: 不覆盖（对应宿主中的 null / undefined）
/// - Partial: 只覆盖给出的字段
/// - Full: 给出完整配置
#[derive(Debug, Clone, PartialEq)]
pub enum HookReply<T> {
    NoOverride,
    Partial(T),
    Full(T),
}

impl<T> HookReply<T> {
    pub fn is_override(&self) -> bool {
        !matches!(self, HookReply::NoOverride)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            HookReply::NoOverride => None,
            HookReply::Partial(value) | HookReply::Full(value) => Some(value),
        }
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            HookReply::NoOverride => None,
            HookReply::Partial(value) | HookReply::Full(value) => Some(value),
        }
    }
}

impl<T: Serialize> HookReply<T> {
    /// 宿主侧 JSON（NoOverride 为 null）
    pub fn to_json(&self) -> serde_json::Result<Value> {
        match self.as_ref() {
            None => Ok(Value::Null),
            Some(value) => serde_json::to_value(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_response_omits_absent_fields() {
        let response = CreateResponse {
            temperature: Some(0.5),
            messages: Some(vec![Message::user("Partial test")]),
            ..Default::default()
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({"messages": [{"role": "user", "content": "Partial test"}], "temperature": 0.5})
        );
    }

    #[test]
    fn test_hook_reply_json() {
        let none: HookReply<CreateResponse> = HookReply::NoOverride;
        assert_eq!(none.to_json().unwrap(), Value::Null);
        assert!(!none.is_override());

        let empty = HookReply::Partial(CreateResponse::default());
        assert_eq!(empty.to_json().unwrap(), json!({}));
    }

    #[test]
    fn test_next_payload_defaults() {
        let payload: NextPayload = serde_json::from_value(json!({
            "messages": [{"role": "user", "content": "scenario:standard"}]
        }))
        .unwrap();
        assert!(payload.completion.is_none());
        assert!(payload.tools.is_empty());
        assert_eq!(payload.last_user_message().and_then(Message::text), Some("scenario:standard"));
    }
}
