// ==========================================
// 智能体测试夹具 - Hook 调用上下文
// ==========================================
// ContextInfo: 宿主传入的会话字段（均可缺省）
// AgentContext: 会话字段 + 宿主能力端口
// ==========================================

use crate::hooks::ports::{McpClient, ProcessRunner, SearchClient, Space, Tracer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// 授权信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Authorized {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
}

/// 数据访问约束
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
}

/// 客户端信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

/// 会话字段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized: Option<Authorized>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
}

/// Hook 调用上下文
#[derive(Clone)]
pub struct AgentContext {
    pub info: ContextInfo,
    pub mcp: Arc<dyn McpClient>,
    pub trace: Arc<dyn Tracer>,
    pub search: Arc<dyn SearchClient>,
    pub process: Arc<dyn ProcessRunner>,
    /// 会话共享空间（宿主可能不提供）
    pub space: Option<Arc<dyn Space>>,
}

impl AgentContext {
    pub fn new(
        info: ContextInfo,
        mcp: Arc<dyn McpClient>,
        trace: Arc<dyn Tracer>,
        search: Arc<dyn SearchClient>,
        process: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            info,
            mcp,
            trace,
            search,
            process,
            space: None,
        }
    }

    pub fn with_space(mut self, space: Arc<dyn Space>) -> Self {
        self.space = Some(space);
        self
    }
}
