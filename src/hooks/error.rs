// ==========================================
// 智能体测试夹具 - Hook 层错误类型
// ==========================================

use crate::tools::ToolError;
use thiserror::Error;

/// Hook 错误
#[derive(Error, Debug)]
pub enum HookError {
    #[error("{capability} 调用失败: {message}")]
    Capability { capability: String, message: String },

    #[error("无效的 Hook 负载: {0}")]
    InvalidPayload(String),

    #[error("Process {name} 执行失败: {message}")]
    Process { name: String, message: String },

    #[error("Process 未注册: {0}")]
    ProcessNotFound(String),

    #[error("Space 不可用")]
    SpaceUnavailable,

    #[error("助手未注册: {0}")]
    UnknownAssistant(String),

    #[error("助手 {assistant} 未实现 {hook} Hook")]
    HookNotImplemented { assistant: String, hook: String },

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HookError {
    pub fn capability(capability: impl Into<String>, message: impl Into<String>) -> Self {
        HookError::Capability {
            capability: capability.into(),
            message: message.into(),
        }
    }
}

/// Result 类型别名
pub type HookResult<T> = Result<T, HookError>;
