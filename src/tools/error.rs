// ==========================================
// 智能体测试夹具 - 工具层错误类型
// ==========================================

use thiserror::Error;

/// 工具调用错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("{0} is required")]
    MissingArgument(String),

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("unknown server: {0}")]
    UnknownServer(String),

    #[error("unknown tool: {server}.{tool}")]
    UnknownTool { server: String, tool: String },

    #[error("unknown resource: {server}/{resource}")]
    UnknownResource { server: String, resource: String },
}

impl ToolError {
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        ToolError::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result 类型别名
pub type ToolResult<T> = Result<T, ToolError>;
