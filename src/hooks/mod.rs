// ==========================================
// 智能体测试夹具 - Hook 层
// ==========================================
// 职责: Hook 上下文、宿主能力端口、返回结构，以及端口的内存实现
// 红线: Hook 夹具只通过端口访问宿主能力
// ==========================================

pub mod context;
pub mod error;
pub mod ports;
pub mod process;
pub mod response;
pub mod search;
pub mod space;
pub mod trace;

pub use context::{AgentContext, Authorized, ClientInfo, Constraints, ContextInfo};
pub use error::{HookError, HookResult};
pub use ports::{
    McpClient, ProcessRunner, SearchClient, SearchOptions, SearchRequest, SearchType, Space,
    ToolDefinition, ToolList, TraceNode, TraceOptions, Tracer,
};
pub use process::StoreProcessRunner;
pub use response::{
    AudioConfig, Completion, CreateResponse, Delegate, HookReply, Message, NextPayload,
    NextResponse, ToolCallResult, Uses,
};
pub use search::MockSearchClient;
pub use space::MemorySpace;
pub use trace::{MemoryTracer, TraceLevel, TraceRecord};

/// Create Hook: 会话开始前调整请求
pub trait CreateHook: Send + Sync {
    fn create(&self, ctx: &AgentContext, messages: &[Message]) -> HookResult<HookReply<CreateResponse>>;
}

/// Next Hook: 模型输出后决定后续动作
pub trait NextHook: Send + Sync {
    fn next(&self, ctx: &AgentContext, payload: &NextPayload) -> HookResult<HookReply<NextResponse>>;
}
