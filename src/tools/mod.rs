// ==========================================
// 智能体测试夹具 - 模拟工具层
// ==========================================
// 职责: echo / mcpload / search 三个测试服务的工具与资源
// 约束: 确定性字段（顺序、分数、标题、URL、关键词）只依赖输入
// ==========================================

pub mod args;
pub mod echo;
pub mod error;
pub mod keywords;
pub mod mcpload;
pub mod mock_results;
pub mod registry;
pub mod search;

pub use error::{ToolError, ToolResult};
pub use keywords::extract_keywords;
pub use mock_results::{generate_mock_results, MockResultItem, ResultKind};
pub use registry::{ResourceDefinition, ToolRegistry, ECHO_SERVER, MCPLOAD_SERVER, SEARCH_SERVER};
