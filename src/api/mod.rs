// ==========================================
// 智能体测试夹具 - API 层
// ==========================================
// 职责: 对外提供导入管道入口，供命令行或宿主调用
// ==========================================

pub mod error;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::ImportApi;
