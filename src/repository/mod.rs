// ==========================================
// 智能体测试夹具 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供模型表与缓存的数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod cache;
pub mod error;
pub mod model_store;
pub mod model_store_impl;

// 重导出核心仓储
pub use cache::{KvCache, MemoryCache};
pub use error::{RepositoryError, RepositoryResult};
pub use model_store::ModelStore;
pub use model_store_impl::SqliteModelStore;
