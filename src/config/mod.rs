// ==========================================
// 智能体测试夹具 - 配置层
// ==========================================
// 职责: 导入管道配置管理（分块大小、预览目录与地址）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;
pub mod settings;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::ImportConfigReader;
pub use settings::{default_data_root, ImportSettings};
