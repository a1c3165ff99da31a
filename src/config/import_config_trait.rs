// ==========================================
// 智能体测试夹具 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入管道所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use std::error::Error;
use std::path::PathBuf;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（config_kv 表）、ImportSettings（内存默认值）
pub trait ImportConfigReader: Send + Sync {
    /// 默认分块大小（ExcelToTable / TableToTable 未指定时使用）
    ///
    /// # 默认值
    /// - 500
    fn get_chunk_size(&self) -> Result<usize, Box<dyn Error>>;

    /// 预览文件目录（相对数据根目录）
    ///
    /// # 默认值
    /// - /tables/temp
    fn get_preview_dir(&self) -> Result<String, Box<dyn Error>>;

    /// 预览页面 URL 前缀
    ///
    /// # 默认值
    /// - /web/preview/table
    fn get_preview_url(&self) -> Result<String, Box<dyn Error>>;

    /// 侧边栏动作命名空间
    ///
    /// # 默认值
    /// - data-import
    fn get_preview_namespace(&self) -> Result<String, Box<dyn Error>>;

    /// 数据根目录（预览文件写入位置）
    ///
    /// # 默认值
    /// - {系统数据目录}/agent-fixtures
    fn get_data_root(&self) -> Result<PathBuf, Box<dyn Error>>;
}
