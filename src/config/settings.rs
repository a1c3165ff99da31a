// ==========================================
// 智能体测试夹具 - 导入配置快照
// ==========================================
// 职责: 导入配置的默认值与内存实现
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::PathBuf;

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_PREVIEW_DIR: &str = "/tables/temp";
pub const DEFAULT_PREVIEW_URL: &str = "/web/preview/table";
pub const DEFAULT_PREVIEW_NAMESPACE: &str = "data-import";

/// 默认数据根目录: {系统数据目录}/agent-fixtures，取不到系统目录时用当前目录下 data/
pub fn default_data_root() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("agent-fixtures"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// 导入配置快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSettings {
    pub chunk_size: usize,
    pub preview_dir: String,
    pub preview_url: String,
    pub preview_namespace: String,
    pub data_root: PathBuf,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            preview_dir: DEFAULT_PREVIEW_DIR.to_string(),
            preview_url: DEFAULT_PREVIEW_URL.to_string(),
            preview_namespace: DEFAULT_PREVIEW_NAMESPACE.to_string(),
            data_root: default_data_root(),
        }
    }
}

impl ImportSettings {
    /// 从任意配置读取器生成快照
    pub fn load(reader: &dyn ImportConfigReader) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            chunk_size: reader.get_chunk_size()?,
            preview_dir: reader.get_preview_dir()?,
            preview_url: reader.get_preview_url()?,
            preview_namespace: reader.get_preview_namespace()?,
            data_root: reader.get_data_root()?,
        })
    }

    pub fn with_data_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.data_root = root.into();
        self
    }
}

impl ImportConfigReader for ImportSettings {
    fn get_chunk_size(&self) -> Result<usize, Box<dyn Error>> {
        Ok(self.chunk_size)
    }

    fn get_preview_dir(&self) -> Result<String, Box<dyn Error>> {
        Ok(self.preview_dir.clone())
    }

    fn get_preview_url(&self) -> Result<String, Box<dyn Error>> {
        Ok(self.preview_url.clone())
    }

    fn get_preview_namespace(&self) -> Result<String, Box<dyn Error>> {
        Ok(self.preview_namespace.clone())
    }

    fn get_data_root(&self) -> Result<PathBuf, Box<dyn Error>> {
        Ok(self.data_root.clone())
    }
}
