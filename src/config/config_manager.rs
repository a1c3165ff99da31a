// ==========================================
// 智能体测试夹具 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::config::settings::{
    default_data_root, DEFAULT_CHUNK_SIZE, DEFAULT_PREVIEW_DIR, DEFAULT_PREVIEW_NAMESPACE,
    DEFAULT_PREVIEW_URL,
};
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA 与元数据表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            crate::db::init_meta_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 配置（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> Result<HashMap<String, String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global'")?;
        let snapshot = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(snapshot)
    }
}

impl ImportConfigReader for ConfigManager {
    fn get_chunk_size(&self) -> Result<usize, Box<dyn Error>> {
        let default = DEFAULT_CHUNK_SIZE.to_string();
        let value = self.get_config_or_default(config_keys::CHUNK_SIZE, &default)?;
        match value.trim().parse::<usize>() {
            Ok(size) if size > 0 => Ok(size),
            _ => {
                warn!(key = config_keys::CHUNK_SIZE, value = %value, "配置值无效，使用默认值");
                Ok(DEFAULT_CHUNK_SIZE)
            }
        }
    }

    fn get_preview_dir(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::PREVIEW_DIR, DEFAULT_PREVIEW_DIR)
    }

    fn get_preview_url(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::PREVIEW_URL, DEFAULT_PREVIEW_URL)
    }

    fn get_preview_namespace(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::PREVIEW_NAMESPACE, DEFAULT_PREVIEW_NAMESPACE)
    }

    fn get_data_root(&self) -> Result<PathBuf, Box<dyn Error>> {
        Ok(self
            .get_config_value(config_keys::DATA_ROOT)?
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_root))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const CHUNK_SIZE: &str = "import.chunk_size";
    pub const PREVIEW_DIR: &str = "import.preview_dir";
    pub const PREVIEW_URL: &str = "import.preview_url";
    pub const PREVIEW_NAMESPACE: &str = "import.preview_namespace";
    pub const DATA_ROOT: &str = "import.data_root";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::ImportSettings;

    fn manager() -> ConfigManager {
        let conn = crate::db::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = manager();
        assert_eq!(config.get_chunk_size().unwrap(), 500);
        assert_eq!(config.get_preview_dir().unwrap(), "/tables/temp");
        assert_eq!(config.get_preview_url().unwrap(), "/web/preview/table");
        assert_eq!(config.get_preview_namespace().unwrap(), "data-import");
    }

    #[test]
    fn test_overrides_from_config_kv() {
        let config = manager();
        config.set_global_config_value(config_keys::CHUNK_SIZE, "50").unwrap();
        config.set_global_config_value(config_keys::DATA_ROOT, "/tmp/fixtures").unwrap();

        let settings = ImportSettings::load(&config).unwrap();
        assert_eq!(settings.chunk_size, 50);
        assert_eq!(settings.data_root, PathBuf::from("/tmp/fixtures"));
        assert_eq!(config.get_config_snapshot().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_chunk_size_falls_back() {
        let config = manager();
        config.set_global_config_value(config_keys::CHUNK_SIZE, "0").unwrap();
        assert_eq!(config.get_chunk_size().unwrap(), 500);

        config.set_global_config_value(config_keys::CHUNK_SIZE, "abc").unwrap();
        assert_eq!(config.get_chunk_size().unwrap(), 500);
    }
}
