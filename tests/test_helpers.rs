// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的临时数据库、电子表格文件、助手上下文
// ==========================================

#![allow(dead_code)]

use agent_fixtures::config::{config_keys, ConfigManager};
use agent_fixtures::domain::{ColumnKind, ModelColumn, ModelSchema, Row, Rule, RuleColumn};
use agent_fixtures::hooks::{
    AgentContext, ContextInfo, MemorySpace, MemoryTracer, MockSearchClient, StoreProcessRunner,
};
use agent_fixtures::repository::{ModelStore, SqliteModelStore};
use agent_fixtures::ToolRegistry;
use serde_json::json;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::{NamedTempFile, TempDir};

/// 创建临时测试数据库（元数据表由打开连接时初始化）
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是合法 UTF-8")?
        .to_string();
    Ok((temp_file, db_path))
}

/// 把预览数据根目录指向临时目录
pub fn set_data_root(db_path: &str, dir: &Path) -> Result<(), Box<dyn Error>> {
    let config = ConfigManager::new(db_path)?;
    config.set_global_config_value(config_keys::DATA_ROOT, &dir.display().to_string())?;
    Ok(())
}

/// 在目录下写入 CSV 文件（无表头）
pub fn write_csv(dir: &TempDir, name: &str, rows: &[&[&str]]) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.path().join(name);
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(&path)?;
    for row in rows {
        writer.write_record(*row)?;
    }
    writer.flush()?;
    Ok(path)
}

/// 写入空文件
pub fn write_empty(dir: &TempDir, name: &str) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.path().join(name);
    fs::write(&path, "")?;
    Ok(path)
}

/// 文本列导入规则
///
/// # 参数
/// - columns: (列字母, 表头文字)
pub fn text_rule(name: &str, columns: &[(&str, &str)]) -> Rule {
    Rule {
        name: name.to_string(),
        columns: columns
            .iter()
            .map(|(column, label)| RuleColumn {
                name: column.to_string(),
                label: label.to_string(),
                kind: "string".to_string(),
                length: None,
                nullable: true,
                comment: None,
            })
            .collect(),
    }
}

/// 写入角色表 `__yao_role`（对应模型 `__yao.role`）
pub fn seed_roles(store: &dyn ModelStore, roles: &[(&str, &str)]) -> Result<(), Box<dyn Error>> {
    store.register(&ModelSchema::new(
        "__yao_role",
        vec![
            ModelColumn::new("id", "ID", ColumnKind::Text),
            ModelColumn::new("name", "名称", ColumnKind::Text),
        ],
    ))?;
    for (id, name) in roles {
        let mut row = Row::new();
        row.insert("id".to_string(), json!(id));
        row.insert("name".to_string(), json!(name));
        store.create("__yao_role", &row)?;
    }
    Ok(())
}

/// 组装助手调用上下文（全部端口为内存实现）
pub fn agent_context(
    info: ContextInfo,
    store: Arc<dyn ModelStore>,
) -> (AgentContext, MemoryTracer, Arc<MemorySpace>) {
    let tracer = MemoryTracer::new();
    let space = Arc::new(MemorySpace::new());
    let ctx = AgentContext::new(
        info.clone(),
        Arc::new(ToolRegistry::new().with_context(info)),
        Arc::new(tracer.clone()),
        Arc::new(MockSearchClient::new()),
        Arc::new(StoreProcessRunner::new(store).with_test_scripts()),
    )
    .with_space(space.clone());
    (ctx, tracer, space)
}

/// 带两条角色的内存存储
pub fn role_store() -> Result<Arc<dyn ModelStore>, Box<dyn Error>> {
    let store = SqliteModelStore::in_memory()?;
    seed_roles(&store, &[("admin", "Administrator"), ("guest", "Guest")])?;
    Ok(Arc::new(store))
}
