// ==========================================
// 智能体测试夹具 - 导入 API
// ==========================================
// 职责: 组装存储/缓存/文件/清洗函数，提供导入管道的各个入口
// 入口: ExcelToTable / TableToTable / CountModel / CountModelWhere
//       CountRows / GetID / PreviewMessage
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ImportSettings};
use crate::domain::{PreviewAction, PreviewParams, ReconcileReport, Rule};
use crate::importer::{
    self, open_sheet_source, CleanerRegistry, FileSink, LocalFs, RowCleaner, TableToTableJob,
};
use crate::repository::{KvCache, MemoryCache, ModelStore, SqliteModelStore};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

/// 导入API
pub struct ImportApi {
    store: Arc<dyn ModelStore>,
    cache: Arc<dyn KvCache>,
    sink: Arc<dyn FileSink>,
    cleaners: CleanerRegistry,
    settings: ImportSettings,
}

impl ImportApi {
    /// 由已注入的端口创建
    pub fn new(
        store: Arc<dyn ModelStore>,
        cache: Arc<dyn KvCache>,
        sink: Arc<dyn FileSink>,
        settings: ImportSettings,
    ) -> Self {
        Self {
            store,
            cache,
            sink,
            cleaners: CleanerRegistry::new(),
            settings,
        }
    }

    /// 打开数据库并按 config_kv 配置组装
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let store = SqliteModelStore::new(db_path)?;
        let config = ConfigManager::from_connection(store.connection())
            .map_err(|e| ApiError::InternalError(format!("初始化配置失败: {}", e)))?;
        let settings = ImportSettings::load(&config)
            .map_err(|e| ApiError::InternalError(format!("读取配置失败: {}", e)))?;

        info!(db_path = %db_path, data_root = %settings.data_root.display(), "导入API已就绪");
        let sink = LocalFs::new(settings.data_root.clone());
        Ok(Self::new(
            Arc::new(store),
            Arc::new(MemoryCache::new()),
            Arc::new(sink),
            settings,
        ))
    }

    /// 注册命名清洗函数
    pub fn register_cleaner(&mut self, name: impl Into<String>, cleaner: impl RowCleaner + 'static) {
        self.cleaners.register(name, cleaner);
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    pub fn store(&self) -> Arc<dyn ModelStore> {
        Arc::clone(&self.store)
    }

    fn chunk_size(&self, chunk_size: Option<usize>) -> usize {
        chunk_size.filter(|n| *n > 0).unwrap_or(self.settings.chunk_size)
    }

    /// ExcelToTable
    ///
    /// # 参数
    /// - path: 电子表格路径
    /// - sheet: 工作表名（CSV 忽略）
    /// - rule: 导入规则
    /// - from: 起始行偏移（默认 0）
    /// - chunk_size: 读取行数（默认取配置）
    ///
    /// # 返回
    /// - 已插入的元组 `[line, ...cells]`
    pub fn excel_to_table(
        &self,
        path: &str,
        sheet: &str,
        rule: &Rule,
        from: Option<usize>,
        chunk_size: Option<usize>,
    ) -> ApiResult<Vec<Vec<Value>>> {
        // 文件句柄只在本次调用内持有
        let mut source = open_sheet_source(path)?;
        let data = importer::excel_to_table(
            source.as_mut(),
            self.store.as_ref(),
            sheet,
            rule,
            from.unwrap_or(0),
            self.chunk_size(chunk_size),
        )?;
        Ok(data)
    }

    /// TableToTable
    ///
    /// # 参数
    /// - cleaner: 清洗函数名（None 时原样写入）
    pub fn table_to_table(
        &self,
        source: &str,
        target: &str,
        report: &str,
        cleaner: Option<&str>,
        from: Option<usize>,
        chunk_size: Option<usize>,
    ) -> ApiResult<ReconcileReport> {
        let cleaner = cleaner.map(|name| self.cleaners.get(name)).transpose()?;
        let job = TableToTableJob {
            source: source.to_string(),
            target: target.to_string(),
            report: report.to_string(),
            from: from.unwrap_or(0),
            chunk_size: self.chunk_size(chunk_size),
        };
        Ok(importer::table_to_table(
            self.store.as_ref(),
            &job,
            cleaner.as_deref(),
        )?)
    }

    /// CountModel
    pub fn count_model(&self, model: &str) -> ApiResult<i64> {
        Ok(importer::count_model(self.store.as_ref(), model)?)
    }

    /// CountModelWhere
    pub fn count_model_where(&self, model: &str, wheres: &Map<String, Value>) -> ApiResult<i64> {
        Ok(importer::count_model_where(self.store.as_ref(), model, wheres)?)
    }

    /// CountRows
    pub fn count_rows(&self, path: &str, sheet: &str) -> ApiResult<usize> {
        Ok(importer::count_rows(path, sheet)?)
    }

    /// GetID
    ///
    /// # 参数
    /// - field: 字段名，或字段名数组
    /// - value: 标量值，或字段 → 值对象
    pub fn get_id(&self, model: &str, field: &Value, value: &Value) -> ApiResult<Value> {
        Ok(importer::get_id(
            self.store.as_ref(),
            self.cache.as_ref(),
            model,
            field,
            value,
        )?)
    }

    /// PreviewMessage
    pub fn preview_message(&self, params: &PreviewParams) -> ApiResult<PreviewAction> {
        Ok(importer::preview_message(
            self.sink.as_ref(),
            &self.settings,
            params,
        )?)
    }
}
