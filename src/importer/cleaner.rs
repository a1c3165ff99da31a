// ==========================================
// 智能体测试夹具 - 行清洗函数
// ==========================================
// 约定: 清洗函数返回 {code, data} 或 {code, message}
//   - code 存在且不为 200 → 拒绝（message 缺省为空串）
//   - data 为对象       → 接受
//   - 其它形状          → 致命错误
// ==========================================

use crate::domain::{Row, CLEAN_OK_CODE};
use crate::importer::error::{ImportError, ImportResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// 行清洗函数
pub trait RowCleaner: Send + Sync {
    fn clean(&self, row: &Row) -> Value;
}

impl<F> RowCleaner for F
where
    F: Fn(&Row) -> Value + Send + Sync,
{
    fn clean(&self, row: &Row) -> Value {
        self(row)
    }
}

/// 清洗结果分类
#[derive(Debug, Clone, PartialEq)]
pub enum CleanOutcome {
    Accepted(Row),
    Rejected(String),
}

impl CleanOutcome {
    /// 按返回形状分类
    pub fn classify(result: Value) -> ImportResult<Self> {
        let code = result.get("code").filter(|c| !is_falsy(c)).cloned();
        if let Some(code) = code {
            if code.as_f64() != Some(CLEAN_OK_CODE as f64) {
                let message = result
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                return Ok(CleanOutcome::Rejected(message));
            }
        }

        match result {
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Object(data)) => Ok(CleanOutcome::Accepted(data)),
                other => {
                    if let Some(data) = other {
                        map.insert("data".to_string(), data);
                    }
                    Err(ImportError::InvalidCleanResult(Value::Object(map).to_string()))
                }
            },
            other => Err(ImportError::InvalidCleanResult(other.to_string())),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// 命名清洗函数注册表
#[derive(Default, Clone)]
pub struct CleanerRegistry {
    cleaners: HashMap<String, Arc<dyn RowCleaner>>,
}

impl CleanerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, cleaner: impl RowCleaner + 'static) {
        self.cleaners.insert(name.into(), Arc::new(cleaner));
    }

    pub fn get(&self, name: &str) -> ImportResult<Arc<dyn RowCleaner>> {
        self.cleaners
            .get(name)
            .cloned()
            .ok_or_else(|| ImportError::CleanerNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cleaners.contains_key(name)
    }
}
