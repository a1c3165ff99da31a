// ==========================================
// 智能体测试夹具 - 键值缓存
// ==========================================
// 职责: GetID 的读穿缓存存储
// ==========================================

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// 键值缓存接口
pub trait KvCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
}

/// 进程内缓存
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        // 缓存内容可丢弃，锁中毒时继续使用内部数据
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value);
    }
}
