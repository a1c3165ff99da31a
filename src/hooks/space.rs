// ==========================================
// 智能体测试夹具 - 内存会话空间
// ==========================================

use crate::hooks::error::HookResult;
use crate::hooks::ports::Space;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemorySpace {
    values: Mutex<HashMap<String, Value>>,
}

impl MemorySpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.into(), value);
    }
}

impl Space for MemorySpace {
    fn get(&self, key: &str) -> HookResult<Option<Value>> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }
}
