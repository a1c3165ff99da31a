// ==========================================
// 智能体测试夹具 - 内存追踪器
// ==========================================
// 职责: 记录 Hook 创建的追踪节点，供测试断言
// ==========================================

use crate::hooks::error::HookResult;
use crate::hooks::ports::{TraceNode, TraceOptions, Tracer};
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// 节点日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Info,
    Debug,
}

/// 节点快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRecord {
    pub id: String,
    pub parent_id: Option<String>,
    pub label: Option<String>,
    pub input: Value,
    pub logs: Vec<(TraceLevel, String)>,
    pub output: Option<Value>,
}

impl TraceRecord {
    pub fn is_complete(&self) -> bool {
        self.output.is_some()
    }
}

type Records = Arc<Mutex<Vec<TraceRecord>>>;

fn push_node(records: &Records, parent_id: Option<String>, input: Value, options: TraceOptions) -> Arc<dyn TraceNode> {
    let id = Uuid::new_v4().to_string();
    debug!(id = %id, parent = ?parent_id, label = ?options.label, "新建追踪节点");

    let mut guard = records.lock().unwrap_or_else(|e| e.into_inner());
    guard.push(TraceRecord {
        id: id.clone(),
        parent_id,
        label: options.label,
        input,
        logs: Vec::new(),
        output: None,
    });

    Arc::new(MemoryTraceNode {
        id,
        records: Arc::clone(records),
    })
}

/// 内存追踪器
#[derive(Default, Clone)]
pub struct MemoryTracer {
    records: Records,
}

impl MemoryTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有节点（按创建顺序）
    pub fn records(&self) -> Vec<TraceRecord> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn find_by_label(&self, label: &str) -> Option<TraceRecord> {
        self.records()
            .into_iter()
            .find(|r| r.label.as_deref() == Some(label))
    }

    pub fn children_of(&self, id: &str) -> Vec<TraceRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.parent_id.as_deref() == Some(id))
            .collect()
    }
}

impl Tracer for MemoryTracer {
    fn add(&self, input: Value, options: TraceOptions) -> HookResult<Arc<dyn TraceNode>> {
        Ok(push_node(&self.records, None, input, options))
    }
}

struct MemoryTraceNode {
    id: String,
    records: Records,
}

impl MemoryTraceNode {
    fn update(&self, f: impl FnOnce(&mut TraceRecord)) {
        let mut guard = self.records.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(record) = guard.iter_mut().find(|r| r.id == self.id) {
            f(record);
        }
    }
}

impl TraceNode for MemoryTraceNode {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn info(&self, message: &str) {
        self.update(|r| r.logs.push((TraceLevel::Info, message.to_string())));
    }

    fn debug(&self, message: &str) {
        self.update(|r| r.logs.push((TraceLevel::Debug, message.to_string())));
    }

    fn complete(&self, output: Value) {
        self.update(|r| r.output = Some(output));
    }

    fn add(&self, input: Value, options: TraceOptions) -> HookResult<Arc<dyn TraceNode>> {
        Ok(push_node(&self.records, Some(self.id.clone()), input, options))
    }
}
