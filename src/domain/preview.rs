// ==========================================
// 智能体测试夹具 - 预览消息
// ==========================================
// 职责: 预览数据集与前端动作描述
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 命名表格数据集
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub name: String,
    pub data: Vec<Vec<Value>>,
}

impl TableData {
    pub fn new(name: impl Into<String>, data: Vec<Vec<Value>>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// PreviewMessage 参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewParams {
    pub tables: Vec<TableData>,
    pub active: String,
    pub title: String,
    #[serde(default)]
    pub update: bool,
}

/// 前端动作: `{type: "action", props}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub props: ActionProps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionProps {
    pub action: Vec<EmitEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
}

/// `Common.emitEvent` 事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmitEvent {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: EventPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    pub key: String,
    pub value: Value,
}

impl EmitEvent {
    pub fn common(name: impl Into<String>, key: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            kind: "Common.emitEvent".to_string(),
            payload: EventPayload {
                key: key.into(),
                value,
            },
        }
    }
}

impl PreviewAction {
    pub fn new(props: ActionProps) -> Self {
        Self {
            kind: "action".to_string(),
            props,
        }
    }
}
