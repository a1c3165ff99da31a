// ==========================================
// 智能体测试夹具 - 工具参数读取
// ==========================================
// 约定: 参数对象中缺失、null、false、0、"" 一律视为未提供
// ==========================================

use crate::tools::error::{ToolError, ToolResult};
use serde_json::Value;

/// 取出“有值”的参数
pub fn provided<'a>(args: &'a Value, name: &str) -> Option<&'a Value> {
    args.get(name).filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    })
}

/// 必填字符串参数
pub fn required_str<'a>(args: &'a Value, name: &str) -> ToolResult<&'a str> {
    match provided(args, name) {
        None => Err(ToolError::MissingArgument(name.to_string())),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(ToolError::invalid(name, "expected a string")),
    }
}

/// 可选字符串参数
pub fn str_or<'a>(args: &'a Value, name: &str, default: &'a str) -> &'a str {
    provided(args, name).and_then(Value::as_str).unwrap_or(default)
}

/// 可选正整数参数
pub fn usize_or(args: &Value, name: &str, default: usize) -> usize {
    provided(args, name)
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .unwrap_or(default)
}

/// 可选布尔参数
pub fn flag(args: &Value, name: &str) -> bool {
    provided(args, name).is_some()
}

/// 可选字符串数组参数
pub fn str_list(args: &Value, name: &str) -> Vec<String> {
    provided(args, name)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
