// ==========================================
// 智能体测试夹具 - mcpload 测试服务
// ==========================================
// 工具: hello / ping / calculate
// ==========================================

use crate::tools::args::{required_str, str_or};
use crate::tools::error::{ToolError, ToolResult};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Number, Value};

/// hello: 问候语
pub fn hello(args: &Value) -> ToolResult<Value> {
    let name = str_or(args, "name", "World");
    Ok(Value::String(format!(
        "Hello, {}! This is a test from the mcpload assistant.",
        name
    )))
}

/// ping: 回显消息
pub fn ping(args: &Value) -> ToolResult<Value> {
    let message = required_str(args, "message")?;
    Ok(json!({
        "message": message,
        "echo": format!("Pong: {}", message),
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

fn operand(args: &Value, name: &str) -> ToolResult<f64> {
    match args.get(name) {
        None | Some(Value::Null) => Err(ToolError::MissingArgument(name.to_string())),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| ToolError::invalid(name, "expected a number")),
    }
}

/// 整数结果按整数输出
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// calculate: 四则运算；除零与未知运算返回 `{error}`
pub fn calculate(args: &Value) -> ToolResult<Value> {
    let operation = args.get("operation").and_then(Value::as_str).unwrap_or("");
    let a = operand(args, "a")?;
    let b = operand(args, "b")?;

    let result = match operation {
        "add" => a + b,
        "subtract" => a - b,
        "multiply" => a * b,
        "divide" => {
            if b == 0.0 {
                return Ok(json!({"error": "Cannot divide by zero"}));
            }
            a / b
        }
        other => return Ok(json!({"error": format!("Unknown operation: {}", other)})),
    };

    let (a, b, result) = (number_value(a), number_value(b), number_value(result));
    Ok(json!({
        "operation": operation,
        "a": a,
        "b": b,
        "result": result,
        "message": format!("{} {} {} = {}", a, operation, b, result),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello() {
        assert_eq!(
            hello(&json!({})).unwrap(),
            json!("Hello, World! This is a test from the mcpload assistant.")
        );
        assert_eq!(
            hello(&json!({"name": "Yao"})).unwrap(),
            json!("Hello, Yao! This is a test from the mcpload assistant.")
        );
    }

    #[test]
    fn test_ping_requires_message() {
        assert!(ping(&json!({})).is_err());
        assert_eq!(ping(&json!({"message": "hi"})).unwrap()["echo"], json!("Pong: hi"));
    }

    #[test]
    fn test_calculate() {
        let result = calculate(&json!({"operation": "add", "a": 1, "b": 2})).unwrap();
        assert_eq!(result["result"], json!(3));
        assert_eq!(result["message"], json!("1 add 2 = 3"));

        let result = calculate(&json!({"operation": "divide", "a": 1, "b": 4})).unwrap();
        assert_eq!(result["result"], json!(0.25));

        let result = calculate(&json!({"operation": "divide", "a": 1, "b": 0})).unwrap();
        assert_eq!(result, json!({"error": "Cannot divide by zero"}));

        let result = calculate(&json!({"operation": "pow", "a": 1, "b": 2})).unwrap();
        assert_eq!(result, json!({"error": "Unknown operation: pow"}));
    }

    #[test]
    fn test_calculate_missing_operand() {
        let err = calculate(&json!({"operation": "add", "a": 1})).unwrap_err();
        assert_eq!(err, ToolError::MissingArgument("b".to_string()));
    }
}
