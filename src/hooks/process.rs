// ==========================================
// 智能体测试夹具 - Process 调用器
// ==========================================
// 支持:
// - models.<model>.Get: 查询模型表（模型 ID 中的 '.' 映射为 '_'）
// - 已注册的脚本（脚本可再次调用 Process）
// ==========================================

use crate::domain::{model_table_name, Row, Where};
use crate::hooks::error::{HookError, HookResult};
use crate::hooks::ports::ProcessRunner;
use crate::repository::ModelStore;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const MODEL_PREFIX: &str = "models.";
const GET_SUFFIX: &str = ".Get";

/// 脚本函数: 接收调用器本身以支持嵌套调用
pub type ScriptFn = Arc<dyn Fn(&dyn ProcessRunner, &[Value]) -> HookResult<Value> + Send + Sync>;

/// Get 查询参数 `{select, wheres:[{column, value}], limit}`
#[derive(Debug, Default, PartialEq)]
struct QueryParam {
    select: Vec<String>,
    wheres: Vec<Where>,
    limit: Option<usize>,
}

impl QueryParam {
    fn parse(name: &str, arg: Option<&Value>) -> HookResult<Self> {
        let Some(arg) = arg.filter(|v| !v.is_null()) else {
            return Ok(Self::default());
        };
        let Some(obj) = arg.as_object() else {
            return Err(HookError::Process {
                name: name.to_string(),
                message: format!("查询参数必须为对象: {}", arg),
            });
        };

        let select = obj
            .get("select")
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();

        let mut wheres = Vec::new();
        for w in obj.get("wheres").and_then(Value::as_array).into_iter().flatten() {
            let column = w.get("column").and_then(Value::as_str).ok_or_else(|| HookError::Process {
                name: name.to_string(),
                message: format!("查询条件缺少 column: {}", w),
            })?;
            wheres.push(Where::eq(column, w.get("value").cloned().unwrap_or(Value::Null)));
        }

        let limit = obj.get("limit").and_then(Value::as_u64).map(|n| n as usize);
        Ok(Self { select, wheres, limit })
    }
}

/// 基于 ModelStore 的 Process 调用器
pub struct StoreProcessRunner {
    store: Arc<dyn ModelStore>,
    scripts: HashMap<String, ScriptFn>,
}

impl StoreProcessRunner {
    pub fn new(store: Arc<dyn ModelStore>) -> Self {
        Self {
            store,
            scripts: HashMap::new(),
        }
    }

    /// 注册脚本
    pub fn register_script<F>(&mut self, name: impl Into<String>, script: F)
    where
        F: Fn(&dyn ProcessRunner, &[Value]) -> HookResult<Value> + Send + Sync + 'static,
    {
        self.scripts.insert(name.into(), Arc::new(script));
    }

    /// 注册 tests.create 使用的脚本
    ///
    /// - GetRoles: 查询 `__yao.role`
    /// - NestedCall: 调用 GetRoles 并汇总
    pub fn with_test_scripts(mut self) -> Self {
        self.register_script("scripts.tests.create.GetRoles", |process, _args| {
            process.call("models.__yao.role.Get", &[json!({})])
        });
        self.register_script("scripts.tests.create.NestedCall", |process, _args| {
            let roles = process.call("scripts.tests.create.GetRoles", &[])?;
            let count = roles.as_array().map(Vec::len).unwrap_or(0);
            Ok(json!({"roles": roles, "count": count, "depth": 2}))
        });
        self
    }

    fn model_get(&self, name: &str, model_id: &str, args: &[Value]) -> HookResult<Value> {
        let param = QueryParam::parse(name, args.first())?;
        let table = model_table_name(model_id);
        let select: Vec<&str> = param.select.iter().map(String::as_str).collect();

        let rows: Vec<Row> = self
            .store
            .find(&table, &select, &param.wheres, param.limit)
            .map_err(|e| HookError::Process {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        debug!(process = %name, table = %table, rows = rows.len(), "模型查询完成");
        Ok(Value::Array(rows.into_iter().map(Value::Object).collect()))
    }
}

impl ProcessRunner for StoreProcessRunner {
    fn call(&self, name: &str, args: &[Value]) -> HookResult<Value> {
        if let Some(script) = self.scripts.get(name) {
            debug!(process = %name, "执行脚本");
            return script(self, args);
        }

        if let Some(model_id) = name
            .strip_prefix(MODEL_PREFIX)
            .and_then(|rest| rest.strip_suffix(GET_SUFFIX))
        {
            return self.model_get(name, model_id, args);
        }

        Err(HookError::ProcessNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ColumnKind, ModelColumn, ModelSchema};
    use crate::repository::SqliteModelStore;

    fn store_with_roles() -> Arc<dyn ModelStore> {
        let store = SqliteModelStore::in_memory().unwrap();
        store
            .register(&ModelSchema::new(
                "__yao_role",
                vec![
                    ModelColumn::new("id", "ID", ColumnKind::Text),
                    ModelColumn::new("name", "名称", ColumnKind::Text),
                ],
            ))
            .unwrap();
        for (id, name) in [("admin", "Administrator"), ("guest", "Guest")] {
            let mut row = Row::new();
            row.insert("id".to_string(), json!(id));
            row.insert("name".to_string(), json!(name));
            store.create("__yao_role", &row).unwrap();
        }
        Arc::new(store)
    }

    #[test]
    fn test_model_get() {
        let runner = StoreProcessRunner::new(store_with_roles());
        let roles = runner.call("models.__yao.role.Get", &[json!({})]).unwrap();
        assert_eq!(roles.as_array().unwrap().len(), 2);

        let filtered = runner
            .call(
                "models.__yao.role.Get",
                &[json!({"select": ["name"], "wheres": [{"column": "id", "value": "guest"}]})],
            )
            .unwrap();
        assert_eq!(filtered, json!([{"name": "Guest"}]));
    }

    #[test]
    fn test_nested_scripts() {
        let runner = StoreProcessRunner::new(store_with_roles()).with_test_scripts();
        let roles = runner.call("scripts.tests.create.GetRoles", &[]).unwrap();
        assert_eq!(roles.as_array().unwrap().len(), 2);

        let nested = runner.call("scripts.tests.create.NestedCall", &[]).unwrap();
        assert_eq!(nested["count"], json!(2));
    }

    #[test]
    fn test_unknown_process_and_missing_model() {
        let runner = StoreProcessRunner::new(store_with_roles());
        assert!(matches!(
            runner.call("scripts.unknown", &[]),
            Err(HookError::ProcessNotFound(_))
        ));
        assert!(matches!(
            runner.call("models.missing.Get", &[]),
            Err(HookError::Process { .. })
        ));
    }
}
