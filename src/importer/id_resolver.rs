// ==========================================
// 智能体测试夹具 - 按字段值查找主键（GetID）
// ==========================================
// 形式: 单字段 + 标量值 / 多字段 + 值对象
// 缓存: 读穿缓存，仅缓存命中的主键；未命中不缓存
// ==========================================

use crate::domain::{model_table_name, Where, ID_FIELD};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::preview::fingerprint;
use crate::repository::{KvCache, ModelStore};
use serde_json::{Map, Value};
use tracing::debug;

/// 查找条件
#[derive(Debug, Clone, PartialEq)]
pub enum IdLookup {
    /// 单字段等值
    Single { field: String, value: Value },
    /// 多字段等值（缺失字段按 null 匹配）
    Composite {
        fields: Vec<String>,
        values: Map<String, Value>,
    },
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) | Value::Object(_) => "object",
    }
}

impl IdLookup {
    /// 解析 field / value 参数
    ///
    /// # 返回
    /// - Ok(None): value 为 null，直接返回 null
    pub fn parse(field: &Value, value: &Value) -> ImportResult<Option<Self>> {
        if value.is_null() {
            return Ok(None);
        }

        match (field, value) {
            (Value::String(field), Value::String(_) | Value::Number(_)) => Ok(Some(IdLookup::Single {
                field: field.clone(),
                value: value.clone(),
            })),
            (Value::Array(fields), Value::Object(values)) => {
                let fields = fields
                    .iter()
                    .map(|f| {
                        f.as_str().map(str::to_string).ok_or_else(|| ImportError::FieldValueMismatch {
                            field: type_name(f).to_string(),
                            value: "object".to_string(),
                        })
                    })
                    .collect::<ImportResult<Vec<_>>>()?;
                Ok(Some(IdLookup::Composite {
                    fields,
                    values: values.clone(),
                }))
            }
            _ => Err(ImportError::FieldValueMismatch {
                field: type_name(field).to_string(),
                value: type_name(value).to_string(),
            }),
        }
    }

    /// 缓存键
    pub fn cache_key(&self, model: &str) -> ImportResult<String> {
        Ok(match self {
            IdLookup::Single { field, value } => {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                format!("getid_{}_{}_{}", model, field, value)
            }
            IdLookup::Composite { fields, values } => {
                let value_key = fingerprint(&serde_json::to_string(values)?);
                format!("getid_{}_{}_{}", model, fields.join(","), value_key)
            }
        })
    }

    fn select(&self) -> Vec<&str> {
        let mut select = vec![ID_FIELD];
        match self {
            IdLookup::Single { field, .. } => select.push(field.as_str()),
            IdLookup::Composite { fields, .. } => select.extend(fields.iter().map(String::as_str)),
        }
        select
    }

    fn wheres(&self) -> Vec<Where> {
        match self {
            IdLookup::Single { field, value } => vec![Where::eq(field.clone(), value.clone())],
            IdLookup::Composite { fields, values } => fields
                .iter()
                .map(|f| Where::eq(f.clone(), values.get(f).cloned().unwrap_or(Value::Null)))
                .collect(),
        }
    }
}

/// GetID: 返回首个匹配行的主键，无匹配时返回 null
pub fn get_id(
    store: &dyn ModelStore,
    cache: &dyn KvCache,
    model: &str,
    field: &Value,
    value: &Value,
) -> ImportResult<Value> {
    let Some(lookup) = IdLookup::parse(field, value)? else {
        return Ok(Value::Null);
    };

    let key = lookup.cache_key(model)?;
    if let Some(cached) = cache.get(&key).filter(|v| !v.is_null()) {
        debug!(key = %key, "GetID 命中缓存");
        return Ok(cached);
    }

    let row = store.find_first(&model_table_name(model), &lookup.select(), &lookup.wheres())?;
    let id = row
        .and_then(|r| r.get(ID_FIELD).cloned())
        .unwrap_or(Value::Null);
    if !id.is_null() {
        cache.set(&key, id.clone());
    }
    Ok(id)
}
