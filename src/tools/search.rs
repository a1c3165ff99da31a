// ==========================================
// 智能体测试夹具 - search 测试服务
// ==========================================
// 工具: web_search / news_search / extract_keywords
//       generate_query_dsl / rerank
// 资源: get_config
// ==========================================

use crate::tools::args::{provided, required_str, str_list, str_or, usize_or};
use crate::tools::error::ToolResult;
use crate::tools::keywords::{extract_keywords as extract, DEFAULT_MAX_KEYWORDS};
use crate::tools::mock_results::{generate_mock_results, ResultKind};
use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde_json::{json, Value};

/// 默认结果条数
pub const DEFAULT_LIMIT: usize = 10;

/// QueryDSL 默认 limit
pub const DEFAULT_DSL_LIMIT: usize = 20;

/// web_search: 模拟网页搜索
pub fn web_search(args: &Value) -> ToolResult<Value> {
    let query = required_str(args, "query")?;
    let limit = usize_or(args, "limit", DEFAULT_LIMIT);
    let sites = str_list(args, "sites");
    let time_range = str_or(args, "time_range", "");

    let items = generate_mock_results(query, limit, &sites, ResultKind::Web);
    Ok(json!({
        "type": "web",
        "query": query,
        "total": items.len(),
        "duration_ms": rand::thread_rng().gen_range(100..600),
        "items": items,
        "metadata": {
            "provider": "mcp:search.web_search",
            "time_range": time_range,
            "sites": sites,
        },
    }))
}

/// news_search: 模拟新闻搜索（time_range 默认 week）
pub fn news_search(args: &Value) -> ToolResult<Value> {
    let query = required_str(args, "query")?;
    let limit = usize_or(args, "limit", DEFAULT_LIMIT);
    let time_range = str_or(args, "time_range", "week");

    let items = generate_mock_results(query, limit, &[], ResultKind::News);
    Ok(json!({
        "type": "news",
        "query": query,
        "total": items.len(),
        "duration_ms": rand::thread_rng().gen_range(50..350),
        "items": items,
        "metadata": {
            "provider": "mcp:search.news_search",
            "time_range": time_range,
        },
    }))
}

/// extract_keywords: 词频关键词
pub fn extract_keywords(args: &Value) -> ToolResult<Value> {
    let content = required_str(args, "content")?;
    let max_keywords = usize_or(args, "max_keywords", DEFAULT_MAX_KEYWORDS);
    let language = str_or(args, "language", "auto");

    Ok(json!({
        "keywords": extract(content, max_keywords),
        "metadata": {
            "provider": "mcp:search.extract_keywords",
            "language": language,
            "input_length": content.chars().count(),
        },
    }))
}

/// 资源 get_config: 模拟搜索配置
pub fn get_config() -> Value {
    json!({
        "provider": "mock",
        "version": "1.0.0",
        "supported_types": ["web", "news"],
        "max_results": 100,
        "default_limit": DEFAULT_LIMIT,
        "time_ranges": ["hour", "day", "week", "month", "year"],
        "features": {
            "site_restriction": true,
            "time_range": true,
            "safe_search": false,
        },
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// generate_query_dsl: 固定结构的 QueryDSL（不含 from）
pub fn generate_query_dsl(args: &Value) -> ToolResult<Value> {
    let query = str_or(args, "query", "");
    let limit = usize_or(args, "limit", DEFAULT_DSL_LIMIT);

    Ok(json!({
        "dsl": {
            "select": ["id", "name", "status"],
            "wheres": [{"field": "status", "op": "=", "value": "active"}],
            "orders": [{"field": "created_at", "sort": "desc"}],
            "limit": limit,
        },
        "explain": format!("Mock QueryDSL for: \"{}\"", query),
        "warnings": [],
    }))
}

/// 倒序 + 截断，返回 citation_id 列表
pub fn rerank_order(items: &[Value], top_n: Option<usize>) -> Vec<Value> {
    let top_n = top_n.unwrap_or(items.len());
    items
        .iter()
        .rev()
        .take(top_n)
        .map(|item| item.get("citation_id").cloned().unwrap_or(Value::Null))
        .collect()
}

/// rerank: 模拟语义重排
pub fn rerank(args: &Value) -> ToolResult<Value> {
    let query = required_str(args, "query")?;
    let Some(items) = args.get("items").and_then(Value::as_array) else {
        return Ok(json!({"order": []}));
    };

    let top_n = provided(args, "top_n").and_then(Value::as_u64).map(|n| n as usize);
    let order = rerank_order(items, top_n);
    Ok(json!({
        "order": order,
        "query": query,
        "total": items.len(),
        "returned": order.len(),
    }))
}
