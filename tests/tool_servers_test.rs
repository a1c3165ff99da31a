// ==========================================
// 模拟工具服务集成测试
// ==========================================
// 覆盖: 通过 McpClient 端口调用 echo / mcpload / search
//       确定性字段只依赖输入
// ==========================================

mod test_helpers;

use agent_fixtures::hooks::{ContextInfo, HookError, McpClient};
use agent_fixtures::tools::{ECHO_SERVER, MCPLOAD_SERVER, SEARCH_SERVER};
use agent_fixtures::{ToolError, ToolRegistry};
use serde_json::{json, Value};

/// 去掉随机/时间字段后的搜索结果
fn deterministic(mut result: Value) -> Value {
    if let Some(obj) = result.as_object_mut() {
        obj.remove("duration_ms");
    }
    if let Some(items) = result.get_mut("items").and_then(Value::as_array_mut) {
        for item in items {
            if let Some(obj) = item.as_object_mut() {
                obj.remove("published_at");
            }
        }
    }
    result
}

#[test]
fn test_servers_and_tool_schemas() {
    let registry = ToolRegistry::new();
    assert_eq!(registry.servers(), [ECHO_SERVER, MCPLOAD_SERVER, SEARCH_SERVER]);

    for server in registry.servers() {
        let list = registry.list_tools(server, "").unwrap();
        assert!(list.next_cursor.is_none());
        for tool in &list.tools {
            let schema = serde_json::to_value(tool).unwrap();
            assert_eq!(schema["inputSchema"]["type"], json!("object"), "{}.{}", server, tool.name);
        }
    }

    let names: Vec<String> = registry
        .tools(SEARCH_SERVER)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(
        names,
        vec!["web_search", "news_search", "extract_keywords", "generate_query_dsl", "rerank"]
    );
}

#[test]
fn test_search_tools_are_pure_in_deterministic_fields() {
    let registry = ToolRegistry::new();
    let args = json!({"query": "Yao App Engine", "limit": 4, "sites": ["yaoapps.com"]});

    let first = registry.call(SEARCH_SERVER, "web_search", &args).unwrap();
    let second = registry.call(SEARCH_SERVER, "web_search", &args).unwrap();
    assert_eq!(deterministic(first.clone()), deterministic(second));
    assert_eq!(first["items"][0]["url"], json!("https://yaoapps.com/article/yao-app-engine-1"));
    assert_eq!(first["items"][3]["score"], json!(0.85));

    let news_args = json!({"query": "rust release"});
    let first = registry.call(SEARCH_SERVER, "news_search", &news_args).unwrap();
    let second = registry.call(SEARCH_SERVER, "news_search", &news_args).unwrap();
    assert_eq!(deterministic(first.clone()), deterministic(second));
    assert_eq!(first["metadata"]["time_range"], json!("week"));
    assert_eq!(first["total"], json!(10));
}

#[test]
fn test_keywords_and_rerank() {
    let registry = ToolRegistry::new();

    let result = registry
        .call(
            SEARCH_SERVER,
            "extract_keywords",
            &json!({"content": "Rust ownership and rust borrowing make rust safe", "max_keywords": 2}),
        )
        .unwrap();
    assert_eq!(result["keywords"], json!(["rust", "ownership"]));

    let result = registry
        .call(
            SEARCH_SERVER,
            "rerank",
            &json!({"query": "q", "items": [{"citation_id": "a"}, {"citation_id": "b"}, {"citation_id": "c"}]}),
        )
        .unwrap();
    assert_eq!(result["order"], json!(["c", "b", "a"]));
    assert_eq!(result["returned"], json!(3));
}

#[test]
fn test_mcpload_calculate_through_port() {
    let registry = ToolRegistry::new();
    let client: &dyn McpClient = &registry;

    let result = client
        .call_tool(MCPLOAD_SERVER, "calculate", json!({"operation": "multiply", "a": 6, "b": 7}))
        .unwrap();
    assert_eq!(result["result"], json!(42));
    assert_eq!(result["message"], json!("6 multiply 7 = 42"));

    let result = client
        .call_tool(MCPLOAD_SERVER, "calculate", json!({"operation": "divide", "a": 1, "b": 0}))
        .unwrap();
    assert_eq!(result, json!({"error": "Cannot divide by zero"}));

    let err = client
        .call_tool(MCPLOAD_SERVER, "ping", json!({}))
        .unwrap_err();
    assert!(matches!(err, HookError::Tool(ToolError::MissingArgument(_))));
}

#[test]
fn test_echo_reflects_registry_context() {
    let info = ContextInfo {
        chat_id: Some("chat-42".to_string()),
        locale: Some("zh-cn".to_string()),
        ..Default::default()
    };
    let registry = ToolRegistry::new().with_context(info);

    let result = registry
        .call(ECHO_SERVER, "echo", &json!({"message": "héllo", "uppercase": true}))
        .unwrap();
    assert_eq!(result["echo"], json!("HÉLLO"));
    assert_eq!(result["length"], json!(5));
    assert_eq!(result["context"]["chat_id"], json!("chat-42"));
    assert_eq!(result["context"]["locale"], json!("zh-cn"));

    let plain = ToolRegistry::new()
        .call(ECHO_SERVER, "echo", &json!({"message": "hi"}))
        .unwrap();
    assert_eq!(plain["context"], json!({"has_context": false}));
}

#[test]
fn test_resources_and_unknown_targets() {
    let registry = ToolRegistry::new();

    let health = registry
        .read_resource(ECHO_SERVER, "health", &json!({"check": "all"}))
        .unwrap();
    assert_eq!(health["checks"]["disk"], json!("ok"));
    let config = registry.read_resource(SEARCH_SERVER, "get_config", &json!({})).unwrap();
    assert_eq!(config["default_limit"], json!(10));

    assert!(matches!(
        registry.call("weather", "forecast", &json!({})),
        Err(ToolError::UnknownServer(_))
    ));
    assert!(matches!(
        registry.call(ECHO_SERVER, "shout", &json!({})),
        Err(ToolError::UnknownTool { .. })
    ));
    assert!(matches!(
        registry.read_resource(MCPLOAD_SERVER, "info", &json!({})),
        Err(ToolError::UnknownResource { .. })
    ));
}
