// ==========================================
// Hook 夹具集成测试
// ==========================================
// 覆盖: AssistantRegistry 分发 → Hook → 端口（Process / MCP / Trace / Search / Space）
// 数据: 临时数据库中的角色表 __yao_role
// ==========================================

mod test_helpers;

use agent_fixtures::hooks::{
    Authorized, ClientInfo, Completion, Constraints, ContextInfo, HookReply, Message, NextPayload,
};
use agent_fixtures::repository::{ModelStore, SqliteModelStore};
use agent_fixtures::{AssistantRegistry, HookError};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use test_helpers::{agent_context, create_test_db, role_store, seed_roles};

fn create_messages(registry: &AssistantRegistry, assistant: &str, info: ContextInfo, content: &str) -> (Vec<Message>, Value) {
    let (ctx, _, _) = agent_context(info, role_store().unwrap());
    let reply = registry
        .create(assistant, &ctx, &[Message::user(content)])
        .unwrap()
        .into_option()
        .unwrap();
    (
        reply.messages.unwrap_or_default(),
        reply.metadata.map(Value::Object).unwrap_or(Value::Null),
    )
}

fn full_context() -> ContextInfo {
    let mut extra = Map::new();
    extra.insert("department".to_string(), json!("engineering"));
    ContextInfo {
        authorized: Some(Authorized {
            user_id: Some("test-user-123".to_string()),
            team_id: Some("test-team-456".to_string()),
            tenant_id: Some("test-tenant-789".to_string()),
            constraints: Some(Constraints {
                team_only: Some(true),
                extra: Some(extra),
            }),
        }),
        chat_id: Some("chat-test-create-hook".to_string()),
        assistant_id: Some("tests.create".to_string()),
        locale: Some("en-us".to_string()),
        theme: Some("light".to_string()),
        client: Some(ClientInfo {
            kind: Some("web".to_string()),
            user_agent: Some("TestAgent/1.0".to_string()),
            ip: Some("127.0.0.1".to_string()),
        }),
        referer: Some("api".to_string()),
        accept: Some("cui-web".to_string()),
    }
}

// ==========================================
// tests.create
// ==========================================

#[test]
fn test_create_return_process_reads_roles_from_db_file() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let store = SqliteModelStore::new(&db_path).unwrap();
    seed_roles(&store, &[("admin", "Administrator"), ("guest", "Guest"), ("ops", "Operator")]).unwrap();

    let registry = AssistantRegistry::builtin();
    let (ctx, _, _) = agent_context(ContextInfo::default(), Arc::new(store));
    let reply = registry
        .create("tests.create", &ctx, &[Message::user("return_process")])
        .unwrap()
        .into_option()
        .unwrap();

    let messages = reply.messages.unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].role, "system");
    assert_eq!(messages[1].text(), Some("Role: Administrator, ID: admin"));
    assert_eq!(messages[3].text(), Some("Role: Operator, ID: ops"));
    assert_eq!(reply.metadata.unwrap()["roles_count"], json!("3"));
}

#[test]
fn test_create_nested_script_calls() {
    let registry = AssistantRegistry::builtin();

    let (messages, metadata) = create_messages(&registry, "tests.create", ContextInfo::default(), "nested_script_call");
    assert_eq!(messages[1].text(), Some("Retrieved 2 roles through nested script call"));
    assert_eq!(metadata["roles_count"], json!("2"));

    let (_, metadata) = create_messages(&registry, "tests.create", ContextInfo::default(), "deep_nested_call");
    let nested = &metadata["nested_result"];
    assert_eq!(nested["depth"], json!(2));
    assert_eq!(nested["count"], json!(2));
    assert_eq!(nested["roles"].as_array().unwrap().len(), 2);
}

#[test]
fn test_create_process_without_role_table_is_error() {
    let registry = AssistantRegistry::builtin();
    let (ctx, _, _) = agent_context(ContextInfo::default(), Arc::new(SqliteModelStore::in_memory().unwrap()));

    let err = registry
        .create("tests.create", &ctx, &[Message::user("return_process")])
        .unwrap_err();
    assert!(matches!(err, HookError::Process { .. }));
}

#[test]
fn test_create_verify_context() {
    let registry = AssistantRegistry::builtin();

    let (messages, _) = create_messages(&registry, "tests.create", full_context(), "verify_context");
    assert_eq!(messages[0].text(), Some("success:all_fields_validated"));
    assert!(messages[1].text().unwrap().contains("chat_id:true"));

    let mut info = full_context();
    info.theme = None;
    let (messages, _) = create_messages(&registry, "tests.create", info, "verify_context");
    assert_eq!(messages[0].text(), Some("failure:validation_failed"));
    assert!(messages[1].text().unwrap().contains("theme:false:undefined"));
}

#[test]
fn test_create_no_override_serializes_as_null() {
    let registry = AssistantRegistry::builtin();
    let (ctx, _, _) = agent_context(ContextInfo::default(), role_store().unwrap());

    let reply = registry
        .create("tests.create", &ctx, &[Message::user("return_null")])
        .unwrap();
    assert_eq!(reply, HookReply::NoOverride);
    assert_eq!(reply.to_json().unwrap(), Value::Null);

    let reply = registry
        .create("tests.create", &ctx, &[Message::user("return_empty")])
        .unwrap();
    assert_eq!(reply.to_json().unwrap(), json!({}));
}

// ==========================================
// tests.realworld
// ==========================================

#[test]
fn test_realworld_full_workflow_traces_each_phase() {
    let registry = AssistantRegistry::builtin();
    let (ctx, tracer, _) = agent_context(ContextInfo::default(), role_store().unwrap());

    let reply = registry
        .create("tests.realworld", &ctx, &[Message::user("full_workflow")])
        .unwrap()
        .into_option()
        .unwrap();
    let metadata = reply.metadata.unwrap();
    assert_eq!(metadata["mcp_tools"], json!(3));
    assert_eq!(metadata["db_records"], json!(2));

    for label in ["Workflow Initialization", "MCP Operations", "Database Query", "MCP Tools"] {
        let record = tracer.find_by_label(label).unwrap();
        assert!(record.is_complete(), "{} 未完成", label);
    }
}

#[test]
fn test_realworld_database_failure_becomes_message() {
    let registry = AssistantRegistry::builtin();
    let store: Arc<dyn ModelStore> = Arc::new(SqliteModelStore::in_memory().unwrap());
    let (ctx, _, _) = agent_context(ContextInfo::default(), store);

    let reply = registry
        .create("tests.realworld", &ctx, &[Message::user("database_query")])
        .unwrap()
        .into_option()
        .unwrap();
    let messages = reply.messages.unwrap();
    assert!(messages[0].text().unwrap().starts_with("Database query error:"));
}

// ==========================================
// tests.realworld-next → tests.create 委派
// ==========================================

#[test]
fn test_realworld_next_delegates_to_create() {
    let registry = AssistantRegistry::builtin();
    let (ctx, _, _) = agent_context(ContextInfo::default(), role_store().unwrap());

    let payload = NextPayload {
        messages: vec![Message::user("scenario:delegate please")],
        completion: Some(Completion::text("I will transfer this request")),
        ..Default::default()
    };
    let reply = registry
        .next("tests.realworld-next", &ctx, &payload)
        .unwrap()
        .into_option()
        .unwrap();
    let delegate = reply.delegate.unwrap();
    assert_eq!(delegate.agent_id, "tests.create");

    // 委派目标收到的消息走默认分支原样返回
    let created = registry
        .create(&delegate.agent_id, &ctx, &delegate.messages)
        .unwrap()
        .into_option()
        .unwrap();
    assert_eq!(created.messages.unwrap(), delegate.messages);
}

#[test]
fn test_realworld_next_standard_does_not_override() {
    let registry = AssistantRegistry::builtin();
    let (ctx, _, _) = agent_context(ContextInfo::default(), role_store().unwrap());
    let payload = NextPayload {
        messages: vec![Message::user("scenario:standard")],
        completion: Some(Completion::text("fine")),
        ..Default::default()
    };
    let reply = registry.next("tests.realworld-next", &ctx, &payload).unwrap();
    assert_eq!(reply, HookReply::NoOverride);
}

// ==========================================
// 搜索 / 视觉 / 关键词
// ==========================================

#[test]
fn test_search_jsapi_race_returns_first_request() {
    let registry = AssistantRegistry::builtin();
    let (messages, _) = create_messages(&registry, "tests.search-jsapi", ContextInfo::default(), "test:race");
    let result: Value = serde_json::from_str(messages[0].text().unwrap()).unwrap();
    assert_eq!(result["query"], json!("machine learning"));
    assert_eq!(result["total"], json!(3));
    assert_eq!(result["source"], json!("hook"));
}

#[test]
fn test_vision_helper_reads_space() {
    let registry = AssistantRegistry::builtin();
    let info = ContextInfo {
        assistant_id: Some("tests.vision-helper".to_string()),
        ..Default::default()
    };
    let (ctx, _, space) = agent_context(info, role_store().unwrap());
    space.set("tests.vision-helper:files_info", json!([{"name": "chart.png"}]));

    let payload = NextPayload {
        completion: Some(Completion::text("A bar chart")),
        ..Default::default()
    };
    let reply = registry
        .next("tests.vision-helper", &ctx, &payload)
        .unwrap()
        .into_option()
        .unwrap();
    assert_eq!(reply.data, Some(json!("A bar chart")));
    let metadata = reply.metadata.unwrap();
    assert_eq!(metadata["files_count"], json!(1));
    assert_eq!(metadata["has_current_file"], json!(false));
}

#[test]
fn test_keyword_agent_matches_search_tool() {
    let registry = AssistantRegistry::builtin();
    let (ctx, _, _) = agent_context(ContextInfo::default(), role_store().unwrap());
    let content = "excel import pipeline excel preview import excel";

    let payload = NextPayload {
        messages: vec![Message::user(content)],
        ..Default::default()
    };
    let reply = registry
        .next("tests.keyword-agent", &ctx, &payload)
        .unwrap()
        .into_option()
        .unwrap();

    let tool = ctx
        .mcp
        .call_tool("search", "extract_keywords", json!({"content": content}))
        .unwrap();
    assert_eq!(reply.data.unwrap()["keywords"], tool["keywords"]);
    assert_eq!(tool["keywords"], json!(["excel", "import", "pipeline", "preview"]));
}
