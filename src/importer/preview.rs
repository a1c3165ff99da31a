// ==========================================
// 智能体测试夹具 - 导入预览
// ==========================================
// 职责: 预览数据落盘（内容寻址）+ 生成前端动作
// 指纹: sha256(按名称排序后的 JSON)，取前 32 位十六进制
// ==========================================

use crate::config::ImportSettings;
use crate::domain::{ActionProps, EmitEvent, PreviewAction, PreviewParams, TableData};
use crate::importer::error::{ImportError, ImportResult};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 指纹长度（十六进制字符数）
const FINGERPRINT_LEN: usize = 32;

// ==========================================
// FileSink Trait
// ==========================================
// 实现者: LocalFs
pub trait FileSink: Send + Sync {
    /// 写入文件（路径为数据根目录下的相对路径，可带前导 /）
    fn write_file(&self, path: &str, content: &[u8]) -> io::Result<()>;
}

/// 本地文件系统，所有路径挂在 root 之下
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 相对路径 → 绝对路径
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl FileSink for LocalFs {
    fn write_file(&self, path: &str, content: &[u8]) -> io::Result<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, content)
    }
}

/// 内容指纹
pub fn fingerprint(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(FINGERPRINT_LEN);
    hex
}

/// 同名数据集去重：后出现的内容覆盖前者，位置保持首次出现处
fn dedupe_tables(tables: &[TableData]) -> Vec<TableData> {
    let mut out: Vec<TableData> = Vec::with_capacity(tables.len());
    for table in tables {
        match out.iter_mut().find(|t| t.name == table.name) {
            Some(existing) => existing.data = table.data.clone(),
            None => out.push(table.clone()),
        }
    }
    out
}

/// makePreviewData: 写入预览文件并返回预览 ID（`table_{fingerprint}`）
///
/// 指纹与数据集顺序无关；文件内容保留原始顺序
pub fn make_preview_data(
    sink: &dyn FileSink,
    settings: &ImportSettings,
    tables: &[TableData],
) -> ImportResult<String> {
    let preview_data = dedupe_tables(tables);

    let mut sorted = preview_data.clone();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    let id = format!("table_{}", fingerprint(&serde_json::to_string(&sorted)?));

    let path = format!("{}/{}.json", settings.preview_dir.trim_end_matches('/'), id);
    let content = serde_json::to_vec(&preview_data)?;
    sink.write_file(&path, &content)
        .map_err(|e| ImportError::PreviewWriteError {
            path: path.clone(),
            message: e.to_string(),
        })?;

    debug!(path = %path, tables = preview_data.len(), "预览数据已写入");
    Ok(id)
}

/// PreviewMessage: 生成预览动作
///
/// - `update = true`: 通知已打开的预览面板刷新
/// - 否则: 打开侧边栏预览
pub fn preview_message(
    sink: &dyn FileSink,
    settings: &ImportSettings,
    params: &PreviewParams,
) -> ImportResult<PreviewAction> {
    let id = make_preview_data(sink, settings, &params.tables)?;

    if params.update {
        let event = EmitEvent::common(
            "Trigger Update Preview Table",
            "web/sendMessage",
            json!({
                "type": "update",
                "message": {"id": id, "title": params.title, "active": params.active, "once": 1}
            }),
        );
        return Ok(PreviewAction::new(ActionProps {
            action: vec![event],
            namespace: None,
            primary: None,
        }));
    }

    let url = format!(
        "{}?id={}&active={}&title={}&once=1&theme=__theme",
        settings.preview_url, id, params.active, params.title
    );
    info!(id = %id, "打开预览侧边栏");
    let event = EmitEvent::common(
        "OpenSidebar",
        "app/openSidebar",
        json!({"title": params.title, "url": url}),
    );
    Ok(PreviewAction::new(ActionProps {
        action: vec![event],
        namespace: Some(settings.preview_namespace.clone()),
        primary: Some("id".to_string()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemorySink {
        files: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl FileSink for MemorySink {
        fn write_file(&self, path: &str, content: &[u8]) -> io::Result<()> {
            self.files.lock().unwrap().push((path.to_string(), content.to_vec()));
            Ok(())
        }
    }

    struct FailingSink;

    impl FileSink for FailingSink {
        fn write_file(&self, _path: &str, _content: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    fn tables() -> Vec<TableData> {
        vec![
            TableData::new("success", vec![vec![json!("行号(Excel)"), json!("门店 (SHOP)")]]),
            TableData::new("error", vec![vec![json!(3), json!("金额为空")]]),
        ]
    }

    #[test]
    fn test_preview_id_ignores_table_order() {
        let sink = MemorySink::default();
        let settings = ImportSettings::default();
        let mut reversed = tables();
        reversed.reverse();

        let a = make_preview_data(&sink, &settings, &tables()).unwrap();
        let b = make_preview_data(&sink, &settings, &reversed).unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("table_"));
        assert_eq!(a.len(), "table_".len() + FINGERPRINT_LEN);

        let files = sink.files.lock().unwrap();
        assert_eq!(files[0].0, format!("/tables/temp/{}.json", a));
        // 文件内容保留原始顺序
        let written: Value = serde_json::from_slice(&files[1].1).unwrap();
        assert_eq!(written[0]["name"], json!("error"));
    }

    #[test]
    fn test_preview_id_changes_with_content() {
        let sink = MemorySink::default();
        let settings = ImportSettings::default();
        let mut changed = tables();
        changed[1].data[0][1] = json!("金额格式错误");

        let a = make_preview_data(&sink, &settings, &tables()).unwrap();
        let b = make_preview_data(&sink, &settings, &changed).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let deduped = dedupe_tables(&[
            TableData::new("a", vec![vec![json!(1)]]),
            TableData::new("b", vec![]),
            TableData::new("a", vec![vec![json!(2)]]),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].name, "a");
        assert_eq!(deduped[0].data, vec![vec![json!(2)]]);
    }

    #[test]
    fn test_open_sidebar_action() {
        let sink = MemorySink::default();
        let params = PreviewParams {
            tables: tables(),
            active: "success".to_string(),
            title: "导入预览".to_string(),
            update: false,
        };
        let action = preview_message(&sink, &ImportSettings::default(), &params).unwrap();
        assert_eq!(action.kind, "action");
        assert_eq!(action.props.namespace.as_deref(), Some("data-import"));
        assert_eq!(action.props.primary.as_deref(), Some("id"));

        let event = &action.props.action[0];
        assert_eq!(event.name, "OpenSidebar");
        assert_eq!(event.payload.key, "app/openSidebar");
        let url = event.payload.value["url"].as_str().unwrap();
        assert!(url.starts_with("/web/preview/table?id=table_"));
        assert!(url.ends_with("&active=success&title=导入预览&once=1&theme=__theme"));
    }

    #[test]
    fn test_update_action() {
        let sink = MemorySink::default();
        let params = PreviewParams {
            tables: tables(),
            active: "error".to_string(),
            title: "导入预览".to_string(),
            update: true,
        };
        let action = preview_message(&sink, &ImportSettings::default(), &params).unwrap();
        assert!(action.props.namespace.is_none());

        let event = &action.props.action[0];
        assert_eq!(event.payload.key, "web/sendMessage");
        assert_eq!(event.payload.value["type"], json!("update"));
        assert_eq!(event.payload.value["message"]["once"], json!(1));
        assert_eq!(event.payload.value["message"]["active"], json!("error"));
    }

    #[test]
    fn test_write_failure_is_fatal() {
        let err = make_preview_data(&FailingSink, &ImportSettings::default(), &tables()).unwrap_err();
        assert!(matches!(err, ImportError::PreviewWriteError { .. }));
    }

    #[test]
    fn test_local_fs_writes_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LocalFs::new(dir.path());
        sink.write_file("/tables/temp/x.json", b"[]").unwrap();
        assert_eq!(fs::read(sink.resolve("/tables/temp/x.json")).unwrap(), b"[]");
    }
}
