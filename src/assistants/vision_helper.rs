// ==========================================
// 智能体测试夹具 - tests.vision-helper (Next)
// ==========================================
// 原样返回模型输出，并附带 Space 中的文件元数据
// Space 键: `{assistant_id}:files_info` / `{assistant_id}:current_file`
// ==========================================

use crate::hooks::{AgentContext, HookReply, HookResult, NextHook, NextPayload, NextResponse};
use serde_json::{json, Value};
use tracing::{debug, warn};

const NO_ANALYSIS: &str = "Unable to analyze the image.";

#[derive(Debug, Default, Clone, Copy)]
pub struct VisionHelper;

/// 读取文件元数据（无 Space 或无助手 ID 时为 None）
fn file_metadata(ctx: &AgentContext) -> Option<Value> {
    let space = ctx.space.as_ref()?;
    let assistant_id = ctx.info.assistant_id.as_deref().filter(|id| !id.is_empty())?;

    let read = |suffix: &str| space.get(&format!("{}:{}", assistant_id, suffix));
    let (files_info, current_file) = match (read("files_info"), read("current_file")) {
        (Ok(files), Ok(current)) => (files.unwrap_or(Value::Null), current.unwrap_or(Value::Null)),
        (Err(e), _) | (_, Err(e)) => {
            warn!(assistant = %assistant_id, error = %e, "读取 Space 文件信息失败");
            return None;
        }
    };

    let files_count = files_info.as_array().map(Vec::len);
    let metadata = json!({
        "assistant_id": assistant_id,
        "has_files_info": files_count.is_some(),
        "files_count": files_count.unwrap_or(0),
        "has_current_file": !current_file.is_null(),
        "files_info": files_info,
        "current_file": current_file,
    });
    debug!(metadata = %metadata, "文件元数据");
    Some(metadata)
}

impl NextHook for VisionHelper {
    fn next(&self, ctx: &AgentContext, payload: &NextPayload) -> HookResult<HookReply<NextResponse>> {
        let metadata = file_metadata(ctx).unwrap_or(Value::Null);

        let data = match payload.completion.as_ref().map(|c| &c.content) {
            None | Some(Value::Null) => Value::String(NO_ANALYSIS.to_string()),
            Some(Value::String(s)) if s.is_empty() => Value::String(NO_ANALYSIS.to_string()),
            Some(Value::String(s)) => Value::String(s.clone()),
            Some(other) => Value::String(other.to_string()),
        };

        Ok(HookReply::Partial(NextResponse {
            data: Some(data),
            metadata: Some(metadata),
            delegate: None,
        }))
    }
}
