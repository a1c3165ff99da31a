// ==========================================
// 智能体测试夹具 - 模拟搜索客户端
// ==========================================
// web: 复用 search 服务的模拟结果
// kb / db: 骨架实现，返回空结果
// ==========================================

use crate::hooks::error::{HookError, HookResult};
use crate::hooks::ports::{SearchClient, SearchOptions, SearchRequest, SearchType};
use crate::tools::mock_results::{generate_mock_results, ResultKind};
use crate::tools::search::DEFAULT_LIMIT;
use serde_json::{json, Value};
use tracing::debug;

#[derive(Debug, Default, Clone)]
pub struct MockSearchClient;

impl MockSearchClient {
    pub fn new() -> Self {
        Self
    }

    fn skeleton(kind: SearchType, query: &str, options: &SearchOptions) -> Value {
        json!({
            "type": kind,
            "query": query,
            "source": "hook",
            "items": [],
            "total": 0,
            "duration_ms": 0,
            "options": options,
        })
    }

    fn dispatch(&self, request: &SearchRequest) -> HookResult<Value> {
        let options = SearchOptions {
            limit: request.limit,
            ..Default::default()
        };
        match request.kind {
            SearchType::Web => self.web(&request.query, &options),
            SearchType::Kb => self.kb(&request.query, &options),
            SearchType::Db => self.db(&request.query, &options),
        }
    }
}

fn ensure_requests(requests: &[SearchRequest]) -> HookResult<()> {
    if requests.is_empty() {
        return Err(HookError::capability("search", "至少需要一个搜索请求"));
    }
    Ok(())
}

impl SearchClient for MockSearchClient {
    fn web(&self, query: &str, options: &SearchOptions) -> HookResult<Value> {
        let limit = options.limit.unwrap_or(DEFAULT_LIMIT);
        let items = generate_mock_results(query, limit, &options.sites, ResultKind::Web);
        debug!(query = %query, total = items.len(), "模拟网页搜索");

        Ok(json!({
            "type": SearchType::Web,
            "query": query,
            "source": "hook",
            "items": items,
            "total": items.len(),
            "duration_ms": 0,
        }))
    }

    fn kb(&self, query: &str, options: &SearchOptions) -> HookResult<Value> {
        Ok(Self::skeleton(SearchType::Kb, query, options))
    }

    fn db(&self, query: &str, options: &SearchOptions) -> HookResult<Value> {
        Ok(Self::skeleton(SearchType::Db, query, options))
    }

    fn all(&self, requests: &[SearchRequest]) -> HookResult<Vec<Value>> {
        requests.iter().map(|r| self.dispatch(r)).collect()
    }

    fn any(&self, requests: &[SearchRequest]) -> HookResult<Value> {
        ensure_requests(requests)?;
        let mut last_error = None;
        for request in requests {
            match self.dispatch(request) {
                Ok(result) => return Ok(result),
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error.unwrap_or_else(|| HookError::capability("search", "所有搜索请求均失败")))
    }

    fn race(&self, requests: &[SearchRequest]) -> HookResult<Value> {
        ensure_requests(requests)?;
        // 同步执行时首个请求即最先完成
        self.dispatch(&requests[0])
    }
}
