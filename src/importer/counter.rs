// ==========================================
// 智能体测试夹具 - 计数入口
// ==========================================

use crate::domain::Where;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::open_sheet_source;
use crate::repository::ModelStore;
use serde_json::{Map, Value};
use std::path::Path;

/// CountModel: 全表行数
pub fn count_model(store: &dyn ModelStore, model: &str) -> ImportResult<i64> {
    Ok(store.count(model, &[])?)
}

/// CountModelWhere: 等值条件（AND）计数，空条件统计全表
pub fn count_model_where(
    store: &dyn ModelStore,
    model: &str,
    wheres: &Map<String, Value>,
) -> ImportResult<i64> {
    let wheres: Vec<Where> = wheres
        .iter()
        .map(|(column, value)| Where::eq(column.clone(), value.clone()))
        .collect();
    Ok(store.count(model, &wheres)?)
}

/// CountRows: 工作表行数（空表为 0）
pub fn count_rows<P: AsRef<Path>>(file_path: P, sheet: &str) -> ImportResult<usize> {
    let mut source = open_sheet_source(file_path)?;
    Ok(source.dimension(sheet)?.rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelSchema;
    use crate::repository::SqliteModelStore;
    use serde_json::json;

    fn report_store() -> SqliteModelStore {
        let store = SqliteModelStore::in_memory().unwrap();
        store.register(&ModelSchema::import_report("tmp_report")).unwrap();
        for (line, kind) in [(1, "success"), (2, "error"), (3, "error")] {
            let row = json!({"__line": line, "type": kind});
            store.create("tmp_report", row.as_object().unwrap()).unwrap();
        }
        store
    }

    #[test]
    fn test_count_model() {
        let store = report_store();
        assert_eq!(count_model(&store, "tmp_report").unwrap(), 3);
    }

    #[test]
    fn test_count_model_where() {
        let store = report_store();
        let wheres = json!({"type": "error"});
        assert_eq!(
            count_model_where(&store, "tmp_report", wheres.as_object().unwrap()).unwrap(),
            2
        );
        assert_eq!(count_model_where(&store, "tmp_report", &Map::new()).unwrap(), 3);
    }

    #[test]
    fn test_count_rows_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, "a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(count_rows(&path, "Sheet1").unwrap(), 3);

        let empty = dir.path().join("empty.csv");
        std::fs::write(&empty, "").unwrap();
        assert_eq!(count_rows(&empty, "Sheet1").unwrap(), 0);
    }
}
