// ==========================================
// 智能体测试夹具 - 模型存储 Trait
// ==========================================
// 职责: 定义导入管道对数据表的访问接口（不包含实现）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::{ModelColumn, ModelSchema, Row, Where};
use crate::repository::error::RepositoryResult;
use serde_json::Value;

// ==========================================
// ModelStore Trait
// ==========================================
// 实现者: SqliteModelStore
pub trait ModelStore: Send + Sync {
    /// 注册模型（建表 + 写入列定义），已存在时不重复建表
    fn register(&self, schema: &ModelSchema) -> RepositoryResult<()>;

    /// 读取模型列定义（不含自增主键）
    fn columns(&self, model: &str) -> RepositoryResult<Vec<ModelColumn>>;

    /// 批量插入（事务化，全部成功或全部失败）
    ///
    /// # 返回
    /// - 插入行数
    fn insert(&self, model: &str, fields: &[String], rows: &[Vec<Value>]) -> RepositoryResult<usize>;

    /// 单行创建
    ///
    /// # 返回
    /// - 新行主键
    fn create(&self, model: &str, row: &Row) -> RepositoryResult<i64>;

    /// 按唯一列插入或更新（冲突时仅更新 update_columns）
    fn upsert(
        &self,
        model: &str,
        row: &Row,
        unique_by: &str,
        update_columns: &[&str],
    ) -> RepositoryResult<()>;

    /// 按列升序分页读取
    fn paginate(
        &self,
        model: &str,
        order_by: &str,
        offset: usize,
        limit: usize,
    ) -> RepositoryResult<Vec<Row>>;

    /// 按条件读取行
    fn find(
        &self,
        model: &str,
        select: &[&str],
        wheres: &[Where],
        limit: Option<usize>,
    ) -> RepositoryResult<Vec<Row>>;

    /// 按条件计数（wheres 为空时统计全表）
    fn count(&self, model: &str, wheres: &[Where]) -> RepositoryResult<i64>;

    /// 读取首个匹配行
    fn find_first(&self, model: &str, select: &[&str], wheres: &[Where]) -> RepositoryResult<Option<Row>> {
        Ok(self.find(model, select, wheres, Some(1))?.into_iter().next())
    }
}
