// ==========================================
// 产线 OEE 驾驶舱 - 生产数据 Repository Trait
// ==========================================
// 职责: 定义驾驶舱引擎所需的只读数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做按产线 + 时间窗口过滤
// ==========================================

use crate::domain::{
    DowntimeEvent, FailureEvent, ProductRecord, ProductionPlan, Shift, Station, TimeWindow,
};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ProductionDataRepository Trait
// ==========================================
// 用途: 驾驶舱聚合查询
// 实现者: ProductionDataRepositoryImpl（使用 rusqlite）
// 约束: 必须支持并发只读访问（周/月汇总会并发发起日查询）
#[async_trait]
pub trait ProductionDataRepository: Send + Sync {
    /// 查询窗口内生效的生产计划
    ///
    /// # 参数
    /// - line_id: 产线ID
    /// - window: 绝对时间窗口（按 valid_date 过滤）
    /// - shift: 班次过滤（None 表示不限）
    async fn find_plans(
        &self,
        line_id: i64,
        window: &TimeWindow,
        shift: Option<Shift>,
    ) -> RepositoryResult<Vec<ProductionPlan>>;

    /// 查询产线下所有工位
    async fn find_stations(&self, line_id: i64) -> RepositoryResult<Vec<Station>>;

    /// 查询窗口内的成品记录
    async fn find_products(
        &self,
        line_id: i64,
        window: &TimeWindow,
        is_goods: bool,
    ) -> RepositoryResult<Vec<ProductRecord>>;

    /// 查询窗口内的不良事件（按时间升序）
    async fn find_failure_events(
        &self,
        line_id: i64,
        window: &TimeWindow,
    ) -> RepositoryResult<Vec<FailureEvent>>;

    /// 查询窗口内的停机事件（按时间升序）
    async fn find_downtime_events(
        &self,
        line_id: i64,
        window: &TimeWindow,
    ) -> RepositoryResult<Vec<DowntimeEvent>>;
}
