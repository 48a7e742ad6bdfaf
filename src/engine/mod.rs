// ==========================================
// 产线 OEE 驾驶舱 - 引擎层
// ==========================================
// 职责: 时间窗口解析、指标计算、事件汇总、日/周/月驾驶舱构建
// 红线: Engine 不拼 SQL，数据只经 ProductionDataRepository 读取
// ==========================================

pub mod day_dashboard;
pub mod defect_aggregator;
pub mod error;
pub mod metrics;
pub mod rollup;
pub mod time_window;

#[cfg(test)]
pub(crate) mod test_support;

// 重导出核心引擎
pub use day_dashboard::{
    is_usable_cycle_time, project_live_plan, working_time_label, DayDashboardBuilder, MappingScope,
};
pub use defect_aggregator::{aggregate_downtime, aggregate_failures};
pub use error::{DashboardError, DashboardResult};
pub use metrics::{compute_metrics, compute_rounded_metrics, round2, MetricInputs};
pub use rollup::{RollupAggregator, RollupTotals};
pub use time_window::{elapsed_minutes, DateRange, TimeWindowResolver};
