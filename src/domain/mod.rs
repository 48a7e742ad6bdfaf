// ==========================================
// 产线 OEE 驾驶舱 - 领域模型层
// ==========================================
// 职责: 定义计划、工位、生产事件与驾驶舱结果
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod dashboard;
pub mod event;
pub mod plan;
pub mod station;
pub mod types;

// 重导出核心类型
pub use dashboard::{
    DashboardMetrics, DateDashboard, DowntimeDefect, FailureDefect, MetricPercentages,
    TimeWindow, WorkingTime, ALL_DAY_LABEL,
};
pub use event::{DowntimeEvent, FailureEvent, ProductRecord};
pub use plan::ProductionPlan;
pub use station::{bottleneck_of, Station};
pub use types::{Shift, WorkingTimeType};
