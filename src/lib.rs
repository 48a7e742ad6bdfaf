// ==========================================
// 产线 OEE 驾驶舱 - 核心库
// ==========================================
// 技术栈: Rust + SQLite (rusqlite) + tokio
// 系统定位: 只读指标汇总（日 / 周 / 月 OEE 驾驶舱）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 时间窗口与指标计算
pub mod engine;

// 配置层 - 时区与班次时刻表
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 驾驶舱接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Shift, WorkingTimeType};

// 领域实体
pub use domain::{
    DashboardMetrics, DateDashboard, DowntimeDefect, FailureDefect, ProductionPlan, Station,
    TimeWindow, WorkingTime,
};

// 引擎
pub use engine::{DayDashboardBuilder, RollupAggregator, TimeWindowResolver};

// API
pub use api::{DashboardApi, DashboardRequest, DashboardResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "产线 OEE 驾驶舱";
