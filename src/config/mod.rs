// ==========================================
// 产线 OEE 驾驶舱 - 配置层
// ==========================================
// 职责: 参考时区与班次时刻表
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod shift_calendar;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, DashboardSettings};
pub use shift_calendar::{ShiftCalendar, ShiftTiming};
