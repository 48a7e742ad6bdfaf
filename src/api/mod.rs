// ==========================================
// 产线 OEE 驾驶舱 - API 层
// ==========================================
// 职责: 提供驾驶舱查询接口,负责参数校验与错误转换
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{DashboardApi, DashboardRequest, DashboardResponse};
pub use error::{ApiError, ApiResult};
