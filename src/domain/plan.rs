// ==========================================
// 产线 OEE 驾驶舱 - 生产计划领域模型
// ==========================================
// 计划由外部排产模块维护，本核心只读
// ==========================================

use crate::domain::types::{Shift, WorkingTimeType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ProductionPlan - 生产计划
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionPlan {
    pub plan_id: i64,
    pub line_id: i64,
    pub target: i64,                       // 计划良品数
    pub group: String,                     // 班组
    pub shift: Shift,
    pub working_time_type: WorkingTimeType,
    pub working_time_duration_minutes: i64, // 计划工时 (分钟)
    pub valid_date: DateTime<Utc>,          // 计划生效日
}
