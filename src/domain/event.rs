// ==========================================
// 产线 OEE 驾驶舱 - 生产事件
// ==========================================
// 不良事件 / 停机事件 / 成品记录
// 写入流程由外部服务负责，本核心只读
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 不良事件：每件不良品每个不良原因一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureEvent {
    pub timestamp: DateTime<Utc>,
    pub failure_detail_id: i64,
    pub station_name: String,
    pub defect_type: String,
    pub details_text: String,
}

/// 停机事件：每次停机一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DowntimeEvent {
    pub timestamp: DateTime<Utc>,
    pub duration_minutes: i64,
    pub availability_loss_id: i64,
    pub station_id: String,
    pub details_text: String,
}

/// 成品记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub product_id: i64,
    pub line_id: i64,
    pub timestamp: DateTime<Utc>,
    pub is_goods: bool,
}
