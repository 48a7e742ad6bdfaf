// ==========================================
// 产线 OEE 驾驶舱 - 驾驶舱结果模型
// ==========================================
// 所有结果按请求实时计算，不缓存、不跨请求复用
// 序列化字段名: camelCase
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// TimeWindow - 绝对时间窗口 [start_date, end_date)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// 左闭右开
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start_date && ts < self.end_date
    }
}

// ==========================================
// WorkingTime - 工时窗口
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingTime {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// "ALL_DAY" 或 "{OT|NO OT} {shift}"；周/月汇总时为班次名
    pub label: String,
    pub total_minutes: i64,
}

pub const ALL_DAY_LABEL: &str = "ALL_DAY";

// ==========================================
// 不良 / 停机汇总条目
// ==========================================

/// 按 failure_detail_id 去重后的不良汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureDefect {
    pub failure_detail_id: i64,
    pub station_name: String,
    pub defect_type: String,
    pub details_text: String,
    pub sum: i64,
}

/// 按 availability_loss_id 去重后的停机汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DowntimeDefect {
    pub availability_loss_id: i64,
    pub station_id: String,
    pub details_text: String,
    pub downtime_minutes: i64,
}

// ==========================================
// MetricPercentages - 四项百分比 (保留两位小数)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricPercentages {
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub oee: f64,
}

// ==========================================
// DashboardMetrics - 驾驶舱基础指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub target: i64,
    pub actual: i64,
    pub failure_defect: Vec<FailureDefect>,
    pub failure_total: i64,
    pub downtime_defect: Vec<DowntimeDefect>,
    pub downtime_total: i64,
    pub working_time: WorkingTime,
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub oee: f64,
}

impl DashboardMetrics {
    /// 全零指标（周/月内没有任何可用日时返回）
    pub fn zeroed(working_time: WorkingTime) -> Self {
        Self {
            target: 0,
            actual: 0,
            failure_defect: Vec::new(),
            failure_total: 0,
            downtime_defect: Vec::new(),
            downtime_total: 0,
            working_time,
            availability: 0.0,
            performance: 0.0,
            quality: 0.0,
            oee: 0.0,
        }
    }

    pub fn percentages(&self) -> MetricPercentages {
        MetricPercentages {
            availability: self.availability,
            performance: self.performance,
            quality: self.quality,
            oee: self.oee,
        }
    }

    pub fn set_percentages(&mut self, p: MetricPercentages) {
        self.availability = p.availability;
        self.performance = p.performance;
        self.quality = p.quality;
        self.oee = p.oee;
    }
}

// ==========================================
// DateDashboard - 单日驾驶舱
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateDashboard {
    #[serde(flatten)]
    pub metrics: DashboardMetrics,
    /// 实时推算的计划产量
    pub plan: i64,
    pub bottleneck_station_id: String,
    pub group: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_window_half_open() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let window = TimeWindow::new(start, end);

        assert!(window.contains(start));
        assert!(!window.contains(end));
    }

    #[test]
    fn test_date_dashboard_flattens_metrics() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 1, 0, 0).unwrap();
        let metrics = DashboardMetrics::zeroed(WorkingTime {
            start_date: ts,
            end_date: ts,
            label: ALL_DAY_LABEL.to_string(),
            total_minutes: 0,
        });
        let dashboard = DateDashboard {
            metrics,
            plan: 3,
            bottleneck_station_id: "ST-01".to_string(),
            group: "A".to_string(),
            start_at: ts,
            end_at: ts,
        };

        let value = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(value["failureTotal"], 0);
        assert_eq!(value["bottleneckStationId"], "ST-01");
        assert_eq!(value["workingTime"]["label"], "ALL_DAY");
    }
}
