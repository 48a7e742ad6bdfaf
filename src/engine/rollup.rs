// ==========================================
// 产线 OEE 驾驶舱 - 周 / 月汇总
// ==========================================
// 职责: 按日并发构建单日驾驶舱，按时间顺序合并为区间驾驶舱
// 约束:
// - 日构建并发发起、全部完成后再合并；任一日失败则整体失败
// - 无匹配计划的日不参与合并
// - 合并只累加原始计数，四项百分比在合并完成后按总数一次性计算
// - 不良 / 停机明细按日追加，不跨日按 ID 合并
// ==========================================

use crate::domain::dashboard::{
    DashboardMetrics, DateDashboard, DowntimeDefect, FailureDefect, WorkingTime,
};
use crate::domain::types::Shift;
use crate::engine::day_dashboard::DayDashboardBuilder;
use crate::engine::error::DashboardResult;
use crate::engine::metrics::{compute_rounded_metrics, MetricInputs};
use crate::engine::time_window::DateRange;
use chrono::{DateTime, NaiveDate, Utc};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{info, instrument};

// ==========================================
// RollupTotals - 合并累加器（不含百分比）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RollupTotals {
    pub target: i64,
    pub actual: i64,
    pub failure_total: i64,
    pub downtime_total: i64,
    pub working_minutes: i64,
    pub failure_defect: Vec<FailureDefect>,
    pub downtime_defect: Vec<DowntimeDefect>,
}

impl RollupTotals {
    /// 并入一日结果
    pub fn merge_day(mut self, day: DateDashboard) -> Self {
        let m = day.metrics;
        self.target += m.target;
        self.actual += m.actual;
        self.failure_total += m.failure_total;
        self.downtime_total += m.downtime_total;
        self.working_minutes += m.working_time.total_minutes;
        self.failure_defect.extend(m.failure_defect);
        self.downtime_defect.extend(m.downtime_defect);
        self
    }

    /// 生成区间驾驶舱，百分比按合并后的总数重新计算
    pub fn into_metrics(self, mut working_time: WorkingTime) -> DashboardMetrics {
        working_time.total_minutes = self.working_minutes;

        let percentages = compute_rounded_metrics(MetricInputs {
            target: self.target,
            actual: self.actual,
            failure_total: self.failure_total,
            downtime_total: self.downtime_total,
            working_minutes: self.working_minutes,
        });

        let mut metrics = DashboardMetrics {
            target: self.target,
            actual: self.actual,
            failure_defect: self.failure_defect,
            failure_total: self.failure_total,
            downtime_defect: self.downtime_defect,
            downtime_total: self.downtime_total,
            working_time,
            availability: 0.0,
            performance: 0.0,
            quality: 0.0,
            oee: 0.0,
        };
        metrics.set_percentages(percentages);
        metrics
    }
}

// ==========================================
// RollupAggregator
// ==========================================
pub struct RollupAggregator {
    day_builder: Arc<DayDashboardBuilder>,
}

impl RollupAggregator {
    pub fn new(day_builder: Arc<DayDashboardBuilder>) -> Self {
        Self { day_builder }
    }

    /// 区间（周）驾驶舱
    pub async fn build_week_dashboard(
        &self,
        line_id: i64,
        shift: Shift,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DashboardResult<DashboardMetrics> {
        self.build_week_dashboard_at(line_id, shift, start_date, end_date, Utc::now())
            .await
    }

    /// 区间（周）驾驶舱（指定"当前时间"）
    #[instrument(skip(self))]
    pub async fn build_week_dashboard_at(
        &self,
        line_id: i64,
        shift: Shift,
        start_date: NaiveDate,
        end_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> DashboardResult<DashboardMetrics> {
        let range = DateRange {
            start: start_date,
            end: end_date,
        };
        let days = range.days();

        // 并发构建，结果保持日期顺序
        let results = try_join_all(days.iter().map(|&date| {
            self.day_builder
                .build_day_dashboard_at(line_id, shift, date, now)
        }))
        .await?;

        let dashboards: Vec<DateDashboard> = results.into_iter().flatten().collect();

        let window = self.day_builder.resolver().resolve_range_window(&range);
        let working_time = WorkingTime {
            start_date: window.start_date,
            end_date: window.end_date,
            label: shift.to_string(),
            total_minutes: 0,
        };

        info!(
            requested_days = days.len(),
            contributing_days = dashboards.len(),
            "区间驾驶舱汇总完成"
        );

        if dashboards.is_empty() {
            return Ok(DashboardMetrics::zeroed(working_time));
        }

        let totals = dashboards
            .into_iter()
            .fold(RollupTotals::default(), RollupTotals::merge_day);
        Ok(totals.into_metrics(working_time))
    }

    /// 月驾驶舱：解析自然月区间后复用周汇总
    pub async fn build_month_dashboard(
        &self,
        line_id: i64,
        shift: Shift,
        year: i32,
        month: u32,
    ) -> DashboardResult<DashboardMetrics> {
        self.build_month_dashboard_at(line_id, shift, year, month, Utc::now())
            .await
    }

    /// 月驾驶舱（指定"当前时间"）
    pub async fn build_month_dashboard_at(
        &self,
        line_id: i64,
        shift: Shift,
        year: i32,
        month: u32,
        now: DateTime<Utc>,
    ) -> DashboardResult<DashboardMetrics> {
        let range = self.day_builder.resolver().resolve_month_range(year, month)?;
        self.build_week_dashboard_at(line_id, shift, range.start, range.end, now)
            .await
    }
}
