// ==========================================
// 产线 OEE 驾驶舱 - 单日驾驶舱构建
// ==========================================
// 职责: 组装某产线某班次某日的完整驾驶舱
// 流程:
// 1. 解析日窗口
// 2. 查当日计划，选出班次匹配的计划（无匹配 → None）
// 3. 按计划工时类型解析班次窗口
// 4. 查瓶颈工位（节拍最大）
// 5. 在班次窗口内汇总基础指标
// 6. 推算实时计划产量
// ==========================================

use crate::domain::dashboard::{
    DashboardMetrics, DateDashboard, TimeWindow, WorkingTime, ALL_DAY_LABEL,
};
use crate::domain::station::{bottleneck_of, Station};
use crate::domain::types::{Shift, WorkingTimeType};
use crate::engine::defect_aggregator::{aggregate_downtime, aggregate_failures};
use crate::engine::error::{DashboardError, DashboardResult};
use crate::engine::metrics::{compute_rounded_metrics, MetricInputs};
use crate::engine::time_window::{elapsed_minutes, TimeWindowResolver};
use crate::repository::production_data_repo::ProductionDataRepository;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

// ==========================================
// MappingScope - 基础指标汇总范围
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct MappingScope {
    pub line_id: i64,
    /// 事件 / 产量统计窗口（通常为班次窗口）
    pub window: TimeWindow,
    pub shift: Option<Shift>,
    /// 计划 / 工时统计窗口（通常为日窗口）
    pub target_window: TimeWindow,
    pub working_time_type: Option<WorkingTimeType>,
    /// 目标产量是否只统计本班次计划
    pub scope_by_shift: bool,
}

/// 工时标签: "{OT|NO OT} {shift}"，缺少任一项时为 "ALL_DAY"
pub fn working_time_label(shift: Option<Shift>, working_time_type: Option<WorkingTimeType>) -> String {
    match (shift, working_time_type) {
        (Some(shift), Some(t)) => format!("{} {}", t.short_label(), shift),
        _ => ALL_DAY_LABEL.to_string(),
    }
}

/// 瓶颈节拍可用于推算: 有限且为正
pub fn is_usable_cycle_time(cycle_time: f64) -> bool {
    cycle_time.is_finite() && cycle_time > 0.0
}

/// 实时计划产量推算
///
/// - now 早于班次开始: 0
/// - now 在 [班次开始, 班次结束): floor(floor(经过分钟) / 瓶颈节拍)，不小于 0
/// - 班次已结束: 等于当日目标
pub fn project_live_plan(
    now: DateTime<Utc>,
    shift_window: &TimeWindow,
    cycle_time: f64,
    target: i64,
) -> i64 {
    if now < shift_window.start_date {
        return 0;
    }
    if !shift_window.contains(now) {
        return target;
    }
    if !is_usable_cycle_time(cycle_time) {
        return 0;
    }

    let elapsed = elapsed_minutes(shift_window.start_date, now).floor();
    ((elapsed / cycle_time).floor() as i64).max(0)
}

// ==========================================
// DayDashboardBuilder
// ==========================================
pub struct DayDashboardBuilder {
    repo: Arc<dyn ProductionDataRepository>,
    resolver: TimeWindowResolver,
}

impl DayDashboardBuilder {
    pub fn new(repo: Arc<dyn ProductionDataRepository>, resolver: TimeWindowResolver) -> Self {
        Self { repo, resolver }
    }

    pub fn resolver(&self) -> &TimeWindowResolver {
        &self.resolver
    }

    /// 构建单日驾驶舱（以当前时间推算实时计划）
    ///
    /// # 返回
    /// - Ok(Some): 驾驶舱
    /// - Ok(None): 当日没有该班次计划
    /// - Err: 配置缺失 / 无工位 / 数据访问失败
    pub async fn build_day_dashboard(
        &self,
        line_id: i64,
        shift: Shift,
        target_date: NaiveDate,
    ) -> DashboardResult<Option<DateDashboard>> {
        self.build_day_dashboard_at(line_id, shift, target_date, Utc::now())
            .await
    }

    /// 构建单日驾驶舱（指定"当前时间"）
    #[instrument(skip(self))]
    pub async fn build_day_dashboard_at(
        &self,
        line_id: i64,
        shift: Shift,
        target_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> DashboardResult<Option<DateDashboard>> {
        let day_window = self.resolver.resolve_day_window(target_date);

        let plans = self.repo.find_plans(line_id, &day_window, None).await?;
        let target_plan = match plans.into_iter().find(|p| p.shift == shift) {
            Some(plan) => plan,
            None => {
                debug!("当日无匹配班次计划，跳过");
                return Ok(None);
            }
        };

        let shift_window = self.resolver.resolve_shift_window(
            shift,
            target_plan.working_time_type,
            day_window.start_date,
        )?;

        let bottleneck = self.find_bottleneck_station(line_id).await?;

        let metrics = self
            .mapping_dashboard(&MappingScope {
                line_id,
                window: shift_window,
                shift: Some(shift),
                target_window: day_window,
                working_time_type: Some(target_plan.working_time_type),
                scope_by_shift: true,
            })
            .await?;

        let plan = project_live_plan(now, &shift_window, bottleneck.cycle_time, metrics.target);

        Ok(Some(DateDashboard {
            metrics,
            plan,
            bottleneck_station_id: bottleneck.station_id,
            group: target_plan.group,
            start_at: shift_window.start_date,
            end_at: shift_window.end_date,
        }))
    }

    /// 查询瓶颈工位（每次查询实时计算，不缓存）
    pub async fn find_bottleneck_station(&self, line_id: i64) -> DashboardResult<Station> {
        let stations = self.repo.find_stations(line_id).await?;
        let bottleneck = bottleneck_of(&stations)
            .cloned()
            .ok_or_else(|| DashboardError::NotFound("bottleneck station".to_string()))?;

        if !is_usable_cycle_time(bottleneck.cycle_time) {
            warn!(
                line_id,
                station_id = %bottleneck.station_id,
                cycle_time = bottleneck.cycle_time,
                "瓶颈工位节拍不可用，实时计划按 0 推算"
            );
        }

        Ok(bottleneck)
    }

    /// 汇总基础指标
    pub async fn mapping_dashboard(&self, scope: &MappingScope) -> DashboardResult<DashboardMetrics> {
        let line_id = scope.line_id;
        let target_shift = if scope.scope_by_shift { scope.shift } else { None };

        let (failures, downtimes, goods, target_plans) = futures::try_join!(
            self.repo.find_failure_events(line_id, &scope.window),
            self.repo.find_downtime_events(line_id, &scope.window),
            self.repo.find_products(line_id, &scope.window, true),
            self.repo.find_plans(line_id, &scope.target_window, target_shift),
        )?;

        let (failure_defect, failure_total) = aggregate_failures(&failures);
        let (downtime_defect, downtime_total) = aggregate_downtime(&downtimes);
        let target: i64 = target_plans.iter().map(|p| p.target).sum();
        let actual = goods.len() as i64;

        let working_time = self
            .mapping_working_time(
                line_id,
                &scope.target_window,
                scope.shift,
                scope.working_time_type,
            )
            .await?;

        let percentages = compute_rounded_metrics(MetricInputs {
            target,
            actual,
            failure_total,
            downtime_total,
            working_minutes: working_time.total_minutes,
        });

        let mut metrics = DashboardMetrics {
            target,
            actual,
            failure_defect,
            failure_total,
            downtime_defect,
            downtime_total,
            working_time,
            availability: 0.0,
            performance: 0.0,
            quality: 0.0,
            oee: 0.0,
        };
        metrics.set_percentages(percentages);
        Ok(metrics)
    }

    /// 汇总计划工时
    async fn mapping_working_time(
        &self,
        line_id: i64,
        window: &TimeWindow,
        shift: Option<Shift>,
        working_time_type: Option<WorkingTimeType>,
    ) -> DashboardResult<WorkingTime> {
        let plans = self.repo.find_plans(line_id, window, shift).await?;
        let total_minutes: i64 = plans
            .iter()
            .filter(|p| working_time_type.map_or(true, |t| t == p.working_time_type))
            .map(|p| p.working_time_duration_minutes)
            .sum();

        Ok(WorkingTime {
            start_date: window.start_date,
            end_date: window.end_date,
            label: working_time_label(shift, working_time_type),
            total_minutes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::shift_calendar::ShiftCalendar;
    use crate::engine::test_support::{FakeData, FakeRepository};
    use chrono::{Duration, FixedOffset, TimeZone};

    fn resolver() -> TimeWindowResolver {
        TimeWindowResolver::new(FixedOffset::east_opt(0).unwrap(), ShiftCalendar::default())
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, 0).unwrap()
    }

    fn builder(data: FakeData) -> DayDashboardBuilder {
        DayDashboardBuilder::new(Arc::new(FakeRepository::new(data)), resolver())
    }

    #[test]
    fn test_live_plan_within_shift() {
        let window = TimeWindow::new(at(8, 0), at(17, 0));
        assert_eq!(project_live_plan(at(8, 47), &window, 5.0, 100), 9);
    }

    #[test]
    fn test_live_plan_future_and_finished() {
        let window = TimeWindow::new(at(8, 0), at(17, 0));
        assert_eq!(project_live_plan(at(7, 59), &window, 5.0, 100), 0);
        assert_eq!(project_live_plan(at(17, 0), &window, 5.0, 100), 100);
        assert_eq!(project_live_plan(at(8, 0) - Duration::days(2), &window, 5.0, 100), 0);
    }

    #[test]
    fn test_live_plan_zero_cycle_time() {
        let window = TimeWindow::new(at(8, 0), at(17, 0));
        assert_eq!(project_live_plan(at(9, 0), &window, 0.0, 100), 0);
    }

    #[test]
    fn test_live_plan_non_finite_cycle_time() {
        let window = TimeWindow::new(at(8, 0), at(17, 0));
        assert_eq!(project_live_plan(at(9, 0), &window, f64::NAN, 100), 0);
        assert_eq!(project_live_plan(at(9, 0), &window, f64::INFINITY, 100), 0);

        assert!(!is_usable_cycle_time(f64::NAN));
        assert!(!is_usable_cycle_time(f64::INFINITY));
        assert!(!is_usable_cycle_time(-1.0));
        assert!(is_usable_cycle_time(0.5));
    }

    #[test]
    fn test_working_time_label() {
        assert_eq!(
            working_time_label(Some(Shift::Day), Some(WorkingTimeType::NotOvertime)),
            "NO OT DAY"
        );
        assert_eq!(
            working_time_label(Some(Shift::Night), Some(WorkingTimeType::Overtime)),
            "OT NIGHT"
        );
        assert_eq!(working_time_label(Some(Shift::Day), None), "ALL_DAY");
    }

    #[tokio::test]
    async fn test_no_matching_plan_is_absent() {
        let mut data = FakeData::with_line_stations(&[("ST-01", 4.0)]);
        data.add_plan(date(), Shift::Night, WorkingTimeType::NotOvertime, 100, 540, "B");

        let result = builder(data)
            .build_day_dashboard_at(1, Shift::Day, date(), at(12, 0))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_missing_station_is_not_found() {
        let mut data = FakeData::default();
        data.add_plan(date(), Shift::Day, WorkingTimeType::NotOvertime, 100, 540, "A");

        let err = builder(data)
            .build_day_dashboard_at(1, Shift::Day, date(), at(12, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::NotFound(ref what) if what == "bottleneck station"));
    }

    #[tokio::test]
    async fn test_unconfigured_shift_fails() {
        let mut data = FakeData::with_line_stations(&[("ST-01", 4.0)]);
        data.add_plan(date(), Shift::Day, WorkingTimeType::Overtime, 100, 720, "A");
        let calendar = ShiftCalendar::from_entries(vec![]).unwrap();
        let builder = DayDashboardBuilder::new(
            Arc::new(FakeRepository::new(data)),
            TimeWindowResolver::new(FixedOffset::east_opt(0).unwrap(), calendar),
        );

        let err = builder
            .build_day_dashboard_at(1, Shift::Day, date(), at(12, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_full_day_dashboard() {
        let mut data = FakeData::with_line_stations(&[("ST-01", 2.0), ("ST-02", 5.0)]);
        data.add_plan(date(), Shift::Day, WorkingTimeType::NotOvertime, 160, 540, "A");
        data.add_plan(date(), Shift::Night, WorkingTimeType::Overtime, 150, 720, "B");
        for i in 0..20 {
            data.add_product(at(9, i), true);
        }
        data.add_product(at(9, 30), false);
        data.add_product(at(18, 0), true); // 班次外
        data.add_failure(at(9, 5), 11, "Press");
        data.add_failure(at(9, 6), 11, "Press");
        data.add_failure(at(10, 0), 12, "Weld");
        data.add_downtime(at(11, 0), 3, "ST-02", 20);
        data.add_downtime(at(12, 0), 3, "ST-02", 7);

        let dashboard = builder(data)
            .build_day_dashboard_at(1, Shift::Day, date(), at(8, 47))
            .await
            .unwrap()
            .unwrap();

        let m = &dashboard.metrics;
        assert_eq!(m.target, 160);
        assert_eq!(m.actual, 20);
        assert_eq!(m.failure_total, 3);
        assert_eq!(m.failure_defect.len(), 2);
        assert_eq!(m.downtime_total, 27);
        assert_eq!(m.downtime_defect.len(), 1);
        assert_eq!(m.working_time.total_minutes, 540);
        assert_eq!(m.working_time.label, "NO OT DAY");
        assert_eq!(m.performance, 12.5);
        assert_eq!(m.quality, 85.0);
        assert_eq!(m.availability, 95.0);
        assert_eq!(m.oee, 10.09);

        assert_eq!(dashboard.plan, 9);
        assert_eq!(dashboard.bottleneck_station_id, "ST-02");
        assert_eq!(dashboard.group, "A");
        assert_eq!(dashboard.start_at, at(8, 0));
        assert_eq!(dashboard.end_at, at(17, 0));
    }

    #[tokio::test]
    async fn test_quiet_day_is_fully_available() {
        let mut data = FakeData::with_line_stations(&[("ST-01", 2.0)]);
        data.add_plan(date(), Shift::Day, WorkingTimeType::NotOvertime, 10, 540, "A");
        for i in 0..10 {
            data.add_product(at(10, i), true);
        }

        let dashboard = builder(data)
            .build_day_dashboard_at(1, Shift::Day, date(), at(20, 0))
            .await
            .unwrap()
            .unwrap();

        let m = &dashboard.metrics;
        assert!(m.failure_defect.is_empty());
        assert!(m.downtime_defect.is_empty());
        assert_eq!(m.failure_total, 0);
        assert_eq!(m.downtime_total, 0);
        assert_eq!(m.availability, 100.0);
        assert_eq!(m.quality, 100.0);
        assert_eq!(dashboard.plan, 10);
    }

    #[tokio::test]
    async fn test_mapping_dashboard_all_day_scope() {
        let mut data = FakeData::with_line_stations(&[("ST-01", 2.0)]);
        data.add_plan(date(), Shift::Day, WorkingTimeType::NotOvertime, 100, 540, "A");
        data.add_plan(date(), Shift::Night, WorkingTimeType::Overtime, 80, 720, "B");

        let b = builder(data);
        let day = b.resolver().resolve_day_window(date());
        let metrics = b
            .mapping_dashboard(&MappingScope {
                line_id: 1,
                window: day,
                shift: None,
                target_window: day,
                working_time_type: None,
                scope_by_shift: false,
            })
            .await
            .unwrap();

        assert_eq!(metrics.target, 180);
        assert_eq!(metrics.working_time.total_minutes, 1260);
        assert_eq!(metrics.working_time.label, ALL_DAY_LABEL);
    }
}
