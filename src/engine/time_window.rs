// ==========================================
// 产线 OEE 驾驶舱 - 时间窗口解析
// ==========================================
// 职责: 日窗口 / 班次窗口 / 月窗口 / 经过分钟数
// 约束: 所有"日"均以参考时区（固定偏移）的自然日计算
// ==========================================

use crate::config::shift_calendar::ShiftCalendar;
use crate::domain::dashboard::TimeWindow;
use crate::domain::types::{Shift, WorkingTimeType};
use crate::engine::error::{DashboardError, DashboardResult};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

// ==========================================
// DateRange - 自然日区间（两端包含）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// 区间内天数 = (end - start) 整天数 + 1；end < start 时为 0
    pub fn day_count(&self) -> i64 {
        ((self.end - self.start).num_days() + 1).max(0)
    }

    /// 按时间顺序列出每一天
    pub fn days(&self) -> Vec<NaiveDate> {
        (0..self.day_count())
            .map(|offset| self.start + Duration::days(offset))
            .collect()
    }
}

// ==========================================
// TimeWindowResolver
// ==========================================
#[derive(Debug, Clone)]
pub struct TimeWindowResolver {
    offset: FixedOffset,
    calendar: ShiftCalendar,
}

impl TimeWindowResolver {
    pub fn new(offset: FixedOffset, calendar: ShiftCalendar) -> Self {
        Self { offset, calendar }
    }

    /// 绝对时间所在的参考时区自然日
    pub fn local_date_of(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    /// 参考时区某日零点对应的 UTC 时刻
    fn local_midnight(&self, date: NaiveDate) -> DateTime<Utc> {
        let naive = date.and_time(NaiveTime::MIN);
        let offset = Duration::seconds(i64::from(self.offset.local_minus_utc()));
        Utc.from_utc_datetime(&(naive - offset))
    }

    /// 日窗口：当日零点 ~ 次日零点
    pub fn resolve_day_window(&self, date: NaiveDate) -> TimeWindow {
        let start = self.local_midnight(date);
        TimeWindow::new(start, start + Duration::days(1))
    }

    /// 区间窗口：首日零点 ~ 末日次日零点
    pub fn resolve_range_window(&self, range: &DateRange) -> TimeWindow {
        let start = self.local_midnight(range.start);
        let end = self.local_midnight(range.end) + Duration::days(1);
        TimeWindow::new(start, end.max(start))
    }

    /// 班次窗口
    ///
    /// # 参数
    /// - shift / working_time_type: 班次组合
    /// - day_start: 日窗口起点（当日零点）
    ///
    /// # 返回
    /// - Ok(TimeWindow): end > start；夜班可跨到次日
    /// - Err(Configuration): 组合未配置
    pub fn resolve_shift_window(
        &self,
        shift: Shift,
        working_time_type: WorkingTimeType,
        day_start: DateTime<Utc>,
    ) -> DashboardResult<TimeWindow> {
        let timing = self.calendar.lookup(shift, working_time_type).ok_or_else(|| {
            DashboardError::Configuration(format!(
                "班次 {} / 工时类型 {} 未配置时间窗口",
                shift, working_time_type
            ))
        })?;

        let start = day_start + Duration::minutes(timing.start_minute);
        let end = start + Duration::minutes(timing.duration_minutes);
        Ok(TimeWindow::new(start, end))
    }

    /// 月区间：当月首日 ~ 当月末日（自然月长度由日历计算）
    pub fn resolve_month_range(&self, year: i32, month: u32) -> DashboardResult<DateRange> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            DashboardError::Configuration(format!("无效的年月: {}-{}", year, month))
        })?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| DashboardError::Configuration(format!("无效的年月: {}-{}", year, month)))?;

        Ok(DateRange {
            start,
            end: next_month - Duration::days(1),
        })
    }

    /// 月窗口：当月首个时刻 ~ 次月首个时刻（左闭右开，等价于包含当月最后一刻）
    pub fn resolve_month_window(&self, year: i32, month: u32) -> DashboardResult<TimeWindow> {
        let range = self.resolve_month_range(year, month)?;
        Ok(self.resolve_range_window(&range))
    }
}

/// 两个时刻之间的挂钟分钟数
pub fn elapsed_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}
