// ==========================================
// 产线 OEE 驾驶舱 - 驾驶舱 API
// ==========================================
// 职责: 对外请求面（日 / 周 / 月驾驶舱），参数校验与错误转换
// 架构: API 层 → Engine 层 (DayDashboardBuilder / RollupAggregator)
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::DashboardSettings;
use crate::domain::dashboard::{DashboardMetrics, DateDashboard};
use crate::domain::types::Shift;
use crate::engine::day_dashboard::DayDashboardBuilder;
use crate::engine::rollup::RollupAggregator;
use crate::engine::time_window::{DateRange, TimeWindowResolver};
use crate::repository::production_data_repo::ProductionDataRepository;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 区间驾驶舱允许的最大天数（每天一个并发日构建）
pub const MAX_RANGE_DAYS: i64 = 366;

// ==========================================
// 请求 / 响应
// ==========================================

/// 驾驶舱请求（按周期区分）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "period", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardRequest {
    #[serde(rename_all = "camelCase")]
    Day {
        line_id: i64,
        shift: Shift,
        date: NaiveDate,
    },
    #[serde(rename_all = "camelCase")]
    Week {
        line_id: i64,
        shift: Shift,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    #[serde(rename_all = "camelCase")]
    Month {
        line_id: i64,
        shift: Shift,
        year: i32,
        month: u32,
    },
}

/// 驾驶舱响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DashboardResponse {
    Day(DateDashboard),
    Period(DashboardMetrics),
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================

/// 驾驶舱API
///
/// 职责：
/// 1. GetDayDashboard: 单日驾驶舱（无计划 → NotFound）
/// 2. GetWeekDashboard: 任意日期区间汇总
/// 3. GetMonthDashboard: 自然月汇总
pub struct DashboardApi {
    day_builder: Arc<DayDashboardBuilder>,
    rollup: RollupAggregator,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例
    ///
    /// # 参数
    /// - repo: 生产数据仓储（需支持并发只读）
    /// - settings: 参考时区与班次时刻表
    pub fn new(repo: Arc<dyn ProductionDataRepository>, settings: DashboardSettings) -> Self {
        let resolver = TimeWindowResolver::new(settings.reference_offset, settings.shift_calendar);
        let day_builder = Arc::new(DayDashboardBuilder::new(repo, resolver));
        Self {
            rollup: RollupAggregator::new(day_builder.clone()),
            day_builder,
        }
    }

    fn validate_line_id(line_id: i64) -> ApiResult<()> {
        if line_id <= 0 {
            return Err(ApiError::InvalidInput(format!("产线ID无效: {}", line_id)));
        }
        Ok(())
    }

    /// 单日驾驶舱
    ///
    /// # 返回
    /// - Ok(DateDashboard)
    /// - Err(NotFound): 当日没有该班次计划 / 产线无工位
    /// - Err(ConfigurationError): 班次组合未配置
    pub async fn get_day_dashboard(
        &self,
        line_id: i64,
        shift: Shift,
        date: NaiveDate,
    ) -> ApiResult<DateDashboard> {
        self.get_day_dashboard_at(line_id, shift, date, Utc::now())
            .await
    }

    pub async fn get_day_dashboard_at(
        &self,
        line_id: i64,
        shift: Shift,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> ApiResult<DateDashboard> {
        Self::validate_line_id(line_id)?;

        self.day_builder
            .build_day_dashboard_at(line_id, shift, date, now)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "产线{} {} 班次在 {} 没有生产计划",
                    line_id, shift, date
                ))
            })
    }

    /// 周（任意区间）驾驶舱
    pub async fn get_week_dashboard(
        &self,
        line_id: i64,
        shift: Shift,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ApiResult<DashboardMetrics> {
        self.get_week_dashboard_at(line_id, shift, start_date, end_date, Utc::now())
            .await
    }

    pub async fn get_week_dashboard_at(
        &self,
        line_id: i64,
        shift: Shift,
        start_date: NaiveDate,
        end_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> ApiResult<DashboardMetrics> {
        Self::validate_line_id(line_id)?;
        if end_date < start_date {
            return Err(ApiError::InvalidInput(format!(
                "结束日期 {} 早于开始日期 {}",
                end_date, start_date
            )));
        }
        let day_count = DateRange {
            start: start_date,
            end: end_date,
        }
        .day_count();
        if day_count > MAX_RANGE_DAYS {
            return Err(ApiError::InvalidInput(format!(
                "区间共 {} 天，超过上限 {} 天",
                day_count, MAX_RANGE_DAYS
            )));
        }

        Ok(self
            .rollup
            .build_week_dashboard_at(line_id, shift, start_date, end_date, now)
            .await?)
    }

    /// 月驾驶舱
    pub async fn get_month_dashboard(
        &self,
        line_id: i64,
        shift: Shift,
        year: i32,
        month: u32,
    ) -> ApiResult<DashboardMetrics> {
        self.get_month_dashboard_at(line_id, shift, year, month, Utc::now())
            .await
    }

    pub async fn get_month_dashboard_at(
        &self,
        line_id: i64,
        shift: Shift,
        year: i32,
        month: u32,
        now: DateTime<Utc>,
    ) -> ApiResult<DashboardMetrics> {
        Self::validate_line_id(line_id)?;
        if !(1..=12).contains(&month) {
            return Err(ApiError::InvalidInput(format!("月份无效: {}", month)));
        }

        Ok(self
            .rollup
            .build_month_dashboard_at(line_id, shift, year, month, now)
            .await?)
    }

    /// 统一入口
    pub async fn get_dashboard(&self, request: DashboardRequest) -> ApiResult<DashboardResponse> {
        match request {
            DashboardRequest::Day {
                line_id,
                shift,
                date,
            } => self
                .get_day_dashboard(line_id, shift, date)
                .await
                .map(DashboardResponse::Day),
            DashboardRequest::Week {
                line_id,
                shift,
                start_date,
                end_date,
            } => self
                .get_week_dashboard(line_id, shift, start_date, end_date)
                .await
                .map(DashboardResponse::Period),
            DashboardRequest::Month {
                line_id,
                shift,
                year,
                month,
            } => self
                .get_month_dashboard(line_id, shift, year, month)
                .await
                .map(DashboardResponse::Period),
        }
    }
}
