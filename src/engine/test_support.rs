// ==========================================
// 引擎层测试辅助: 内存版生产数据仓储
// ==========================================

use crate::domain::{
    DowntimeEvent, FailureEvent, ProductRecord, ProductionPlan, Shift, Station, TimeWindow,
    WorkingTimeType,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::production_data_repo::ProductionDataRepository;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Barrier;

pub const LINE_ID: i64 = 1;

/// 内存数据（固定产线 1，时区 UTC）
#[derive(Debug, Clone, Default)]
pub struct FakeData {
    pub stations: Vec<Station>,
    pub plans: Vec<ProductionPlan>,
    pub products: Vec<ProductRecord>,
    pub failures: Vec<FailureEvent>,
    pub downtimes: Vec<DowntimeEvent>,
    /// 该日的计划查询返回错误
    pub failing_date: Option<NaiveDate>,
}

impl FakeData {
    pub fn with_line_stations(stations: &[(&str, f64)]) -> Self {
        Self {
            stations: stations
                .iter()
                .map(|(id, cycle_time)| Station {
                    station_id: id.to_string(),
                    line_id: LINE_ID,
                    station_name: format!("{}-name", id),
                    cycle_time: *cycle_time,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn add_plan(
        &mut self,
        date: NaiveDate,
        shift: Shift,
        working_time_type: WorkingTimeType,
        target: i64,
        minutes: i64,
        group: &str,
    ) {
        let plan_id = self.plans.len() as i64 + 1;
        self.plans.push(ProductionPlan {
            plan_id,
            line_id: LINE_ID,
            target,
            group: group.to_string(),
            shift,
            working_time_type,
            working_time_duration_minutes: minutes,
            valid_date: Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)),
        });
    }

    pub fn add_product(&mut self, ts: DateTime<Utc>, is_goods: bool) {
        let product_id = self.products.len() as i64 + 1;
        self.products.push(ProductRecord {
            product_id,
            line_id: LINE_ID,
            timestamp: ts,
            is_goods,
        });
    }

    pub fn add_failure(&mut self, ts: DateTime<Utc>, failure_detail_id: i64, station: &str) {
        self.failures.push(FailureEvent {
            timestamp: ts,
            failure_detail_id,
            station_name: station.to_string(),
            defect_type: format!("TYPE-{}", failure_detail_id),
            details_text: format!("detail {}", failure_detail_id),
        });
    }

    pub fn add_downtime(
        &mut self,
        ts: DateTime<Utc>,
        availability_loss_id: i64,
        station_id: &str,
        minutes: i64,
    ) {
        self.downtimes.push(DowntimeEvent {
            timestamp: ts,
            duration_minutes: minutes,
            availability_loss_id,
            station_id: station_id.to_string(),
            details_text: format!("loss {}", availability_loss_id),
        });
    }
}

/// 内存仓储
pub struct FakeRepository {
    data: FakeData,
    plan_queries: AtomicUsize,
    /// 计划查询在此等待，直到 N 个查询同时到达
    plan_gate: Option<Arc<Barrier>>,
}

impl FakeRepository {
    pub fn new(data: FakeData) -> Self {
        Self {
            data,
            plan_queries: AtomicUsize::new(0),
            plan_gate: None,
        }
    }

    /// 计划查询需凑齐 parties 个并发调用才放行（串行调用会一直阻塞）
    pub fn with_plan_gate(data: FakeData, parties: usize) -> Self {
        Self {
            plan_gate: Some(Arc::new(Barrier::new(parties))),
            ..Self::new(data)
        }
    }

    pub fn plan_queries(&self) -> usize {
        self.plan_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductionDataRepository for FakeRepository {
    async fn find_plans(
        &self,
        line_id: i64,
        window: &TimeWindow,
        shift: Option<Shift>,
    ) -> RepositoryResult<Vec<ProductionPlan>> {
        self.plan_queries.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.plan_gate {
            gate.wait().await;
        }
        if let Some(date) = self.data.failing_date {
            if window.contains(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))) {
                return Err(RepositoryError::DatabaseQueryError(format!(
                    "simulated failure on {}",
                    date
                )));
            }
        }

        Ok(self
            .data
            .plans
            .iter()
            .filter(|p| p.line_id == line_id && window.contains(p.valid_date))
            .filter(|p| shift.map_or(true, |s| s == p.shift))
            .cloned()
            .collect())
    }

    async fn find_stations(&self, line_id: i64) -> RepositoryResult<Vec<Station>> {
        Ok(self
            .data
            .stations
            .iter()
            .filter(|s| s.line_id == line_id)
            .cloned()
            .collect())
    }

    async fn find_products(
        &self,
        line_id: i64,
        window: &TimeWindow,
        is_goods: bool,
    ) -> RepositoryResult<Vec<ProductRecord>> {
        Ok(self
            .data
            .products
            .iter()
            .filter(|p| p.line_id == line_id && p.is_goods == is_goods && window.contains(p.timestamp))
            .cloned()
            .collect())
    }

    async fn find_failure_events(
        &self,
        line_id: i64,
        window: &TimeWindow,
    ) -> RepositoryResult<Vec<FailureEvent>> {
        if line_id != LINE_ID {
            return Ok(Vec::new());
        }
        Ok(self
            .data
            .failures
            .iter()
            .filter(|f| window.contains(f.timestamp))
            .cloned()
            .collect())
    }

    async fn find_downtime_events(
        &self,
        line_id: i64,
        window: &TimeWindow,
    ) -> RepositoryResult<Vec<DowntimeEvent>> {
        if line_id != LINE_ID {
            return Ok(Vec::new());
        }
        Ok(self
            .data
            .downtimes
            .iter()
            .filter(|d| window.contains(d.timestamp))
            .cloned()
            .collect())
    }
}
