// ==========================================
// 产线 OEE 驾驶舱 - 生产数据 Repository 实现
// ==========================================
// 职责: 基于 rusqlite 实现 ProductionDataRepository
// 约束: 所有查询使用参数化；时间过滤统一为 start <= ts < end
// 时间比较按 julianday 换算后的时刻进行，库内时间戳可带任意 RFC3339 偏移
// ==========================================

use crate::db::{format_timestamp, parse_timestamp};
use crate::domain::{
    DowntimeEvent, FailureEvent, ProductRecord, ProductionPlan, Shift, Station, TimeWindow,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::production_data_repo::ProductionDataRepository;
use async_trait::async_trait;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// ProductionDataRepositoryImpl
// ==========================================

/// 生产数据仓储（只读）
pub struct ProductionDataRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionDataRepositoryImpl {
    /// 创建新的仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

fn field_error(field: &str, message: impl ToString) -> RepositoryError {
    RepositoryError::FieldValueError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn parse_ts(field: &str, raw: &str) -> RepositoryResult<chrono::DateTime<chrono::Utc>> {
    parse_timestamp(raw).map_err(|e| field_error(field, format!("{} ({})", e, raw)))
}

// 计划行（未解析枚举前）
struct PlanRow {
    plan_id: i64,
    line_id: i64,
    target: i64,
    group: String,
    shift: String,
    working_time_type: String,
    working_time_duration: i64,
    valid_date: String,
}

impl PlanRow {
    fn into_plan(self) -> RepositoryResult<ProductionPlan> {
        Ok(ProductionPlan {
            plan_id: self.plan_id,
            line_id: self.line_id,
            target: self.target,
            group: self.group,
            shift: self.shift.parse().map_err(|e| field_error("shift", e))?,
            working_time_type: self
                .working_time_type
                .parse()
                .map_err(|e| field_error("working_time_type", e))?,
            working_time_duration_minutes: self.working_time_duration,
            valid_date: parse_ts("valid_date", &self.valid_date)?,
        })
    }
}

#[async_trait]
impl ProductionDataRepository for ProductionDataRepositoryImpl {
    async fn find_plans(
        &self,
        line_id: i64,
        window: &TimeWindow,
        shift: Option<Shift>,
    ) -> RepositoryResult<Vec<ProductionPlan>> {
        let conn = self.get_conn()?;
        let shift_str = shift.map(|s| s.to_string());

        let mut stmt = conn.prepare(
            r#"
            SELECT
                plan_id, line_id, target, group_name, shift,
                working_time_type, working_time_duration, valid_date
            FROM production_plan
            WHERE line_id = ?1
              AND julianday(valid_date) >= julianday(?2)
              AND julianday(valid_date) < julianday(?3)
              AND (?4 IS NULL OR shift = ?4)
            ORDER BY julianday(valid_date), plan_id
            "#,
        )?;

        let rows = stmt
            .query_map(
                params![
                    line_id,
                    format_timestamp(window.start_date),
                    format_timestamp(window.end_date),
                    shift_str,
                ],
                |row| {
                    Ok(PlanRow {
                        plan_id: row.get(0)?,
                        line_id: row.get(1)?,
                        target: row.get(2)?,
                        group: row.get(3)?,
                        shift: row.get(4)?,
                        working_time_type: row.get(5)?,
                        working_time_duration: row.get(6)?,
                        valid_date: row.get(7)?,
                    })
                },
            )?
            .collect::<SqliteResult<Vec<PlanRow>>>()?;

        rows.into_iter().map(PlanRow::into_plan).collect()
    }

    async fn find_stations(&self, line_id: i64) -> RepositoryResult<Vec<Station>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT station_id, line_id, station_name, cycle_time
            FROM station
            WHERE line_id = ?1
            ORDER BY station_id
            "#,
        )?;

        let stations = stmt
            .query_map(params![line_id], |row| {
                Ok(Station {
                    station_id: row.get(0)?,
                    line_id: row.get(1)?,
                    station_name: row.get(2)?,
                    cycle_time: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<Station>>>()?;

        Ok(stations)
    }

    async fn find_products(
        &self,
        line_id: i64,
        window: &TimeWindow,
        is_goods: bool,
    ) -> RepositoryResult<Vec<ProductRecord>> {
        let conn = self.get_conn()?;

        // 成品通过机型归属到产线
        let mut stmt = conn.prepare(
            r#"
            SELECT p.product_id, m.line_id, p.timestamp, p.is_goods
            FROM product p
            JOIN model m ON m.model_id = p.model_id
            WHERE m.line_id = ?1
              AND p.is_goods = ?2
              AND julianday(p.timestamp) >= julianday(?3)
              AND julianday(p.timestamp) < julianday(?4)
            ORDER BY julianday(p.timestamp), p.product_id
            "#,
        )?;

        let rows = stmt
            .query_map(
                params![
                    line_id,
                    is_goods,
                    format_timestamp(window.start_date),
                    format_timestamp(window.end_date),
                ],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, bool>(3)?,
                    ))
                },
            )?
            .collect::<SqliteResult<Vec<_>>>()?;

        rows.into_iter()
            .map(|(product_id, line_id, ts, is_goods)| {
                Ok(ProductRecord {
                    product_id,
                    line_id,
                    timestamp: parse_ts("product.timestamp", &ts)?,
                    is_goods,
                })
            })
            .collect()
    }

    async fn find_failure_events(
        &self,
        line_id: i64,
        window: &TimeWindow,
    ) -> RepositoryResult<Vec<FailureEvent>> {
        let conn = self.get_conn()?;

        // 不良按不良明细所属产线过滤
        let mut stmt = conn.prepare(
            r#"
            SELECT pf.timestamp, fd.failure_detail_id, s.station_name,
                   fd.failure_type, fd.details
            FROM product_failure pf
            JOIN failure_detail fd ON fd.failure_detail_id = pf.failure_detail_id
            JOIN station s ON s.station_id = pf.station_id
            WHERE fd.line_id = ?1
              AND julianday(pf.timestamp) >= julianday(?2)
              AND julianday(pf.timestamp) < julianday(?3)
            ORDER BY julianday(pf.timestamp), pf.id
            "#,
        )?;

        let rows = stmt
            .query_map(
                params![
                    line_id,
                    format_timestamp(window.start_date),
                    format_timestamp(window.end_date),
                ],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )?
            .collect::<SqliteResult<Vec<_>>>()?;

        rows.into_iter()
            .map(
                |(ts, failure_detail_id, station_name, defect_type, details_text)| {
                    Ok(FailureEvent {
                        timestamp: parse_ts("product_failure.timestamp", &ts)?,
                        failure_detail_id,
                        station_name,
                        defect_type,
                        details_text,
                    })
                },
            )
            .collect()
    }

    async fn find_downtime_events(
        &self,
        line_id: i64,
        window: &TimeWindow,
    ) -> RepositoryResult<Vec<DowntimeEvent>> {
        let conn = self.get_conn()?;

        // 停机按工位所属产线过滤
        let mut stmt = conn.prepare(
            r#"
            SELECT d.timestamp, d.duration, d.availability_loss_id,
                   d.station_id, al.details
            FROM downtime d
            JOIN station s ON s.station_id = d.station_id
            JOIN availability_loss al ON al.availability_loss_id = d.availability_loss_id
            WHERE s.line_id = ?1
              AND julianday(d.timestamp) >= julianday(?2)
              AND julianday(d.timestamp) < julianday(?3)
            ORDER BY julianday(d.timestamp), d.downtime_id
            "#,
        )?;

        let rows = stmt
            .query_map(
                params![
                    line_id,
                    format_timestamp(window.start_date),
                    format_timestamp(window.end_date),
                ],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )?
            .collect::<SqliteResult<Vec<_>>>()?;

        rows.into_iter()
            .map(
                |(ts, duration_minutes, availability_loss_id, station_id, details_text)| {
                    Ok(DowntimeEvent {
                        timestamp: parse_ts("downtime.timestamp", &ts)?,
                        duration_minutes,
                        availability_loss_id,
                        station_id,
                        details_text,
                    })
                },
            )
            .collect()
    }
}
