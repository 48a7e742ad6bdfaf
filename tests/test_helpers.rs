// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库初始化与生产数据写入
// 时间戳统一按 UTC 毫秒格式写库
// ==========================================

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use oee_dashboard::db::{format_timestamp, init_schema, open_sqlite_connection};
use rusqlite::{params, Connection};
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// UTC 时间
pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

/// 生产数据写入器
pub struct Seeder {
    conn: Connection,
    next_serial: i64,
}

impl Seeder {
    pub fn open(db_path: &str) -> Self {
        Self {
            conn: open_sqlite_connection(db_path).unwrap(),
            next_serial: 1,
        }
    }

    pub fn line(&self, line_id: i64) -> &Self {
        self.conn
            .execute(
                "INSERT INTO line (line_id, line_name) VALUES (?1, ?2)",
                params![line_id, format!("LINE-{}", line_id)],
            )
            .unwrap();
        self.conn
            .execute(
                "INSERT INTO model (model_id, line_id) VALUES (?1, ?2)",
                params![format!("M-{}", line_id), line_id],
            )
            .unwrap();
        self
    }

    pub fn station(&self, station_id: &str, line_id: i64, name: &str, cycle_time: f64) -> &Self {
        self.conn
            .execute(
                "INSERT INTO station (station_id, line_id, station_name, cycle_time) VALUES (?1, ?2, ?3, ?4)",
                params![station_id, line_id, name, cycle_time],
            )
            .unwrap();
        self
    }

    /// 写入计划；valid_date 为参考时区当日零点对应的 UTC 时刻
    #[allow(clippy::too_many_arguments)]
    pub fn plan(
        &self,
        line_id: i64,
        valid_date: DateTime<Utc>,
        shift: &str,
        working_time_type: &str,
        target: i64,
        minutes: i64,
        group: &str,
    ) -> &Self {
        self.conn
            .execute(
                r#"
                INSERT INTO production_plan (line_id, target, group_name, shift,
                    working_time_type, working_time_duration, valid_date)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    line_id,
                    target,
                    group,
                    shift,
                    working_time_type,
                    minutes,
                    format_timestamp(valid_date)
                ],
            )
            .unwrap();
        self
    }

    /// 写入成品，返回 product_id
    pub fn product(&mut self, line_id: i64, ts: DateTime<Utc>, is_goods: bool) -> i64 {
        let serial = format!("SN-{:06}", self.next_serial);
        self.next_serial += 1;
        self.conn
            .execute(
                "INSERT INTO product (model_id, serial_number, is_goods, timestamp) VALUES (?1, ?2, ?3, ?4)",
                params![format!("M-{}", line_id), serial, is_goods, format_timestamp(ts)],
            )
            .unwrap();
        self.conn.last_insert_rowid()
    }

    pub fn failure_detail(&self, failure_detail_id: i64, line_id: i64, failure_type: &str, details: &str) -> &Self {
        self.conn
            .execute(
                "INSERT INTO failure_detail (failure_detail_id, line_id, failure_type, details) VALUES (?1, ?2, ?3, ?4)",
                params![failure_detail_id, line_id, failure_type, details],
            )
            .unwrap();
        self
    }

    pub fn failure(&mut self, line_id: i64, ts: DateTime<Utc>, failure_detail_id: i64, station_id: &str) {
        let product_id = self.product(line_id, ts, false);
        self.conn
            .execute(
                "INSERT INTO product_failure (product_id, failure_detail_id, station_id, timestamp) VALUES (?1, ?2, ?3, ?4)",
                params![product_id, failure_detail_id, station_id, format_timestamp(ts)],
            )
            .unwrap();
    }

    pub fn availability_loss(&self, availability_loss_id: i64, details: &str) -> &Self {
        self.conn
            .execute(
                "INSERT INTO availability_loss (availability_loss_id, details) VALUES (?1, ?2)",
                params![availability_loss_id, details],
            )
            .unwrap();
        self
    }

    pub fn downtime(&self, ts: DateTime<Utc>, availability_loss_id: i64, station_id: &str, minutes: i64) -> &Self {
        self.conn
            .execute(
                "INSERT INTO downtime (availability_loss_id, station_id, duration, timestamp) VALUES (?1, ?2, ?3, ?4)",
                params![availability_loss_id, station_id, minutes, format_timestamp(ts)],
            )
            .unwrap();
        self
    }
}
