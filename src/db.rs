// ==========================================
// 产线 OEE 驾驶舱 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发读写时的偶发 busy 错误
// - 统一时间戳写库格式（UTC，毫秒精度）；查询按 julianday 比较，兼容带偏移的存量数据
// ==========================================

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 时间戳写库格式: 2024-03-01T08:00:00.000Z
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 解析库内时间戳（接受任意 RFC3339 偏移，统一转为 UTC）
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
}

/// 初始化驾驶舱所需表结构（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS line (
            line_id INTEGER PRIMARY KEY,
            line_name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS station (
            station_id TEXT PRIMARY KEY,
            line_id INTEGER NOT NULL REFERENCES line(line_id),
            station_name TEXT NOT NULL,
            cycle_time REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS production_plan (
            plan_id INTEGER PRIMARY KEY,
            line_id INTEGER NOT NULL REFERENCES line(line_id),
            target INTEGER NOT NULL,
            group_name TEXT NOT NULL,
            shift TEXT NOT NULL,
            working_time_type TEXT NOT NULL,
            working_time_duration INTEGER NOT NULL,
            valid_date TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS model (
            model_id TEXT PRIMARY KEY,
            line_id INTEGER NOT NULL REFERENCES line(line_id)
        );

        CREATE TABLE IF NOT EXISTS product (
            product_id INTEGER PRIMARY KEY,
            model_id TEXT NOT NULL REFERENCES model(model_id),
            serial_number TEXT NOT NULL UNIQUE,
            is_goods INTEGER NOT NULL DEFAULT 0,
            timestamp TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS failure_detail (
            failure_detail_id INTEGER PRIMARY KEY,
            line_id INTEGER NOT NULL REFERENCES line(line_id),
            failure_type TEXT NOT NULL,
            details TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS product_failure (
            id INTEGER PRIMARY KEY,
            product_id INTEGER NOT NULL REFERENCES product(product_id),
            failure_detail_id INTEGER NOT NULL REFERENCES failure_detail(failure_detail_id),
            station_id TEXT NOT NULL REFERENCES station(station_id),
            timestamp TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS availability_loss (
            availability_loss_id INTEGER PRIMARY KEY,
            details TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS downtime (
            downtime_id INTEGER PRIMARY KEY,
            availability_loss_id INTEGER NOT NULL REFERENCES availability_loss(availability_loss_id),
            station_id TEXT NOT NULL REFERENCES station(station_id),
            duration INTEGER NOT NULL,
            timestamp TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_plan_line_date ON production_plan(line_id, valid_date);
        CREATE INDEX IF NOT EXISTS idx_product_ts ON product(timestamp);
        CREATE INDEX IF NOT EXISTS idx_product_failure_ts ON product_failure(timestamp);
        CREATE INDEX IF NOT EXISTS idx_downtime_ts ON downtime(timestamp);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
