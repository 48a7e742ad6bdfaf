// ==========================================
// 产线 OEE 驾驶舱 - 配置管理器
// ==========================================
// 职责: 驾驶舱运行配置加载（参考时区、班次时刻表）
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::shift_calendar::ShiftCalendar;
use crate::db::open_sqlite_connection;
use chrono::{FixedOffset, Offset, Utc};
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 配置键
pub mod config_keys {
    /// 参考时区（相对 UTC 的分钟偏移）
    pub const UTC_OFFSET_MINUTES: &str = "dashboard/utc_offset_minutes";
    /// 班次时刻表 (JSON)
    pub const SHIFT_CALENDAR: &str = "dashboard/shift_calendar";
}

/// 默认参考时区: UTC+07:00
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 7 * 60;

// ==========================================
// DashboardSettings - 驾驶舱运行配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    /// 参考时区（固定偏移）
    pub reference_offset: FixedOffset,
    pub shift_calendar: ShiftCalendar,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            reference_offset: offset_from_minutes(DEFAULT_UTC_OFFSET_MINUTES)
                .unwrap_or_else(|| Utc.fix()),
            shift_calendar: ShiftCalendar::default(),
        }
    }
}

/// 分钟偏移 → FixedOffset（越界返回 None）
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(minutes.checked_mul(60)?)
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 配置值
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;

        Ok(())
    }

    /// 读取参考时区
    ///
    /// # 默认值
    /// - UTC+07:00
    pub fn get_reference_offset(&self) -> Result<FixedOffset, Box<dyn Error>> {
        let minutes = match self.get_config_value(config_keys::UTC_OFFSET_MINUTES)? {
            Some(raw) => raw
                .trim()
                .parse::<i32>()
                .map_err(|e| format!("{} 配置值无效: {} ({})", config_keys::UTC_OFFSET_MINUTES, raw, e))?,
            None => DEFAULT_UTC_OFFSET_MINUTES,
        };

        offset_from_minutes(minutes)
            .ok_or_else(|| format!("时区偏移越界: {} 分钟", minutes).into())
    }

    /// 读取班次时刻表（未配置时使用默认表）
    pub fn get_shift_calendar(&self) -> Result<ShiftCalendar, Box<dyn Error>> {
        match self.get_config_value(config_keys::SHIFT_CALENDAR)? {
            Some(raw) => Ok(ShiftCalendar::from_json(&raw)?),
            None => Ok(ShiftCalendar::default()),
        }
    }

    /// 加载驾驶舱运行配置
    pub fn load_dashboard_settings(&self) -> Result<DashboardSettings, Box<dyn Error>> {
        let settings = DashboardSettings {
            reference_offset: self.get_reference_offset()?,
            shift_calendar: self.get_shift_calendar()?,
        };

        tracing::debug!(
            offset = %settings.reference_offset,
            shifts = settings.shift_calendar.entries().len(),
            "驾驶舱配置已加载"
        );

        Ok(settings)
    }
}
