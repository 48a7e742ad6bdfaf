// ==========================================
// 产线 OEE 驾驶舱 - 班次时刻表
// ==========================================
// 职责: 班次 × 工时类型 → 当日内起始分钟 + 时长
// 存储: config_kv 表 (key = dashboard/shift_calendar, JSON 数组)
// ==========================================

use crate::domain::types::{Shift, WorkingTimeType};
use serde::{Deserialize, Serialize};

/// 一天的分钟数
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// 单个班次时刻
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftTiming {
    pub shift: Shift,
    pub working_time_type: WorkingTimeType,
    /// 相对当日本地零点的起始分钟 [0, 1440)
    pub start_minute: i64,
    /// 持续分钟数 (> 0)；起始 + 时长超过 1440 即跨午夜
    pub duration_minutes: i64,
}

impl ShiftTiming {
    pub const fn new(
        shift: Shift,
        working_time_type: WorkingTimeType,
        start_minute: i64,
        duration_minutes: i64,
    ) -> Self {
        Self {
            shift,
            working_time_type,
            start_minute,
            duration_minutes,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if !(0..MINUTES_PER_DAY).contains(&self.start_minute) {
            return Err(format!(
                "班次 {} {} 起始分钟越界: {}",
                self.working_time_type, self.shift, self.start_minute
            ));
        }
        if self.duration_minutes <= 0 {
            return Err(format!(
                "班次 {} {} 时长必须大于0: {}",
                self.working_time_type, self.shift, self.duration_minutes
            ));
        }
        Ok(())
    }
}

// ==========================================
// ShiftCalendar - 班次时刻表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftCalendar {
    entries: Vec<ShiftTiming>,
}

impl Default for ShiftCalendar {
    /// 默认时刻表
    ///
    /// - DAY / NOT_OVERTIME: 08:00-17:00
    /// - DAY / OVERTIME: 08:00-20:00
    /// - NIGHT / NOT_OVERTIME: 20:00-次日05:00
    /// - NIGHT / OVERTIME: 20:00-次日08:00
    fn default() -> Self {
        Self {
            entries: vec![
                ShiftTiming::new(Shift::Day, WorkingTimeType::NotOvertime, 8 * 60, 9 * 60),
                ShiftTiming::new(Shift::Day, WorkingTimeType::Overtime, 8 * 60, 12 * 60),
                ShiftTiming::new(Shift::Night, WorkingTimeType::NotOvertime, 20 * 60, 9 * 60),
                ShiftTiming::new(Shift::Night, WorkingTimeType::Overtime, 20 * 60, 12 * 60),
            ],
        }
    }
}

impl ShiftCalendar {
    /// 从条目构建时刻表
    ///
    /// # 返回
    /// - Err: 条目越界或同一组合重复配置
    pub fn from_entries(entries: Vec<ShiftTiming>) -> Result<Self, String> {
        for (i, entry) in entries.iter().enumerate() {
            entry.validate()?;
            let duplicated = entries[..i].iter().any(|e| {
                e.shift == entry.shift && e.working_time_type == entry.working_time_type
            });
            if duplicated {
                return Err(format!(
                    "班次 {} {} 重复配置",
                    entry.working_time_type, entry.shift
                ));
            }
        }
        Ok(Self { entries })
    }

    /// 从 JSON 解析
    pub fn from_json(raw: &str) -> Result<Self, String> {
        let entries: Vec<ShiftTiming> =
            serde_json::from_str(raw).map_err(|e| format!("班次时刻表解析失败: {}", e))?;
        Self::from_entries(entries)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    /// 查询班次时刻（未配置返回 None）
    pub fn lookup(&self, shift: Shift, working_time_type: WorkingTimeType) -> Option<&ShiftTiming> {
        self.entries
            .iter()
            .find(|e| e.shift == shift && e.working_time_type == working_time_type)
    }

    pub fn entries(&self) -> &[ShiftTiming] {
        &self.entries
    }
}
