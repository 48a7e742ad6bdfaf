// ==========================================
// 产线 OEE 驾驶舱 - 领域类型定义
// ==========================================
// 班次 (Shift) 与工时类型 (WorkingTimeType)
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 班次 (Shift)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shift {
    Day,   // 白班
    Night, // 夜班
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Day => write!(f, "DAY"),
            Shift::Night => write!(f, "NIGHT"),
        }
    }
}

impl FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DAY" => Ok(Shift::Day),
            "NIGHT" => Ok(Shift::Night),
            other => Err(format!("未知班次: {}", other)),
        }
    }
}

// ==========================================
// 工时类型 (Working Time Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkingTimeType {
    NotOvertime, // 正常工时
    Overtime,    // 加班
}

impl WorkingTimeType {
    /// 驾驶舱展示用的短标签
    pub fn short_label(&self) -> &'static str {
        match self {
            WorkingTimeType::NotOvertime => "NO OT",
            WorkingTimeType::Overtime => "OT",
        }
    }
}

impl fmt::Display for WorkingTimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkingTimeType::NotOvertime => write!(f, "NOT_OVERTIME"),
            WorkingTimeType::Overtime => write!(f, "OVERTIME"),
        }
    }
}

impl FromStr for WorkingTimeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NOT_OVERTIME" => Ok(WorkingTimeType::NotOvertime),
            "OVERTIME" => Ok(WorkingTimeType::Overtime),
            other => Err(format!("未知工时类型: {}", other)),
        }
    }
}
