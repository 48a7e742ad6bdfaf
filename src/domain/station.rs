// ==========================================
// 产线 OEE 驾驶舱 - 工位领域模型
// ==========================================

use serde::{Deserialize, Serialize};

/// 工位
///
/// `cycle_time` 与实时计划推算使用同一时间单位（分钟/件）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub station_id: String,
    pub line_id: i64,
    pub station_name: String,
    pub cycle_time: f64,
}

/// 选出瓶颈工位：节拍最大者，并列时取第一个
pub fn bottleneck_of(stations: &[Station]) -> Option<&Station> {
    stations.iter().fold(None, |best: Option<&Station>, s| match best {
        Some(b) if b.cycle_time >= s.cycle_time => Some(b),
        _ => Some(s),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, cycle_time: f64) -> Station {
        Station {
            station_id: id.to_string(),
            line_id: 1,
            station_name: format!("ST-{}", id),
            cycle_time,
        }
    }

    #[test]
    fn test_bottleneck_picks_max_cycle_time() {
        let stations = vec![station("A", 3.0), station("B", 7.5), station("C", 5.0)];
        assert_eq!(bottleneck_of(&stations).unwrap().station_id, "B");
    }

    #[test]
    fn test_bottleneck_tie_keeps_first() {
        let stations = vec![station("A", 4.0), station("B", 4.0)];
        assert_eq!(bottleneck_of(&stations).unwrap().station_id, "A");
    }

    #[test]
    fn test_bottleneck_empty_line() {
        assert!(bottleneck_of(&[]).is_none());
    }
}
