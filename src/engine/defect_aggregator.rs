// ==========================================
// 产线 OEE 驾驶舱 - 不良 / 停机汇总
// ==========================================
// 职责: 窗口内事件按键去重汇总
// - 不良: 按 failure_detail_id 分组，sum = 件数
// - 停机: 按 availability_loss_id 分组，累加停机分钟
// 约束: 首次出现的事件作为代表；输出顺序 = 首次出现顺序
// ==========================================

use crate::domain::dashboard::{DowntimeDefect, FailureDefect};
use crate::domain::event::{DowntimeEvent, FailureEvent};
use std::collections::HashMap;

/// 汇总不良事件
///
/// # 返回
/// - (Vec<FailureDefect>, failure_total)
pub fn aggregate_failures(events: &[FailureEvent]) -> (Vec<FailureDefect>, i64) {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut defects: Vec<FailureDefect> = Vec::new();

    for event in events {
        match index.get(&event.failure_detail_id) {
            Some(&i) => defects[i].sum += 1,
            None => {
                index.insert(event.failure_detail_id, defects.len());
                defects.push(FailureDefect {
                    failure_detail_id: event.failure_detail_id,
                    station_name: event.station_name.clone(),
                    defect_type: event.defect_type.clone(),
                    details_text: event.details_text.clone(),
                    sum: 1,
                });
            }
        }
    }

    let total = defects.iter().map(|d| d.sum).sum();
    (defects, total)
}

/// 汇总停机事件
///
/// # 返回
/// - (Vec<DowntimeDefect>, downtime_total)
pub fn aggregate_downtime(events: &[DowntimeEvent]) -> (Vec<DowntimeDefect>, i64) {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut defects: Vec<DowntimeDefect> = Vec::new();

    for event in events {
        match index.get(&event.availability_loss_id) {
            Some(&i) => defects[i].downtime_minutes += event.duration_minutes,
            None => {
                index.insert(event.availability_loss_id, defects.len());
                defects.push(DowntimeDefect {
                    availability_loss_id: event.availability_loss_id,
                    station_id: event.station_id.clone(),
                    details_text: event.details_text.clone(),
                    downtime_minutes: event.duration_minutes,
                });
            }
        }
    }

    let total = defects.iter().map(|d| d.downtime_minutes).sum();
    (defects, total)
}
