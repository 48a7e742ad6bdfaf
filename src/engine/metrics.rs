// ==========================================
// 产线 OEE 驾驶舱 - 指标计算
// ==========================================
// OEE = Availability × Performance × Quality
// 纯函数，无副作用；输入不做截断（负值原样参与计算）
// ==========================================

use crate::domain::dashboard::MetricPercentages;

/// 指标计算输入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricInputs {
    pub target: i64,
    pub actual: i64,
    pub failure_total: i64,
    pub downtime_total: i64,
    pub working_minutes: i64,
}

/// 计算四项百分比（未取整）
///
/// - performance = actual * 100 / target
/// - quality = (actual - failure_total) * 100 / actual
/// - availability = (working - downtime) * 100 / working
/// - oee = performance * availability * quality / 10000
///
/// 分母为 0 时对应项为 0
pub fn compute_metrics(inputs: MetricInputs) -> MetricPercentages {
    let MetricInputs {
        target,
        actual,
        failure_total,
        downtime_total,
        working_minutes,
    } = inputs;

    let performance = if target > 0 {
        actual as f64 * 100.0 / target as f64
    } else {
        0.0
    };
    let quality = if actual > 0 {
        (actual - failure_total) as f64 * 100.0 / actual as f64
    } else {
        0.0
    };
    let availability = if working_minutes > 0 {
        (working_minutes - downtime_total) as f64 * 100.0 / working_minutes as f64
    } else {
        0.0
    };
    let oee = performance * availability * quality / 10_000.0;

    MetricPercentages {
        availability,
        performance,
        quality,
        oee,
    }
}

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 计算并逐项保留两位小数（对外展示口径）
pub fn compute_rounded_metrics(inputs: MetricInputs) -> MetricPercentages {
    let raw = compute_metrics(inputs);
    MetricPercentages {
        availability: round2(raw.availability),
        performance: round2(raw.performance),
        quality: round2(raw.quality),
        oee: round2(raw.oee),
    }
}
