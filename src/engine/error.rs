// ==========================================
// 产线 OEE 驾驶舱 - 引擎层错误类型
// ==========================================
// 约定:
// - 无匹配计划不是错误，由 Option::None 表达
// - 数据访问错误原样透传
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// 班次 / 工时类型组合未配置，或日历参数非法
    #[error("配置错误: {0}")]
    Configuration(String),

    /// 必要资源缺失（如产线没有工位，无法确定瓶颈工位）
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
