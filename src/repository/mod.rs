// ==========================================
// 产线 OEE 驾驶舱 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供按产线 + 时间窗口过滤的只读数据访问
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod production_data_repo;
pub mod production_data_repo_impl;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use production_data_repo::ProductionDataRepository;
pub use production_data_repo_impl::ProductionDataRepositoryImpl;
