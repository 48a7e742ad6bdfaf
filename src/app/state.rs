// ==========================================
// 产线 OEE 驾驶舱 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::DashboardApi;
use crate::config::config_manager::{ConfigManager, DashboardSettings};
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::ProductionDataRepositoryImpl;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "OEE_DASHBOARD_DB_PATH";

/// 应用状态
///
/// 包含驾驶舱API与启动时加载的配置
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 启动时加载的驾驶舱配置
    pub settings: DashboardSettings,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享连接并确保表结构存在
    /// 2. 从 config_kv 读取参考时区与班次时刻表
    /// 3. 创建仓储与API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("无法初始化表结构: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = ConfigManager::from_connection(conn.clone());
        let settings = config_manager
            .load_dashboard_settings()
            .map_err(|e| format!("无法加载驾驶舱配置: {}", e))?;

        let repo = Arc::new(ProductionDataRepositoryImpl::from_connection(conn));
        let dashboard_api = Arc::new(DashboardApi::new(repo, settings.clone()));

        tracing::info!(offset = %settings.reference_offset, "AppState初始化完成");

        Ok(Self {
            db_path,
            settings,
            dashboard_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 OEE_DASHBOARD_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./oee_dashboard.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("oee-dashboard");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("oee_dashboard.db");
        }
    }

    path.to_string_lossy().to_string()
}
