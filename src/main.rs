// ==========================================
// 产线 OEE 驾驶舱 - 命令行入口
// ==========================================
// 用法:
//   oee-dashboard day   --line 1 --shift DAY --date 2024-03-04
//   oee-dashboard week  --line 1 --shift NIGHT --start 2024-03-04 --end 2024-03-10
//   oee-dashboard month --line 1 --shift DAY --year 2024 --month 3
// 输出: 驾驶舱 JSON（stdout），日志写 stderr
// ==========================================

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use oee_dashboard::api::DashboardRequest;
use oee_dashboard::app::{get_default_db_path, AppState};
use oee_dashboard::{logging, Shift};

#[derive(Parser, Debug)]
#[command(name = "oee-dashboard", version, about = "产线 OEE 驾驶舱")]
struct Cli {
    /// 数据库路径（默认读取 OEE_DASHBOARD_DB_PATH 或用户数据目录）
    #[arg(long, global = true)]
    db: Option<String>,

    /// 美化输出
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 单日驾驶舱
    Day {
        #[arg(long)]
        line: i64,
        #[arg(long)]
        shift: Shift,
        #[arg(long)]
        date: NaiveDate,
    },
    /// 区间（周）驾驶舱，起止日期均包含
    Week {
        #[arg(long)]
        line: i64,
        #[arg(long)]
        shift: Shift,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },
    /// 自然月驾驶舱
    Month {
        #[arg(long)]
        line: i64,
        #[arg(long)]
        shift: Shift,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
    },
}

impl From<Command> for DashboardRequest {
    fn from(command: Command) -> Self {
        match command {
            Command::Day { line, shift, date } => DashboardRequest::Day {
                line_id: line,
                shift,
                date,
            },
            Command::Week {
                line,
                shift,
                start,
                end,
            } => DashboardRequest::Week {
                line_id: line,
                shift,
                start_date: start,
                end_date: end,
            },
            Command::Month {
                line,
                shift,
                year,
                month,
            } => DashboardRequest::Month {
                line_id: line,
                shift,
                year,
                month,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    tracing::info!("{} v{}", oee_dashboard::APP_NAME, oee_dashboard::VERSION);

    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    let request = DashboardRequest::from(cli.command);
    let response = state
        .dashboard_api
        .get_dashboard(request)
        .await
        .context("驾驶舱查询失败")?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", output);

    Ok(())
}
