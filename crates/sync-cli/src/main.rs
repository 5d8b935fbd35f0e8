//! 해외 시장 동기화 콘솔 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 두 시장의 마지막 동기화 상태
//! syncctl status
//!
//! # 홍콩 시장 강제 동기화
//! syncctl sync hk --force
//!
//! # 미국 시장 최근 60일 과거 데이터
//! syncctl sync us --job historical --days 60
//! syncctl status us --job historical
//!
//! # 전체 동기화
//! syncctl sync-all
//!
//! # 백엔드 / 데이터 소스 점검
//! syncctl health
//! syncctl source-health us
//!
//! # 보조 서비스 + 감시 프로세스 기동
//! syncctl start
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::Path;
use sync_cli::commands::{
    build_controller, health, parse_sources, start, status, sync as sync_cmd,
};
use sync_client::SyncApiClient;
use sync_core::{
    init_logging, AppConfig, JobSlot, LogConfig, Source, SyncJob, DEFAULT_CONFIG_PATH,
};
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "syncctl")]
#[command(about = "HK/US 시장 기본정보 동기화 콘솔", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// 로그 레벨 (설정 파일 값보다 우선, RUST_LOG보다는 후순위)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// 백엔드 URL (설정 파일 값보다 우선)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 마지막 동기화 상태 조회
    Status {
        /// 시장 (hk, us, all)
        source: Option<String>,

        /// 작업 종류 (stock_basics, quotes, historical)
        #[arg(long, default_value = "stock_basics")]
        job: SyncJob,

        /// JSON으로 출력
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// 시장 동기화 요청
    Sync {
        /// 시장 (hk, us)
        source: String,

        /// 최근 동기화 여부와 관계없이 강제 실행
        #[arg(short, long, default_value = "false")]
        force: bool,

        /// 작업 종류 (stock_basics, quotes, historical)
        #[arg(long, default_value = "stock_basics")]
        job: SyncJob,

        /// 과거 데이터 조회 기간 (일, historical 작업 전용)
        #[arg(long)]
        days: Option<u32>,
    },

    /// 두 시장 동기화를 한 번에 요청
    SyncAll {
        /// 최근 동기화 여부와 관계없이 강제 실행
        #[arg(short, long, default_value = "false")]
        force: bool,
    },

    /// 백엔드 헬스 체크
    Health,

    /// 데이터 소스 가용성 점검
    SourceHealth {
        /// 시장 (hk, us, all)
        source: Option<String>,
    },

    /// 보조 서비스와 감시 프로세스 기동
    Start {
        /// compose 파일이 있는 프로젝트 디렉토리
        #[arg(long)]
        project_dir: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config))?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    // 설정 파일이 없으면 RUST_LOG / LOG_FORMAT 환경 변수를 따름
    let config_file_present = Path::new(&cli.config).exists();
    let mut log_config = if config_file_present {
        LogConfig::from_settings(&config.logging)
    } else {
        LogConfig::from_env()
    };
    if let Some(level) = cli.log_level {
        log_config.level = level;
    }

    init_logging(log_config)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;
    debug!(
        base_url = %config.api.base_url,
        config_file_present,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Status { source, job, json } => {
            let sources = parse_sources(source.as_deref())?;
            let format = if json {
                status::OutputFormat::Json
            } else {
                status::OutputFormat::Text
            };
            let controller = build_controller(&config)?;
            status::show_status(&controller, &sources, job, format).await?;
        }

        Commands::Sync {
            source,
            force,
            job,
            days,
        } => {
            let source: Source = source.parse()?;
            if days.is_some() && !job.takes_days() {
                anyhow::bail!("--days is only supported for the historical job");
            }
            let controller = build_controller(&config)?;
            match job {
                SyncJob::StockBasics => sync_cmd::run_sync(&controller, source, force).await?,
                job => {
                    sync_cmd::run_job(&controller, JobSlot::new(source, job), force, days).await?
                }
            }
        }

        Commands::SyncAll { force } => {
            let controller = build_controller(&config)?;
            sync_cmd::run_sync_all(&controller, force).await?;
        }

        Commands::Health => {
            let client = SyncApiClient::new(&config.api)?;
            health::run_health(&client).await?;
        }

        Commands::SourceHealth { source } => {
            let sources = parse_sources(source.as_deref())?;
            let client = SyncApiClient::new(&config.api)?;
            health::run_source_health(&client, &sources).await?;
        }

        Commands::Start { project_dir } => {
            if let Some(dir) = project_dir {
                config.launcher.project_dir = dir;
            }
            let code = start::run_start(&config.launcher).await?;
            if code != 0 {
                error!(code, "Stack exited with non-zero status");
                std::process::exit(code);
            }
        }
    }

    Ok(())
}
