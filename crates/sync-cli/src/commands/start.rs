//! `start` 명령: 보조 서비스를 띄우고 감시 프로세스로 넘깁니다.
//!
//! 1. `docker info`로 컨테이너 런타임 확인 (실패 시 종료 코드 1)
//! 2. `docker compose up -d <services>`
//! 3. 대기 시간만큼 대기
//! 4. 감시 프로세스 실행 후 종료 코드 전달

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use sync_core::LauncherConfig;
use tokio::process::Command;
use tracing::{error, info};

/// 런타임 확인 실패 시 종료 코드.
pub const DOCKER_UNAVAILABLE_EXIT_CODE: i32 = 1;

/// 설정에서 만든 실행 계획.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub project_dir: PathBuf,
    pub compose_args: Vec<String>,
    pub watchdog_program: String,
    pub watchdog_args: Vec<String>,
    pub grace_period: Duration,
    pub docker_timeout: Duration,
}

impl LaunchPlan {
    /// 설정을 검증하고 실행 계획을 만듭니다.
    pub fn from_config(config: &LauncherConfig) -> Result<Self> {
        let Some((program, args)) = config.watchdog_command.split_first() else {
            bail!("launcher.watchdog_command is empty");
        };

        Ok(Self {
            project_dir: PathBuf::from(&config.project_dir),
            compose_args: compose_up_args(&config.compose_services),
            watchdog_program: program.clone(),
            watchdog_args: args.to_vec(),
            grace_period: config.grace_period(),
            docker_timeout: config.docker_timeout(),
        })
    }
}

/// `docker` 뒤에 붙을 compose 인자.
pub fn compose_up_args(services: &[String]) -> Vec<String> {
    let mut args = vec!["compose".to_string(), "up".to_string(), "-d".to_string()];
    args.extend(services.iter().cloned());
    args
}

/// 명령이 제한 시간 안에 성공하는지 확인합니다. 출력은 버립니다.
pub async fn command_succeeds(program: &str, args: &[&str], limit: Duration) -> bool {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    match tokio::time::timeout(limit, cmd.status()).await {
        Ok(Ok(status)) => status.success(),
        Ok(Err(e)) => {
            error!(program, error = %e, "Failed to run command");
            false
        }
        Err(_) => {
            error!(program, timeout_secs = limit.as_secs(), "Command timed out");
            false
        }
    }
}

/// 자식 프로세스를 실행하고 종료 코드를 반환합니다. 표준 입출력은 상속합니다.
///
/// 시그널로 종료되어 코드가 없으면 1을 반환합니다.
pub async fn run_inherited(program: &str, args: &[String], dir: &Path) -> Result<i32> {
    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .with_context(|| format!("failed to spawn {}", program))?;

    Ok(status.code().unwrap_or(1))
}

/// 스택을 기동합니다. 반환값은 프로세스 종료 코드입니다.
pub async fn run_start(config: &LauncherConfig) -> Result<i32> {
    let plan = LaunchPlan::from_config(config)?;

    println!("\n🐳 Docker 상태 확인 중...");
    if !command_succeeds("docker", &["info"], plan.docker_timeout).await {
        error!("Docker is not running or not reachable");
        println!("❌ Docker가 실행 중이 아닙니다. Docker를 먼저 시작하세요.");
        return Ok(DOCKER_UNAVAILABLE_EXIT_CODE);
    }

    println!("🚀 보조 서비스 시작: {}", config.compose_services.join(", "));
    let code = run_inherited("docker", &plan.compose_args, &plan.project_dir).await?;
    if code != 0 {
        bail!("docker compose up failed with exit code {}", code);
    }

    info!(
        grace_secs = plan.grace_period.as_secs(),
        "Waiting for services to become ready"
    );
    tokio::time::sleep(plan.grace_period).await;

    println!(
        "👀 감시 프로세스 실행: {} {}",
        plan.watchdog_program,
        plan.watchdog_args.join(" ")
    );
    let code = run_inherited(&plan.watchdog_program, &plan.watchdog_args, &plan.project_dir).await?;
    info!(code, "Watchdog exited");

    Ok(code)
}
