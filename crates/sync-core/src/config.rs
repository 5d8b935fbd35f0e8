//! 설정 관리.
//!
//! 선택적인 TOML 파일과 `SYNCCTL__` 접두사 환경 변수에서 설정을 읽습니다.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000"
//! timeout_secs = 60
//!
//! [launcher]
//! compose_services = ["mongodb", "redis"]
//! grace_period_secs = 5
//! ```

use crate::error::CoreResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "SYNCCTL";

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 백엔드 API 설정
    pub api: ApiConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 알림 설정
    pub notifications: NotificationConfig,
    /// 스택 실행기 설정
    pub launcher: LauncherConfig,
}

/// 백엔드 API 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// 백엔드 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (초). 동기화 작업은 오래 걸릴 수 있습니다.
    pub timeout_secs: u64,
    /// 연결 타임아웃 (초)
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 60,
            connect_timeout_secs: 5,
        }
    }
}

impl ApiConfig {
    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 연결 타임아웃을 Duration으로 반환
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

/// 알림 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// 터미널 알림 활성화 여부
    pub console: bool,
    /// 텔레그램 설정
    pub telegram: TelegramSettings,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            console: true,
            telegram: TelegramSettings::default(),
        }
    }
}

/// 텔레그램 알림 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TelegramSettings {
    /// 활성화 여부
    pub enabled: bool,
    /// 봇 토큰
    pub bot_token: String,
    /// 채팅 ID
    pub chat_id: String,
}

/// 스택 실행기 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// compose 파일이 있는 프로젝트 디렉토리
    pub project_dir: String,
    /// 먼저 띄울 보조 서비스 (문서 저장소, 캐시)
    pub compose_services: Vec<String>,
    /// 서비스 기동 후 대기 시간 (초)
    pub grace_period_secs: u64,
    /// `docker info` 응답 대기 시간 (초)
    pub docker_timeout_secs: u64,
    /// 감시 프로세스 실행 명령
    pub watchdog_command: Vec<String>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            project_dir: ".".to_string(),
            compose_services: vec!["mongodb".to_string(), "redis".to_string()],
            grace_period_secs: 5,
            docker_timeout_secs: 5,
            watchdog_command: vec!["python3".to_string(), "scripts/watchdog.py".to_string()],
        }
    }
}

impl LauncherConfig {
    /// 대기 시간을 Duration으로 반환
    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }

    /// docker 점검 타임아웃을 Duration으로 반환
    pub fn docker_timeout(&self) -> Duration {
        Duration::from_secs(self.docker_timeout_secs)
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없어도 에러가 아니며 기본값이 사용됩니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        dotenvy::dotenv().ok();

        let builder = config::Config::builder()
            // 파일에서 로드 (선택)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(" ")
                    .with_list_parse_key("launcher.compose_services")
                    .with_list_parse_key("launcher.watchdog_command")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
