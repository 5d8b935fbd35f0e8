//! 알림 타입 및 trait 정의.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sync_core::{JobSlot, Source, StatusTag, SyncJob, SyncState, SyncStatus, SyncTarget};

/// 알림 레벨.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// 정보성
    #[default]
    Info,
    /// 작업 성공
    Success,
    /// 주의 (작업은 끝났지만 결과가 정상이 아님)
    Warning,
    /// 에러 (요청 실패)
    Error,
}

/// 알림 이벤트 타입.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// 단일 시장 동기화 요청 완료
    SyncCompleted {
        source: Source,
        #[serde(default)]
        job: SyncJob,
        status: SyncState,
        total: Option<u64>,
        inserted: Option<u64>,
        updated: Option<u64>,
        message: Option<String>,
    },
    /// 전체 동기화 요청 완료
    SyncAllCompleted { hk: SyncState, us: SyncState },
    /// 동기화 요청 실패 (전송 실패 또는 백엔드 거부)
    SyncFailed { target: SyncTarget, message: String },
    /// 시세/과거 데이터 작업 요청 실패
    JobFailed {
        source: Source,
        job: SyncJob,
        message: String,
    },
    /// 사용자 정의 알림
    Custom { title: String, message: String },
}

impl NotificationEvent {
    /// 단일 시장 결과로부터 이벤트를 생성합니다.
    pub fn sync_completed(source: Source, status: &SyncStatus) -> Self {
        Self::job_completed(JobSlot::basics(source), status)
    }

    /// 작업 슬롯 결과로부터 이벤트를 생성합니다.
    pub fn job_completed(slot: JobSlot, status: &SyncStatus) -> Self {
        Self::SyncCompleted {
            source: slot.source,
            job: slot.job,
            status: status.status,
            total: status.total,
            inserted: status.inserted,
            updated: status.updated,
            message: status.message.clone(),
        }
    }

    /// 이벤트에 맞는 기본 레벨.
    ///
    /// 요청은 성공했지만 백엔드 작업이 실패로 끝난 경우는 경고로 취급합니다.
    pub fn default_level(&self) -> NotificationLevel {
        match self {
            Self::SyncCompleted { status, .. } => match status {
                SyncState::Completed => NotificationLevel::Success,
                SyncState::Failed => NotificationLevel::Warning,
                _ => NotificationLevel::Info,
            },
            Self::SyncAllCompleted { hk, us } => {
                if *hk == SyncState::Completed && *us == SyncState::Completed {
                    NotificationLevel::Success
                } else if *hk == SyncState::Failed || *us == SyncState::Failed {
                    NotificationLevel::Warning
                } else {
                    NotificationLevel::Info
                }
            }
            Self::SyncFailed { .. } | Self::JobFailed { .. } => NotificationLevel::Error,
            Self::Custom { .. } => NotificationLevel::Info,
        }
    }
}

/// 알림 메시지.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// 고유 알림 ID
    pub id: String,
    /// 알림 이벤트
    pub event: NotificationEvent,
    /// 레벨
    pub level: NotificationLevel,
    /// 타임스탬프
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// 새 알림을 생성합니다. 레벨은 이벤트에서 결정됩니다.
    pub fn new(event: NotificationEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            level: event.default_level(),
            event,
            timestamp: Utc::now(),
        }
    }

    /// 한 줄 요약 텍스트.
    pub fn summary(&self) -> String {
        match &self.event {
            NotificationEvent::SyncCompleted {
                source,
                job,
                status,
                total,
                inserted,
                updated,
                message,
            } => {
                let mut text = format!(
                    "{} 同步 {}",
                    subject(*source, *job),
                    StatusTag::for_state(*status).label
                );
                if *status != SyncState::NeverRun {
                    if let Some(total) = total {
                        text.push_str(&format!(" · 总数 {}", total));
                    }
                    if let Some(inserted) = inserted {
                        text.push_str(&format!(" · 新增 {}", inserted));
                    }
                    if let Some(updated) = updated {
                        text.push_str(&format!(" · 更新 {}", updated));
                    }
                }
                if let Some(message) = message {
                    text.push_str(&format!(" ({})", message));
                }
                text
            }
            NotificationEvent::SyncAllCompleted { hk, us } => {
                format!(
                    "港股 {} · 美股 {}",
                    StatusTag::for_state(*hk).label,
                    StatusTag::for_state(*us).label
                )
            }
            NotificationEvent::SyncFailed { target, message } => {
                format!("同步失败 [{}]: {}", target, message)
            }
            NotificationEvent::JobFailed {
                source,
                job,
                message,
            } => format!("同步失败 [{}]: {}", job.job_key(*source), message),
            NotificationEvent::Custom { title, message } => format!("{}: {}", title, message),
        }
    }
}

/// 알림 제목에 쓰는 대상 이름. 기본정보 작업은 시장 이름만 씁니다.
pub(crate) fn subject(source: Source, job: SyncJob) -> String {
    match job {
        SyncJob::StockBasics => source.display_name().to_string(),
        other => format!("{} {}", source.display_name(), other.display_name()),
    }
}

/// 알림 작업용 Result 타입.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// 알림 에러.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("알림 전송 실패: {0}")]
    SendFailed(String),

    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),

    #[error("요청 한도 초과: {0}초 후 재시도")]
    RateLimited(u64),

    #[error("네트워크 에러: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("출력 에러: {0}")]
    Io(#[from] std::io::Error),
}

/// 알림 전송기 trait.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 알림을 전송합니다.
    async fn send(&self, notification: &Notification) -> NotificationResult<()>;

    /// 전송기가 활성화되어 있는지 확인합니다.
    fn is_enabled(&self) -> bool;

    /// 전송기 이름을 반환합니다.
    fn name(&self) -> &str;
}
