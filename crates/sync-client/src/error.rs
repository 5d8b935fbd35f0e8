//! 동기화 클라이언트 에러 타입.
//!
//! 백엔드 호출 실패는 두 종류뿐입니다:
//! - `Transport` - 백엔드에 도달하지 못했거나 HTTP/프로토콜 수준에서 실패
//! - `Logical` - 백엔드가 응답했지만 `success: false`
//!
//! `InProgress`/`JobInProgress`는 요청을 보내기 전에 컨트롤러가 거부한 경우입니다.

use sync_core::{CoreError, JobSlot, SyncTarget};
use thiserror::Error;

/// 전송 실패 시 사용자에게 보여주는 기본 문구.
pub const GENERIC_TRANSPORT_MESSAGE: &str = "网络错误，请稍后重试";

/// 백엔드가 메시지 없이 거부했을 때의 문구.
pub const GENERIC_FAILURE_MESSAGE: &str = "同步请求失败";

/// 동기화 요청 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// 네트워크/HTTP 실패
    #[error("전송 에러: {0}")]
    Transport(String),

    /// 백엔드가 `success: false`로 응답
    #[error("백엔드 거부: {}", .message.as_deref().unwrap_or("(메시지 없음)"))]
    Logical { message: Option<String> },

    /// 같은 대상의 요청이 이미 진행 중
    #[error("이미 진행 중인 동기화: {0}")]
    InProgress(SyncTarget),

    /// 같은 작업 슬롯의 요청이 이미 진행 중
    #[error("이미 진행 중인 작업: {0}")]
    JobInProgress(JobSlot),
}

/// 동기화 요청용 Result 타입.
pub type SyncResult<T> = Result<T, SyncError>;

impl SyncError {
    /// 사용자 알림에 표시할 문구.
    ///
    /// 백엔드 메시지가 있으면 그대로, 없으면 기본 문구를 사용합니다.
    pub fn user_message(&self) -> String {
        match self {
            SyncError::Logical {
                message: Some(message),
            } => message.clone(),
            SyncError::Logical { message: None } => GENERIC_FAILURE_MESSAGE.to_string(),
            SyncError::Transport(detail) => format!("{}: {}", GENERIC_TRANSPORT_MESSAGE, detail),
            SyncError::InProgress(_) | SyncError::JobInProgress(_) => {
                "同步任务正在执行中".to_string()
            }
        }
    }

    /// 전송 에러인지 확인합니다.
    pub fn is_transport(&self) -> bool {
        matches!(self, SyncError::Transport(_))
    }

    /// 백엔드 거부인지 확인합니다.
    pub fn is_logical(&self) -> bool {
        matches!(self, SyncError::Logical { .. })
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SyncError::Transport(format!("요청 타임아웃: {}", err))
        } else {
            SyncError::Transport(err.to_string())
        }
    }
}

impl From<CoreError> for SyncError {
    fn from(err: CoreError) -> Self {
        SyncError::Transport(err.to_string())
    }
}
