//! 동기화 콘솔 공통 에러 타입.
//!
//! 설정 로드, 입력 파싱, 응답 해석 과정에서 발생하는 에러를 정의합니다.
//! 백엔드 호출 에러(`TransportError`/`LogicalFailure`)는 `sync-client`에 있습니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 알 수 없는 시장 코드
    #[error("알 수 없는 시장: {0} (지원: hk, us)")]
    InvalidSource(String),

    /// 알 수 없는 작업 종류
    #[error("알 수 없는 작업: {0} (지원: stock_basics, quotes, historical)")]
    InvalidJob(String),

    /// 해석할 수 없는 타임스탬프
    #[error("잘못된 타임스탬프: {0}")]
    InvalidTimestamp(String),

    /// 응답 프로토콜 위반 (예: success=true 인데 data 없음)
    #[error("프로토콜 에러: {0}")]
    Protocol(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 핵심 작업용 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}
