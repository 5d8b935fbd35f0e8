//! 백엔드 응답 envelope.
//!
//! 모든 백엔드 응답은 `{ success, data, message }` 형식으로 감싸져 있습니다.
//! `success` 값에 따라 `ApiOutcome`으로 변환하여 양쪽 경우를 모두 처리합니다.

use crate::error::CoreError;
use crate::types::{Source, SyncJob, DEFAULT_HISTORICAL_DAYS};
use serde::{Deserialize, Serialize};

use super::SyncStatus;

/// 공통 응답 envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    /// 백엔드 처리 성공 여부
    #[serde(default)]
    pub success: bool,
    /// 응답 데이터 (성공 시)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// 메시지 (실패 시 사유). FastAPI 에러 본문의 `detail`도 허용합니다.
    #[serde(default, alias = "detail", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `success` 판별 결과.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    /// `success: true`
    Success(T),
    /// `success: false`
    Failure {
        /// 백엔드가 보낸 메시지
        message: Option<String>,
    },
}

impl<T> ApiEnvelope<T> {
    /// 성공 envelope을 생성합니다.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// 실패 envelope을 생성합니다.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// `success` 판별값에 따라 결과로 변환합니다.
    ///
    /// `success: true`인데 `data`가 없으면 프로토콜 위반입니다.
    pub fn into_outcome(self) -> Result<ApiOutcome<T>, CoreError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(ApiOutcome::Success(data)),
            (true, None) => Err(CoreError::Protocol(
                "success=true 응답에 data가 없습니다".to_string(),
            )),
            (false, _) => Ok(ApiOutcome::Failure {
                message: self.message.filter(|m| !m.trim().is_empty()),
            }),
        }
    }
}

/// 트리거 요청 본문.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRequest {
    /// 신선도 검사를 무시하고 강제로 재동기화
    #[serde(default)]
    pub force: bool,
    /// 과거 데이터 작업의 조회 기간 (일)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
}

impl SyncRequest {
    pub fn new(force: bool) -> Self {
        Self { force, days: None }
    }

    /// 작업에 맞는 요청 본문을 만듭니다.
    ///
    /// 기간은 과거 데이터 작업에만 실리며 지정하지 않으면 기본 30일입니다.
    pub fn for_job(job: SyncJob, force: bool, days: Option<u32>) -> Self {
        let days = job
            .takes_days()
            .then(|| days.unwrap_or(DEFAULT_HISTORICAL_DAYS));
        Self { force, days }
    }
}

/// 전체 동기화 응답 데이터.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncAllResult {
    pub hk: SyncStatus,
    pub us: SyncStatus,
}

impl SyncAllResult {
    /// 시장별 결과를 반환합니다.
    pub fn get(&self, source: Source) -> &SyncStatus {
        match source {
            Source::Hk => &self.hk,
            Source::Us => &self.us,
        }
    }
}
