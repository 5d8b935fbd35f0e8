//! 동기화 작업 상태.
//!
//! 이 모듈은 시장별 마지막 동기화 결과를 나타내는 타입을 정의합니다:
//! - `SyncState` - 작업 상태 (완료, 실행 중, 실패, 미실행, 알 수 없음)
//! - `SyncStatus` - 상태 + 처리 건수 + 완료 시각

use crate::types::{Source, SyncJob};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 동기화 작업 상태.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// 정상 완료
    Completed,
    /// 실행 중 (트리거가 이미 실행 중인 작업에 막힌 경우 포함)
    #[serde(alias = "already_running")]
    Running,
    /// 실패
    Failed,
    /// 한 번도 실행되지 않음
    NeverRun,
    /// 해석할 수 없는 상태 (예: `idle`)
    #[default]
    #[serde(other)]
    Unknown,
}

impl SyncState {
    /// 와이어 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncState::Completed => "completed",
            SyncState::Running => "running",
            SyncState::Failed => "failed",
            SyncState::NeverRun => "never_run",
            SyncState::Unknown => "unknown",
        }
    }

    /// 작업이 끝난 상태인지 확인합니다.
    pub fn is_finished(&self) -> bool {
        matches!(self, SyncState::Completed | SyncState::Failed)
    }
}

/// 한 시장의 마지막 동기화 결과.
///
/// 응답마다 통째로 교체되며 부분 병합하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// 작업 식별자 (예: `stock_basics_hk`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    /// 작업 상태
    #[serde(default)]
    pub status: SyncState,
    /// 조회된 종목 수
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// 신규 저장 건수
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted: Option<u64>,
    /// 갱신 건수
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<u64>,
    /// 에러 건수
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<u64>,
    /// 작업 시작 시각
    #[serde(
        default,
        alias = "startedAt",
        with = "flexible_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub started_at: Option<DateTime<Utc>>,
    /// 마지막 완료 시각
    #[serde(
        default,
        alias = "finishedAt",
        with = "flexible_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub finished_at: Option<DateTime<Utc>>,
    /// 상세 메시지 (실패 시 사유)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 시장 코드 (`HK`, `US`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    /// 데이터 종류 (예: `stock_basics`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// 데이터 소스 (예: `akshare`, `alphavantage`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
}

impl SyncStatus {
    /// 주어진 상태만 가진 값을 생성합니다.
    pub fn new(status: SyncState) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    /// 한 번도 실행되지 않은 시장의 상태를 생성합니다.
    pub fn never_run(source: Source) -> Self {
        Self::never_run_job(source, SyncJob::StockBasics)
    }

    /// 한 번도 실행되지 않은 작업의 상태를 생성합니다.
    pub fn never_run_job(source: Source, job: SyncJob) -> Self {
        Self {
            job: Some(job.job_key(source)),
            status: SyncState::NeverRun,
            market: Some(source.market_code().to_string()),
            data_type: Some(job.as_str().to_string()),
            ..Default::default()
        }
    }

    /// 처리 건수를 설정합니다.
    pub fn with_counts(mut self, total: u64, inserted: u64, updated: u64, errors: u64) -> Self {
        self.total = Some(total);
        self.inserted = Some(inserted);
        self.updated = Some(updated);
        self.errors = Some(errors);
        self
    }

    /// 완료 시각을 설정합니다.
    pub fn with_finished_at(mut self, finished_at: DateTime<Utc>) -> Self {
        self.finished_at = Some(finished_at);
        self
    }

    /// 메시지를 설정합니다.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// 한 번도 실행되지 않았는지 확인합니다.
    ///
    /// 이 경우 건수와 완료 시각은 의미가 없으므로 표시하지 않습니다.
    pub fn is_never_run(&self) -> bool {
        self.status == SyncState::NeverRun
    }
}

/// RFC 3339 또는 타임존 없는 ISO-8601 타임스탬프를 읽습니다.
///
/// 타임존 없는 값은 로컬 시각으로 해석합니다.
pub mod flexible_timestamp {
    use crate::error::{CoreError, CoreResult};
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    /// 문자열을 UTC 시각으로 해석합니다.
    pub fn parse(raw: &str) -> CoreResult<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| {
                NaiveDateTime::parse_from_str(raw, fmt)
                    .ok()
                    .and_then(|naive| Local.from_local_datetime(&naive).earliest())
                    .map(|local| local.with_timezone(&Utc))
            })
            .ok_or_else(|| CoreError::InvalidTimestamp(raw.to_string()))
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse(s).map(Some).map_err(serde::de::Error::custom),
        }
    }
}
