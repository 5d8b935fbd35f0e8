//! 동기화 작업 종류.
//!
//! 백엔드는 시장마다 세 가지 작업을 돌립니다:
//! - `StockBasics` - 종목 기본정보 (`stock_basics_hk`)
//! - `Quotes` - 실시간 시세 (`quotes_hk`)
//! - `Historical` - 최근 N일 일봉 (`historical_hk`)

use super::source::Source;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 과거 데이터 동기화 기본 기간 (일).
pub const DEFAULT_HISTORICAL_DAYS: u32 = 30;

/// 동기화 작업 종류.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SyncJob {
    #[default]
    StockBasics,
    Quotes,
    Historical,
}

impl SyncJob {
    /// 모든 작업 종류.
    pub const ALL: [SyncJob; 3] = [SyncJob::StockBasics, SyncJob::Quotes, SyncJob::Historical];

    /// 백엔드 `data_type` 값.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncJob::StockBasics => "stock_basics",
            SyncJob::Quotes => "quotes",
            SyncJob::Historical => "historical",
        }
    }

    /// 사용자에게 보여주는 작업 이름.
    pub fn display_name(&self) -> &'static str {
        match self {
            SyncJob::StockBasics => "基础信息",
            SyncJob::Quotes => "实时行情",
            SyncJob::Historical => "历史数据",
        }
    }

    /// 백엔드 작업 키 (예: `quotes_us`).
    pub fn job_key(&self, source: Source) -> String {
        format!("{}_{}", self.as_str(), source.as_str())
    }

    /// 기간 파라미터를 받는 작업인지 확인합니다.
    pub fn takes_days(&self) -> bool {
        matches!(self, SyncJob::Historical)
    }
}

impl fmt::Display for SyncJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncJob {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stock_basics" | "basics" => Ok(SyncJob::StockBasics),
            "quotes" | "quote" => Ok(SyncJob::Quotes),
            "historical" | "history" => Ok(SyncJob::Historical),
            other => Err(CoreError::InvalidJob(other.to_string())),
        }
    }
}

/// 시장 + 작업 조합. 순서 가드와 진행 중 표시의 단위입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct JobSlot {
    pub source: Source,
    pub job: SyncJob,
}

impl JobSlot {
    pub fn new(source: Source, job: SyncJob) -> Self {
        Self { source, job }
    }

    /// 기본정보 작업 슬롯.
    pub fn basics(source: Source) -> Self {
        Self::new(source, SyncJob::StockBasics)
    }
}

impl fmt::Display for JobSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.job.job_key(self.source))
    }
}
