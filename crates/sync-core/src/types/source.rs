//! 동기화 대상 시장 정의.
//!
//! - `Source` - 동기화되는 시장 (홍콩, 미국)
//! - `SyncTarget` - 로딩 플래그 단위 (개별 시장 또는 전체)

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 동기화되는 시장.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// 홍콩 주식 (AKShare)
    Hk,
    /// 미국 주식 (Alpha Vantage)
    Us,
}

impl Source {
    /// 모든 시장 (표시 순서).
    pub const ALL: [Source; 2] = [Source::Hk, Source::Us];

    /// URL 경로 세그먼트 (`hk`, `us`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Hk => "hk",
            Source::Us => "us",
        }
    }

    /// 백엔드가 사용하는 시장 코드 (`HK`, `US`).
    pub fn market_code(&self) -> &'static str {
        match self {
            Source::Hk => "HK",
            Source::Us => "US",
        }
    }

    /// 사용자에게 보여주는 시장 이름.
    pub fn display_name(&self) -> &'static str {
        match self {
            Source::Hk => "港股",
            Source::Us => "美股",
        }
    }

    /// 백엔드 작업 키 (예: `stock_basics_hk`).
    pub fn job_key(&self) -> String {
        super::job::SyncJob::StockBasics.job_key(*self)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hk" | "hk_stocks" | "hongkong" => Ok(Source::Hk),
            "us" | "us_stocks" | "usa" => Ok(Source::Us),
            other => Err(CoreError::InvalidSource(other.to_string())),
        }
    }
}

/// 로딩 플래그가 붙는 트리거 단위.
///
/// `Hk`, `Us`, `All` 플래그는 서로 독립적입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncTarget {
    Hk,
    Us,
    All,
}

impl SyncTarget {
    /// 이 대상이 갱신하는 시장 목록.
    pub fn sources(&self) -> &'static [Source] {
        match self {
            SyncTarget::Hk => &[Source::Hk],
            SyncTarget::Us => &[Source::Us],
            SyncTarget::All => &Source::ALL,
        }
    }
}

impl From<Source> for SyncTarget {
    fn from(source: Source) -> Self {
        match source {
            Source::Hk => SyncTarget::Hk,
            Source::Us => SyncTarget::Us,
        }
    }
}

impl fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncTarget::Hk => write!(f, "hk"),
            SyncTarget::Us => write!(f, "us"),
            SyncTarget::All => write!(f, "all"),
        }
    }
}
