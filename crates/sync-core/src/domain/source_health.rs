//! 데이터 소스 가용성 점검 결과.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 데이터 소스 점검 결과.
///
/// 백엔드가 AKShare / Alpha Vantage 어댑터의 사용 가능 여부를 보고합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceHealth {
    /// 데이터 소스 이름 (예: `akshare_hk`, `alphavantage_us`)
    pub source: String,
    /// 시장 코드 (`HK`, `US`)
    pub market: String,
    /// 사용 가능 여부
    pub available: bool,
    /// 점검 시각
    #[serde(
        default,
        with = "super::sync_status::flexible_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub checked_at: Option<DateTime<Utc>>,
    /// 상세 메시지
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
