//! 동기화 백엔드 추상화.
//!
//! 컨트롤러는 이 trait에만 의존합니다. 실제 구현은 `SyncApiClient`이며
//! 테스트에서는 스크립트된 구현으로 대체합니다.

use crate::error::SyncResult;
use async_trait::async_trait;
use sync_core::{JobSlot, Source, SyncAllResult, SyncStatus};

/// REST 경로.
pub mod endpoints {
    use sync_core::{JobSlot, Source, SyncJob};

    /// 백엔드 헬스 체크.
    pub const HEALTH: &str = "/api/health";

    /// 전체 동기화 트리거.
    pub const SYNC_ALL: &str = "/api/sync/multi-source/foreign/sync";

    /// 시장별 마지막 상태.
    pub fn status(source: Source) -> String {
        format!("/api/sync/multi-source/{}/status", source.as_str())
    }

    /// 시장별 동기화 트리거.
    pub fn sync(source: Source) -> String {
        format!("/api/sync/multi-source/{}/sync", source.as_str())
    }

    /// 작업별 마지막 상태. 기본정보 작업은 시장 경로를 그대로 씁니다.
    pub fn job_status(slot: JobSlot) -> String {
        match slot.job {
            SyncJob::StockBasics => status(slot.source),
            job => format!("/api/sync/multi-source/{}/{}/status", slot.source.as_str(), job),
        }
    }

    /// 작업별 동기화 트리거.
    pub fn job_sync(slot: JobSlot) -> String {
        match slot.job {
            SyncJob::StockBasics => sync(slot.source),
            job => format!("/api/sync/multi-source/{}/{}/sync", slot.source.as_str(), job),
        }
    }

    /// 시장별 데이터 소스 점검.
    pub fn source_health(source: Source) -> String {
        format!("/api/sync/multi-source/{}/source-health", source.as_str())
    }
}

/// 동기화 상태 조회 및 트리거.
#[async_trait]
pub trait SyncApi: Send + Sync {
    /// 시장의 마지막 동기화 상태를 조회합니다.
    async fn get_status(&self, source: Source) -> SyncResult<SyncStatus>;

    /// 시장 동기화를 요청하고 결과 상태를 반환합니다.
    async fn trigger_sync(&self, source: Source, force: bool) -> SyncResult<SyncStatus>;

    /// 두 시장을 한 번에 동기화합니다.
    async fn trigger_sync_all(&self, force: bool) -> SyncResult<SyncAllResult>;

    /// 시세/과거 데이터 작업의 마지막 상태를 조회합니다.
    async fn get_job_status(&self, slot: JobSlot) -> SyncResult<SyncStatus>;

    /// 시세/과거 데이터 작업을 요청합니다. `days`는 과거 데이터 작업에만 쓰입니다.
    async fn trigger_job(
        &self,
        slot: JobSlot,
        force: bool,
        days: Option<u32>,
    ) -> SyncResult<SyncStatus>;
}

#[cfg(test)]
mod tests {
    use super::endpoints;
    use sync_core::{JobSlot, Source, SyncJob};

    #[test]
    fn test_paths() {
        assert_eq!(
            endpoints::status(Source::Hk),
            "/api/sync/multi-source/hk/status"
        );
        assert_eq!(endpoints::sync(Source::Us), "/api/sync/multi-source/us/sync");
        assert_eq!(
            endpoints::source_health(Source::Us),
            "/api/sync/multi-source/us/source-health"
        );
    }

    #[test]
    fn test_job_paths() {
        assert_eq!(
            endpoints::job_status(JobSlot::new(Source::Hk, SyncJob::Quotes)),
            "/api/sync/multi-source/hk/quotes/status"
        );
        assert_eq!(
            endpoints::job_sync(JobSlot::new(Source::Us, SyncJob::Historical)),
            "/api/sync/multi-source/us/historical/sync"
        );
        assert_eq!(
            endpoints::job_sync(JobSlot::basics(Source::Us)),
            endpoints::sync(Source::Us)
        );
    }
}
