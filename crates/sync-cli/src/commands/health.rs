//! `health` / `source-health` 명령.

use super::render::render_source_health;
use anyhow::{bail, Result};
use sync_client::SyncApiClient;
use sync_core::Source;
use tracing::warn;

/// 백엔드 헬스 체크.
pub async fn run_health(client: &SyncApiClient) -> Result<()> {
    println!("\n시스템 상태 확인 중... ({})", client.base_url());

    match client.backend_health().await {
        Ok(()) => {
            println!("✅ 동기화 백엔드: 정상");
            Ok(())
        }
        Err(e) => {
            println!("❌ 동기화 백엔드: 응답 없음");
            bail!("backend health check failed: {}", e)
        }
    }
}

/// 시장별 데이터 소스 점검.
///
/// 모든 시장을 점검한 뒤 하나라도 실패하면 에러를 반환합니다.
pub async fn run_source_health(client: &SyncApiClient, sources: &[Source]) -> Result<()> {
    let mut failures = 0usize;

    for &source in sources {
        match client.source_health(source).await {
            Ok(health) => {
                print!("{}", render_source_health(source, &health));
                if !health.available {
                    failures += 1;
                }
            }
            Err(e) => {
                warn!(%source, error = %e, "Source health check failed");
                println!("❌ {}: {}", source.display_name(), e.user_message());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} data source(s) unavailable", failures);
    }
    Ok(())
}
