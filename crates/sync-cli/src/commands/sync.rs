//! `sync` / `sync-all` 명령: 동기화 트리거.
//!
//! 결과 알림은 컨트롤러가 알림 관리자로 보냅니다. 여기서는 결과 카드만 출력합니다.

use super::render::{render_job_status, render_status};
use anyhow::{bail, Result};
use sync_client::SyncPanelController;
use sync_core::{JobSlot, Source, SyncJob, SyncState, SyncStatusView};
use tracing::info;

/// 작업이 아직 끝나지 않았을 때 덧붙이는 안내.
pub const STILL_RUNNING_HINT: &str = "   ⏳ 后台仍在同步，请稍后使用 status 查看结果\n";

/// 결과 카드 뒤에 붙일 안내. 끝나지 않은 작업에만 붙습니다.
pub fn follow_up_hint(state: SyncState) -> Option<&'static str> {
    (!state.is_finished() && state != SyncState::NeverRun).then_some(STILL_RUNNING_HINT)
}

/// 한 시장의 동기화를 요청합니다.
pub async fn run_sync(controller: &SyncPanelController, source: Source, force: bool) -> Result<()> {
    run_job(controller, JobSlot::basics(source), force, None).await
}

/// 작업 슬롯의 동기화를 요청합니다.
pub async fn run_job(
    controller: &SyncPanelController,
    slot: JobSlot,
    force: bool,
    days: Option<u32>,
) -> Result<()> {
    match slot.job {
        SyncJob::StockBasics => println!(
            "\n🔄 {} 동기화 요청 중... (force={})",
            slot.source.display_name(),
            force
        ),
        job => println!(
            "\n🔄 {} {} 동기화 요청 중... (force={})",
            slot.source.display_name(),
            job.display_name(),
            force
        ),
    }

    match controller.trigger_job(slot, force, days).await {
        Ok(status) => {
            info!(%slot, status = status.status.as_str(), "Sync finished");
            let view = SyncStatusView::from(&status);
            print!("{}", render_job_status(slot, &view));
            if let Some(hint) = follow_up_hint(status.status) {
                print!("{}", hint);
            }
            Ok(())
        }
        Err(e) => bail!(e.user_message()),
    }
}

/// 두 시장의 동기화를 한 번에 요청합니다.
pub async fn run_sync_all(controller: &SyncPanelController, force: bool) -> Result<()> {
    println!("\n🔄 전체 시장 동기화 요청 중... (force={})", force);

    match controller.trigger_sync_all(force).await {
        Ok(result) => {
            for source in Source::ALL {
                let status = result.get(source);
                print!("{}", render_status(source, &SyncStatusView::from(status)));
                if let Some(hint) = follow_up_hint(status.status) {
                    print!("{}", hint);
                }
            }
            Ok(())
        }
        Err(e) => bail!(e.user_message()),
    }
}
