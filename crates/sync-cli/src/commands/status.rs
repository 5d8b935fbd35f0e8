//! `status` 명령: 시장별 마지막 동기화 상태 출력.

use super::render::{render_job_status, render_job_unavailable};
use anyhow::Result;
use sync_client::{PanelSnapshot, SyncPanelController};
use sync_core::{JobSlot, Source, SyncJob};

/// 상태 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// 상태를 조회해 출력합니다.
///
/// 조회 실패는 컨트롤러가 로그로 남기므로 여기서는 안내만 출력합니다.
pub async fn show_status(
    controller: &SyncPanelController,
    sources: &[Source],
    job: SyncJob,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = if job == SyncJob::StockBasics && sources.len() > 1 {
        controller.refresh_all().await
    } else {
        for &source in sources {
            controller.refresh_job(JobSlot::new(source, job)).await;
        }
        controller.snapshot().await
    };

    print!("{}", format_snapshot(&snapshot, sources, job, format)?);
    Ok(())
}

/// 스냅샷을 출력 문자열로 만듭니다.
///
/// JSON 출력도 텍스트와 같은 표시 모델을 사용하므로 `never_run` 시장에는
/// 건수와 완료 시각이 실리지 않습니다.
pub fn format_snapshot(
    snapshot: &PanelSnapshot,
    sources: &[Source],
    job: SyncJob,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut map = serde_json::Map::new();
            for &source in sources {
                let value = match snapshot.job_view(JobSlot::new(source, job)) {
                    Some(view) => serde_json::to_value(view)?,
                    None => serde_json::Value::Null,
                };
                map.insert(source.as_str().to_string(), value);
            }
            Ok(format!(
                "{}\n",
                serde_json::to_string_pretty(&serde_json::Value::Object(map))?
            ))
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for &source in sources {
                let slot = JobSlot::new(source, job);
                match snapshot.job_view(slot) {
                    Some(view) => out.push_str(&render_job_status(slot, &view)),
                    None => out.push_str(&render_job_unavailable(slot)),
                }
            }
            Ok(out)
        }
    }
}
