//! CLI 명령어 구현 모듈.

pub mod health;
pub mod render;
pub mod start;
pub mod status;
pub mod sync;

use std::sync::Arc;
use sync_client::{SyncApiClient, SyncPanelController};
use sync_core::{AppConfig, NotificationConfig, Source};
use sync_notification::{ConsoleSender, NotificationManager, TelegramConfig, TelegramSender};

/// 설정에서 활성화된 전송기로 알림 관리자를 구성합니다.
pub fn build_notifier(config: &NotificationConfig) -> NotificationManager {
    let mut manager = NotificationManager::new();
    manager.add_sender(ConsoleSender::new(config.console));

    let telegram = TelegramConfig::from_settings(&config.telegram);
    if telegram.enabled {
        manager.add_sender(TelegramSender::new(telegram));
    }

    manager
}

/// 백엔드 클라이언트와 알림 관리자로 컨트롤러를 구성합니다.
pub fn build_controller(config: &AppConfig) -> anyhow::Result<SyncPanelController> {
    let client = SyncApiClient::new(&config.api)?;
    let notifier = build_notifier(&config.notifications);
    Ok(SyncPanelController::new(
        Arc::new(client),
        Arc::new(notifier),
    ))
}

/// `hk`, `us` 또는 생략(두 시장 모두)을 해석합니다.
pub fn parse_sources(raw: Option<&str>) -> anyhow::Result<Vec<Source>> {
    match raw {
        None => Ok(Source::ALL.to_vec()),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(Source::ALL.to_vec()),
        Some(value) => Ok(vec![value.parse::<Source>()?]),
    }
}
