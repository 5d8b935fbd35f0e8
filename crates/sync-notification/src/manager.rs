//! 여러 전송기를 묶는 알림 관리자.

use crate::types::{Notification, NotificationResult, NotificationSender};
use async_trait::async_trait;
use tracing::error;

/// 활성화된 모든 전송기로 알림을 보냅니다.
pub struct NotificationManager {
    senders: Vec<Box<dyn NotificationSender>>,
}

impl NotificationManager {
    /// 새 알림 관리자를 생성합니다.
    pub fn new() -> Self {
        Self {
            senders: Vec::new(),
        }
    }

    /// 알림 전송기를 추가합니다.
    pub fn add_sender<S: NotificationSender + 'static>(&mut self, sender: S) {
        self.senders.push(Box::new(sender));
    }

    /// 활성화된 전송기 수.
    pub fn enabled_count(&self) -> usize {
        self.senders.iter().filter(|s| s.is_enabled()).count()
    }

    /// 활성화된 모든 전송기를 통해 알림을 전송합니다.
    pub async fn notify(&self, notification: &Notification) -> NotificationResult<()> {
        let mut last_error = None;

        for sender in &self.senders {
            if sender.is_enabled() {
                if let Err(e) = sender.send(notification).await {
                    error!("Failed to send notification via {}: {}", sender.name(), e);
                    last_error = Some(e);
                }
            }
        }

        if let Some(e) = last_error {
            // 전송기가 하나뿐일 때만 에러를 돌려줍니다
            if self.enabled_count() == 1 {
                return Err(e);
            }
        }

        Ok(())
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSender for NotificationManager {
    async fn send(&self, notification: &Notification) -> NotificationResult<()> {
        self.notify(notification).await
    }

    fn is_enabled(&self) -> bool {
        self.enabled_count() > 0
    }

    fn name(&self) -> &str {
        "manager"
    }
}
