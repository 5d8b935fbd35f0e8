//! 터미널 알림.
//!
//! 알림을 stderr에 한 줄 토스트로 출력합니다. stdout은 상태 표 출력에 쓰입니다.

use crate::types::{Notification, NotificationLevel, NotificationResult, NotificationSender};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

/// 터미널 알림 전송기.
#[derive(Debug, Clone)]
pub struct ConsoleSender {
    enabled: bool,
}

impl ConsoleSender {
    /// 새 터미널 전송기를 생성합니다.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// 알림을 한 줄로 포맷합니다.
    pub fn format_line(notification: &Notification) -> String {
        let icon = match notification.level {
            NotificationLevel::Info => "ℹ️ ",
            NotificationLevel::Success => "✅",
            NotificationLevel::Warning => "⚠️ ",
            NotificationLevel::Error => "❌",
        };
        format!("{} {}\n", icon, notification.summary())
    }
}

impl Default for ConsoleSender {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl NotificationSender for ConsoleSender {
    async fn send(&self, notification: &Notification) -> NotificationResult<()> {
        let line = Self::format_line(notification);
        let mut stderr = tokio::io::stderr();
        stderr.write_all(line.as_bytes()).await?;
        stderr.flush().await?;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "console"
    }
}
