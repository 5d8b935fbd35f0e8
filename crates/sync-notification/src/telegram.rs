//! 텔레그램 알림 서비스.
//!
//! Telegram Bot API를 통해 동기화 결과를 전송합니다.

use crate::types::{
    subject, Notification, NotificationError, NotificationEvent, NotificationLevel,
    NotificationResult, NotificationSender,
};
use async_trait::async_trait;
use sync_core::{StatusTag, SyncState, TelegramSettings};
use tracing::{debug, error, info, warn};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// 텔레그램 알림 전송 설정.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// @BotFather에서 받은 봇 토큰
    pub bot_token: String,
    /// 메시지를 보낼 채팅 ID
    pub chat_id: String,
    /// 전송 활성화 여부
    pub enabled: bool,
    /// Bot API 기본 URL
    pub api_base: String,
}

impl TelegramConfig {
    /// 새 텔레그램 설정을 생성합니다.
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            bot_token,
            chat_id,
            enabled: true,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Bot API 기본 URL을 바꿉니다.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// 설정 파일 값에서 생성합니다.
    pub fn from_settings(settings: &TelegramSettings) -> Self {
        Self {
            bot_token: settings.bot_token.clone(),
            chat_id: settings.chat_id.clone(),
            enabled: settings.enabled,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// 텔레그램 알림 전송기.
pub struct TelegramSender {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramSender {
    /// 새 텔레그램 전송기를 생성합니다.
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// 알림을 텔레그램 메시지(HTML)로 포맷합니다.
    fn format_message(&self, notification: &Notification) -> String {
        let level_emoji = match notification.level {
            NotificationLevel::Info => "ℹ️",
            NotificationLevel::Success => "✅",
            NotificationLevel::Warning => "⚠️",
            NotificationLevel::Error => "🚨",
        };

        let content = match &notification.event {
            NotificationEvent::SyncCompleted {
                source,
                job,
                status,
                total,
                inserted,
                updated,
                message,
            } => {
                let mut lines = vec![format!(
                    "{level_emoji} <b>{} 동기화</b>\n\n상태: <code>{}</code>",
                    subject(*source, *job),
                    StatusTag::for_state(*status).label
                )];
                if *status != SyncState::NeverRun {
                    if let Some(total) = total {
                        lines.push(format!("총 종목: {total}"));
                    }
                    if let Some(inserted) = inserted {
                        lines.push(format!("신규: {inserted}"));
                    }
                    if let Some(updated) = updated {
                        lines.push(format!("갱신: {updated}"));
                    }
                }
                if let Some(message) = message {
                    lines.push(format!("메시지: {}", escape_html(message)));
                }
                lines.join("\n")
            }

            NotificationEvent::SyncAllCompleted { hk, us } => {
                format!(
                    "{level_emoji} <b>전체 동기화</b>\n\n\
                     港股: <code>{}</code>\n\
                     美股: <code>{}</code>",
                    StatusTag::for_state(*hk).label,
                    StatusTag::for_state(*us).label
                )
            }

            NotificationEvent::SyncFailed { target, message } => {
                format!(
                    "{level_emoji} <b>동기화 요청 실패</b>\n\n\
                     대상: <code>{target}</code>\n\
                     사유: {}",
                    escape_html(message)
                )
            }

            NotificationEvent::JobFailed {
                source,
                job,
                message,
            } => {
                format!(
                    "{level_emoji} <b>{} 동기화 요청 실패</b>\n\n\
                     작업: <code>{}</code>\n\
                     사유: {}",
                    subject(*source, *job),
                    job.job_key(*source),
                    escape_html(message)
                )
            }

            NotificationEvent::Custom { title, message } => {
                format!(
                    "{level_emoji} <b>{}</b>\n\n{}",
                    escape_html(title),
                    escape_html(message)
                )
            }
        };

        let timestamp = notification.timestamp.format("%Y-%m-%d %H:%M:%S UTC");
        format!("{content}\n\n<i>🕐 {timestamp}</i>")
    }

    /// 텔레그램에 원시 메시지를 전송합니다.
    async fn send_message(&self, text: &str) -> NotificationResult<()> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token
        );

        let params = serde_json::json!({
            "chat_id": self.config.chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });

        debug!(chat_id = %self.config.chat_id, "Sending Telegram message");

        let response = self
            .client
            .post(&url)
            .json(&params)
            .send()
            .await
            .map_err(NotificationError::NetworkError)?;

        if response.status().is_success() {
            info!("Telegram notification sent successfully");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                warn!("Telegram rate limited");
                return Err(NotificationError::RateLimited(60));
            }

            error!("Failed to send Telegram message: {} - {}", status, body);
            Err(NotificationError::SendFailed(format!(
                "HTTP {}: {}",
                status, body
            )))
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[async_trait]
impl NotificationSender for TelegramSender {
    async fn send(&self, notification: &Notification) -> NotificationResult<()> {
        if !self.is_enabled() {
            debug!("Telegram notifications are disabled, skipping");
            return Ok(());
        }

        let message = self.format_message(notification);
        self.send_message(&message).await
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled && !self.config.bot_token.is_empty() && !self.config.chat_id.is_empty()
    }

    fn name(&self) -> &str {
        "telegram"
    }
}
