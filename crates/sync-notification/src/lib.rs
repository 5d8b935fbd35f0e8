//! # Sync Notification
//!
//! 동기화 결과를 사용자에게 알리는 포트와 전송기.
//!
//! 지원 채널:
//! - 터미널 (stderr 토스트)
//! - Telegram
//!
//! 컨트롤러는 `NotificationSender` trait만 알고, 실제 전송 방식은 주입받습니다.

pub mod console;
pub mod manager;
pub mod telegram;
pub mod types;

pub use console::*;
pub use manager::*;
pub use telegram::*;
pub use types::*;
