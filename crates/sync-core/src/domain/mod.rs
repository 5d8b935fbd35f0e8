//! 동기화 상태와 백엔드 응답 도메인 모델.

mod envelope;
mod source_health;
pub mod sync_status;

pub use envelope::*;
pub use source_health::*;
pub use sync_status::{SyncState, SyncStatus};
