//! # Sync Client
//!
//! 해외 시장 동기화 백엔드의 상태 조회/트리거 클라이언트.
//!
//! - `SyncApiClient` - REST 엔드포인트 호출 (`reqwest`)
//! - `SyncApi` - 컨트롤러가 의존하는 trait (테스트에서 대체 가능)
//! - `SyncPanelController` - 상태 두 개와 로딩 플래그 세 개를 소유하고
//!   변경 시마다 스냅샷을 발행합니다

pub mod api;
pub mod client;
pub mod controller;
pub mod error;
pub mod state;

pub use api::SyncApi;
pub use client::SyncApiClient;
pub use controller::SyncPanelController;
pub use error::{SyncError, SyncResult};
pub use state::{LoadingFlags, PanelSnapshot};
