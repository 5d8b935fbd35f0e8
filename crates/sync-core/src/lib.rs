//! # Sync Core
//!
//! 해외 시장(홍콩/미국) 동기화 콘솔의 핵심 타입을 제공합니다.
//!
//! 이 크레이트는 콘솔 전반에서 사용되는 기본 타입을 제공합니다:
//! - 동기화 대상 시장(`Source`) 및 로딩 대상(`SyncTarget`)
//! - 백엔드 동기화 상태(`SyncStatus`)와 응답 envelope
//! - 상태 표시용 뷰 모델
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;
pub mod view;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
pub use view::*;
