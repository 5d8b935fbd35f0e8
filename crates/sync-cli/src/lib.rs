//! 동기화 콘솔 CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 시장별 동기화 상태 조회
//! - 시장별 / 전체 동기화 트리거
//! - 백엔드 및 데이터 소스 점검
//! - 보조 서비스와 감시 프로세스 기동

pub mod commands;
