//! 동기화 백엔드 REST 클라이언트.
//!
//! 모든 응답은 `{ success, data, message }` envelope으로 해석합니다.
//!
//! # 지원 기능
//!
//! - 시장별 마지막 동기화 상태 조회
//! - 시장별 / 전체 동기화 트리거
//! - 시세 / 과거 데이터 작업 조회 및 트리거
//! - 데이터 소스 점검
//! - 백엔드 헬스 체크

use crate::api::{endpoints, SyncApi};
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use sync_core::{
    ApiConfig, ApiEnvelope, ApiOutcome, JobSlot, Source, SourceHealth, SyncAllResult,
    SyncRequest, SyncStatus,
};
use tracing::{debug, error, info};

/// 에러 메시지에 포함할 응답 본문 최대 길이.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// 동기화 백엔드 REST 클라이언트.
#[derive(Debug, Clone)]
pub struct SyncApiClient {
    base_url: String,
    client: Client,
}

impl SyncApiClient {
    /// 설정으로 클라이언트를 생성합니다.
    pub fn new(config: &ApiConfig) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| SyncError::Transport(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self::with_client(&config.base_url, client))
    }

    /// 미리 구성한 `reqwest::Client`로 생성합니다.
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// 백엔드 기본 URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================
    // Envelope helpers
    // ========================================

    async fn get_envelope<T: DeserializeOwned>(&self, path: &str) -> SyncResult<T> {
        let url = self.url(path);
        debug!(%url, "GET");

        let response = self.client.get(&url).send().await?;
        Self::read_envelope(response).await
    }

    async fn post_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &SyncRequest,
    ) -> SyncResult<T> {
        let url = self.url(path);
        debug!(%url, force = body.force, days = ?body.days, "POST");

        let response = self.client.post(&url).json(body).send().await?;
        Self::read_envelope(response).await
    }

    /// 응답을 envelope으로 해석합니다.
    ///
    /// 2xx가 아닌 응답도 본문에 메시지가 있으면 백엔드 거부로 취급합니다.
    async fn read_envelope<T: DeserializeOwned>(response: Response) -> SyncResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(env) = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body) {
                if let Some(message) = env.message.filter(|m| !m.trim().is_empty()) {
                    error!(status = status.as_u16(), %message, "Backend rejected request");
                    return Err(SyncError::Logical {
                        message: Some(message),
                    });
                }
            }

            error!(status = status.as_u16(), "Backend request failed");
            return Err(SyncError::Transport(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate(&body, MAX_ERROR_BODY_CHARS)
            )));
        }

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)
            .map_err(|e| SyncError::Transport(format!("응답 파싱 실패: {}", e)))?;

        match envelope.into_outcome()? {
            ApiOutcome::Success(data) => Ok(data),
            ApiOutcome::Failure { message } => Err(SyncError::Logical { message }),
        }
    }

    // ========================================
    // Extra endpoints
    // ========================================

    /// 데이터 소스 가용성을 점검합니다.
    pub async fn source_health(&self, source: Source) -> SyncResult<SourceHealth> {
        self.get_envelope(&endpoints::source_health(source)).await
    }

    /// 백엔드 헬스 체크. HTTP 200이면 정상입니다.
    pub async fn backend_health(&self) -> SyncResult<()> {
        let url = self.url(endpoints::HEALTH);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            Err(SyncError::Transport(format!("HTTP {}", status.as_u16())))
        }
    }
}

#[async_trait]
impl SyncApi for SyncApiClient {
    async fn get_status(&self, source: Source) -> SyncResult<SyncStatus> {
        self.get_envelope(&endpoints::status(source)).await
    }

    async fn trigger_sync(&self, source: Source, force: bool) -> SyncResult<SyncStatus> {
        info!(%source, force, "Triggering sync");
        self.post_envelope(&endpoints::sync(source), &SyncRequest::new(force))
            .await
    }

    async fn trigger_sync_all(&self, force: bool) -> SyncResult<SyncAllResult> {
        info!(force, "Triggering sync for all sources");
        self.post_envelope(endpoints::SYNC_ALL, &SyncRequest::new(force))
            .await
    }

    async fn get_job_status(&self, slot: JobSlot) -> SyncResult<SyncStatus> {
        self.get_envelope(&endpoints::job_status(slot)).await
    }

    async fn trigger_job(
        &self,
        slot: JobSlot,
        force: bool,
        days: Option<u32>,
    ) -> SyncResult<SyncStatus> {
        info!(%slot, force, "Triggering job");
        let body = SyncRequest::for_job(slot.job, force, days);
        self.post_envelope(&endpoints::job_sync(slot), &body).await
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}…", cut)
    }
}
