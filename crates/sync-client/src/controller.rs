//! 동기화 패널 컨트롤러.
//!
//! 두 시장의 마지막 상태와 세 개의 진행 중 플래그를 소유합니다.
//! 시세/과거 데이터 작업은 작업 슬롯별 상태와 진행 중 표시로 따로 관리합니다.
//! 상태가 바뀔 때마다 `watch` 채널로 스냅샷을 정확히 한 번 발행합니다.
//!
//! # 응답 순서
//!
//! 같은 슬롯에 대한 요청이 겹치면 늦게 도착한 오래된 응답이 최신 결과를
//! 덮어쓸 수 있습니다. 요청마다 슬롯별 티켓을 발급하고 다음 규칙으로 적용합니다:
//!
//! - 트리거 응답은 이미 적용된 트리거보다 나중에 발급된 경우에만 적용
//! - 조회 응답은 이미 적용된 응답보다 나중에 발급되었고 진행 중인 트리거가
//!   없을 때만 적용
//!
//! 버려진 응답은 debug 로그만 남깁니다. 트리거 호출자는 결과를 그대로 받습니다.

use crate::api::SyncApi;
use crate::error::{SyncError, SyncResult};
use crate::state::PanelSnapshot;
use std::collections::HashMap;
use std::sync::Arc;
use sync_core::{JobSlot, Source, SyncAllResult, SyncJob, SyncStatus, SyncTarget};
use sync_notification::{Notification, NotificationEvent, NotificationSender};
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    Fetch,
    Trigger,
}

/// 슬롯별 응답 순서 가드.
#[derive(Debug, Default)]
struct OrderingGuard {
    issued: u64,
    last_applied: u64,
    last_trigger_applied: u64,
    pending_triggers: u32,
}

impl OrderingGuard {
    fn issue(&mut self, kind: RequestKind) -> u64 {
        self.issued += 1;
        if kind == RequestKind::Trigger {
            self.pending_triggers += 1;
        }
        self.issued
    }

    fn settle(&mut self, kind: RequestKind) {
        if kind == RequestKind::Trigger {
            self.pending_triggers = self.pending_triggers.saturating_sub(1);
        }
    }

    fn accepts(&self, kind: RequestKind, ticket: u64) -> bool {
        match kind {
            RequestKind::Trigger => ticket > self.last_trigger_applied,
            RequestKind::Fetch => ticket > self.last_applied && self.pending_triggers == 0,
        }
    }

    fn mark_applied(&mut self, kind: RequestKind, ticket: u64) {
        self.last_applied = self.last_applied.max(ticket);
        if kind == RequestKind::Trigger {
            self.last_trigger_applied = ticket;
        }
    }
}

struct PanelInner {
    snapshot: PanelSnapshot,
    guards: HashMap<JobSlot, OrderingGuard>,
}

impl PanelInner {
    fn guard_mut(&mut self, slot: JobSlot) -> &mut OrderingGuard {
        self.guards.entry(slot).or_default()
    }
}

/// 동기화 패널 컨트롤러.
///
/// 네트워크 호출 중에는 내부 락을 잡지 않습니다.
pub struct SyncPanelController {
    api: Arc<dyn SyncApi>,
    notifier: Arc<dyn NotificationSender>,
    inner: RwLock<PanelInner>,
    updates: watch::Sender<PanelSnapshot>,
}

impl SyncPanelController {
    /// 새 컨트롤러를 생성합니다. 초기 상태는 비어 있습니다.
    pub fn new(api: Arc<dyn SyncApi>, notifier: Arc<dyn NotificationSender>) -> Self {
        let (updates, _) = watch::channel(PanelSnapshot::default());

        Self {
            api,
            notifier,
            inner: RwLock::new(PanelInner {
                snapshot: PanelSnapshot::default(),
                guards: HashMap::new(),
            }),
            updates,
        }
    }

    /// 스냅샷 변경 구독.
    pub fn subscribe(&self) -> watch::Receiver<PanelSnapshot> {
        self.updates.subscribe()
    }

    /// 현재 스냅샷 사본.
    pub async fn snapshot(&self) -> PanelSnapshot {
        self.inner.read().await.snapshot.clone()
    }

    fn publish(&self, inner: &mut PanelInner) {
        inner.snapshot.revision += 1;
        self.updates.send_replace(inner.snapshot.clone());
    }

    // ========================================
    // 상태 조회
    // ========================================

    /// 시장 상태를 다시 조회합니다.
    ///
    /// 조회 실패는 로그만 남기고 알림을 보내지 않습니다.
    /// 반환값은 조회 후 패널이 보유한 상태입니다.
    pub async fn refresh_status(&self, source: Source) -> Option<SyncStatus> {
        let ticket = {
            let mut inner = self.inner.write().await;
            inner.guard_mut(JobSlot::basics(source)).issue(RequestKind::Fetch)
        };

        let result = self
            .api
            .get_status(source)
            .instrument(sync_core::sync_span!("refresh_status", source))
            .await;

        let mut inner = self.inner.write().await;
        match result {
            Ok(status) => {
                let guard = inner.guard_mut(JobSlot::basics(source));
                if guard.accepts(RequestKind::Fetch, ticket) {
                    guard.mark_applied(RequestKind::Fetch, ticket);
                    *inner.snapshot.status_mut(source) = Some(status);
                    self.publish(&mut inner);
                } else {
                    debug!(%source, ticket, "Dropping stale status response");
                }
            }
            Err(e) => {
                warn!(%source, error = %e, "Failed to fetch sync status");
            }
        }

        inner.snapshot.status(source).cloned()
    }

    /// 두 시장 상태를 동시에 조회합니다.
    pub async fn refresh_all(&self) -> PanelSnapshot {
        tokio::join!(
            self.refresh_status(Source::Hk),
            self.refresh_status(Source::Us)
        );
        self.snapshot().await
    }

    // ========================================
    // 트리거
    // ========================================

    /// 시장 동기화를 요청합니다.
    ///
    /// 같은 시장의 요청이 진행 중이면 요청 없이 `InProgress`를 반환합니다.
    pub async fn trigger_sync(&self, source: Source, force: bool) -> SyncResult<SyncStatus> {
        let target = SyncTarget::from(source);
        let tickets = self.begin(target).await?;

        let result = self
            .api
            .trigger_sync(source, force)
            .instrument(sync_core::sync_span!("trigger_sync", source, force))
            .await;

        self.finish(target, &tickets, |_| result.as_ref().ok().cloned())
            .await;

        match &result {
            Ok(status) => {
                info!(%source, status = status.status.as_str(), "Sync request completed");
                self.notify(NotificationEvent::sync_completed(source, status))
                    .await;
            }
            Err(e) => {
                warn!(%source, error = %e, "Sync request failed");
                self.notify(NotificationEvent::SyncFailed {
                    target,
                    message: e.user_message(),
                })
                .await;
            }
        }

        result
    }

    /// 두 시장을 한 번에 동기화합니다.
    ///
    /// 성공하면 두 상태를 한 번의 발행으로 함께 반영합니다.
    pub async fn trigger_sync_all(&self, force: bool) -> SyncResult<SyncAllResult> {
        let target = SyncTarget::All;
        let tickets = self.begin(target).await?;

        let result = self
            .api
            .trigger_sync_all(force)
            .instrument(sync_core::sync_span!("trigger_sync_all", target = target, force))
            .await;

        self.finish(target, &tickets, |source| {
            result.as_ref().ok().map(|r| r.get(source).clone())
        })
        .await;

        match &result {
            Ok(all) => {
                info!(
                    hk = all.hk.status.as_str(),
                    us = all.us.status.as_str(),
                    "Sync-all request completed"
                );
                self.notify(NotificationEvent::SyncAllCompleted {
                    hk: all.hk.status,
                    us: all.us.status,
                })
                .await;
            }
            Err(e) => {
                warn!(error = %e, "Sync-all request failed");
                self.notify(NotificationEvent::SyncFailed {
                    target,
                    message: e.user_message(),
                })
                .await;
            }
        }

        result
    }

    /// 진행 중 플래그를 세우고 대상 시장들의 트리거 티켓을 발급합니다.
    async fn begin(&self, target: SyncTarget) -> SyncResult<Vec<(Source, u64)>> {
        let mut inner = self.inner.write().await;

        if inner.snapshot.loading.get(target) {
            debug!(%target, "Sync already in progress, ignoring request");
            return Err(SyncError::InProgress(target));
        }

        inner.snapshot.loading.set(target, true);
        let tickets = target
            .sources()
            .iter()
            .map(|&source| {
                let ticket = inner
                    .guard_mut(JobSlot::basics(source))
                    .issue(RequestKind::Trigger);
                (source, ticket)
            })
            .collect();
        self.publish(&mut inner);

        Ok(tickets)
    }

    /// 플래그를 내리고 새 상태를 적용한 뒤 한 번 발행합니다.
    async fn finish<F>(&self, target: SyncTarget, tickets: &[(Source, u64)], mut fresh: F)
    where
        F: FnMut(Source) -> Option<SyncStatus>,
    {
        let mut inner = self.inner.write().await;
        inner.snapshot.loading.set(target, false);

        for &(source, ticket) in tickets {
            let guard = inner.guard_mut(JobSlot::basics(source));
            guard.settle(RequestKind::Trigger);

            let Some(status) = fresh(source) else {
                continue;
            };

            if guard.accepts(RequestKind::Trigger, ticket) {
                guard.mark_applied(RequestKind::Trigger, ticket);
                *inner.snapshot.status_mut(source) = Some(status);
            } else {
                debug!(%source, ticket, "Dropping stale trigger response");
            }
        }

        self.publish(&mut inner);
    }

    // ========================================
    // 시세 / 과거 데이터 작업
    // ========================================

    /// 작업 슬롯의 상태를 다시 조회합니다.
    ///
    /// 기본정보 작업은 `refresh_status`와 같습니다.
    pub async fn refresh_job(&self, slot: JobSlot) -> Option<SyncStatus> {
        if slot.job == SyncJob::StockBasics {
            return self.refresh_status(slot.source).await;
        }

        let ticket = {
            let mut inner = self.inner.write().await;
            inner.guard_mut(slot).issue(RequestKind::Fetch)
        };

        let result = self
            .api
            .get_job_status(slot)
            .instrument(sync_core::sync_span!("refresh_job", job = slot))
            .await;

        let mut inner = self.inner.write().await;
        match result {
            Ok(status) => {
                let guard = inner.guard_mut(slot);
                if guard.accepts(RequestKind::Fetch, ticket) {
                    guard.mark_applied(RequestKind::Fetch, ticket);
                    inner.snapshot.jobs.insert(slot, status);
                    self.publish(&mut inner);
                } else {
                    debug!(%slot, ticket, "Dropping stale job status response");
                }
            }
            Err(e) => {
                warn!(%slot, error = %e, "Failed to fetch job status");
            }
        }

        inner.snapshot.jobs.get(&slot).cloned()
    }

    /// 작업 슬롯의 동기화를 요청합니다.
    ///
    /// 기본정보 작업은 `trigger_sync`로 위임하며 `days`는 무시됩니다.
    /// 같은 슬롯의 요청이 진행 중이면 요청 없이 `JobInProgress`를 반환합니다.
    pub async fn trigger_job(
        &self,
        slot: JobSlot,
        force: bool,
        days: Option<u32>,
    ) -> SyncResult<SyncStatus> {
        if slot.job == SyncJob::StockBasics {
            return self.trigger_sync(slot.source, force).await;
        }

        let ticket = {
            let mut inner = self.inner.write().await;
            if !inner.snapshot.running_jobs.insert(slot) {
                debug!(%slot, "Job already in progress, ignoring request");
                return Err(SyncError::JobInProgress(slot));
            }
            let ticket = inner.guard_mut(slot).issue(RequestKind::Trigger);
            self.publish(&mut inner);
            ticket
        };

        let result = self
            .api
            .trigger_job(slot, force, days)
            .instrument(sync_core::sync_span!("trigger_job", job = slot, force))
            .await;

        {
            let mut inner = self.inner.write().await;
            inner.snapshot.running_jobs.remove(&slot);
            let guard = inner.guard_mut(slot);
            guard.settle(RequestKind::Trigger);
            if let Ok(status) = &result {
                if guard.accepts(RequestKind::Trigger, ticket) {
                    guard.mark_applied(RequestKind::Trigger, ticket);
                    inner.snapshot.jobs.insert(slot, status.clone());
                } else {
                    debug!(%slot, ticket, "Dropping stale job trigger response");
                }
            }
            self.publish(&mut inner);
        }

        match &result {
            Ok(status) => {
                info!(%slot, status = status.status.as_str(), "Job request completed");
                self.notify(NotificationEvent::job_completed(slot, status))
                    .await;
            }
            Err(e) => {
                warn!(%slot, error = %e, "Job request failed");
                self.notify(NotificationEvent::JobFailed {
                    source: slot.source,
                    job: slot.job,
                    message: e.user_message(),
                })
                .await;
            }
        }

        result
    }

    async fn notify(&self, event: NotificationEvent) {
        let notification = Notification::new(event);
        if let Err(e) = self.notifier.send(&notification).await {
            warn!(
                sender = self.notifier.name(),
                error = %e,
                "Failed to deliver notification"
            );
        }
    }
}
