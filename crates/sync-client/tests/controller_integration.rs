//! SyncPanelController 통합 테스트.
//!
//! 응답 순서를 제어할 수 있는 스크립트 백엔드와 알림 기록기를 사용합니다.

use async_trait::async_trait;
use chrono::{Local, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use sync_client::{SyncApi, SyncError, SyncPanelController, SyncResult};
use sync_core::{
    CounterKind, JobSlot, Source, SyncAllResult, SyncJob, SyncState, SyncStatus, SyncStatusView,
    SyncTarget, FINISHED_AT_FORMAT,
};
use sync_notification::{
    Notification, NotificationError, NotificationLevel, NotificationResult, NotificationSender,
};
use tokio::sync::oneshot;

// ========================================
// Test doubles
// ========================================

type Step<T> = (Option<oneshot::Receiver<()>>, SyncResult<T>);

#[derive(Default)]
struct ScriptedApi {
    status_steps: Mutex<VecDeque<Step<SyncStatus>>>,
    trigger_steps: Mutex<VecDeque<Step<SyncStatus>>>,
    all_steps: Mutex<VecDeque<Step<SyncAllResult>>>,
    job_status_steps: Mutex<VecDeque<Step<SyncStatus>>>,
    job_steps: Mutex<VecDeque<Step<SyncStatus>>>,
    job_requests: Mutex<Vec<(JobSlot, bool, Option<u32>)>>,
    status_calls: AtomicUsize,
    trigger_calls: AtomicUsize,
    all_calls: AtomicUsize,
    job_calls: AtomicUsize,
}

impl ScriptedApi {
    fn push_status(&self, result: SyncResult<SyncStatus>) {
        self.status_steps.lock().unwrap().push_back((None, result));
    }

    fn push_status_gated(&self, result: SyncResult<SyncStatus>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.status_steps.lock().unwrap().push_back((Some(rx), result));
        tx
    }

    fn push_trigger(&self, result: SyncResult<SyncStatus>) {
        self.trigger_steps.lock().unwrap().push_back((None, result));
    }

    fn push_trigger_gated(&self, result: SyncResult<SyncStatus>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.trigger_steps.lock().unwrap().push_back((Some(rx), result));
        tx
    }

    fn push_all(&self, result: SyncResult<SyncAllResult>) {
        self.all_steps.lock().unwrap().push_back((None, result));
    }

    fn push_job_status(&self, result: SyncResult<SyncStatus>) {
        self.job_status_steps.lock().unwrap().push_back((None, result));
    }

    fn push_job(&self, result: SyncResult<SyncStatus>) {
        self.job_steps.lock().unwrap().push_back((None, result));
    }

    fn push_job_gated(&self, result: SyncResult<SyncStatus>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.job_steps.lock().unwrap().push_back((Some(rx), result));
        tx
    }
}

async fn play<T>(queue: &Mutex<VecDeque<Step<T>>>) -> SyncResult<T> {
    let step = queue.lock().unwrap().pop_front();
    match step {
        Some((gate, result)) => {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            result
        }
        None => Err(SyncError::Transport("no scripted response".to_string())),
    }
}

#[async_trait]
impl SyncApi for ScriptedApi {
    async fn get_status(&self, _source: Source) -> SyncResult<SyncStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        play(&self.status_steps).await
    }

    async fn trigger_sync(&self, _source: Source, _force: bool) -> SyncResult<SyncStatus> {
        self.trigger_calls.fetch_add(1, Ordering::SeqCst);
        play(&self.trigger_steps).await
    }

    async fn trigger_sync_all(&self, _force: bool) -> SyncResult<SyncAllResult> {
        self.all_calls.fetch_add(1, Ordering::SeqCst);
        play(&self.all_steps).await
    }

    async fn get_job_status(&self, _slot: JobSlot) -> SyncResult<SyncStatus> {
        play(&self.job_status_steps).await
    }

    async fn trigger_job(
        &self,
        slot: JobSlot,
        force: bool,
        days: Option<u32>,
    ) -> SyncResult<SyncStatus> {
        self.job_requests.lock().unwrap().push((slot, force, days));
        self.job_calls.fetch_add(1, Ordering::SeqCst);
        play(&self.job_steps).await
    }
}

#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl Recorder {
    fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn summaries(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|n| n.summary()).collect()
    }

    fn levels(&self) -> Vec<NotificationLevel> {
        self.sent.lock().unwrap().iter().map(|n| n.level).collect()
    }
}

#[async_trait]
impl NotificationSender for Recorder {
    async fn send(&self, notification: &Notification) -> NotificationResult<()> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(NotificationError::SendFailed("offline".to_string()));
        }
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "recorder"
    }
}

fn setup() -> (Arc<ScriptedApi>, Arc<Recorder>, Arc<SyncPanelController>) {
    let api = Arc::new(ScriptedApi::default());
    let recorder = Arc::new(Recorder::default());
    let controller = Arc::new(SyncPanelController::new(api.clone(), recorder.clone()));
    (api, recorder, controller)
}

fn completed_hk() -> SyncStatus {
    SyncStatus::new(SyncState::Completed)
        .with_counts(1200, 5, 3, 0)
        .with_finished_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
}

async fn wait_for_calls(counter: &AtomicUsize, expected: usize) {
    while counter.load(Ordering::SeqCst) < expected {
        tokio::task::yield_now().await;
    }
}

// ========================================
// Tests
// ========================================

#[tokio::test]
async fn test_refresh_completed_status_view() {
    let (api, recorder, controller) = setup();
    api.push_status(Ok(completed_hk()));

    let status = controller.refresh_status(Source::Hk).await.unwrap();
    assert_eq!(status.status, SyncState::Completed);

    let snapshot = controller.snapshot().await;
    let view = snapshot.view(Source::Hk).unwrap();
    assert_eq!(view.tag.label, "已完成");
    assert_eq!(view.counter(CounterKind::Total), Some(1200));
    assert_eq!(view.counter(CounterKind::Inserted), Some(5));
    assert_eq!(view.counter(CounterKind::Updated), Some(3));

    let expected = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .unwrap()
        .with_timezone(&Local)
        .format(FINISHED_AT_FORMAT)
        .to_string();
    assert_eq!(view.finished_at.as_deref(), Some(expected.as_str()));

    // 조회는 알림을 보내지 않음
    assert!(recorder.summaries().is_empty());
}

#[tokio::test]
async fn test_never_run_view_has_no_counters() {
    let (api, _recorder, controller) = setup();
    api.push_status(Ok(SyncStatus::never_run(Source::Us)));

    controller.refresh_status(Source::Us).await;

    let view: SyncStatusView = controller.snapshot().await.view(Source::Us).unwrap();
    assert_eq!(view.tag.label, "从未同步");
    assert!(view.counters.is_empty());
    assert!(view.finished_at.is_none());
}

#[tokio::test]
async fn test_fetch_failure_keeps_state_and_is_silent() {
    let (api, recorder, controller) = setup();
    api.push_status(Ok(completed_hk()));
    api.push_status(Err(SyncError::Transport("connection refused".to_string())));

    controller.refresh_status(Source::Hk).await;
    let revision = controller.snapshot().await.revision;

    let kept = controller.refresh_status(Source::Hk).await;
    assert_eq!(kept, Some(completed_hk()));

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.revision, revision);
    assert!(recorder.summaries().is_empty());
}

#[tokio::test]
async fn test_second_trigger_while_loading_is_rejected() {
    let (api, recorder, controller) = setup();
    let release = api.push_trigger_gated(Ok(SyncStatus::new(SyncState::Running)));
    let mut rx = controller.subscribe();

    let first = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.trigger_sync(Source::Hk, false).await })
    };

    rx.wait_for(|s| s.loading.hk).await.unwrap();
    assert!(!controller.snapshot().await.can_trigger(SyncTarget::Hk));

    let err = controller.trigger_sync(Source::Hk, true).await.unwrap_err();
    assert_eq!(err, SyncError::InProgress(SyncTarget::Hk));
    assert!(recorder.summaries().is_empty());

    release.send(()).unwrap();
    let status = first.await.unwrap().unwrap();
    assert_eq!(status.status, SyncState::Running);

    assert_eq!(api.trigger_calls.load(Ordering::SeqCst), 1);
    assert_eq!(recorder.summaries().len(), 1);
    assert!(!controller.snapshot().await.loading.any());
}

#[tokio::test]
async fn test_flags_are_independent_across_targets() {
    let (api, _recorder, controller) = setup();
    let single_hk = SyncStatus::new(SyncState::Running).with_message("同步任務正在執行中");
    let all_hk = SyncStatus::new(SyncState::Completed).with_counts(2600, 10, 2590, 0);
    let release = api.push_trigger_gated(Ok(single_hk.clone()));
    api.push_all(Ok(SyncAllResult {
        hk: all_hk.clone(),
        us: SyncStatus::new(SyncState::Completed),
    }));
    let mut rx = controller.subscribe();

    let hk = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.trigger_sync(Source::Hk, false).await })
    };
    rx.wait_for(|s| s.loading.hk).await.unwrap();

    // hk가 진행 중이어도 전체 동기화는 별도 플래그
    controller.trigger_sync_all(false).await.unwrap();
    let during = controller.snapshot().await;
    assert!(during.loading.hk && !during.loading.all);
    assert_eq!(during.hk, Some(all_hk.clone()));

    release.send(()).unwrap();
    // 호출자는 자기 응답을 받지만 먼저 발급된 hk 응답은 전체 동기화 결과를 덮지 않음
    assert_eq!(hk.await.unwrap().unwrap(), single_hk);

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.hk, Some(all_hk));
    assert!(!snapshot.loading.any());
    assert_eq!(api.all_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_logical_failure_keeps_status_and_notifies() {
    let (api, recorder, controller) = setup();
    api.push_status(Ok(completed_hk()));
    api.push_trigger(Err(SyncError::Logical {
        message: Some("rate limited".to_string()),
    }));

    controller.refresh_status(Source::Hk).await;
    let err = controller.trigger_sync(Source::Hk, false).await.unwrap_err();
    assert!(err.is_logical());

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.hk, Some(completed_hk()));
    assert!(!snapshot.loading.hk);

    let summaries = recorder.summaries();
    assert_eq!(summaries.len(), 1);
    assert!(summaries[0].contains("rate limited"));
    assert_eq!(recorder.levels(), vec![NotificationLevel::Error]);
}

#[tokio::test]
async fn test_transport_failure_uses_generic_message() {
    let (api, recorder, controller) = setup();
    api.push_trigger(Err(SyncError::Transport("HTTP 502".to_string())));

    let err = controller.trigger_sync(Source::Us, false).await.unwrap_err();
    assert!(err.is_transport());
    assert!(controller.snapshot().await.us.is_none());

    let summaries = recorder.summaries();
    assert!(summaries[0].contains("网络错误"));
}

#[tokio::test]
async fn test_sync_all_publishes_both_sides_at_once() {
    let (api, recorder, controller) = setup();
    let result = SyncAllResult {
        hk: SyncStatus::new(SyncState::Completed).with_counts(2600, 10, 0, 0),
        us: SyncStatus::new(SyncState::Failed).with_message("Alpha Vantage API Key 未配置"),
    };
    api.push_all(Ok(result.clone()));

    let rx = controller.subscribe();
    let before = controller.snapshot().await.revision;

    let returned = controller.trigger_sync_all(false).await.unwrap();
    assert_eq!(returned, result);

    // 플래그 설정 한 번, 결과 반영 한 번
    let published = rx.borrow().clone();
    assert_eq!(published.revision, before + 2);
    assert_eq!(published.hk, Some(result.hk.clone()));
    assert_eq!(published.us, Some(result.us.clone()));
    assert!(!published.loading.all);

    assert_eq!(recorder.levels(), vec![NotificationLevel::Warning]);
}

#[tokio::test]
async fn test_sync_all_failure_changes_nothing() {
    let (api, recorder, controller) = setup();
    api.push_all(Err(SyncError::Logical { message: None }));

    let err = controller.trigger_sync_all(true).await.unwrap_err();
    assert!(err.is_logical());

    let snapshot = controller.snapshot().await;
    assert!(snapshot.hk.is_none() && snapshot.us.is_none());
    assert!(recorder.summaries()[0].contains("同步请求失败"));
}

#[tokio::test]
async fn test_fetch_during_trigger_is_dropped() {
    let (api, _recorder, controller) = setup();
    let release = api.push_trigger_gated(Ok(completed_hk()));
    api.push_status(Ok(SyncStatus::new(SyncState::Running)));
    let mut rx = controller.subscribe();

    let trigger = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.trigger_sync(Source::Hk, false).await })
    };
    rx.wait_for(|s| s.loading.hk).await.unwrap();

    // 트리거 진행 중에 도착한 조회 결과는 버림
    let seen = controller.refresh_status(Source::Hk).await;
    assert!(seen.is_none());

    release.send(()).unwrap();
    trigger.await.unwrap().unwrap();

    assert_eq!(controller.snapshot().await.hk, Some(completed_hk()));
}

#[tokio::test]
async fn test_older_fetch_arriving_late_is_dropped() {
    let (api, _recorder, controller) = setup();
    let release = api.push_status_gated(Ok(SyncStatus::new(SyncState::Running)));
    api.push_status(Ok(completed_hk()));

    let older = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.refresh_status(Source::Hk).await })
    };
    wait_for_calls(&api.status_calls, 1).await;

    let newer = controller.refresh_status(Source::Hk).await;
    assert_eq!(newer, Some(completed_hk()));

    release.send(()).unwrap();
    let after_older = older.await.unwrap();
    assert_eq!(after_older, Some(completed_hk()));
}

#[tokio::test]
async fn test_notifier_failure_does_not_fail_trigger() {
    let api = Arc::new(ScriptedApi::default());
    let recorder = Arc::new(Recorder::failing());
    let controller = SyncPanelController::new(api.clone(), recorder.clone());
    api.push_trigger(Ok(SyncStatus::new(SyncState::Completed)));

    let status = controller.trigger_sync(Source::Us, false).await.unwrap();
    assert_eq!(status.status, SyncState::Completed);
    assert_eq!(recorder.summaries().len(), 1);
}

#[tokio::test]
async fn test_refresh_all_loads_both_markets() {
    let (api, _recorder, controller) = setup();
    api.push_status(Ok(SyncStatus::new(SyncState::Completed)));
    api.push_status(Ok(SyncStatus::new(SyncState::Failed)));

    let snapshot = controller.refresh_all().await;
    assert!(snapshot.hk.is_some());
    assert!(snapshot.us.is_some());
    assert_eq!(api.status_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_job_slot_runs_independently() {
    let (api, recorder, controller) = setup();
    let quotes_hk = JobSlot::new(Source::Hk, SyncJob::Quotes);
    let release =
        api.push_job_gated(Ok(SyncStatus::new(SyncState::Completed).with_counts(2600, 0, 2600, 0)));
    api.push_job(Ok(SyncStatus::new(SyncState::Running)));
    api.push_trigger(Ok(completed_hk()));
    let mut rx = controller.subscribe();

    let quotes = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.trigger_job(quotes_hk, false, None).await })
    };
    rx.wait_for(|s| s.running_jobs.contains(&quotes_hk)).await.unwrap();
    wait_for_calls(&api.job_calls, 1).await;
    assert!(!controller.snapshot().await.can_trigger_job(quotes_hk));

    // 같은 슬롯은 거부, 다른 슬롯과 기본정보 작업은 진행
    let err = controller.trigger_job(quotes_hk, true, None).await.unwrap_err();
    assert_eq!(err, SyncError::JobInProgress(quotes_hk));

    let quotes_us = JobSlot::new(Source::Us, SyncJob::Quotes);
    controller.trigger_job(quotes_us, false, None).await.unwrap();
    controller.trigger_sync(Source::Hk, false).await.unwrap();

    release.send(()).unwrap();
    quotes.await.unwrap().unwrap();

    let snapshot = controller.snapshot().await;
    assert!(snapshot.running_jobs.is_empty());
    assert_eq!(snapshot.job_status(quotes_hk).unwrap().total, Some(2600));
    assert_eq!(
        snapshot.job_status(quotes_us).unwrap().status,
        SyncState::Running
    );
    assert_eq!(snapshot.hk, Some(completed_hk()));
    assert_eq!(api.job_calls.load(Ordering::SeqCst), 2);

    let summaries = recorder.summaries();
    assert!(summaries
        .iter()
        .any(|s| s.starts_with("港股 实时行情 同步 已完成")));
}

#[tokio::test]
async fn test_historical_job_passes_days_and_reports_failure() {
    let (api, recorder, controller) = setup();
    let slot = JobSlot::new(Source::Us, SyncJob::Historical);
    api.push_job(Err(SyncError::Transport("HTTP 504".to_string())));

    let err = controller.trigger_job(slot, true, Some(60)).await.unwrap_err();
    assert!(err.is_transport());

    assert_eq!(
        api.job_requests.lock().unwrap().as_slice(),
        &[(slot, true, Some(60))]
    );
    let snapshot = controller.snapshot().await;
    assert!(snapshot.job_status(slot).is_none());
    assert!(snapshot.running_jobs.is_empty());
    assert!(recorder.summaries()[0].contains("[historical_us]"));
    assert_eq!(recorder.levels(), vec![NotificationLevel::Error]);
}

#[tokio::test]
async fn test_basics_slot_goes_through_market_trigger() {
    let (api, _recorder, controller) = setup();
    api.push_trigger(Ok(completed_hk()));
    api.push_status(Ok(SyncStatus::never_run(Source::Us)));

    let status = controller
        .trigger_job(JobSlot::basics(Source::Hk), false, Some(10))
        .await
        .unwrap();
    assert_eq!(status, completed_hk());
    let refreshed = controller.refresh_job(JobSlot::basics(Source::Us)).await;
    assert!(refreshed.unwrap().is_never_run());

    assert_eq!(api.trigger_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.status_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.job_calls.load(Ordering::SeqCst), 0);
    assert!(controller.snapshot().await.jobs.is_empty());
}

#[tokio::test]
async fn test_refresh_job_stores_status_and_drops_during_trigger() {
    let (api, _recorder, controller) = setup();
    let slot = JobSlot::new(Source::Hk, SyncJob::Historical);
    api.push_job_status(Ok(SyncStatus::never_run_job(Source::Hk, SyncJob::Historical)));

    let status = controller.refresh_job(slot).await.unwrap();
    assert_eq!(status.job.as_deref(), Some("historical_hk"));
    assert_eq!(
        controller.snapshot().await.job_view(slot).unwrap().tag.label,
        "从未同步"
    );

    let release = api.push_job_gated(Ok(SyncStatus::new(SyncState::Completed)));
    api.push_job_status(Ok(SyncStatus::new(SyncState::Running)));
    let mut rx = controller.subscribe();
    let trigger = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.trigger_job(slot, false, None).await })
    };
    rx.wait_for(|s| s.running_jobs.contains(&slot)).await.unwrap();

    // 트리거 진행 중 조회 결과는 버리고 기존 상태 유지
    let seen = controller.refresh_job(slot).await.unwrap();
    assert!(seen.is_never_run());

    release.send(()).unwrap();
    trigger.await.unwrap().unwrap();
    assert_eq!(
        controller.snapshot().await.job_status(slot).unwrap().status,
        SyncState::Completed
    );
}
