//! 패널 상태 스냅샷.

use std::collections::{BTreeMap, BTreeSet};
use sync_core::{JobSlot, Source, SyncJob, SyncStatus, SyncStatusView, SyncTarget};

/// 대상별 진행 중 플래그.
///
/// 세 플래그는 독립적이며 동시에 참일 수 있습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    pub hk: bool,
    pub us: bool,
    pub all: bool,
}

impl LoadingFlags {
    /// 대상의 플래그 값.
    pub fn get(&self, target: SyncTarget) -> bool {
        match target {
            SyncTarget::Hk => self.hk,
            SyncTarget::Us => self.us,
            SyncTarget::All => self.all,
        }
    }

    /// 대상의 플래그를 설정합니다.
    pub fn set(&mut self, target: SyncTarget, value: bool) {
        match target {
            SyncTarget::Hk => self.hk = value,
            SyncTarget::Us => self.us = value,
            SyncTarget::All => self.all = value,
        }
    }

    /// 하나라도 진행 중인지 확인합니다.
    pub fn any(&self) -> bool {
        self.hk || self.us || self.all
    }
}

/// 컨트롤러가 발행하는 상태 스냅샷.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelSnapshot {
    /// 홍콩 시장 마지막 상태
    pub hk: Option<SyncStatus>,
    /// 미국 시장 마지막 상태
    pub us: Option<SyncStatus>,
    /// 진행 중 플래그
    pub loading: LoadingFlags,
    /// 시세/과거 데이터 작업의 마지막 상태
    pub jobs: BTreeMap<JobSlot, SyncStatus>,
    /// 진행 중인 시세/과거 데이터 작업
    pub running_jobs: BTreeSet<JobSlot>,
    /// 발행 순번 (발행마다 1 증가)
    pub revision: u64,
}

impl PanelSnapshot {
    /// 시장의 현재 상태.
    pub fn status(&self, source: Source) -> Option<&SyncStatus> {
        match source {
            Source::Hk => self.hk.as_ref(),
            Source::Us => self.us.as_ref(),
        }
    }

    pub(crate) fn status_mut(&mut self, source: Source) -> &mut Option<SyncStatus> {
        match source {
            Source::Hk => &mut self.hk,
            Source::Us => &mut self.us,
        }
    }

    /// 시장의 표시 모델. 상태가 없으면 `None`.
    pub fn view(&self, source: Source) -> Option<SyncStatusView> {
        self.status(source).map(SyncStatusView::from)
    }

    /// 대상의 트리거 컨트롤을 눌러도 되는지 확인합니다.
    pub fn can_trigger(&self, target: SyncTarget) -> bool {
        !self.loading.get(target)
    }

    /// 작업 슬롯의 현재 상태. 기본정보 작업은 시장 상태와 같습니다.
    pub fn job_status(&self, slot: JobSlot) -> Option<&SyncStatus> {
        match slot.job {
            SyncJob::StockBasics => self.status(slot.source),
            _ => self.jobs.get(&slot),
        }
    }

    /// 작업 슬롯의 표시 모델.
    pub fn job_view(&self, slot: JobSlot) -> Option<SyncStatusView> {
        self.job_status(slot).map(SyncStatusView::from)
    }

    /// 작업 슬롯의 트리거를 눌러도 되는지 확인합니다.
    pub fn can_trigger_job(&self, slot: JobSlot) -> bool {
        match slot.job {
            SyncJob::StockBasics => self.can_trigger(slot.source.into()),
            _ => !self.running_jobs.contains(&slot),
        }
    }
}
