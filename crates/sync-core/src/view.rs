//! 동기화 상태 뷰 모델.
//!
//! `SyncStatus`를 화면 표시용 값(상태 태그, 건수, 로컬 완료 시각)으로 변환합니다.
//! `never_run` 상태는 건수와 완료 시각을 절대 포함하지 않습니다.

use crate::domain::{SyncState, SyncStatus};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

/// 완료 시각 표시 형식 (로컬 시간).
pub const FINISHED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 상태 태그 색조.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagTone {
    Success,
    Warning,
    Danger,
    Info,
}

/// 건수 강조 색상.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterTone {
    Plain,
    Green,
    Blue,
    Red,
}

/// 건수 항목 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterKind {
    Total,
    Inserted,
    Updated,
    Errors,
}

impl CounterKind {
    /// 항목 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            CounterKind::Total => "总数",
            CounterKind::Inserted => "新增",
            CounterKind::Updated => "更新",
            CounterKind::Errors => "错误",
        }
    }

    /// 항목 색상.
    pub fn tone(&self) -> CounterTone {
        match self {
            CounterKind::Total => CounterTone::Plain,
            CounterKind::Inserted => CounterTone::Green,
            CounterKind::Updated => CounterTone::Blue,
            CounterKind::Errors => CounterTone::Red,
        }
    }
}

/// 표시할 건수 한 줄.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterView {
    pub kind: CounterKind,
    pub value: u64,
    pub tone: CounterTone,
}

/// 상태 태그.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusTag {
    pub label: &'static str,
    pub tone: TagTone,
}

impl StatusTag {
    /// 상태에 해당하는 태그를 반환합니다.
    pub fn for_state(state: SyncState) -> Self {
        let (label, tone) = match state {
            SyncState::Completed => ("已完成", TagTone::Success),
            SyncState::Running => ("同步中", TagTone::Warning),
            SyncState::Failed => ("失败", TagTone::Danger),
            SyncState::NeverRun => ("从未同步", TagTone::Info),
            SyncState::Unknown => ("未知", TagTone::Info),
        };
        Self { label, tone }
    }
}

/// 한 시장의 상태 표시 모델.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatusView {
    /// 원래 상태 값
    pub state: SyncState,
    /// 상태 태그
    pub tag: StatusTag,
    /// 표시할 건수 (존재하는 항목만, `never_run`이면 비어 있음)
    pub counters: Vec<CounterView>,
    /// 로컬 시간으로 포맷된 완료 시각
    pub finished_at: Option<String>,
    /// 상세 메시지
    pub message: Option<String>,
}

impl SyncStatusView {
    /// 완료 시각을 로컬 시간으로 포맷합니다.
    pub fn format_local(ts: &DateTime<Utc>) -> String {
        ts.with_timezone(&Local).format(FINISHED_AT_FORMAT).to_string()
    }

    /// 특정 항목의 값을 반환합니다.
    pub fn counter(&self, kind: CounterKind) -> Option<u64> {
        self.counters.iter().find(|c| c.kind == kind).map(|c| c.value)
    }
}

impl From<&SyncStatus> for SyncStatusView {
    fn from(status: &SyncStatus) -> Self {
        let tag = StatusTag::for_state(status.status);

        if status.is_never_run() {
            return Self {
                state: status.status,
                tag,
                counters: Vec::new(),
                finished_at: None,
                message: status.message.clone(),
            };
        }

        let counters = [
            (CounterKind::Total, status.total),
            (CounterKind::Inserted, status.inserted),
            (CounterKind::Updated, status.updated),
            (CounterKind::Errors, status.errors),
        ]
        .into_iter()
        .filter_map(|(kind, value)| {
            value.map(|value| CounterView {
                kind,
                value,
                tone: kind.tone(),
            })
        })
        .collect();

        Self {
            state: status.status,
            tag,
            counters,
            finished_at: status.finished_at.as_ref().map(Self::format_local),
            message: status.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn test_completed_view() {
        let finished = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let status = SyncStatus {
            status: SyncState::Completed,
            total: Some(1200),
            inserted: Some(5),
            updated: Some(3),
            finished_at: Some(finished),
            ..Default::default()
        };

        let view = SyncStatusView::from(&status);
        assert_eq!(view.tag.label, "已完成");
        assert_eq!(view.tag.tone, TagTone::Success);
        assert_eq!(view.counter(CounterKind::Total), Some(1200));
        assert_eq!(view.counter(CounterKind::Inserted), Some(5));
        assert_eq!(view.counter(CounterKind::Updated), Some(3));
        assert_eq!(view.counter(CounterKind::Errors), None);

        let inserted = view
            .counters
            .iter()
            .find(|c| c.kind == CounterKind::Inserted)
            .unwrap();
        assert_eq!(inserted.tone, CounterTone::Green);
        let updated = view
            .counters
            .iter()
            .find(|c| c.kind == CounterKind::Updated)
            .unwrap();
        assert_eq!(updated.tone, CounterTone::Blue);

        let expected = finished
            .with_timezone(&Local)
            .format(FINISHED_AT_FORMAT)
            .to_string();
        assert_eq!(view.finished_at, Some(expected));
    }

    #[test]
    fn test_failed_view_keeps_message() {
        let status = SyncStatus::new(SyncState::Failed)
            .with_message("AKShare 不可用")
            .with_counts(0, 0, 0, 1);
        let view = SyncStatusView::from(&status);
        assert_eq!(view.tag.tone, TagTone::Danger);
        assert_eq!(view.message.as_deref(), Some("AKShare 不可用"));
        assert_eq!(view.counter(CounterKind::Errors), Some(1));
    }

    proptest! {
        #[test]
        fn never_run_hides_counters_and_timestamp(
            total in proptest::option::of(any::<u64>()),
            inserted in proptest::option::of(any::<u64>()),
            updated in proptest::option::of(any::<u64>()),
            errors in proptest::option::of(any::<u64>()),
            secs in proptest::option::of(0i64..4_000_000_000),
        ) {
            let status = SyncStatus {
                status: SyncState::NeverRun,
                total,
                inserted,
                updated,
                errors,
                finished_at: secs.and_then(|s| Utc.timestamp_opt(s, 0).single()),
                ..Default::default()
            };
            let view = SyncStatusView::from(&status);
            prop_assert!(view.counters.is_empty());
            prop_assert!(view.finished_at.is_none());
            prop_assert_eq!(view.tag.label, "从未同步");
        }
    }
}
