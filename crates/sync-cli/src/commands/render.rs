//! 상태 표시 모델을 터미널 텍스트로 출력합니다.

use sync_core::{CounterTone, JobSlot, Source, SourceHealth, SyncJob, SyncStatusView, TagTone};

fn tag_icon(tone: TagTone) -> &'static str {
    match tone {
        TagTone::Success => "✅",
        TagTone::Warning => "🔄",
        TagTone::Danger => "❌",
        TagTone::Info => "ℹ️ ",
    }
}

fn counter_icon(tone: CounterTone) -> &'static str {
    match tone {
        CounterTone::Plain => "",
        CounterTone::Green => "🟢",
        CounterTone::Blue => "🔵",
        CounterTone::Red => "🔴",
    }
}

/// 한 시장의 상태 카드.
pub fn render_status(source: Source, view: &SyncStatusView) -> String {
    render_card(source.display_name(), view)
}

/// 작업 슬롯의 상태 카드. 기본정보 작업은 시장 카드와 같습니다.
pub fn render_job_status(slot: JobSlot, view: &SyncStatusView) -> String {
    match slot.job {
        SyncJob::StockBasics => render_status(slot.source, view),
        job => render_card(
            &format!("{} {}", slot.source.display_name(), job.display_name()),
            view,
        ),
    }
}

fn render_card(title: &str, view: &SyncStatusView) -> String {
    let mut out = format!("{} {} [{}]\n", tag_icon(view.tag.tone), title, view.tag.label);

    if !view.counters.is_empty() {
        let counters: Vec<String> = view
            .counters
            .iter()
            .map(|c| format!("{}{} {}", counter_icon(c.tone), c.kind.label(), c.value))
            .collect();
        out.push_str(&format!("   {}\n", counters.join("  ")));
    }

    if let Some(finished_at) = &view.finished_at {
        out.push_str(&format!("   完成时间: {}\n", finished_at));
    }

    if let Some(message) = &view.message {
        out.push_str(&format!("   {}\n", message));
    }

    out
}

/// 상태를 불러오지 못한 시장.
pub fn render_unavailable(source: Source) -> String {
    format!("⚠️  {} 状态获取失败\n", source.display_name())
}

/// 상태를 불러오지 못한 작업 슬롯.
pub fn render_job_unavailable(slot: JobSlot) -> String {
    match slot.job {
        SyncJob::StockBasics => render_unavailable(slot.source),
        job => format!(
            "⚠️  {} {} 状态获取失败\n",
            slot.source.display_name(),
            job.display_name()
        ),
    }
}

/// 데이터 소스 점검 결과 한 줄.
pub fn render_source_health(source: Source, health: &SourceHealth) -> String {
    let icon = if health.available { "✅" } else { "❌" };
    let mut line = format!("{} {} ({})", icon, source.display_name(), health.source);
    if let Some(message) = &health.message {
        line.push_str(&format!(": {}", message));
    }
    line.push('\n');
    line
}
