use crate::api::use_api;
use crate::components::feedback::{Empty, ErrorAlert, LoadState, Loading};
use chamada_shared::ticket::RequestTracker;
use chamada_shared::{AttendanceItem, AttendanceStatus, AttendanceSummary};
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 出勤状态对应的徽章样式
pub fn status_badge_class(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Present => "badge badge-success",
        AttendanceStatus::Absent => "badge badge-error",
        AttendanceStatus::Justified => "badge badge-warning",
    }
}

#[component]
pub fn SessionChamadaPage(session_id: String) -> impl IntoView {
    let api = use_api();
    let (summary, set_summary) = signal(LoadState::<AttendanceSummary>::Loading);

    let tracker = RequestTracker::new();
    let ticket = tracker.begin();
    on_cleanup({
        let tracker = tracker.clone();
        move || tracker.invalidate()
    });

    spawn_local(async move {
        let result = api.attendance(&session_id).await;
        if !tracker.is_current(ticket) {
            return;
        }
        set_summary.try_set(match result {
            Ok(summary) => LoadState::Ready(summary),
            Err(e) => {
                warn!("[Chamada] Failed to load session: {}", e);
                LoadState::Failed(e.message_or("Erro ao carregar chamada"))
            }
        });
    });

    view! {
        <div class="space-y-4">
            <h2 class="text-2xl font-bold">"Chamada"</h2>
            {move || match summary.get() {
                LoadState::Loading => view! { <Loading /> }.into_any(),
                LoadState::Failed(message) => view! { <ErrorAlert message=message /> }.into_any(),
                LoadState::Ready(summary) => view! { <SessionSummary summary=summary /> }.into_any(),
            }}
        </div>
    }
}

#[component]
fn SessionSummary(summary: AttendanceSummary) -> impl IntoView {
    let AttendanceSummary {
        items,
        total,
        present,
        absent,
        justified,
    } = summary;

    view! {
        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-title">"Presentes"</div>
                <div class="stat-value text-success">{present}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Faltas"</div>
                <div class="stat-value text-error">{absent}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Justificadas"</div>
                <div class="stat-value text-warning">{justified}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Total"</div>
                <div class="stat-value">{total}</div>
            </div>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                {if items.is_empty() {
                    view! { <Empty message="Nenhuma presença registrada." /> }.into_any()
                } else {
                    view! {
                        <div class="overflow-x-auto w-full">
                            <table class="table table-zebra w-full">
                                <thead>
                                    <tr>
                                        <th>"Participante"</th>
                                        <th>"Situação"</th>
                                        <th>"Justificativa"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {items.into_iter().map(attendance_row).collect_view()}
                                </tbody>
                            </table>
                        </div>
                    }
                    .into_any()
                }}
            </div>
        </div>
    }
}

fn attendance_row(item: AttendanceItem) -> impl IntoView {
    let reason = item
        .justification_reason
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| "—".to_string());

    view! {
        <tr>
            <td>{item.participant.full_name}</td>
            <td>
                <span class=status_badge_class(item.status)>{item.status.label()}</span>
            </td>
            <td>{reason}</td>
        </tr>
    }
}
