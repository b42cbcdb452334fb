//! 点名网格：每个成员一行，当前状态对应的按钮高亮

use chamada_shared::attendance::AttendanceIndex;
use chamada_shared::{AttendanceStatus, Member};
use leptos::prelude::*;

const STATUSES: [AttendanceStatus; 3] = [
    AttendanceStatus::Present,
    AttendanceStatus::Absent,
    AttendanceStatus::Justified,
];

fn button_class(status: AttendanceStatus, active: bool) -> &'static str {
    match (status, active) {
        (AttendanceStatus::Present, true) => "btn btn-sm btn-success",
        (AttendanceStatus::Absent, true) => "btn btn-sm btn-error",
        (AttendanceStatus::Justified, true) => "btn btn-sm btn-warning",
        (_, false) => "btn btn-sm btn-outline",
    }
}

#[component]
pub fn AttendanceGrid(
    /// 已按搜索词筛选的成员
    #[prop(into)]
    members: Signal<Vec<Member>>,
    /// 最近一次权威读取的出勤记录
    #[prop(into)]
    index: Signal<AttendanceIndex>,
    /// 点击状态按钮
    #[prop(into)]
    on_mark: Callback<(Member, AttendanceStatus)>,
) -> impl IntoView {
    view! {
        <Show
            when=move || members.with(|m| !m.is_empty())
            fallback=|| view! {
                <p class="text-center py-8 text-base-content/50">"Nenhum participante encontrado."</p>
            }
        >
            <ul class="divide-y divide-base-200">
                <For
                    each=move || members.get()
                    key=|member| member.id.clone()
                    children=move |member| view! { <MemberRow member=member index=index on_mark=on_mark /> }
                />
            </ul>
        </Show>
    }
}

#[component]
fn MemberRow(
    member: Member,
    index: Signal<AttendanceIndex>,
    on_mark: Callback<(Member, AttendanceStatus)>,
) -> impl IntoView {
    let participant_id = member.id.clone();
    let current = move || index.with(|idx| idx.status_of(&participant_id));
    let reason = {
        let participant_id = member.id.clone();
        move || {
            index.with(|idx| {
                idx.get(&participant_id)
                    .and_then(|item| item.justification_reason.clone())
                    .filter(|r| !r.trim().is_empty())
            })
        }
    };
    let name = member.full_name.clone();

    view! {
        <li class="flex flex-col md:flex-row md:items-center justify-between gap-2 py-3">
            <div>
                <p class="font-medium">{name}</p>
                {move || reason().map(|r| view! { <p class="text-xs text-base-content/60">{r}</p> })}
            </div>
            <div class="join">
                {STATUSES
                    .into_iter()
                    .map(|status| {
                        let member = member.clone();
                        let current = current.clone();
                        view! {
                            <button
                                type="button"
                                class=move || button_class(status, current() == Some(status))
                                on:click=move |_| on_mark.run((member.clone(), status))
                            >
                                {status.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        </li>
    }
}
